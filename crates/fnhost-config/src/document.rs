//! The validated, normalized configuration document.

use crate::error::ConfigError;
use crate::path::FieldPath;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Which file a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    /// `host.json`
    Host,
    /// `function.json`
    Function,
    /// A document validated against a caller-supplied table.
    Other,
}

impl DocumentKind {
    /// Kind of documents validated against the schema named `name`.
    #[must_use]
    pub fn for_schema(name: &str) -> Self {
        match name {
            "host" => Self::Host,
            "function" => Self::Function,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Host => "host",
            Self::Function => "function",
            Self::Other => "custom",
        })
    }
}

/// An accepted configuration document with defaults applied.
///
/// Built only by the validator and never mutated afterwards; the
/// accessors hand out shared references or owned copies.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationDocument {
    kind: DocumentKind,
    schema: String,
    schema_version: Option<String>,
    value: Value,
    ignored: Vec<FieldPath>,
}

impl ConfigurationDocument {
    pub(crate) fn new(
        kind: DocumentKind,
        schema: &str,
        schema_version: Option<&str>,
        value: Value,
        ignored: Vec<FieldPath>,
    ) -> Self {
        Self {
            kind,
            schema: schema.to_string(),
            schema_version: schema_version.map(str::to_string),
            value,
            ignored,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Name of the schema the document was validated against.
    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Version of that schema, e.g. `2.0` or `1.x`.
    #[must_use]
    pub fn schema_version(&self) -> Option<&str> {
        self.schema_version.as_deref()
    }

    /// The normalized JSON value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Undeclared fields that lenient validation let through.
    #[must_use]
    pub fn ignored(&self) -> &[FieldPath] {
        &self.ignored
    }

    /// Look up a value by path, e.g. `extensions.queues.batchSize` or
    /// `bindings[0].direction`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.value;
        for part in path.split('.') {
            let (key, indexes) = match part.find('[') {
                Some(open) => (&part[..open], &part[open..]),
                None => (part, ""),
            };
            if !key.is_empty() {
                current = current.get(key)?;
            }
            for index in indexes.split_terminator(']') {
                let index: usize = index.strip_prefix('[')?.parse().ok()?;
                current = current.get(index)?;
            }
        }
        Some(current)
    }

    /// Consume the document, returning the normalized value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Deserialize the normalized value into a typed view.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TypedView`] if the value does not fit `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        T::deserialize(&self.value).map_err(ConfigError::TypedView)
    }
}
