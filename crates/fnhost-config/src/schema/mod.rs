//! Schema tables: configuration shapes written as data.
//!
//! A table is a flat list of field descriptors keyed by path. Tables are
//! stored as YAML (or JSON), so they can be diffed and versioned separately
//! from the validator, and are compiled into a node tree before use.
//!
//! Path syntax:
//!
//! - `a.b.c` names nested object members;
//! - `a[]` describes the items of array `a` (`bindings[].name`);
//! - a trailing `*` describes additional members of an object
//!   (`logging.logLevel.*`).
//!
//! Reusable groups of rows live under `shapes` and are mounted with
//! `shape: <name>` on an object row; shape rows use paths relative to the
//! mounting row.

mod builtin;
mod compile;

pub use builtin::{builtin_schema, BuiltinSchema};
pub use compile::{AdditionalKeys, ArrayNode, CompiledSchema, NodeKind, NumericBounds, ObjectNode, SchemaNode};

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Kinds a field descriptor can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    /// A string from the descriptor's `values`.
    Enum,
    /// A schema version literal from `values`; mismatches are reported as
    /// unsupported versions rather than bad enum values.
    Version,
    /// A `[d.]hh:mm:ss[.fffffff]` string.
    Duration,
    /// An object with declared members; closed unless `open` is set.
    Object,
    Array,
    /// An extension point: any string-keyed object, never checked further.
    Map,
    /// Any JSON value.
    Any,
}

/// Lower or upper bound of a numeric or duration field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Number(f64),
    Duration(String),
}

/// One row of a schema table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FieldDescriptor {
    pub path: String,
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Bound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Bound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unique_items: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub open: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDescriptor {
    /// A bare descriptor of `kind` at `path`.
    #[must_use]
    pub fn new(path: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            path: path.into(),
            kind,
            required: false,
            nullable: false,
            default: None,
            values: Vec::new(),
            minimum: None,
            maximum: None,
            max_items: None,
            unique_items: false,
            open: false,
            shape: None,
            description: None,
        }
    }
}

/// A complete schema: metadata, reusable shapes and field rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SchemaTable {
    /// Document family, e.g. `host` or `function`.
    pub name: String,
    /// Schema version this table describes, if the document is versioned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Whether the document root accepts undeclared members.
    #[serde(default)]
    pub root_open: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub shapes: BTreeMap<String, Vec<FieldDescriptor>>,
    pub fields: Vec<FieldDescriptor>,
}

/// Shapes may mount other shapes; this bounds the nesting.
const MAX_SHAPE_DEPTH: usize = 16;

impl SchemaTable {
    /// Parse a table from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Parse`] when the text is not a valid table.
    pub fn from_yaml_str(text: &str) -> Result<Self, SchemaError> {
        serde_yaml::from_str(text).map_err(|e| SchemaError::Parse(e.to_string()))
    }

    /// Parse a table from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Parse`] when the text is not a valid table.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(text).map_err(|e| SchemaError::Parse(e.to_string()))
    }

    /// Render the table as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Parse`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, SchemaError> {
        serde_yaml::to_string(self).map_err(|e| SchemaError::Parse(e.to_string()))
    }

    /// Compile the table into a tree the validator can walk.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] describing the first inconsistent row.
    pub fn compile(&self) -> Result<CompiledSchema, SchemaError> {
        compile::compile(self)
    }

    /// Rows with every `shape` reference replaced by the shape's rows,
    /// rebased onto the mounting path.
    pub(crate) fn expanded_fields(&self) -> Result<Vec<FieldDescriptor>, SchemaError> {
        let mut rows = Vec::new();
        for field in &self.fields {
            self.expand_into(field, "", 0, &mut rows)?;
        }
        Ok(rows)
    }

    fn expand_into(
        &self,
        field: &FieldDescriptor,
        prefix: &str,
        depth: usize,
        rows: &mut Vec<FieldDescriptor>,
    ) -> Result<(), SchemaError> {
        let mut row = field.clone();
        row.path = join_path(prefix, &field.path);

        let Some(shape_name) = row.shape.take() else {
            rows.push(row);
            return Ok(());
        };

        let invalid = |message: String| SchemaError::InvalidField {
            schema: self.name.clone(),
            path: join_path(prefix, &field.path),
            message,
        };
        if depth >= MAX_SHAPE_DEPTH {
            return Err(invalid(format!("shapes nest deeper than {MAX_SHAPE_DEPTH} levels")));
        }
        if row.kind != FieldKind::Object {
            return Err(invalid("only object fields can mount a shape".to_string()));
        }
        let shape = self.shapes.get(&shape_name).ok_or_else(|| SchemaError::UnknownShape {
            schema: self.name.clone(),
            shape: shape_name.clone(),
            path: row.path.clone(),
        })?;

        let mount = row.path.clone();
        rows.push(row);
        for member in shape {
            self.expand_into(member, &mount, depth + 1, rows)?;
        }
        Ok(())
    }
}

fn join_path(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        path.to_string()
    } else if path.starts_with("[]") {
        format!("{prefix}{path}")
    } else {
        format!("{prefix}.{path}")
    }
}
