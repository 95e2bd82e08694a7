//! Schema tables shipped with the crate, compiled once on first use.

use super::{CompiledSchema, SchemaTable};
use crate::error::SchemaError;
use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;

const HOST_V2: &str = include_str!("../../schemas/host-v2.yaml");
const HOST_V1: &str = include_str!("../../schemas/host-v1.yaml");
const FUNCTION: &str = include_str!("../../schemas/function.yaml");

/// The built-in schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinSchema {
    /// `host.json` with `"version": "2.0"`.
    HostV2,
    /// `host.json` without a version field.
    HostV1,
    /// `function.json`.
    Function,
}

impl BuiltinSchema {
    /// Every built-in schema.
    pub const ALL: [Self; 3] = [Self::HostV2, Self::HostV1, Self::Function];

    /// Short name used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::HostV2 => "host",
            Self::HostV1 => "host-v1",
            Self::Function => "function",
        }
    }

    /// The YAML source of the table.
    #[must_use]
    pub const fn source(self) -> &'static str {
        match self {
            Self::HostV2 => HOST_V2,
            Self::HostV1 => HOST_V1,
            Self::Function => FUNCTION,
        }
    }

    /// The parsed, uncompiled table.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Parse`] if the embedded table is malformed.
    pub fn table(self) -> Result<SchemaTable, SchemaError> {
        SchemaTable::from_yaml_str(self.source())
    }
}

impl fmt::Display for BuiltinSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuiltinSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|schema| schema.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown schema '{s}' (expected host, host-v1 or function)"))
    }
}

fn compile_source(schema: BuiltinSchema) -> Result<CompiledSchema, SchemaError> {
    let compiled = schema.table()?.compile()?;
    tracing::debug!(schema = %schema, "compiled built-in schema");
    Ok(compiled)
}

static HOST_V2_COMPILED: Lazy<Result<CompiledSchema, SchemaError>> =
    Lazy::new(|| compile_source(BuiltinSchema::HostV2));
static HOST_V1_COMPILED: Lazy<Result<CompiledSchema, SchemaError>> =
    Lazy::new(|| compile_source(BuiltinSchema::HostV1));
static FUNCTION_COMPILED: Lazy<Result<CompiledSchema, SchemaError>> =
    Lazy::new(|| compile_source(BuiltinSchema::Function));

/// The compiled form of a built-in schema.
///
/// # Errors
///
/// Returns the [`SchemaError`] from compiling the embedded table. The
/// tables are covered by tests, so this only fails on a broken build.
pub fn builtin_schema(schema: BuiltinSchema) -> Result<&'static CompiledSchema, SchemaError> {
    let compiled = match schema {
        BuiltinSchema::HostV2 => &*HOST_V2_COMPILED,
        BuiltinSchema::HostV1 => &*HOST_V1_COMPILED,
        BuiltinSchema::Function => &*FUNCTION_COMPILED,
    };
    compiled.as_ref().map_err(Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AdditionalKeys, NodeKind};

    #[test]
    fn every_builtin_compiles() {
        for schema in BuiltinSchema::ALL {
            let compiled = builtin_schema(schema).unwrap_or_else(|e| panic!("{schema}: {e}"));
            assert!(!compiled.root().fields.is_empty());
        }
    }

    #[test]
    fn host_v2_declares_version_literal() {
        let host = builtin_schema(BuiltinSchema::HostV2).unwrap();
        assert_eq!(host.version(), Some("2.0"));
        let version = host.node_at("version").unwrap();
        assert!(version.required);
        assert_eq!(version.kind, NodeKind::Version(vec!["2.0".to_string()]));
        assert_eq!(host.root().additional, AdditionalKeys::Closed);
    }

    #[test]
    fn host_v2_has_documented_bounds() {
        let host = builtin_schema(BuiltinSchema::HostV2).unwrap();
        let partitions = host
            .node_at("extensions.durableTask.storageProvider.partitionCount")
            .unwrap();
        assert_eq!(partitions.expected(), "integer between 1 and 16");
        let polling = host.node_at("extensions.queues.maxPollingInterval").unwrap();
        assert!(polling.expected().contains(">= 00:00:00.100"));
    }

    #[test]
    fn extension_points_are_open() {
        let host = builtin_schema(BuiltinSchema::HostV2).unwrap();
        let NodeKind::Object(extensions) = &host.node_at("extensions").unwrap().kind else {
            panic!("extensions should be an object");
        };
        assert_eq!(extensions.additional, AdditionalKeys::Open);
        assert_eq!(host.node_at("http").unwrap().kind, NodeKind::Map);

        let function = builtin_schema(BuiltinSchema::Function).unwrap();
        assert_eq!(function.root().additional, AdditionalKeys::Open);
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for schema in BuiltinSchema::ALL {
            assert_eq!(schema.name().parse::<BuiltinSchema>().unwrap(), schema);
        }
        assert!("hostv3".parse::<BuiltinSchema>().is_err());
    }
}
