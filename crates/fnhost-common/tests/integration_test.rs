//! Integration tests for fnhost-common crate.

use fnhost_common::logging::LogFormat;
use fnhost_common::{json_kind, pluralize, truncate_string, FnHostError, LoggingConfig};
use proptest::prelude::*;
use serde_json::json;

#[test]
fn test_json_kind_names() {
    assert_eq!(json_kind(&json!(null)), "null");
    assert_eq!(json_kind(&json!(1.5)), "number");
    assert_eq!(json_kind(&json!({ "a": 1 })), "object");
    assert_eq!(json_kind(&json!(["a"])), "array");
}

#[test]
fn test_pluralize_in_messages() {
    assert_eq!(pluralize(2, "validation error"), "2 validation errors");
}

#[test]
fn test_io_error_converts() {
    fn read_missing() -> fnhost_common::Result<String> {
        Ok(std::fs::read_to_string("/definitely/not/here/host.json")?)
    }
    assert!(matches!(read_missing(), Err(FnHostError::Io(_))));
}

#[test]
fn test_serde_error_converts() {
    fn parse() -> fnhost_common::Result<serde_json::Value> {
        Ok(serde_json::from_str("{ not json")?)
    }
    assert!(matches!(parse(), Err(FnHostError::Serialization(_))));
}

#[test]
fn test_default_logging_config() {
    let config = LoggingConfig::default();
    assert_eq!(config.level, "warn");
    assert_eq!(config.format, LogFormat::Compact);
    assert!(!config.include_targets);
}

proptest! {
    #[test]
    fn truncate_never_exceeds_limit(input in "\\PC{0,80}", limit in 3usize..40) {
        let truncated = truncate_string(&input, limit);
        prop_assert!(truncated.chars().count() <= limit);
        if input.chars().count() <= limit {
            prop_assert_eq!(truncated, input);
        }
    }
}
