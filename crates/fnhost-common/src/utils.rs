//! Shared utility functions.

/// Truncates a string to a maximum number of characters with ellipsis.
#[must_use]
pub fn truncate_string(input: &str, max_length: usize) -> String {
    if input.chars().count() <= max_length {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_length.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Formats a count with a noun, adding a plural `s` when needed.
#[must_use]
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Names the JSON kind of a value the way error messages refer to it.
#[must_use]
pub const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_string() {
        let input = "This is a very long string that should be truncated";
        assert_eq!(truncate_string(input, 20), "This is a very lo...");
        assert_eq!(truncate_string("Short", 20), "Short");
    }

    #[test]
    fn test_truncate_string_is_char_safe() {
        assert_eq!(truncate_string("ééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(0, "error"), "0 errors");
        assert_eq!(pluralize(1, "error"), "1 error");
        assert_eq!(pluralize(7, "file"), "7 files");
    }

    #[test]
    fn test_json_kind() {
        assert_eq!(json_kind(&json!(null)), "null");
        assert_eq!(json_kind(&json!(true)), "boolean");
        assert_eq!(json_kind(&json!(1.5)), "number");
        assert_eq!(json_kind(&json!("2.0")), "string");
        assert_eq!(json_kind(&json!([])), "array");
        assert_eq!(json_kind(&json!({})), "object");
    }
}
