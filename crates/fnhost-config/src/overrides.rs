//! App-setting overrides for `host.json`.
//!
//! A setting named `AzureFunctionsJobHost__extensions__queues__batchSize`
//! replaces `extensions.queues.batchSize` in the raw document before it is
//! validated. Segments match declared field names ignoring case, and values
//! are typed after the field they land on.

use crate::path::FieldPath;
use crate::schema::{AdditionalKeys, CompiledSchema, NodeKind, ObjectNode, SchemaNode};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::warn;

/// Prefix of host override settings.
pub const ENV_PREFIX: &str = "AzureFunctionsJobHost__";

/// Separator between path segments in a setting name.
const SEPARATOR: &str = "__";

/// One override that was written into a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedOverride {
    pub variable: String,
    pub path: FieldPath,
    pub value: Value,
}

/// Apply every `AzureFunctionsJobHost__*` setting in `vars` to `raw`.
///
/// Settings are applied in name order, so the result does not depend on
/// the iteration order of the source. Settings that cannot be placed (the
/// document is not an object, or a segment lands inside a non-object value)
/// are skipped with a warning. Values that do not parse as the declared
/// kind are written as strings, leaving the mismatch to the validator.
pub fn apply_overrides<I>(raw: &mut Value, schema: &CompiledSchema, vars: I) -> Vec<AppliedOverride>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut settings: Vec<(String, String)> = vars
        .into_iter()
        .filter(|(name, _)| strip_prefix(name).is_some())
        .collect();
    settings.sort();

    let Some(root) = raw.as_object_mut() else {
        if !settings.is_empty() {
            warn!("document is not an object; host overrides skipped");
        }
        return Vec::new();
    };

    let mut applied = Vec::new();
    for (variable, text) in settings {
        let Some(rest) = strip_prefix(&variable) else {
            continue;
        };
        let segments: Vec<&str> = rest.split(SEPARATOR).collect();
        if segments.iter().any(|s| s.is_empty()) {
            warn!(%variable, "override has an empty path segment; skipped");
            continue;
        }
        match place(root, schema.root(), &segments, &text) {
            Some((path, value)) => {
                warn!(%variable, path = %path, "host setting overridden from environment");
                applied.push(AppliedOverride { variable, path, value });
            }
            None => warn!(%variable, "override does not land on an object; skipped"),
        }
    }
    applied
}

fn strip_prefix(name: &str) -> Option<&str> {
    let head = name.get(..ENV_PREFIX.len())?;
    head.eq_ignore_ascii_case(ENV_PREFIX)
        .then(|| &name[ENV_PREFIX.len()..])
}

/// Write `text` at `segments` below `root`, creating intermediate objects.
fn place(
    root: &mut Map<String, Value>,
    schema_root: &ObjectNode,
    segments: &[&str],
    text: &str,
) -> Option<(FieldPath, Value)> {
    let (leaf, parents) = segments.split_last()?;
    let mut current = root;
    let mut scope = Some(schema_root);
    let mut path = FieldPath::root();

    for segment in parents {
        let (name, node) = resolve(current, scope, segment);
        scope = node.and_then(|n| match &n.kind {
            NodeKind::Object(object) => Some(object),
            _ => None,
        });
        path = path.child(&name);
        let entry = current
            .entry(name)
            .or_insert_with(|| Value::Object(Map::new()));
        current = entry.as_object_mut()?;
    }

    let (name, node) = resolve(current, scope, leaf);
    let value = coerce(node, text);
    path = path.child(&name);
    current.insert(name, value.clone());
    Some((path, value))
}

/// The member name to use for `segment` and its schema node, if declared.
fn resolve<'s>(
    current: &Map<String, Value>,
    scope: Option<&'s ObjectNode>,
    segment: &str,
) -> (String, Option<&'s SchemaNode>) {
    if let Some(object) = scope {
        if let Some((declared, node)) = object.field_ignore_case(segment) {
            return (declared.to_string(), Some(node));
        }
    }
    let name = current
        .keys()
        .find(|key| key.eq_ignore_ascii_case(segment))
        .cloned()
        .unwrap_or_else(|| segment.to_string());
    let node = scope.and_then(|object| match &object.additional {
        AdditionalKeys::Typed(node) => Some(node.as_ref()),
        _ => None,
    });
    (name, node)
}

fn coerce(node: Option<&SchemaNode>, text: &str) -> Value {
    let parsed = match node.map(|n| &n.kind) {
        Some(NodeKind::Integer(_)) => text.trim().parse::<i64>().ok().map(Value::from),
        Some(NodeKind::Number(_)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        Some(NodeKind::Boolean) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    };
    parsed.unwrap_or_else(|| Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{builtin_schema, BuiltinSchema};
    use serde_json::json;

    fn host() -> &'static CompiledSchema {
        builtin_schema(BuiltinSchema::HostV2).unwrap()
    }

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn overrides_create_nested_sections_with_declared_casing() {
        let mut raw = json!({ "version": "2.0" });
        let applied = apply_overrides(
            &mut raw,
            host(),
            vars(&[
                ("AzureFunctionsJobHost__extensions__queues__BATCHSIZE", "8"),
                ("AZUREFUNCTIONSJOBHOST__healthmonitor__enabled", "False"),
                ("PATH", "/usr/bin"),
            ]),
        );
        assert_eq!(applied.len(), 2);
        assert_eq!(raw["extensions"]["queues"]["batchSize"], json!(8));
        assert_eq!(raw["healthMonitor"]["enabled"], json!(false));
        let paths: Vec<String> = applied.iter().map(|a| a.path.to_string()).collect();
        assert_eq!(paths, vec!["healthMonitor.enabled", "extensions.queues.batchSize"]);
    }

    #[test]
    fn values_follow_declared_kinds() {
        let mut raw = json!({ "version": "2.0" });
        apply_overrides(
            &mut raw,
            host(),
            vars(&[
                ("AzureFunctionsJobHost__healthMonitor__counterThreshold", "0.5"),
                ("AzureFunctionsJobHost__functionTimeout", "00:10:00"),
                ("AzureFunctionsJobHost__logging__logLevel__Function.Worker", "Debug"),
                ("AzureFunctionsJobHost__extensions__queues__batchSize", "lots"),
            ]),
        );
        assert_eq!(raw["healthMonitor"]["counterThreshold"], json!(0.5));
        assert_eq!(raw["functionTimeout"], json!("00:10:00"));
        assert_eq!(raw["logging"]["logLevel"]["Function.Worker"], json!("Debug"));
        assert_eq!(raw["extensions"]["queues"]["batchSize"], json!("lots"));
    }

    #[test]
    fn undeclared_paths_reuse_existing_keys() {
        let mut raw = json!({ "version": "2.0", "extensions": { "signalR": { "hub": "a" } } });
        apply_overrides(
            &mut raw,
            host(),
            vars(&[("AzureFunctionsJobHost__extensions__SignalR__hub", "b")]),
        );
        assert_eq!(raw["extensions"]["signalR"]["hub"], json!("b"));
        assert!(raw["extensions"].get("SignalR").is_none());
    }

    #[test]
    fn unplaceable_overrides_are_skipped() {
        let mut raw = json!({ "version": "2.0", "functions": ["a"] });
        let applied = apply_overrides(
            &mut raw,
            host(),
            vars(&[
                ("AzureFunctionsJobHost__functions__0", "b"),
                ("AzureFunctionsJobHost__", "x"),
                ("AzureFunctionsJobHost__logging____fileLoggingMode", "always"),
            ]),
        );
        assert!(applied.is_empty());
        assert_eq!(raw, json!({ "version": "2.0", "functions": ["a"] }));

        let mut not_object = json!([1]);
        assert!(apply_overrides(&mut not_object, host(), vars(&[("AzureFunctionsJobHost__version", "2.0")])).is_empty());
    }
}
