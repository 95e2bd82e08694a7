//! Schema-driven validation and normalization.
//!
//! One recursive walk applies any [`CompiledSchema`]: it checks presence,
//! types, enum membership, durations and bounds, fills in declared
//! defaults, and collects every violation instead of stopping at the first.

use crate::document::{ConfigurationDocument, DocumentKind};
use crate::duration::{HostDuration, DURATION_GRAMMAR};
use crate::error::{SchemaError, ValidationError, ValidationErrors};
use crate::path::FieldPath;
use crate::schema::{
    builtin_schema, AdditionalKeys, ArrayNode, BuiltinSchema, CompiledSchema, NodeKind, NumericBounds,
    ObjectNode, SchemaNode,
};
use fnhost_common::{json_kind, truncate_string};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// How undeclared fields in closed objects are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Keep them, log a warning and record them on the document.
    #[default]
    Lenient,
    /// Report each one as [`ValidationError::UnknownField`].
    Strict,
}

/// Which host schema versions are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VersionPolicy {
    /// `version` must be present and equal to `2.0`.
    #[default]
    V2Only,
    /// A host document without `version` is checked against the implicit
    /// version-1 layout.
    AllowV1,
}

/// Caller-chosen validation policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    pub strictness: Strictness,
    pub version_policy: VersionPolicy,
}

impl ValidationOptions {
    /// Options with strict unknown-field handling.
    #[must_use]
    pub const fn strict(mut self) -> Self {
        self.strictness = Strictness::Strict;
        self
    }

    /// Options that accept version-1 host documents.
    #[must_use]
    pub const fn allow_v1(mut self) -> Self {
        self.version_policy = VersionPolicy::AllowV1;
        self
    }
}

/// Validates raw JSON against the built-in or caller-supplied schemas.
///
/// Holds only references to immutable compiled schemas, so one validator
/// can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct ConfigValidator {
    options: ValidationOptions,
    host_v2: &'static CompiledSchema,
    host_v1: &'static CompiledSchema,
    function: &'static CompiledSchema,
}

impl ConfigValidator {
    /// Create a validator over the built-in schemas.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if a built-in table fails to compile.
    pub fn new(options: ValidationOptions) -> Result<Self, SchemaError> {
        Ok(Self {
            options,
            host_v2: builtin_schema(BuiltinSchema::HostV2)?,
            host_v1: builtin_schema(BuiltinSchema::HostV1)?,
            function: builtin_schema(BuiltinSchema::Function)?,
        })
    }

    #[must_use]
    pub const fn options(&self) -> ValidationOptions {
        self.options
    }

    /// The host schema a raw document is checked against.
    #[must_use]
    pub fn host_schema_for(&self, raw: &Value) -> &'static CompiledSchema {
        let versionless = raw.as_object().is_some_and(|map| !map.contains_key("version"));
        if versionless && self.options.version_policy == VersionPolicy::AllowV1 {
            self.host_v1
        } else {
            self.host_v2
        }
    }

    /// Validate a `host.json` document.
    ///
    /// # Errors
    ///
    /// Returns every violation found, in schema order.
    pub fn validate_host(&self, raw: &Value) -> Result<ConfigurationDocument, ValidationErrors> {
        self.validate_with(self.host_schema_for(raw), raw)
    }

    /// Validate a `function.json` document.
    ///
    /// # Errors
    ///
    /// Returns every violation found, in schema order.
    pub fn validate_function(&self, raw: &Value) -> Result<ConfigurationDocument, ValidationErrors> {
        self.validate_with(self.function, raw)
    }

    /// Validate against any compiled schema.
    ///
    /// # Errors
    ///
    /// Returns every violation found, in schema order.
    pub fn validate_with(
        &self,
        schema: &CompiledSchema,
        raw: &Value,
    ) -> Result<ConfigurationDocument, ValidationErrors> {
        let Some(map) = raw.as_object() else {
            return Err(ValidationErrors::new(vec![ValidationError::TypeMismatch {
                path: FieldPath::root(),
                expected: "object".to_string(),
                actual: describe_actual(raw),
            }]));
        };

        let mut walk = Walk::new(self.options.strictness);
        let value = walk.object(schema.root(), map, &FieldPath::root());

        debug!(
            schema = schema.name(),
            version = schema.version().unwrap_or("-"),
            errors = walk.errors.len(),
            ignored = walk.ignored.len(),
            "validated document"
        );

        if walk.errors.is_empty() {
            Ok(ConfigurationDocument::new(
                DocumentKind::for_schema(schema.name()),
                schema.name(),
                schema.version(),
                value,
                walk.ignored,
            ))
        } else {
            Err(ValidationErrors::new(walk.errors))
        }
    }
}

impl Default for ConfigValidator {
    /// # Panics
    ///
    /// Panics if a built-in table fails to compile, which the crate's
    /// tests rule out.
    fn default() -> Self {
        match Self::new(ValidationOptions::default()) {
            Ok(validator) => validator,
            Err(e) => panic!("built-in schemas must compile: {e}"),
        }
    }
}

/// Errors a single value produces against `node`, with unknown fields
/// reported strictly. Used to check schema defaults.
pub(crate) fn check_node(node: &SchemaNode, value: &Value) -> Vec<ValidationError> {
    let mut walk = Walk::new(Strictness::Strict);
    walk.node(node, value, &FieldPath::root());
    walk.errors
}

struct Walk {
    strictness: Strictness,
    errors: Vec<ValidationError>,
    ignored: Vec<FieldPath>,
}

impl Walk {
    const fn new(strictness: Strictness) -> Self {
        Self {
            strictness,
            errors: Vec::new(),
            ignored: Vec::new(),
        }
    }

    fn mismatch(&mut self, node: &SchemaNode, value: &Value, path: &FieldPath) {
        self.errors.push(ValidationError::TypeMismatch {
            path: path.clone(),
            expected: node.expected(),
            actual: describe_actual(value),
        });
    }

    fn out_of_range(&mut self, node: &SchemaNode, value: &Value, path: &FieldPath) {
        self.errors.push(ValidationError::OutOfRange {
            path: path.clone(),
            expected: node.expected(),
            actual: preview(value),
        });
    }

    /// Check `value` against `node` and return its normalized form.
    fn node(&mut self, node: &SchemaNode, value: &Value, path: &FieldPath) -> Value {
        if value.is_null() {
            if !node.nullable && node.kind != NodeKind::Any {
                self.mismatch(node, value, path);
            }
            return Value::Null;
        }

        match &node.kind {
            NodeKind::String => {
                if !value.is_string() {
                    self.mismatch(node, value, path);
                }
            }
            NodeKind::Boolean => {
                if !value.is_boolean() {
                    self.mismatch(node, value, path);
                }
            }
            NodeKind::Integer(bounds) => match integer_value(value) {
                Some(n) => self.bounds(node, *bounds, n, value, path),
                None => self.mismatch(node, value, path),
            },
            NodeKind::Number(bounds) => match value.as_f64() {
                Some(n) => self.bounds(node, *bounds, n, value, path),
                None => self.mismatch(node, value, path),
            },
            NodeKind::Enum(values) | NodeKind::Version(values) => match value.as_str() {
                Some(text) if values.iter().any(|v| v == text) => {}
                Some(_) => {
                    let error = if matches!(node.kind, NodeKind::Version(_)) {
                        ValidationError::UnsupportedVersion {
                            path: path.clone(),
                            expected: node.expected(),
                            actual: preview(value),
                        }
                    } else {
                        ValidationError::InvalidEnumValue {
                            path: path.clone(),
                            expected: node.expected(),
                            actual: preview(value),
                        }
                    };
                    self.errors.push(error);
                }
                None => self.mismatch(node, value, path),
            },
            NodeKind::Duration { minimum, maximum } => match value.as_str() {
                Some(text) => match HostDuration::parse(text) {
                    Ok(duration) => {
                        let below = minimum.as_ref().is_some_and(|min| duration.as_duration() < min.as_duration());
                        let above = maximum.as_ref().is_some_and(|max| duration.as_duration() > max.as_duration());
                        if below || above {
                            self.out_of_range(node, value, path);
                        }
                    }
                    Err(_) => self.errors.push(ValidationError::InvalidDurationFormat {
                        path: path.clone(),
                        expected: DURATION_GRAMMAR.to_string(),
                        actual: preview(value),
                    }),
                },
                None => self.mismatch(node, value, path),
            },
            NodeKind::Object(object) => {
                return match value.as_object() {
                    Some(map) => self.object(object, map, path),
                    None => {
                        self.mismatch(node, value, path);
                        value.clone()
                    }
                };
            }
            NodeKind::Array(array) => {
                return match value.as_array() {
                    Some(items) => self.array(array, items, path),
                    None => {
                        self.mismatch(node, value, path);
                        value.clone()
                    }
                };
            }
            NodeKind::Map => {
                if !value.is_object() {
                    self.mismatch(node, value, path);
                }
            }
            NodeKind::Any => {}
        }
        value.clone()
    }

    fn bounds(&mut self, node: &SchemaNode, bounds: NumericBounds, n: f64, value: &Value, path: &FieldPath) {
        if !bounds.contains(n) {
            self.out_of_range(node, value, path);
        }
    }

    fn object(&mut self, object: &ObjectNode, map: &Map<String, Value>, path: &FieldPath) -> Value {
        for (name, child) in &object.fields {
            if child.required && !map.contains_key(name) {
                self.errors.push(ValidationError::MissingRequiredField {
                    path: path.child(name),
                    expected: child.expected(),
                });
            }
        }

        let mut out = Map::new();
        for (name, child) in &object.fields {
            let child_path = path.child(name);
            if let Some(value) = map.get(name) {
                let normalized = self.node(child, value, &child_path);
                out.insert(name.clone(), normalized);
            } else if let Some(default) = &child.default {
                let normalized = self.node(child, default, &child_path);
                out.insert(name.clone(), normalized);
            }
        }

        for (key, value) in map {
            if object.field(key).is_some() {
                continue;
            }
            let child_path = path.child(key);
            match &object.additional {
                AdditionalKeys::Open => {
                    out.insert(key.clone(), value.clone());
                }
                AdditionalKeys::Typed(node) => {
                    let normalized = self.node(node, value, &child_path);
                    out.insert(key.clone(), normalized);
                }
                AdditionalKeys::Closed => match self.strictness {
                    Strictness::Strict => self.errors.push(ValidationError::UnknownField {
                        path: child_path,
                        expected: object.declared_names(),
                    }),
                    Strictness::Lenient => {
                        warn!(field = %child_path, "ignoring field not declared by the schema");
                        out.insert(key.clone(), value.clone());
                        self.ignored.push(child_path);
                    }
                },
            }
        }

        Value::Object(out)
    }

    fn array(&mut self, array: &ArrayNode, items: &[Value], path: &FieldPath) -> Value {
        if let Some(max) = array.max_items {
            if items.len() > max {
                self.errors.push(ValidationError::ArrayCardinalityViolation {
                    path: path.clone(),
                    expected: format!("at most {max} items"),
                    actual: format!("{} items", items.len()),
                });
            }
        }
        if array.unique_items {
            for (i, item) in items.iter().enumerate() {
                if items[..i].contains(item) {
                    self.errors.push(ValidationError::ArrayCardinalityViolation {
                        path: path.clone(),
                        expected: "unique items".to_string(),
                        actual: format!("duplicate {} at index {i}", preview(item)),
                    });
                }
            }
        }

        let normalized = items
            .iter()
            .enumerate()
            .map(|(i, item)| self.node(&array.items, item, &path.index(i)))
            .collect();
        Value::Array(normalized)
    }
}

/// Integral JSON numbers as `f64` for bound checks.
fn integer_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => n.as_f64(),
        _ => None,
    }
}

/// Short rendering of a value for error messages.
fn preview(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", truncate_string(s, 48)),
        Value::Array(items) => format!("array of {}", items.len()),
        Value::Object(_) => "object".to_string(),
        other => other.to_string(),
    }
}

/// The kind of a value, with its text for scalars.
fn describe_actual(value: &Value) -> String {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => json_kind(value).to_string(),
        other => format!("{} {}", json_kind(other), preview(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationErrorKind;
    use fnhost_common::test_utils::{init_test_logging, sample_function_json, sample_host_json};
    use serde_json::json;

    fn validator() -> ConfigValidator {
        init_test_logging();
        ConfigValidator::default()
    }

    fn kinds(errors: &ValidationErrors) -> Vec<(ValidationErrorKind, String)> {
        errors.iter().map(|e| (e.kind(), e.path().to_string())).collect()
    }

    #[test]
    fn minimal_host_gets_defaults() {
        let doc = validator().validate_host(&json!({ "version": "2.0" })).unwrap();
        assert_eq!(doc.kind(), DocumentKind::Host);
        assert_eq!(doc.schema_version(), Some("2.0"));
        assert_eq!(doc.get("healthMonitor.enabled"), Some(&json!(true)));
        assert_eq!(doc.get("healthMonitor.healthCheckThreshold"), Some(&json!(6)));
        assert_eq!(doc.get("aggregator.flushTimeout"), Some(&json!("00:00:30")));
        assert_eq!(doc.get("singleton.lockPeriod"), Some(&json!("00:00:15")));
        assert_eq!(doc.get("logging"), None);
        assert_eq!(doc.get("logging.fileLoggingMode"), None);
        assert_eq!(doc.get("extensions"), None);
        assert_eq!(doc.get("functionTimeout"), None);
    }

    #[test]
    fn present_sections_get_nested_defaults() {
        let raw = json!({
            "version": "2.0",
            "logging": { "logLevel": { "default": "Warning" } },
            "extensions": { "queues": {}, "durableTask": { "storageProvider": {} } }
        });
        let doc = validator().validate_host(&raw).unwrap();
        assert_eq!(doc.get("logging.fileLoggingMode"), None);
        assert_eq!(doc.get("extensions.queues.batchSize"), Some(&json!(16)));
        assert_eq!(doc.get("extensions.queues.maxPollingInterval"), Some(&json!("00:01:00")));
        assert_eq!(
            doc.get("extensions.durableTask.storageProvider.partitionCount"),
            Some(&json!(4))
        );
        assert_eq!(doc.get("extensions.durableTask.tracing"), None);
    }

    #[test]
    fn wrong_version_is_a_single_error() {
        let errors = validator().validate_host(&json!({ "version": "1.0" })).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![(ValidationErrorKind::UnsupportedVersion, "version".to_string())]
        );
    }

    #[test]
    fn missing_version_depends_on_policy() {
        let errors = validator().validate_host(&json!({})).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![(ValidationErrorKind::MissingRequiredField, "version".to_string())]
        );

        let v1 = ConfigValidator::new(ValidationOptions::default().allow_v1()).unwrap();
        let doc = v1
            .validate_host(&json!({ "queues": { "maxPollingInterval": 2000 }, "tracing": {} }))
            .unwrap();
        assert_eq!(doc.schema_version(), Some("1.x"));

        let errors = v1.validate_host(&json!({ "version": "3.0" })).unwrap_err();
        assert_eq!(errors.of_kind(ValidationErrorKind::UnsupportedVersion).count(), 1);
    }

    #[test]
    fn version_one_polling_interval_has_no_floor() {
        let v1 = ConfigValidator::new(ValidationOptions::default().allow_v1()).unwrap();
        let doc = v1
            .validate_host(&json!({ "queues": { "maxPollingInterval": 50 } }))
            .unwrap();
        assert_eq!(doc.get("queues.maxPollingInterval"), Some(&json!(50)));

        let errors = v1
            .validate_host(&json!({ "queues": { "maxPollingInterval": "00:00:01" } }))
            .unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![(ValidationErrorKind::TypeMismatch, "queues.maxPollingInterval".to_string())]
        );
    }

    #[test]
    fn negative_batch_size_is_out_of_range() {
        let raw = json!({ "version": "2.0", "extensions": { "queues": { "batchSize": -1 } } });
        let errors = validator().validate_host(&raw).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![(ValidationErrorKind::OutOfRange, "extensions.queues.batchSize".to_string())]
        );
    }

    #[test]
    fn partition_count_is_range_checked_not_clamped() {
        for count in [0, 17] {
            let raw = json!({
                "version": "2.0",
                "extensions": { "durableTask": { "storageProvider": { "partitionCount": count } } }
            });
            let errors = validator().validate_host(&raw).unwrap_err();
            assert_eq!(errors.len(), 1);
            let error = errors.iter().next().unwrap();
            assert_eq!(error.kind(), ValidationErrorKind::OutOfRange);
            assert_eq!(error.actual(), count.to_string());
        }
    }

    #[test]
    fn polling_interval_minimum() {
        let raw = json!({
            "version": "2.0",
            "extensions": { "queues": { "maxPollingInterval": "00:00:00.050" } }
        });
        let errors = validator().validate_host(&raw).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![(ValidationErrorKind::OutOfRange, "extensions.queues.maxPollingInterval".to_string())]
        );
    }

    #[test]
    fn bad_durations_are_reported_not_coerced() {
        let raw = json!({
            "version": "2.0",
            "functionTimeout": "5 minutes",
            "singleton": { "lockPeriod": "00:60:00" }
        });
        let errors = validator().validate_host(&raw).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![
                (ValidationErrorKind::InvalidDurationFormat, "functionTimeout".to_string()),
                (ValidationErrorKind::InvalidDurationFormat, "singleton.lockPeriod".to_string()),
            ]
        );
    }

    #[test]
    fn function_timeout_may_be_null() {
        let doc = validator()
            .validate_host(&json!({ "version": "2.0", "functionTimeout": null }))
            .unwrap();
        assert_eq!(doc.get("functionTimeout"), Some(&Value::Null));
    }

    #[test]
    fn bad_enum_does_not_affect_siblings() {
        let raw = json!({
            "version": "2.0",
            "logging": {
                "fileLoggingMode": "sometimes",
                "logLevel": { "default": "Information", "Host": "Loud" }
            },
            "extensions": { "cosmosDB": { "connectionMode": "Direct", "protocol": "Udp" } }
        });
        let errors = validator().validate_host(&raw).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![
                (ValidationErrorKind::InvalidEnumValue, "logging.logLevel.Host".to_string()),
                (ValidationErrorKind::InvalidEnumValue, "logging.fileLoggingMode".to_string()),
                (ValidationErrorKind::InvalidEnumValue, "extensions.cosmosDB.protocol".to_string()),
            ]
        );
    }

    #[test]
    fn type_mismatches_name_expected_and_actual() {
        let raw = json!({ "version": "2.0", "healthMonitor": { "enabled": "yes", "healthCheckThreshold": 2.5 } });
        let errors = validator().validate_host(&raw).unwrap_err();
        let enabled = errors.at("healthMonitor.enabled").next().unwrap();
        assert_eq!(enabled.kind(), ValidationErrorKind::TypeMismatch);
        assert_eq!(enabled.expected(), "boolean");
        assert_eq!(enabled.actual(), "string \"yes\"");
        let threshold = errors.at("healthMonitor.healthCheckThreshold").next().unwrap();
        assert_eq!(threshold.kind(), ValidationErrorKind::TypeMismatch);
    }

    #[test]
    fn non_object_root_is_one_error() {
        for raw in [json!([]), json!("host"), json!(null), json!(2)] {
            let errors = validator().validate_host(&raw).unwrap_err();
            assert_eq!(
                kinds(&errors),
                vec![(ValidationErrorKind::TypeMismatch, "$".to_string())]
            );
        }
    }

    #[test]
    fn publish_event_types_cardinality() {
        let with = |types: Value| {
            json!({
                "version": "2.0",
                "extensions": { "durableTask": { "notifications": { "eventGrid": { "publishEventTypes": types } } } }
            })
        };
        let path = "extensions.durableTask.notifications.eventGrid.publishEventTypes";

        assert!(validator().validate_host(&with(json!([]))).is_ok());
        assert!(validator()
            .validate_host(&with(json!(["Started", "Completed", "Failed", "Terminated"])))
            .is_ok());

        let errors = validator()
            .validate_host(&with(json!(["Started", "Completed", "Failed", "Terminated", "Started"])))
            .unwrap_err();
        assert!(errors.at(path).count() >= 1);
        assert!(errors
            .iter()
            .all(|e| e.kind() == ValidationErrorKind::ArrayCardinalityViolation));

        let errors = validator()
            .validate_host(&with(json!(["Started", "Started"])))
            .unwrap_err();
        assert_eq!(kinds(&errors), vec![(ValidationErrorKind::ArrayCardinalityViolation, path.to_string())]);

        let errors = validator()
            .validate_host(&with(json!(["Started", "Paused"])))
            .unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![(ValidationErrorKind::InvalidEnumValue, format!("{path}[1]"))]
        );
    }

    #[test]
    fn unknown_fields_depend_on_strictness() {
        let raw = json!({
            "version": "2.0",
            "healthMonitr": {},
            "singleton": { "lockPeriod": "00:00:20", "lockPeriodd": "x" },
            "extensions": { "myExtension": { "anything": [1, 2] } }
        });

        let doc = validator().validate_host(&raw).unwrap();
        let ignored: Vec<String> = doc.ignored().iter().map(ToString::to_string).collect();
        assert_eq!(ignored, vec!["singleton.lockPeriodd", "healthMonitr"]);
        assert_eq!(doc.get("healthMonitr"), Some(&json!({})));
        assert_eq!(doc.get("extensions.myExtension.anything[1]"), Some(&json!(2)));

        let strict = ConfigValidator::new(ValidationOptions::default().strict()).unwrap();
        let errors = strict.validate_host(&raw).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![
                (ValidationErrorKind::UnknownField, "singleton.lockPeriodd".to_string()),
                (ValidationErrorKind::UnknownField, "healthMonitr".to_string()),
            ]
        );
    }

    #[test]
    fn errors_accumulate_across_the_document() {
        let raw = json!({
            "version": "2.0",
            "functions": ["a", 1],
            "aggregator": { "batchSize": "many" },
            "extensions": { "http": { "maxConcurrentRequests": 10 } }
        });
        let errors = validator().validate_host(&raw).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![
                (ValidationErrorKind::TypeMismatch, "aggregator.batchSize".to_string()),
                (ValidationErrorKind::TypeMismatch, "functions[1]".to_string()),
                (ValidationErrorKind::MissingRequiredField, "extensions.http.routePrefix".to_string()),
            ]
        );
    }

    #[test]
    fn sample_documents_validate_in_strict_mode() {
        let strict = ConfigValidator::new(ValidationOptions::default().strict()).unwrap();
        let host = strict.validate_host(&sample_host_json()).unwrap();
        assert!(host.ignored().is_empty());
        assert_eq!(host.get("logging.console.isEnabled"), Some(&json!(false)));
        let function = strict.validate_function(&sample_function_json()).unwrap();
        assert_eq!(function.kind(), DocumentKind::Function);
    }

    #[test]
    fn binding_vendor_fields_pass() {
        let raw = json!({
            "bindings": [
                { "name": "req", "type": "httpTrigger", "direction": "in", "extraVendorField": 123 }
            ]
        });
        let doc = validator().validate_function(&raw).unwrap();
        assert_eq!(doc.get("bindings[0].extraVendorField"), Some(&json!(123)));
        assert!(doc.ignored().is_empty());
    }

    #[test]
    fn binding_without_direction() {
        let raw = json!({
            "bindings": [
                { "name": "req", "type": "httpTrigger", "direction": "in" },
                { "name": "out", "type": "queue", "dataType": "xml" }
            ]
        });
        let errors = validator().validate_function(&raw).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![
                (ValidationErrorKind::MissingRequiredField, "bindings[1].direction".to_string()),
                (ValidationErrorKind::InvalidEnumValue, "bindings[1].dataType".to_string()),
            ]
        );
    }

    #[test]
    fn normalized_output_revalidates_unchanged() {
        let validator = validator();
        let first = validator.validate_host(&sample_host_json()).unwrap();
        let second = validator.validate_host(first.value()).unwrap();
        assert_eq!(first, second);
    }
}
