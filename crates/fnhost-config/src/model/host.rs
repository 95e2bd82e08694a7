//! `host.json` (version 2.0) as Rust types.

use crate::document::{ConfigurationDocument, DocumentKind};
use crate::duration::HostDuration;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A validated version 2.0 host configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostConfig {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_bundle: Option<ExtensionBundle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregator: Option<Aggregator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<String>>,
    /// `None` when absent, `Some(None)` when explicitly unbounded.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "explicit_null"
    )]
    pub function_timeout: Option<Option<HostDuration>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_monitor: Option<HealthMonitor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_worker: Option<LanguageWorker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Logging>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub singleton: Option<Singleton>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_directories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Extensions>,
}

fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Function result aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flush_timeout: Option<HostDuration>,
}

/// Host health monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMonitor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_interval: Option<HostDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_window: Option<HostDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_threshold: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_threshold: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageWorker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers_directory: Option<String>,
}

/// Log levels accepted by `logging.logLevel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Critical,
    Debug,
    Error,
    Information,
    None,
    Trace,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileLoggingMode {
    Never,
    Always,
    DebugOnly,
}

/// The `logging` section. Provider sections other than Application
/// Insights end up in `providers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Logging {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevels>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_insights: Option<ApplicationInsights>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_logging_mode: Option<FileLoggingMode>,
    #[serde(flatten)]
    pub providers: Map<String, Value>,
}

/// Default level plus per-category overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLevels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<LogLevel>,
    #[serde(flatten)]
    pub categories: BTreeMap<String, LogLevel>,
}

impl LogLevels {
    /// The level for `category`, falling back to the default.
    #[must_use]
    pub fn level_for(&self, category: &str) -> Option<LogLevel> {
        self.categories.get(category).copied().or(self.default)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInsights {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling_settings: Option<SamplingSettings>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_telemetry_items_per_second: Option<f64>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Singleton lock behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Singleton {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_period: Option<HostDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listener_lock_period: Option<HostDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listener_lock_recovery_polling_interval: Option<HostDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_acquisition_timeout: Option<HostDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_acquisition_polling_interval: Option<Map<String, Value>>,
}

/// The `extensions` section. Extensions without a typed section are kept
/// in `other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpExtension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queues: Option<QueuesExtension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_bus: Option<ServiceBusExtension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_hubs: Option<EventHubsExtension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durable_task: Option<DurableTaskExtension>,
    #[serde(default, rename = "cosmosDB", skip_serializing_if = "Option::is_none")]
    pub cosmos_db: Option<CosmosDbExtension>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpExtension {
    pub route_prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent_requests: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_outstanding_requests: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_throttles_enabled: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuesExtension {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_polling_interval: Option<HostDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_timeout: Option<HostDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_dequeue_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_batch_threshold: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBusExtension {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefetch_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_handler_options: Option<MessageHandlerOptions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageHandlerOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent_calls: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_auto_renew_duration: Option<HostDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_complete: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHubsExtension {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_processor_options: Option<EventProcessorOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_checkpoint_frequency: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventProcessorOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_batch_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receive_timeout: Option<HostDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_receiver_runtime_metric: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefetch_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoke_processor_after_receive_timeout: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurableTaskExtension {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_provider: Option<StorageProvider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracing: Option<DurableTracing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<Notifications>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent_activity_functions: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent_orchestrator_functions: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_sessions_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_session_idle_timeout_in_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_graceful_shutdown: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageProvider {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_string_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_queue_batch_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_queue_buffer_threshold: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_queue_visibility_timeout: Option<HostDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_queue_polling_interval: Option<HostDuration>,
    /// Control queue partitions, 1 to 16.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_count: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_store_connection_string_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_store_name_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_item_queue_visibility_timeout: Option<HostDuration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurableTracing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_inputs_and_outputs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_replay_events: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notifications {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_grid: Option<EventGridNotifications>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventGridNotifications {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_setting_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_retry_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_retry_interval: Option<HostDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_event_types: Option<Vec<OrchestrationEvent>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrchestrationEvent {
    Started,
    Completed,
    Failed,
    Terminated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionMode {
    #[default]
    Gateway,
    Direct,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Protocol {
    #[default]
    Https,
    Tcp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosmosDbExtension {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_mode: Option<ConnectionMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
}

impl TryFrom<&ConfigurationDocument> for HostConfig {
    type Error = ConfigError;

    fn try_from(document: &ConfigurationDocument) -> Result<Self, Self::Error> {
        if document.kind() != DocumentKind::Host || document.schema_version() != Some("2.0") {
            return Err(ConfigError::DocumentMismatch {
                expected: "host 2.0".to_string(),
                found: format!(
                    "{} {}",
                    document.kind(),
                    document.schema_version().unwrap_or("(unversioned)")
                ),
            });
        }
        document.deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{ConfigValidator, ValidationOptions};
    use fnhost_common::test_utils::{sample_function_json, sample_host_json};
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn typed_view_of_sample_host() {
        let doc = ConfigValidator::default().validate_host(&sample_host_json()).unwrap();
        let host = HostConfig::try_from(&doc).unwrap();

        assert_eq!(host.version, "2.0");
        assert_eq!(
            host.function_timeout.clone().flatten().map(Duration::from),
            Some(Duration::from_secs(300))
        );

        let logging = host.logging.as_ref().unwrap();
        assert_eq!(logging.file_logging_mode, Some(FileLoggingMode::DebugOnly));
        let levels = logging.log_level.as_ref().unwrap();
        assert_eq!(levels.level_for("Host.Results"), Some(LogLevel::Error));
        assert_eq!(levels.level_for("Unlisted"), Some(LogLevel::Information));
        assert!(logging.providers.contains_key("console"));

        let extensions = host.extensions.as_ref().unwrap();
        assert_eq!(extensions.http.as_ref().unwrap().route_prefix, "api");
        assert_eq!(
            extensions.cosmos_db.as_ref().unwrap().connection_mode,
            Some(ConnectionMode::Direct)
        );
        let storage = extensions
            .durable_task
            .as_ref()
            .and_then(|d| d.storage_provider.as_ref())
            .unwrap();
        assert_eq!(storage.partition_count, Some(4));
        assert_eq!(storage.control_queue_batch_size, Some(32));
        assert!(extensions.other.contains_key("signalR"));

        assert_eq!(host.health_monitor.unwrap().health_check_threshold, Some(6));
    }

    #[test]
    fn null_timeout_is_distinguished_from_absent() {
        let validator = ConfigValidator::default();
        let doc = validator
            .validate_host(&json!({ "version": "2.0", "functionTimeout": null }))
            .unwrap();
        assert_eq!(HostConfig::try_from(&doc).unwrap().function_timeout, Some(None));

        let doc = validator.validate_host(&json!({ "version": "2.0" })).unwrap();
        assert_eq!(HostConfig::try_from(&doc).unwrap().function_timeout, None);
    }

    #[test]
    fn unbounded_integers_survive_the_typed_view() {
        let validator = ConfigValidator::default();
        let doc = validator
            .validate_host(&json!({
                "version": "2.0",
                "aggregator": { "batchSize": -5 },
                "extensions": { "queues": { "batchSize": 5_000_000_000_i64 } }
            }))
            .unwrap();
        let host = HostConfig::try_from(&doc).unwrap();

        assert_eq!(host.aggregator.unwrap().batch_size, Some(-5));
        let queues = host.extensions.unwrap().queues.unwrap();
        assert_eq!(queues.batch_size, Some(5_000_000_000));
    }

    #[test]
    fn rejects_other_documents() {
        let validator = ConfigValidator::new(ValidationOptions::default().allow_v1()).unwrap();
        let v1 = validator.validate_host(&json!({})).unwrap();
        assert!(matches!(
            HostConfig::try_from(&v1),
            Err(ConfigError::DocumentMismatch { .. })
        ));

        let function = validator.validate_function(&sample_function_json()).unwrap();
        assert!(HostConfig::try_from(&function).is_err());
    }
}
