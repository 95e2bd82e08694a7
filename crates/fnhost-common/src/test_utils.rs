//! Test utilities and shared fixtures for the fnhost workspace.
//!
//! Available to other crates through the `testing` feature.

#![allow(clippy::missing_panics_doc)]

use serde_json::{json, Value};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call from every test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// A host.json that exercises most V2 sections and is valid as written.
#[must_use]
pub fn sample_host_json() -> Value {
    json!({
        "version": "2.0",
        "functionTimeout": "00:05:00",
        "functions": ["HttpStart", "QueueWorker"],
        "logging": {
            "fileLoggingMode": "debugOnly",
            "logLevel": {
                "default": "Information",
                "Host.Results": "Error",
                "Function.QueueWorker": "Trace"
            },
            "applicationInsights": {
                "samplingSettings": {
                    "isEnabled": true,
                    "maxTelemetryItemsPerSecond": 20,
                    "excludedTypes": "Request"
                }
            },
            "console": { "isEnabled": false }
        },
        "extensionBundle": {
            "id": "Microsoft.Azure.Functions.ExtensionBundle",
            "version": "[4.*, 5.0.0)"
        },
        "extensions": {
            "http": {
                "routePrefix": "api",
                "maxConcurrentRequests": 100,
                "dynamicThrottlesEnabled": true
            },
            "queues": {
                "maxPollingInterval": "00:00:02",
                "visibilityTimeout": "00:00:30",
                "batchSize": 16,
                "maxDequeueCount": 5,
                "newBatchThreshold": 8
            },
            "durableTask": {
                "hubName": "SampleHub",
                "storageProvider": {
                    "partitionCount": 4,
                    "controlQueueVisibilityTimeout": "00:05:00"
                },
                "notifications": {
                    "eventGrid": {
                        "topicEndpoint": "https://topic.example.net/api/events",
                        "publishRetryInterval": "00:00:30",
                        "publishEventTypes": ["Started", "Failed"]
                    }
                }
            },
            "cosmosDB": { "connectionMode": "Direct", "protocol": "Tcp" },
            "signalR": { "hubName": "chat" }
        }
    })
}

/// A function.json with an HTTP trigger, an HTTP output and a vendor field.
#[must_use]
pub fn sample_function_json() -> Value {
    json!({
        "scriptFile": "../dist/HttpStart/index.js",
        "entryPoint": "run",
        "bindings": [
            {
                "name": "req",
                "type": "httpTrigger",
                "direction": "in",
                "authLevel": "function",
                "methods": ["get", "post"]
            },
            {
                "name": "$return",
                "type": "http",
                "direction": "out"
            }
        ]
    })
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
#[must_use]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Write a JSON value to `dir/relative`, creating parent directories.
pub fn write_json(dir: &std::path::Path, relative: &str, value: &Value) -> std::path::PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    let content = serde_json::to_string_pretty(value).expect("Failed to serialize fixture");
    std::fs::write(&path, content).expect("Failed to write fixture");
    path
}
