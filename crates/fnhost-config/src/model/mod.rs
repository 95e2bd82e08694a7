//! Typed views over normalized documents.
//!
//! The validator works on untyped JSON; these structs give callers field
//! access once a document has been accepted. Extension points are kept as
//! `serde_json::Map` catch-alls so nothing in the document is lost.

pub mod function;
pub mod host;

pub use function::{Binding, BindingDirection, BindingDataType, ConfigurationSource, FunctionConfig};
pub use host::{
    Aggregator, CosmosDbExtension, DurableTaskExtension, EventHubsExtension, HealthMonitor, HostConfig,
    HttpExtension, LogLevel, Logging, QueuesExtension, ServiceBusExtension, Singleton,
};
