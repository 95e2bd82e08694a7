//! # fnhost config
//!
//! Schema-driven validation and normalization of `host.json` and
//! `function.json`.
//!
//! Schemas are data: YAML tables of field descriptors compiled once into a
//! node tree. [`ConfigValidator`] walks raw JSON against that tree, applies
//! declared defaults and returns either an immutable
//! [`ConfigurationDocument`] or every [`ValidationError`] it found.
//! [`ConfigLoader`] adds file I/O and app-setting overrides on top.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod document;
pub mod duration;
pub mod error;
pub mod loader;
pub mod model;
pub mod overrides;
pub mod path;
pub mod schema;
pub mod validator;

pub use document::{ConfigurationDocument, DocumentKind};
pub use duration::{DurationError, HostDuration};
pub use error::{ConfigError, ErrorRecord, SchemaError, ValidationError, ValidationErrorKind, ValidationErrors};
pub use loader::{AppReport, ConfigLoader, FileReport, OverrideSource, FUNCTION_FILE, HOST_FILE};
pub use model::{FunctionConfig, HostConfig};
pub use overrides::{apply_overrides, AppliedOverride, ENV_PREFIX};
pub use path::{FieldPath, PathSegment};
pub use schema::{builtin_schema, BuiltinSchema, CompiledSchema, FieldDescriptor, FieldKind, SchemaTable};
pub use validator::{ConfigValidator, Strictness, ValidationOptions, VersionPolicy};
