//! Error types for schema compilation, validation and loading.

use crate::path::FieldPath;
use fnhost_common::{pluralize, FnHostError};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Classification of a [`ValidationError`], for callers deciding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationErrorKind {
    MissingRequiredField,
    TypeMismatch,
    InvalidEnumValue,
    InvalidDurationFormat,
    OutOfRange,
    ArrayCardinalityViolation,
    UnknownField,
    UnsupportedVersion,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MissingRequiredField => "missing required field",
            Self::TypeMismatch => "type mismatch",
            Self::InvalidEnumValue => "invalid enum value",
            Self::InvalidDurationFormat => "invalid duration format",
            Self::OutOfRange => "out of range",
            Self::ArrayCardinalityViolation => "array cardinality violation",
            Self::UnknownField => "unknown field",
            Self::UnsupportedVersion => "unsupported version",
        };
        f.write_str(name)
    }
}

/// A single violation found while validating a document.
///
/// Every variant names the offending path, what the schema expected there and
/// what was actually found, so an author can fix all problems in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{path}: required field is missing (expected {expected})")]
    MissingRequiredField { path: FieldPath, expected: String },

    #[error("{path}: expected {expected}, found {actual}")]
    TypeMismatch {
        path: FieldPath,
        expected: String,
        actual: String,
    },

    #[error("{path}: {actual} is not one of {expected}")]
    InvalidEnumValue {
        path: FieldPath,
        expected: String,
        actual: String,
    },

    #[error("{path}: {actual} is not a valid duration ({expected})")]
    InvalidDurationFormat {
        path: FieldPath,
        expected: String,
        actual: String,
    },

    #[error("{path}: {actual} is out of range (expected {expected})")]
    OutOfRange {
        path: FieldPath,
        expected: String,
        actual: String,
    },

    #[error("{path}: {actual} (expected {expected})")]
    ArrayCardinalityViolation {
        path: FieldPath,
        expected: String,
        actual: String,
    },

    #[error("{path}: field is not declared by the schema (expected one of {expected})")]
    UnknownField { path: FieldPath, expected: String },

    #[error("{path}: version {actual} is not supported (expected {expected})")]
    UnsupportedVersion {
        path: FieldPath,
        expected: String,
        actual: String,
    },
}

impl ValidationError {
    /// The error's classification.
    #[must_use]
    pub const fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::MissingRequiredField { .. } => ValidationErrorKind::MissingRequiredField,
            Self::TypeMismatch { .. } => ValidationErrorKind::TypeMismatch,
            Self::InvalidEnumValue { .. } => ValidationErrorKind::InvalidEnumValue,
            Self::InvalidDurationFormat { .. } => ValidationErrorKind::InvalidDurationFormat,
            Self::OutOfRange { .. } => ValidationErrorKind::OutOfRange,
            Self::ArrayCardinalityViolation { .. } => ValidationErrorKind::ArrayCardinalityViolation,
            Self::UnknownField { .. } => ValidationErrorKind::UnknownField,
            Self::UnsupportedVersion { .. } => ValidationErrorKind::UnsupportedVersion,
        }
    }

    /// Where in the document the error was found.
    #[must_use]
    pub const fn path(&self) -> &FieldPath {
        match self {
            Self::MissingRequiredField { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::InvalidEnumValue { path, .. }
            | Self::InvalidDurationFormat { path, .. }
            | Self::OutOfRange { path, .. }
            | Self::ArrayCardinalityViolation { path, .. }
            | Self::UnknownField { path, .. }
            | Self::UnsupportedVersion { path, .. } => path,
        }
    }

    /// What the schema expected at [`path`](Self::path).
    #[must_use]
    pub fn expected(&self) -> &str {
        match self {
            Self::MissingRequiredField { expected, .. }
            | Self::TypeMismatch { expected, .. }
            | Self::InvalidEnumValue { expected, .. }
            | Self::InvalidDurationFormat { expected, .. }
            | Self::OutOfRange { expected, .. }
            | Self::ArrayCardinalityViolation { expected, .. }
            | Self::UnknownField { expected, .. }
            | Self::UnsupportedVersion { expected, .. } => expected,
        }
    }

    /// What was found instead. Missing fields report `nothing`, unknown
    /// fields report the field itself.
    #[must_use]
    pub fn actual(&self) -> &str {
        match self {
            Self::MissingRequiredField { .. } => "nothing",
            Self::UnknownField { .. } => "undeclared field",
            Self::TypeMismatch { actual, .. }
            | Self::InvalidEnumValue { actual, .. }
            | Self::InvalidDurationFormat { actual, .. }
            | Self::OutOfRange { actual, .. }
            | Self::ArrayCardinalityViolation { actual, .. }
            | Self::UnsupportedVersion { actual, .. } => actual,
        }
    }

    /// Flat, serializable form for machine-readable reports.
    #[must_use]
    pub fn record(&self) -> ErrorRecord {
        ErrorRecord {
            kind: self.kind(),
            path: self.path().to_string(),
            expected: self.expected().to_string(),
            actual: self.actual().to_string(),
            message: self.to_string(),
        }
    }
}

/// Serializable view of a [`ValidationError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub kind: ValidationErrorKind,
    pub path: String,
    pub expected: String,
    pub actual: String,
    pub message: String,
}

/// The complete, ordered list of violations from one validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub(crate) fn new(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }

    /// Number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for errors returned by the validator.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in the order the violations were found.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// Violations of one kind.
    pub fn of_kind(&self, kind: ValidationErrorKind) -> impl Iterator<Item = &ValidationError> {
        self.0.iter().filter(move |e| e.kind() == kind)
    }

    /// Violations at exactly `path` (rendered form, e.g. `bindings[0].name`).
    pub fn at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ValidationError> + 'a {
        self.0.iter().filter(move |e| e.path().to_string() == path)
    }

    /// Take ownership of the list.
    #[must_use]
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl AsRef<[ValidationError]> for ValidationErrors {
    fn as_ref(&self) -> &[ValidationError] {
        &self.0
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", pluralize(self.0.len(), "validation error"))?;
        for error in &self.0 {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Problems with a schema table itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("failed to parse schema table: {0}")]
    Parse(String),

    #[error("schema '{schema}': field '{path}': {message}")]
    InvalidField {
        schema: String,
        path: String,
        message: String,
    },

    #[error("schema '{schema}': unknown shape '{shape}' used by '{path}'")]
    UnknownShape {
        schema: String,
        shape: String,
        path: String,
    },
}

/// Errors from loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {} as JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("expected a {expected} document, found {found}")]
    DocumentMismatch { expected: String, found: String },

    #[error("failed to build typed view: {0}")]
    TypedView(#[source] serde_json::Error),
}

impl From<ConfigError> for FnHostError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(errors) => FnHostError::validation(errors.to_string()),
            other => FnHostError::config_with_source(other.to_string(), other),
        }
    }
}
