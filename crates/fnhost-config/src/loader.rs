//! Reading configuration files from disk.

use crate::document::{ConfigurationDocument, DocumentKind};
use crate::error::ConfigError;
use crate::overrides::{apply_overrides, AppliedOverride};
use crate::validator::ConfigValidator;
use futures::future::join_all;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name of the host configuration.
pub const HOST_FILE: &str = "host.json";
/// File name of a function's configuration.
pub const FUNCTION_FILE: &str = "function.json";

/// Where host overrides come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OverrideSource {
    /// The process environment, read at load time.
    #[default]
    Environment,
    /// A fixed list of settings.
    Fixed(Vec<(String, String)>),
    /// No overrides.
    Disabled,
}

impl OverrideSource {
    fn settings(&self) -> Vec<(String, String)> {
        match self {
            Self::Environment => std::env::vars().collect(),
            Self::Fixed(settings) => settings.clone(),
            Self::Disabled => Vec::new(),
        }
    }
}

/// Outcome of loading one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub kind: DocumentKind,
    pub overrides: Vec<AppliedOverride>,
    pub outcome: Result<ConfigurationDocument, ConfigError>,
}

impl FileReport {
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Validation errors, or one for a file that could not be read.
    #[must_use]
    pub fn error_count(&self) -> usize {
        match &self.outcome {
            Ok(_) => 0,
            Err(ConfigError::Invalid(errors)) => errors.len(),
            Err(_) => 1,
        }
    }
}

/// Outcome of loading a whole function app.
#[derive(Debug)]
pub struct AppReport {
    pub root: PathBuf,
    pub host: FileReport,
    /// One report per function directory, sorted by path.
    pub functions: Vec<FileReport>,
}

impl AppReport {
    /// Whether every file loaded and validated.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.files().all(FileReport::is_valid)
    }

    /// The host report followed by the function reports.
    pub fn files(&self) -> impl Iterator<Item = &FileReport> {
        std::iter::once(&self.host).chain(self.functions.iter())
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.files().map(FileReport::error_count).sum()
    }
}

/// Loads and validates configuration files.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    validator: ConfigValidator,
    overrides: OverrideSource,
}

impl ConfigLoader {
    /// A loader that applies host overrides from the environment.
    #[must_use]
    pub fn new(validator: ConfigValidator) -> Self {
        Self {
            validator,
            overrides: OverrideSource::Environment,
        }
    }

    /// Replace the override source.
    #[must_use]
    pub fn with_overrides(mut self, overrides: OverrideSource) -> Self {
        self.overrides = overrides;
        self
    }

    #[must_use]
    pub const fn validator(&self) -> &ConfigValidator {
        &self.validator
    }

    /// Load and validate a `host.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Parse`] when the file
    /// cannot be read, and [`ConfigError::Invalid`] when it does not
    /// validate.
    pub async fn load_host(&self, path: impl AsRef<Path>) -> Result<ConfigurationDocument, ConfigError> {
        self.check_host(path).await.outcome
    }

    /// Load and validate a `function.json`.
    ///
    /// # Errors
    ///
    /// As for [`load_host`](Self::load_host).
    pub async fn load_function(&self, path: impl AsRef<Path>) -> Result<ConfigurationDocument, ConfigError> {
        self.check_function(path).await.outcome
    }

    /// Load a `host.json`, keeping the overrides that were applied.
    pub async fn check_host(&self, path: impl AsRef<Path>) -> FileReport {
        let path = path.as_ref().to_path_buf();
        let mut overrides = Vec::new();
        let outcome = match read_json(&path).await {
            Ok(mut raw) => {
                let schema = self.validator.host_schema_for(&raw);
                overrides = apply_overrides(&mut raw, schema, self.overrides.settings());
                self.validator.validate_host(&raw).map_err(ConfigError::from)
            }
            Err(e) => Err(e),
        };
        finish(path, DocumentKind::Host, overrides, outcome)
    }

    /// Load a `function.json`.
    pub async fn check_function(&self, path: impl AsRef<Path>) -> FileReport {
        let path = path.as_ref().to_path_buf();
        let outcome = match read_json(&path).await {
            Ok(raw) => self.validator.validate_function(&raw).map_err(ConfigError::from),
            Err(e) => Err(e),
        };
        finish(path, DocumentKind::Function, Vec::new(), outcome)
    }

    /// Load `host.json` and every `<function>/function.json` below `root`
    /// concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if `root` cannot be listed. Problems with
    /// individual files are reported in the [`AppReport`].
    pub async fn load_function_app(&self, root: impl AsRef<Path>) -> Result<AppReport, ConfigError> {
        let root = root.as_ref().to_path_buf();
        let function_files = find_function_files(&root).await?;
        info!(
            root = %root.display(),
            functions = function_files.len(),
            "loading function app"
        );

        let host_path = root.join(HOST_FILE);
        let (host, functions) = futures::join!(
            self.check_host(&host_path),
            join_all(function_files.iter().map(|path| self.check_function(path)))
        );

        Ok(AppReport { root, host, functions })
    }
}

fn finish(
    path: PathBuf,
    kind: DocumentKind,
    overrides: Vec<AppliedOverride>,
    outcome: Result<ConfigurationDocument, ConfigError>,
) -> FileReport {
    match &outcome {
        Ok(_) => debug!(path = %path.display(), %kind, "configuration file is valid"),
        Err(e) => debug!(path = %path.display(), %kind, error = %e, "configuration file rejected"),
    }
    FileReport {
        path,
        kind,
        overrides,
        outcome,
    }
}

/// Paths of `<root>/<dir>/function.json`, sorted.
async fn find_function_files(root: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let io_error = |source| ConfigError::Io {
        path: root.to_path_buf(),
        source,
    };
    let mut entries = tokio::fs::read_dir(root).await.map_err(io_error)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
        if !entry.file_type().await.map_err(io_error)?.is_dir() {
            continue;
        }
        let candidate = entry.path().join(FUNCTION_FILE);
        // A file that cannot be stat'ed is still reported, as an I/O failure.
        if !matches!(tokio::fs::try_exists(&candidate).await, Ok(false)) {
            files.push(candidate);
        }
    }
    files.sort();
    Ok(files)
}

async fn read_json(path: &Path) -> Result<Value, ConfigError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    // Editors on some platforms save JSON with a byte order mark.
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    serde_json::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
