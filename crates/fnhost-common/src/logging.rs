//! Structured logging infrastructure for fnhost

use crate::error::{FnHostError, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format of the log layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, one event per line
    #[default]
    Compact,
    /// Multi-line output with colors
    Pretty,
    /// Newline delimited JSON
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected compact, pretty or json)")),
        }
    }
}

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "fnhost_config=trace").
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Whether to emit ANSI colors
    pub ansi: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            ansi: true,
            include_targets: false,
        }
    }
}

impl LoggingConfig {
    /// Builds the filter, preferring `RUST_LOG` over the configured level
    fn env_filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .map_err(|e| FnHostError::config_with_source(format!("invalid log level '{}'", self.level), e))
    }
}

/// Initialize the tracing subscriber with the given configuration.
///
/// Logs go to stderr so that reports written to stdout stay machine readable.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(config.env_filter()?);

    let installed = match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(config.include_targets)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_ansi(config.ansi)
                    .with_target(config.include_targets)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_ansi(config.ansi)
                    .with_target(config.include_targets)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    installed.map_err(|e| FnHostError::with_source("failed to install log subscriber", e))?;
    tracing::debug!(level = %config.level, format = ?config.format, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.ansi);
        assert!(!config.include_targets);
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("compact".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert_eq!("Pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            level: "fnhost=[".to_string(),
            ..LoggingConfig::default()
        };
        assert!(config.env_filter().is_err());
    }
}
