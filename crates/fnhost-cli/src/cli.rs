use clap::{Parser, Subcommand, ValueEnum};
use fnhost_common::logging::LogFormat;
use fnhost_config::{BuiltinSchema, OverrideSource, ValidationOptions};
use std::path::PathBuf;

/// fnhost: validate serverless function-host configuration files.
#[derive(Parser, Debug)]
#[command(name = "fnhost", version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Reject fields the schema does not declare instead of warning.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Accept host.json files without a version field (version-1 layout).
    #[arg(long, global = true)]
    pub allow_v1: bool,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Print the normalized document of every valid file.
    #[arg(long, global = true)]
    pub print_normalized: bool,

    /// Ignore AzureFunctionsJobHost__* settings in the environment.
    #[arg(long, global = true)]
    pub no_env: bool,

    /// Log level filter (error, warn, info, debug, trace). RUST_LOG wins.
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    /// Log output format (compact, pretty, json). Logs go to stderr.
    #[arg(long, default_value = "compact", global = true)]
    pub log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a host.json file.
    Host { file: PathBuf },
    /// Validate a function.json file.
    Function { file: PathBuf },
    /// Validate host.json and every <function>/function.json in a directory.
    App { dir: PathBuf },
    /// Print a built-in schema table (host, host-v1 or function).
    Schema { name: BuiltinSchema },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Args {
    pub fn validation_options(&self) -> ValidationOptions {
        let mut options = ValidationOptions::default();
        if self.strict {
            options = options.strict();
        }
        if self.allow_v1 {
            options = options.allow_v1();
        }
        options
    }

    pub fn override_source(&self) -> OverrideSource {
        if self.no_env {
            OverrideSource::Disabled
        } else {
            OverrideSource::Environment
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnhost_config::{Strictness, VersionPolicy};

    #[test]
    fn parses_flags_after_subcommand() {
        let args = Args::try_parse_from(["fnhost", "host", "host.json", "--strict", "--format", "json"]).unwrap();
        assert!(matches!(args.command, Command::Host { .. }));
        assert_eq!(args.format, OutputFormat::Json);
        let options = args.validation_options();
        assert_eq!(options.strictness, Strictness::Strict);
        assert_eq!(options.version_policy, VersionPolicy::V2Only);
    }

    #[test]
    fn log_format_is_selectable() {
        let args = Args::try_parse_from(["fnhost", "host", "host.json"]).unwrap();
        assert_eq!(args.log_format, LogFormat::Compact);

        let args = Args::try_parse_from(["fnhost", "--log-format", "json", "host", "host.json"]).unwrap();
        assert_eq!(args.log_format, LogFormat::Json);
        assert!(Args::try_parse_from(["fnhost", "--log-format", "xml", "host", "host.json"]).is_err());
    }

    #[test]
    fn schema_names_are_checked() {
        let args = Args::try_parse_from(["fnhost", "schema", "host-v1"]).unwrap();
        assert!(matches!(args.command, Command::Schema { name: BuiltinSchema::HostV1 }));
        assert!(Args::try_parse_from(["fnhost", "schema", "proxies"]).is_err());
    }

    #[test]
    fn no_env_disables_overrides() {
        let args = Args::try_parse_from(["fnhost", "--no-env", "--allow-v1", "app", "."]).unwrap();
        assert_eq!(args.override_source(), OverrideSource::Disabled);
        assert_eq!(args.validation_options().version_policy, VersionPolicy::AllowV1);
    }
}
