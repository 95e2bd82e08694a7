//! fnhost - validates host.json and function.json files.

mod cli;
mod report;

use clap::Parser;
use cli::{Args, Command, OutputFormat};
use fnhost_common::{init_logging, FnHostError, LoggingConfig};
use fnhost_config::{BuiltinSchema, ConfigError, ConfigLoader, ConfigValidator, FileReport};
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    init_logging(&LoggingConfig {
        level: args.log_level.clone(),
        format: args.log_format,
        ansi: std::io::stderr().is_terminal(),
        include_targets: false,
    })?;

    let valid = run(&args).await?;
    Ok(if valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Execute the command, returning whether every file was valid.
async fn run(args: &Args) -> fnhost_common::Result<bool> {
    let validator = ConfigValidator::new(args.validation_options()).map_err(ConfigError::from)?;
    let loader = ConfigLoader::new(validator).with_overrides(args.override_source());

    let reports: Vec<FileReport> = match &args.command {
        Command::Host { file } => vec![loader.check_host(file).await],
        Command::Function { file } => vec![loader.check_function(file).await],
        Command::App { dir } => {
            let app = loader.load_function_app(dir).await.map_err(FnHostError::from)?;
            std::iter::once(app.host).chain(app.functions).collect()
        }
        Command::Schema { name } => {
            print_schema(*name, args.format)?;
            return Ok(true);
        }
    };

    let valid = reports.iter().all(FileReport::is_valid);
    info!(files = reports.len(), valid, "validation finished");
    print!("{}", report::render(&reports, args.format, args.print_normalized)?);
    Ok(valid)
}

/// Print a built-in table: as written for text output, as JSON otherwise.
fn print_schema(schema: BuiltinSchema, format: OutputFormat) -> fnhost_common::Result<()> {
    let text = match format {
        OutputFormat::Text => schema.source().to_string(),
        OutputFormat::Json => {
            let table = schema.table().map_err(ConfigError::from)?;
            serde_json::to_string_pretty(&table)?
        }
    };
    println!("{}", text.trim_end());
    Ok(())
}
