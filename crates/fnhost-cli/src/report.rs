//! Rendering of validation outcomes for the terminal or for tools.

use crate::cli::OutputFormat;
use fnhost_common::{pluralize, Result};
use fnhost_config::{ConfigError, ErrorRecord, FileReport};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write as _;

/// Machine-readable summary of one file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileSummary<'a> {
    path: String,
    kind: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<String>,
    errors: Vec<ErrorRecord>,
    ignored: Vec<String>,
    overrides: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    normalized: Option<&'a Value>,
}

fn summarize(report: &FileReport, print_normalized: bool) -> FileSummary<'_> {
    let mut summary = FileSummary {
        path: report.path.display().to_string(),
        kind: report.kind.to_string(),
        valid: report.is_valid(),
        schema_version: None,
        failure: None,
        errors: Vec::new(),
        ignored: Vec::new(),
        overrides: report.overrides.iter().map(|o| o.path.to_string()).collect(),
        normalized: None,
    };
    match &report.outcome {
        Ok(document) => {
            summary.schema_version = document.schema_version();
            summary.ignored = document.ignored().iter().map(ToString::to_string).collect();
            if print_normalized {
                summary.normalized = Some(document.value());
            }
        }
        Err(ConfigError::Invalid(errors)) => {
            summary.errors = errors.iter().map(fnhost_config::ValidationError::record).collect();
        }
        Err(other) => summary.failure = Some(other.to_string()),
    }
    summary
}

/// Render the reports in the requested format.
///
/// # Errors
///
/// Returns a serialization error if JSON output cannot be produced.
pub fn render<'a>(
    reports: impl IntoIterator<Item = &'a FileReport>,
    format: OutputFormat,
    print_normalized: bool,
) -> Result<String> {
    let summaries: Vec<FileSummary<'_>> = reports
        .into_iter()
        .map(|report| summarize(report, print_normalized))
        .collect();
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Text => render_text(&summaries),
    }
}

fn render_text(summaries: &[FileSummary<'_>]) -> Result<String> {
    let mut out = String::new();
    let mut invalid = 0;

    for summary in summaries {
        if summary.valid {
            let version = summary
                .schema_version
                .map(|v| format!(" {v}"))
                .unwrap_or_default();
            let _ = writeln!(out, "ok      {} ({}{version})", summary.path, summary.kind);
        } else {
            invalid += 1;
            let problems = if summary.failure.is_some() {
                "unreadable".to_string()
            } else {
                pluralize(summary.errors.len(), "error")
            };
            let _ = writeln!(out, "invalid {} ({problems})", summary.path);
        }

        if let Some(failure) = &summary.failure {
            let _ = writeln!(out, "  - {failure}");
        }
        for error in &summary.errors {
            let _ = writeln!(out, "  - {}", error.message);
        }
        for path in &summary.overrides {
            let _ = writeln!(out, "  ~ {path} set from environment");
        }
        for path in &summary.ignored {
            let _ = writeln!(out, "  ! {path} is not declared and was ignored");
        }
        if let Some(value) = summary.normalized {
            for line in serde_json::to_string_pretty(value)?.lines() {
                let _ = writeln!(out, "    {line}");
            }
        }
    }

    let _ = writeln!(
        out,
        "{} checked, {} invalid",
        pluralize(summaries.len(), "file"),
        invalid
    );
    Ok(out)
}
