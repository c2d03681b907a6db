//! Configuration validation command

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::{ConfigLoader, LoadWarning};
use crate::error::{ConfigError, SeqrecError, Severity, ValidationIssue};

/// Validation outcome for one file.
#[derive(Debug, Serialize)]
struct FileReport {
    file: PathBuf,
    valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Validates every file, prints a report, and fails if any file is invalid.
///
/// # Errors
///
/// Returns the first file's configuration error. With `--strict`, a file
/// with warnings fails with those warnings as validation errors.
pub fn run(args: &ValidateArgs) -> Result<(), SeqrecError> {
    let loader = ConfigLoader::with_defaults();
    let mut reports = Vec::with_capacity(args.files.len());
    let mut first_error: Option<ConfigError> = None;

    for path in &args.files {
        tracing::info!(file = %path.display(), "validating configuration");

        let report = match loader.load(path) {
            Ok(result) if args.strict && !result.warnings.is_empty() => {
                let warnings: Vec<String> =
                    result.warnings.iter().map(ToString::to_string).collect();
                first_error.get_or_insert_with(|| ConfigError::ValidationError {
                    path: path.display().to_string(),
                    errors: result.warnings.into_iter().map(strict_issue).collect(),
                });
                FileReport {
                    file: path.clone(),
                    valid: false,
                    errors: Vec::new(),
                    warnings,
                }
            }
            Ok(result) => FileReport {
                file: path.clone(),
                valid: true,
                errors: Vec::new(),
                warnings: result.warnings.iter().map(ToString::to_string).collect(),
            },
            Err(e) => {
                let errors = match &e {
                    ConfigError::ValidationError { errors, .. } => {
                        errors.iter().map(ToString::to_string).collect()
                    }
                    other => vec![other.to_string()],
                };
                first_error.get_or_insert(e);
                FileReport {
                    file: path.clone(),
                    valid: false,
                    errors,
                    warnings: Vec::new(),
                }
            }
        };
        reports.push(report);
    }

    print_reports(&reports, args.format)?;

    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn strict_issue(warning: LoadWarning) -> ValidationIssue {
    ValidationIssue {
        path: warning.location.unwrap_or_default(),
        message: warning.message,
        severity: Severity::Error,
    }
}

fn print_reports(reports: &[FileReport], format: OutputFormat) -> Result<(), SeqrecError> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(reports)?);
        }
        OutputFormat::Human => {
            for report in reports {
                let status = if report.valid { "ok" } else { "FAILED" };
                println!("{}: {status}", report.file.display());
                for error in &report.errors {
                    println!("  {error}");
                }
                for warning in &report.warnings {
                    println!("  warning: {warning}");
                }
            }
        }
    }
    Ok(())
}
