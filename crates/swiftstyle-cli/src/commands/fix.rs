//! Fix command implementation.
//!
//! Applies fixes in one pass, then re-lints and reports what remains.
//! A file whose fixes conflict or fail to converge is left untouched
//! and reported; other files still get their fixes.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::ExitCode;

use crate::OutputFormat;

/// Runs the fix command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    rules_filter: Option<String>,
    exclude: Vec<String>,
    fail_on: Option<String>,
    explicit_config: Option<&Path>,
) -> Result<ExitCode> {
    let config = super::load_config(path, explicit_config)?;
    let threshold = super::fail_on_severity(&config, fail_on.as_deref())?;
    let analyzer = super::build_analyzer(path, config, rules_filter.as_deref(), exclude)?;

    let report = analyzer.fix().context("Fix run failed")?;

    println!(
        "Applied {} fix(es) in {} file(s)",
        report.fixes_applied, report.files_fixed
    );
    for (file, reason) in &report.failures {
        eprintln!("skipped {}: {reason}", file.display());
    }

    // Report whatever fixes could not resolve.
    let result = analyzer.analyze().context("Re-analysis failed")?;
    super::output::print(&result, format)?;

    if result.has_violations_at(threshold) || !report.failures.is_empty() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
