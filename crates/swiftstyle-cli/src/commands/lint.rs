//! Lint command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::ExitCode;

use crate::OutputFormat;

/// Runs the lint command.
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

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, format)?;

    if result.has_violations_at(threshold) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
