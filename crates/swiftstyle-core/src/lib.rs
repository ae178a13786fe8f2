//! # swiftstyle-core
//!
//! Core framework for mechanical Swift style checking.
//!
//! This crate provides the foundational traits and types for building
//! style linters over Swift source. It includes:
//!
//! - [`Rule`] trait for per-file rules over a frozen token stream and
//!   structural model
//! - [`Analyzer`] for orchestrating lint execution and fix application
//! - [`Violation`] for representing lint findings
//! - [`Config`] for TOML-driven rule parameters
//!
//! ## Example
//!
//! ```ignore
//! use swiftstyle_core::{Analyzer, Rule, Severity};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./Sources")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! result.print_report();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod directives;
mod fixer;
mod rule;
mod types;

/// Tokenizer for Swift source text.
pub mod lexer;
/// Structural model built from the token stream.
pub mod model;

pub use analyzer::{
    Analyzer, AnalyzerBuilder, AnalyzerError, CancelToken, FixOutcome, FixReport,
    RULE_FAILURE_CODE, RULE_FAILURE_NAME, UNPARSEABLE_CODE, UNPARSEABLE_NAME,
};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig, StyleConfig};
pub use directives::{check_disable, DisableCheck};
pub use fixer::{apply_fixes, check_convergence, plan_fixes, FixError, PlannedFix};
pub use rule::{FileAnalysis, FileContext, Rule, RuleBox};
pub use types::{
    Category, LintResult, Location, Replacement, Severity, Suggestion, Violation,
    ViolationDiagnostic,
};
