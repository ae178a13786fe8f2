//! Core analyzer orchestrating lint execution and fix application.
//!
//! Each file's lex → build → evaluate pipeline is independent and runs
//! on a rayon worker; the only shared state is the read-only rule set,
//! constructed once and never mutated afterwards. Aggregation (dedup +
//! sort) is a single-threaded join point per file, so the violation set
//! is identical regardless of execution order.

use crate::config::Config;
use crate::directives::{check_disable, DisableCheck};
use crate::fixer::{self, FixError, PlannedFix};
use crate::lexer::tokenize;
use crate::model;
use crate::rule::{FileAnalysis, FileContext, Rule, RuleBox};
use crate::types::{Category, LintResult, Location, Severity, Suggestion, Violation};

use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Reserved pseudo-rule for files whose scope nesting cannot be built.
pub const UNPARSEABLE_CODE: &str = "SW000";
/// Name of the unparseable-source pseudo-rule.
pub const UNPARSEABLE_NAME: &str = "unparseable-source";

/// Reserved diagnostic for a rule that failed during evaluation.
pub const RULE_FAILURE_CODE: &str = "SW099";
/// Name of the rule-failure diagnostic.
pub const RULE_FAILURE_NAME: &str = "rule-evaluation-error";

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Cooperative cancellation for a run.
///
/// Cancelling stops dispatching files that have not started; results for
/// already-completed files are retained, so partial output is
/// well-defined, never corrupted.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a new, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    include_patterns: Vec<String>,
    config: Option<Config>,
    cancel: Option<CancelToken>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds an include glob pattern.
    #[must_use]
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Attaches a cancellation token.
    #[must_use]
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be resolved.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let root = self
            .root
            .or_else(|| self.config.as_ref().map(|c| c.analyzer.root.clone()))
            .unwrap_or_else(|| PathBuf::from("."));

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        if let Some(ref config) = self.config {
            exclude_patterns.extend(config.analyzer.exclude.clone());
        }
        if exclude_patterns.is_empty() {
            exclude_patterns.extend([
                "**/.build/**".to_string(),
                "**/DerivedData/**".to_string(),
            ]);
        }

        Ok(Analyzer {
            root,
            rules: self.rules,
            exclude_patterns,
            include_patterns: self.include_patterns,
            config: self.config.unwrap_or_default(),
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

/// The main analyzer. Immutable after construction, safe for concurrent
/// read access from any number of workers.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    include_patterns: Vec<String>,
    config: Config,
    cancel: CancelToken,
}

/// Outcome of fixing one file's source in memory.
#[derive(Debug)]
pub struct FixOutcome {
    /// The rewritten source, equal to the input when nothing applied.
    pub content: String,
    /// Number of fixes applied.
    pub applied: usize,
}

/// Result of a batch fix run.
#[derive(Debug, Default)]
pub struct FixReport {
    /// Files whose content was rewritten.
    pub files_fixed: usize,
    /// Total fixes applied across all files.
    pub fixes_applied: usize,
    /// Per-file failures; the named files were left untouched.
    pub failures: Vec<(PathBuf, String)>,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyzes all files and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails. A single file's read or
    /// build failure degrades to a diagnostic, never aborts the batch.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let per_file: Vec<Vec<Violation>> = self.run_parallel(|| {
            files
                .par_iter()
                .filter_map(|path| {
                    if self.cancel.is_cancelled() {
                        return None;
                    }
                    Some(self.analyze_file(path))
                })
                .collect()
        });

        let mut result = LintResult::new();
        result.files_checked = per_file.len();
        for violations in per_file {
            result.violations.extend(violations);
        }

        // Deterministic batch order: file, then the per-file order.
        result.violations.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
                .then(a.code.cmp(&b.code))
        });

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Applies available fixes to every discovered file, re-lints each,
    /// and rewrites only files whose fixes applied cleanly and converged.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails. Per-file fix failures
    /// are collected in the report; the files are left untouched.
    pub fn fix(&self) -> Result<FixReport, AnalyzerError> {
        let files = self.discover_files()?;
        let mut report = FixReport::default();

        for path in &files {
            if self.cancel.is_cancelled() {
                break;
            }
            let content = match std::fs::read_to_string(path) {
                Ok(c) => c,
                Err(e) => {
                    warn!("Skipping unreadable file {}: {e}", path.display());
                    report.failures.push((path.clone(), e.to_string()));
                    continue;
                }
            };

            match self.fix_source(path, &content) {
                Ok(outcome) if outcome.applied > 0 => {
                    if let Err(e) = std::fs::write(path, &outcome.content) {
                        report.failures.push((path.clone(), e.to_string()));
                        continue;
                    }
                    report.files_fixed += 1;
                    report.fixes_applied += outcome.applied;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Fix skipped for {}: {e}", path.display());
                    report.failures.push((path.clone(), e.to_string()));
                }
            }
        }

        Ok(report)
    }

    /// Fixes one file's source in memory: analyze, apply the batch of
    /// non-overlapping replacements, re-analyze, verify convergence.
    /// Fixes are applied at most once per run; there is no fix-point loop.
    ///
    /// # Errors
    ///
    /// Returns [`FixError`] when fixes conflict or fail to converge. The
    /// caller must not rewrite the file in that case.
    pub fn fix_source(&self, path: &Path, content: &str) -> Result<FixOutcome, FixError> {
        let violations = self.analyze_source(path, content);
        let planned: Vec<PlannedFix> = fixer::plan_fixes(&violations);
        if planned.is_empty() {
            return Ok(FixOutcome {
                content: content.to_string(),
                applied: 0,
            });
        }

        let new_content = fixer::apply_fixes(content, &planned)?;
        let reanalyzed = self.analyze_source(path, &new_content);
        fixer::check_convergence(&planned, &reanalyzed)?;

        Ok(FixOutcome {
            content: new_content,
            applied: planned.len(),
        })
    }

    /// Analyzes one file's source text. Deterministic for identical
    /// inputs: rules run independently against the same frozen analysis,
    /// results are deduplicated by `(code, range)` and sorted by
    /// `(line, column, code)`.
    #[must_use]
    pub fn analyze_source(&self, path: &Path, content: &str) -> Vec<Violation> {
        let ctx = FileContext::new(path, content, &self.root);
        let tokens = tokenize(content);

        let model = match model::build(content, &tokens) {
            Ok(model) => model,
            Err(e) => {
                let (line, column) = match &e {
                    model::BuildError::UnbalancedDelimiters { line, column, .. } => {
                        (*line, *column)
                    }
                };
                return vec![Violation::new(
                    UNPARSEABLE_CODE,
                    UNPARSEABLE_NAME,
                    Category::FileStructure,
                    Severity::Error,
                    Location::new(ctx.relative_path.clone(), line, column),
                    format!("file could not be structurally analyzed: {e}"),
                )];
            }
        };

        let analysis = FileAnalysis { tokens, model };
        let mut violations = Vec::new();

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            // One misbehaving rule never suppresses the others.
            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                rule.check(&ctx, &analysis)
            }));

            match outcome {
                Ok(mut rule_violations) => {
                    if let Some(severity) = self.config.rule_severity(rule.name()) {
                        for v in &mut rule_violations {
                            v.severity = severity;
                        }
                    }
                    violations.extend(self.apply_directives(
                        &ctx,
                        rule.requires_disable_reason(),
                        rule_violations,
                    ));
                }
                Err(_) => {
                    warn!("Rule {} failed during evaluation", rule.name());
                    violations.push(Violation::new(
                        RULE_FAILURE_CODE,
                        RULE_FAILURE_NAME,
                        Category::Practices,
                        Severity::Warning,
                        Location::new(ctx.relative_path.clone(), 1, 1),
                        format!(
                            "rule `{}` failed during evaluation; remaining rules continued",
                            rule.name()
                        ),
                    ));
                }
            }
        }

        let mut seen: HashSet<(String, usize, usize)> = HashSet::new();
        violations.retain(|v| seen.insert(v.dedup_key()));
        violations.sort_by(|a, b| {
            a.location
                .line
                .cmp(&b.location.line)
                .then(a.location.column.cmp(&b.location.column))
                .then(a.code.cmp(&b.code))
        });
        violations
    }

    /// Filters violations through inline disable directives. A directive
    /// without the required reason downgrades to a warning diagnostic
    /// rather than silently passing.
    fn apply_directives(
        &self,
        ctx: &FileContext<'_>,
        requires_reason: bool,
        violations: Vec<Violation>,
    ) -> Vec<Violation> {
        violations
            .into_iter()
            .filter_map(|v| {
                match check_disable(ctx.content, v.location.line, &v.rule) {
                    DisableCheck::Active => Some(v),
                    DisableCheck::Disabled { reason: Some(_) } => None,
                    DisableCheck::Disabled { reason: None } => {
                        if requires_reason {
                            let mut diag = v;
                            diag.severity = Severity::Warning;
                            diag.message = format!(
                                "disable directive for `{}` is missing a required reason",
                                diag.rule
                            );
                            diag.suggestion = Some(Suggestion::new(
                                "Add reason=\"...\" explaining why this exception is necessary",
                            ));
                            Some(diag)
                        } else {
                            None
                        }
                    }
                }
            })
            .collect()
    }

    fn analyze_file(&self, path: &Path) -> Vec<Violation> {
        debug!("Analyzing: {}", path.display());
        match std::fs::read_to_string(path) {
            Ok(content) => self.analyze_source(path, &content),
            Err(e) => {
                warn!("Failed to read {}: {e}", path.display());
                let relative = path
                    .strip_prefix(&self.root)
                    .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);
                vec![Violation::new(
                    UNPARSEABLE_CODE,
                    UNPARSEABLE_NAME,
                    Category::FileStructure,
                    Severity::Error,
                    Location::new(relative, 1, 1),
                    format!("file could not be read: {e}"),
                )]
            }
        }
    }

    /// Runs `f` on a bounded rayon pool when `analyzer.parallelism` is
    /// set, otherwise on the global pool.
    fn run_parallel<T: Send>(&self, f: impl FnOnce() -> T + Send) -> T {
        let bounded = match self.config.analyzer.parallelism {
            Some(n) if n > 0 => rayon::ThreadPoolBuilder::new().num_threads(n).build().ok(),
            _ => None,
        };
        match bounded {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }

    /// Discovers all Swift source files to analyze.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let patterns = if self.include_patterns.is_empty() {
            vec![format!("{}/**/*.swift", self.root.display())]
        } else {
            self.include_patterns
                .iter()
                .map(|p| format!("{}/{p}", self.root.display()))
                .collect()
        };

        let mut files = Vec::new();
        for pattern in &patterns {
            for entry in glob::glob(pattern)? {
                let path = entry.map_err(|e| AnalyzerError::Io(e.into_error()))?;
                if self.should_exclude(&path) {
                    debug!("Excluding: {}", path.display());
                    continue;
                }
                files.push(path);
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude_patterns {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
            }

            // Also check as substring for patterns like "**/Pods/**".
            let normalized_pattern = pattern.replace("**", "");
            if !normalized_pattern.is_empty() && path_str.contains(&normalized_pattern) {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    struct PanickingRule;

    impl Rule for PanickingRule {
        fn name(&self) -> &'static str {
            "panicking-rule"
        }
        fn code(&self) -> &'static str {
            "TEST900"
        }
        fn category(&self) -> Category {
            Category::Practices
        }
        fn check(&self, _ctx: &FileContext, _analysis: &FileAnalysis) -> Vec<Violation> {
            panic!("rule bug");
        }
    }

    struct CountingRule;

    impl Rule for CountingRule {
        fn name(&self) -> &'static str {
            "counting-rule"
        }
        fn code(&self) -> &'static str {
            "TEST901"
        }
        fn category(&self) -> Category {
            Category::Formatting
        }
        fn check(&self, ctx: &FileContext, analysis: &FileAnalysis) -> Vec<Violation> {
            analysis
                .model
                .declarations
                .iter()
                .map(|d| {
                    Violation::new(
                        self.code(),
                        self.name(),
                        self.category(),
                        Severity::Warning,
                        Location::new(ctx.relative_path.clone(), d.line, d.column)
                            .with_span(d.offset, d.len),
                        format!("declaration `{}`", d.name),
                    )
                })
                .collect()
        }
    }

    fn analyzer(rules: Vec<RuleBox>) -> Analyzer {
        let mut builder = Analyzer::builder().root(".");
        for r in rules {
            builder = builder.rule_box(r);
        }
        builder.build().expect("build analyzer")
    }

    #[test]
    fn unbalanced_source_degrades_to_pseudo_rule() {
        let a = analyzer(vec![Box::new(CountingRule)]);
        let violations = a.analyze_source(Path::new("bad.swift"), "class A { func f() {");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, UNPARSEABLE_CODE);
        assert_eq!(violations[0].severity, Severity::Error);
    }

    #[test]
    fn panicking_rule_is_isolated() {
        let a = analyzer(vec![Box::new(PanickingRule), Box::new(CountingRule)]);
        let violations = a.analyze_source(Path::new("ok.swift"), "class A {}");
        assert!(violations.iter().any(|v| v.code == RULE_FAILURE_CODE));
        assert!(violations.iter().any(|v| v.code == "TEST901"));
    }

    #[test]
    fn analysis_is_deterministic() {
        let a = analyzer(vec![Box::new(CountingRule)]);
        let src = "class A { var x: Int\nvar y: Int }";
        let first = a.analyze_source(Path::new("a.swift"), src);
        let second = a.analyze_source(Path::new("a.swift"), src);
        let key = |vs: &[Violation]| -> Vec<(String, usize, usize)> {
            vs.iter().map(Violation::dedup_key).collect()
        };
        assert_eq!(key(&first), key(&second));
    }

    #[test]
    fn duplicate_rule_registrations_dedup() {
        let a = analyzer(vec![Box::new(CountingRule), Box::new(CountingRule)]);
        let violations = a.analyze_source(Path::new("a.swift"), "class A {}");
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn disabled_rule_is_skipped() {
        let mut config = Config::default();
        config.rules.insert(
            "counting-rule".to_string(),
            crate::config::RuleConfig {
                enabled: Some(false),
                ..Default::default()
            },
        );
        let a = Analyzer::builder()
            .root(".")
            .config(config)
            .rule(CountingRule)
            .build()
            .expect("build analyzer");
        assert!(a.analyze_source(Path::new("a.swift"), "class A {}").is_empty());
    }

    #[test]
    fn severity_override_applies() {
        let mut config = Config::default();
        config.rules.insert(
            "counting-rule".to_string(),
            crate::config::RuleConfig {
                severity: Some(Severity::Info),
                ..Default::default()
            },
        );
        let a = Analyzer::builder()
            .root(".")
            .config(config)
            .rule(CountingRule)
            .build()
            .expect("build analyzer");
        let violations = a.analyze_source(Path::new("a.swift"), "class A {}");
        assert_eq!(violations[0].severity, Severity::Info);
    }

    #[test]
    fn cancelled_token_skips_files() {
        let token = CancelToken::new();
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn exclude_patterns() {
        let a = Analyzer::builder()
            .root(".")
            .exclude("**/Pods/**")
            .exclude("**/.build/**")
            .build()
            .expect("build analyzer");
        assert!(a.should_exclude(Path::new("/app/Pods/Lib/File.swift")));
        assert!(a.should_exclude(Path::new("/app/.build/debug/File.swift")));
        assert!(!a.should_exclude(Path::new("/app/Sources/File.swift")));
    }
}
