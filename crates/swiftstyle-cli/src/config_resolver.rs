//! Configuration loading with project and global fallback.
//!
//! `load` walks a fixed priority order and parses the first candidate
//! file it finds:
//!
//! 1. `--config <path>` (explicit; must exist and parse)
//! 2. `{project}/swiftstyle.toml`, then `{project}/.swiftstyle.toml`
//! 3. `$SWIFTSTYLE_CONFIG_DIR/config.toml` or `~/.swiftstyle/config.toml`
//! 4. built-in defaults
//!
//! Once a candidate file exists the fallback chain stops there: a file
//! that fails to parse is fatal at every level, never skipped over.

use std::path::{Path, PathBuf};
use swiftstyle_core::{Config, ConfigError};

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config` flag.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Loaded from the global config directory (`~/.swiftstyle/`).
    Global(PathBuf),
    /// No config file found; built-in defaults.
    BuiltIn,
}

impl ConfigSource {
    /// Returns the file the configuration was parsed from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::BuiltIn => None,
        }
    }
}

/// A parsed configuration together with its provenance.
#[derive(Debug)]
pub struct ResolvedConfig {
    /// The parsed (or default) configuration.
    pub config: Config,
    /// Which candidate supplied it.
    pub source: ConfigSource,
}

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["swiftstyle.toml", ".swiftstyle.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves and parses the configuration.
///
/// # Errors
///
/// Returns [`ConfigError`] when the selected file cannot be read or
/// parsed, including a missing `--config` path.
pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
    load_inner(project_dir, explicit, global_config_dir())
}

/// Testable core: takes `global_dir` as a parameter to avoid env var races.
fn load_inner(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> Result<ResolvedConfig, ConfigError> {
    if let Some(p) = explicit {
        return Ok(ResolvedConfig {
            config: Config::from_file(p)?,
            source: ConfigSource::Explicit(p.to_path_buf()),
        });
    }

    for name in PROJECT_CONFIG_NAMES {
        let candidate = project_dir.join(name);
        if candidate.exists() {
            tracing::debug!("Project config: {}", candidate.display());
            return Ok(ResolvedConfig {
                config: Config::from_file(&candidate)?,
                source: ConfigSource::Project(candidate),
            });
        }
    }

    if let Some(dir) = global_dir {
        let candidate = dir.join(GLOBAL_CONFIG_NAME);
        if candidate.exists() {
            tracing::debug!("Global config: {}", candidate.display());
            return Ok(ResolvedConfig {
                config: Config::from_file(&candidate)?,
                source: ConfigSource::Global(candidate),
            });
        }
    }

    Ok(ResolvedConfig {
        config: Config::default(),
        source: ConfigSource::BuiltIn,
    })
}

/// Returns the global config directory path.
///
/// `$SWIFTSTYLE_CONFIG_DIR` overrides `~/.swiftstyle/` for tests and CI.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("SWIFTSTYLE_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".swiftstyle"))
}
