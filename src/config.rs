//! Configuration for spancheck.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (verbosity, `--stats`)
//! 2. Config file (`--config` / `SPANCHECK_CONFIG`, else discovered `.spancheck/config.yaml`)
//! 3. Defaults (warnings and above, no stats)
//!
//! `RUST_LOG`, when set, overrides every logging setting.
//!
//! Config file discovery:
//! - Searches the current directory and its parents for `.spancheck/config.yaml`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Log filter used when nothing else is configured.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `spancheck=debug`
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    /// Print run statistics to stderr when the run finishes
    pub stats: Option<bool>,
}

/// Settings after merging the config file with defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub log_level: String,
    pub stats: bool,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            stats: false,
            config_file: None,
        }
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".spancheck").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve configuration, searching upwards from `start` unless `explicit` is given.
///
/// An explicit path must exist; a discovered one is optional.
pub fn resolve(explicit: Option<&Path>, start: &Path) -> Result<ResolvedConfig> {
    let config_file = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(start),
    };

    let Some(path) = config_file else {
        return Ok(ResolvedConfig::default());
    };

    let config = load_config_file(&path)?;
    Ok(ResolvedConfig {
        log_level: config
            .logging
            .level
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        stats: config.report.stats.unwrap_or(false),
        config_file: Some(path),
    })
}

/// Resolve configuration relative to the current directory.
pub fn load(explicit: Option<&Path>) -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    resolve(explicit, &cwd)
}
