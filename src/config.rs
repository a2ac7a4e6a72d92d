//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--sort`, `--depth`, `--filter`, `--log-level`)
//! 2. Explicit `--config <file>`
//! 3. `$FTM_CONFIG` environment variable (path to config file)
//! 4. Project-local `.ftm.toml` in the current working directory
//! 5. Global `~/.config/ftm/config.toml`
//! 6. Built-in defaults

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::fs::sort::SortCriteria;
use crate::log_level::LogLevel;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Starting directory (overridden by CLI positional arg).
    pub default_path: Option<String>,
    /// One of "debug", "info", "warn", "error", "silent".
    pub log_level: Option<String>,
}

/// Tree settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TreeConfig {
    /// Sort order, e.g. "type-then-name", "extension", "size".
    pub sort_by: Option<String>,
    /// How many directory levels to load below the root.
    pub expand_depth: Option<usize>,
}

/// Extension filter applied at startup.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FilterConfig {
    /// Extensions to keep, with the leading dot (".rs").
    pub extensions: Option<Vec<String>>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub tree: TreeConfig,
    pub filter: FilterConfig,
}

/// Default number of levels loaded below the root.
pub const DEFAULT_EXPAND_DEPTH: usize = 1;

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path; that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("FTM_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".ftm.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("ftm").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
///
/// Config is loaded before the subscriber is installed, so the warning
/// cannot go through `tracing`.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                default_path: other
                    .general
                    .default_path
                    .clone()
                    .or(self.general.default_path),
                log_level: other.general.log_level.clone().or(self.general.log_level),
            },
            tree: TreeConfig {
                sort_by: other.tree.sort_by.clone().or(self.tree.sort_by),
                expand_depth: other.tree.expand_depth.or(self.tree.expand_depth),
            },
            filter: FilterConfig {
                extensions: other
                    .filter
                    .extensions
                    .clone()
                    .or(self.filter.extensions),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Lowest priority first so that higher ones overwrite.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Configured start directory, if any.
    pub fn default_path(&self) -> Option<&Path> {
        self.general.default_path.as_deref().map(Path::new)
    }

    pub fn log_level(&self) -> Result<LogLevel> {
        match self.general.log_level.as_deref() {
            None => Ok(LogLevel::default()),
            Some(s) => LogLevel::from_str(s, true)
                .map_err(|_| AppError::Config(format!("unknown log level '{}'", s))),
        }
    }

    pub fn sort_criteria(&self) -> Result<SortCriteria> {
        match self.tree.sort_by.as_deref() {
            None => Ok(SortCriteria::default()),
            Some(s) => s.parse(),
        }
    }

    pub fn expand_depth(&self) -> usize {
        self.tree.expand_depth.unwrap_or(DEFAULT_EXPAND_DEPTH)
    }

    /// Extensions to filter on. Empty means no filter.
    pub fn filter_extensions(&self) -> &[String] {
        self.filter.extensions.as_deref().unwrap_or(&[])
    }
}
