//! Configuration management for heudiconv
//!
//! Settings are loaded from environment variables with sensible defaults.
//!
//! # Environment Variables
//!
//! - `HEUDICONV_HEURISTICS_DIR`: Directory scanned for registered heuristics -
//!   default: the heuristics bundled with this crate ([`HEURISTICS_PATH`])
//! - `HEUDICONV_LOG_LEVEL`: Logging level - default: "info"
//! - `HEUDICONV_LOG_JSON`: Emit JSON log records (true|false) - default: "false"
//!
//! # Example
//!
//! ```no_run
//! use heudiconv::HeudiconvConfig;
//!
//! let config = HeudiconvConfig::default();
//! config.validate().expect("Invalid configuration");
//! println!("{}", config);
//! ```

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Install location of the heuristics shipped with the crate
pub const HEURISTICS_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/heuristics");

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_JSON: bool = false;

/// Directory holding the bundled heuristics
pub fn bundled_heuristics_dir() -> &'static Path {
    Path::new(HEURISTICS_PATH)
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Heuristics directory does not exist
    #[error("Heuristics directory not found: {0}")]
    HeuristicsDirMissing(PathBuf),

    /// Unknown logging level
    #[error("Invalid log level: {0}. Valid options: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Runtime configuration for heuristic discovery and logging
#[derive(Debug, Clone)]
pub struct HeudiconvConfig {
    /// Directory scanned by the heuristic registry
    pub heuristics_dir: PathBuf,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Emit JSON log records instead of human readable lines
    pub log_json: bool,
}

impl Default for HeudiconvConfig {
    /// Loads `HEUDICONV_*` environment variables. Each unset or unparsable
    /// value falls back to its own default without affecting the others.
    fn default() -> Self {
        Self {
            heuristics_dir: heuristics_dir_from_env(),
            log_level: log_level_from_env(),
            log_json: log_json_from_env().unwrap_or(DEFAULT_LOG_JSON),
        }
    }
}

impl HeudiconvConfig {
    /// Configuration that ignores the environment entirely
    pub fn builtin() -> Self {
        Self {
            heuristics_dir: bundled_heuristics_dir().to_path_buf(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_json: DEFAULT_LOG_JSON,
        }
    }

    /// Strict variant of `Default`: unparsable values are reported instead of
    /// silently replaced.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            heuristics_dir: heuristics_dir_from_env(),
            log_level: log_level_from_env(),
            log_json: log_json_from_env()?,
        })
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns the first of [`issues`](Self::issues).
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.issues().into_iter().next() {
            Some(issue) => Err(issue),
            None => Ok(()),
        }
    }

    /// Every problem with the configuration: an unknown log level and a
    /// missing heuristics directory are reported independently.
    pub fn issues(&self) -> Vec<ConfigError> {
        let mut issues = Vec::new();

        if !matches!(
            self.log_level.as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            issues.push(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }

        if !self.heuristics_dir.is_dir() {
            issues.push(ConfigError::HeuristicsDirMissing(
                self.heuristics_dir.clone(),
            ));
        }

        issues
    }
}

fn heuristics_dir_from_env() -> PathBuf {
    env::var("HEUDICONV_HEURISTICS_DIR")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| bundled_heuristics_dir().to_path_buf())
}

fn log_level_from_env() -> String {
    env::var("HEUDICONV_LOG_LEVEL")
        .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
        .to_lowercase()
}

fn log_json_from_env() -> Result<bool, ConfigError> {
    match env::var("HEUDICONV_LOG_JSON") {
        Ok(v) => v.parse::<bool>().map_err(|e| ConfigError::ParseError {
            field: "HEUDICONV_LOG_JSON".to_string(),
            error: e.to_string(),
        }),
        Err(_) => Ok(DEFAULT_LOG_JSON),
    }
}

impl fmt::Display for HeudiconvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Heudiconv Configuration:")?;
        writeln!(f, "  Heuristics Dir: {}", self.heuristics_dir.display())?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Log JSON: {}", self.log_json)?;
        Ok(())
    }
}
