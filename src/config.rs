//! Configuration file parser for ~/.config/taxform/config.toml.
//!
//! The config file is optional: a missing or empty file yields
//! `Config::default()`. Unknown keys are accepted but logged, since they are
//! usually typos.
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::rule::AppliesTo;
use crate::util::MAX_SEARCH_QUERY_LENGTH;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] io::Error),

    #[error("Config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file rejected: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Struct
// ============================================================================

/// Form configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be given.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON catalog to load. `None` uses the built-in sample catalog.
    pub catalog: Option<PathBuf>,

    /// Scope selected when the form opens ("all" or "specific").
    pub default_applies_to: AppliesTo,

    /// Search terms longer than this many characters are cut.
    pub max_search_length: usize,

    /// Render partially selected categories as `[-]` instead of `[ ]`.
    pub show_indeterminate: bool,

    /// Display columns available for an item name before truncation.
    pub name_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: None,
            default_applies_to: AppliesTo::SomeSelected,
            max_search_length: MAX_SEARCH_QUERY_LENGTH,
            show_indeterminate: true,
            name_width: 48,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 5] = [
        "catalog",
        "default_applies_to",
        "max_search_length",
        "show_indeterminate",
        "name_width",
    ];

    /// Load configuration from a TOML file.
    ///
    /// An absent file is not an error: the form runs on defaults. Files over
    /// the size limit and malformed TOML are.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match Self::read_capped(path) {
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file absent, using defaults");
                return Ok(Self::default());
            }
            other => other?,
        };

        let config = Self::from_toml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            catalog = ?config.catalog,
            "Loaded configuration"
        );
        Ok(config)
    }

    fn read_capped(path: &Path) -> Result<String, ConfigError> {
        let size = std::fs::metadata(path)?.len();
        if size > Self::MAX_FILE_SIZE {
            return Err(ConfigError::TooLarge(format!(
                "{} bytes exceeds the {} byte limit",
                size,
                Self::MAX_FILE_SIZE
            )));
        }
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse configuration from TOML text. Blank text yields defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(table) = content.parse::<toml::Table>() {
            table
                .keys()
                .filter(|key| !Self::KNOWN_KEYS.contains(&key.as_str()))
                .for_each(|key| tracing::warn!(key = %key, "Ignoring unrecognized config key"));
        }

        Ok(toml::from_str(content)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
