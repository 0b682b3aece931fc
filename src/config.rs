//! Configuration file parser for ~/.config/rss-reader/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are ignored by serde, though we log a warning for each one
//! since they are usually typos.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::feed::FetchOptions;
use crate::format::{FormatError, OutputMode, RenderOptions};
use crate::util::HostPolicy;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Struct
// ============================================================================

/// Defaults for a reader invocation. Command-line flags override these.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feed URL used when none is given on the command line.
    pub default_source: Option<String>,

    /// Output mode selector, `"standard"` or `"json"`. Validated when used,
    /// so a typo surfaces as a format error.
    pub default_format: String,

    /// Maximum number of items to print (unset = all).
    pub limit: Option<usize>,

    /// Indent JSON output.
    pub pretty_json: bool,

    /// strftime pattern for item dates in standard output.
    pub date_format: Option<String>,

    /// HTTP timeout per attempt, in seconds.
    pub timeout_seconds: u64,

    pub user_agent: String,

    /// Allow feed URLs on localhost or private networks.
    pub allow_private_hosts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_source: None,
            default_format: OutputMode::Standard.to_string(),
            limit: None,
            pretty_json: true,
            date_format: None,
            timeout_seconds: 30,
            user_agent: concat!("rss-reader/", env!("CARGO_PKG_VERSION")).to_string(),
            allow_private_hosts: false,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 8] = [
        "default_source",
        "default_format",
        "limit",
        "pretty_json",
        "date_format",
        "timeout_seconds",
        "user_agent",
        "allow_private_hosts",
    ];

    /// Default location: `$HOME/.config/rss-reader/config.toml`.
    ///
    /// `None` when `HOME` is unset.
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(
            PathBuf::from(home)
                .join(".config")
                .join("rss-reader")
                .join("config.toml"),
        )
    }

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::debug!(format = %config.default_format, "Loaded configuration");
        Ok(config)
    }

    /// The configured output mode.
    ///
    /// # Errors
    ///
    /// [`FormatError::UnknownMode`] when `default_format` is not a known mode.
    pub fn output_mode(&self) -> Result<OutputMode, FormatError> {
        self.default_format.parse()
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            limit: self.limit,
            pretty: self.pretty_json,
            date_format: self.date_format.clone(),
        }
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(self.timeout_seconds),
            host_policy: if self.allow_private_hosts {
                HostPolicy::AllowPrivate
            } else {
                HostPolicy::PublicOnly
            },
            ..FetchOptions::default()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
