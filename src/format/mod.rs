//! Rendering of a parsed [`Feed`] into its output text.
//!
//! Two modes exist, chosen by [`OutputMode`]:
//!
//! - [`OutputMode::Json`] - a JSON document, see [`json`]
//! - [`OutputMode::Standard`] - deterministic plain text, see [`standard`]
//!
//! Rendering is pure. Writing the returned string anywhere is up to the
//! caller.

pub mod json;
pub mod standard;

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::feed::Feed;

/// Errors that can occur while rendering a feed.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The mode selector is neither `json` nor `standard`.
    #[error("Unknown output format '{0}' (expected 'json' or 'standard')")]
    UnknownMode(String),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output mode selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    Json,
    #[default]
    Standard,
}

impl OutputMode {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputMode::Json => "json",
            OutputMode::Standard => "standard",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = FormatError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let selector = s.trim();
        if selector.eq_ignore_ascii_case("json") {
            Ok(OutputMode::Json)
        } else if selector.eq_ignore_ascii_case("standard") {
            Ok(OutputMode::Standard)
        } else {
            Err(FormatError::UnknownMode(s.to_string()))
        }
    }
}

/// Rendering settings shared by both modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Keep only the first N items. `None` keeps all of them.
    pub limit: Option<usize>,
    /// Indented JSON when true, single-line JSON otherwise.
    pub pretty: bool,
    /// `chrono` strftime pattern for publication dates in standard mode.
    /// Dates that fail to parse are printed as found in the feed.
    pub date_format: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            limit: None,
            pretty: true,
            date_format: None,
        }
    }
}

/// Renders `feed` in the given mode.
pub fn render(feed: &Feed, mode: OutputMode, options: &RenderOptions) -> Result<String, FormatError> {
    match mode {
        OutputMode::Json => json::to_json(feed, options),
        OutputMode::Standard => Ok(standard::to_standard(feed, options)),
    }
}

/// Renders `feed` in the mode named by `selector`.
///
/// # Errors
///
/// [`FormatError::UnknownMode`] when `selector` is not `json` or `standard`.
pub fn render_with_selector(
    feed: &Feed,
    selector: &str,
    options: &RenderOptions,
) -> Result<String, FormatError> {
    let mode: OutputMode = selector.parse()?;
    render(feed, mode, options)
}
