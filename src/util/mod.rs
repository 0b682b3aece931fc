//! Utility functions shared by the formatter and the fetch layer.
//!
//! - **URL validation**: scheme and host checks for feed sources
//! - **Text sanitization**: terminal-safe single-line rendering of feed values
//!
//! # Examples
//!
//! ```
//! use rss_reader::util::{sanitize_line, validate_source_url, HostPolicy};
//!
//! let url = validate_source_url("https://example.com/feed.xml", HostPolicy::PublicOnly).unwrap();
//! assert_eq!(url.scheme(), "https");
//!
//! assert_eq!(sanitize_line("multi\nline"), "multi line");
//! ```

mod text;
mod url_validator;

pub use text::sanitize_line;
pub use url_validator::{validate_source_url, HostPolicy, UrlValidationError};
