//! Command-line RSS reader core.
//!
//! Raw RSS XML goes through [`feed::parse_feed`] into a canonical
//! [`feed::Feed`], which [`format::render`] turns into plain text or JSON.
//! Both steps are pure; fetching ([`feed::fetch_feed`]) and configuration
//! ([`config::Config`]) sit around them for the binary.
//!
//! ```
//! use rss_reader::feed::parse_feed;
//! use rss_reader::format::{render, OutputMode, RenderOptions};
//!
//! let feed = parse_feed("<rss><channel><title>T</title></channel></rss>").unwrap();
//! let text = render(&feed, OutputMode::Standard, &RenderOptions::default()).unwrap();
//! assert_eq!(text, "Feed: T\nLink:");
//! ```

pub mod config;
pub mod feed;
pub mod format;
pub mod util;
