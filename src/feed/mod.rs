//! Feed retrieval and parsing.
//!
//! - **Model** ([`types`]): the canonical [`Feed`] / [`Item`] records
//! - **Parsing** ([`parser`]): RSS 2.0 XML text into a [`Feed`], built on
//!   `quick-xml`'s pull reader
//! - **Fetching** ([`fetcher`]): HTTP retrieval of the raw document with
//!   timeout, retry and size limits
//!
//! Parsing is pure and synchronous. Only the fetcher touches the network.
//!
//! # Example
//!
//! ```
//! use rss_reader::feed::parse_feed;
//!
//! let feed = parse_feed("<rss><channel><title>T</title><item><title>I1</title></item></channel></rss>").unwrap();
//! assert_eq!(feed.title.as_deref(), Some("T"));
//! assert_eq!(feed.items.len(), 1);
//! ```

pub mod fetcher;
pub mod parser;
pub mod types;

pub use fetcher::{build_client, fetch_feed, FetchError, FetchOptions};
pub use parser::{parse_feed, parse_feed_bytes, ParseError};
pub use types::{Feed, Item};
