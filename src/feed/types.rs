use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One RSS channel and its entries.
///
/// Built once per parse call and never mutated afterwards. `items` keeps
/// the order the `<item>` elements appear in the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    /// Every channel-level `<category>`, in source order.
    pub categories: Vec<String>,
    /// Unrecognized channel children (`language`, `lastBuildDate`, ...)
    /// keyed by qualified tag name.
    pub extra: BTreeMap<String, String>,
    pub items: Vec<Item>,
}

/// One `<item>` of a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    /// Raw `<pubDate>` text. See [`Item::published_at`] for the parsed form.
    #[serde(rename = "pubDate")]
    pub pub_date: Option<String>,
    pub categories: Vec<String>,
    /// Extension fields: any child element outside the recognized set,
    /// keyed by qualified tag name (`author`, `guid`, `dc:creator`, ...).
    /// Last occurrence wins.
    pub extra: BTreeMap<String, String>,
}

impl Feed {
    /// Items after applying an optional limit. `None` keeps everything.
    pub fn limited_items(&self, limit: Option<usize>) -> &[Item] {
        match limit {
            Some(n) if n < self.items.len() => &self.items[..n],
            _ => &self.items,
        }
    }
}

impl Item {
    /// Parses `pubDate` as RFC 2822 (the RSS 2.0 date format), falling back
    /// to RFC 3339 which some generators emit instead.
    ///
    /// Returns `None` when the field is missing or matches neither format.
    pub fn published_at(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.pub_date.as_deref()?.trim();
        DateTime::parse_from_rfc2822(raw)
            .or_else(|_| DateTime::parse_from_rfc3339(raw))
            .ok()
    }
}
