//! Plain-text rendering.
//!
//! Layout, one field per line:
//!
//! ```text
//! Feed: <title>
//! Link: <link>
//! Categories: <a, b>
//! <extension fields, sorted by tag>
//! Description: <description>
//!
//! Title: <title>
//! Published: <pubDate>
//! Link: <link>
//! Categories: <a, b>
//! <extension fields, sorted by tag>
//! Description: <description>
//! ```
//!
//! `Feed`, `Link` and `Title` lines are always written; every other line
//! only when the value is present. One blank line separates blocks.

use std::collections::BTreeMap;
use std::fmt::Write;

use super::RenderOptions;
use crate::feed::{Feed, Item};
use crate::util::sanitize_line;

/// Renders `feed` as plain text. Never fails.
pub fn to_standard(feed: &Feed, options: &RenderOptions) -> String {
    let mut lines = Vec::new();

    push_field(&mut lines, "Feed", feed.title.as_deref().unwrap_or_default());
    push_field(&mut lines, "Link", feed.link.as_deref().unwrap_or_default());
    push_categories(&mut lines, &feed.categories);
    push_extra(&mut lines, &feed.extra);
    if let Some(description) = &feed.description {
        push_field(&mut lines, "Description", description);
    }

    for item in feed.limited_items(options.limit) {
        lines.push(String::new());
        push_item(&mut lines, item, options.date_format.as_deref());
    }

    lines.join("\n")
}

fn push_item(lines: &mut Vec<String>, item: &Item, date_format: Option<&str>) {
    push_field(lines, "Title", item.title.as_deref().unwrap_or_default());
    if let Some(raw) = &item.pub_date {
        push_field(lines, "Published", &format_date(item, raw, date_format));
    }
    push_field(lines, "Link", item.link.as_deref().unwrap_or_default());
    push_categories(lines, &item.categories);
    push_extra(lines, &item.extra);
    if let Some(description) = &item.description {
        push_field(lines, "Description", description);
    }
}

fn push_field(lines: &mut Vec<String>, label: &str, value: &str) {
    let value = sanitize_line(value);
    if value.is_empty() {
        lines.push(format!("{}:", label));
    } else {
        lines.push(format!("{}: {}", label, value));
    }
}

fn push_categories(lines: &mut Vec<String>, categories: &[String]) {
    if !categories.is_empty() {
        push_field(lines, "Categories", &categories.join(", "));
    }
}

fn push_extra(lines: &mut Vec<String>, extra: &BTreeMap<String, String>) {
    // BTreeMap iteration is already sorted by tag name
    for (tag, value) in extra {
        push_field(lines, label_for(tag), value);
    }
}

fn format_date(item: &Item, raw: &str, pattern: Option<&str>) -> String {
    let (Some(pattern), Some(published)) = (pattern, item.published_at()) else {
        return raw.to_string();
    };
    let mut out = String::new();
    // An invalid strftime pattern surfaces as a fmt::Error here
    match write!(out, "{}", published.format(pattern)) {
        Ok(()) => out,
        Err(_) => {
            tracing::debug!(pattern = %pattern, "Invalid date format, printing raw pubDate");
            raw.to_string()
        }
    }
}

/// Human-readable label for well-known RSS 2.0 tags; anything else is
/// printed under its tag name.
fn label_for(tag: &str) -> &str {
    match tag {
        "author" => "Author",
        "comments" => "Comments",
        "copyright" => "Copyright",
        "docs" => "Docs",
        "enclosure" => "Enclosure",
        "generator" => "Generator",
        "guid" => "GUID",
        "image" => "Image",
        "language" => "Language",
        "lastBuildDate" => "Last Build Date",
        "managingEditor" => "Editor",
        "pubDate" => "Publish Date",
        "source" => "Source",
        "ttl" => "TTL",
        "webMaster" => "Web Master",
        other => other,
    }
}
