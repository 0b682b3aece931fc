//! JSON rendering.
//!
//! Every optional field is always present and serializes as `null` when
//! unset. Extension fields are nested under `extra` on both the channel and
//! each item, so a feed-defined tag can never shadow a core key.

use serde::Serialize;
use std::collections::BTreeMap;

use super::{FormatError, RenderOptions};
use crate::feed::{Feed, Item};

/// Borrowed view of a [`Feed`] with the item limit applied.
#[derive(Serialize)]
struct JsonDocument<'a> {
    title: Option<&'a str>,
    link: Option<&'a str>,
    description: Option<&'a str>,
    categories: &'a [String],
    extra: &'a BTreeMap<String, String>,
    items: &'a [Item],
}

impl<'a> JsonDocument<'a> {
    fn new(feed: &'a Feed, limit: Option<usize>) -> Self {
        Self {
            title: feed.title.as_deref(),
            link: feed.link.as_deref(),
            description: feed.description.as_deref(),
            categories: &feed.categories,
            extra: &feed.extra,
            items: feed.limited_items(limit),
        }
    }
}

/// Serializes `feed` as a JSON object.
///
/// Without a limit the output deserializes back into a [`Feed`] equal to
/// the input.
pub fn to_json(feed: &Feed, options: &RenderOptions) -> Result<String, FormatError> {
    let document = JsonDocument::new(feed, options.limit);
    let json = if options.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    Ok(json)
}
