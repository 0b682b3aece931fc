//! Integration tests for the parse → render pipeline.
//!
//! These drive the public API only: raw XML text in, rendered text out,
//! checking that both output modes describe the same feed.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rss_reader::feed::{parse_feed, Feed, ParseError};
use rss_reader::format::{render, render_with_selector, FormatError, OutputMode, RenderOptions};
use serde_json::Value;

const NEWS_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>Daily News</title>
    <link>https://news.example.com</link>
    <description>All the news</description>
    <managingEditor>editor@news.example.com</managingEditor>
    <item>
      <title>Markets rally</title>
      <link>https://news.example.com/markets</link>
      <description><![CDATA[Stocks <em>up</em> again]]></description>
      <pubDate>Wed, 02 Oct 2024 13:00:00 GMT</pubDate>
      <content:encoded><![CDATA[<p>Full text</p>]]></content:encoded>
    </item>
    <item>
      <title>Rain expected</title>
      <link>https://news.example.com/weather</link>
    </item>
    <item>
      <title>Local team wins</title>
      <link>https://news.example.com/sports</link>
      <category>Sports</category>
    </item>
  </channel>
</rss>"#;

/// Titles and links of each item block in standard output.
fn standard_items(output: &str) -> Vec<(String, String)> {
    output
        .split("\n\n")
        .skip(1)
        .map(|block| {
            let field = |label: &str| {
                block
                    .lines()
                    .find_map(|line| line.strip_prefix(label))
                    .map(|v| v.trim().to_string())
                    .unwrap_or_default()
            };
            (field("Title:"), field("Link:"))
        })
        .collect()
}

fn json_items(output: &str) -> Vec<(String, String)> {
    let value: Value = serde_json::from_str(output).expect("JSON output should parse");
    value["items"]
        .as_array()
        .expect("items should be an array")
        .iter()
        .map(|item| {
            (
                item["title"].as_str().unwrap_or_default().to_string(),
                item["link"].as_str().unwrap_or_default().to_string(),
            )
        })
        .collect()
}

#[test]
fn test_modes_expose_same_content() {
    let feed = parse_feed(NEWS_RSS).unwrap();
    let options = RenderOptions::default();

    let standard = render(&feed, OutputMode::Standard, &options).unwrap();
    let json = render(&feed, OutputMode::Json, &options).unwrap();

    let from_standard = standard_items(&standard);
    let from_json = json_items(&json);
    assert_eq!(from_standard.len(), 3);
    assert_eq!(from_standard, from_json);

    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["title"], "Daily News");
    assert!(standard.starts_with("Feed: Daily News\nLink: https://news.example.com\n"));
}

#[test]
fn test_json_round_trips_to_parsed_feed() {
    let feed = parse_feed(NEWS_RSS).unwrap();
    let json = render(&feed, OutputMode::Json, &RenderOptions::default()).unwrap();
    let back: Feed = serde_json::from_str(&json).unwrap();
    assert_eq!(back, feed);
    assert_eq!(
        back.items[0].extra.get("content:encoded").map(String::as_str),
        Some("<p>Full text</p>")
    );
}

#[test]
fn test_standard_labels_known_channel_extension() {
    let feed = parse_feed(NEWS_RSS).unwrap();
    let standard = render(&feed, OutputMode::Standard, &RenderOptions::default()).unwrap();
    assert!(standard.contains("\nEditor: editor@news.example.com\n"));
    assert!(standard.contains("\ncontent:encoded: <p>Full text</p>\n"));
}

#[test]
fn test_limit_consistent_across_modes() {
    let feed = parse_feed(NEWS_RSS).unwrap();
    let options = RenderOptions {
        limit: Some(2),
        ..Default::default()
    };

    let standard = render(&feed, OutputMode::Standard, &options).unwrap();
    let json = render(&feed, OutputMode::Json, &options).unwrap();
    assert_eq!(standard_items(&standard).len(), 2);
    assert_eq!(standard_items(&standard), json_items(&json));
}

#[test]
fn test_malformed_input_fails_before_rendering() {
    for xml in [
        "<rss><channel><title>T</title></rss>",
        "<rss><channel><item><title>x</title></item>",
        "not xml at all <",
    ] {
        let result: Result<Feed, ParseError> = parse_feed(xml);
        assert!(result.is_err(), "Expected parse error for {:?}", xml);
    }
}

#[test]
fn test_unknown_selector_is_format_error() {
    let feed = parse_feed(NEWS_RSS).unwrap();
    let result = render_with_selector(&feed, "html", &RenderOptions::default());
    assert!(matches!(result, Err(FormatError::UnknownMode(_))));
}

#[test]
fn test_degenerate_feed_renders_in_both_modes() {
    let feed = parse_feed("<rss/>").unwrap();
    assert_eq!(feed, Feed::default());

    let json = render(&feed, OutputMode::Json, &RenderOptions::default()).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["title"], Value::Null);
    assert_eq!(value["items"], Value::Array(vec![]));

    let standard = render(&feed, OutputMode::Standard, &RenderOptions::default()).unwrap();
    assert_eq!(standard, "Feed:\nLink:");
}

fn build_rss(channel_title: &str, items: &[(String, String)]) -> String {
    let mut xml = format!("<rss version=\"2.0\"><channel><title>{}</title>", channel_title);
    for (title, link) in items {
        xml.push_str(&format!(
            "<item><title>{}</title><link>https://example.com/{}</link></item>",
            title, link
        ));
    }
    xml.push_str("</channel></rss>");
    xml
}

proptest! {
    #[test]
    fn prop_item_count_and_order_preserved(
        items in prop::collection::vec(("[A-Za-z0-9]{1,16}", "[a-z0-9]{1,8}"), 0..20)
    ) {
        let xml = build_rss("Generated", &items);
        let feed = parse_feed(&xml).unwrap();

        prop_assert_eq!(feed.items.len(), items.len());
        for (parsed, (title, link)) in feed.items.iter().zip(&items) {
            prop_assert_eq!(parsed.title.as_deref(), Some(title.as_str()));
            let expected_link = format!("https://example.com/{}", link);
            prop_assert_eq!(parsed.link.as_deref(), Some(expected_link.as_str()));
        }
    }

    #[test]
    fn prop_json_always_valid_and_matches_standard(
        items in prop::collection::vec(("[A-Za-z0-9]{1,16}", "[a-z0-9]{1,8}"), 0..20),
        pretty in any::<bool>()
    ) {
        let feed = parse_feed(&build_rss("Generated", &items)).unwrap();
        let options = RenderOptions { pretty, ..Default::default() };

        let json = render(&feed, OutputMode::Json, &options).unwrap();
        let back: Feed = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(&back, &feed);

        let standard = render(&feed, OutputMode::Standard, &options).unwrap();
        prop_assert_eq!(standard_items(&standard), json_items(&json));
    }

    #[test]
    fn prop_text_content_survives_escaping(text in "[ -~]{1,40}") {
        let escaped = text
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;");
        let feed = parse_feed(&format!("<rss><channel><title>{}</title></channel></rss>", escaped)).unwrap();
        prop_assert_eq!(feed.title.as_deref(), Some(text.trim()));
    }
}
