//! End-to-end tests: fetch a feed from a mock HTTP server, parse it and render it.

use rss_reader::config::Config;
use rss_reader::feed::{build_client, fetch_feed, parse_feed_bytes, FetchError, ParseError};
use rss_reader::format::{render, OutputMode};
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Mock Feed</title>
  <link>https://mock.example.com</link>
  <item><title>One</title><link>https://mock.example.com/1</link></item>
  <item><title>Two</title><link>https://mock.example.com/2</link></item>
</channel></rss>"#;

fn local_config() -> Config {
    Config::from_toml("allow_private_hosts = true\ntimeout_seconds = 5\n").unwrap()
}

async fn serve(body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("Content-Type", "application/rss+xml"),
        )
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_fetch_parse_render_json() {
    let server = serve(FEED).await;
    let config = local_config();
    let client = build_client(&config.user_agent).unwrap();

    let bytes = fetch_feed(&client, &format!("{}/rss", server.uri()), &config.fetch_options())
        .await
        .unwrap();
    let feed = parse_feed_bytes(&bytes).unwrap();
    let output = render(&feed, OutputMode::Json, &config.render_options()).unwrap();

    let value: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["title"], "Mock Feed");
    assert_eq!(value["items"].as_array().unwrap().len(), 2);
    assert_eq!(value["items"][1]["link"], "https://mock.example.com/2");
}

#[tokio::test]
async fn test_fetch_parse_render_standard_with_limit() {
    let server = serve(FEED).await;
    let config = Config::from_toml("allow_private_hosts = true\nlimit = 1\n").unwrap();
    let client = build_client(&config.user_agent).unwrap();

    let bytes = fetch_feed(&client, &format!("{}/rss", server.uri()), &config.fetch_options())
        .await
        .unwrap();
    let feed = parse_feed_bytes(&bytes).unwrap();
    let output = render(&feed, config.output_mode().unwrap(), &config.render_options()).unwrap();

    assert_eq!(
        output,
        "Feed: Mock Feed\nLink: https://mock.example.com\n\nTitle: One\nLink: https://mock.example.com/1"
    );
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = serve("<rss><channel><title>Broken</title></rss>").await;
    let config = local_config();
    let client = build_client(&config.user_agent).unwrap();

    let bytes = fetch_feed(&client, &format!("{}/rss", server.uri()), &config.fetch_options())
        .await
        .unwrap();
    let result: Result<_, ParseError> = parse_feed_bytes(&bytes);
    assert!(result.is_err());
}

#[tokio::test]
async fn test_missing_feed_is_fetch_error() {
    let server = serve(FEED).await;
    let config = local_config();
    let client = build_client(&config.user_agent).unwrap();

    let result = fetch_feed(&client, &format!("{}/nope", server.uri()), &config.fetch_options()).await;
    assert!(matches!(result, Err(FetchError::HttpStatus(404))));
}
