use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;

use crate::util::{validate_source_url, HostPolicy, UrlValidationError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_RETRIES: u32 = 3;
const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur while retrieving a feed document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source URL failed validation before any request was made
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(#[from] UrlValidationError),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// Server returned 429 Too Many Requests after max retries
    #[error("Rate limited after {0} retries")]
    RateLimited(u32),
    /// Response body exceeded the size limit
    #[error("Response too large (limit {0} bytes)")]
    ResponseTooLarge(usize),
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
}

/// Knobs for a single [`fetch_feed`] call.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Per-request timeout, applied to each attempt separately.
    pub timeout: Duration,
    /// Retries for 429, 5xx and truncated bodies. 4xx fails immediately.
    pub max_retries: u32,
    /// First backoff delay; doubles on every retry.
    pub retry_base_delay: Duration,
    pub max_size: usize,
    pub host_policy: HostPolicy,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: Duration::from_secs(1),
            max_size: MAX_FEED_SIZE,
            host_policy: HostPolicy::PublicOnly,
        }
    }
}

impl FetchOptions {
    fn backoff(&self, retry: u32) -> Duration {
        self.retry_base_delay.saturating_mul(2u32.saturating_pow(retry))
    }
}

/// Builds the HTTP client used for feed requests.
pub fn build_client(user_agent: &str) -> Result<reqwest::Client, FetchError> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Fetches the raw bytes of a feed document.
///
/// The URL is validated against `options.host_policy` first. The body is
/// returned untouched; decoding and parsing belong to the caller.
///
/// # Errors
///
/// - [`FetchError::InvalidUrl`] - Unsupported scheme or disallowed host
/// - [`FetchError::Network`] - Connection or TLS errors
/// - [`FetchError::Timeout`] - An attempt exceeded `options.timeout`
/// - [`FetchError::HttpStatus`] - 4xx response, or 5xx after max retries
/// - [`FetchError::RateLimited`] - 429 response after max retries
/// - [`FetchError::ResponseTooLarge`] - Body exceeded `options.max_size`
/// - [`FetchError::IncompleteResponse`] - Truncated body after max retries
pub async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
    options: &FetchOptions,
) -> Result<Vec<u8>, FetchError> {
    let url = validate_source_url(url, options.host_policy)?;
    let mut retry_count = 0;

    loop {
        let response = tokio::time::timeout(options.timeout, client.get(url.clone()).send())
            .await
            .map_err(|_| FetchError::Timeout(options.timeout))?
            .map_err(FetchError::Network)?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            if retry_count >= options.max_retries {
                return Err(FetchError::RateLimited(options.max_retries));
            }
            let delay = options.backoff(retry_count);
            tracing::warn!(
                url = %url,
                retry = retry_count,
                delay_ms = delay.as_millis() as u64,
                "Rate limited, backing off"
            );
            tokio::time::sleep(delay).await;
            retry_count += 1;
            continue;
        }

        if status.is_server_error() {
            if retry_count >= options.max_retries {
                return Err(FetchError::HttpStatus(status.as_u16()));
            }
            let delay = options.backoff(retry_count);
            tracing::warn!(
                url = %url,
                status = %status,
                retry = retry_count,
                delay_ms = delay.as_millis() as u64,
                "Server error, retrying after delay"
            );
            tokio::time::sleep(delay).await;
            retry_count += 1;
            continue;
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        match read_limited_bytes(response, options.max_size).await {
            Ok(bytes) => {
                tracing::debug!(url = %url, bytes = bytes.len(), "Fetched feed");
                return Ok(bytes);
            }
            Err(FetchError::IncompleteResponse { expected, received }) => {
                if retry_count >= options.max_retries {
                    return Err(FetchError::IncompleteResponse { expected, received });
                }
                let delay = options.backoff(retry_count);
                tracing::debug!(
                    url = %url,
                    expected = expected,
                    received = received,
                    attempt = retry_count + 1,
                    "Retrying incomplete download"
                );
                tokio::time::sleep(delay).await;
                retry_count += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
