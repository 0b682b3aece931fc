use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Errors that can occur while validating a feed source URL.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component (e.g. `http:/feed`).
    #[error("URL has no host")]
    MissingHost,
    /// The URL points to a private/internal IP address.
    #[error("Private IP address not allowed: {0}")]
    PrivateIp(String),
    /// The URL points to localhost.
    #[error("Localhost not allowed")]
    Localhost,
}

/// Which hosts a source URL may point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostPolicy {
    /// Reject localhost, loopback and private address ranges.
    #[default]
    PublicOnly,
    /// Accept any host. Used when the config opts in to reading feeds from
    /// a local network (and by tests that serve feeds from 127.0.0.1).
    AllowPrivate,
}

/// Validates a feed source URL before it is handed to the HTTP client.
///
/// Always requires an `http`/`https` scheme and a host. Under
/// [`HostPolicy::PublicOnly`] it also rejects:
/// - `localhost` and loopback addresses (`127.0.0.0/8`, `::1`)
/// - RFC 1918, link-local, unspecified and IPv6 unique-local ranges
///
/// # Examples
///
/// ```
/// use rss_reader::util::{validate_source_url, HostPolicy};
///
/// let url = validate_source_url("https://example.com/feed.xml", HostPolicy::PublicOnly).unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
///
/// assert!(validate_source_url("http://192.168.1.1/feed", HostPolicy::PublicOnly).is_err());
/// assert!(validate_source_url("http://192.168.1.1/feed", HostPolicy::AllowPrivate).is_ok());
/// assert!(validate_source_url("file:///etc/passwd", HostPolicy::AllowPrivate).is_err());
/// ```
pub fn validate_source_url(url_str: &str, policy: HostPolicy) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    let host = url.host_str().ok_or(UrlValidationError::MissingHost)?;
    if policy == HostPolicy::AllowPrivate {
        return Ok(url);
    }

    if host.eq_ignore_ascii_case("localhost") {
        return Err(UrlValidationError::Localhost);
    }

    // IPv6 hosts come back bracketed
    let bare = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    if let Ok(ip) = bare.parse::<IpAddr>() {
        if ip.is_loopback() {
            return Err(UrlValidationError::Localhost);
        }
        if is_private_ip(&ip) {
            return Err(UrlValidationError::PrivateIp(ip.to_string()));
        }
    }

    Ok(url)
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_link_local() || v4.is_unspecified(),
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            // fc00::/7 unique local, fe80::/10 link-local
            v6.is_unspecified() || (first & 0xfe00) == 0xfc00 || (first & 0xffc0) == 0xfe80
        }
    }
}
