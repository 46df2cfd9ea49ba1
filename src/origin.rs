//! Origin classification and normalization.
//!
//! Decides whether a URL belongs to the local-development target class and
//! reduces user input to a canonical `scheme://host` origin. Pure functions,
//! no side effects; malformed input is a value, never a panic.

use crate::base::error::{BridgeError, BridgeResult};
use url::Url;

/// Returns true iff the URL points at the local-development target class.
///
/// The hostname must equal `localhost`, equal `127.0.0.1`, end with
/// `.localhost`, or start with `localhost.`. This rule gates automatic
/// transfer triggering and notification targeting. Malformed input returns
/// false.
pub fn is_local_target(url: &str) -> bool {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };
    let host = match parsed.host_str() {
        Some(host) => host.to_ascii_lowercase(),
        None => return false,
    };

    host == "localhost"
        || host == "127.0.0.1"
        || host.ends_with(".localhost")
        || host.starts_with("localhost.")
}

/// Reduce a URL to its `scheme://host` origin.
///
/// Only http and https origins are accepted; everything else (including
/// unparseable input and host-less URLs like `mailto:`) is `InvalidUrl`.
pub fn normalize_origin(url: &str) -> BridgeResult<String> {
    let parsed = Url::parse(url).map_err(|_| BridgeError::invalid_url(url))?;

    match parsed.scheme() {
        "http" | "https" => {}
        _ => return Err(BridgeError::invalid_url(url)),
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| BridgeError::invalid_url(url))?;

    Ok(format!("{}://{}", parsed.scheme(), host.to_ascii_lowercase()))
}

/// Extract the lowercased hostname of a URL.
pub fn host_of(url: &str) -> BridgeResult<String> {
    let parsed = Url::parse(url).map_err(|_| BridgeError::invalid_url(url))?;
    parsed
        .host_str()
        .map(|h| h.to_ascii_lowercase())
        .ok_or_else(|| BridgeError::invalid_url(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_target_truth_table() {
        assert!(is_local_target("http://localhost"));
        assert!(is_local_target("http://localhost:3000/app"));
        assert!(is_local_target("https://127.0.0.1:8443"));
        assert!(is_local_target("http://app.localhost/"));
        assert!(is_local_target("http://localhost.dev:4000"));

        assert!(!is_local_target("https://localhost.example.com"));
        assert!(!is_local_target("https://example.com"));
        assert!(!is_local_target("https://mylocalhost.com"));
    }

    #[test]
    fn test_local_target_malformed_input() {
        assert!(!is_local_target("not a url"));
        assert!(!is_local_target(""));
        assert!(!is_local_target("http://"));
        assert!(!is_local_target("mailto:dev@localhost"));
    }

    #[test]
    fn test_local_target_case_insensitive() {
        assert!(is_local_target("http://LOCALHOST:3000"));
        assert!(is_local_target("http://App.LocalHost"));
    }

    #[test]
    fn test_normalize_origin_strips_path_and_port() {
        assert_eq!(
            normalize_origin("https://App.Example.com/dashboard?tab=1").unwrap(),
            "https://app.example.com"
        );
        assert_eq!(
            normalize_origin("http://example.com:8080/x").unwrap(),
            "http://example.com"
        );
    }

    #[test]
    fn test_normalize_origin_rejects_non_http() {
        assert!(normalize_origin("ftp://example.com").is_err());
        assert!(normalize_origin("chrome://settings").is_err());
        assert!(normalize_origin("nonsense").is_err());
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://App.Example.com/x").unwrap(), "app.example.com");
        assert!(host_of("garbage").is_err());
    }
}
