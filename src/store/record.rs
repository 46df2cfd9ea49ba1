use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A cookie as surfaced by the store adapter.
///
/// Owned by the host platform's jar; the engine reads and writes these
/// through the adapter and never caches them beyond one sync pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    /// Session cookies have no persisted expiration.
    pub session: bool,
    #[serde(
        rename = "expirationDate",
        default,
        with = "time::serde::timestamp::option"
    )]
    pub expires: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SameSite {
    Unspecified,
    NoRestriction,
    Lax,
    Strict,
}

/// Identity used to match a source cookie against the target jar.
///
/// Domain is excluded on purpose: source and target have different domains
/// by design, so only `(name, path)` identifies the same logical cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CookieKey {
    pub name: String,
    pub path: String,
}

impl CookieRecord {
    /// Session cookie with defaulted attributes, for building up test and
    /// adapter data.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: "/".to_string(),
            secure: false,
            http_only: false,
            same_site: SameSite::Unspecified,
            session: true,
            expires: None,
        }
    }

    /// Matching key, with an absent path defaulting to `/`.
    pub fn key(&self) -> CookieKey {
        let path = if self.path.is_empty() {
            "/".to_string()
        } else {
            self.path.clone()
        };
        CookieKey { name: self.name.clone(), path }
    }

    pub fn is_expired(&self, current_time: OffsetDateTime) -> bool {
        match self.expires {
            Some(expiry) => expiry < current_time,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_defaults_empty_path() {
        let mut cookie = CookieRecord::new("session", "abc", "example.com");
        cookie.path = String::new();
        assert_eq!(cookie.key().path, "/");

        cookie.path = "/api".to_string();
        assert_eq!(cookie.key().path, "/api");
    }

    #[test]
    fn test_key_ignores_domain() {
        let a = CookieRecord::new("session", "abc", "example.com");
        let b = CookieRecord::new("session", "other", "localhost");
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_is_expired() {
        let now = OffsetDateTime::now_utc();
        let mut cookie = CookieRecord::new("session", "abc", "example.com");
        assert!(!cookie.is_expired(now));

        cookie.session = false;
        cookie.expires = Some(now - time::Duration::days(1));
        assert!(cookie.is_expired(now));

        cookie.expires = Some(now + time::Duration::days(1));
        assert!(!cookie.is_expired(now));
    }
}
