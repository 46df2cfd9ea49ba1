//! In-memory reference jar.
//!
//! Keeps cookies in a concurrent map keyed by (context, domain). Used by the
//! test suite and by embedders that have no platform store to adapt.

use crate::base::error::BridgeResult;
use crate::store::{CookieRecord, CookieStore, StoreContext, StoreContextId};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use time::OffsetDateTime;
use url::Url;

/// Jar id of the default (non-isolated) context.
pub const DEFAULT_CONTEXT: &str = "0";

pub struct MemoryCookieStore {
    // Map<(context, domain), List<Cookie>>
    store: DashMap<(String, String), Vec<CookieRecord>>,
    // Map<context id, description>; enumerated sorted by id.
    contexts: DashMap<String, StoreContext>,
    set_calls: AtomicUsize,
}

impl Default for MemoryCookieStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        let contexts = DashMap::new();
        contexts.insert(
            DEFAULT_CONTEXT.to_string(),
            StoreContext {
                id: StoreContextId::new(DEFAULT_CONTEXT),
                incognito: false,
                tab_count: 1,
            },
        );
        Self {
            store: DashMap::new(),
            contexts,
            set_calls: AtomicUsize::new(0),
        }
    }

    /// Register an additional jar (e.g. an isolated context) for enumeration.
    pub fn add_context(&self, id: impl Into<String>, incognito: bool, tab_count: usize) {
        let id = id.into();
        self.contexts.insert(
            id.clone(),
            StoreContext { id: StoreContextId::new(id), incognito, tab_count },
        );
    }

    /// Insert a cookie directly under its own domain, bypassing the adapter
    /// surface. Seeds source-side state in tests.
    pub fn insert(&self, cookie: CookieRecord, context: Option<&StoreContextId>) {
        let key = (Self::context_key(context), cookie.domain.clone());
        let mut entry = self.store.entry(key).or_default();
        entry.retain(|c| c.name != cookie.name || c.path != cookie.path);
        entry.push(cookie);
    }

    /// Total cookies across all jars.
    pub fn cookie_count(&self) -> usize {
        self.store.iter().map(|e| e.value().len()).sum()
    }

    /// Number of `set_cookie` calls the adapter has served. Lets tests assert
    /// that skipped cookies never reach a write.
    pub fn set_call_count(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    fn context_key(context: Option<&StoreContextId>) -> String {
        context
            .map(|c| c.as_str().to_string())
            .unwrap_or_else(|| DEFAULT_CONTEXT.to_string())
    }
}

#[async_trait]
impl CookieStore for MemoryCookieStore {
    async fn cookies_for_domain(
        &self,
        domain: &str,
        context: Option<&StoreContextId>,
    ) -> BridgeResult<Vec<CookieRecord>> {
        let key = (Self::context_key(context), domain.to_ascii_lowercase());
        let now = OffsetDateTime::now_utc();
        Ok(self
            .store
            .get(&key)
            .map(|e| e.value().iter().filter(|c| !c.is_expired(now)).cloned().collect())
            .unwrap_or_default())
    }

    async fn set_cookie(
        &self,
        _target: &Url,
        cookie: CookieRecord,
        context: Option<&StoreContextId>,
    ) -> BridgeResult<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        self.insert(cookie, context);
        Ok(())
    }

    async fn remove_cookie(
        &self,
        url: &Url,
        name: &str,
        context: Option<&StoreContextId>,
    ) -> BridgeResult<()> {
        let host = url.host_str().unwrap_or("").to_ascii_lowercase();
        let path = url.path();
        let key = (Self::context_key(context), host);
        if let Some(mut entry) = self.store.get_mut(&key) {
            entry.retain(|c| c.name != name || c.path != path);
        }
        Ok(())
    }

    async fn contexts(&self) -> BridgeResult<Vec<StoreContext>> {
        let mut contexts: Vec<StoreContext> =
            self.contexts.iter().map(|e| e.value().clone()).collect();
        contexts.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Ok(contexts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_replaces_matching_name_and_path() {
        let store = MemoryCookieStore::new();
        let url = Url::parse("http://localhost/").unwrap();

        store
            .set_cookie(&url, CookieRecord::new("session", "v1", "localhost"), None)
            .await
            .unwrap();
        store
            .set_cookie(&url, CookieRecord::new("session", "v2", "localhost"), None)
            .await
            .unwrap();

        let cookies = store.cookies_for_domain("localhost", None).await.unwrap();
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].value, "v2");
    }

    #[tokio::test]
    async fn test_contexts_are_independent_jars() {
        let store = MemoryCookieStore::new();
        store.add_context("1", true, 0);
        let isolated = StoreContextId::new("1");
        let url = Url::parse("http://localhost/").unwrap();

        store
            .set_cookie(&url, CookieRecord::new("a", "1", "localhost"), None)
            .await
            .unwrap();
        store
            .set_cookie(&url, CookieRecord::new("b", "2", "localhost"), Some(&isolated))
            .await
            .unwrap();

        let normal = store.cookies_for_domain("localhost", None).await.unwrap();
        let private = store
            .cookies_for_domain("localhost", Some(&isolated))
            .await
            .unwrap();
        assert_eq!(normal.len(), 1);
        assert_eq!(normal[0].name, "a");
        assert_eq!(private.len(), 1);
        assert_eq!(private[0].name, "b");
    }

    #[tokio::test]
    async fn test_expired_cookies_are_not_enumerated() {
        let store = MemoryCookieStore::new();
        let mut stale = CookieRecord::new("old", "1", "localhost");
        stale.session = false;
        stale.expires = Some(OffsetDateTime::now_utc() - time::Duration::days(1));
        store.insert(stale, None);
        store.insert(CookieRecord::new("fresh", "2", "localhost"), None);

        let cookies = store.cookies_for_domain("localhost", None).await.unwrap();
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name, "fresh");
    }

    #[tokio::test]
    async fn test_remove_matches_name_and_path() {
        let store = MemoryCookieStore::new();
        let root = Url::parse("http://localhost/").unwrap();

        let mut api = CookieRecord::new("token", "x", "localhost");
        api.path = "/api".to_string();
        store.insert(api, None);
        store.insert(CookieRecord::new("token", "y", "localhost"), None);

        store.remove_cookie(&root, "token", None).await.unwrap();

        let cookies = store.cookies_for_domain("localhost", None).await.unwrap();
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].path, "/api");
    }
}
