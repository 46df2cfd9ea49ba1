//! Cookie store adapter interface.
//!
//! Abstraction over the host platform's per-profile cookie storage. The sync
//! engine only talks to [`CookieStore`]; the crate ships
//! [`MemoryCookieStore`](memory::MemoryCookieStore) as the reference jar used
//! by tests and embedders without a platform store.
//!
//! A platform exposes one or more *contexts* (separate jars such as the
//! normal profile and a private/isolated session), described by
//! [`StoreContext`] and addressed by [`StoreContextId`].

pub mod memory;
pub mod record;

pub use record::{CookieKey, CookieRecord, SameSite};

use crate::base::error::BridgeResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Opaque identifier of one cookie jar within the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreContextId(String);

impl StoreContextId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Description of one cookie jar, as enumerated by the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreContext {
    pub id: StoreContextId,
    pub incognito: bool,
    /// Number of open tabs associated with this jar.
    pub tab_count: usize,
}

/// Host cookie storage consumed by the sync engine.
///
/// Every method is a suspension point; implementations are expected to be
/// I/O-bound, not CPU-bound. A `None` context addresses the default jar.
#[async_trait]
pub trait CookieStore: Send + Sync {
    /// All cookies stored under the given hostname.
    async fn cookies_for_domain(
        &self,
        domain: &str,
        context: Option<&StoreContextId>,
    ) -> BridgeResult<Vec<CookieRecord>>;

    /// Set or overwrite a cookie for the target URL.
    async fn set_cookie(
        &self,
        target: &Url,
        cookie: CookieRecord,
        context: Option<&StoreContextId>,
    ) -> BridgeResult<()>;

    /// Delete the named cookie matching the URL's host and path.
    async fn remove_cookie(
        &self,
        url: &Url,
        name: &str,
        context: Option<&StoreContextId>,
    ) -> BridgeResult<()>;

    /// Enumerate available jars.
    async fn contexts(&self) -> BridgeResult<Vec<StoreContext>>;
}

/// Best-effort detection of the isolated (private-browsing) jar.
///
/// Platform heuristic, not a contract: a jar with zero associated tabs is
/// assumed isolated, falling back to any jar flagged incognito. Callers pass
/// explicit context ids into the engine; nothing in the core depends on this
/// returning the right answer.
pub fn find_isolated_context(contexts: &[StoreContext]) -> Option<StoreContextId> {
    if let Some(store) = contexts.iter().find(|c| c.tab_count == 0) {
        return Some(store.id.clone());
    }
    contexts.iter().find(|c| c.incognito).map(|c| c.id.clone())
}
