//! The cookie synchronization engine.
//!
//! Computes and applies the minimal set of mutations needed to bring target
//! cookies up to date with each source: per cookie, skip when the value is
//! already present, update when the key exists with a different value, copy
//! when the key is new. Sources sync concurrently and independently; their
//! results are joined into commutative sums.

pub mod outcome;

pub use outcome::{AggregateOutcome, SourceOutcome};

use crate::base::error::{BridgeError, BridgeResult};
use crate::origin;
use crate::store::{CookieKey, CookieRecord, CookieStore, SameSite, StoreContextId};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

pub struct SyncEngine {
    store: Arc<dyn CookieStore>,
}

impl SyncEngine {
    pub fn new(store: Arc<dyn CookieStore>) -> Self {
        Self { store }
    }

    /// Sync one source origin into the target origin.
    ///
    /// Source cookies are processed in adapter-returned order. A source with
    /// no cookies fails with `NoCookiesAtSource`; a single failed write is
    /// recorded as a warning and the batch continues. Duplicate `(name, path)`
    /// keys within one source batch are written last-write-wins, with no
    /// up-front deduplication.
    pub async fn sync_one(
        &self,
        source_origin: &str,
        target_origin: &str,
        source_context: Option<&StoreContextId>,
        target_context: Option<&StoreContextId>,
    ) -> BridgeResult<SourceOutcome> {
        let source_host = origin::host_of(source_origin)?;
        let target_url =
            Url::parse(target_origin).map_err(|_| BridgeError::invalid_url(target_origin))?;
        let target_host = target_url
            .host_str()
            .ok_or_else(|| BridgeError::invalid_url(target_origin))?
            .to_ascii_lowercase();
        let target_is_https = target_url.scheme() == "https";

        let source_cookies = self
            .store
            .cookies_for_domain(&source_host, source_context)
            .await?;
        if source_cookies.is_empty() {
            return Err(BridgeError::no_cookies(&source_host, source_context.is_some()));
        }

        let existing = self
            .store
            .cookies_for_domain(&target_host, target_context)
            .await?;
        let existing_by_key: HashMap<CookieKey, CookieRecord> =
            existing.into_iter().map(|c| (c.key(), c)).collect();

        let mut outcome = SourceOutcome {
            total: source_cookies.len(),
            ..Default::default()
        };

        for cookie in &source_cookies {
            let key = cookie.key();
            let current = existing_by_key.get(&key);

            // Identical value already present: no write.
            if current.is_some_and(|c| c.value == cookie.value) {
                outcome.skipped += 1;
                continue;
            }

            let rebuilt = rebuild_for_target(cookie, &target_host, target_is_https);
            match self.store.set_cookie(&target_url, rebuilt, target_context).await {
                Ok(()) => {
                    if current.is_some() {
                        outcome.updated += 1;
                        tracing::debug!(name = %cookie.name, "updated cookie (value changed)");
                    } else {
                        outcome.copied += 1;
                        tracing::debug!(name = %cookie.name, "added new cookie");
                    }
                }
                Err(e) => {
                    outcome
                        .warnings
                        .push(format!("Failed to set cookie {}: {e}", cookie.name));
                }
            }
        }

        tracing::info!(
            host = %source_host,
            copied = outcome.copied,
            updated = outcome.updated,
            skipped = outcome.skipped,
            total = outcome.total,
            "cookie transfer summary"
        );

        Ok(outcome)
    }

    /// Sync every source concurrently and join the results.
    ///
    /// Fails only when zero sources succeed, concatenating every per-source
    /// error into the message. Otherwise the sums are aggregated (commutative,
    /// so completion order does not matter) and failing sources become
    /// warnings.
    pub async fn sync_many(
        &self,
        source_origins: &[String],
        target_origin: &str,
        source_context: Option<&StoreContextId>,
        target_context: Option<&StoreContextId>,
    ) -> BridgeResult<AggregateOutcome> {
        let transfers = source_origins.iter().map(|source| async move {
            let result = self
                .sync_one(source, target_origin, source_context, target_context)
                .await;
            (source.as_str(), result)
        });
        let results = join_all(transfers).await;

        let mut aggregate = AggregateOutcome {
            attempted: source_origins.len(),
            ..Default::default()
        };
        let mut failures = Vec::new();

        for (source, result) in results {
            match result {
                Ok(outcome) => aggregate.absorb(outcome),
                Err(e) => failures.push(format!("{source}: {e}")),
            }
        }

        if aggregate.source_count == 0 {
            return Err(BridgeError::AllSourcesFailed { details: failures.join("; ") });
        }

        aggregate.warnings.extend(failures);
        Ok(aggregate)
    }
}

/// Rebuild a source cookie for the target jar.
///
/// Secure is never upgraded beyond what the target protocol supports (a
/// secure cookie written to an http target would be silently unreadable),
/// sameSite defaults to Lax, and expiration carries over only for persistent
/// cookies that have one.
fn rebuild_for_target(cookie: &CookieRecord, target_host: &str, target_is_https: bool) -> CookieRecord {
    CookieRecord {
        name: cookie.name.clone(),
        value: cookie.value.clone(),
        domain: target_host.to_string(),
        path: if cookie.path.is_empty() {
            "/".to_string()
        } else {
            cookie.path.clone()
        },
        secure: if target_is_https { cookie.secure } else { false },
        http_only: cookie.http_only,
        same_site: match cookie.same_site {
            SameSite::Unspecified => SameSite::Lax,
            other => other,
        },
        session: cookie.session,
        expires: if cookie.session { None } else { cookie.expires },
    }
}
