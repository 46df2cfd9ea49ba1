//! Transfer lifecycle coordination.
//!
//! Wires the registry, the sync engine, and the observer channel together:
//! reads enabled sources, runs the concurrent sync, reports
//! start/complete/error to observers, and keeps a bounded history of past
//! runs. The pause flag and every other piece of persisted state is reloaded
//! from storage on each invocation; nothing is mirrored in process memory
//! across calls.

pub mod events;
pub mod history;

pub use events::{NotificationHandle, Observer, ObserverHub, TransferEvent};
pub use history::{RecentTransfer, MAX_RECENT_TRANSFERS};

use crate::base::error::{BridgeError, BridgeResult};
use crate::base::now_unix_ms;
use crate::engine::{AggregateOutcome, SyncEngine};
use crate::origin;
use crate::registry::SourceRegistry;
use crate::storage::{KeyValueStore, KEY_RECENT_TRANSFERS, KEY_TRANSFER_PAUSED};
use crate::store::{CookieStore, StoreContextId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Hostnames targeted by the clear operation.
pub const LOCAL_CLEAR_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// What initiated a transfer. Automatic triggers fail quietly when nothing is
/// configured; manual triggers surface the same condition to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferTrigger {
    Auto,
    Manual,
}

/// Visibility of a completion where nothing needed transferring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyCompletion {
    /// Emit the neutral `TransferCompleted` ("up to date").
    Surface,
    /// Drop the progress indicator without a result.
    Dismiss,
}

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Origin cookies are copied into.
    pub target_origin: String,
    /// Empty-completion visibility for automatic transfers.
    pub auto_empty: EmptyCompletion,
    /// Empty-completion visibility for manual transfers.
    pub manual_empty: EmptyCompletion,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            target_origin: "http://localhost:3000".to_string(),
            auto_empty: EmptyCompletion::Surface,
            manual_empty: EmptyCompletion::Surface,
        }
    }
}

/// Outcome of clearing local-development cookies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearOutcome {
    pub count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

pub struct TransferOrchestrator {
    engine: SyncEngine,
    registry: SourceRegistry,
    cookie_store: Arc<dyn CookieStore>,
    storage: Arc<dyn KeyValueStore>,
    observers: ObserverHub,
    config: OrchestratorConfig,
}

impl TransferOrchestrator {
    pub fn new(
        cookie_store: Arc<dyn CookieStore>,
        storage: Arc<dyn KeyValueStore>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            engine: SyncEngine::new(cookie_store.clone()),
            registry: SourceRegistry::new(storage.clone()),
            cookie_store,
            storage,
            observers: ObserverHub::new(),
            config,
        }
    }

    pub fn register_observer(&mut self, observer: Arc<dyn Observer>) {
        self.observers.register(observer);
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn cookie_store(&self) -> &Arc<dyn CookieStore> {
        &self.cookie_store
    }

    /// Run one transfer from every enabled source into the configured target.
    ///
    /// The same isolation context selects both the source and the target jar.
    /// Observer delivery is best-effort and never affects the returned
    /// result. One shot: a failed source is reported, not retried.
    pub async fn run_transfer(
        &self,
        trigger: TransferTrigger,
        context: Option<&StoreContextId>,
    ) -> BridgeResult<AggregateOutcome> {
        if trigger == TransferTrigger::Auto && self.is_paused().await? {
            tracing::debug!("auto-transfer paused, skipping");
            return Ok(AggregateOutcome::empty());
        }

        let enabled = self.registry.enabled_entries().await?;
        if enabled.is_empty() {
            return match trigger {
                TransferTrigger::Manual => Err(BridgeError::NoEnabledSources),
                TransferTrigger::Auto => {
                    tracing::debug!("no enabled sources, skipping auto-transfer");
                    Ok(AggregateOutcome::empty())
                }
            };
        }

        tracing::info!(
            sources = enabled.len(),
            target = %self.config.target_origin,
            ?trigger,
            "transfer starting"
        );

        let handle = self
            .observers
            .emit(&TransferEvent::TransferStarted {
                source_count: enabled.len(),
                trigger,
                isolated: context.is_some(),
            })
            .await;

        let sources: Vec<String> = enabled.into_iter().map(|e| e.url).collect();
        let result = self
            .engine
            .sync_many(&sources, &self.config.target_origin, context, context)
            .await;

        match result {
            Ok(outcome) if outcome.total_cookies > 0 => {
                self.record_transfer(&outcome, trigger).await;
                self.observers
                    .emit(&TransferEvent::TransferCompleted {
                        outcome: outcome.clone(),
                        handle,
                    })
                    .await;
                Ok(outcome)
            }
            Ok(outcome) => {
                // Everything already in sync. Neutral, never an error, never
                // recorded in history.
                let policy = match trigger {
                    TransferTrigger::Auto => self.config.auto_empty,
                    TransferTrigger::Manual => self.config.manual_empty,
                };
                match (policy, handle) {
                    (EmptyCompletion::Dismiss, Some(h)) => {
                        self.observers
                            .emit(&TransferEvent::NotificationDismissed { handle: h })
                            .await;
                    }
                    (EmptyCompletion::Dismiss, None) => {}
                    (EmptyCompletion::Surface, _) => {
                        self.observers
                            .emit(&TransferEvent::TransferCompleted {
                                outcome: outcome.clone(),
                                handle,
                            })
                            .await;
                    }
                }
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(error = %e, "transfer failed");
                self.observers
                    .emit(&TransferEvent::TransferFailed {
                        error: e.to_string(),
                        handle,
                    })
                    .await;
                Err(e)
            }
        }
    }

    /// Auto-transfer entry point for navigation completions. Runs only when
    /// the URL is a local-development target; everything else is a no-op.
    pub async fn handle_navigation(
        &self,
        url: &str,
        context: Option<&StoreContextId>,
    ) -> BridgeResult<Option<AggregateOutcome>> {
        if !origin::is_local_target(url) {
            return Ok(None);
        }
        tracing::debug!(%url, "local target detected, starting auto-transfer");
        self.run_transfer(TransferTrigger::Auto, context).await.map(Some)
    }

    /// Delete every cookie under the fixed local-development hostnames.
    ///
    /// Per-cookie and per-domain failures are collected as warnings; the
    /// operation fails (and emits `ClearFailed`) only when every hostname
    /// enumeration failed.
    pub async fn clear_local_cookies(
        &self,
        context: Option<&StoreContextId>,
    ) -> BridgeResult<ClearOutcome> {
        let handle = self.observers.emit(&TransferEvent::ClearStarted).await;

        let mut outcome = ClearOutcome::default();
        let mut domains_failed = 0;

        for domain in LOCAL_CLEAR_HOSTS {
            let cookies = match self.cookie_store.cookies_for_domain(domain, context).await {
                Ok(cookies) => cookies,
                Err(e) => {
                    domains_failed += 1;
                    outcome
                        .warnings
                        .push(format!("Failed to get cookies from {domain}: {e}"));
                    continue;
                }
            };

            for cookie in cookies {
                let scheme = if cookie.secure { "https" } else { "http" };
                let url_str = format!("{scheme}://{}{}", cookie.domain, cookie.path);
                let removal = match Url::parse(&url_str) {
                    Ok(url) => self.cookie_store.remove_cookie(&url, &cookie.name, context).await,
                    Err(_) => Err(BridgeError::invalid_url(&url_str)),
                };
                match removal {
                    Ok(()) => outcome.count += 1,
                    Err(e) => outcome.warnings.push(format!(
                        "Failed to remove cookie {} from {domain}: {e}",
                        cookie.name
                    )),
                }
            }
        }

        if domains_failed == LOCAL_CLEAR_HOSTS.len() {
            let error = BridgeError::adapter_read(outcome.warnings.join("; "));
            self.observers
                .emit(&TransferEvent::ClearFailed {
                    error: error.to_string(),
                    handle,
                })
                .await;
            return Err(error);
        }

        tracing::info!(count = outcome.count, "local cookies cleared");
        self.observers
            .emit(&TransferEvent::ClearCompleted { count: outcome.count, handle })
            .await;
        Ok(outcome)
    }

    /// Pause flag, read from storage at call time.
    pub async fn is_paused(&self) -> BridgeResult<bool> {
        Ok(self
            .storage
            .get(KEY_TRANSFER_PAUSED)
            .await?
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    pub async fn set_paused(&self, paused: bool) -> BridgeResult<()> {
        self.storage.set(KEY_TRANSFER_PAUSED, Value::Bool(paused)).await
    }

    /// Past transfers, most recent first (bounded at
    /// [`MAX_RECENT_TRANSFERS`]).
    pub async fn recent_transfers(&self) -> BridgeResult<Vec<RecentTransfer>> {
        match self.storage.get(KEY_RECENT_TRANSFERS).await? {
            Some(value) => {
                serde_json::from_value(value).map_err(|e| BridgeError::storage(e.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }

    /// History persistence is best-effort: a storage failure is logged, not
    /// propagated, so it cannot fail a transfer that already happened.
    async fn record_transfer(&self, outcome: &AggregateOutcome, trigger: TransferTrigger) {
        let record = RecentTransfer {
            source_count: outcome.source_count,
            total_cookies: outcome.total_cookies,
            skipped_cookies: outcome.total_skipped,
            timestamp: now_unix_ms(),
            trigger,
        };

        let result = async {
            let mut transfers = self.recent_transfers().await?;
            history::push_bounded(&mut transfers, record);
            let value = serde_json::to_value(&transfers)
                .map_err(|e| BridgeError::storage(e.to_string()))?;
            self.storage.set(KEY_RECENT_TRANSFERS, value).await
        }
        .await;

        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to record transfer history");
        }
    }
}
