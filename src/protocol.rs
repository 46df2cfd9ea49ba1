//! Inbound request/response protocol.
//!
//! Collaborators (popup, panel) talk to the core through tagged messages
//! rather than a wire format. Each request variant has a fixed field set and
//! is dispatched exhaustively; errors come back as a single human-readable
//! line in [`Response::Error`].
//!
//! The JSON shape matches the message actions the collaborators already
//! send: `{"action": "manualTransfer", "isIncognito": false}` and friends.

use crate::base::error::BridgeResult;
use crate::orchestrator::{TransferOrchestrator, TransferTrigger};
use crate::registry::SourceEntry;
use crate::store::{find_isolated_context, CookieRecord, StoreContextId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    #[serde(rename_all = "camelCase")]
    ManualTransfer {
        #[serde(default)]
        is_incognito: bool,
    },
    #[serde(rename_all = "camelCase")]
    ClearCookies {
        #[serde(default)]
        is_incognito: bool,
    },
    AddSource { url: String },
    RemoveSource { index: usize },
    #[serde(rename_all = "camelCase")]
    ReorderSources { from_index: usize, to_index: usize },
    SetSourceEnabled { index: usize, enabled: bool },
    #[serde(rename_all = "camelCase")]
    GetCookiesForDomain {
        domain: String,
        #[serde(default)]
        use_incognito: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Response {
    Transfer(crate::engine::AggregateOutcome),
    Clear {
        count: usize,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<String>,
    },
    Cookies { cookies: Vec<CookieRecord> },
    /// Registry mutation applied; carries the resulting entry where one
    /// exists.
    Ack {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        entry: Option<SourceEntry>,
    },
    Error { message: String },
}

impl Response {
    fn from_result<T>(result: BridgeResult<T>, ok: impl FnOnce(T) -> Response) -> Response {
        match result {
            Ok(value) => ok(value),
            Err(e) => Response::Error { message: e.to_string() },
        }
    }
}

/// Routes decoded requests to the orchestrator, registry, and store adapter.
pub struct Dispatcher {
    orchestrator: TransferOrchestrator,
}

impl Dispatcher {
    pub fn new(orchestrator: TransferOrchestrator) -> Self {
        Self { orchestrator }
    }

    pub fn orchestrator(&self) -> &TransferOrchestrator {
        &self.orchestrator
    }

    pub async fn handle(&self, request: Request) -> Response {
        match request {
            Request::ManualTransfer { is_incognito } => {
                let context = match self.resolve_context(is_incognito).await {
                    Ok(context) => context,
                    Err(e) => return Response::Error { message: e.to_string() },
                };
                Response::from_result(
                    self.orchestrator
                        .run_transfer(TransferTrigger::Manual, context.as_ref())
                        .await,
                    Response::Transfer,
                )
            }
            Request::ClearCookies { is_incognito } => {
                let context = match self.resolve_context(is_incognito).await {
                    Ok(context) => context,
                    Err(e) => return Response::Error { message: e.to_string() },
                };
                Response::from_result(
                    self.orchestrator.clear_local_cookies(context.as_ref()).await,
                    |outcome| Response::Clear {
                        count: outcome.count,
                        warnings: outcome.warnings,
                    },
                )
            }
            Request::AddSource { url } => Response::from_result(
                self.orchestrator.registry().add(&url).await,
                |entry| Response::Ack { entry: Some(entry) },
            ),
            Request::RemoveSource { index } => Response::from_result(
                self.orchestrator.registry().remove(index).await,
                |_| Response::Ack { entry: None },
            ),
            Request::ReorderSources { from_index, to_index } => Response::from_result(
                self.orchestrator.registry().reorder(from_index, to_index).await,
                |_| Response::Ack { entry: None },
            ),
            Request::SetSourceEnabled { index, enabled } => Response::from_result(
                self.orchestrator.registry().set_enabled(index, enabled).await,
                |_| Response::Ack { entry: None },
            ),
            Request::GetCookiesForDomain { domain, use_incognito } => {
                let context = match self.resolve_context(use_incognito).await {
                    Ok(context) => context,
                    Err(e) => return Response::Error { message: e.to_string() },
                };
                Response::from_result(
                    self.orchestrator
                        .cookie_store()
                        .cookies_for_domain(&domain, context.as_ref())
                        .await,
                    |cookies| Response::Cookies { cookies },
                )
            }
        }
    }

    /// Resolve the isolated jar when asked for one; the default jar is
    /// `None`. Detection is the adapter-provided best-effort heuristic.
    async fn resolve_context(&self, isolated: bool) -> BridgeResult<Option<StoreContextId>> {
        if !isolated {
            return Ok(None);
        }
        let contexts = self.orchestrator.cookie_store().contexts().await?;
        Ok(find_isolated_context(&contexts))
    }
}
