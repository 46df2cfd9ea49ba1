//! Observer notification channel.
//!
//! Transfers are reported to any number of registered observers (popup,
//! in-page panel, toast renderer). Delivery is multicast and best-effort: an
//! operation may have zero, one, or many observers attached at emit time, and
//! emission never fails the underlying transfer.

use crate::engine::AggregateOutcome;
use crate::orchestrator::TransferTrigger;
use async_trait::async_trait;
use std::sync::Arc;

/// Opaque id correlating a start event with its later completion or error
/// update, so an observer can update an in-place indicator instead of
/// creating a new one. Owned by the observer that issued it; lives for one
/// transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationHandle(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum TransferEvent {
    TransferStarted {
        source_count: usize,
        trigger: TransferTrigger,
        isolated: bool,
    },
    TransferCompleted {
        outcome: AggregateOutcome,
        handle: Option<NotificationHandle>,
    },
    TransferFailed {
        error: String,
        handle: Option<NotificationHandle>,
    },
    ClearStarted,
    ClearCompleted {
        count: usize,
        handle: Option<NotificationHandle>,
    },
    ClearFailed {
        error: String,
        handle: Option<NotificationHandle>,
    },
    /// Drop an in-progress indicator without surfacing a result.
    NotificationDismissed { handle: NotificationHandle },
}

/// A collaborator interested in transfer lifecycle events.
#[async_trait]
pub trait Observer: Send + Sync {
    /// React to an event. Returning `Some(handle)` from a start event asks
    /// for the matching completion to carry the same handle.
    async fn notify(&self, event: &TransferEvent) -> Option<NotificationHandle>;
}

/// Registered observers, multicast in registration order.
#[derive(Default)]
pub struct ObserverHub {
    observers: Vec<Arc<dyn Observer>>,
}

impl ObserverHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Arc<dyn Observer>) {
        self.observers.push(observer);
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver the event to every observer. The first handle returned wins;
    /// absent observers are normal and emission cannot fail.
    pub async fn emit(&self, event: &TransferEvent) -> Option<NotificationHandle> {
        let mut handle = None;
        for observer in &self.observers {
            let response = observer.notify(event).await;
            if handle.is_none() {
                handle = response;
            }
        }
        handle
    }
}
