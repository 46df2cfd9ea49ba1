//! Bounded record of past transfers.

use crate::orchestrator::TransferTrigger;
use serde::{Deserialize, Serialize};

/// Keep only the last 5 transfers; oldest entries are evicted on overflow.
pub const MAX_RECENT_TRANSFERS: usize = 5;

/// Summary of one completed transfer, most-recent-first under
/// `recentTransfers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTransfer {
    pub source_count: usize,
    pub total_cookies: usize,
    pub skipped_cookies: usize,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub trigger: TransferTrigger,
}

/// Prepend a record and evict past the bound (FIFO by insertion).
pub(crate) fn push_bounded(history: &mut Vec<RecentTransfer>, record: RecentTransfer) {
    history.insert(0, record);
    history.truncate(MAX_RECENT_TRANSFERS);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(total_cookies: usize) -> RecentTransfer {
        RecentTransfer {
            source_count: 1,
            total_cookies,
            skipped_cookies: 0,
            timestamp: total_cookies as i64,
            trigger: TransferTrigger::Manual,
        }
    }

    #[test]
    fn test_push_bounded_evicts_oldest() {
        let mut history = Vec::new();
        for i in 1..=7 {
            push_bounded(&mut history, record(i));
        }

        assert_eq!(history.len(), MAX_RECENT_TRANSFERS);
        let totals: Vec<usize> = history.iter().map(|r| r.total_cookies).collect();
        assert_eq!(totals, vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(record(3)).unwrap();
        assert_eq!(json["totalCookies"], 3);
        assert_eq!(json["type"], "manual");
        assert!(json.get("skippedCookies").is_some());
    }
}
