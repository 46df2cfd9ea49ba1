use serde::{Deserialize, Serialize};

/// Result of syncing one source origin into the target.
///
/// `copied + updated + skipped` accounts for every source cookie that was
/// processed cleanly; cookies whose write failed are reported in `warnings`
/// and excluded from the counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceOutcome {
    /// New cookies added to the target.
    pub copied: usize,
    /// Existing target cookies overwritten with a different value.
    pub updated: usize,
    /// Cookies whose value was already present; no write issued.
    pub skipped: usize,
    /// Source cookie count.
    pub total: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl SourceOutcome {
    /// Cookies actually written: copied + updated.
    pub fn count(&self) -> usize {
        self.copied + self.updated
    }
}

/// Commutative sums over every source that succeeded, plus how many sources
/// were attempted in total. Per-source failures land in `warnings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateOutcome {
    /// Total cookies written across sources (copied + updated).
    pub total_cookies: usize,
    pub total_copied: usize,
    pub total_updated: usize,
    pub total_skipped: usize,
    /// Sources that succeeded.
    pub source_count: usize,
    /// Sources attempted, including failures.
    pub attempted: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl AggregateOutcome {
    /// Neutral no-op result (nothing attempted, nothing transferred).
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn absorb(&mut self, outcome: SourceOutcome) {
        self.total_cookies += outcome.count();
        self.total_copied += outcome.copied;
        self.total_updated += outcome.updated;
        self.total_skipped += outcome.skipped;
        self.source_count += 1;
        self.warnings.extend(outcome.warnings);
    }
}
