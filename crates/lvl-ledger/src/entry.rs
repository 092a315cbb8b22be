use serde::{Deserialize, Serialize};

/// Popularity and recency metadata for one level.
///
/// Serialized as the two-element array `[view_count, created_at]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u64, i64)", into = "(u64, i64)")]
pub struct LedgerEntry {
    /// Successful fetches so far.
    pub view_count: u64,
    /// Upload (or first discovery) time, Unix epoch seconds.
    pub created_at: i64,
}

impl LedgerEntry {
    /// A fresh entry with no views.
    pub fn new(created_at: i64) -> Self {
        Self {
            view_count: 0,
            created_at,
        }
    }

    /// The same entry with one more view.
    pub fn viewed(self) -> Self {
        Self {
            view_count: self.view_count.saturating_add(1),
            ..self
        }
    }
}

impl From<(u64, i64)> for LedgerEntry {
    fn from((view_count, created_at): (u64, i64)) -> Self {
        Self {
            view_count,
            created_at,
        }
    }
}

impl From<LedgerEntry> for (u64, i64) {
    fn from(entry: LedgerEntry) -> Self {
        (entry.view_count, entry.created_at)
    }
}
