//! Point-based consensus over several ranked lists.
//!
//! Contract:
//! - Rank `r` earns `max(0, 101 - r)` points; ranks past 100 still count as a
//!   list appearance (list_count, best_rank) with zero points.
//! - Records are keyed by the normalized raw title and are only ever grown.
//! - A list with no entries is a logged skip, never an error.

use std::collections::HashMap;

use sl_core::determinism::sort_consensus;
use sl_core::variables::POINTS_CEILING;
use sl_core::{ConsensusRecord, Identity, RankedEntry};
use tracing::{debug, warn};

/// `max(0, 101 - rank)`.
#[inline]
pub fn points_for_rank(rank: u32) -> u64 {
    u64::from(POINTS_CEILING.saturating_sub(rank))
}

/// Accumulator over all consensus lists. Records keep first-contribution order.
#[derive(Debug, Default, Clone)]
pub struct ConsensusScorer {
    index: HashMap<Identity, usize>,
    records: Vec<ConsensusRecord>,
    lists_scored: Vec<String>,
    lists_skipped: Vec<String>,
}

impl ConsensusScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one list in. `None` or an empty slice marks the list as skipped.
    /// Returns the number of entries applied.
    pub fn add_list(&mut self, list_id: &str, entries: Option<&[RankedEntry]>) -> usize {
        let entries = match entries {
            Some(e) if !e.is_empty() => e,
            _ => {
                warn!(list = list_id, "no ranked entries; list skipped");
                self.lists_skipped.push(list_id.to_string());
                return 0;
            }
        };
        for e in entries {
            self.add_entry(e);
        }
        debug!(list = list_id, entries = entries.len(), records = self.records.len(), "list scored");
        self.lists_scored.push(list_id.to_string());
        entries.len()
    }

    /// Apply a single entry.
    pub fn add_entry(&mut self, entry: &RankedEntry) {
        let id = Identity::of(&entry.raw_title);
        let idx = match self.index.get(&id) {
            Some(&i) => i,
            None => {
                self.records.push(ConsensusRecord::new(id.clone(), entry.raw_title.as_str()));
                self.index.insert(id, self.records.len() - 1);
                self.records.len() - 1
            }
        };
        self.records[idx].contribute(entry.rank, points_for_rank(entry.rank), &entry.raw_title);
    }

    pub fn get(&self, id: &Identity) -> Option<&ConsensusRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in first-contribution order.
    pub fn records(&self) -> &[ConsensusRecord] {
        &self.records
    }

    /// Records in consensus order (`-points`, `-list_count`, `best_rank`).
    pub fn ranked(&self) -> Vec<ConsensusRecord> {
        let mut out = self.records.clone();
        sort_consensus(&mut out);
        out
    }

    /// Latest display title of every record, first-contribution order.
    pub fn display_titles(&self) -> Vec<String> {
        self.records.iter().map(|r| r.display_title.clone()).collect()
    }

    pub fn lists_scored(&self) -> &[String] {
        &self.lists_scored
    }

    pub fn lists_skipped(&self) -> &[String] {
        &self.lists_skipped
    }
}
