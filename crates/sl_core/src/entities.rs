//! crates/sl_core/src/entities.rs
//! Data model shared by every layer. Scoring state refers to candidates only by
//! `Identity`; the fusion map is the single owner of `CandidateItem`s.

use alloc::string::String;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::ids::Identity;

/// Sentinel `best_rank` for a record that no list has placed yet.
pub const UNPLACED_RANK: u32 = 999;

// ----------------------------- Candidates -----------------------------

/// One verified item of the fused universe.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CandidateItem {
    /// Preferred display label (entity label when the resolver has one).
    pub canonical_title: String,
    /// Title as it appears in the source that discovered it.
    pub source_title: String,
    /// Stable external identifier (e.g. `Q11424`).
    pub external_id: String,
}

impl CandidateItem {
    pub fn new(
        canonical_title: impl Into<String>,
        source_title: impl Into<String>,
        external_id: impl Into<String>,
    ) -> Self {
        Self {
            canonical_title: canonical_title.into(),
            source_title: source_title.into(),
            external_id: external_id.into(),
        }
    }

    /// Dedup key: normalized `source_title`.
    pub fn identity(&self) -> Identity {
        Identity::of(&self.source_title)
    }
}

/// `(rank, raw_title)` as read from one list document. Ranks may repeat.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RankedEntry {
    pub rank: u32,
    pub raw_title: String,
}

impl RankedEntry {
    pub fn new(rank: u32, raw_title: impl Into<String>) -> Result<Self, CoreError> {
        if rank == 0 {
            return Err(CoreError::InvalidRank);
        }
        Ok(Self { rank, raw_title: raw_title.into() })
    }
}

/// One entry of a monthly top list (`article` uses `_` for spaces).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TopArticle {
    pub article: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub views: u64,
}

impl TopArticle {
    pub fn new(article: impl Into<String>, views: u64) -> Self {
        Self { article: article.into(), views }
    }
}

// ----------------------------- Scores -----------------------------

/// Accumulated consensus for one identity across all lists.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConsensusRecord {
    pub identity: Identity,
    pub points: u64,
    pub list_count: u32,
    pub best_rank: u32,
    pub display_title: String,
}

impl ConsensusRecord {
    /// Empty record; `best_rank` starts at the sentinel.
    pub fn new(identity: Identity, display_title: impl Into<String>) -> Self {
        Self {
            identity,
            points: 0,
            list_count: 0,
            best_rank: UNPLACED_RANK,
            display_title: display_title.into(),
        }
    }

    /// Additive update. `points`/`list_count` only grow, `best_rank` only shrinks,
    /// `display_title` is last-write.
    pub fn contribute(&mut self, rank: u32, points: u64, raw_title: &str) {
        self.points = self.points.saturating_add(points);
        self.list_count = self.list_count.saturating_add(1);
        self.best_rank = self.best_rank.min(rank);
        self.display_title.clear();
        self.display_title.push_str(raw_title);
    }

    /// Placed by at least one list.
    pub fn is_placed(&self) -> bool {
        self.list_count > 0
    }
}

/// Raw traffic count plus its batch-relative normalization.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PopularityRecord {
    pub identity: Identity,
    pub raw_count: u64,
    pub normalized: f64,
}

// ----------------------------- Output -----------------------------

/// Output segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Segment {
    /// Chosen by consensus rank, independent of popularity.
    Reserved,
    /// Popularity-ranked fill for the rest of the budget.
    Remainder,
}

impl Segment {
    pub fn as_str(self) -> &'static str {
        match self {
            Segment::Reserved => "reserved",
            Segment::Remainder => "remainder",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the final list. Order and segment are fixed at selection time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutputItem {
    pub title: String,
    pub canonical_source_title: String,
    pub external_id: String,
    pub segment: Segment,
    pub consensus_points: Option<u64>,
    pub raw_count: u64,
    pub popularity_score: f64,
}

/// Summary counts exposed for reporting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectionCounts {
    pub candidates: usize,
    pub reserved: usize,
    pub remainder: usize,
}
