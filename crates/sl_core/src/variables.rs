//! crates/sl_core/src/variables.rs
//! Run parameters with safe defaults, plus domain validation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Points ceiling: rank `r` earns `POINTS_CEILING - r`, floored at 0.
pub const POINTS_CEILING: u32 = 101;

/// Minimum direct items for an ordered list to count as a ranking.
pub const DEFAULT_MIN_LIST_ITEMS: usize = 50;

/// ------------ Params ------------

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Params {
    /// Size of the reserved (consensus) segment.
    pub goat_limit: usize,
    /// Total output budget (reserved + remainder).
    pub seed_limit: usize,
    /// Worker pool size for per-candidate counter fetches.
    pub max_workers: usize,
    /// Number of complete months in the discovery window.
    pub months: u32,
    /// Articles taken from the head of each monthly top list.
    pub top_limit: usize,
    /// Ordered-list acceptance threshold in the markup extractor.
    pub min_list_items: usize,
    /// Titles per resolver call.
    pub resolve_batch_size: usize,
    /// Share of the normalized traffic count when weights are supplied.
    pub traffic_weight: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            goat_limit: 100,
            seed_limit: 500,
            max_workers: 6,
            months: 12,
            top_limit: 1000,
            min_list_items: DEFAULT_MIN_LIST_ITEMS,
            resolve_batch_size: 200,
            traffic_weight: 0.75,
        }
    }
}

impl Params {
    /// Share of the external weight (complement of `traffic_weight`).
    pub fn weight_share(&self) -> f64 {
        1.0 - self.traffic_weight
    }

    /// Remainder budget once the reserved segment is full.
    pub fn remainder_budget(&self) -> usize {
        self.seed_limit.saturating_sub(self.goat_limit)
    }

    /// Validate numeric domains and cross-field consistency.
    pub fn validate_domains(&self) -> Result<(), CoreError> {
        if self.max_workers == 0 {
            return Err(CoreError::DomainOutOfRange("max_workers"));
        }
        if self.months == 0 {
            return Err(CoreError::DomainOutOfRange("months"));
        }
        if self.top_limit == 0 {
            return Err(CoreError::DomainOutOfRange("top_limit"));
        }
        if self.min_list_items == 0 {
            return Err(CoreError::DomainOutOfRange("min_list_items"));
        }
        if self.resolve_batch_size == 0 {
            return Err(CoreError::DomainOutOfRange("resolve_batch_size"));
        }
        if !self.traffic_weight.is_finite() || !(0.0..=1.0).contains(&self.traffic_weight) {
            return Err(CoreError::DomainOutOfRange("traffic_weight"));
        }

        // --- Cross-field consistency ---
        if self.goat_limit > self.seed_limit {
            return Err(CoreError::ReservedExceedsTotal {
                goat_limit: self.goat_limit,
                seed_limit: self.seed_limit,
            });
        }
        Ok(())
    }
}
