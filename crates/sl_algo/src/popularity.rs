//! Popularity scoring: batch-normalized traffic plus an optional external weight.
//!
//! Two-pass: the scorer is built only once every count of the batch is known,
//! since normalization divides by the batch maximum.
//!
//! - `normalized = raw / max_count` (`max_count` is 1 for an empty or all-zero batch)
//! - with a non-empty weight map: `score = t * normalized + (1 - t) * weight`
//!   where `t` is the traffic share (0.75 unless overridden) and a missing
//!   weight counts as 0
//! - without weights: `score = normalized`

use std::collections::HashMap;

use sl_core::{Identity, PopularityRecord};

/// Default share of the traffic signal when weights are present.
pub const TRAFFIC_SHARE_DEFAULT: f64 = 0.75;
/// Default share of the external weight (complement of the traffic share).
pub const WEIGHT_SHARE_DEFAULT: f64 = 1.0 - TRAFFIC_SHARE_DEFAULT;

#[derive(Debug, Clone)]
pub struct PopularityScorer {
    counts: HashMap<Identity, u64>,
    weights: HashMap<Identity, f64>,
    max_count: u64,
    traffic_share: f64,
}

impl PopularityScorer {
    pub fn new(counts: HashMap<Identity, u64>, weights: HashMap<Identity, f64>) -> Self {
        let max_count = counts.values().copied().max().filter(|&m| m > 0).unwrap_or(1);
        Self { counts, weights, max_count, traffic_share: TRAFFIC_SHARE_DEFAULT }
    }

    /// Override the traffic share (clamped to [0,1]).
    pub fn with_traffic_share(mut self, share: f64) -> Self {
        self.traffic_share = if share.is_finite() { share.clamp(0.0, 1.0) } else { TRAFFIC_SHARE_DEFAULT };
        self
    }

    pub fn max_count(&self) -> u64 {
        self.max_count
    }

    pub fn has_weights(&self) -> bool {
        !self.weights.is_empty()
    }

    pub fn raw_count(&self, id: &Identity) -> u64 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    pub fn normalized(&self, id: &Identity) -> f64 {
        self.raw_count(id) as f64 / self.max_count as f64
    }

    pub fn search_score(&self, id: &Identity) -> f64 {
        let n = self.normalized(id);
        if self.weights.is_empty() {
            return n;
        }
        let w = self.weights.get(id).copied().unwrap_or(0.0);
        self.traffic_share * n + (1.0 - self.traffic_share) * w
    }

    pub fn record(&self, id: &Identity) -> PopularityRecord {
        PopularityRecord {
            identity: id.clone(),
            raw_count: self.raw_count(id),
            normalized: self.normalized(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn counts(xs: &[(&str, u64)]) -> HashMap<Identity, u64> {
        xs.iter().map(|&(t, c)| (Identity::of(t), c)).collect()
    }

    #[test]
    fn no_weights_is_plain_normalization() {
        let s = PopularityScorer::new(counts(&[("a", 50), ("b", 200)]), HashMap::new());
        assert_eq!(s.max_count(), 200);
        assert!((s.search_score(&Identity::of("a")) - 0.25).abs() < 1e-12);
        assert!((s.search_score(&Identity::of("b")) - 1.0).abs() < 1e-12);
        assert_eq!(s.search_score(&Identity::of("zzz")), 0.0);
    }

    #[test]
    fn absent_weight_counts_as_zero_when_weights_exist() {
        let mut w = HashMap::new();
        w.insert(Identity::of("b"), 1.0);
        let s = PopularityScorer::new(counts(&[("a", 100), ("b", 100)]), w);
        assert!((s.search_score(&Identity::of("a")) - 0.75).abs() < 1e-12);
        assert!((s.search_score(&Identity::of("b")) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_and_all_zero_batches_use_unit_max() {
        let s = PopularityScorer::new(HashMap::new(), HashMap::new());
        assert_eq!(s.max_count(), 1);
        let s = PopularityScorer::new(counts(&[("a", 0)]), HashMap::new());
        assert_eq!(s.max_count(), 1);
        assert_eq!(s.record(&Identity::of("a")).normalized, 0.0);
    }

    #[test]
    fn traffic_share_override() {
        let mut w = HashMap::new();
        w.insert(Identity::of("a"), 0.5);
        let s = PopularityScorer::new(counts(&[("a", 10)]), w).with_traffic_share(0.5);
        assert!((s.search_score(&Identity::of("a")) - 0.75).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn normalized_stays_in_unit_interval(xs in proptest::collection::vec(0u64..1_000_000, 1..20)) {
            let c: HashMap<Identity, u64> =
                xs.iter().enumerate().map(|(i, &v)| (Identity::of(&format!("t{i}")), v)).collect();
            let s = PopularityScorer::new(c.clone(), HashMap::new());
            for id in c.keys() {
                let n = s.normalized(id);
                prop_assert!((0.0..=1.0).contains(&n));
            }
        }
    }
}
