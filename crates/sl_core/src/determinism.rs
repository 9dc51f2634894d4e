//! crates/sl_core/src/determinism.rs
//! Determinism utilities: the stable orders used by selection.
//!
//! This module is **I/O-free**. It provides:
//! - The consensus order `(-points, -list_count, best_rank)`
//! - A descending score order that is total over `f64`
//! - Stable in-place sort helpers (true ties keep encounter order)

use core::cmp::Ordering;

use crate::entities::ConsensusRecord;

/* -------------------------------------------------------------------------- */
/*                               Stable Ordering                              */
/* -------------------------------------------------------------------------- */

/// Key for consensus ranking; ascending order of this key is the ranking order.
#[inline]
pub fn consensus_key(r: &ConsensusRecord) -> (core::cmp::Reverse<u64>, core::cmp::Reverse<u32>, u32) {
    (
        core::cmp::Reverse(r.points),
        core::cmp::Reverse(r.list_count),
        r.best_rank,
    )
}

/// Highest points first, then more lists, then smaller best rank.
#[inline]
pub fn consensus_order(a: &ConsensusRecord, b: &ConsensusRecord) -> Ordering {
    consensus_key(a).cmp(&consensus_key(b))
}

/// Descending by score. NaN sorts after every number.
#[inline]
pub fn cmp_score_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

/* -------------------------------------------------------------------------- */
/*                            Canonical sort helpers                           */
/* -------------------------------------------------------------------------- */

/// Sort records **in place** into consensus order. Stable.
#[inline]
pub fn sort_consensus(xs: &mut [ConsensusRecord]) {
    xs.sort_by(consensus_order);
}

/// Sort `(key, score)` pairs **in place** by descending score. Stable.
#[inline]
pub fn sort_by_score_desc<K>(xs: &mut [(K, f64)]) {
    xs.sort_by(|a, b| cmp_score_desc(a.1, b.1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::Identity;
    use alloc::vec;
    use alloc::vec::Vec;

    fn rec(name: &str, points: u64, lists: u32, best: u32) -> ConsensusRecord {
        let mut r = ConsensusRecord::new(Identity::of(name), name);
        r.points = points;
        r.list_count = lists;
        r.best_rank = best;
        r
    }

    #[test]
    fn points_then_lists_then_best_rank() {
        let mut xs = vec![
            rec("c", 150, 2, 3),
            rec("a", 190, 2, 1),
            rec("d", 150, 2, 1),
            rec("b", 150, 3, 40),
        ];
        sort_consensus(&mut xs);
        let order: Vec<&str> = xs.iter().map(|r| r.identity.as_str()).collect();
        assert_eq!(order, ["a", "b", "d", "c"]);
    }

    #[test]
    fn true_ties_keep_encounter_order() {
        let mut xs = vec![rec("first", 10, 1, 91), rec("second", 10, 1, 91)];
        sort_consensus(&mut xs);
        assert_eq!(xs[0].identity.as_str(), "first");
    }

    #[test]
    fn score_desc_is_total() {
        let mut xs = vec![("a", 0.25), ("b", f64::NAN), ("c", 1.0), ("d", 0.25)];
        sort_by_score_desc(&mut xs);
        let keys: Vec<&str> = xs.iter().map(|x| x.0).collect();
        assert_eq!(keys, ["c", "a", "d", "b"]);
    }
}
