//! Segment selection under a total budget (deterministic).
//!
//! Contract:
//! - Reserved: consensus records in consensus order, keeping the first
//!   `min(goat_limit, seed_limit)` whose identity resolves in the universe.
//!   Misses are dropped and do not use up a slot.
//! - Remainder: every other universe member ranked by search score descending
//!   (ties keep universe insertion order), taking `seed_limit - goat_limit`
//!   (saturating).
//! - Output order: reserved segment, then remainder segment.

use std::collections::HashSet;

use sl_core::determinism::{sort_by_score_desc, sort_consensus};
use sl_core::{ConsensusRecord, Identity, OutputItem, Segment, SelectionCounts};
use tracing::{debug, info};

use crate::fusion::FusionMap;
use crate::popularity::PopularityScorer;

/// Final ordered list plus counters for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub items: Vec<OutputItem>,
    pub counts: SelectionCounts,
    /// Consensus records passed over because they did not resolve.
    pub reserved_misses: usize,
}

pub fn select_segments(
    universe: &FusionMap,
    consensus: &[ConsensusRecord],
    popularity: &PopularityScorer,
    goat_limit: usize,
    seed_limit: usize,
) -> Selection {
    let reserved_cap = goat_limit.min(seed_limit);

    // --- Reserved segment ---
    let mut ranked = consensus.to_vec();
    sort_consensus(&mut ranked);

    let mut items = Vec::with_capacity(seed_limit.min(universe.len()));
    let mut taken: HashSet<Identity> = HashSet::new();
    let mut misses = 0usize;
    for rec in &ranked {
        if taken.len() == reserved_cap {
            break;
        }
        let cand = match universe.get(&rec.identity) {
            Some(c) => c,
            None => {
                misses += 1;
                continue;
            }
        };
        if !taken.insert(rec.identity.clone()) {
            continue;
        }
        let pop = popularity.record(&rec.identity);
        items.push(OutputItem {
            title: cand.canonical_title.clone(),
            canonical_source_title: cand.source_title.clone(),
            external_id: cand.external_id.clone(),
            segment: Segment::Reserved,
            consensus_points: Some(rec.points),
            raw_count: pop.raw_count,
            popularity_score: popularity.search_score(&rec.identity),
        });
    }
    let reserved = items.len();
    if misses > 0 {
        info!(misses, "consensus records without a resolved candidate");
    }

    // --- Remainder segment ---
    let mut rest: Vec<(usize, f64)> = universe
        .all()
        .iter()
        .enumerate()
        .filter(|(_, c)| !taken.contains(&c.identity()))
        .map(|(i, c)| (i, popularity.search_score(&c.identity())))
        .collect();
    sort_by_score_desc(&mut rest);

    let budget = seed_limit.saturating_sub(goat_limit);
    for &(i, score) in rest.iter().take(budget) {
        let cand = &universe.all()[i];
        let id = cand.identity();
        items.push(OutputItem {
            title: cand.canonical_title.clone(),
            canonical_source_title: cand.source_title.clone(),
            external_id: cand.external_id.clone(),
            segment: Segment::Remainder,
            consensus_points: None,
            raw_count: popularity.raw_count(&id),
            popularity_score: score,
        });
    }
    let remainder = items.len() - reserved;
    debug!(reserved, remainder, candidates = universe.len(), "segments selected");

    Selection {
        items,
        counts: SelectionCounts { candidates: universe.len(), reserved, remainder },
        reserved_misses: misses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sl_core::CandidateItem;
    use std::collections::HashMap;

    fn universe(titles: &[&str]) -> FusionMap {
        let mut m = FusionMap::new();
        for (i, t) in titles.iter().enumerate() {
            m.insert(CandidateItem::new(*t, *t, format!("Q{i}")));
        }
        m
    }

    fn record(title: &str, points: u64, lists: u32, best: u32) -> ConsensusRecord {
        let mut r = ConsensusRecord::new(Identity::of(title), title);
        r.points = points;
        r.list_count = lists;
        r.best_rank = best;
        r
    }

    fn scorer(xs: &[(&str, u64)]) -> PopularityScorer {
        let c: HashMap<Identity, u64> = xs.iter().map(|&(t, v)| (Identity::of(t), v)).collect();
        PopularityScorer::new(c, HashMap::new())
    }

    #[test]
    fn two_reserved_plus_three_remainder() {
        let titles = ["g1", "g2", "o1", "o2", "o3", "o4", "o5", "o6", "o7", "o8", "o9", "o10"];
        let u = universe(&titles);
        let recs = vec![record("g2", 150, 2, 4), record("g1", 190, 2, 1)];
        let views: Vec<(&str, u64)> = titles.iter().enumerate().map(|(i, t)| (*t, i as u64 * 10)).collect();
        let pop = scorer(&views);

        let sel = select_segments(&u, &recs, &pop, 2, 5);
        let got: Vec<(&str, Segment)> =
            sel.items.iter().map(|o| (o.canonical_source_title.as_str(), o.segment)).collect();
        assert_eq!(
            got,
            vec![
                ("g1", Segment::Reserved),
                ("g2", Segment::Reserved),
                ("o10", Segment::Remainder),
                ("o9", Segment::Remainder),
                ("o8", Segment::Remainder),
            ]
        );
        assert_eq!(sel.counts, SelectionCounts { candidates: 12, reserved: 2, remainder: 3 });
        assert_eq!(sel.items[0].consensus_points, Some(190));
        assert_eq!(sel.items[2].consensus_points, None);
        let scores: Vec<f64> = sel.items[2..].iter().map(|o| o.popularity_score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn unresolved_records_do_not_take_slots() {
        let u = universe(&["a", "b", "c"]);
        let recs = vec![record("ghost", 300, 3, 1), record("b", 100, 1, 1), record("c", 50, 1, 51)];
        let pop = scorer(&[("a", 5)]);
        let sel = select_segments(&u, &recs, &pop, 2, 3);
        assert_eq!(sel.reserved_misses, 1);
        let got: Vec<&str> = sel.items.iter().map(|o| o.canonical_source_title.as_str()).collect();
        assert_eq!(got, ["b", "c", "a"]);
    }

    #[test]
    fn budgets_are_never_exceeded() {
        let u = universe(&["a", "b", "c", "d"]);
        let recs = vec![record("a", 10, 1, 91), record("b", 9, 1, 92), record("c", 8, 1, 93)];
        let pop = scorer(&[]);

        let sel = select_segments(&u, &recs, &pop, 5, 2);
        assert_eq!(sel.counts.reserved, 2);
        assert_eq!(sel.counts.remainder, 0);
        assert!(sel.items.len() <= 2);

        let sel = select_segments(&u, &recs, &pop, 0, 3);
        assert_eq!(sel.counts.reserved, 0);
        assert_eq!(sel.items.len(), 3);
    }

    #[test]
    fn score_ties_keep_universe_order() {
        let u = universe(&["p", "q", "r"]);
        let pop = scorer(&[]);
        let sel = select_segments(&u, &[], &pop, 0, 3);
        let got: Vec<&str> = sel.items.iter().map(|o| o.canonical_source_title.as_str()).collect();
        assert_eq!(got, ["p", "q", "r"]);
    }
}
