//! build_result.rs
//! The output document: window, counts and the ordered items.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sl_algo::Selection;
use sl_core::OutputItem;

use crate::window::DateWindow;

/// Counts echoed in the document header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocCounts {
    /// Distinct discovery titles in the window.
    pub candidates: usize,
    /// Size of the fused universe (after resolution, incl. consensus items).
    pub fused_candidates: usize,
    pub reserved: usize,
    pub remainder: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedListDoc {
    /// RFC3339 UTC, second precision, `Z` suffix.
    pub generated_at: String,
    pub window: DateWindow,
    pub counts: DocCounts,
    pub items: Vec<OutputItem>,
}

pub fn format_generated_at(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn build_seed_list(
    generated_at: DateTime<Utc>,
    window: DateWindow,
    discovered: usize,
    selection: &Selection,
) -> SeedListDoc {
    SeedListDoc {
        generated_at: format_generated_at(generated_at),
        window,
        counts: DocCounts {
            candidates: discovered,
            fused_candidates: selection.counts.candidates,
            reserved: selection.counts.reserved,
            remainder: selection.counts.remainder,
        },
        items: selection.items.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sl_core::{Segment, SelectionCounts};

    #[test]
    fn header_echoes_selection_counts() {
        let sel = Selection {
            items: vec![OutputItem {
                title: "Vertigo".into(),
                canonical_source_title: "Vertigo (film)".into(),
                external_id: "Q202548".into(),
                segment: Segment::Reserved,
                consensus_points: Some(100),
                raw_count: 10,
                popularity_score: 1.0,
            }],
            counts: SelectionCounts { candidates: 7, reserved: 1, remainder: 0 },
            reserved_misses: 0,
        };
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let w = DateWindow { start: "20240301".into(), end: "20250228".into() };
        let doc = build_seed_list(ts, w, 42, &sel);
        assert_eq!(doc.generated_at, "2025-03-01T12:00:00Z");
        assert_eq!(doc.counts, DocCounts { candidates: 42, fused_candidates: 7, reserved: 1, remainder: 0 });
        assert_eq!(doc.items.len(), 1);

        let v = serde_json::to_value(&doc).unwrap();
        assert_eq!(v["items"][0]["segment"], "reserved");
        assert_eq!(v["window"]["end"], "20250228");
    }
}
