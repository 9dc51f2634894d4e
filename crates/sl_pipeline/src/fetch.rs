//! fetch.rs
//! Concurrent per-candidate counter fetches on a bounded worker pool.
//!
//! - One call per candidate; candidates are distinct identities.
//! - A failed call yields a count of 0 plus a warning; no retries, no abort.
//! - The caller blocks until every call has completed.

use std::collections::HashMap;

use rayon::prelude::*;
use sl_core::{CandidateItem, Identity};
use tracing::{info, warn};

use crate::sources::CounterSource;
use crate::window::DateWindow;
use crate::PipelineError;

/// One failed counter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub identity: Identity,
    pub title: String,
    pub message: String,
}

/// Counts for every candidate (failures included at 0) plus the failures.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    pub counts: HashMap<Identity, u64>,
    pub failures: Vec<FetchFailure>,
}

pub fn fetch_counts<C>(
    candidates: &[CandidateItem],
    source: &C,
    window: &DateWindow,
    max_workers: usize,
) -> Result<FetchReport, PipelineError>
where
    C: CounterSource + ?Sized,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(max_workers.max(1))
        .thread_name(|i| format!("sl-fetch-{i}"))
        .build()
        .map_err(|e| PipelineError::Fetch(format!("worker pool: {e}")))?;

    let results: Vec<(Identity, &CandidateItem, Result<u64, String>)> = pool.install(|| {
        candidates
            .par_iter()
            .map(|c| {
                let r = source
                    .fetch_count(&c.source_title, window)
                    .map_err(|e| e.to_string());
                (c.identity(), c, r)
            })
            .collect()
    });

    let mut report = FetchReport {
        counts: HashMap::with_capacity(results.len()),
        failures: Vec::new(),
    };
    for (id, cand, r) in results {
        if report.counts.contains_key(&id) {
            continue;
        }
        let count = match r {
            Ok(n) => n,
            Err(message) => {
                warn!(title = %cand.source_title, error = %message, "counter fetch failed; scored 0");
                report.failures.push(FetchFailure {
                    identity: id.clone(),
                    title: cand.source_title.clone(),
                    message,
                });
                0
            }
        };
        report.counts.insert(id, count);
    }
    info!(
        candidates = candidates.len(),
        failures = report.failures.len(),
        workers = max_workers,
        "counter fetch complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SourceError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EveryThirdFails {
        calls: AtomicUsize,
    }

    impl CounterSource for EveryThirdFails {
        fn fetch_count(&self, title: &str, _w: &DateWindow) -> Result<u64, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let n: u64 = title.trim_start_matches('t').parse().unwrap_or(0);
            if n % 3 == 0 {
                Err(SourceError::Io(format!("timeout for {title}")))
            } else {
                Ok(n * 100)
            }
        }
    }

    fn window() -> DateWindow {
        DateWindow { start: "20240101".into(), end: "20241231".into() }
    }

    #[test]
    fn failures_score_zero_and_do_not_abort() {
        // t1..t10: t3, t6, t9 fail.
        let cands: Vec<CandidateItem> =
            (1..=10).map(|i| CandidateItem::new(format!("T{i}"), format!("t{i}"), format!("Q{i}"))).collect();
        let src = EveryThirdFails { calls: AtomicUsize::new(0) };
        let rep = fetch_counts(&cands, &src, &window(), 4).unwrap();

        assert_eq!(src.calls.load(Ordering::SeqCst), 10);
        assert_eq!(rep.counts.len(), 10);
        assert_eq!(rep.failures.len(), 3);
        for f in ["t3", "t6", "t9"] {
            assert_eq!(rep.counts[&Identity::of(f)], 0);
        }
        assert_eq!(rep.counts[&Identity::of("t7")], 700);
    }

    #[test]
    fn empty_batch_is_fine() {
        let src = EveryThirdFails { calls: AtomicUsize::new(0) };
        let rep = fetch_counts(&[], &src, &window(), 6).unwrap();
        assert!(rep.counts.is_empty());
        assert!(rep.failures.is_empty());
    }
}
