//! sl_pipeline - stage wiring for the seed list engine
//! (validate → window → discovery → fusion → consensus → fetch → popularity → selection → document).
//!
//! No network access happens here: every payload arrives through the
//! collaborator traits in [`sources`]. The binary wires them to
//! [`offline::CachedSources`]; tests wire in-memory fakes.

#![forbid(unsafe_code)]

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use sl_algo::{accumulate_discovery, select_segments, ConsensusScorer, FusionMap, PopularityScorer, Selection};
use sl_core::{Identity, Params, RankedEntry};
use sl_io::manifest::ListSource;
use sl_io::markup::RankExtractor;
use sl_io::weights::WeightMap;
use tracing::{debug, info, warn};

pub mod build_result;
pub mod fetch;
pub mod offline;
pub mod sources;
pub mod window;

pub use build_result::{build_seed_list, DocCounts, SeedListDoc};
pub use fetch::{fetch_counts, FetchFailure, FetchReport};
pub use offline::CachedSources;
pub use sources::{CounterSource, DiscoverySource, DocumentSource, Resolver, SourceError};
pub use window::{DateWindow, MonthKey};

/// Single error surface for the pipeline orchestration.
#[derive(Debug)]
pub enum PipelineError {
    Validate(String),
    Io(String),
    Source(String),
    Extract(String),
    Fetch(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Validate(m) => write!(f, "validate: {m}"),
            PipelineError::Io(m) => write!(f, "io: {m}"),
            PipelineError::Source(m) => write!(f, "source: {m}"),
            PipelineError::Extract(m) => write!(f, "extract: {m}"),
            PipelineError::Fetch(m) => write!(f, "fetch: {m}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<sl_io::IoError> for PipelineError {
    fn from(e: sl_io::IoError) -> Self {
        use sl_io::IoError;
        match e {
            IoError::Manifest(m) => PipelineError::Validate(format!("manifest: {m}")),
            IoError::Invalid(m) => PipelineError::Validate(m),
            other => PipelineError::Io(other.to_string()),
        }
    }
}

impl From<SourceError> for PipelineError {
    fn from(e: SourceError) -> Self {
        PipelineError::Source(e.to_string())
    }
}

/// Everything a run needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub params: Params,
    pub lists: Vec<ListSource>,
    pub weights: WeightMap,
    /// The window ends with the last complete month before this date.
    pub as_of: NaiveDate,
    pub generated_at: DateTime<Utc>,
}

/// Borrowed collaborators for one run.
#[derive(Clone, Copy)]
pub struct Sources<'a> {
    pub discovery: &'a dyn DiscoverySource,
    pub documents: &'a dyn DocumentSource,
    pub resolver: &'a dyn Resolver<Error = SourceError>,
    pub counters: &'a dyn CounterSource,
}

impl<'a> Sources<'a> {
    /// One value backing every collaborator.
    pub fn all<S>(src: &'a S) -> Self
    where
        S: DiscoverySource + DocumentSource + Resolver<Error = SourceError> + CounterSource,
    {
        Self { discovery: src, documents: src, resolver: src, counters: src }
    }
}

#[derive(Debug, Clone)]
pub struct RunOutputs {
    pub doc: SeedListDoc,
    pub selection: Selection,
    pub fetch_failures: Vec<FetchFailure>,
    pub lists_skipped: Vec<String>,
}

// -------------------------------------- Public API --------------------------------------

pub fn run_with_sources(cfg: &RunConfig, src: Sources<'_>) -> Result<RunOutputs, PipelineError> {
    let p = &cfg.params;

    // --- VALIDATE ---
    p.validate_domains().map_err(|e| PipelineError::Validate(e.to_string()))?;
    let extractor = RankExtractor::new(p.min_list_items).map_err(|e| PipelineError::Extract(e.to_string()))?;

    // --- WINDOW ---
    let months = window::month_sequence(window::last_complete_month(cfg.as_of), p.months);
    let win = DateWindow::for_months(&months)
        .ok_or_else(|| PipelineError::Validate(format!("no date window for {} months", p.months)))?;
    info!(start = %win.start, end = %win.end, months = months.len(), "window");

    // --- DISCOVERY ---
    let mut batches = Vec::with_capacity(months.len());
    for m in &months {
        match src.discovery.top_month(*m) {
            Ok(arts) => batches.push(arts),
            Err(SourceError::Missing(key)) => {
                warn!(year = m.year, month = m.month, key = %key, "top list missing; month skipped");
            }
            Err(e) => return Err(e.into()),
        }
    }
    let discovered = accumulate_discovery(&batches, p.top_limit);
    info!(titles = discovered.len(), months = batches.len(), "discovery");

    // --- FUSION (discovery titles first: first-wins precedence) ---
    let mut universe = FusionMap::new();
    universe.add_batch(discovered.titles(), src.resolver, p.resolve_batch_size)?;
    info!(fused = universe.len(), "discovery titles resolved");

    // --- CONSENSUS ---
    let mut scorer = ConsensusScorer::new();
    for list in &cfg.lists {
        let entries = load_list(&extractor, src.documents, list);
        scorer.add_list(&list.id, entries.as_deref());
    }
    info!(
        records = scorer.len(),
        scored = scorer.lists_scored().len(),
        skipped = scorer.lists_skipped().len(),
        "consensus"
    );

    let pending: Vec<String> = scorer
        .display_titles()
        .into_iter()
        .filter(|t| !universe.contains(&Identity::of(t)))
        .collect();
    let added = universe.add_batch(&pending, src.resolver, p.resolve_batch_size)?;
    info!(pending = pending.len(), added, fused = universe.len(), "consensus titles resolved");

    // --- FETCH ---
    let report = fetch_counts(universe.all(), src.counters, &win, p.max_workers)?;

    // --- POPULARITY ---
    let popularity = PopularityScorer::new(report.counts, cfg.weights.clone()).with_traffic_share(p.traffic_weight);
    debug!(
        max_count = popularity.max_count(),
        weighted = popularity.has_weights(),
        weight_share = p.weight_share(),
        "popularity"
    );

    // --- SELECTION ---
    let selection = select_segments(&universe, scorer.records(), &popularity, p.goat_limit, p.seed_limit);

    // --- BUILD ---
    let doc = build_seed_list(cfg.generated_at, win, discovered.len(), &selection);
    info!(
        candidates = doc.counts.candidates,
        fused = doc.counts.fused_candidates,
        reserved = doc.counts.reserved,
        remainder = doc.counts.remainder,
        "seed list built"
    );

    Ok(RunOutputs {
        doc,
        selection,
        fetch_failures: report.failures,
        lists_skipped: scorer.lists_skipped().to_vec(),
    })
}

/// Locate, fetch and extract one consensus list. `None` on any failure; the
/// caller records the list as skipped.
fn load_list(extractor: &RankExtractor, docs: &dyn DocumentSource, list: &ListSource) -> Option<Vec<RankedEntry>> {
    let page = match docs.find_page(&list.query) {
        Ok(Some(p)) => p,
        Ok(None) => {
            warn!(list = %list.id, query = %list.query, "no page for query");
            return None;
        }
        Err(e) => {
            warn!(list = %list.id, error = %e, "page search failed");
            return None;
        }
    };
    let html = match docs.fetch_document(&page) {
        Ok(Some(h)) => h,
        Ok(None) => {
            warn!(list = %list.id, page = %page, "document has no markup");
            return None;
        }
        Err(e) => {
            warn!(list = %list.id, page = %page, error = %e, "document fetch failed");
            return None;
        }
    };
    let entries = extractor.extract_ranked(&html);
    if entries.is_empty() {
        warn!(list = %list.id, page = %page, "extraction empty");
        return None;
    }
    debug!(list = %list.id, entries = entries.len(), "extracted");
    Some(entries)
}
