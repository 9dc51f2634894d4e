// crates/sl_algo/src/lib.rs
//! Scoring and selection. Pure computation over `sl_core` types; the only
//! side effect is logging of degraded paths (skipped lists, resolution misses).
#![forbid(unsafe_code)]

pub mod consensus;
pub mod discovery;
pub mod fusion;
pub mod popularity;
pub mod selection;

pub use consensus::{points_for_rank, ConsensusScorer};
pub use discovery::{accumulate_discovery, DiscoveryTotals};
pub use fusion::{FusionMap, Resolver};
pub use popularity::{PopularityScorer, TRAFFIC_SHARE_DEFAULT, WEIGHT_SHARE_DEFAULT};
pub use selection::{select_segments, Selection};
