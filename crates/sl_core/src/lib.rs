//! sl_core - Core types, identity normalization, ordering helpers, and params.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`sl_io`, `sl_algo`, `sl_pipeline`, `sl_report`, `sl_cli`).
//!
//! - Identity: `normalize`, `Identity` (the dedup key across all sources)
//! - Data model: `CandidateItem`, `RankedEntry`, `ConsensusRecord`,
//!   `PopularityRecord`, `OutputItem`, `Segment`, `TopArticle`
//! - Deterministic ordering helpers (consensus order, score order)
//! - `Params` with domain validation
//!
//! Serialization derives are gated behind the `serde` feature.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        /// A parameter is outside its allowed domain (name of the parameter).
        DomainOutOfRange(&'static str),
        /// `goat_limit` exceeds `seed_limit`.
        ReservedExceedsTotal { goat_limit: usize, seed_limit: usize },
        /// Rank must be a positive integer.
        InvalidRank,
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
                CoreError::ReservedExceedsTotal { goat_limit, seed_limit } => write!(
                    f,
                    "goat_limit ({goat_limit}) must not exceed seed_limit ({seed_limit})"
                ),
                CoreError::InvalidRank => write!(f, "rank must be >= 1"),
            }
        }
    }

    #[cfg(feature = "std")]
    impl std::error::Error for CoreError {}
}

pub mod ids;
pub mod entities;
pub mod determinism;
pub mod variables;

pub use entities::{
    CandidateItem, ConsensusRecord, OutputItem, PopularityRecord, RankedEntry, Segment,
    SelectionCounts, TopArticle,
};
pub use errors::CoreError;
pub use ids::{normalize, Identity};
pub use variables::Params;
