//! st-results: envelopes, dataset assembly and run comparisons.
//!
//! Provides:
//! - per-kind display configuration (scale, unit, ordering, summary policy)
//! - envelope calculation (governing absolute value with sign tie-break)
//! - dataset assembly from cache entries into ready-to-render tables
//! - comparison tables across independent result sets with warnings

pub mod comparison;
pub mod config;
pub mod dataset;
pub mod envelope;

pub use comparison::{ComparisonDataset, Metric, Scope, Series, build_comparison};
pub use config::{DisplayConfig, SummaryPolicy, display_config};
pub use dataset::{
    Column, Dataset, MaxMinCell, MaxMinDataset, assemble, assemble_joint, assemble_maxmin,
};
pub use envelope::{AbsMaxMinEntry, EnvelopeStore, Sign, compute_story_envelopes, governing};

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("Cache store error: {0}")]
    Cache(#[from] st_cache::CacheError),

    #[error("Envelope requires paired Max/Min kinds, got: {kind}")]
    UnpairedKind { kind: st_cache::ResultKind },
}
