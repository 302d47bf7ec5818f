//! st-cache: wide-matrix result cache and rebuild machinery.
//!
//! Provides:
//! - `ResultKind`: closed result-type taxonomy (decoded once at the boundary)
//! - `CacheEntry`/`CacheKey`/`LoadCaseKey`: materialized wide-format rows
//! - `CacheStore`: persistence abstraction + in-memory implementation
//! - `CacheBuilder`: two-phase (stage, swap) rebuild from normalized records
//! - snapshot persistence and content fingerprinting for a result set

pub mod builder;
pub mod hash;
pub mod kind;
pub mod snapshot;
pub mod store;
pub mod types;

pub use builder::{CacheBuilder, RebuildSummary, RecordTarget, ResultRecord};
pub use hash::compute_cache_fingerprint;
pub use kind::{Direction, Extreme, ResultKind, RotationAxis, ShearAxis};
pub use snapshot::{SnapshotManifest, SnapshotStore};
pub use store::{CacheStore, MemoryCacheStore};
pub use types::{CacheEntry, CacheKey, CacheScope, LoadCaseKey, ResultsMatrix, SortOrder};

pub type CacheResult<T> = Result<T, CacheError>;

#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot not found for result set: {result_set}")]
    SnapshotNotFound { result_set: String },

    #[error("Store backend error: {message}")]
    Backend { message: String },
}
