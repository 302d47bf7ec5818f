//! Shared application service layer for seistab.
//!
//! This crate provides the surface export and plotting frontends consume:
//! memoized dataset access, envelope retrieval, run comparisons, and the
//! full rebuild flow with coarse progress reporting.

pub mod error;
pub mod progress;
pub mod rebuild;
pub mod service;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use progress::ProgressEvent;
pub use rebuild::{RebuildReport, RecordBatch, rebuild_result_set};
pub use service::{DatasetKey, ResultDataService};
