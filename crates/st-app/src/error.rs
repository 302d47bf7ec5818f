//! Error types for the st-app service layer.

/// Application error type wrapping errors from the backend crates.
///
/// Recoverable conditions (no data, partial comparisons, skipped records)
/// never surface here; these variants are the hard failures.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Model error: {0}")]
    Model(#[from] st_model::ModelError),

    #[error("Cache error: {0}")]
    Cache(#[from] st_cache::CacheError),

    #[error("Results error: {0}")]
    Results(#[from] st_results::ResultsError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for st-app operations.
pub type AppResult<T> = Result<T, AppError>;
