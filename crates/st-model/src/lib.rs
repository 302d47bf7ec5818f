//! st-model: analysis-run entities and lookup registry.
//!
//! Provides:
//! - Story / Element / LoadCase / ResultSet entity types
//! - `ModelRegistry`: name-to-key lookup tables with story ordering metadata

pub mod entities;
pub mod registry;

pub use entities::{
    AnalysisKind, Element, ElementKind, LoadCase, LoadCaseKind, ResultSet, Story,
};
pub use registry::ModelRegistry;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("Duplicate story name in result set: {name}")]
    DuplicateStory { name: String },

    #[error("Duplicate element name in project: {name}")]
    DuplicateElement { name: String },

    #[error("Duplicate result set name: {name}")]
    DuplicateResultSet { name: String },

    #[error("Unknown result set id: {0}")]
    UnknownResultSet(st_core::ResultSetId),
}
