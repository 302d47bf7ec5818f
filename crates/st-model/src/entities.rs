//! Entity definitions for one analysis run.
//!
//! Entities are immutable after creation; the ingestion layer creates them
//! and the engine only looks them up.

use serde::{Deserialize, Serialize};
use st_core::{ElementId, LoadCaseId, ProjectId, ResultSetId, StoryId};

/// A horizontal level of the modeled structure.
///
/// `sort_order` is declared by the source export (ascending = bottom-to-top
/// or whatever the source sheet declared); the engine preserves it and never
/// re-derives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: StoryId,
    pub result_set: ResultSetId,
    pub name: String,
    pub sort_order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_m: Option<f64>,
}

/// Structural member kind. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Wall,
    Column,
    Beam,
    Quad,
}

/// A structural member tracked independently of story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub project: ProjectId,
    pub name: String,
    pub kind: ElementKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadCaseKind {
    TimeHistory,
    Pushover,
}

/// One named analysis scenario; unique name within its result set.
/// Created on first reference during ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadCase {
    pub id: LoadCaseId,
    pub result_set: ResultSetId,
    pub name: String,
    pub kind: LoadCaseKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisKind {
    TimeHistory,
    Pushover,
}

/// One complete independent analysis run. Owns its stories, elements and
/// load cases; cross-run identity is by name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    pub id: ResultSetId,
    pub project: ProjectId,
    pub name: String,
    pub kind: AnalysisKind,
}
