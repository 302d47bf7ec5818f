//! Cache entry and key types.

use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use st_core::{ElementId, ProjectId, Real, ResultSetId, StoryId};

use crate::kind::{Direction, ResultKind};

/// Column key inside a results matrix: load-case name plus an optional
/// direction tag. Displayed as `"<case>"` or `"<case>_<dir>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoadCaseKey {
    pub case: String,
    pub direction: Option<Direction>,
}

impl LoadCaseKey {
    pub fn new(case: impl Into<String>, direction: Option<Direction>) -> Self {
        Self {
            case: case.into(),
            direction,
        }
    }
}

impl fmt::Display for LoadCaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Some(dir) => write!(f, "{}_{}", self.case, dir),
            None => f.write_str(&self.case),
        }
    }
}

/// Wide-format row content: one value per load-case key.
///
/// Keys are unique; map iteration order is irrelevant to consumers, which
/// always re-derive display order themselves.
pub type ResultsMatrix = BTreeMap<LoadCaseKey, Real>;

/// What one cache entry is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CacheScope {
    /// Global/per-story results (drifts, story shears, displacements).
    Story(StoryId),
    /// Per-element results, one row per element per story.
    ElementStory { element: ElementId, story: StoryId },
    /// Per-joint results, keyed by the source's unique joint name.
    Joint { unique_name: String },
}

/// Natural key of a cache entry. At most one entry exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey {
    pub project: ProjectId,
    pub result_set: ResultSetId,
    pub kind: ResultKind,
    pub scope: CacheScope,
}

/// A materialized wide-format row.
///
/// `story_sort_order` is copied from the first originating record at build
/// time and never recomputed from the Story entity afterwards; it preserves
/// source-sheet row order even if story ordering is later reassigned.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub matrix: ResultsMatrix,
    pub story_sort_order: u32,
}

/// Retrieval order over `story_sort_order` (flips bottom-first vs top-first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}
