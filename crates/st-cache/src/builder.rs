//! Two-phase cache rebuild from normalized result records.
//!
//! Records are staged into wide matrices grouped by cache scope; `commit`
//! swaps the staged set in by deleting the (project, result set, kind) scope
//! and upserting every group. Running build+commit twice over identical
//! input yields bit-identical matrices.

use std::collections::BTreeMap;

use st_core::{ProjectId, ResultSetId};
use st_model::ModelRegistry;
use tracing::{debug, warn};

use crate::CacheResult;
use crate::kind::{Direction, ResultKind};
use crate::store::CacheStore;
use crate::types::{CacheKey, CacheScope, LoadCaseKey, ResultsMatrix};

/// What a normalized record targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordTarget {
    Story(st_core::StoryId),
    Element {
        element: st_core::ElementId,
        story: st_core::StoryId,
    },
    Joint(String),
}

/// One normalized row from the ingestion layer: one story/element, one load
/// case, one direction, one value.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub target: RecordTarget,
    pub load_case: String,
    pub direction: Option<Direction>,
    pub value: f64,
    pub source_row_order: u32,
}

/// Outcome of one commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildSummary {
    pub groups_written: usize,
    pub records_ingested: usize,
    pub records_skipped: usize,
    pub entries_deleted: usize,
}

#[derive(Debug)]
struct StagedGroup {
    matrix: ResultsMatrix,
    story_sort_order: u32,
}

/// Stages normalized records for one (project, result set, kind) scope.
///
/// Direction-qualified global results merge X and Y into a single entry per
/// story; the direction lands in the load-case key suffix, so one entry
/// serves both directions.
#[derive(Debug)]
pub struct CacheBuilder {
    project: ProjectId,
    result_set: ResultSetId,
    kind: ResultKind,
    staged: BTreeMap<CacheScope, StagedGroup>,
    ingested: usize,
    skipped: usize,
}

impl CacheBuilder {
    pub fn new(project: ProjectId, result_set: ResultSetId, kind: ResultKind) -> Self {
        Self {
            project,
            result_set,
            kind,
            staged: BTreeMap::new(),
            ingested: 0,
            skipped: 0,
        }
    }

    pub fn kind(&self) -> ResultKind {
        self.kind
    }

    /// Number of staged groups so far.
    pub fn group_count(&self) -> usize {
        self.staged.len()
    }

    /// Stage one record. Records with unknown references or non-finite
    /// values are skipped and logged; referential integrity is the
    /// ingestion layer's contract, not ours.
    pub fn ingest(&mut self, registry: &ModelRegistry, record: &ResultRecord) {
        let Some(scope) = self.resolve_scope(registry, record) else {
            self.skipped += 1;
            return;
        };

        if registry
            .load_case_by_name(self.result_set, &record.load_case)
            .is_none()
        {
            warn!(
                kind = %self.kind,
                load_case = %record.load_case,
                "skipping record for unknown load case"
            );
            self.skipped += 1;
            return;
        }

        if !record.value.is_finite() {
            warn!(
                kind = %self.kind,
                load_case = %record.load_case,
                value = record.value,
                "skipping record with non-finite value"
            );
            self.skipped += 1;
            return;
        }

        let group = self.staged.entry(scope).or_insert_with(|| StagedGroup {
            matrix: ResultsMatrix::new(),
            // First record observed for the group supplies the sort order;
            // later records in the same group never overwrite it.
            story_sort_order: record.source_row_order,
        });
        group.matrix.insert(
            LoadCaseKey::new(record.load_case.clone(), record.direction),
            record.value,
        );
        self.ingested += 1;
    }

    fn resolve_scope(&self, registry: &ModelRegistry, record: &ResultRecord) -> Option<CacheScope> {
        match &record.target {
            RecordTarget::Story(story) => {
                let known = registry
                    .story(*story)
                    .is_some_and(|s| s.result_set == self.result_set);
                if !known {
                    warn!(kind = %self.kind, story = %story, "skipping record for unknown story");
                    return None;
                }
                Some(CacheScope::Story(*story))
            }
            RecordTarget::Element { element, story } => {
                if registry.element(*element).is_none() {
                    warn!(kind = %self.kind, element = %element, "skipping record for unknown element");
                    return None;
                }
                let known = registry
                    .story(*story)
                    .is_some_and(|s| s.result_set == self.result_set);
                if !known {
                    warn!(kind = %self.kind, story = %story, "skipping record for unknown story");
                    return None;
                }
                Some(CacheScope::ElementStory {
                    element: *element,
                    story: *story,
                })
            }
            RecordTarget::Joint(unique_name) => Some(CacheScope::Joint {
                unique_name: unique_name.clone(),
            }),
        }
    }

    /// Swap the staged set in: delete the whole (project, result set, kind)
    /// scope, then upsert every staged group. Deleting first guarantees no
    /// orphaned entries survive from load cases removed since the last
    /// import.
    pub fn commit<S: CacheStore>(self, store: &mut S) -> CacheResult<RebuildSummary> {
        let entries_deleted =
            store.delete_scope(self.project, Some(self.result_set), Some(self.kind))?;

        let groups_written = self.staged.len();
        for (scope, group) in self.staged {
            let key = CacheKey {
                project: self.project,
                result_set: self.result_set,
                kind: self.kind,
                scope,
            };
            store.upsert(key, group.matrix, group.story_sort_order)?;
        }

        debug!(
            kind = %self.kind,
            groups_written,
            records_ingested = self.ingested,
            records_skipped = self.skipped,
            entries_deleted,
            "cache rebuild committed"
        );

        Ok(RebuildSummary {
            groups_written,
            records_ingested: self.ingested,
            records_skipped: self.skipped,
            entries_deleted,
        })
    }
}
