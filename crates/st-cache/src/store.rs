//! Cache persistence abstraction.
//!
//! All mutation is full-entry upsert or scope delete; no partial-field
//! update exists. Transaction boundaries around a rebuild are the backing
//! store's responsibility (the in-memory store applies them synchronously).

use std::collections::BTreeMap;

use st_core::{ElementId, ProjectId, ResultSetId};

use crate::CacheResult;
use crate::kind::ResultKind;
use crate::types::{CacheEntry, CacheKey, CacheScope, ResultsMatrix, SortOrder};

pub trait CacheStore {
    /// Insert or wholesale-replace the entry for `key`. Replacing never
    /// merges matrices field-by-field, so stale keys from a previous partial
    /// import cannot survive a rebuild.
    fn upsert(
        &mut self,
        key: CacheKey,
        matrix: ResultsMatrix,
        story_sort_order: u32,
    ) -> CacheResult<()>;

    /// All entries for one (project, result set, kind), optionally narrowed
    /// to one element, ordered by `story_sort_order`.
    fn get_all_for(
        &self,
        project: ProjectId,
        result_set: ResultSetId,
        kind: ResultKind,
        element: Option<ElementId>,
        order: SortOrder,
    ) -> CacheResult<Vec<CacheEntry>>;

    /// Single joint-scoped entry by unique name.
    fn get_joint(
        &self,
        project: ProjectId,
        result_set: ResultSetId,
        kind: ResultKind,
        unique_name: &str,
    ) -> CacheResult<Option<CacheEntry>>;

    /// Delete every entry in scope; `None` filters match everything.
    /// Returns the number of entries removed.
    fn delete_scope(
        &mut self,
        project: ProjectId,
        result_set: Option<ResultSetId>,
        kind: Option<ResultKind>,
    ) -> CacheResult<usize>;
}

/// Reference in-memory store. Entries live in a BTreeMap so iteration is
/// deterministic regardless of insertion order.
#[derive(Debug, Default, Clone)]
pub struct MemoryCacheStore {
    entries: BTreeMap<CacheKey, CacheEntry>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries of one result set in key order; used by snapshotting and
    /// fingerprinting.
    pub fn entries_of(&self, project: ProjectId, result_set: ResultSetId) -> Vec<&CacheEntry> {
        self.entries
            .values()
            .filter(|e| e.key.project == project && e.key.result_set == result_set)
            .collect()
    }
}

impl CacheStore for MemoryCacheStore {
    fn upsert(
        &mut self,
        key: CacheKey,
        matrix: ResultsMatrix,
        story_sort_order: u32,
    ) -> CacheResult<()> {
        self.entries.insert(
            key.clone(),
            CacheEntry {
                key,
                matrix,
                story_sort_order,
            },
        );
        Ok(())
    }

    fn get_all_for(
        &self,
        project: ProjectId,
        result_set: ResultSetId,
        kind: ResultKind,
        element: Option<ElementId>,
        order: SortOrder,
    ) -> CacheResult<Vec<CacheEntry>> {
        let mut out: Vec<CacheEntry> = self
            .entries
            .values()
            .filter(|e| {
                e.key.project == project && e.key.result_set == result_set && e.key.kind == kind
            })
            .filter(|e| match (element, &e.key.scope) {
                (None, _) => true,
                (Some(el), CacheScope::ElementStory { element, .. }) => *element == el,
                (Some(_), _) => false,
            })
            .cloned()
            .collect();
        // Stable: ties on sort order keep key order from the BTreeMap.
        match order {
            SortOrder::Ascending => out.sort_by_key(|e| e.story_sort_order),
            SortOrder::Descending => {
                out.sort_by_key(|e| std::cmp::Reverse(e.story_sort_order));
            }
        }
        Ok(out)
    }

    fn get_joint(
        &self,
        project: ProjectId,
        result_set: ResultSetId,
        kind: ResultKind,
        unique_name: &str,
    ) -> CacheResult<Option<CacheEntry>> {
        let key = CacheKey {
            project,
            result_set,
            kind,
            scope: CacheScope::Joint {
                unique_name: unique_name.to_string(),
            },
        };
        Ok(self.entries.get(&key).cloned())
    }

    fn delete_scope(
        &mut self,
        project: ProjectId,
        result_set: Option<ResultSetId>,
        kind: Option<ResultKind>,
    ) -> CacheResult<usize> {
        let before = self.entries.len();
        self.entries.retain(|k, _| {
            !(k.project == project
                && result_set.is_none_or(|rs| k.result_set == rs)
                && kind.is_none_or(|rk| k.kind == rk))
        });
        Ok(before - self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{Direction, Extreme};
    use crate::types::LoadCaseKey;
    use st_core::Id;

    fn key(rs: u32, story: u32) -> CacheKey {
        CacheKey {
            project: Id::from_index(0),
            result_set: Id::from_index(rs),
            kind: ResultKind::StoryDrift(Extreme::Max),
            scope: CacheScope::Story(Id::from_index(story)),
        }
    }

    fn matrix(v: f64) -> ResultsMatrix {
        let mut m = ResultsMatrix::new();
        m.insert(LoadCaseKey::new("TH01", Some(Direction::X)), v);
        m
    }

    #[test]
    fn upsert_replaces_matrix_wholesale() {
        let mut store = MemoryCacheStore::new();
        let mut first = matrix(0.1);
        first.insert(LoadCaseKey::new("TH02", Some(Direction::X)), 0.2);
        store.upsert(key(0, 0), first, 5).unwrap();
        store.upsert(key(0, 0), matrix(0.3), 5).unwrap();

        let got = store
            .get_all_for(
                Id::from_index(0),
                Id::from_index(0),
                ResultKind::StoryDrift(Extreme::Max),
                None,
                SortOrder::Ascending,
            )
            .unwrap();
        assert_eq!(got.len(), 1);
        // TH02 from the first upsert must be gone, not merged in.
        assert_eq!(got[0].matrix.len(), 1);
        assert_eq!(
            got[0].matrix[&LoadCaseKey::new("TH01", Some(Direction::X))],
            0.3
        );
    }

    #[test]
    fn get_all_for_orders_by_sort_order_both_ways() {
        let mut store = MemoryCacheStore::new();
        store.upsert(key(0, 0), matrix(0.1), 2).unwrap();
        store.upsert(key(0, 1), matrix(0.2), 0).unwrap();
        store.upsert(key(0, 2), matrix(0.3), 1).unwrap();

        let asc = store
            .get_all_for(
                Id::from_index(0),
                Id::from_index(0),
                ResultKind::StoryDrift(Extreme::Max),
                None,
                SortOrder::Ascending,
            )
            .unwrap();
        let orders: Vec<u32> = asc.iter().map(|e| e.story_sort_order).collect();
        assert_eq!(orders, [0, 1, 2]);

        let desc = store
            .get_all_for(
                Id::from_index(0),
                Id::from_index(0),
                ResultKind::StoryDrift(Extreme::Max),
                None,
                SortOrder::Descending,
            )
            .unwrap();
        let orders: Vec<u32> = desc.iter().map(|e| e.story_sort_order).collect();
        assert_eq!(orders, [2, 1, 0]);
    }

    #[test]
    fn delete_scope_counts_and_filters() {
        let mut store = MemoryCacheStore::new();
        store.upsert(key(0, 0), matrix(0.1), 0).unwrap();
        store.upsert(key(0, 1), matrix(0.2), 1).unwrap();
        store.upsert(key(1, 0), matrix(0.3), 0).unwrap();

        let n = store
            .delete_scope(Id::from_index(0), Some(Id::from_index(0)), None)
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(store.len(), 1);

        let n = store.delete_scope(Id::from_index(0), None, None).unwrap();
        assert_eq!(n, 1);
        assert!(store.is_empty());
    }
}
