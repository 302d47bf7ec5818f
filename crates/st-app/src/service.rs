//! Memoized result-data access.
//!
//! The memo is private to the service instance and never invalidated
//! automatically: any component that mutates the underlying store must call
//! `invalidate_result_set` (or `invalidate_all`) itself.

use std::collections::HashMap;
use std::sync::Arc;

use st_cache::{CacheStore, Direction, ResultKind};
use st_core::{ElementId, ProjectId, ResultSetId};
use st_model::ModelRegistry;
use st_results::{
    AbsMaxMinEntry, ComparisonDataset, Dataset, EnvelopeStore, MaxMinDataset, Metric, Scope,
    assemble, assemble_maxmin, build_comparison, compute_story_envelopes,
};
use tracing::debug;

use crate::error::AppResult;

/// Memoization key for one assembled dataset. Story-level requests leave
/// `element` empty; element-level requests carry it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetKey {
    pub result_set: ResultSetId,
    pub kind: ResultKind,
    pub direction: Option<Direction>,
    pub element: Option<ElementId>,
}

/// Front door for export/plot consumers: assembles tables from the cache
/// store and memoizes them per request key.
pub struct ResultDataService<S: CacheStore> {
    project: ProjectId,
    store: S,
    envelopes: EnvelopeStore,
    /// Which base kind each result set's envelope rows were computed for.
    envelope_kind: HashMap<ResultSetId, ResultKind>,
    memo: HashMap<DatasetKey, Arc<Dataset>>,
}

impl<S: CacheStore> ResultDataService<S> {
    pub fn new(project: ProjectId, store: S) -> Self {
        Self {
            project,
            store,
            envelopes: EnvelopeStore::new(),
            envelope_kind: HashMap::new(),
            memo: HashMap::new(),
        }
    }

    pub fn project(&self) -> ProjectId {
        self.project
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access for rebuild flows. The caller owns the follow-up
    /// invalidation.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Install a freshly computed envelope set, replacing any prior rows.
    pub fn install_envelopes(
        &mut self,
        result_set: ResultSetId,
        base_kind: ResultKind,
        entries: Vec<AbsMaxMinEntry>,
    ) {
        self.envelopes.replace_all(result_set, entries);
        self.envelope_kind.insert(result_set, base_kind);
    }

    /// Story-level dataset for one (kind, direction, result set).
    /// A memo hit returns the same table reference; `Ok(None)` means the
    /// cache holds nothing for the key, which is a normal outcome.
    pub fn get_dataset(
        &mut self,
        registry: &ModelRegistry,
        kind: ResultKind,
        direction: Option<Direction>,
        result_set: ResultSetId,
    ) -> AppResult<Option<Arc<Dataset>>> {
        self.get_memoized(registry, kind, direction, result_set, None)
    }

    /// Element-level dataset: one element's rows across stories.
    pub fn get_element_dataset(
        &mut self,
        registry: &ModelRegistry,
        element: ElementId,
        kind: ResultKind,
        direction: Option<Direction>,
        result_set: ResultSetId,
    ) -> AppResult<Option<Arc<Dataset>>> {
        self.get_memoized(registry, kind, direction, result_set, Some(element))
    }

    fn get_memoized(
        &mut self,
        registry: &ModelRegistry,
        kind: ResultKind,
        direction: Option<Direction>,
        result_set: ResultSetId,
        element: Option<ElementId>,
    ) -> AppResult<Option<Arc<Dataset>>> {
        let key = DatasetKey {
            result_set,
            kind,
            direction,
            element,
        };
        if let Some(dataset) = self.memo.get(&key) {
            debug!(?key, "dataset memo hit");
            return Ok(Some(Arc::clone(dataset)));
        }
        let assembled = assemble(
            &self.store,
            registry,
            self.project,
            result_set,
            kind,
            direction,
            element,
        )?;
        match assembled {
            None => Ok(None),
            Some(dataset) => {
                let dataset = Arc::new(dataset);
                self.memo.insert(key, Arc::clone(&dataset));
                Ok(Some(dataset))
            }
        }
    }

    /// Envelope table for a paired-extreme kind. Envelope rows are computed
    /// lazily on first request per result set and replaced wholesale by
    /// `rebuild_result_set`.
    pub fn get_maxmin_dataset(
        &mut self,
        registry: &ModelRegistry,
        result_set: ResultSetId,
        base_kind: ResultKind,
    ) -> AppResult<Option<MaxMinDataset>> {
        let stale = self.envelopes.get(result_set).is_none()
            || self.envelope_kind.get(&result_set) != Some(&base_kind);
        if stale {
            let entries =
                compute_story_envelopes(&self.store, self.project, result_set, base_kind)?;
            self.envelopes.replace_all(result_set, entries);
            self.envelope_kind.insert(result_set, base_kind);
        }
        let entries = self.envelopes.get(result_set).unwrap_or(&[]);
        Ok(assemble_maxmin(entries, registry, base_kind))
    }

    /// Comparison across result sets; partial failures land in the returned
    /// dataset's warnings, never here.
    pub fn get_comparison_dataset(
        &self,
        registry: &ModelRegistry,
        kind: ResultKind,
        direction: Option<Direction>,
        result_sets: &[ResultSetId],
        metric: Metric,
        scope: &Scope,
    ) -> AppResult<ComparisonDataset> {
        Ok(build_comparison(
            &self.store,
            registry,
            self.project,
            result_sets,
            kind,
            direction,
            metric,
            scope,
        )?)
    }

    /// Drop one memoized table; the next request re-reads the store.
    pub fn invalidate(&mut self, key: &DatasetKey) {
        self.memo.remove(key);
    }

    /// Drop every memoized table and envelope set for one result set.
    pub fn invalidate_result_set(&mut self, result_set: ResultSetId) {
        self.memo.retain(|k, _| k.result_set != result_set);
        self.envelopes.clear(result_set);
        self.envelope_kind.remove(&result_set);
    }

    pub fn invalidate_all(&mut self) {
        self.memo.clear();
    }

    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }
}
