//! Governing absolute max/min envelopes across load cases.
//!
//! Derived data only: the envelope set for a result set is deleted and
//! rebuilt wholesale on every recalculation, never partially updated.

use std::collections::HashMap;

use st_cache::{CacheScope, CacheStore, Extreme, LoadCaseKey, ResultKind, SortOrder};
use st_core::{ProjectId, Real, ResultSetId, StoryId};
use tracing::debug;

use crate::{ResultsError, ResultsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
}

/// Pick the governing branch between a signed max and a signed min.
///
/// `abs(max) >= abs(min)` takes the max branch; on an exact tie the max
/// branch wins. Order-sensitive on purpose.
pub fn governing(max: Real, min: Real) -> (Real, Sign) {
    if max.abs() >= min.abs() {
        let sign = if max >= 0.0 { Sign::Positive } else { Sign::Negative };
        (max.abs(), sign)
    } else {
        let sign = if min >= 0.0 { Sign::Positive } else { Sign::Negative };
        (min.abs(), sign)
    }
}

/// One envelope row: the governing absolute value for a (story, load-case
/// key) pair, with the original signed pair it came from. Values are raw
/// analysis units; percentage scaling happens at dataset assembly.
///
/// `sign` is tracked for drift only; other kinds keep the independent
/// non-negative magnitudes reachable via `abs_max`/`abs_min`.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsMaxMinEntry {
    pub result_set: ResultSetId,
    pub story: StoryId,
    pub load_case: LoadCaseKey,
    pub absolute_value: Real,
    pub sign: Option<Sign>,
    pub original_max: Real,
    pub original_min: Real,
}

impl AbsMaxMinEntry {
    pub fn abs_max(&self) -> Real {
        self.original_max.abs()
    }

    pub fn abs_min(&self) -> Real {
        self.original_min.abs()
    }
}

/// In-memory store of envelope rows, replace-all per result set.
#[derive(Debug, Default)]
pub struct EnvelopeStore {
    by_set: HashMap<ResultSetId, Vec<AbsMaxMinEntry>>,
}

impl EnvelopeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all prior rows for the result set and install the fresh set.
    pub fn replace_all(&mut self, result_set: ResultSetId, entries: Vec<AbsMaxMinEntry>) {
        debug!(result_set = %result_set, count = entries.len(), "envelope set replaced");
        self.by_set.insert(result_set, entries);
    }

    pub fn get(&self, result_set: ResultSetId) -> Option<&[AbsMaxMinEntry]> {
        self.by_set.get(&result_set).map(Vec::as_slice)
    }

    pub fn clear(&mut self, result_set: ResultSetId) {
        self.by_set.remove(&result_set);
    }
}

/// Whether a kind's envelope carries combined-sign bookkeeping.
fn tracks_sign(kind: ResultKind) -> bool {
    matches!(kind, ResultKind::StoryDrift(_))
}

/// Compute envelope rows for a story-level kind by joining its cached Max
/// and Min sheets per (story, load-case key).
///
/// Keys present on only one side have no signed pair to compare and are
/// skipped. Row order follows the Max sheet's `story_sort_order`.
pub fn compute_story_envelopes<S: CacheStore>(
    store: &S,
    project: ProjectId,
    result_set: ResultSetId,
    base_kind: ResultKind,
) -> ResultsResult<Vec<AbsMaxMinEntry>> {
    let max_kind = base_kind
        .with_extreme(Extreme::Max)
        .ok_or(ResultsError::UnpairedKind { kind: base_kind })?;
    let min_kind = base_kind
        .with_extreme(Extreme::Min)
        .ok_or(ResultsError::UnpairedKind { kind: base_kind })?;

    let max_entries = store.get_all_for(project, result_set, max_kind, None, SortOrder::Ascending)?;
    let min_entries = store.get_all_for(project, result_set, min_kind, None, SortOrder::Ascending)?;

    let min_by_scope: HashMap<&CacheScope, &st_cache::CacheEntry> =
        min_entries.iter().map(|e| (&e.key.scope, e)).collect();

    let signed = tracks_sign(base_kind);
    let mut out = Vec::new();
    for max_entry in &max_entries {
        let CacheScope::Story(story) = &max_entry.key.scope else {
            continue;
        };
        let story = *story;
        let Some(min_entry) = min_by_scope.get(&max_entry.key.scope) else {
            debug!(story = %story, "no Min sheet entry for story; skipping envelope");
            continue;
        };
        for (case_key, &max_value) in &max_entry.matrix {
            let Some(&min_value) = min_entry.matrix.get(case_key) else {
                continue;
            };
            let (absolute_value, sign) = governing(max_value, min_value);
            out.push(AbsMaxMinEntry {
                result_set,
                story,
                load_case: case_key.clone(),
                absolute_value,
                sign: signed.then_some(sign),
                original_max: max_value,
                original_min: min_value,
            });
        }
    }
    Ok(out)
}
