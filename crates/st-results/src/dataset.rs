//! Dataset assembly: cache entries to ready-to-render tables.
//!
//! Datasets are transient and never persisted; "no data" is the `Ok(None)`
//! branch and a perfectly normal outcome for consumers.

use std::collections::BTreeSet;

use st_cache::{CacheEntry, CacheScope, CacheStore, Direction, LoadCaseKey, ResultKind, SortOrder};
use st_core::{ElementId, ProjectId, Real, ResultSetId, row_max, row_mean, row_min};
use st_model::ModelRegistry;

use crate::ResultsResult;
use crate::config::{DisplayConfig, SummaryPolicy, display_config};
use crate::envelope::{AbsMaxMinEntry, Sign};

/// One value column of an assembled table. Missing cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub header: String,
    pub values: Vec<Option<Real>>,
}

/// An ordered, display-ready table: a leading label column plus one column
/// per load-case key, with summary columns appended per the kind's policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label_header: String,
    pub unit: &'static str,
    pub labels: Vec<String>,
    pub columns: Vec<Column>,
}

impl Dataset {
    pub fn n_rows(&self) -> usize {
        self.labels.len()
    }

    pub fn column(&self, header: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.header == header)
    }
}

/// One envelope cell: governing absolute value plus the signed pair it was
/// derived from, all in display units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxMinCell {
    pub absolute_value: Real,
    pub sign: Option<Sign>,
    pub original_max: Real,
    pub original_min: Real,
}

/// Envelope table: one row per story, one cell column per load-case key.
#[derive(Debug, Clone, PartialEq)]
pub struct MaxMinDataset {
    pub label_header: String,
    pub unit: &'static str,
    pub labels: Vec<String>,
    pub columns: Vec<String>,
    pub cells: Vec<Vec<Option<MaxMinCell>>>,
}

fn row_label(registry: &ModelRegistry, scope: &CacheScope) -> String {
    match scope {
        CacheScope::Story(id) | CacheScope::ElementStory { story: id, .. } => registry
            .story(*id)
            .map_or_else(|| id.to_string(), |s| s.name.clone()),
        CacheScope::Joint { unique_name } => unique_name.clone(),
    }
}

fn summary_stat(header: &str, cells: &[Option<Real>]) -> Option<Real> {
    match header {
        "Avg" | "Average" => row_mean(cells),
        "Max" | "Maximum" => row_max(cells),
        "Min" | "Minimum" => row_min(cells),
        _ => None,
    }
}

fn is_summary_case(policy: SummaryPolicy, key: &LoadCaseKey) -> bool {
    policy
        .headers()
        .iter()
        .any(|&h| h == key.case)
}

fn key_matches_direction(key: &LoadCaseKey, direction: Option<Direction>) -> bool {
    match direction {
        None => true,
        Some(d) => key.direction == Some(d),
    }
}

fn column_header(key: &LoadCaseKey, direction: Option<Direction>) -> String {
    // With a direction filter the suffix is implied by the request.
    if direction.is_some() {
        key.case.clone()
    } else {
        key.to_string()
    }
}

fn build_table(
    entries: &[CacheEntry],
    registry: &ModelRegistry,
    cfg: &DisplayConfig,
    direction: Option<Direction>,
) -> Dataset {
    let union: BTreeSet<&LoadCaseKey> = entries
        .iter()
        .flat_map(|e| e.matrix.keys())
        .filter(|k| key_matches_direction(k, direction))
        .collect();

    let (summary_keys, case_keys): (Vec<&LoadCaseKey>, Vec<&LoadCaseKey>) = union
        .into_iter()
        .partition(|k| is_summary_case(cfg.summary, k));

    let labels: Vec<String> = entries
        .iter()
        .map(|e| row_label(registry, &e.key.scope))
        .collect();

    let mut columns: Vec<Column> = case_keys
        .iter()
        .map(|key| Column {
            header: column_header(key, direction),
            values: entries
                .iter()
                .map(|e| e.matrix.get(key).map(|v| v * cfg.scale))
                .collect(),
        })
        .collect();

    // Summary columns, in the policy's declared order. A precomputed
    // pseudo-case column from the import wins over a row-wise computation,
    // which only ever spans the load-case columns.
    let case_column_count = columns.len();
    for &header in cfg.summary.headers() {
        let precomputed = summary_keys.iter().find(|k| k.case == header);
        let values: Vec<Option<Real>> = match precomputed {
            Some(key) => entries
                .iter()
                .map(|e| e.matrix.get(key).map(|v| v * cfg.scale))
                .collect(),
            None => (0..entries.len())
                .map(|row| {
                    let cells: Vec<Option<Real>> = columns[..case_column_count]
                        .iter()
                        .map(|c| c.values[row])
                        .collect();
                    summary_stat(header, &cells)
                })
                .collect(),
        };
        columns.push(Column {
            header: header.to_string(),
            values,
        });
    }

    Dataset {
        label_header: cfg.label_header.to_string(),
        unit: cfg.unit,
        labels,
        columns,
    }
}

/// Assemble the table for one (result set, kind), optionally filtered to one
/// direction and/or one element. Returns `Ok(None)` when the cache holds no
/// entries for the key.
pub fn assemble<S: CacheStore>(
    store: &S,
    registry: &ModelRegistry,
    project: ProjectId,
    result_set: ResultSetId,
    kind: ResultKind,
    direction: Option<Direction>,
    element: Option<ElementId>,
) -> ResultsResult<Option<Dataset>> {
    let cfg = display_config(kind);
    let entries = store.get_all_for(project, result_set, kind, element, cfg.story_order)?;
    if entries.is_empty() {
        return Ok(None);
    }
    Ok(Some(build_table(&entries, registry, &cfg, direction)))
}

/// Assemble a joint-scoped entry as a one-column table keyed by load case.
pub fn assemble_joint<S: CacheStore>(
    store: &S,
    project: ProjectId,
    result_set: ResultSetId,
    kind: ResultKind,
    unique_name: &str,
) -> ResultsResult<Option<Dataset>> {
    let cfg = display_config(kind);
    let Some(entry) = store.get_joint(project, result_set, kind, unique_name)? else {
        return Ok(None);
    };
    let labels: Vec<String> = entry.matrix.keys().map(ToString::to_string).collect();
    let values: Vec<Option<Real>> = entry.matrix.values().map(|v| Some(v * cfg.scale)).collect();
    Ok(Some(Dataset {
        label_header: "Load Case".to_string(),
        unit: cfg.unit,
        labels,
        columns: vec![Column {
            header: unique_name.to_string(),
            values,
        }],
    }))
}

/// Assemble the envelope table for a paired-extreme kind from precomputed
/// envelope rows. Scaling to display units happens here, not in the stored
/// entries.
pub fn assemble_maxmin(
    entries: &[AbsMaxMinEntry],
    registry: &ModelRegistry,
    base_kind: ResultKind,
) -> Option<MaxMinDataset> {
    if entries.is_empty() {
        return None;
    }
    let cfg = display_config(base_kind);

    // Entries arrive in ascending story order from the calculator; flip for
    // kinds displayed top-first.
    let mut story_ids: Vec<st_core::StoryId> = Vec::new();
    for e in entries {
        if !story_ids.contains(&e.story) {
            story_ids.push(e.story);
        }
    }
    if cfg.story_order == SortOrder::Descending {
        story_ids.reverse();
    }

    let columns: Vec<LoadCaseKey> = entries
        .iter()
        .map(|e| e.load_case.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let cells: Vec<Vec<Option<MaxMinCell>>> = story_ids
        .iter()
        .map(|&story| {
            columns
                .iter()
                .map(|case| {
                    entries
                        .iter()
                        .find(|e| e.story == story && &e.load_case == case)
                        .map(|e| MaxMinCell {
                            absolute_value: e.absolute_value * cfg.scale,
                            sign: e.sign,
                            original_max: e.original_max * cfg.scale,
                            original_min: e.original_min * cfg.scale,
                        })
                })
                .collect()
        })
        .collect();

    let labels = story_ids
        .iter()
        .map(|&id| {
            registry
                .story(id)
                .map_or_else(|| id.to_string(), |s| s.name.clone())
        })
        .collect();

    Some(MaxMinDataset {
        label_header: cfg.label_header.to_string(),
        unit: cfg.unit,
        labels,
        columns: columns.iter().map(ToString::to_string).collect(),
        cells,
    })
}
