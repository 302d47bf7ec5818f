//! Comparison tables across independent result sets.
//!
//! A comparison never aborts because one run lacks data: failed series are
//! recorded as warnings and carried as all-`None` columns, so the consumer
//! can surface partial-failure messaging without losing the rest.

use std::collections::HashMap;

use st_cache::{CacheStore, Direction, ResultKind};
use st_core::{ElementId, ProjectId, Real, ResultSetId};
use st_model::ModelRegistry;
use tracing::warn;

use crate::ResultsResult;
use crate::config::display_config;
use crate::dataset::{Dataset, assemble, assemble_joint};

/// Summary metric extracted per row for a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Avg,
    Max,
    Min,
}

impl Metric {
    /// Column headers that can satisfy this metric, global-table spelling
    /// first, element-table spelling second.
    fn candidates(self) -> [&'static str; 2] {
        match self {
            Metric::Avg => ["Avg", "Average"],
            Metric::Max => ["Max", "Maximum"],
            Metric::Min => ["Min", "Minimum"],
        }
    }
}

/// What level the comparison is keyed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Story-level tables, one row per story.
    Global,
    /// One element's story rows.
    Element(ElementId),
    /// One joint, one row per load case.
    Joint(String),
}

/// One compared result set's column.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<Real>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonDataset {
    pub label_header: String,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    /// `last/first` over the populated series; present only when at least
    /// two series have data.
    pub ratio: Option<Series>,
    pub warnings: Vec<String>,
}

impl ComparisonDataset {
    pub fn has_data(&self) -> bool {
        self.series
            .iter()
            .any(|s| s.values.iter().any(Option::is_some))
    }
}

struct FetchedSeries {
    name: String,
    /// Label order as the source dataset presented it; empty when no data.
    label_order: Vec<String>,
    by_label: HashMap<String, Real>,
    has_data: bool,
}

fn extract_metric(dataset: &Dataset, metric: Metric) -> Option<(Vec<String>, HashMap<String, Real>)> {
    let column = metric
        .candidates()
        .iter()
        .find_map(|&h| dataset.column(h))?;
    let mut by_label = HashMap::new();
    for (label, value) in dataset.labels.iter().zip(&column.values) {
        if let Some(v) = value {
            by_label.insert(label.clone(), *v);
        }
    }
    Some((dataset.labels.clone(), by_label))
}

fn extract_joint(dataset: &Dataset) -> (Vec<String>, HashMap<String, Real>) {
    let mut by_label = HashMap::new();
    if let Some(column) = dataset.columns.first() {
        for (label, value) in dataset.labels.iter().zip(&column.values) {
            if let Some(v) = value {
                by_label.insert(label.clone(), *v);
            }
        }
    }
    (dataset.labels.clone(), by_label)
}

/// Build one comparison table over several result sets.
///
/// Row labels follow the first series that produced data; labels unique to
/// later series are appended in encounter order. Stores failures per series
/// in `warnings` and keeps going.
#[allow(clippy::too_many_arguments)]
pub fn build_comparison<S: CacheStore>(
    store: &S,
    registry: &ModelRegistry,
    project: ProjectId,
    result_sets: &[ResultSetId],
    kind: ResultKind,
    direction: Option<Direction>,
    metric: Metric,
    scope: &Scope,
) -> ResultsResult<ComparisonDataset> {
    let mut warnings: Vec<String> = Vec::new();
    let mut fetched: Vec<FetchedSeries> = Vec::new();

    for &rs in result_sets {
        let name = registry
            .result_set(rs)
            .map_or_else(|| format!("result set {rs}"), |r| r.name.clone());

        let dataset = match scope {
            Scope::Global => assemble(store, registry, project, rs, kind, direction, None),
            Scope::Element(element) => {
                assemble(store, registry, project, rs, kind, direction, Some(*element))
            }
            Scope::Joint(unique_name) => assemble_joint(store, project, rs, kind, unique_name),
        };

        match dataset {
            Err(e) => {
                warn!(result_set = %name, error = %e, "comparison series failed");
                warnings.push(format!("{name}: {e}"));
                fetched.push(no_data_series(name));
            }
            Ok(None) => {
                warnings.push(format!("{name}: no data for {kind}"));
                fetched.push(no_data_series(name));
            }
            Ok(Some(ds)) => {
                let extracted = match scope {
                    Scope::Joint(_) => Some(extract_joint(&ds)),
                    _ => extract_metric(&ds, metric),
                };
                match extracted {
                    None => {
                        warnings.push(format!("{name}: no {metric:?} column for {kind}"));
                        fetched.push(no_data_series(name));
                    }
                    Some((label_order, by_label)) => fetched.push(FetchedSeries {
                        name,
                        label_order,
                        by_label,
                        has_data: true,
                    }),
                }
            }
        }
    }

    // Union of labels: reference order from the first populated series.
    let mut labels: Vec<String> = Vec::new();
    for series in fetched.iter().filter(|s| s.has_data) {
        for label in &series.label_order {
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
    }

    let series: Vec<Series> = fetched
        .iter()
        .map(|f| Series {
            name: f.name.clone(),
            values: labels.iter().map(|l| f.by_label.get(l).copied()).collect(),
        })
        .collect();

    let populated: Vec<usize> = fetched
        .iter()
        .enumerate()
        .filter_map(|(i, f)| f.has_data.then_some(i))
        .collect();

    let ratio = match (populated.first(), populated.last()) {
        (Some(&first), Some(&last)) if first != last => {
            let values = labels
                .iter()
                .enumerate()
                .map(|(row, _)| ratio_cell(series[last].values[row], series[first].values[row]))
                .collect();
            Some(Series {
                name: format!("{}/{}", series[last].name, series[first].name),
                values,
            })
        }
        _ => None,
    };

    let label_header = match scope {
        Scope::Joint(_) => "Load Case".to_string(),
        _ => display_config(kind).label_header.to_string(),
    };

    Ok(ComparisonDataset {
        label_header,
        labels,
        series,
        ratio,
        warnings,
    })
}

fn no_data_series(name: String) -> FetchedSeries {
    FetchedSeries {
        name,
        label_order: Vec::new(),
        by_label: HashMap::new(),
        has_data: false,
    }
}

fn ratio_cell(numerator: Option<Real>, denominator: Option<Real>) -> Option<Real> {
    let (num, den) = (numerator?, denominator?);
    let ratio = num / den;
    ratio.is_finite().then_some(ratio)
}
