//! Full rebuild flow: cache batches, envelopes, memo invalidation.
//!
//! Expected to run on a dedicated worker thread; the progress callback fires
//! synchronously at batch boundaries, which is also where a caller that
//! wants cancellation simply stops feeding the flow.

use st_cache::{CacheBuilder, CacheStore, RebuildSummary, ResultKind, ResultRecord};
use st_core::ResultSetId;
use st_model::ModelRegistry;
use st_results::compute_story_envelopes;
use tracing::info;

use crate::error::AppResult;
use crate::progress::{ProgressEvent, emit};
use crate::service::ResultDataService;

/// One result type's worth of normalized records.
#[derive(Debug, Clone)]
pub struct RecordBatch {
    pub kind: ResultKind,
    pub records: Vec<ResultRecord>,
}

/// Outcome of a full rebuild.
#[derive(Debug, Clone, Default)]
pub struct RebuildReport {
    pub summaries: Vec<(ResultKind, RebuildSummary)>,
    pub envelope_rows: usize,
}

/// Rebuild one result set's cache from record batches, recompute its
/// envelope set, and invalidate everything memoized for it.
///
/// Each batch is one stage-and-swap commit; the most recent rebuild fully
/// determines visible content.
pub fn rebuild_result_set<S: CacheStore>(
    service: &mut ResultDataService<S>,
    registry: &ModelRegistry,
    result_set: ResultSetId,
    batches: &[RecordBatch],
    envelope_kind: Option<ResultKind>,
    mut progress: Option<&mut dyn FnMut(ProgressEvent)>,
) -> AppResult<RebuildReport> {
    let total = batches.len() + usize::from(envelope_kind.is_some());
    let project = service.project();
    let mut report = RebuildReport::default();

    for (i, batch) in batches.iter().enumerate() {
        emit(
            &mut progress,
            format!("Rebuilding {} cache", batch.kind),
            i,
            total,
        );
        let mut builder = CacheBuilder::new(project, result_set, batch.kind);
        for record in &batch.records {
            builder.ingest(registry, record);
        }
        let summary = builder.commit(service.store_mut())?;
        report.summaries.push((batch.kind, summary));
    }

    // The memo must go before fresh envelopes are installed: invalidation
    // also clears the result set's envelope rows.
    service.invalidate_result_set(result_set);

    if let Some(base_kind) = envelope_kind {
        emit(
            &mut progress,
            "Recomputing absolute max/min envelopes",
            batches.len(),
            total,
        );
        let entries = compute_story_envelopes(service.store(), project, result_set, base_kind)?;
        report.envelope_rows = entries.len();
        service.install_envelopes(result_set, base_kind, entries);
    }

    emit(&mut progress, "Rebuild complete", total, total);

    info!(
        result_set = %result_set,
        batches = batches.len(),
        envelope_rows = report.envelope_rows,
        "result set rebuilt"
    );
    Ok(report)
}
