//! Per-kind display configuration.
//!
//! One closed table resolves everything the assembler needs to know about a
//! result kind: numeric scale, unit label, row label header, the fixed story
//! display order, and which summary columns the assembled table carries.

use st_cache::{ResultKind, SortOrder};
use st_core::Real;

/// Summary-column policy for an assembled dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryPolicy {
    /// No summary columns.
    None,
    /// Append row-wise Average/Maximum/Minimum over the load-case columns.
    Rowwise,
    /// Reuse Avg/Max/Min pseudo-case columns already present in the cache
    /// matrix when the import carried them; compute row-wise otherwise.
    PrecomputedOrRowwise,
}

impl SummaryPolicy {
    /// Column headers this policy appends, in display order.
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            SummaryPolicy::None => &[],
            SummaryPolicy::Rowwise => &["Average", "Maximum", "Minimum"],
            SummaryPolicy::PrecomputedOrRowwise => &["Avg", "Max", "Min"],
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DisplayConfig {
    /// Multiplier applied to every numeric column at assembly time. Stored
    /// cache values always hold raw analysis units.
    pub scale: Real,
    /// Unit label for consumers; empty for dimensionless percentage kinds.
    pub unit: &'static str,
    pub label_header: &'static str,
    /// Fixed per kind, not caller-chosen: descending shows the top story
    /// first.
    pub story_order: SortOrder,
    pub summary: SummaryPolicy,
}

/// Resolve the display configuration for a result kind.
pub fn display_config(kind: ResultKind) -> DisplayConfig {
    match kind {
        ResultKind::StoryDrift(_) => DisplayConfig {
            scale: 100.0,
            unit: "%",
            label_header: "Story",
            story_order: SortOrder::Descending,
            summary: SummaryPolicy::PrecomputedOrRowwise,
        },
        ResultKind::StoryDisplacement(_) => DisplayConfig {
            scale: 1.0,
            unit: "mm",
            label_header: "Story",
            story_order: SortOrder::Descending,
            summary: SummaryPolicy::PrecomputedOrRowwise,
        },
        ResultKind::StoryAcceleration(_) => DisplayConfig {
            scale: 1.0,
            unit: "g",
            label_header: "Story",
            story_order: SortOrder::Descending,
            summary: SummaryPolicy::PrecomputedOrRowwise,
        },
        ResultKind::StoryShear(_) => DisplayConfig {
            scale: 1.0,
            unit: "kN",
            label_header: "Story",
            story_order: SortOrder::Descending,
            summary: SummaryPolicy::PrecomputedOrRowwise,
        },
        ResultKind::WallShear(_) => DisplayConfig {
            scale: 1.0,
            unit: "kN",
            label_header: "Story",
            story_order: SortOrder::Ascending,
            summary: SummaryPolicy::Rowwise,
        },
        ResultKind::WallRotation
        | ResultKind::ColumnRotation(_)
        | ResultKind::BeamRotation
        | ResultKind::QuadRotation => DisplayConfig {
            scale: 100.0,
            unit: "%",
            label_header: "Story",
            story_order: SortOrder::Ascending,
            summary: SummaryPolicy::Rowwise,
        },
        ResultKind::SoilPressure(_) => DisplayConfig {
            scale: 1.0,
            unit: "kPa",
            label_header: "Joint",
            story_order: SortOrder::Ascending,
            summary: SummaryPolicy::None,
        },
        ResultKind::JointDisplacement(_) => DisplayConfig {
            scale: 1.0,
            unit: "mm",
            label_header: "Joint",
            story_order: SortOrder::Ascending,
            summary: SummaryPolicy::None,
        },
    }
}
