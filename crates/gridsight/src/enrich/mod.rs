//! Enrichments applied to table rows, columns and whole tables.

mod color;
mod frequency;
mod heatmap;
mod statistics;
mod target;
mod zscore;

pub(crate) use target::{cell_texts, target_cells};

pub use color::{DEFAULT_COLOR_SCALE, color_for_value, default_color_scale, min_max, normalize_value};
pub use frequency::{
    EMPTY_LABEL, FREQUENCY_HEADER_CLASS, FrequencyEngine, FrequencyEntry, analyze_frequencies,
};
pub use heatmap::{
    ActivationKey, ApplyOutcome, CELL_CLASS, COLUMN_COLOR_PROPERTY, HeatmapEngine, HeatmapInfo,
    HeatmapOptions, ROW_COLOR_PROPERTY, RemoveOutcome, SPLIT_CLASS, TABLE_CLASS, TYPE_ATTRIBUTE,
    TrackedCell,
};
pub use statistics::{Statistics, calculate_statistics, format_number, format_statistics};
pub use target::{Enrichment, HeatmapTarget, Target, TargetKind};
pub use zscore::{
    DEFAULT_ZSCORE_THRESHOLD, OUTLIER_CLASS, Outlier, OutlierEngine, OutlierOutcome,
    ZSCORE_ATTRIBUTE, calculate_zscores,
};
