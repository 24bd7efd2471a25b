//! Error types for the Grid-Sight library.

use thiserror::Error;

use crate::dom::TableId;
use crate::enrich::{Enrichment, Target, TargetKind};

/// Main error type for Grid-Sight operations.
///
/// Routine conditions such as "no numeric cells in this column" or "this
/// heatmap is already on" are not errors; they come back as outcome values.
#[derive(Debug, Error)]
pub enum GridSightError {
    /// A categorical-only enrichment was requested on data that fails the
    /// categorical test.
    #[error("Frequency analysis can only be applied to categorical data ({target} of {table})")]
    NotCategorical { table: TableId, target: Target },

    /// The enrichment cannot be applied to this kind of target.
    #[error("{enrichment} cannot be applied to a {kind} target")]
    UnsupportedTarget {
        enrichment: Enrichment,
        kind: TargetKind,
    },

    /// The document holds no table with this handle.
    #[error("Table not found: {0}")]
    TableNotFound(TableId),

    /// Empty input where at least one value is required.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Grid-Sight operations.
pub type Result<T> = std::result::Result<T, GridSightError>;
