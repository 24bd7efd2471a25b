//! Grid-Sight: column type detection and visual enrichment for HTML tables.
//!
//! Grid-Sight finds the tables of a page, classifies each column (and row)
//! as numeric, categorical or unknown, and applies lightweight enrichments
//! to the cells: heatmap shading, z-score outlier highlighting, frequency
//! counts and summary statistics.
//!
//! # Core Principles
//!
//! - **Owned state**: tables live in a [`Document`] arena and are addressed
//!   by handle and cell position, never by reference
//! - **Exact reversal**: every enrichment records what it changed, so
//!   removing it restores the table, including overlapping heatmaps
//! - **Quiet no-ops**: empty tables and non-numeric targets are logged, not
//!   treated as errors
//!
//! # Example
//!
//! ```
//! use gridsight::{Document, GridSight, Target};
//!
//! let mut document = Document::parse_html(
//!     "<table><thead><tr><th>Item</th><th>Price</th></tr></thead>\
//!      <tbody><tr><td>Tea</td><td>$3.50</td></tr>\
//!      <tr><td>Cake</td><td>$4.25</td></tr></tbody></table>",
//! );
//!
//! let mut grid_sight = GridSight::new();
//! let tables = grid_sight.initialize(&mut document);
//!
//! let active = grid_sight
//!     .toggle_heatmap(&mut document, tables[0], Target::Column(1))
//!     .unwrap();
//! assert!(active);
//! ```

pub mod detection;
pub mod dom;
pub mod enrich;
pub mod error;
pub mod events;

mod grid_sight;

pub use crate::grid_sight::{
    ACTIVE_CLASS, Affordance, CELL_INDEX_ATTRIBUTE, GridSight, GridSightConfig,
    PROCESSED_ATTRIBUTE, TABLE_CLASS,
};
pub use detection::{
    ColumnClassifier, ColumnType, TableAnalysis, TableAnalyzer, TypeDetectionOptions, is_numeric,
    parse_numeric,
};
pub use dom::{Cell, CellKind, CellPos, Document, Table, TableId};
pub use enrich::{
    ApplyOutcome, Enrichment, HeatmapEngine, HeatmapOptions, HeatmapTarget, RemoveOutcome,
    Target, TargetKind,
};
pub use error::{GridSightError, Result};
pub use events::{GridSightEvent, ListenerId, ListenerScope};
