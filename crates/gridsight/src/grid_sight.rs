//! Main GridSight struct and public API.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::detection::{
    ColumnType, DEFAULT_SUITABILITY_MIN_COLUMNS, TableAnalysis, TableAnalyzer,
    TypeDetectionOptions, parse_numeric,
};
use crate::dom::{Document, Section, Table, TableId};
use crate::enrich::{
    DEFAULT_ZSCORE_THRESHOLD, Enrichment, FrequencyEngine, FrequencyEntry, HeatmapEngine,
    HeatmapOptions, OutlierEngine, Statistics, Target, calculate_statistics, cell_texts,
    target_cells,
};
use crate::error::{GridSightError, Result};
use crate::events::GridSightEvent;

/// Attribute marking a table as processed.
pub const PROCESSED_ATTRIBUTE: &str = "data-grid-sight-processed";
/// Class added to every processed table.
pub const TABLE_CLASS: &str = "grid-sight-table";
/// Class added while a table's toggle is on.
pub const ACTIVE_CLASS: &str = "grid-sight-active";
/// Attribute holding each cell's index in document order.
pub const CELL_INDEX_ATTRIBUTE: &str = "data-gs-cell-index";

/// Configuration for Grid-Sight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSightConfig {
    /// Column and row classification options.
    pub detection: TypeDetectionOptions,
    /// Heatmap scale and bounds.
    pub heatmap: HeatmapOptions,
    /// Numeric or categorical columns a table needs to be enrichable.
    pub suitability_min_columns: usize,
    /// `|z|` above which a value is highlighted as an outlier.
    pub zscore_threshold: f64,
}

impl Default for GridSightConfig {
    fn default() -> Self {
        Self {
            detection: TypeDetectionOptions::default(),
            heatmap: HeatmapOptions::default(),
            suitability_min_columns: DEFAULT_SUITABILITY_MIN_COLUMNS,
            zscore_threshold: DEFAULT_ZSCORE_THRESHOLD,
        }
    }
}

impl GridSightConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.detection.validate()?;
        self.heatmap.validate()?;
        if self.suitability_min_columns == 0 {
            return Err(GridSightError::Config(
                "suitability_min_columns must be at least 1".to_string(),
            ));
        }
        if !self.zscore_threshold.is_finite() || self.zscore_threshold < 0.0 {
            return Err(GridSightError::Config(format!(
                "zscore_threshold must be a non-negative number, got {}",
                self.zscore_threshold
            )));
        }
        Ok(())
    }
}

/// An enrichment menu offered for a row or column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Affordance {
    pub target: Target,
    pub data_type: ColumnType,
    pub enrichments: Vec<Enrichment>,
}

/// The main Grid-Sight engine.
///
/// Owns the analysis of every processed table and the state of every
/// enrichment; the [`Document`] owns the tables themselves.
#[derive(Debug)]
pub struct GridSight {
    config: GridSightConfig,
    analyzer: TableAnalyzer,
    heatmaps: HeatmapEngine,
    outliers: OutlierEngine,
    frequencies: FrequencyEngine,
    analyses: HashMap<TableId, TableAnalysis>,
    active: HashSet<TableId>,
}

impl GridSight {
    /// Create a GridSight instance with default configuration.
    pub fn new() -> Self {
        Self {
            config: GridSightConfig::default(),
            analyzer: TableAnalyzer::new(),
            heatmaps: HeatmapEngine::new(),
            outliers: OutlierEngine::new(),
            frequencies: FrequencyEngine::new(),
            analyses: HashMap::new(),
            active: HashSet::new(),
        }
    }

    /// Create a GridSight instance with a validated configuration.
    pub fn with_config(config: GridSightConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            analyzer: TableAnalyzer::with_options(
                config.detection.clone(),
                config.suitability_min_columns,
            )?,
            heatmaps: HeatmapEngine::with_options(config.heatmap.clone())?,
            outliers: OutlierEngine::with_threshold(config.zscore_threshold)?,
            frequencies: FrequencyEngine::with_options(config.detection.clone())?,
            analyses: HashMap::new(),
            active: HashSet::new(),
            config,
        })
    }

    pub fn config(&self) -> &GridSightConfig {
        &self.config
    }

    /// Heatmap state, for inspection.
    pub fn heatmaps(&self) -> &HeatmapEngine {
        &self.heatmaps
    }

    /// Change the heatmap scale or bounds for later applications.
    pub fn set_heatmap_options(&mut self, options: HeatmapOptions) -> Result<()> {
        self.heatmaps.set_options(options.clone())?;
        self.config.heatmap = options;
        Ok(())
    }

    /// A table is valid when it has both a head and a body.
    pub fn is_valid_table(table: &Table) -> bool {
        table.has_section(Section::Head) && table.has_section(Section::Body)
    }

    /// Process every table in the document. Returns the tables processed.
    pub fn initialize(&mut self, document: &mut Document) -> Vec<TableId> {
        info!("Grid-Sight v{} initialized", env!("CARGO_PKG_VERSION"));

        document.take_added_tables();
        document
            .table_ids()
            .into_iter()
            .filter(|&id| self.process_table(document, id))
            .collect()
    }

    /// Process tables added to the document since the last call and drop
    /// state for tables that were removed, processed or not.
    pub fn observe(&mut self, document: &mut Document) -> Vec<TableId> {
        let stale: HashSet<TableId> = self
            .analyses
            .keys()
            .copied()
            .chain(self.active.iter().copied())
            .chain(self.heatmaps.tracked_tables())
            .chain(self.outliers.tracked_tables())
            .chain(self.frequencies.tracked_tables())
            .filter(|&id| !document.contains(id))
            .collect();
        for id in stale {
            self.forget_table(id);
        }

        document
            .take_added_tables()
            .into_iter()
            .filter(|&id| self.process_table(document, id))
            .collect()
    }

    /// Mark, analyze and announce one table.
    ///
    /// Returns false if the table is missing or invalid. Processing an
    /// already processed table refreshes its analysis without announcing it
    /// again.
    pub fn process_table(&mut self, document: &mut Document, id: TableId) -> bool {
        let Some(table) = document.table_mut(id) else {
            return false;
        };
        if !Self::is_valid_table(table) {
            error!(table = %id, "invalid table structure - missing thead or tbody");
            return false;
        }

        let first_time = !table.has_attribute(PROCESSED_ATTRIBUTE);
        table.set_attribute(PROCESSED_ATTRIBUTE, "true");
        table.classes.add(TABLE_CLASS);
        if table.element_id().is_none() {
            table.set_attribute("id", id.to_string());
        }
        for (index, (_, cell)) in table.cells_mut().enumerate() {
            if !cell.has_attribute(CELL_INDEX_ATTRIBUTE) {
                cell.set_attribute(CELL_INDEX_ATTRIBUTE, index.to_string());
            }
        }

        let analysis = self.analyzer.analyze_table(table);
        debug!(
            table = %id,
            columns = analysis.column_types.len(),
            suitable = analysis.is_suitable,
            "table analyzed"
        );
        self.analyses.insert(id, analysis);

        if first_time {
            document.dispatch_event(GridSightEvent::TableDetected { table: id });
        }
        true
    }

    /// Analysis of a processed table.
    pub fn analysis(&self, table: TableId) -> Option<&TableAnalysis> {
        self.analyses.get(&table)
    }

    pub fn is_active(&self, table: TableId) -> bool {
        self.active.contains(&table)
    }

    /// Switch a table's toggle on.
    pub fn activate(&mut self, document: &mut Document, table: TableId) -> Result<()> {
        let grid = document
            .table_mut(table)
            .ok_or(GridSightError::TableNotFound(table))?;
        grid.classes.add(ACTIVE_CLASS);
        if self.active.insert(table) {
            document.dispatch_event(GridSightEvent::ToggleActivated { table });
        }
        Ok(())
    }

    /// Switch a table's toggle off. Active enrichments stay in place.
    pub fn deactivate(&mut self, document: &mut Document, table: TableId) -> Result<()> {
        let grid = document
            .table_mut(table)
            .ok_or(GridSightError::TableNotFound(table))?;
        grid.classes.remove(ACTIVE_CLASS);
        if self.active.remove(&table) {
            document.dispatch_event(GridSightEvent::ToggleDeactivated { table });
        }
        Ok(())
    }

    /// Flip a table's toggle. Returns whether it is on afterwards.
    pub fn toggle_active(&mut self, document: &mut Document, table: TableId) -> Result<bool> {
        if self.is_active(table) {
            self.deactivate(document, table)?;
            Ok(false)
        } else {
            self.activate(document, table)?;
            Ok(true)
        }
    }

    /// Enrichment menus to offer for each column and each data row.
    ///
    /// Rows and columns of unknown type get no menu.
    pub fn affordances(&self, document: &Document, table: TableId) -> Result<Vec<Affordance>> {
        let grid = document
            .table(table)
            .ok_or(GridSightError::TableNotFound(table))?;
        let Some(analysis) = self.analyses.get(&table) else {
            return Ok(Vec::new());
        };

        let columns = analysis
            .column_types
            .iter()
            .enumerate()
            .map(|(col, &data_type)| (Target::Column(col), data_type));
        let rows = grid
            .data_row_indices()
            .into_iter()
            .map(|row| (Target::Row(row), analysis.row_type(row)));

        Ok(columns
            .chain(rows)
            .filter(|(_, data_type)| data_type.is_enrichable())
            .map(|(target, data_type)| Affordance {
                target,
                data_type,
                enrichments: Enrichment::available_for(data_type).to_vec(),
            })
            .collect())
    }

    /// Turn a heatmap on or off. Returns whether it is active afterwards.
    pub fn toggle_heatmap(
        &mut self,
        document: &mut Document,
        table: TableId,
        target: Target,
    ) -> Result<bool> {
        self.heatmaps.toggle_heatmap(document, table, target)
    }

    /// Turn outlier highlighting on or off.
    pub fn toggle_outliers(
        &mut self,
        document: &mut Document,
        table: TableId,
        target: Target,
    ) -> Result<bool> {
        self.outliers.toggle_outliers(document, table, target)
    }

    /// Turn frequency analysis on or off. Returns the entries when turned on.
    pub fn toggle_frequency(
        &mut self,
        document: &mut Document,
        table: TableId,
        target: Target,
    ) -> Result<Option<Vec<FrequencyEntry>>> {
        self.frequencies.toggle_frequency(document, table, target)
    }

    /// Summary statistics over the numeric cells of a target.
    pub fn statistics(
        &self,
        document: &Document,
        table: TableId,
        target: Target,
    ) -> Result<Statistics> {
        let grid = document
            .table(table)
            .ok_or(GridSightError::TableNotFound(table))?;
        let positions = target_cells(grid, target);
        let values: Vec<f64> = cell_texts(grid, &positions)
            .into_iter()
            .filter_map(parse_numeric)
            .collect();
        calculate_statistics(&values)
    }

    /// Remove every enrichment from a table.
    pub fn clear_enrichments(&mut self, document: &mut Document, table: TableId) -> Result<()> {
        self.heatmaps.remove_heatmap(document, table, None)?;
        self.outliers.remove_outliers(document, table, None)?;
        self.frequencies.remove_frequency(document, table, None)?;
        Ok(())
    }

    /// Remove a table from the document along with all of its state.
    pub fn remove_table(&mut self, document: &mut Document, table: TableId) -> Option<Table> {
        self.forget_table(table);
        document.remove_table(table)
    }

    fn forget_table(&mut self, table: TableId) {
        self.analyses.remove(&table);
        self.active.remove(&table);
        self.heatmaps.forget_table(table);
        self.outliers.forget_table(table);
        self.frequencies.forget_table(table);
    }
}

impl Default for GridSight {
    fn default() -> Self {
        Self::new()
    }
}
