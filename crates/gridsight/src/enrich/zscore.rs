//! Z-score outlier highlighting.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::detection::parse_numeric;
use crate::dom::{Cell, CellPos, Document, Table, TableId};
use crate::error::{GridSightError, Result};
use crate::events::GridSightEvent;

use super::target::{Enrichment, Target, target_cells};

/// Default `|z|` above which a value is an outlier.
pub const DEFAULT_ZSCORE_THRESHOLD: f64 = 2.0;

/// Class added to outlier cells.
pub const OUTLIER_CLASS: &str = "grid-sight-outlier";
/// Attribute holding the cell's z-score with two decimals.
pub const ZSCORE_ATTRIBUTE: &str = "data-zscore";

/// Population z-scores of `values`. A zero standard deviation is treated as 1.
pub fn calculate_zscores(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();
    let divisor = if std_dev == 0.0 { 1.0 } else { std_dev };

    values.iter().map(|v| (v - mean) / divisor).collect()
}

/// A cell whose value lies beyond the threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outlier {
    pub pos: CellPos,
    pub value: f64,
    pub z_score: f64,
}

/// Result of highlighting outliers.
#[derive(Debug, Clone, PartialEq)]
pub enum OutlierOutcome {
    /// Highlighting is active; these cells were marked (possibly none).
    Highlighted(Vec<Outlier>),
    /// Highlighting was already active for this target.
    AlreadyActive,
    /// No targeted cell holds a number; nothing changed.
    NoNumericData,
}

// Cells marked by one highlighted target.
#[derive(Debug, Clone)]
struct OutlierLayer {
    target: Target,
    marks: Vec<(CellPos, f64)>,
}

impl OutlierLayer {
    fn z_at(&self, pos: CellPos) -> Option<f64> {
        self.marks
            .iter()
            .find(|(marked, _)| *marked == pos)
            .map(|(_, z)| *z)
    }
}

// Border and title a cell had before any highlighting.
#[derive(Debug, Clone, Default)]
struct OriginalDecoration {
    border: Option<String>,
    title: Option<String>,
}

impl OriginalDecoration {
    fn capture(cell: &Cell) -> Self {
        Self {
            border: cell.style.get("border").map(String::from),
            title: cell.attribute("title").map(String::from),
        }
    }
}

/// Marks cells whose z-score exceeds a threshold.
///
/// Targets may overlap. Each cell shows the most recently applied target
/// that marks it, and returns to its original border and title once no
/// active target marks it.
#[derive(Debug)]
pub struct OutlierEngine {
    threshold: f64,
    layers: HashMap<TableId, Vec<OutlierLayer>>,
    originals: HashMap<TableId, HashMap<CellPos, OriginalDecoration>>,
}

impl OutlierEngine {
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_ZSCORE_THRESHOLD,
            layers: HashMap::new(),
            originals: HashMap::new(),
        }
    }

    /// Create an engine with a custom threshold (finite, non-negative).
    pub fn with_threshold(threshold: f64) -> Result<Self> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(GridSightError::Config(format!(
                "zscore_threshold must be a non-negative number, got {}",
                threshold
            )));
        }
        Ok(Self {
            threshold,
            ..Self::new()
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn is_active(&self, table: TableId, target: Target) -> bool {
        self.layers
            .get(&table)
            .is_some_and(|layers| layers.iter().any(|layer| layer.target == target))
    }

    /// Tables with at least one active target.
    pub fn tracked_tables(&self) -> impl Iterator<Item = TableId> {
        self.layers.keys().copied()
    }

    /// Find the outliers of a target without changing the table.
    pub fn identify_outliers(
        &self,
        document: &Document,
        table: TableId,
        target: Target,
    ) -> Result<Vec<Outlier>> {
        let grid = document
            .table(table)
            .ok_or(GridSightError::TableNotFound(table))?;

        let values: Vec<(CellPos, f64)> = target_cells(grid, target)
            .into_iter()
            .filter_map(|pos| {
                grid.cell(pos)
                    .and_then(|cell| parse_numeric(cell.text()))
                    .map(|value| (pos, value))
            })
            .collect();
        let numbers: Vec<f64> = values.iter().map(|(_, v)| *v).collect();

        Ok(values
            .into_iter()
            .zip(calculate_zscores(&numbers))
            .filter(|(_, z)| z.abs() > self.threshold)
            .map(|((pos, value), z_score)| Outlier {
                pos,
                value,
                z_score,
            })
            .collect())
    }

    /// Highlight the outliers of a target.
    pub fn apply_outliers(
        &mut self,
        document: &mut Document,
        table: TableId,
        target: Target,
    ) -> Result<OutlierOutcome> {
        if self.is_active(table, target) {
            return Ok(OutlierOutcome::AlreadyActive);
        }

        let grid = document
            .table(table)
            .ok_or(GridSightError::TableNotFound(table))?;
        let has_numbers = target_cells(grid, target)
            .into_iter()
            .filter_map(|pos| grid.cell(pos))
            .any(|cell| parse_numeric(cell.text()).is_some());
        if !has_numbers {
            warn!(%table, %target, "no numeric values found for outlier detection");
            return Ok(OutlierOutcome::NoNumericData);
        }

        let outliers = self.identify_outliers(document, table, target)?;
        let grid = document
            .table_mut(table)
            .ok_or(GridSightError::TableNotFound(table))?;

        let originals = self.originals.entry(table).or_default();
        for outlier in &outliers {
            if let Some(cell) = grid.cell(outlier.pos) {
                originals
                    .entry(outlier.pos)
                    .or_insert_with(|| OriginalDecoration::capture(cell));
            }
        }

        let layers = self.layers.entry(table).or_default();
        layers.push(OutlierLayer {
            target,
            marks: outliers.iter().map(|o| (o.pos, o.z_score)).collect(),
        });
        for outlier in &outliers {
            render_cell(grid, layers, originals.get(&outlier.pos), outlier.pos);
        }

        debug!(%table, %target, outliers = outliers.len(), "outliers highlighted");
        document.dispatch_event(GridSightEvent::EnrichmentApplied {
            table,
            enrichment: Enrichment::Outliers,
            index: target.index(),
            kind: target.kind(),
        });

        Ok(OutlierOutcome::Highlighted(outliers))
    }

    /// Remove highlighting from one target, or from every target of the
    /// table when `target` is `None`. Returns how many targets were cleared.
    pub fn remove_outliers(
        &mut self,
        document: &mut Document,
        table: TableId,
        target: Option<Target>,
    ) -> Result<usize> {
        let grid = document
            .table_mut(table)
            .ok_or(GridSightError::TableNotFound(table))?;
        let Some(layers) = self.layers.get_mut(&table) else {
            return Ok(0);
        };

        let removed: Vec<OutlierLayer> = match target {
            None => std::mem::take(layers),
            Some(wanted) => layers
                .iter()
                .position(|layer| layer.target == wanted)
                .map(|index| vec![layers.remove(index)])
                .unwrap_or_default(),
        };

        let originals = self.originals.entry(table).or_default();
        for layer in &removed {
            for &(pos, _) in &layer.marks {
                render_cell(grid, layers, originals.get(&pos), pos);
                if layers.iter().all(|other| other.z_at(pos).is_none()) {
                    originals.remove(&pos);
                }
            }
        }
        if layers.is_empty() {
            self.layers.remove(&table);
            self.originals.remove(&table);
        }

        for layer in &removed {
            debug!(%table, target = %layer.target, "outliers removed");
            document.dispatch_event(GridSightEvent::EnrichmentRemoved {
                table,
                enrichment: Enrichment::Outliers,
                index: layer.target.index(),
                kind: layer.target.kind(),
            });
        }

        Ok(removed.len())
    }

    /// Turn highlighting on or off. Returns whether it is active afterwards.
    pub fn toggle_outliers(
        &mut self,
        document: &mut Document,
        table: TableId,
        target: Target,
    ) -> Result<bool> {
        if self.is_active(table, target) {
            self.remove_outliers(document, table, Some(target))?;
            Ok(false)
        } else {
            let outcome = self.apply_outliers(document, table, target)?;
            Ok(matches!(outcome, OutlierOutcome::Highlighted(_)))
        }
    }

    /// Drop all state for a table without touching the document.
    pub fn forget_table(&mut self, table: TableId) {
        self.layers.remove(&table);
        self.originals.remove(&table);
    }
}

/// Decorate the cell from the latest layer marking it, or restore it.
fn render_cell(
    grid: &mut Table,
    layers: &[OutlierLayer],
    original: Option<&OriginalDecoration>,
    pos: CellPos,
) {
    let Some(cell) = grid.cell_mut(pos) else {
        return;
    };

    match layers.iter().rev().find_map(|layer| layer.z_at(pos)) {
        Some(z_score) => {
            let z = format!("{:.2}", z_score);
            let color = if z_score > 0.0 { "red" } else { "blue" };
            cell.classes.add(OUTLIER_CLASS);
            cell.set_attribute(ZSCORE_ATTRIBUTE, z.as_str());
            cell.style.set("border", format!("2px solid {}", color));
            cell.set_attribute("title", format!("Z-Score: {}", z));
        }
        None => {
            cell.classes.remove(OUTLIER_CLASS);
            cell.remove_attribute(ZSCORE_ATTRIBUTE);
            match original.and_then(|o| o.border.clone()) {
                Some(border) => cell.style.set("border", border),
                None => {
                    cell.style.remove("border");
                }
            }
            match original.and_then(|o| o.title.clone()) {
                Some(title) => cell.set_attribute("title", title),
                None => {
                    cell.remove_attribute("title");
                }
            }
        }
    }
}

impl Default for OutlierEngine {
    fn default() -> Self {
        Self::new()
    }
}
