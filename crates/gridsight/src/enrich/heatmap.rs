//! Heatmap engine.
//!
//! Every active heatmap is kept as a [`HeatmapInfo`] holding the color it
//! gave each cell. A cell's presentation is always recomputed from the
//! heatmaps that still cover it, so removing one heatmap restores the colors
//! of the others exactly:
//!
//! - row and column heatmaps together split the cell into two colors;
//! - a single row or column heatmap gives a solid color;
//! - otherwise a table-wide heatmap shows through, if one is active.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::detection::parse_numeric;
use crate::dom::{Cell, CellPos, Document, Table, TableId};
use crate::error::{GridSightError, Result};
use crate::events::GridSightEvent;

use super::color::{color_for_value, default_color_scale, min_max};
use super::target::{HeatmapTarget, Target, TargetKind, target_cells};

/// Table class marking that at least one heatmap is active.
pub const TABLE_CLASS: &str = "gs-heatmap";
/// Class on every cell colored by a heatmap.
pub const CELL_CLASS: &str = "gs-heatmap-cell";
/// Class on cells showing both a row and a column heatmap.
pub const SPLIT_CLASS: &str = "gs-heatmap-split";
/// Attribute recording which heatmap kind most recently colored the cell.
pub const TYPE_ATTRIBUTE: &str = "data-gs-heatmap-type";
/// Custom property holding the row color of a split cell.
pub const ROW_COLOR_PROPERTY: &str = "--gs-heatmap-row-color";
/// Custom property holding the column color of a split cell.
pub const COLUMN_COLOR_PROPERTY: &str = "--gs-heatmap-column-color";

const SPLIT_BACKGROUND: &str = "linear-gradient(to bottom right, \
    var(--gs-heatmap-row-color) 50%, var(--gs-heatmap-column-color) 50%)";

/// Heatmap rendering options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapOptions {
    /// Lower bound of the scale; the data minimum when absent.
    pub min_value: Option<f64>,
    /// Upper bound of the scale; the data maximum when absent.
    pub max_value: Option<f64>,
    /// Swatches from lowest to highest.
    pub color_scale: Vec<String>,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            min_value: None,
            max_value: None,
            color_scale: default_color_scale(),
        }
    }
}

impl HeatmapOptions {
    /// Check the scale and bounds.
    pub fn validate(&self) -> Result<()> {
        if self.color_scale.is_empty() {
            return Err(GridSightError::Config(
                "color_scale must contain at least one color".to_string(),
            ));
        }
        for bound in [self.min_value, self.max_value].into_iter().flatten() {
            if !bound.is_finite() {
                return Err(GridSightError::Config(format!(
                    "heatmap bounds must be finite, got {}",
                    bound
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.min_value, self.max_value) {
            if min > max {
                return Err(GridSightError::Config(format!(
                    "min_value ({}) is greater than max_value ({})",
                    min, max
                )));
            }
        }
        Ok(())
    }
}

/// Identity of one active heatmap: `"<table>-<index>-<kind>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivationKey {
    pub table: TableId,
    pub target: Target,
}

impl ActivationKey {
    pub fn new(table: TableId, target: Target) -> Self {
        Self { table, target }
    }
}

impl fmt::Display for ActivationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.table,
            self.target.index(),
            self.target.kind()
        )
    }
}

/// A cell colored by one heatmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedCell {
    pub pos: CellPos,
    pub kind: TargetKind,
    pub color: String,
}

/// One active heatmap on a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapInfo {
    pub target: HeatmapTarget,
    pub tracked_cells: Vec<TrackedCell>,
}

impl HeatmapInfo {
    /// Color this heatmap gave the cell, if it covers it.
    pub fn color_at(&self, pos: CellPos) -> Option<&str> {
        self.tracked_cells
            .iter()
            .find(|tracked| tracked.pos == pos)
            .map(|tracked| tracked.color.as_str())
    }
}

// Background a cell had before any heatmap colored it.
#[derive(Debug, Clone, Default, PartialEq)]
struct OriginalBackground {
    color: Option<String>,
    image: Option<String>,
}

impl OriginalBackground {
    fn capture(cell: &Cell) -> Self {
        Self {
            color: cell.style.get("background-color").map(String::from),
            image: cell.style.get("background-image").map(String::from),
        }
    }
}

/// Result of applying a heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The heatmap is now active and colored this many cells.
    Applied { cells: usize },
    /// The same heatmap was already active; nothing changed.
    AlreadyActive,
    /// No targeted cell holds a number; nothing changed.
    NoNumericData,
}

/// Result of removing heatmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// This many heatmaps were removed.
    Removed { heatmaps: usize },
    /// No matching heatmap was active.
    NotActive,
}

/// Applies and removes heatmaps, tracking what each one colored.
#[derive(Debug, Default)]
pub struct HeatmapEngine {
    options: HeatmapOptions,
    heatmaps: HashMap<TableId, Vec<HeatmapInfo>>,
    active: HashSet<ActivationKey>,
    originals: HashMap<TableId, HashMap<CellPos, OriginalBackground>>,
}

impl HeatmapEngine {
    /// Create an engine with the default color scale.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with validated options.
    pub fn with_options(options: HeatmapOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::default()
        })
    }

    pub fn options(&self) -> &HeatmapOptions {
        &self.options
    }

    /// Replace the options used by later applications.
    ///
    /// Heatmaps that are already active keep their colors.
    pub fn set_options(&mut self, options: HeatmapOptions) -> Result<()> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    /// Whether this exact heatmap is on.
    pub fn is_heatmap_active(&self, table: TableId, target: HeatmapTarget) -> bool {
        self.active.contains(&ActivationKey::new(table, target))
    }

    /// Whether the table has any active heatmap.
    pub fn has_heatmaps(&self, table: TableId) -> bool {
        self.heatmaps.get(&table).is_some_and(|list| !list.is_empty())
    }

    /// Active heatmaps of a table, oldest first.
    pub fn heatmaps(&self, table: TableId) -> &[HeatmapInfo] {
        self.heatmaps.get(&table).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Activation keys of every active heatmap.
    pub fn active_keys(&self) -> impl Iterator<Item = &ActivationKey> {
        self.active.iter()
    }

    /// Tables holding at least one heatmap.
    pub fn tracked_tables(&self) -> impl Iterator<Item = TableId> {
        self.heatmaps.keys().copied()
    }

    /// Apply a heatmap to a row, a column, or the whole table.
    pub fn apply_heatmap(
        &mut self,
        document: &mut Document,
        table: TableId,
        target: HeatmapTarget,
    ) -> Result<ApplyOutcome> {
        let key = ActivationKey::new(table, target);
        let grid = document
            .table_mut(table)
            .ok_or(GridSightError::TableNotFound(table))?;

        if self.active.contains(&key) {
            debug!(key = %key, "heatmap already active");
            return Ok(ApplyOutcome::AlreadyActive);
        }

        let values: Vec<(CellPos, f64)> = target_cells(grid, target)
            .into_iter()
            .filter_map(|pos| {
                grid.cell(pos)
                    .and_then(|cell| parse_numeric(cell.text()))
                    .map(|value| (pos, value))
            })
            .collect();

        let numbers: Vec<f64> = values.iter().map(|(_, v)| *v).collect();
        let Some((data_min, data_max)) = min_max(&numbers) else {
            warn!(%table, %target, "no numeric values found for heatmap");
            return Ok(ApplyOutcome::NoNumericData);
        };
        let min = self.options.min_value.unwrap_or(data_min);
        let max = self.options.max_value.unwrap_or(data_max);

        let kind = target.kind();
        let tracked_cells: Vec<TrackedCell> = values
            .iter()
            .filter_map(|&(pos, value)| {
                color_for_value(value, min, max, &self.options.color_scale).map(|color| {
                    TrackedCell {
                        pos,
                        kind,
                        color: color.to_string(),
                    }
                })
            })
            .collect();
        let cells = tracked_cells.len();

        let originals = self.originals.entry(table).or_default();
        for tracked in &tracked_cells {
            if let Some(cell) = grid.cell(tracked.pos) {
                originals
                    .entry(tracked.pos)
                    .or_insert_with(|| OriginalBackground::capture(cell));
            }
        }

        let list = self.heatmaps.entry(table).or_default();
        list.push(HeatmapInfo {
            target,
            tracked_cells,
        });
        self.active.insert(key);

        let list = list.as_slice();
        if let Some(info) = list.last() {
            for tracked in &info.tracked_cells {
                render_cell(grid, list, originals.get(&tracked.pos), tracked.pos);
            }
        }
        grid.classes.add(TABLE_CLASS);

        debug!(key = %key, cells, min, max, "heatmap applied");
        document.dispatch_event(GridSightEvent::HeatmapChanged {
            table,
            index: target.index(),
            kind,
            active: true,
        });

        Ok(ApplyOutcome::Applied { cells })
    }

    /// Apply a heatmap over every data cell of the table.
    pub fn apply_table_heatmap(
        &mut self,
        document: &mut Document,
        table: TableId,
    ) -> Result<ApplyOutcome> {
        self.apply_heatmap(document, table, Target::Table)
    }

    /// Remove one heatmap, or every heatmap of the table when `target` is
    /// `None`. Removing the table-wide heatmap removes all of them.
    pub fn remove_heatmap(
        &mut self,
        document: &mut Document,
        table: TableId,
        target: Option<HeatmapTarget>,
    ) -> Result<RemoveOutcome> {
        let grid = document
            .table_mut(table)
            .ok_or(GridSightError::TableNotFound(table))?;

        let removed: Vec<Target> = match target {
            None | Some(Target::Table) => self.remove_all(grid, table),
            Some(target) => self.remove_one(grid, table, target).into_iter().collect(),
        };

        if removed.is_empty() {
            return Ok(RemoveOutcome::NotActive);
        }

        for target in &removed {
            debug!(%table, %target, "heatmap removed");
            document.dispatch_event(GridSightEvent::HeatmapChanged {
                table,
                index: target.index(),
                kind: target.kind(),
                active: false,
            });
        }

        Ok(RemoveOutcome::Removed {
            heatmaps: removed.len(),
        })
    }

    /// Turn a heatmap on or off. Returns whether it is active afterwards.
    pub fn toggle_heatmap(
        &mut self,
        document: &mut Document,
        table: TableId,
        target: HeatmapTarget,
    ) -> Result<bool> {
        if self.is_heatmap_active(table, target) {
            self.remove_heatmap(document, table, Some(target))?;
            Ok(false)
        } else {
            let outcome = self.apply_heatmap(document, table, target)?;
            Ok(matches!(outcome, ApplyOutcome::Applied { .. }))
        }
    }

    /// Drop all state for a table without touching the document.
    pub fn forget_table(&mut self, table: TableId) {
        self.heatmaps.remove(&table);
        self.originals.remove(&table);
        self.active.retain(|key| key.table != table);
    }

    fn remove_one(&mut self, grid: &mut Table, table: TableId, target: Target) -> Option<Target> {
        self.active.remove(&ActivationKey::new(table, target));

        let list = self.heatmaps.get_mut(&table)?;
        let index = list.iter().position(|info| info.target == target)?;
        let info = list.remove(index);
        let originals = self.originals.entry(table).or_default();

        for tracked in &info.tracked_cells {
            render_cell(grid, list, originals.get(&tracked.pos), tracked.pos);
            if list.iter().all(|other| other.color_at(tracked.pos).is_none()) {
                originals.remove(&tracked.pos);
            }
        }
        if list.is_empty() {
            self.heatmaps.remove(&table);
            self.originals.remove(&table);
            grid.classes.remove(TABLE_CLASS);
        }

        Some(info.target)
    }

    fn remove_all(&mut self, grid: &mut Table, table: TableId) -> Vec<Target> {
        self.active.retain(|key| key.table != table);

        let originals = self.originals.remove(&table).unwrap_or_default();
        let Some(list) = self.heatmaps.remove(&table) else {
            return Vec::new();
        };
        for info in &list {
            for tracked in &info.tracked_cells {
                render_cell(grid, &[], originals.get(&tracked.pos), tracked.pos);
            }
        }
        grid.classes.remove(TABLE_CLASS);

        list.into_iter().map(|info| info.target).collect()
    }
}

/// Project the heatmaps covering `pos` onto the cell, on top of the
/// background it had before any heatmap.
fn render_cell(
    grid: &mut Table,
    heatmaps: &[HeatmapInfo],
    original: Option<&OriginalBackground>,
    pos: CellPos,
) {
    let Some(cell) = grid.cell_mut(pos) else {
        return;
    };

    let mut row = None;
    let mut column = None;
    let mut whole = None;
    let mut latest = None;
    for info in heatmaps {
        if let Some(color) = info.color_at(pos) {
            let kind = info.target.kind();
            match kind {
                TargetKind::Row => row = Some(color),
                TargetKind::Column => column = Some(color),
                TargetKind::Table => whole = Some(color),
            }
            latest = Some(kind);
        }
    }

    clear_split(cell);
    restore_background(cell, original);
    match (row, column) {
        (Some(row), Some(column)) => {
            cell.style.remove("background-color");
            cell.style.set(ROW_COLOR_PROPERTY, row);
            cell.style.set(COLUMN_COLOR_PROPERTY, column);
            cell.style.set("background-image", SPLIT_BACKGROUND);
            cell.classes.add(SPLIT_CLASS);
        }
        (Some(color), None) | (None, Some(color)) => {
            cell.style.set("background-color", color);
        }
        (None, None) => {
            if let Some(color) = whole {
                cell.style.set("background-color", color);
            }
        }
    }

    match latest {
        Some(kind) => {
            cell.classes.add(CELL_CLASS);
            cell.set_attribute(TYPE_ATTRIBUTE, kind.as_str());
        }
        None => {
            cell.classes.remove(CELL_CLASS);
            cell.remove_attribute(TYPE_ATTRIBUTE);
        }
    }
}

fn restore_background(cell: &mut Cell, original: Option<&OriginalBackground>) {
    let color = original.and_then(|o| o.color.as_deref());
    let image = original.and_then(|o| o.image.as_deref());
    for (property, value) in [("background-color", color), ("background-image", image)] {
        match value {
            Some(value) => cell.style.set(property, value),
            None => {
                cell.style.remove(property);
            }
        }
    }
}

fn clear_split(cell: &mut Cell) {
    if cell.classes.remove(SPLIT_CLASS) {
        cell.style.remove(ROW_COLOR_PROPERTY);
        cell.style.remove(COLUMN_COLOR_PROPERTY);
        cell.style.remove("background-image");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarterly() -> (Document, TableId) {
        let mut document = Document::new();
        let table = document.append_table(
            Table::new()
                .with_head(["Product", "Q1", "Q2", "Q3"])
                .with_body_row(["Widget A", "10", "20", "30"])
                .with_body_row(["Widget B", "15", "25", "35"])
                .with_body_row(["Widget C", "5", "40", "10"]),
        );
        (document, table)
    }

    fn cell(document: &Document, table: TableId, row: usize, col: usize) -> &Cell {
        document
            .table(table)
            .and_then(|t| t.cell(CellPos::new(row, col)))
            .unwrap()
    }

    fn background(document: &Document, table: TableId, row: usize, col: usize) -> Option<String> {
        cell(document, table, row, col)
            .style
            .get("background-color")
            .map(String::from)
    }

    #[test]
    fn test_column_heatmap_colors_data_cells() {
        let (mut document, table) = quarterly();
        let mut engine = HeatmapEngine::new();

        let outcome = engine
            .apply_heatmap(&mut document, table, Target::Column(1))
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Applied { cells: 3 });
        assert!(engine.is_heatmap_active(table, Target::Column(1)));

        // 5..15: 10 is the midpoint, 15 the top
        assert_eq!(background(&document, table, 3, 1).as_deref(), Some("rgb(0, 0, 255)"));
        assert_eq!(background(&document, table, 1, 1).as_deref(), Some("rgb(128, 0, 128)"));
        assert_eq!(background(&document, table, 2, 1).as_deref(), Some("rgb(255, 0, 0)"));
        assert!(background(&document, table, 0, 1).is_none());

        let grid = document.table(table).unwrap();
        assert!(grid.classes.contains(TABLE_CLASS));
        assert_eq!(
            cell(&document, table, 1, 1).attribute(TYPE_ATTRIBUTE),
            Some("column")
        );
    }

    #[test]
    fn test_apply_is_idempotent() {
        let (mut document, table) = quarterly();
        let mut engine = HeatmapEngine::new();
        engine.apply_heatmap(&mut document, table, Target::Row(1)).unwrap();
        let snapshot = document.table(table).cloned();

        let again = engine.apply_heatmap(&mut document, table, Target::Row(1)).unwrap();
        assert_eq!(again, ApplyOutcome::AlreadyActive);
        assert_eq!(document.table(table).cloned(), snapshot);
        assert_eq!(engine.heatmaps(table).len(), 1);
    }

    #[test]
    fn test_row_heatmap_skips_row_header() {
        let (mut document, table) = quarterly();
        let mut engine = HeatmapEngine::new();
        engine.apply_heatmap(&mut document, table, Target::Row(2)).unwrap();

        assert!(background(&document, table, 2, 0).is_none());
        assert_eq!(background(&document, table, 2, 1).as_deref(), Some("rgb(0, 0, 255)"));
        assert_eq!(background(&document, table, 2, 3).as_deref(), Some("rgb(255, 0, 0)"));
    }

    #[test]
    fn test_split_and_restore() {
        let (mut document, table) = quarterly();
        let mut engine = HeatmapEngine::new();
        engine.apply_heatmap(&mut document, table, Target::Column(2)).unwrap();
        let column_color = background(&document, table, 1, 2).unwrap();

        engine.apply_heatmap(&mut document, table, Target::Row(1)).unwrap();
        let split = cell(&document, table, 1, 2);
        assert!(split.classes.contains(SPLIT_CLASS));
        assert!(split.style.get("background-color").is_none());
        assert_eq!(split.style.get(COLUMN_COLOR_PROPERTY), Some(column_color.as_str()));
        assert!(split.style.get(ROW_COLOR_PROPERTY).is_some());
        assert_eq!(split.attribute(TYPE_ATTRIBUTE), Some("row"));

        // Cells outside the intersection stay solid
        assert!(!cell(&document, table, 1, 1).classes.contains(SPLIT_CLASS));
        assert!(!cell(&document, table, 2, 2).classes.contains(SPLIT_CLASS));

        engine
            .remove_heatmap(&mut document, table, Some(Target::Row(1)))
            .unwrap();
        let restored = cell(&document, table, 1, 2);
        assert!(!restored.classes.contains(SPLIT_CLASS));
        assert_eq!(restored.style.get("background-color"), Some(column_color.as_str()));
        assert!(restored.style.get(ROW_COLOR_PROPERTY).is_none());
        assert!(restored.style.get("background-image").is_none());
        assert_eq!(restored.attribute(TYPE_ATTRIBUTE), Some("column"));
        assert!(background(&document, table, 1, 1).is_none());
    }

    #[test]
    fn test_toggle_twice_restores_table() {
        let (mut document, table) = quarterly();
        let before = document.table(table).cloned();
        let mut engine = HeatmapEngine::new();

        assert!(engine.toggle_heatmap(&mut document, table, Target::Column(3)).unwrap());
        assert!(!engine.toggle_heatmap(&mut document, table, Target::Column(3)).unwrap());

        assert_eq!(document.table(table).cloned(), before);
        assert!(!engine.is_heatmap_active(table, Target::Column(3)));
        assert!(!engine.has_heatmaps(table));
    }

    #[test]
    fn test_remove_all() {
        let (mut document, table) = quarterly();
        let before = document.table(table).cloned();
        let mut engine = HeatmapEngine::new();
        engine.apply_heatmap(&mut document, table, Target::Column(1)).unwrap();
        engine.apply_heatmap(&mut document, table, Target::Row(1)).unwrap();

        let outcome = engine.remove_heatmap(&mut document, table, None).unwrap();
        assert_eq!(outcome, RemoveOutcome::Removed { heatmaps: 2 });
        assert_eq!(document.table(table).cloned(), before);
        assert_eq!(engine.active_keys().count(), 0);

        let again = engine.remove_heatmap(&mut document, table, None).unwrap();
        assert_eq!(again, RemoveOutcome::NotActive);
    }

    #[test]
    fn test_table_heatmap_is_base_layer() {
        let (mut document, table) = quarterly();
        let mut engine = HeatmapEngine::new();
        engine.apply_table_heatmap(&mut document, table).unwrap();
        let base = background(&document, table, 3, 1).unwrap();
        assert_eq!(base, "rgb(0, 0, 255)");

        engine.apply_heatmap(&mut document, table, Target::Column(1)).unwrap();
        let column = background(&document, table, 3, 1).unwrap();
        assert_eq!(column, "rgb(0, 0, 255)");
        assert_eq!(background(&document, table, 2, 1).as_deref(), Some("rgb(255, 0, 0)"));

        engine
            .remove_heatmap(&mut document, table, Some(Target::Column(1)))
            .unwrap();
        assert_eq!(background(&document, table, 2, 1).as_deref(), Some("rgb(64, 0, 191)"));

        engine.apply_heatmap(&mut document, table, Target::Row(1)).unwrap();
        let outcome = engine
            .remove_heatmap(&mut document, table, Some(Target::Table))
            .unwrap();
        assert_eq!(outcome, RemoveOutcome::Removed { heatmaps: 2 });
        assert!(!engine.has_heatmaps(table));
    }

    #[test]
    fn test_three_layers_fall_back_to_column() {
        let (mut document, table) = quarterly();
        let mut engine = HeatmapEngine::new();
        engine.apply_table_heatmap(&mut document, table).unwrap();
        let table_color = background(&document, table, 1, 2).unwrap();
        let table_corner = background(&document, table, 1, 3);
        engine.apply_heatmap(&mut document, table, Target::Column(2)).unwrap();
        let column_color = background(&document, table, 1, 2).unwrap();
        assert_ne!(table_color, column_color);

        engine.apply_heatmap(&mut document, table, Target::Row(1)).unwrap();
        assert!(cell(&document, table, 1, 2).classes.contains(SPLIT_CLASS));

        engine
            .remove_heatmap(&mut document, table, Some(Target::Row(1)))
            .unwrap();
        let restored = cell(&document, table, 1, 2);
        assert!(!restored.classes.contains(SPLIT_CLASS));
        assert_eq!(restored.style.get("background-color"), Some(column_color.as_str()));
        assert!(restored.style.get("background-image").is_none());
        // Outside the column the row gives way to the table layer
        assert_eq!(background(&document, table, 1, 3), table_corner);
        assert!(!cell(&document, table, 1, 3).classes.contains(SPLIT_CLASS));
    }

    #[test]
    fn test_authored_background_is_restored() {
        let mut document = Document::parse_html(
            r#"<table>
                 <thead><tr><th>Item</th><th>A</th><th>B</th></tr></thead>
                 <tbody>
                   <tr><th>x</th><td style="background-color: yellow">1</td><td>2</td></tr>
                   <tr><th>y</th><td>3</td><td style="background-image: url(dots.png)">4</td></tr>
                 </tbody>
               </table>"#,
        );
        let table = document.table_ids()[0];
        let before = document.table(table).cloned();
        let mut engine = HeatmapEngine::new();

        assert!(engine.toggle_heatmap(&mut document, table, Target::Column(1)).unwrap());
        assert_ne!(background(&document, table, 1, 1).as_deref(), Some("yellow"));
        assert!(!engine.toggle_heatmap(&mut document, table, Target::Column(1)).unwrap());
        assert_eq!(background(&document, table, 1, 1).as_deref(), Some("yellow"));
        assert_eq!(document.table(table).cloned(), before);

        engine.apply_heatmap(&mut document, table, Target::Column(2)).unwrap();
        engine.apply_heatmap(&mut document, table, Target::Row(2)).unwrap();
        engine.apply_heatmap(&mut document, table, Target::Row(1)).unwrap();
        engine
            .remove_heatmap(&mut document, table, Some(Target::Row(2)))
            .unwrap();
        assert_eq!(
            cell(&document, table, 2, 2).style.get("background-image"),
            Some("url(dots.png)")
        );
        engine
            .remove_heatmap(&mut document, table, Some(Target::Column(2)))
            .unwrap();
        engine.remove_heatmap(&mut document, table, None).unwrap();
        assert_eq!(document.table(table).cloned(), before);
    }

    #[test]
    fn test_no_numeric_data_is_noop() {
        let (mut document, table) = quarterly();
        let before = document.table(table).cloned();
        let mut engine = HeatmapEngine::new();

        let outcome = engine.apply_heatmap(&mut document, table, Target::Column(0)).unwrap();
        assert_eq!(outcome, ApplyOutcome::NoNumericData);
        assert!(!engine.toggle_heatmap(&mut document, table, Target::Row(9)).unwrap());
        assert_eq!(document.table(table).cloned(), before);
        assert!(!engine.is_heatmap_active(table, Target::Column(0)));

        let empty = document.append_table(Table::new());
        assert_eq!(
            engine.apply_table_heatmap(&mut document, empty).unwrap(),
            ApplyOutcome::NoNumericData
        );
        assert_eq!(
            engine.remove_heatmap(&mut document, empty, None).unwrap(),
            RemoveOutcome::NotActive
        );
    }

    #[test]
    fn test_unknown_table() {
        let mut document = Document::new();
        let mut engine = HeatmapEngine::new();
        let missing = TableId::from_raw(42);
        assert!(matches!(
            engine.apply_heatmap(&mut document, missing, Target::Table),
            Err(GridSightError::TableNotFound(_))
        ));
    }

    #[test]
    fn test_custom_bounds_and_scale() {
        let (mut document, table) = quarterly();
        let options = HeatmapOptions {
            min_value: Some(0.0),
            max_value: Some(100.0),
            color_scale: vec!["low".to_string(), "high".to_string()],
        };
        let mut engine = HeatmapEngine::with_options(options).unwrap();
        engine.apply_heatmap(&mut document, table, Target::Column(2)).unwrap();
        // 20, 25 and 40 are all below the midpoint of 0..100
        for row in 1..=3 {
            assert_eq!(background(&document, table, row, 2).as_deref(), Some("low"));
        }
    }

    #[test]
    fn test_one_sided_bound_beyond_data() {
        let mut document = Document::new();
        let table = document.append_table(
            Table::new()
                .with_head(["Value"])
                .with_body_row(["10"])
                .with_body_row(["20"])
                .with_body_row(["30"]),
        );
        let options = HeatmapOptions {
            min_value: Some(50.0),
            max_value: None,
            color_scale: vec!["c0".to_string(), "c1".to_string(), "c2".to_string()],
        };
        let mut engine = HeatmapEngine::with_options(options).unwrap();
        engine.apply_heatmap(&mut document, table, Target::Column(0)).unwrap();

        for row in 1..=3 {
            assert_eq!(background(&document, table, row, 0).as_deref(), Some("c0"));
        }
    }

    #[test]
    fn test_invalid_options() {
        let empty_scale = HeatmapOptions {
            color_scale: Vec::new(),
            ..Default::default()
        };
        assert!(HeatmapEngine::with_options(empty_scale).is_err());

        let inverted = HeatmapOptions {
            min_value: Some(10.0),
            max_value: Some(1.0),
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let mut engine = HeatmapEngine::new();
        let infinite = HeatmapOptions {
            max_value: Some(f64::INFINITY),
            ..Default::default()
        };
        assert!(engine.set_options(infinite).is_err());
        assert_eq!(engine.options(), &HeatmapOptions::default());
    }

    #[test]
    fn test_activation_key_display() {
        let key = ActivationKey::new(TableId::from_raw(1), Target::Table);
        assert_eq!(key.to_string(), "gs-table-1--1-table");
        let key = ActivationKey::new(TableId::from_raw(1), Target::Column(2));
        assert_eq!(key.to_string(), "gs-table-1-2-column");
    }
}
