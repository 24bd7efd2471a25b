//! Enrichment targets and the cells they cover.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::detection::{ColumnType, is_numeric};
use crate::dom::{Cell, CellKind, CellPos, Table};

/// Kind of region an enrichment applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Row,
    Column,
    Table,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Row => "row",
            TargetKind::Column => "column",
            TargetKind::Table => "table",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row, a column, or the whole table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum Target {
    /// Row at this index into all table rows.
    Row(usize),
    /// Column at this cell position.
    Column(usize),
    /// Every data cell of the table.
    Table,
}

/// Target of a heatmap.
pub type HeatmapTarget = Target;

impl Target {
    /// Build a target from an index and a kind. Table targets ignore the index.
    ///
    /// Returns `None` for a negative row or column index.
    pub fn from_parts(index: i64, kind: TargetKind) -> Option<Self> {
        match kind {
            TargetKind::Table => Some(Target::Table),
            TargetKind::Row => usize::try_from(index).ok().map(Target::Row),
            TargetKind::Column => usize::try_from(index).ok().map(Target::Column),
        }
    }

    /// Index as reported in events and activation keys; `-1` for the table.
    pub fn index(&self) -> i64 {
        match self {
            Target::Row(i) | Target::Column(i) => *i as i64,
            Target::Table => -1,
        }
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            Target::Row(_) => TargetKind::Row,
            Target::Column(_) => TargetKind::Column,
            Target::Table => TargetKind::Table,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Row(i) => write!(f, "row {}", i),
            Target::Column(i) => write!(f, "column {}", i),
            Target::Table => f.write_str("table"),
        }
    }
}

/// An enrichment offered from a row or column menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Enrichment {
    Heatmap,
    Statistics,
    Outliers,
    Frequency,
}

impl Enrichment {
    /// Enrichments that make sense for data of the given type.
    pub fn available_for(column_type: ColumnType) -> &'static [Enrichment] {
        match column_type {
            ColumnType::Numeric => &[
                Enrichment::Heatmap,
                Enrichment::Statistics,
                Enrichment::Outliers,
            ],
            ColumnType::Categorical => &[Enrichment::Frequency],
            ColumnType::Unknown => &[],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Enrichment::Heatmap => "heatmap",
            Enrichment::Statistics => "statistics",
            Enrichment::Outliers => "outliers",
            Enrichment::Frequency => "frequency",
        }
    }
}

impl fmt::Display for Enrichment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A leading row cell is a row header if it is a `<th>` or not a number.
fn is_header_like(cell: &Cell) -> bool {
    cell.kind() == CellKind::Header || !is_numeric(cell.text())
}

/// Positions of the cells a target covers, in document order.
///
/// Columns cover data rows only. Rows skip a leading header-like cell. The
/// table target covers every `<td>` of every data row.
pub(crate) fn target_cells(table: &Table, target: Target) -> Vec<CellPos> {
    match target {
        Target::Column(col) => table
            .data_row_indices()
            .into_iter()
            .filter(|&row| table.cell(CellPos::new(row, col)).is_some())
            .map(|row| CellPos::new(row, col))
            .collect(),
        Target::Row(row) => {
            let Some(cells) = table.row(row).map(|r| r.cells()) else {
                return Vec::new();
            };
            let skip = usize::from(cells.first().is_some_and(is_header_like));
            (skip..cells.len()).map(|col| CellPos::new(row, col)).collect()
        }
        Target::Table => table
            .data_row_indices()
            .into_iter()
            .flat_map(|row| {
                table.rows()[row]
                    .cells()
                    .iter()
                    .enumerate()
                    .filter(|(_, cell)| cell.kind() == CellKind::Data)
                    .map(move |(col, _)| CellPos::new(row, col))
            })
            .collect(),
    }
}

/// Position of the header cell that labels a row or column target.
///
/// For a column this is the cell in the first header row (falling back to
/// the first row); for a row it is the row's first cell, but only when
/// [`target_cells`] skips it as header-like.
pub(crate) fn header_cell(table: &Table, target: Target) -> Option<CellPos> {
    match target {
        Target::Column(col) => {
            let row = table
                .rows()
                .iter()
                .position(|r| r.is_header_row())
                .unwrap_or(0);
            let pos = CellPos::new(row, col);
            table.cell(pos).map(|_| pos)
        }
        Target::Row(row) => {
            let pos = CellPos::new(row, 0);
            table.cell(pos).filter(|cell| is_header_like(cell)).map(|_| pos)
        }
        Target::Table => None,
    }
}

/// Trimmed text of the cells at `positions`.
pub(crate) fn cell_texts<'a>(table: &'a Table, positions: &[CellPos]) -> Vec<&'a str> {
    positions
        .iter()
        .filter_map(|&pos| table.cell(pos))
        .map(Cell::trimmed_text)
        .collect()
}
