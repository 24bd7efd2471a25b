//! Table, row and cell model.
//!
//! Cells are owned by their table and addressed by [`CellPos`], so every
//! enrichment records positions rather than references into the tree.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Table section a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// `<thead>`
    Head,
    /// `<tbody>` (also rows placed directly under `<table>`).
    Body,
    /// `<tfoot>`
    Foot,
}

/// Cell element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// `<th>`
    Header,
    /// `<td>`
    Data,
}

/// Position of a cell: index into all table rows, then into that row's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Inline style declarations, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    properties: IndexMap<String, String>,
}

impl Style {
    /// Parse a `style` attribute value such as `"color: red; width: 2px"`.
    pub fn parse(value: &str) -> Self {
        let mut style = Self::default();
        for declaration in value.split(';') {
            if let Some((name, val)) = declaration.split_once(':') {
                let name = name.trim();
                if !name.is_empty() {
                    style.set(name, val.trim());
                }
            }
        }
        style
    }

    /// Get a property value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(|s| s.as_str())
    }

    /// Set a property, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Remove a property, returning its old value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.properties.shift_remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterate over `(property, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as a `style` attribute value.
    pub fn css_text(&self) -> String {
        self.properties
            .iter()
            .map(|(k, v)| format!("{}: {};", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Ordered set of class names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassList {
    names: IndexSet<String>,
}

impl ClassList {
    /// Parse a `class` attribute value.
    pub fn parse(value: &str) -> Self {
        Self {
            names: value.split_whitespace().map(String::from).collect(),
        }
    }

    /// Add a class. Returns false if it was already present.
    pub fn add(&mut self, name: &str) -> bool {
        self.names.insert(name.to_string())
    }

    /// Remove a class. Returns false if it was not present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.names.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A `<th>` or `<td>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    kind: CellKind,
    text: String,
    /// Inline style.
    pub style: Style,
    /// Class list.
    pub classes: ClassList,
    attributes: IndexMap<String, String>,
}

impl Cell {
    /// Create a cell with the given text content.
    pub fn new(kind: CellKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            style: Style::default(),
            classes: ClassList::default(),
            attributes: IndexMap::new(),
        }
    }

    /// Create a `<th>` cell.
    pub fn header(text: impl Into<String>) -> Self {
        Self::new(CellKind::Header, text)
    }

    /// Create a `<td>` cell.
    pub fn data(text: impl Into<String>) -> Self {
        Self::new(CellKind::Data, text)
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    /// Raw text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text content with surrounding whitespace removed.
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }
}

/// A `<tr>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    section: Section,
    cells: Vec<Cell>,
}

impl Row {
    pub fn new(section: Section) -> Self {
        Self {
            section,
            cells: Vec::new(),
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn cell_mut(&mut self, index: usize) -> Option<&mut Cell> {
        self.cells.get_mut(index)
    }

    /// Append a new cell and return it for further editing.
    pub fn insert_cell(&mut self, kind: CellKind, text: impl Into<String>) -> &mut Cell {
        self.cells.push(Cell::new(kind, text));
        let last = self.cells.len() - 1;
        &mut self.cells[last]
    }

    pub fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True for rows in `<thead>` and rows made entirely of `<th>` cells.
    pub fn is_header_row(&self) -> bool {
        self.section == Section::Head
            || (!self.cells.is_empty() && self.cells.iter().all(|c| c.kind == CellKind::Header))
    }
}

/// A `<table>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Row>,
    /// Table class list.
    pub classes: ClassList,
    attributes: IndexMap<String, String>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: append a `<thead>` row of `<th>` cells.
    pub fn with_head<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row = self.insert_row(Section::Head);
        for text in cells {
            row.insert_cell(CellKind::Header, text);
        }
        self
    }

    /// Builder: append a `<tbody>` row of `<td>` cells.
    pub fn with_body_row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row = self.insert_row(Section::Body);
        for text in cells {
            row.insert_cell(CellKind::Data, text);
        }
        self
    }

    /// Append a new row and return it for further editing.
    pub fn insert_row(&mut self, section: Section) -> &mut Row {
        self.rows.push(Row::new(section));
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Row::len).max().unwrap_or(0)
    }

    pub fn cell(&self, pos: CellPos) -> Option<&Cell> {
        self.rows.get(pos.row).and_then(|r| r.cell(pos.col))
    }

    pub fn cell_mut(&mut self, pos: CellPos) -> Option<&mut Cell> {
        self.rows.get_mut(pos.row).and_then(|r| r.cell_mut(pos.col))
    }

    /// Iterate over every cell in document order.
    pub fn cells(&self) -> impl Iterator<Item = (CellPos, &Cell)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.cells
                .iter()
                .enumerate()
                .map(move |(c, cell)| (CellPos::new(r, c), cell))
        })
    }

    /// Mutable variant of [`Table::cells`].
    pub fn cells_mut(&mut self) -> impl Iterator<Item = (CellPos, &mut Cell)> {
        self.rows.iter_mut().enumerate().flat_map(|(r, row)| {
            row.cells
                .iter_mut()
                .enumerate()
                .map(move |(c, cell)| (CellPos::new(r, c), cell))
        })
    }

    /// Whether any row belongs to the given section.
    pub fn has_section(&self, section: Section) -> bool {
        self.rows.iter().any(|r| r.section == section)
    }

    /// Indices of rows that carry data rather than headings.
    pub fn data_row_indices(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| !row.is_header_row())
            .map(|(i, _)| i)
            .collect()
    }

    /// The `id` attribute, if any.
    pub fn element_id(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }
}
