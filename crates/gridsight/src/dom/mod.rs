//! Document model: tables, rows and cells owned in an arena.

mod document;
mod html;
mod table;

pub use document::{Document, TableId};
pub use html::parse_tables;
pub use table::{Cell, CellKind, CellPos, ClassList, Row, Section, Style, Table};
