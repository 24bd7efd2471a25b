//! Document: the arena of tables on one page.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::events::{EventBus, GridSightEvent, ListenerId, ListenerScope};

use super::html::parse_tables;
use super::table::Table;

/// Opaque handle identifying a table within a [`Document`].
///
/// Handles are never reused, so a stale handle cannot alias a newer table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(u32);

impl TableId {
    /// Build a handle from its raw number.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gs-table-{}", self.0)
    }
}

/// All tables of a page plus the event listeners attached to them.
#[derive(Debug, Default)]
pub struct Document {
    tables: IndexMap<TableId, Table>,
    next_id: u32,
    added: Vec<TableId>,
    events: EventBus,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from page markup.
    pub fn parse_html(markup: &str) -> Self {
        let mut document = Self::new();
        document.insert_html(markup);
        document
    }

    /// Add every table found in `markup`, returning their handles.
    pub fn insert_html(&mut self, markup: &str) -> Vec<TableId> {
        parse_tables(markup)
            .into_iter()
            .map(|table| self.append_table(table))
            .collect()
    }

    /// Add a table to the document.
    ///
    /// The addition is recorded and reported by [`Document::take_added_tables`].
    pub fn append_table(&mut self, table: Table) -> TableId {
        let id = TableId(self.next_id);
        self.next_id += 1;
        self.tables.insert(id, table);
        self.added.push(id);
        id
    }

    /// Remove a table from the document.
    pub fn remove_table(&mut self, id: TableId) -> Option<Table> {
        self.added.retain(|added| *added != id);
        self.tables.shift_remove(&id)
    }

    /// Drain the handles of tables added since the last call.
    pub fn take_added_tables(&mut self) -> Vec<TableId> {
        std::mem::take(&mut self.added)
    }

    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(&id)
    }

    pub fn table_mut(&mut self, id: TableId) -> Option<&mut Table> {
        self.tables.get_mut(&id)
    }

    pub fn contains(&self, id: TableId) -> bool {
        self.tables.contains_key(&id)
    }

    /// Iterate over tables in insertion order.
    pub fn tables(&self) -> impl Iterator<Item = (TableId, &Table)> {
        self.tables.iter().map(|(id, table)| (*id, table))
    }

    pub fn table_ids(&self) -> Vec<TableId> {
        self.tables.keys().copied().collect()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Find a table by its `id` attribute.
    pub fn find_by_element_id(&self, element_id: &str) -> Option<TableId> {
        self.tables
            .iter()
            .find(|(_, table)| table.element_id() == Some(element_id))
            .map(|(id, _)| *id)
    }

    /// Register an event listener.
    pub fn add_event_listener(
        &mut self,
        scope: ListenerScope,
        callback: impl FnMut(&GridSightEvent) + 'static,
    ) -> ListenerId {
        self.events.subscribe(scope, callback)
    }

    /// Remove an event listener.
    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Dispatch an event on its table; it bubbles to document listeners.
    pub fn dispatch_event(&mut self, event: GridSightEvent) {
        self.events.dispatch(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <table id="first"><thead><tr><th>A</th></tr></thead><tbody><tr><td>1</td></tr></tbody></table>
        <div><table id="second"><tr><td>x</td></tr></table></div>
    "#;

    #[test]
    fn test_parse_html_assigns_handles() {
        let mut document = Document::parse_html(PAGE);
        assert_eq!(document.table_count(), 2);

        let first = document.find_by_element_id("first").unwrap();
        let second = document.find_by_element_id("second").unwrap();
        assert_ne!(first, second);
        assert_eq!(first.to_string(), "gs-table-0");

        assert_eq!(document.take_added_tables(), vec![first, second]);
        assert!(document.take_added_tables().is_empty());
    }

    #[test]
    fn test_handles_are_not_reused() {
        let mut document = Document::new();
        let a = document.append_table(Table::new());
        document.remove_table(a);
        let b = document.append_table(Table::new());
        assert_ne!(a, b);
        assert!(document.table(a).is_none());
        assert_eq!(document.take_added_tables(), vec![b]);
    }

    #[test]
    fn test_insert_html_records_additions() {
        let mut document = Document::parse_html(PAGE);
        document.take_added_tables();

        let added = document.insert_html("<table><tr><td>new</td></tr></table>");
        assert_eq!(added.len(), 1);
        assert_eq!(document.take_added_tables(), added);
        assert_eq!(document.table_ids().len(), 3);
    }
}
