//! Frequency analysis for categorical rows and columns.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::detection::{ColumnClassifier, TypeDetectionOptions};
use crate::dom::{CellPos, Document, TableId};
use crate::error::{GridSightError, Result};
use crate::events::GridSightEvent;

use super::target::{Enrichment, Target, cell_texts, header_cell, target_cells};

/// Label used for empty cells.
pub const EMPTY_LABEL: &str = "[Empty]";
/// Class added to the header cell of an analyzed row or column.
pub const FREQUENCY_HEADER_CLASS: &str = "gs-frequency-header";

/// One distinct value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyEntry {
    /// Trimmed, lower-cased value, or [`EMPTY_LABEL`].
    pub value: String,
    pub count: usize,
    /// Share of all values, rounded to one decimal.
    pub percent: f64,
}

fn normalize(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        EMPTY_LABEL.to_string()
    } else {
        trimmed.to_lowercase()
    }
}

/// Count values case-insensitively, sorted by value.
pub fn analyze_frequencies<S: AsRef<str>>(values: &[S]) -> Vec<FrequencyEntry> {
    if values.is_empty() {
        return Vec::new();
    }

    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for value in values {
        *counts.entry(normalize(value.as_ref())).or_insert(0) += 1;
    }
    counts.sort_keys();

    let total = values.len() as f64;
    counts
        .into_iter()
        .map(|(value, count)| FrequencyEntry {
            value,
            count,
            percent: (count as f64 / total * 1000.0).round() / 10.0,
        })
        .collect()
}

/// Runs frequency analysis and tracks which header cells it marked.
#[derive(Debug)]
pub struct FrequencyEngine {
    classifier: ColumnClassifier,
    active: HashMap<(TableId, Target), Option<CellPos>>,
}

impl FrequencyEngine {
    /// Create an engine using the default categorical test.
    pub fn new() -> Self {
        Self {
            classifier: Self::target_classifier(TypeDetectionOptions::default()),
            active: HashMap::new(),
        }
    }

    /// Create an engine whose categorical test uses these options.
    ///
    /// `has_header` is ignored: row and column targets already exclude
    /// their header cell.
    pub fn with_options(options: TypeDetectionOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            classifier: Self::target_classifier(options),
            active: HashMap::new(),
        })
    }

    fn target_classifier(options: TypeDetectionOptions) -> ColumnClassifier {
        ColumnClassifier::with_options(TypeDetectionOptions {
            has_header: false,
            ..options
        })
        .unwrap_or_default()
    }

    pub fn is_active(&self, table: TableId, target: Target) -> bool {
        self.active.contains_key(&(table, target))
    }

    /// Tables with at least one active target.
    pub fn tracked_tables(&self) -> impl Iterator<Item = TableId> {
        self.active.keys().map(|(table, _)| *table)
    }

    /// Analyze a row or column and mark its header cell.
    ///
    /// Fails with [`GridSightError::NotCategorical`] when the values do not
    /// pass the categorical test.
    pub fn apply_frequency(
        &mut self,
        document: &mut Document,
        table: TableId,
        target: Target,
    ) -> Result<Vec<FrequencyEntry>> {
        if target == Target::Table {
            return Err(GridSightError::UnsupportedTarget {
                enrichment: Enrichment::Frequency,
                kind: target.kind(),
            });
        }

        let grid = document
            .table_mut(table)
            .ok_or(GridSightError::TableNotFound(table))?;

        let positions = target_cells(grid, target);
        let values = cell_texts(grid, &positions);
        if !self.classifier.is_categorical_column(&values) {
            return Err(GridSightError::NotCategorical { table, target });
        }
        let entries = analyze_frequencies(&values);

        let header = header_cell(grid, target);
        if let Some(cell) = header.and_then(|pos| grid.cell_mut(pos)) {
            cell.classes.add(FREQUENCY_HEADER_CLASS);
        }

        if self.active.insert((table, target), header).is_none() {
            debug!(%table, %target, distinct = entries.len(), "frequency analysis applied");
            document.dispatch_event(GridSightEvent::EnrichmentApplied {
                table,
                enrichment: Enrichment::Frequency,
                index: target.index(),
                kind: target.kind(),
            });
        }

        Ok(entries)
    }

    /// Remove one analysis, or every analysis of the table when `target` is
    /// `None`. Returns how many were removed.
    pub fn remove_frequency(
        &mut self,
        document: &mut Document,
        table: TableId,
        target: Option<Target>,
    ) -> Result<usize> {
        let grid = document
            .table_mut(table)
            .ok_or(GridSightError::TableNotFound(table))?;

        let removed: Vec<(Target, Option<CellPos>)> = self
            .active
            .iter()
            .filter(|((t, tgt), _)| *t == table && target.is_none_or(|wanted| wanted == *tgt))
            .map(|((_, tgt), header)| (*tgt, *header))
            .collect();

        for (tgt, header) in &removed {
            self.active.remove(&(table, *tgt));
            let still_marked = self.active.iter().any(|((t, _), h)| *t == table && h == header);
            if still_marked {
                continue;
            }
            if let Some(cell) = header.and_then(|pos| grid.cell_mut(pos)) {
                cell.classes.remove(FREQUENCY_HEADER_CLASS);
            }
        }

        for (tgt, _) in &removed {
            debug!(%table, target = %tgt, "frequency analysis removed");
            document.dispatch_event(GridSightEvent::EnrichmentRemoved {
                table,
                enrichment: Enrichment::Frequency,
                index: tgt.index(),
                kind: tgt.kind(),
            });
        }

        Ok(removed.len())
    }

    /// Turn analysis on or off. Returns the entries when it was turned on.
    pub fn toggle_frequency(
        &mut self,
        document: &mut Document,
        table: TableId,
        target: Target,
    ) -> Result<Option<Vec<FrequencyEntry>>> {
        if self.is_active(table, target) {
            self.remove_frequency(document, table, Some(target))?;
            Ok(None)
        } else {
            self.apply_frequency(document, table, target).map(Some)
        }
    }

    /// Drop all state for a table without touching the document.
    pub fn forget_table(&mut self, table: TableId) {
        self.active.retain(|(t, _), _| *t != table);
    }
}

impl Default for FrequencyEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Table;

    fn orders() -> (Document, TableId) {
        let mut document = Document::new();
        let table = document.append_table(
            Table::new()
                .with_head(["Status", "Amount"])
                .with_body_row(["Shipped", "10"])
                .with_body_row(["pending", "20"])
                .with_body_row(["shipped", "30"])
                .with_body_row(["Cancelled", "40"])
                .with_body_row(["", "50"]),
        );
        (document, table)
    }

    #[test]
    fn test_analyze_frequencies() {
        let entries = analyze_frequencies(&["Apple", "banana", "apple ", "", "Cherry"]);
        let values: Vec<&str> = entries.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["[Empty]", "apple", "banana", "cherry"]);
        assert_eq!(entries[1].count, 2);
        assert_eq!(entries[1].percent, 40.0);

        let thirds = analyze_frequencies(&["a", "b", "c"]);
        assert_eq!(thirds[0].percent, 33.3);
        assert!(analyze_frequencies::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_apply_marks_header() {
        let (mut document, table) = orders();
        let mut engine = FrequencyEngine::new();

        let entries = engine
            .apply_frequency(&mut document, table, Target::Column(0))
            .unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[3].value, "shipped");
        assert_eq!(entries[3].count, 2);
        assert!(engine.is_active(table, Target::Column(0)));

        let header = document.table(table).unwrap().cell(CellPos::new(0, 0)).unwrap();
        assert!(header.classes.contains(FREQUENCY_HEADER_CLASS));
    }

    #[test]
    fn test_numeric_column_is_rejected() {
        let (mut document, table) = orders();
        let mut engine = FrequencyEngine::new();
        let err = engine
            .apply_frequency(&mut document, table, Target::Column(1))
            .unwrap_err();
        assert!(matches!(err, GridSightError::NotCategorical { .. }));
        assert!(err.to_string().starts_with("Frequency analysis can only be applied to categorical data"));

        assert!(matches!(
            engine.apply_frequency(&mut document, table, Target::Table),
            Err(GridSightError::UnsupportedTarget { .. })
        ));
    }

    #[test]
    fn test_toggle_restores_header() {
        let (mut document, table) = orders();
        let before = document.table(table).cloned();
        let mut engine = FrequencyEngine::new();

        assert!(engine.toggle_frequency(&mut document, table, Target::Column(0)).unwrap().is_some());
        assert!(engine.toggle_frequency(&mut document, table, Target::Column(0)).unwrap().is_none());
        assert_eq!(document.table(table).cloned(), before);
        assert_eq!(engine.remove_frequency(&mut document, table, None).unwrap(), 0);
    }
}
