//! Table-level analysis: grid extraction, column and row types, suitability.

use crate::dom::Table;
use crate::error::{GridSightError, Result};

use super::classifier::ColumnClassifier;
use super::types::{
    ColumnType, DEFAULT_SUITABILITY_MIN_COLUMNS, TableAnalysis, TypeDetectionOptions,
};

/// Runs column and row classification over whole tables.
#[derive(Debug, Clone)]
pub struct TableAnalyzer {
    classifier: ColumnClassifier,
    suitability_min_columns: usize,
}

impl TableAnalyzer {
    /// Create an analyzer with default settings.
    pub fn new() -> Self {
        Self {
            classifier: ColumnClassifier::new(),
            suitability_min_columns: DEFAULT_SUITABILITY_MIN_COLUMNS,
        }
    }

    /// Create an analyzer with custom detection options and suitability minimum.
    pub fn with_options(
        options: TypeDetectionOptions,
        suitability_min_columns: usize,
    ) -> Result<Self> {
        if suitability_min_columns == 0 {
            return Err(GridSightError::Config(
                "suitability_min_columns must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            classifier: ColumnClassifier::with_options(options)?,
            suitability_min_columns,
        })
    }

    pub fn classifier(&self) -> &ColumnClassifier {
        &self.classifier
    }

    /// Read every row's trimmed cell text into a grid.
    ///
    /// Short rows are padded with empty strings up to the widest row; row
    /// order and cell order are preserved.
    pub fn extract_grid(table: &Table) -> Vec<Vec<String>> {
        let width = table.column_count();

        table
            .rows()
            .iter()
            .map(|row| {
                let mut values: Vec<String> = row
                    .cells()
                    .iter()
                    .map(|cell| cell.trimmed_text().to_string())
                    .collect();
                values.resize(width, String::new());
                values
            })
            .collect()
    }

    /// Analyze a grid of cell strings.
    pub fn analyze_grid(&self, grid: &[Vec<String>]) -> TableAnalysis {
        let column_types = self.classifier.detect_column_types(grid);
        let row_types = self.detect_row_types(grid);

        let suitable = column_types.iter().filter(|t| t.is_enrichable()).count();

        TableAnalysis {
            column_types,
            row_types,
            is_suitable: suitable >= self.suitability_min_columns,
        }
    }

    /// Extract and analyze a table.
    pub fn analyze_table(&self, table: &Table) -> TableAnalysis {
        let grid = Self::extract_grid(table);
        self.analyze_grid(&grid)
    }

    /// Classify each row, treating its first cell as the row header when
    /// `has_header` is set. The header row itself is reported as `Unknown`.
    pub fn detect_row_types(&self, grid: &[Vec<String>]) -> Vec<ColumnType> {
        let has_header = self.classifier.options().has_header;

        grid.iter()
            .enumerate()
            .map(|(i, row)| {
                if has_header && i == 0 {
                    ColumnType::Unknown
                } else {
                    self.classifier.classify(row)
                }
            })
            .collect()
    }
}

impl Default for TableAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
