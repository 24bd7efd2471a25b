//! Core type definitions for column classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GridSightError, Result};

/// Default minimum number of distinct values for a categorical column.
pub const DEFAULT_MIN_UNIQUE_VALUES_FOR_CATEGORICAL: usize = 3;

/// Default fraction of non-empty cells that must parse as numbers.
pub const DEFAULT_NUMERIC_THRESHOLD: f64 = 0.8;

/// Default number of numeric/categorical columns a table needs to be enrichable.
pub const DEFAULT_SUITABILITY_MIN_COLUMNS: usize = 2;

/// Classification of a column (or row).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Enough non-empty cells parse as numbers.
    Numeric,
    /// Text values with enough distinct entries.
    Categorical,
    /// Neither of the above.
    #[default]
    Unknown,
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Numeric)
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, ColumnType::Categorical)
    }

    /// Returns true if enrichments can be offered for this type.
    pub fn is_enrichable(&self) -> bool {
        matches!(self, ColumnType::Numeric | ColumnType::Categorical)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Categorical => "categorical",
            ColumnType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for type detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeDetectionOptions {
    /// Minimum distinct (case-insensitive) values for a categorical column.
    pub min_unique_values_for_categorical: usize,
    /// Fraction of non-empty cells that must be numeric, in `(0, 1]`.
    pub numeric_threshold: f64,
    /// Whether the first row is a header row (and the first cell of each
    /// row a row header).
    pub has_header: bool,
}

impl Default for TypeDetectionOptions {
    fn default() -> Self {
        Self {
            min_unique_values_for_categorical: DEFAULT_MIN_UNIQUE_VALUES_FOR_CATEGORICAL,
            numeric_threshold: DEFAULT_NUMERIC_THRESHOLD,
            has_header: true,
        }
    }
}

impl TypeDetectionOptions {
    /// Check that every field is in range.
    pub fn validate(&self) -> Result<()> {
        if self.min_unique_values_for_categorical == 0 {
            return Err(GridSightError::Config(
                "min_unique_values_for_categorical must be at least 1".to_string(),
            ));
        }
        if !(self.numeric_threshold > 0.0 && self.numeric_threshold <= 1.0) {
            return Err(GridSightError::Config(format!(
                "numeric_threshold must be in (0, 1], got {}",
                self.numeric_threshold
            )));
        }
        Ok(())
    }
}

/// Result of analyzing a table grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableAnalysis {
    /// One entry per column.
    pub column_types: Vec<ColumnType>,
    /// One entry per grid row; the header row (when present) is `Unknown`.
    #[serde(default)]
    pub row_types: Vec<ColumnType>,
    /// Whether enough columns are numeric or categorical.
    pub is_suitable: bool,
}

impl TableAnalysis {
    /// Number of columns classified numeric or categorical.
    pub fn enrichable_column_count(&self) -> usize {
        self.column_types.iter().filter(|t| t.is_enrichable()).count()
    }

    /// Type of a column, `Unknown` when out of range.
    pub fn column_type(&self, index: usize) -> ColumnType {
        self.column_types.get(index).copied().unwrap_or_default()
    }

    /// Type of a row, `Unknown` when out of range.
    pub fn row_type(&self, index: usize) -> ColumnType {
        self.row_types.get(index).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_valid() {
        assert!(TypeDetectionOptions::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_options() {
        let zero_unique = TypeDetectionOptions {
            min_unique_values_for_categorical: 0,
            ..Default::default()
        };
        assert!(zero_unique.validate().is_err());

        for threshold in [0.0, -0.5, 1.5, f64::NAN] {
            let options = TypeDetectionOptions {
                numeric_threshold: threshold,
                ..Default::default()
            };
            assert!(options.validate().is_err(), "threshold {}", threshold);
        }
    }

    #[test]
    fn test_options_from_partial_json() {
        let options: TypeDetectionOptions =
            serde_json::from_str(r#"{"has_header": false}"#).unwrap();
        assert!(!options.has_header);
        assert_eq!(options.numeric_threshold, DEFAULT_NUMERIC_THRESHOLD);
    }

    #[test]
    fn test_column_type_serde() {
        assert_eq!(serde_json::to_string(&ColumnType::Categorical).unwrap(), "\"categorical\"");
        assert_eq!(ColumnType::Numeric.to_string(), "numeric");
        assert!(!ColumnType::Unknown.is_enrichable());
        assert_eq!(ColumnType::default(), ColumnType::Unknown);
    }
}
