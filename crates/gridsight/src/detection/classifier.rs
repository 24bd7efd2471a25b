//! Column classification: numeric, categorical or unknown.

use std::collections::HashSet;

use crate::error::Result;

use super::numeric::is_numeric;
use super::types::{ColumnType, TypeDetectionOptions};

/// Classifies one column (or row) of cell strings at a time.
#[derive(Debug, Clone)]
pub struct ColumnClassifier {
    options: TypeDetectionOptions,
}

impl ColumnClassifier {
    /// Create a classifier with default options.
    pub fn new() -> Self {
        Self {
            options: TypeDetectionOptions::default(),
        }
    }

    /// Create a classifier with validated options.
    pub fn with_options(options: TypeDetectionOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &TypeDetectionOptions {
        &self.options
    }

    /// Classify one column. The first value is the header when `has_header`.
    ///
    /// A column is numeric when the share of non-empty values that parse as
    /// numbers reaches the threshold. Otherwise it is categorical when no
    /// value is numeric and there are enough distinct values, compared
    /// case-insensitively. Everything else is unknown.
    pub fn classify<S: AsRef<str>>(&self, values: &[S]) -> ColumnType {
        let data = self.data_values(values);
        if data.is_empty() {
            return ColumnType::Unknown;
        }

        if self.meets_numeric_threshold(&data) {
            ColumnType::Numeric
        } else if self.has_enough_categories(&data) {
            ColumnType::Categorical
        } else {
            ColumnType::Unknown
        }
    }

    /// Returns true if the column would be classified numeric.
    pub fn is_numeric_column<S: AsRef<str>>(&self, values: &[S]) -> bool {
        let data = self.data_values(values);
        !data.is_empty() && self.meets_numeric_threshold(&data)
    }

    /// Returns true if the column passes the categorical test on its own.
    ///
    /// This does not consult the numeric test first; a column with any
    /// numeric value always fails.
    pub fn is_categorical_column<S: AsRef<str>>(&self, values: &[S]) -> bool {
        let data = self.data_values(values);
        !data.is_empty() && self.has_enough_categories(&data)
    }

    /// Classify every column of a grid.
    ///
    /// Rows shorter than the widest row are padded with empty cells.
    pub fn detect_column_types(&self, grid: &[Vec<String>]) -> Vec<ColumnType> {
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);

        (0..width)
            .map(|col| {
                let column: Vec<&str> = grid
                    .iter()
                    .map(|row| row.get(col).map(|s| s.as_str()).unwrap_or(""))
                    .collect();
                self.classify(&column)
            })
            .collect()
    }

    /// Trimmed non-empty values, header excluded.
    fn data_values<'a, S: AsRef<str>>(&self, values: &'a [S]) -> Vec<&'a str> {
        let skip = usize::from(self.options.has_header);
        values
            .iter()
            .skip(skip)
            .map(|v| v.as_ref().trim())
            .filter(|v| !v.is_empty())
            .collect()
    }

    fn meets_numeric_threshold(&self, data: &[&str]) -> bool {
        let numeric_count = data.iter().filter(|v| is_numeric(v)).count();
        numeric_count as f64 / data.len() as f64 >= self.options.numeric_threshold
    }

    fn has_enough_categories(&self, data: &[&str]) -> bool {
        if data.iter().any(|v| is_numeric(v)) {
            return false;
        }

        let unique: HashSet<String> = data.iter().map(|v| v.to_lowercase()).collect();
        unique.len() >= self.options.min_unique_values_for_categorical
    }
}

impl Default for ColumnClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn classifier(options: TypeDetectionOptions) -> ColumnClassifier {
        ColumnClassifier::with_options(options).unwrap()
    }

    #[test]
    fn test_numeric_with_currency() {
        let c = ColumnClassifier::new();
        assert_eq!(c.classify(&["Price", "$100", "€200.50", "£300.75"]), ColumnType::Numeric);
        assert!(c.is_numeric_column(&["Price", "1,000.50", "2,000.75", "3,000.25"]));
    }

    #[test]
    fn test_numeric_ignores_empty_cells() {
        let c = ColumnClassifier::new();
        assert!(c.is_numeric_column(&["Value", "", "100", "", "200"]));
    }

    #[test]
    fn test_numeric_threshold() {
        let values = ["Value", "1", "2", "3", "4", "n/a"];
        // 4 of 5 parse: exactly at the default threshold
        assert_eq!(ColumnClassifier::new().classify(&values), ColumnType::Numeric);

        let strict = classifier(TypeDetectionOptions {
            numeric_threshold: 1.0,
            ..Default::default()
        });
        assert_eq!(strict.classify(&values), ColumnType::Unknown);
    }

    #[test]
    fn test_below_threshold_mixed_is_unknown() {
        let c = ColumnClassifier::new();
        assert!(!c.is_numeric_column(&["Value", "100", "not a number", "200"]));
        assert_eq!(c.classify(&["Value", "100", "not a number", "200"]), ColumnType::Unknown);
    }

    #[test]
    fn test_categorical_case_insensitive() {
        let values = ["Status", "active", "ACTIVE", "inactive", "INACTIVE"];
        let three = ColumnClassifier::new();
        assert!(!three.is_categorical_column(&values));

        let two = classifier(TypeDetectionOptions {
            min_unique_values_for_categorical: 2,
            ..Default::default()
        });
        assert!(two.is_categorical_column(&values));
        assert_eq!(two.classify(&["Status", "active", "ACTIVE", "inactive"]), ColumnType::Categorical);
    }

    #[test]
    fn test_identical_values_are_unknown() {
        let values = ["Flag", "yes", "Yes", "YES"];
        assert_eq!(ColumnClassifier::new().classify(&values), ColumnType::Unknown);

        let one = classifier(TypeDetectionOptions {
            min_unique_values_for_categorical: 1,
            ..Default::default()
        });
        assert_eq!(one.classify(&values), ColumnType::Categorical);
    }

    #[test]
    fn test_header_only_or_empty_is_unknown() {
        let c = ColumnClassifier::new();
        assert_eq!(c.classify(&["Header"]), ColumnType::Unknown);
        assert_eq!(c.classify(&["Header", "", "  "]), ColumnType::Unknown);
        assert_eq!(c.classify::<&str>(&[]), ColumnType::Unknown);
    }

    #[test]
    fn test_without_header() {
        let c = classifier(TypeDetectionOptions {
            has_header: false,
            min_unique_values_for_categorical: 2,
            ..Default::default()
        });
        assert!(c.is_numeric_column(&["100", "200", "300"]));
        assert!(c.is_categorical_column(&["A", "B", "C", "A"]));
    }

    #[test]
    fn test_detect_column_types() {
        let rows = grid(&[
            &["Name", "Age", "Score", "Active"],
            &["Alice", "30", "95.5", "Yes"],
            &["Bob", "25", "88.0", "No"],
            &["Charlie", "35", "92.3", "Yes"],
        ]);
        assert_eq!(
            ColumnClassifier::new().detect_column_types(&rows),
            vec![
                ColumnType::Categorical,
                ColumnType::Numeric,
                ColumnType::Numeric,
                ColumnType::Unknown
            ]
        );
    }

    #[test]
    fn test_detect_pads_jagged_rows() {
        let rows = grid(&[&["ID", "Value"], &["1"], &["2", "x"], &["3", "y"]]);
        let types = ColumnClassifier::new().detect_column_types(&rows);
        assert_eq!(types, vec![ColumnType::Numeric, ColumnType::Unknown]);
        assert!(ColumnClassifier::new().detect_column_types(&[]).is_empty());
    }
}
