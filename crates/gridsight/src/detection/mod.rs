//! Type detection: numeric parsing, column classification, table analysis.

mod analyzer;
mod classifier;
mod numeric;
mod types;

pub use analyzer::TableAnalyzer;
pub use classifier::ColumnClassifier;
pub use numeric::{CURRENCY_SYMBOLS, is_numeric, parse_numeric};
pub use types::{
    ColumnType, DEFAULT_MIN_UNIQUE_VALUES_FOR_CATEGORICAL, DEFAULT_NUMERIC_THRESHOLD,
    DEFAULT_SUITABILITY_MIN_COLUMNS, TableAnalysis, TypeDetectionOptions,
};
