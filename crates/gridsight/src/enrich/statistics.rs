//! Summary statistics over numeric cells.

use serde::Serialize;

use crate::error::{GridSightError, Result};

/// Descriptive statistics of a set of numbers.
///
/// Standard deviation and variance are population measures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub count: usize,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub variance: f64,
}

/// Compute statistics over the finite values.
pub fn calculate_statistics(values: &[f64]) -> Result<Statistics> {
    if values.is_empty() {
        return Err(GridSightError::EmptyData(
            "cannot calculate statistics for an empty list".to_string(),
        ));
    }

    let mut valid: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if valid.is_empty() {
        return Err(GridSightError::EmptyData(
            "no valid numeric values provided".to_string(),
        ));
    }
    valid.sort_by(f64::total_cmp);

    let count = valid.len();
    let n = count as f64;
    let sum: f64 = valid.iter().sum();
    let mean = sum / n;
    let variance = valid.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let median = if count % 2 == 0 {
        (valid[count / 2 - 1] + valid[count / 2]) / 2.0
    } else {
        valid[count / 2]
    };

    Ok(Statistics {
        count,
        sum,
        min: valid[0],
        max: valid[count - 1],
        mean,
        median,
        std_dev: variance.sqrt(),
        variance,
    })
}

/// Format with at most two decimals and thousands grouping.
///
/// Non-finite values render as `N/A`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }

    let negative = value < 0.0 && (grouped != "0" || !frac_part.is_empty());
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Render statistics as `Label: value` lines.
pub fn format_statistics(stats: &Statistics) -> String {
    [
        format!("Count: {}", stats.count),
        format!("Sum: {}", format_number(stats.sum)),
        format!("Min: {}", format_number(stats.min)),
        format!("Max: {}", format_number(stats.max)),
        format!("Mean: {}", format_number(stats.mean)),
        format!("Median: {}", format_number(stats.median)),
        format!("Std Dev: {}", format_number(stats.std_dev)),
        format!("Variance: {}", format_number(stats.variance)),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_statistics() {
        let stats = calculate_statistics(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.count, 8);
        assert_eq!(stats.sum, 40.0);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.median, 4.5);
        assert_eq!(stats.std_dev, 2.0);
        assert_eq!(stats.variance, 4.0);
    }

    #[test]
    fn test_ignores_non_finite() {
        let stats = calculate_statistics(&[1.0, f64::NAN, 3.0, f64::INFINITY, 2.0]).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.median, 2.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            calculate_statistics(&[]),
            Err(GridSightError::EmptyData(_))
        ));
        assert!(calculate_statistics(&[f64::NAN]).is_err());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567.891), "1,234,567.89");
        assert_eq!(format_number(1000.0), "1,000");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-1234.5), "-1,234.5");
        assert_eq!(format_number(-0.001), "0");
        assert_eq!(format_number(999.999), "1,000");
        assert_eq!(format_number(f64::NAN), "N/A");
    }

    #[test]
    fn test_format_statistics() {
        let stats = calculate_statistics(&[1000.0, 2000.0]).unwrap();
        let text = format_statistics(&stats);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "Count: 2");
        assert_eq!(lines[1], "Sum: 3,000");
        assert_eq!(lines[4], "Mean: 1,500");
        assert_eq!(lines[7], "Variance: 250,000");
    }
}
