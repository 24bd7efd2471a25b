//! Color scale helpers for heatmaps.

/// Default five-swatch scale from blue (low) to red (high).
pub const DEFAULT_COLOR_SCALE: [&str; 5] = [
    "rgb(0, 0, 255)",
    "rgb(64, 0, 191)",
    "rgb(128, 0, 128)",
    "rgb(191, 0, 64)",
    "rgb(255, 0, 0)",
];

/// The default scale as owned strings.
pub fn default_color_scale() -> Vec<String> {
    DEFAULT_COLOR_SCALE.iter().map(|c| c.to_string()).collect()
}

/// Position of `value` within `[min, max]`, clamped to `[0, 1]`.
///
/// Returns 0 for an empty range. When the bounds are inverted (`max < min`)
/// nothing lies inside them: values below `min` map to 0 and all others to 1.
pub fn normalize_value(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 0.0;
    }
    if max < min {
        return if value < min { 0.0 } else { 1.0 };
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Pick the swatch for `value`.
///
/// The normalized position selects bucket `floor(norm * N)`, clamped to
/// `N - 1`. An empty range (`max == min`) selects the middle swatch.
pub fn color_for_value(value: f64, min: f64, max: f64, scale: &[String]) -> Option<&str> {
    if scale.is_empty() {
        return None;
    }
    if max == min {
        return Some(&scale[scale.len() / 2]);
    }

    let normalized = normalize_value(value, min, max);
    let bucket = ((normalized * scale.len() as f64).floor() as usize).min(scale.len() - 1);
    Some(&scale[bucket])
}

/// Minimum and maximum of the finite values, or `None` if there are none.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
