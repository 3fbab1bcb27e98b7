//! Regression accuracy metrics
//!
//! All functions return `NaN` when the inputs are empty or have different
//! lengths.

/// Mean Absolute Error (MAE)
///
/// # Example
///
/// ```rust
/// use pipeline_core::metrics::mean_absolute_error;
///
/// let actual = vec![1.0, 2.0, 3.0];
/// let predicted = vec![1.5, 2.0, 2.5];
/// assert!((mean_absolute_error(&actual, &predicted) - 1.0 / 3.0).abs() < 1e-10);
/// ```
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum();

    sum / actual.len() as f64
}

/// Mean Squared Error (MSE)
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    sum / actual.len() as f64
}

/// R-squared (Coefficient of Determination)
///
/// 1.0 = perfect, 0.0 = same as predicting the mean, negative = worse than
/// the mean. A constant `actual` scores 1.0 for a perfect fit and 0.0
/// otherwise.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }

    let mean = actual.iter().sum::<f64>() / actual.len() as f64;

    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    if ss_tot < 1e-10 {
        return if ss_res < 1e-10 { 1.0 } else { 0.0 };
    }

    1.0 - ss_res / ss_tot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mse() {
        let actual = vec![1.0, 2.0, 3.0];
        let predicted = vec![2.0, 2.0, 5.0];
        assert!((mean_squared_error(&actual, &predicted) - 5.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_r2_perfect_and_mean() {
        let actual = vec![1.0, 2.0, 3.0, 4.0];
        assert!((r2_score(&actual, &actual) - 1.0).abs() < 1e-10);

        let mean = vec![2.5; 4];
        assert!(r2_score(&actual, &mean).abs() < 1e-10);
    }

    #[test]
    fn test_r2_constant_actual() {
        let actual = vec![3.0, 3.0];
        assert_eq!(r2_score(&actual, &[3.0, 3.0]), 1.0);
        assert_eq!(r2_score(&actual, &[2.0, 4.0]), 0.0);
    }

    #[test]
    fn test_mismatched_lengths_are_nan() {
        assert!(mean_absolute_error(&[1.0], &[]).is_nan());
        assert!(mean_squared_error(&[], &[]).is_nan());
        assert!(r2_score(&[1.0, 2.0], &[1.0]).is_nan());
    }
}
