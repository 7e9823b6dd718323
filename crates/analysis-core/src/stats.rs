/// Numeric helpers shared by the lenses and the valuation builder.
///
/// Every helper is total: degenerate inputs (empty series, zero denominators)
/// produce a neutral value or `None` instead of NaN.
use statrs::statistics::Statistics;

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    Statistics::mean(data.iter())
}

/// Compute sample standard deviation.
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    Statistics::std_dev(data.iter())
}

/// Compute population standard deviation.
pub fn population_std_dev(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    Statistics::population_std_dev(data.iter())
}

/// Coefficient of variation (population std / |mean|).
/// Returns `None` when the mean is zero.
pub fn coefficient_of_variation(data: &[f64]) -> Option<f64> {
    let m = mean(data);
    if data.is_empty() || m.abs() < f64::EPSILON {
        return None;
    }
    Some(population_std_dev(data) / m.abs())
}

/// Least-squares slope of `data` against its index (0, 1, 2, ...).
pub fn linear_slope(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let n = data.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = mean(data);

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, y) in data.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }

    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Compound annual growth rate between two values.
/// Zero when either endpoint or the period is non-positive.
pub fn cagr(start: f64, end: f64, years: f64) -> f64 {
    if start <= 0.0 || end <= 0.0 || years <= 0.0 {
        return 0.0;
    }
    (end / start).powf(1.0 / years) - 1.0
}

/// Year-over-year growth rates of a series, skipping periods whose prior value is zero.
pub fn year_over_year(series: &[f64]) -> Vec<f64> {
    series
        .windows(2)
        .filter(|w| w[0].abs() > f64::EPSILON)
        .map(|w| (w[1] - w[0]) / w[0].abs())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_std_dev() {
        let data = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&data), 5.0, epsilon = 1e-9);
        assert_relative_eq!(population_std_dev(&data), 2.0, epsilon = 1e-9);
        assert!(std_dev(&data) > population_std_dev(&data));
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[1.0]), 0.0);
    }

    #[test]
    fn test_coefficient_of_variation() {
        assert!(coefficient_of_variation(&[]).is_none());
        assert!(coefficient_of_variation(&[-1.0, 1.0]).is_none());
        assert_relative_eq!(coefficient_of_variation(&[10.0, 10.0]).unwrap(), 0.0);
        assert_relative_eq!(coefficient_of_variation(&[5.0, 15.0]).unwrap(), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_linear_slope() {
        assert_relative_eq!(linear_slope(&[1.0, 2.0, 3.0, 4.0]), 1.0, epsilon = 1e-9);
        assert_relative_eq!(linear_slope(&[0.3, 0.2, 0.1]), -0.1, epsilon = 1e-9);
        assert_eq!(linear_slope(&[5.0]), 0.0);
    }

    #[test]
    fn test_cagr() {
        assert_relative_eq!(cagr(100.0, 121.0, 2.0), 0.10, epsilon = 1e-9);
        assert_eq!(cagr(0.0, 121.0, 2.0), 0.0);
        assert_eq!(cagr(100.0, -5.0, 2.0), 0.0);
    }

    #[test]
    fn test_year_over_year() {
        let growth = year_over_year(&[100.0, 110.0, 0.0, 50.0]);
        assert_eq!(growth.len(), 2);
        assert_relative_eq!(growth[0], 0.10, epsilon = 1e-9);
        assert_relative_eq!(growth[1], -1.0, epsilon = 1e-9);
    }
}
