//! NaN-skipping reductions over 1-d lanes.

/// Mean of the non-NaN values, NaN when there are none.
pub fn nan_mean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (sum, n) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Maximum of the non-NaN values, NaN when there are none.
pub fn nan_max<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(f64::NAN, |acc, v| if acc.is_nan() || v > acc { v } else { acc })
}

/// Linearly interpolated quantile of the non-NaN values.
///
/// Uses the `(n - 1) * q` position rule. NaN when there are no values.
pub fn nan_quantile<I: IntoIterator<Item = f64>>(values: I, q: f64) -> f64 {
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted.sort_by(f64::total_cmp);
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_mean() {
        assert_eq!(nan_mean([1.0, f64::NAN, 3.0]), 2.0);
        assert!(nan_mean([f64::NAN]).is_nan());
        assert!(nan_mean(std::iter::empty()).is_nan());
    }

    #[test]
    fn test_nan_max() {
        assert_eq!(nan_max([1.0, f64::NAN, 3.0, -2.0]), 3.0);
        assert!(nan_max([f64::NAN, f64::NAN]).is_nan());
    }

    #[test]
    fn test_nan_quantile() {
        let values = [4.0, 1.0, f64::NAN, 3.0, 2.0, 5.0];
        assert_eq!(nan_quantile(values, 0.0), 1.0);
        assert_eq!(nan_quantile(values, 1.0), 5.0);
        assert_eq!(nan_quantile(values, 0.5), 3.0);
        assert!((nan_quantile(values, 0.9) - 4.6).abs() < 1e-12);
        assert!(nan_quantile([f64::NAN], 0.5).is_nan());
    }
}
