//! Numerically guarded normalization for probability vectors.

/// Normalize a vector of non-negative weights into a probability vector.
///
/// Returns `None` for empty input, any NaN/negative entry, or a zero sum.
pub fn normalize(values: &[f64]) -> Option<Vec<f64>> {
    if values.is_empty() {
        return None;
    }
    if values.iter().any(|v| v.is_nan() || *v < 0.0) {
        return None;
    }
    let sum: f64 = values.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return None;
    }
    Some(values.iter().map(|v| v / sum).collect())
}

/// Clamp every entry to at least `floor`, then normalize.
///
/// The floor keeps every component strictly positive so that no entry is
/// ever driven to exactly zero and rendered unreachable by later updates.
/// Returns `None` for empty input, a non-positive floor, or NaN entries.
pub fn floor_and_normalize(values: &[f64], floor: f64) -> Option<Vec<f64>> {
    if values.is_empty() || floor <= 0.0 || !floor.is_finite() {
        return None;
    }
    if values.iter().any(|v| v.is_nan()) {
        return None;
    }
    let floored: Vec<f64> = values.iter().map(|v| v.max(floor)).collect();
    normalize(&floored)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn normalize_basic() {
        let out = normalize(&[1.0, 3.0]).unwrap();
        assert!(approx_eq(out[0], 0.25, 1e-12));
        assert!(approx_eq(out[1], 0.75, 1e-12));
    }

    #[test]
    fn normalize_sums_to_one() {
        let out = normalize(&[0.2, 5.0, 1.7, 0.01]).unwrap();
        let sum: f64 = out.iter().sum();
        assert!(approx_eq(sum, 1.0, 1e-12));
    }

    #[test]
    fn normalize_empty_is_none() {
        assert!(normalize(&[]).is_none());
    }

    #[test]
    fn normalize_zero_sum_is_none() {
        assert!(normalize(&[0.0, 0.0]).is_none());
    }

    #[test]
    fn normalize_nan_is_none() {
        assert!(normalize(&[1.0, f64::NAN]).is_none());
    }

    #[test]
    fn normalize_negative_is_none() {
        assert!(normalize(&[1.0, -0.5]).is_none());
    }

    #[test]
    fn floor_lifts_zero_entries() {
        let out = floor_and_normalize(&[0.0, 1.0], 1e-9).unwrap();
        assert!(out[0] > 0.0);
        assert!(approx_eq(out.iter().sum::<f64>(), 1.0, 1e-12));
    }

    #[test]
    fn floor_preserves_dominance() {
        let out = floor_and_normalize(&[0.0, 2.0, 8.0], 1e-9).unwrap();
        assert!(out[2] > out[1]);
        assert!(out[1] > out[0]);
    }

    #[test]
    fn floor_rejects_bad_floor() {
        assert!(floor_and_normalize(&[1.0], 0.0).is_none());
        assert!(floor_and_normalize(&[1.0], -1.0).is_none());
    }

    #[test]
    fn floor_rejects_nan_entries() {
        assert!(floor_and_normalize(&[f64::NAN], 1e-9).is_none());
    }
}
