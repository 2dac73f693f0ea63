//! Percentile-based normalization of real-valued grids.

use ndarray::Array2;

/// Value at percentile `p` (0..=100) using linear interpolation between
/// order statistics, matching the conventional definition. An empty
/// slice yields 0.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let t = pos - lo as f64;
    sorted[lo] * (1.0 - t) + sorted[hi] * t
}

/// Linearly rescale `data` so the `(p0, p1)` percentile values map to 0
/// and 1.
///
/// The two percentile values are sorted before use, so a reversed pair
/// still yields an increasing mapping. A constant or empty input
/// (degenerate percentile span) returns all zeros rather than dividing
/// by zero.
pub fn normalize_percentile(data: &Array2<f64>, percentiles: (f64, f64)) -> Array2<f64> {
    if data.is_empty() {
        return Array2::zeros(data.dim());
    }
    let mut sorted: Vec<f64> = data.iter().cloned().collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("non-NaN data"));
    let a = percentile(&sorted, percentiles.0);
    let b = percentile(&sorted, percentiles.1);
    let (vmin, vmax) = if a <= b { (a, b) } else { (b, a) };
    let span = vmax - vmin;
    if span == 0.0 {
        return Array2::zeros(data.dim());
    }
    data.mapv(|v| (v - vmin) / span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn full_range_maps_to_unit_interval() {
        let data = array![[2.0, 4.0], [6.0, 10.0]];
        let out = normalize_percentile(&data, (0.0, 100.0));
        assert_relative_eq!(out[[0, 0]], 0.0);
        assert_relative_eq!(out[[1, 1]], 1.0);
        assert_relative_eq!(out[[0, 1]], 0.25);
    }

    #[test]
    fn constant_input_returns_zeros() {
        let data = Array2::from_elem((3, 3), 7.0);
        let out = normalize_percentile(&data, (0.0, 100.0));
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn empty_input_yields_empty_zeros() {
        let data = Array2::<f64>::zeros((0, 5));
        let out = normalize_percentile(&data, (0.0, 100.0));
        assert_eq!(out.dim(), (0, 5));
        assert_relative_eq!(percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn percentile_interpolates() {
        let sorted = [0.0, 1.0, 2.0, 3.0];
        assert_relative_eq!(percentile(&sorted, 50.0), 1.5);
        assert_relative_eq!(percentile(&sorted, 0.0), 0.0);
        assert_relative_eq!(percentile(&sorted, 100.0), 3.0);
    }
}
