//! Raised-cosine tapering masks.

use ndarray::Array2;

/// Separable raised-cosine taper over a centered grid.
///
/// Along each axis the mask is 1 inside the inner `fraction_start`
/// fraction of the half-width, falls as a raised cosine to 0 over the
/// next `fraction_slope` fraction, and is 0 beyond. An axis whose start
/// fraction lies outside (0, 1) is left untapered; with both outside the
/// result is an all-ones grid.
pub fn taper_mask(shape: (usize, usize), fraction_start: (f64, f64), fraction_slope: f64) -> Array2<f64> {
    let (rows, cols) = shape;
    let (fy, fx) = fraction_start;
    let y_active = 0.0 < fy && fy < 1.0;
    let x_active = 0.0 < fx && fx < 1.0;
    if !y_active && !x_active {
        return Array2::ones((rows, cols));
    }

    let axis_taper = |i: usize, n: usize, f: f64| -> f64 {
        let half = (n / 2) as f64;
        let t = (i as f64 - half).abs() / half;
        if t < f {
            1.0
        } else if t > f + fraction_slope {
            0.0
        } else {
            (1.0 + ((t - f) / fraction_slope * std::f64::consts::PI).cos()) / 2.0
        }
    };

    Array2::from_shape_fn((rows, cols), |(i, j)| {
        let wy = if y_active { axis_taper(i, rows, fy) } else { 1.0 };
        let wx = if x_active { axis_taper(j, cols, fx) } else { 1.0 };
        wy * wx
    })
}
