//! Bessel-order labeling of a reciprocal-space grid.

use ndarray::Array2;

use crate::params::ParamError;

use super::bessel::BesselOrderTable;

/// Label every pixel of a centered reciprocal-space grid with the Bessel
/// order whose first-peak argument is nearest.
///
/// Each pixel's spatial-frequency magnitude is scaled by `2*pi*radius` to
/// form the Bessel argument. With a tilted helix the meridional component
/// is stretched by `1/cos(tilt)` and folded into the radial component via
/// `hypot(x, y*sin(tilt))`, the geometry of a tilted reciprocal lattice
/// seen in projection. The per-axis frequency steps put the cutoff
/// resolution at the half-width of the grid, so column `cols/2` is the
/// meridian and row `rows/2` the equator.
///
/// The result is symmetric under sign flips of either frequency axis.
///
/// # Errors
/// * `InvalidCutoff` when either cutoff is non-positive or non-finite
/// * `GridTooSmall` when `rows` or `cols` is below 2 (the frequency
///   steps would be degenerate)
pub fn bessel_order_field(
    rows: usize,
    cols: usize,
    cutoff_res_x: f64,
    cutoff_res_y: f64,
    radius: f64,
    tilt: f64,
) -> Result<Array2<i16>, ParamError> {
    for &cutoff in &[cutoff_res_x, cutoff_res_y] {
        if !(cutoff > 0.0) || !cutoff.is_finite() {
            return Err(ParamError::InvalidCutoff(cutoff));
        }
    }
    if rows < 2 || cols < 2 {
        return Err(ParamError::GridTooSmall(rows, cols));
    }
    let two_pi = 2.0 * std::f64::consts::PI;
    let dsx = 1.0 / (cutoff_res_x * (cols / 2) as f64);
    let dsy = 1.0 / (cutoff_res_y * (rows / 2) as f64);
    let yc = (rows / 2) as f64;
    let xc = (cols / 2) as f64;

    let args = if tilt != 0.0 {
        let cos_t = tilt.to_radians().cos();
        let sin_t = tilt.to_radians().sin();
        Array2::from_shape_fn((rows, cols), |(i, j)| {
            let sx = two_pi * (j as f64 - xc).abs() * dsx * radius;
            let sy = two_pi * (i as f64 - yc).abs() * dsy * radius / cos_t;
            sx.hypot(sy * sin_t)
        })
    } else {
        // untilted: the argument depends on the radial coordinate only
        Array2::from_shape_fn((rows, cols), |(_, j)| {
            two_pi * (j as f64 - xc).abs() * dsx * radius
        })
    };

    let max_arg = args.iter().cloned().fold(0.0_f64, f64::max);
    let table = BesselOrderTable::build(max_arg);
    Ok(args.mapv(|x| table.nearest_order(x) as i16))
}
