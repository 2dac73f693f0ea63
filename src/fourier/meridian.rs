//! Phase difference across the meridian.
//!
//! Comparing the phase on the two sides of the meridian distinguishes
//! even from odd Bessel-order contributions without needing absolute
//! phase: a mirror-symmetric (even-order) layer line differs by 0 degrees
//! across the meridian, an antisymmetric (odd-order) one by 180.

use ndarray::Array2;

/// Fold the phase difference between mirrored columns into [0, 180]
/// degrees.
///
/// Column 0 is fixed to 0; every other column x is compared against its
/// mirror at `cols - x`, and the signed difference is folded through
/// `acos(cos(delta))` so 0 degrees marks even-order content and 180
/// degrees odd-order content. Input phases are radians, output is
/// degrees.
pub fn phase_difference_across_meridian(phase: &Array2<f64>) -> Array2<f64> {
    let (rows, cols) = phase.dim();
    let mut out = Array2::<f64>::zeros((rows, cols));
    for r in 0..rows {
        for c in 1..cols {
            let delta = phase[[r, c]] - phase[[r, cols - c]];
            out[[r, c]] = delta.cos().acos().to_degrees();
        }
    }
    out
}
