//! Direct non-uniform evaluation of the 2D discrete-space Fourier
//! transform.
//!
//! The requested frequencies need not lie on any FFT grid, so the
//! transform is evaluated exactly as a separable sum over the input
//! samples rather than through a power-of-two FFT. Cost is
//! O(rows * cols * out_cols + rows * out_rows * out_cols); the outer loops
//! run in parallel with rayon.

use ndarray::{Array2, Axis, Zip};
use num_complex::Complex64;

/// Evaluate `sum_{r,c} image[r,c] * exp(-i*2*pi*(fy*(r - rows/2) + fx*(c - cols/2)))`
/// for every pair of the given per-axis frequencies (cycles/sample).
///
/// Sample indices are centered on the grid midpoint `(rows/2, cols/2)`,
/// so the phase origin of the result sits at the image center.
pub fn nudft2_centered(
    image: &Array2<f64>,
    freq_y: &[f64],
    freq_x: &[f64],
) -> Array2<Complex64> {
    let (rows, cols) = image.dim();
    let (out_rows, out_cols) = (freq_y.len(), freq_x.len());
    let two_pi = 2.0 * std::f64::consts::PI;
    let yc = (rows / 2) as f64;
    let xc = (cols / 2) as f64;

    // column pass: partial[r, jx] = sum_c image[r, c] * exp(-i*2*pi*fx*(c - xc))
    let mut partial = Array2::<Complex64>::zeros((rows, out_cols));
    Zip::indexed(partial.rows_mut()).par_for_each(|r, mut row_out| {
        let row_in = image.row(r);
        for (jx, &fx) in freq_x.iter().enumerate() {
            let mut acc = Complex64::new(0.0, 0.0);
            for (c, &v) in row_in.iter().enumerate() {
                let phase = -two_pi * fx * (c as f64 - xc);
                acc += v * Complex64::from_polar(1.0, phase);
            }
            row_out[jx] = acc;
        }
    });

    // row pass: out[jy, jx] = sum_r exp(-i*2*pi*fy*(r - yc)) * partial[r, jx]
    let mut out = Array2::<Complex64>::zeros((out_rows, out_cols));
    Zip::indexed(out.axis_iter_mut(Axis(0))).par_for_each(|jy, mut row_out| {
        let fy = freq_y[jy];
        for r in 0..rows {
            let w = Complex64::from_polar(1.0, -two_pi * fy * (r as f64 - yc));
            let row_in = partial.row(r);
            for jx in 0..out_cols {
                row_out[jx] += w * row_in[jx];
            }
        }
    });

    out
}
