//! Gaussian band-limiting of a 2D field in the frequency domain.

use ndarray::Array2;
use num_complex::Complex64;
use rustfft::FftPlanner;

/// In-place 2D FFT over rows then columns.
fn fft2_inplace(data: &mut Array2<Complex64>, inverse: bool) {
    let (rows, cols) = data.dim();
    let mut planner = FftPlanner::new();
    let row_fft = if inverse {
        planner.plan_fft_inverse(cols)
    } else {
        planner.plan_fft_forward(cols)
    };
    for mut row in data.rows_mut() {
        let slice = row.as_slice_mut().expect("row-major layout");
        row_fft.process(slice);
    }
    let col_fft = if inverse {
        planner.plan_fft_inverse(rows)
    } else {
        planner.plan_fft_forward(rows)
    };
    let mut buf = vec![Complex64::new(0.0, 0.0); rows];
    for c in 0..cols {
        for r in 0..rows {
            buf[r] = data[[r, c]];
        }
        col_fft.process(&mut buf);
        for r in 0..rows {
            data[[r, c]] = buf[r];
        }
    }
}

/// Signed frequency index of FFT bin `i` on an axis of length `n`.
fn signed_index(i: usize, n: usize) -> f64 {
    let half = (n + 1) / 2;
    if i < half {
        i as f64
    } else {
        i as f64 - n as f64
    }
}

/// Apply a Gaussian low-pass and/or complementary high-pass to `field`.
///
/// The low-pass reaches half power at `low_pass_fraction` of the Nyquist
/// radius (`exp(-ln2 * r^2 / f^2)` over normalized frequency r); the
/// high-pass is one minus the same shape at `high_pass_fraction`. A
/// fraction outside (0, 1) disables that filter; with both disabled the
/// field is returned unchanged. The result is the magnitude of the
/// inverse transform.
pub fn band_limit(
    field: &Array2<f64>,
    low_pass_fraction: f64,
    high_pass_fraction: f64,
) -> Array2<f64> {
    let lp_active = 0.0 < low_pass_fraction && low_pass_fraction < 1.0;
    let hp_active = 0.0 < high_pass_fraction && high_pass_fraction < 1.0;
    if !lp_active && !hp_active {
        return field.clone();
    }

    let (rows, cols) = field.dim();
    let mut spectrum = field.mapv(|v| Complex64::new(v, 0.0));
    fft2_inplace(&mut spectrum, false);

    let yn = (rows / 2) as f64;
    let xn = (cols / 2) as f64;
    for ((r, c), v) in spectrum.indexed_iter_mut() {
        let fy = signed_index(r, rows) / yn;
        let fx = signed_index(c, cols) / xn;
        let r2 = fx * fx + fy * fy;
        let mut g = 1.0;
        if lp_active {
            let f2 = std::f64::consts::LN_2 / (low_pass_fraction * low_pass_fraction);
            g *= (-f2 * r2).exp();
        }
        if hp_active {
            let f2 = std::f64::consts::LN_2 / (high_pass_fraction * high_pass_fraction);
            g *= 1.0 - (-f2 * r2).exp();
        }
        *v *= g;
    }

    fft2_inplace(&mut spectrum, true);
    let norm = 1.0 / (rows * cols) as f64;
    spectrum.mapv(|v| v.norm() * norm)
}
