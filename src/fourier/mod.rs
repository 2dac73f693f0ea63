//! Spectral resampling of images to arbitrary resolution cutoffs.
//!
//! Images arrive as real-valued sample grids with a pixel size in Å; the
//! functions here evaluate their continuous discrete-space Fourier
//! transform at the exact frequencies implied by a requested per-axis
//! resolution cutoff and derive the power spectrum and meridian phase
//! difference downstream consumers compare against layer-line
//! predictions. All functions are pure.

pub mod filter;
pub mod meridian;
pub mod nudft;
pub mod resample;

pub use filter::band_limit;
pub use meridian::phase_difference_across_meridian;
pub use resample::{fourier_resample, power_spectrum, resample_power_spectrum, ResampleError};

use ndarray::Array2;

/// Sample frequencies (cycles/sample) in FFT output order:
/// `[0, 1, ..., n/2-1, -n/2, ..., -1] / n` for even n.
pub fn fftfreq(n: usize) -> Vec<f64> {
    let half = (n + 1) / 2; // number of non-negative bins
    (0..n)
        .map(|i| {
            if i < half {
                i as f64 / n as f64
            } else {
                (i as isize - n as isize) as f64 / n as f64
            }
        })
        .collect()
}

/// Move the zero-frequency element of each axis to the grid center.
pub fn fftshift2<T: Clone>(data: &Array2<T>) -> Array2<T> {
    let (rows, cols) = data.dim();
    let (ry, rx) = (rows / 2, cols / 2);
    Array2::from_shape_fn((rows, cols), |(i, j)| {
        data[[(i + rows - ry) % rows, (j + cols - rx) % cols]].clone()
    })
}

/// Inverse of [`fftshift2`]: move the centered origin back to the corner.
pub fn ifftshift2<T: Clone>(data: &Array2<T>) -> Array2<T> {
    let (rows, cols) = data.dim();
    let (ry, rx) = (rows / 2, cols / 2);
    Array2::from_shape_fn((rows, cols), |(i, j)| {
        data[[(i + ry) % rows, (j + rx) % cols]].clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn fftfreq_matches_fft_convention() {
        let f = fftfreq(4);
        assert_eq!(f, vec![0.0, 0.25, -0.5, -0.25]);
        let f = fftfreq(5);
        assert_relative_eq!(f[2], 0.4);
        assert_relative_eq!(f[3], -0.4);
        assert_relative_eq!(f[4], -0.2);
    }

    #[test]
    fn shift_round_trips() {
        let a = array![[1, 2, 3], [4, 5, 6], [7, 8, 9]];
        let back = ifftshift2(&fftshift2(&a));
        assert_eq!(a, back);
    }

    #[test]
    fn shift_centers_the_origin() {
        let mut a = Array2::<f64>::zeros((4, 4));
        a[[0, 0]] = 1.0;
        let s = fftshift2(&a);
        assert_relative_eq!(s[[2, 2]], 1.0);
    }
}
