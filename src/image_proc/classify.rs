//! Pure classifiers over image statistics.
//!
//! These heuristics decide what kind of 2D input the caller handed over
//! (raw image, power spectrum, phase-difference map) and estimate coarse
//! geometry (radial extent, vertical centering). They are plain functions
//! of the pixel statistics with no interactive state, so callers can
//! override their verdicts freely.

use ndarray::{Array2, Axis};

use super::normalize::percentile;
use super::transform::{rotate_shift, InterpOrder};

/// A power spectrum has a far brighter hot spot than a natural image:
/// true when `max - median > thresh * sigma`.
pub fn looks_like_power_spectrum(data: &Array2<f64>, thresh: f64) -> bool {
    let mut sorted: Vec<f64> = data.iter().cloned().collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("non-NaN data"));
    let median = percentile(&sorted, 50.0);
    let max = *sorted.last().expect("non-empty data");
    let sigma = data.std(0.0);
    max - median > thresh * sigma
}

/// True when `data` has the signature of a meridian phase-difference map:
/// an all-zero first column, values spanning [0, 180] (the maximum within
/// `err_deg` of 180), and exact mirror symmetry about the meridian.
pub fn looks_like_phase_difference(data: &Array2<f64>, err_deg: f64) -> bool {
    let (rows, cols) = data.dim();
    if data.column(0).iter().any(|&v| v != 0.0) {
        return false;
    }
    let min = data.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !(min == 0.0 && (0.0..err_deg).contains(&(180.0 - max))) {
        return false;
    }
    for r in 0..rows {
        for c in 1..cols {
            if (data[[r, c]] - data[[r, cols - c]]).abs() > 1e-9 {
                return false;
            }
        }
    }
    true
}

/// True when the structure is brighter than the surroundings: the mean of
/// the four border rows/columns is below the overall mean.
pub fn has_positive_contrast(data: &Array2<f64>) -> bool {
    let (rows, cols) = data.dim();
    let edge_mean = (data.row(0).mean().unwrap()
        + data.row(rows - 1).mean().unwrap()
        + data.column(0).mean().unwrap()
        + data.column(cols - 1).mean().unwrap())
        / 4.0;
    edge_mean < data.mean().unwrap()
}

/// Estimate the helical radius and a mask radius (both in pixels) from
/// the horizontal profile of a vertically oriented helix image.
///
/// The profile is the column sum; the radius is the mean distance of the
/// two profile peaks from the center, and the mask radius spans every
/// column whose value exceeds `thresh_ratio` of the background-subtracted
/// peak.
pub fn estimate_radial_range(data: &Array2<f64>, thresh_ratio: f64) -> (f64, f64) {
    let proj: Vec<f64> = data
        .axis_iter(Axis(1))
        .map(|col| col.sum())
        .collect();
    let n = proj.len();
    let half = n / 2;

    let argmax = |s: &[f64]| -> usize {
        s.iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |acc, (i, &v)| {
                if v > acc.1 {
                    (i, v)
                } else {
                    acc
                }
            })
            .0
    };
    let left_peak = argmax(&proj[..=half]);
    let right_peak = argmax(&proj[half..]) + half;
    let radius = ((half - left_peak) as f64 + (right_peak - half) as f64) / 2.0;

    let background =
        (proj[0] + proj[1] + proj[2] + proj[n - 3] + proj[n - 2] + proj[n - 1]) / 6.0;
    let peak = proj.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let thresh = (peak - background) * thresh_ratio + background;
    let above: Vec<usize> = (0..n).filter(|&i| proj[i] > thresh).collect();
    let mask_radius = match (above.first(), above.last()) {
        (Some(&xmin), Some(&xmax)) => {
            let lo = (half as isize - xmin as isize).unsigned_abs();
            let hi = (xmax as isize - half as isize).unsigned_abs();
            lo.max(hi) as f64
        }
        _ => half as f64,
    };
    (radius, mask_radius)
}

/// Bounded scalar minimization by golden-section search.
fn minimize_scalar(f: impl Fn(f64) -> f64, mut a: f64, mut b: f64, tol: f64) -> f64 {
    let inv_phi = (5.0_f64.sqrt() - 1.0) / 2.0;
    let mut c = b - inv_phi * (b - a);
    let mut d = a + inv_phi * (b - a);
    let mut fc = f(c);
    let mut fd = f(d);
    while (b - a).abs() > tol {
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - inv_phi * (b - a);
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + inv_phi * (b - a);
            fd = f(d);
        }
    }
    0.5 * (a + b)
}

/// Estimate the rotation and horizontal shift that bring a helix image
/// upright and centered on its axis.
///
/// The rotation maximizes the peakedness of the vertical projection
/// (sharpest column profile when the axis is vertical); the shift then
/// minimizes the mirror asymmetry of that profile. Returns
/// `(angle_degrees, shift_x_pixels)`.
pub fn auto_vertical_center(image: &Array2<f64>) -> (f64, f64) {
    let (rows, cols) = image.dim();

    // suppress background before scoring
    let corners = [
        image[[0, 0]],
        image[[1, 1]],
        image[[2, 2]],
        image[[rows - 3, cols - 3]],
        image[[rows - 2, cols - 2]],
        image[[rows - 1, cols - 1]],
    ];
    let background = corners.iter().sum::<f64>() / corners.len() as f64;
    let max_val = image.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let thresh = (max_val - background) * 0.2 + background;
    let work = if background < thresh && thresh < max_val {
        image.mapv(|v| ((v - thresh) / (max_val - thresh)).max(0.0))
    } else {
        image.clone()
    };

    let score_rotation = |angle: f64| -> f64 {
        let rotated = rotate_shift(
            &work,
            angle,
            (0.0, 0.0),
            (0.0, 0.0),
            None,
            InterpOrder::Bilinear,
        );
        let mut proj: Vec<f64> = rotated.axis_iter(Axis(1)).map(|col| col.sum()).collect();
        proj.sort_by(|a, b| a.partial_cmp(b).expect("non-NaN data"));
        // peakedness over several high percentiles is more robust than
        // the maximum alone
        -[100.0, 95.0, 90.0, 85.0, 80.0]
            .iter()
            .map(|&p| percentile(&proj, p))
            .sum::<f64>()
    };
    let angle = minimize_scalar(score_rotation, -90.0, 90.0, 1e-2);

    // horizontal centering of the upright profile
    let rotated = rotate_shift(
        &work,
        angle,
        (0.0, 0.0),
        (0.0, 0.0),
        None,
        InterpOrder::Bilinear,
    );
    let mut profile: Vec<f64> = rotated.axis_iter(Axis(1)).map(|col| col.sum()).collect();
    let peak = profile.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if peak > 0.0 {
        for v in &mut profile {
            *v /= peak;
            if *v < 0.2 {
                *v = 0.0;
            }
        }
    }
    let n = profile.len();
    let half = n / 2;
    let strong: Vec<usize> = (0..n).filter(|&i| profile[i] > 0.5).collect();
    let max_shift = match (strong.first(), strong.last()) {
        (Some(&lo), Some(&hi)) => {
            ((hi as isize - half as isize) - (half as isize - lo as isize)).abs() as f64 * 1.5
        }
        _ => n as f64 / 4.0,
    };
    let max_shift = max_shift.max(1.0);

    let sample = |x: f64| -> f64 {
        // linear interpolation with constant-zero boundary
        if x < 0.0 || x > (n - 1) as f64 {
            return 0.0;
        }
        let x0 = x.floor() as usize;
        let x1 = (x0 + 1).min(n - 1);
        let t = x - x0 as f64;
        profile[x0] * (1.0 - t) + profile[x1] * t
    };
    let score_shift = |dx: f64| -> f64 {
        (0..n)
            .map(|i| {
                let a = sample(i as f64 - dx);
                let b = sample((n - 1 - i) as f64 - dx);
                (a - b).abs()
            })
            .sum()
    };
    let dx = minimize_scalar(score_shift, -max_shift, max_shift, 1e-3);
    let dx = if n % 2 == 0 { dx + 0.5 } else { dx };

    (angle, dx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fourier::phase_difference_across_meridian;
    use approx::assert_abs_diff_eq;

    #[test]
    fn flat_field_is_not_a_power_spectrum() {
        let data = Array2::from_shape_fn((32, 32), |(i, j)| ((i + j) % 3) as f64);
        assert!(!looks_like_power_spectrum(&data, 15.0));
    }

    #[test]
    fn single_hot_spot_is_a_power_spectrum() {
        let mut data = Array2::from_elem((32, 32), 1.0);
        data[[16, 16]] = 1e4;
        assert!(looks_like_power_spectrum(&data, 15.0));
    }

    #[test]
    fn real_phase_difference_maps_classify_true() {
        let phase = Array2::from_shape_fn((16, 16), |(r, c)| {
            ((r * 13 + c * 7) as f64).sin() * std::f64::consts::PI
        });
        let pd = phase_difference_across_meridian(&phase);
        // the folded map may not reach all the way to 180; widen err
        assert!(looks_like_phase_difference(&pd, 180.0));
    }

    #[test]
    fn asymmetric_data_is_not_a_phase_difference() {
        let mut data = Array2::zeros((8, 8));
        data[[2, 3]] = 120.0;
        assert!(!looks_like_phase_difference(&data, 30.0));
    }

    #[test]
    fn bright_center_has_positive_contrast() {
        let data = Array2::from_shape_fn((16, 16), |(i, j)| {
            let d = ((i as f64 - 8.0).powi(2) + (j as f64 - 8.0).powi(2)).sqrt();
            (-d / 4.0).exp()
        });
        assert!(has_positive_contrast(&data));
        let inverted = data.mapv(|v| 1.0 - v);
        assert!(!has_positive_contrast(&inverted));
    }

    #[test]
    fn radial_range_of_two_walls() {
        // tube walls at +/- 10 px from the center of a 64-wide image
        let data = Array2::from_shape_fn((32, 64), |(_, j)| {
            if j == 22 || j == 42 {
                1.0
            } else {
                0.0
            }
        });
        let (radius, mask_radius) = estimate_radial_range(&data, 0.1);
        assert_abs_diff_eq!(radius, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(mask_radius, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn golden_section_finds_a_parabola_minimum() {
        let x = minimize_scalar(|x| (x - 1.7) * (x - 1.7), -10.0, 10.0, 1e-6);
        assert_abs_diff_eq!(x, 1.7, epsilon = 1e-4);
    }

    #[test]
    fn vertical_center_recovers_a_known_rotation() {
        // a vertical bar rotated by a small known angle
        let upright = Array2::from_shape_fn((64, 64), |(_, j)| {
            let d = (j as f64 - 32.0).abs();
            (-d * d / 8.0).exp()
        });
        let tilted = rotate_shift(
            &upright,
            7.0,
            (0.0, 0.0),
            (0.0, 0.0),
            None,
            InterpOrder::Bilinear,
        );
        let (angle, _) = auto_vertical_center(&tilted);
        // undoing the tilt means finding roughly -7 deg
        assert_abs_diff_eq!(angle, -7.0, epsilon = 1.0);
    }
}
