//! First-peak positions of Bessel functions of the first kind.
//!
//! A layer line of Bessel order n has its first intensity maximum where
//! J_n reaches its first peak, i.e. at the first zero of J_n'. The table
//! built here maps order -> first-peak argument, ascending, and supports
//! nearest-order classification of an arbitrary argument by binary search.

use scilib::math::bessel;

/// J_n(x) for x > 0, stable at any order.
///
/// Orders 0 and 1 come from the library series. Higher orders use the
/// downward (Miller) recurrence normalized with `J_0 + 2*sum J_2k = 1`:
/// the series evaluation degrades near the turning point x ~ n, which is
/// exactly where the first peak lives, while the downward recurrence
/// stays accurate there. The start index covers both the order and the
/// argument so the recurrence descends through the decaying regime.
fn bessel_jn(n: u32, x: f64) -> f64 {
    debug_assert!(x > 0.0);
    if n <= 1 {
        return bessel::j_n(n as i32, x);
    }
    let tox = 2.0 / x;
    let base = (n as usize).max(x.ceil() as usize);
    let m = 2 * ((base + (40.0 * base as f64).sqrt() as usize) / 2);

    let mut bj = 1.0_f64;
    let mut bjp = 0.0_f64;
    let mut ans = 0.0_f64;
    let mut sum = 0.0_f64;
    let mut even = false;
    for j in (1..=m).rev() {
        let bjm = j as f64 * tox * bj - bjp;
        bjp = bj;
        bj = bjm;
        if bj.abs() > 1e10 {
            bj *= 1e-10;
            bjp *= 1e-10;
            ans *= 1e-10;
            sum *= 1e-10;
        }
        if even {
            sum += bj;
        }
        even = !even;
        if j == n as usize {
            ans = bjp;
        }
    }
    ans / (2.0 * sum - bj)
}

/// J_n' expressed through the recurrence J_n'(x) = J_{n-1}(x) - (n/x) J_n(x).
fn j_n_prime(n: u32, x: f64) -> f64 {
    bessel_jn(n - 1, x) - (n as f64 / x) * bessel_jn(n, x)
}

/// First peak argument of J_n (first zero of J_n') for n >= 1.
///
/// J_n rises monotonically from 0 up to its first maximum, which lies a
/// little above x = n, so a forward scan from x = n brackets the sign
/// change of J_n' and bisection refines it.
pub fn first_peak(n: u32) -> f64 {
    assert!(n >= 1, "order 0 peaks at the origin; no search needed");
    let step = 0.25;
    let mut a = (n as f64).max(1e-3);
    // J_n'(a) > 0 below the first maximum
    let mut fa = j_n_prime(n, a);
    let mut b;
    loop {
        b = a + step;
        let fb = j_n_prime(n, b);
        if fa > 0.0 && fb <= 0.0 {
            break;
        }
        a = b;
        fa = fb;
    }
    // bisection on [a, b]
    for _ in 0..64 {
        let mid = 0.5 * (a + b);
        if j_n_prime(n, mid) > 0.0 {
            a = mid;
        } else {
            b = mid;
        }
    }
    0.5 * (a + b)
}

/// Ascending table of first-peak arguments of J_n, indexed by order.
///
/// Entry 0 is 0.0 (J_0 peaks at the origin); entries for n = 1, 2, ... are
/// appended while the peak argument stays below the requested maximum, so
/// the table covers exactly the argument range a given reciprocal-space
/// grid can produce.
#[derive(Debug, Clone, PartialEq)]
pub struct BesselOrderTable {
    peaks: Vec<f64>,
}

impl BesselOrderTable {
    /// Build the table for arguments up to `max_arg`.
    ///
    /// # Panics
    /// When `max_arg` is not finite: the table would grow without bound.
    pub fn build(max_arg: f64) -> Self {
        assert!(max_arg.is_finite(), "max_arg must be finite");
        let mut peaks = vec![0.0];
        let mut n = 1u32;
        loop {
            let peak = first_peak(n);
            if peak >= max_arg {
                break;
            }
            peaks.push(peak);
            n += 1;
        }
        Self { peaks }
    }

    /// Number of orders in the table (highest order + 1).
    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// Highest Bessel order covered by the table.
    pub fn max_order(&self) -> u32 {
        (self.peaks.len() - 1) as u32
    }

    /// First-peak argument of order `n`, if covered.
    pub fn peak(&self, n: u32) -> Option<f64> {
        self.peaks.get(n as usize).copied()
    }

    /// Order whose first-peak argument is nearest to `x` (L1 distance).
    ///
    /// The table is ascending, so a binary search finds the insertion
    /// point and the nearer of the two neighbors wins. Ties go to the
    /// lower order, matching an argmin over |peak - x|.
    pub fn nearest_order(&self, x: f64) -> u32 {
        let i = self.peaks.partition_point(|&p| p < x);
        if i == 0 {
            return 0;
        }
        if i >= self.peaks.len() {
            return (self.peaks.len() - 1) as u32;
        }
        let below = x - self.peaks[i - 1];
        let above = self.peaks[i] - x;
        if below <= above {
            (i - 1) as u32
        } else {
            i as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Reference first zeros of J_n' (Abramowitz & Stegun table 9.5)
    const JNP1_REFERENCE: [(u32, f64); 5] = [
        (1, 1.84118378),
        (2, 3.05423693),
        (3, 4.20118894),
        (4, 5.31755313),
        (5, 6.41561638),
    ];

    #[test]
    fn first_peaks_match_reference_values() {
        for &(n, expected) in &JNP1_REFERENCE {
            assert_relative_eq!(first_peak(n), expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn first_peaks_stay_accurate_at_high_orders() {
        // realistic radius/cutoff combinations reach orders well past 20,
        // where naive series evaluation of J_n falls apart
        for &(n, expected) in &[
            (16, 18.06326499),
            (30, 32.53422356),
            (50, 52.99764039),
        ] {
            assert_relative_eq!(first_peak(n), expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn high_order_table_is_strictly_ascending() {
        // covers orders up to ~50 without overflow or stalls
        let table = BesselOrderTable::build(55.0);
        assert!(table.max_order() >= 45);
        for n in 1..table.len() {
            assert!(table.peaks[n] > table.peaks[n - 1]);
        }
    }

    #[test]
    #[should_panic(expected = "max_arg must be finite")]
    fn non_finite_bound_is_rejected() {
        BesselOrderTable::build(f64::INFINITY);
    }

    #[test]
    fn table_is_ascending_and_starts_at_zero() {
        let table = BesselOrderTable::build(20.0);
        assert_relative_eq!(table.peak(0).unwrap(), 0.0);
        for n in 1..table.len() {
            assert!(table.peaks[n] > table.peaks[n - 1]);
        }
        // every included peak is below the bound
        assert!(*table.peaks.last().unwrap() < 20.0);
    }

    #[test]
    fn table_covers_requested_range() {
        let table = BesselOrderTable::build(10.0);
        // J_7 peaks at ~8.58, J_8 at ~9.65, J_9 at ~10.71
        assert_eq!(table.max_order(), 8);
    }

    #[test]
    fn nearest_order_classifies_by_l1_distance() {
        let table = BesselOrderTable::build(10.0);
        assert_eq!(table.nearest_order(0.0), 0);
        assert_eq!(table.nearest_order(0.5), 0);
        assert_eq!(table.nearest_order(1.8), 1);
        assert_eq!(table.nearest_order(3.0), 2);
        // beyond the last entry everything maps to the highest order
        assert_eq!(table.nearest_order(100.0), table.max_order());
    }

    #[test]
    fn nearest_order_is_exact_on_peaks() {
        let table = BesselOrderTable::build(12.0);
        for n in 0..=table.max_order() {
            assert_eq!(table.nearest_order(table.peak(n).unwrap()), n);
        }
    }
}
