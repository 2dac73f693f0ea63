//! Layer-line position prediction from helical symmetry parameters.

use crate::params::{HelicalParameters, ParamError};

use super::bessel::first_peak;

/// Predicted layer-line peaks for one meridional index m.
///
/// Parallel vectors of reciprocal-space coordinates (1/Å) and the Bessel
/// order of each peak. For every entry `(sx, sy, n)` the mirrored entry
/// `(-sx, sy, n)` is also present.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerLineGroup {
    pub sx: Vec<f64>,
    pub sy: Vec<f64>,
    pub order: Vec<i32>,
}

impl LayerLineGroup {
    pub fn len(&self) -> usize {
        self.sx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sx.is_empty()
    }

    /// Iterate over `(sx, sy, order)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, i32)> + '_ {
        self.sx
            .iter()
            .zip(&self.sy)
            .zip(&self.order)
            .map(|((&sx, &sy), &n)| (sx, sy, n))
    }
}

/// Layer-line groups keyed by meridional index m, ordered by
/// `(|m| ascending, m ascending)`: 0, -1, 1, -2, 2, ...
///
/// The ordering is the rendering precedence, so consumers can draw m = 0
/// first and overlay the higher |m| repeats on top.
pub type LayerLineMap = Vec<(i32, LayerLineGroup)>;

/// Fetch the group for a given m from an ordered map.
pub fn group_for(map: &LayerLineMap, m: i32) -> Option<&LayerLineGroup> {
    map.iter().find(|(mi, _)| *mi == m).map(|(_, g)| g)
}

/// Predict all layer-line peak positions visible within `cutoff_res`.
///
/// For each meridional index m the base axial frequency is `m / rise`;
/// layer lines repeat around it at multiples of the inverse pitch, and
/// only Bessel orders that are multiples of the cyclic symmetry survive.
/// The radial position of a peak of order n is `first_peak(J_|n|) /
/// (2*pi*radius)`, zero on the meridian for n = 0.
///
/// With a tilted helix the axial frequency stretches by `1/cos(tilt)` and
/// the radial frequency contracts to `sqrt(sx^2 - (sy*sin(tilt))^2)`. A
/// negative radicand means the tilt projection pushed the peak inside the
/// meridian; those points are clamped to a small positive sx (1e-6)
/// rather than dropped, so mirror pairs stay intact.
///
/// When `m_max < 1` it is derived as `floor(|rise / cutoff_res|) + 3`.
///
/// # Errors
/// * `ZeroTwist` when `params.twist == 0`: the pitch is undefined and
///   the combination must be rejected by the caller
/// * `InvalidCsym` when `params.csym == 0` (possible through literal
///   construction, which bypasses [`HelicalParameters::new`])
/// * `InvalidCutoff` when `cutoff_res` is non-positive or non-finite
pub fn layer_line_positions(
    params: &HelicalParameters,
    cutoff_res: f64,
    m_max: i32,
) -> Result<LayerLineMap, ParamError> {
    if params.csym < 1 {
        return Err(ParamError::InvalidCsym(params.csym));
    }
    if !(cutoff_res > 0.0) || !cutoff_res.is_finite() {
        return Err(ParamError::InvalidCutoff(cutoff_res));
    }
    let pitch = params.pitch()?;
    let rise = params.rise;
    let csym = params.csym as i64;
    let radius = params.radius;
    let tilt = params.tilt;

    let m_max = if m_max < 1 {
        (rise / cutoff_res).abs().floor() as i32 + 3
    } else {
        m_max
    };
    let mut ms: Vec<i32> = (-m_max..=m_max).collect();
    ms.sort_by_key(|&m| (m.abs(), m));

    let smax = 1.0 / cutoff_res;
    let ds_p = 1.0 / pitch;
    let two_pi = 2.0 * std::f64::consts::PI;
    let tf = 1.0 / tilt.to_radians().cos();
    let tf2 = tilt.to_radians().sin();

    let mut groups = LayerLineMap::with_capacity(ms.len());
    for &m in &ms {
        let sy0 = m as f64 / rise;

        // harmonic index window spanning the resolution shell around sy0
        let i_top = ((smax - sy0).abs() / ds_p) as i64 * 2;
        let i_bottom = -(((-smax - sy0).abs() / ds_p) as i64) * 2;

        let mut sx = Vec::new();
        let mut sy = Vec::new();
        let mut order = Vec::new();
        for i in i_bottom..=i_top {
            if i % csym != 0 {
                continue;
            }
            let syi = sy0 + i as f64 * ds_p;
            let sxi = if i == 0 {
                0.0
            } else {
                first_peak(i.unsigned_abs() as u32) / (two_pi * radius)
            };
            let (sxi, syi) = if tilt != 0.0 {
                let syt = syi * tf;
                // order 0 stays on the meridian under any tilt
                let sxt = if i == 0 {
                    0.0
                } else {
                    let radicand = sxi * sxi - (syt * tf2) * (syt * tf2);
                    // clamped approximation for points pushed past the meridian
                    if radicand > 0.0 {
                        radicand.sqrt()
                    } else {
                        1e-6
                    }
                };
                (sxt, syt)
            } else {
                (sxi, syi)
            };
            sx.push(sxi);
            sy.push(syi);
            order.push(i as i32);
        }

        // mirror branch across the meridian
        let n = sx.len();
        for k in 0..n {
            sx.push(-sx[k]);
            sy.push(sy[k]);
            order.push(order[k]);
        }

        groups.push((m, LayerLineGroup { sx, sy, order }));
    }

    if let Some(g0) = group_for(&groups, 0) {
        if !g0.order.iter().any(|&n| n != 0) {
            log::warn!(
                "no off-equator layer line visible within {:.3} A for twist={} rise={} csym={}",
                cutoff_res,
                params.twist,
                rise,
                params.csym
            );
        }
    }

    Ok(groups)
}
