//! Helical symmetry parameters and their validation.
//!
//! A helix is described by its twist (degrees of rotation between axially
//! successive subunits), rise (axial translation between subunits, in Å),
//! cyclic point-group symmetry order about the axis, subunit radius (Å),
//! and the tilt of the helix axis out of the projection plane (degrees).
//!
//! Parameters are value types: they are validated once at construction
//! and recreated whenever the inputs change, never mutated in place.

use thiserror::Error;

/// Errors raised by parameter validation and pitch-dependent computations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("cyclic symmetry order must be >= 1, got {0}")]
    InvalidCsym(u32),
    #[error("rise must be non-zero")]
    ZeroRise,
    #[error("twist must be non-zero for pitch-dependent computations")]
    ZeroTwist,
    #[error("pitch must be non-zero")]
    ZeroPitch,
    #[error("helical radius must be positive, got {0}")]
    InvalidRadius(f64),
    #[error("resolution cutoff must be positive and finite, got {0}")]
    InvalidCutoff(f64),
    #[error("grid {0}x{1} is below the usable minimum of 2x2")]
    GridTooSmall(usize, usize),
}

/// Helical symmetry parameters of a structure.
///
/// Angles are in degrees, lengths in Å. `twist` is the rotation applied
/// per rise step; `tilt` is the out-of-plane tilt of the helix axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelicalParameters {
    /// Rotation (degrees) between axially successive subunits
    pub twist: f64,
    /// Axial translation (Å) between successive subunits
    pub rise: f64,
    /// Order of cyclic point-group symmetry about the helix axis
    pub csym: u32,
    /// Radius (Å) of the subunit centers from the helix axis
    pub radius: f64,
    /// Out-of-plane tilt (degrees) of the helix axis
    pub tilt: f64,
}

impl HelicalParameters {
    /// Validate and construct a parameter set.
    ///
    /// # Errors
    /// * `InvalidCsym` if `csym < 1`
    /// * `ZeroRise` if `rise == 0`
    /// * `InvalidRadius` if `radius <= 0` or non-finite
    pub fn new(
        twist: f64,
        rise: f64,
        csym: u32,
        radius: f64,
        tilt: f64,
    ) -> Result<Self, ParamError> {
        if csym < 1 {
            return Err(ParamError::InvalidCsym(csym));
        }
        if rise == 0.0 || !rise.is_finite() {
            return Err(ParamError::ZeroRise);
        }
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(ParamError::InvalidRadius(radius));
        }
        Ok(Self {
            twist,
            rise,
            csym,
            radius,
            tilt,
        })
    }

    /// Pitch (Å) of one full 360-degree helical turn.
    ///
    /// # Errors
    /// `ZeroTwist` when `twist == 0`; a straight stack of subunits has an
    /// undefined pitch and callers must reject the combination before any
    /// pitch-dependent computation.
    pub fn pitch(&self) -> Result<f64, ParamError> {
        pitch(self.twist, self.rise)
    }
}

/// Pitch (Å) of a helix with the given twist (degrees) and rise (Å).
///
/// `pitch = |360 * rise / twist|`.
pub fn pitch(twist: f64, rise: f64) -> Result<f64, ParamError> {
    if twist == 0.0 {
        return Err(ParamError::ZeroTwist);
    }
    if rise == 0.0 {
        return Err(ParamError::ZeroRise);
    }
    Ok((360.0 * rise / twist).abs())
}

/// Twist (degrees) recovered from a pitch (Å) and rise (Å).
pub fn twist_of_pitch(pitch: f64, rise: f64) -> Result<f64, ParamError> {
    if pitch == 0.0 {
        return Err(ParamError::ZeroPitch);
    }
    if rise == 0.0 {
        return Err(ParamError::ZeroRise);
    }
    Ok(360.0 * rise / pitch)
}
