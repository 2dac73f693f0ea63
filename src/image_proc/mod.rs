//! Geometric transforms and image statistics.
//!
//! Real-space utilities supporting the diffraction engine: affine
//! rotate/shift resampling, projection of 3D volumes, raised-cosine
//! tapering masks, percentile normalization, and pure classifiers over
//! image statistics.

pub mod classify;
pub mod normalize;
pub mod project;
pub mod taper;
pub mod transform;

pub use classify::{
    auto_vertical_center, estimate_radial_range, has_positive_contrast,
    looks_like_phase_difference, looks_like_power_spectrum,
};
pub use normalize::normalize_percentile;
pub use project::project_volume;
pub use taper::taper_mask;
pub use transform::rotate_shift;
