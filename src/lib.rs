//! Helical diffraction engine
//!
//! This crate models the diffraction signature (layer lines) of helically
//! symmetric structures and converts raw 2D images into calibrated
//! reciprocal-space representations for comparison against those
//! predictions. It provides:
//!
//! - Bessel-order assignment and layer-line position prediction from
//!   helical symmetry parameters (twist, rise, cyclic symmetry, radius,
//!   tilt)
//! - Non-uniform Fourier resampling of images to arbitrary per-axis
//!   resolution cutoffs, with derived power spectra and meridian phase
//!   differences
//! - An ideal-helix projector used to validate predictions against a
//!   known ground truth
//! - Geometric utilities: 2D affine rotate/shift, 3D volume projection,
//!   raised-cosine tapering masks, Gaussian band-limiting filters
//!
//! All engine operations are synchronous, stateless, pure functions over
//! immutable inputs. Identical arguments always yield identical outputs,
//! and the [`cache`] module offers a bounded single-flight memoization
//! layer for the expensive transforms.

pub mod cache;
pub mod diffraction;
pub mod fourier;
pub mod image_proc;
pub mod params;
pub mod simulate;

// Re-exports for easier access
pub use diffraction::bessel::BesselOrderTable;
pub use diffraction::layer_lines::{layer_line_positions, LayerLineGroup, LayerLineMap};
pub use diffraction::order_field::bessel_order_field;
pub use fourier::filter::band_limit;
pub use fourier::meridian::phase_difference_across_meridian;
pub use fourier::resample::{fourier_resample, power_spectrum, resample_power_spectrum};
pub use image_proc::normalize::normalize_percentile;
pub use image_proc::project::project_volume;
pub use image_proc::taper::taper_mask;
pub use image_proc::transform::rotate_shift;
pub use params::{pitch, twist_of_pitch, HelicalParameters, ParamError};
pub use simulate::helix::simulate_helix;
