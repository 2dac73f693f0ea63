//! Helical diffraction model.
//!
//! The Fourier transform of a helical structure is a set of layer lines,
//! each governed by a Bessel function of the first kind whose order is set
//! by the helical symmetry. This module predicts where layer-line peaks
//! fall in reciprocal space and labels every reciprocal-space pixel with
//! the Bessel order whose first peak is nearest.

pub mod bessel;
pub mod layer_lines;
pub mod order_field;

pub use bessel::BesselOrderTable;
pub use layer_lines::{layer_line_positions, LayerLineGroup, LayerLineMap};
pub use order_field::bessel_order_field;
