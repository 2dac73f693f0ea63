//! Synthetic ground-truth generation.

pub mod helix;

pub use helix::simulate_helix;
