//! # colorviz-color
//!
//! Colorimetric conversion for gamut display.
//!
//! - [`lab_to_rgb`] - CIELAB to clamped, gamma-encoded sRGB under any
//!   standard [`Illuminant`](colorviz_math::Illuminant)
//! - [`rgb_to_lab`], [`lab_to_xyz`], [`xyz_to_lab`] - the building blocks
//! - [`lab_to_rgb_batch`] - parallel conversion of a whole vertex list
//! - [`srgb`] - sRGB transfer functions and primaries matrices
//!
//! # Example
//!
//! ```rust
//! use colorviz_color::lab_to_rgb;
//! use colorviz_math::{Illuminant, Vec3};
//!
//! let gray = lab_to_rgb(Vec3::new(50.0, 0.0, 0.0), Illuminant::D65);
//! assert!((gray.x - gray.y).abs() < 1e-3);
//! ```

#![warn(missing_docs)]

mod lab;
pub mod srgb;

pub use lab::*;
