//! # colorviz-math
//!
//! Math primitives shared by the colorviz crates.
//!
//! - [`Mat3`] - row-major 3x3 matrices for XYZ/RGB transforms
//! - [`Illuminant`] white points and chromatic adaptation ([`adapt_matrix`], [`BRADFORD`])
//! - Camera helpers: Euler rotation, spherical coordinates, projection matrices
//! - [`Plane`], [`Ray`], [`Triangle`] for picking
//!
//! # Design
//!
//! Vectors and 4x4 matrices are plain [`glam`] types, re-exported here so
//! downstream crates share one version. Color matrices keep their own
//! [`Mat3`] type because color science literature writes them row-major:
//!
//! ```text
//! xyz = matrix * rgb
//! ```
//!
//! # Usage
//!
//! ```rust
//! use colorviz_math::{adapt_matrix, Illuminant, BRADFORD, Vec3};
//!
//! let d50_to_d65 = adapt_matrix(BRADFORD, Illuminant::D50.white(), Illuminant::D65.white());
//! let white = d50_to_d65 * Illuminant::D50.white();
//! assert!((white - Illuminant::D65.white()).abs().max_element() < 1e-3);
//! ```
//!
//! # Used By
//!
//! - `colorviz-color` - Lab/XYZ/sRGB conversion
//! - `colorviz-camera` - view/projection matrices, rays
//! - `colorviz-gamut` - bounding boxes, normals, picking

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod adapt;
mod geom;
mod mat3;
mod transform;

pub use adapt::*;
pub use geom::*;
pub use mat3::*;
pub use transform::*;

pub use glam::{Affine3A, Mat4, Quat, Vec2, Vec3, Vec4};

/// Quarter turn (pi / 2). Orbit elevation is clamped to `[-TAU4, TAU4]`.
pub const TAU4: f32 = std::f32::consts::FRAC_PI_2;
