//! # colorviz-camera
//!
//! Camera model and interactive camera control for the gamut viewer.
//!
//! - [`Camera`] - per-frame value type: view/projection matrices, screen,
//!   clip and world conversions, picking rays
//! - [`CameraControl`] - persistent pose and zoom driven by input deltas in
//!   one of four [`Mode`]s (fly, orbit, trackball, 2D tracking)
//!
//! # Example
//!
//! ```rust
//! use colorviz_camera::{Camera, CameraControl, OrthoView, Projection};
//! use colorviz_math::Vec2;
//!
//! let mut control = CameraControl::default();
//! control.set_orbit_dist(200.0);
//!
//! let mut cam = Camera::default();
//! control.update(&mut cam, Vec2::new(1280.0, 720.0));
//! control.set_ortho_view(&mut cam, OrthoView::Top);
//! assert_eq!(cam.projection, Projection::Orthographic);
//!
//! let ray = cam.ray(Vec2::new(640.0, 360.0));
//! assert!(ray.direction.y < -0.99);
//! ```

#![warn(missing_docs)]

mod camera;
pub mod control;

pub use camera::*;
pub use control::{CameraControl, ControlInput, ControlMode, Controller, Mode, Pose};
