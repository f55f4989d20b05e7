//! # colorviz-view
//!
//! Headless core of the gamut viewer.
//!
//! Features:
//! - Gamut loading into a [`MeshArena`] with stable [`MeshHandle`]s
//! - Fly, orbit, trackball and 2D camera modes driven by [`ViewerMsg`]s
//! - Union / intersection of two gamuts, cached per pair
//! - Per-mesh visibility and wireframe, one transparent mesh at a time
//! - Animated colorspace blend
//! - RON config ([`ViewerConfig`]) and persisted session ([`ViewerPersistence`])
//!
//! Windowing, GPU and widgets are out of scope: the host implements
//! [`RenderBackend`] and translates its input events into messages.
//!
//! # Quick Start
//!
//! ```rust
//! use colorviz_view::{RecordingBackend, Viewer, ViewerConfig, ViewerMsg};
//! use colorviz_math::Vec2;
//!
//! let mut backend = RecordingBackend::new();
//! let mut viewer = Viewer::new(ViewerConfig::default());
//!
//! viewer.handle(ViewerMsg::Resize(Vec2::new(800.0, 600.0)), &mut backend);
//! viewer.handle(ViewerMsg::Scroll(1.0), &mut backend);
//! viewer.frame(1.0 / 60.0, &mut backend);
//!
//! assert!(backend.uniform("uTView").is_some());
//! ```
//!
//! # Input Mapping
//!
//! | Input | Message | Effect |
//! |-------|---------|--------|
//! | Press / move / release | `DragStart` / `Drag` / `DragEnd` | orbit rotate, 2D pan |
//! | Mouse motion | `MouseMove` | fly look |
//! | Wheel | `Scroll` | zoom |
//! | WASD | `KeyMove` | fly move, orbit target pan |
//! | Numpad views | `SetOrthoView` | snap + orthographic |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod arena;
mod blend;
mod config;
mod error;
mod messages;
mod render;
mod state;
mod viewer;

pub use arena::{MeshArena, MeshEntry, MeshHandle};
pub use blend::ColorspaceBlend;
pub use config::{DEFAULT_BLEND_DURATION, DEFAULT_ORBIT_DISTANCE, DEFAULT_TARGET, ViewerConfig};
pub use error::{Result, ViewerError};
pub use messages::{ViewerEvent, ViewerMsg};
pub use render::{
    BackendCall, BufferId, DrawCall, MeshBuffers, RecordingBackend, RenderBackend, U_ALPHA,
    U_BLEND, U_CAMERA_POS, U_MODEL, U_PROJ, U_VIEW, U_WIREFRAME, Uniform,
};
pub use state::{PERSISTENCE_FILE, ViewerPersistence, persistence_path};
pub use viewer::{BooleanKey, BooleanOutcome, DEFAULT_VIEWPORT, Viewer};
