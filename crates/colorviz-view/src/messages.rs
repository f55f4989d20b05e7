//! Input messages and the events they produce.
//!
//! The windowing layer translates its own events into [`ViewerMsg`]s and
//! hands them to [`Viewer::handle`](crate::Viewer::handle) in order. Each
//! message is applied immediately; some yield a [`ViewerEvent`] for the UI.

use crate::arena::MeshHandle;
use colorviz_camera::{Mode, OrthoView, Projection};
use colorviz_gamut::{BooleanError, BooleanOp, MeshId};
use colorviz_math::{Vec2, Vec3};
use std::path::PathBuf;

/// Messages from the UI to the viewer core.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerMsg {
    /// Load a gamut file.
    LoadGamut(PathBuf),

    /// Remove a mesh and release its buffers.
    RemoveMesh(MeshHandle),

    /// Show or hide a mesh.
    SetActive {
        /// Mesh
        handle: MeshHandle,
        /// Visibility
        active: bool,
    },

    /// Toggle wireframe drawing for a mesh.
    SetWireframe {
        /// Mesh
        handle: MeshHandle,
        /// Wireframe flag
        wireframe: bool,
    },

    /// Make one mesh transparent (None = all opaque).
    SetTransparent(Option<MeshHandle>),

    /// Compute `a op b` and add the result as a new mesh.
    ComputeBoolean {
        /// First operand
        a: MeshHandle,
        /// Second operand
        b: MeshHandle,
        /// Operation
        op: BooleanOp,
    },

    /// Start or reverse the colorspace blend.
    SwitchColorspace,

    /// Change camera control mode.
    SetMode(Mode),

    /// Change projection.
    SetProjection(Projection),

    /// Snap to an axis-aligned orthographic view.
    SetOrthoView(OrthoView),

    /// Pointer pressed at screen position.
    DragStart(Vec2),

    /// Pointer moved while pressed, absolute screen position.
    Drag(Vec2),

    /// Pointer released.
    DragEnd,

    /// Relative pointer motion for fly-look.
    MouseMove(Vec2),

    /// Scroll wheel notches, positive away from the user.
    Scroll(f32),

    /// Held movement keys as an axis (x: right, y: forward).
    KeyMove(Vec2),

    /// Viewport resized.
    Resize(Vec2),

    /// Find the mesh under a screen position.
    Pick(Vec2),
}

/// Events from the viewer core to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    /// Gamut loaded.
    GamutLoaded {
        /// Arena handle
        handle: MeshHandle,
        /// Mesh id
        id: MeshId,
        /// Source file
        path: PathBuf,
    },

    /// Gamut could not be loaded; it is not added.
    LoadFailed {
        /// Source file
        path: PathBuf,
        /// Error text
        error: String,
    },

    /// Mesh removed.
    MeshRemoved(MeshHandle),

    /// Boolean result available (possibly from the cache).
    BooleanReady {
        /// Result mesh
        handle: MeshHandle,
        /// Operation
        op: BooleanOp,
    },

    /// Boolean failed; not retried for this pair.
    BooleanFailed {
        /// Operation
        op: BooleanOp,
        /// Cause
        error: BooleanError,
    },

    /// Pick result.
    Picked {
        /// Mesh hit, if any
        hit: Option<(MeshHandle, Vec3)>,
    },

    /// A message referred to a dead handle or was otherwise invalid.
    Error(String),
}
