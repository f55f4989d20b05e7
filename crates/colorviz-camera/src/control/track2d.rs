//! Planar panning for 2D views.

use super::{ControlInput, Controller, Pose};
use colorviz_math::Vec3;

/// Drag scale applied before dividing by zoom.
pub const TRACK2D_DRAG_SCALE: f32 = 100_000.0;

/// Fixed camera depth in 2D mode.
pub const TRACK2D_DEPTH: f32 = 50.0;

/// Pans the camera in the XY plane proportional to the drag.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Track2DControl {
    pos_start: Vec3,
}

impl Controller for Track2DControl {
    fn drag_start(&mut self, pose: &Pose) {
        self.pos_start = pose.pos;
    }

    fn control(&mut self, pose: &Pose, zoom: f32, input: &ControlInput) -> Pose {
        let offset = (input.drag * TRACK2D_DRAG_SCALE / zoom).extend(0.0);
        let mut pos = self.pos_start + offset;
        pos.z = TRACK2D_DEPTH;
        Pose { pos, ..*pose }
    }
}
