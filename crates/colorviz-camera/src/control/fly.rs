//! Free-flying camera.

use super::{ControlInput, Controller, Pose};
use colorviz_math::{Vec3, euler};

/// Keyboard moves along camera-local axes, mouse movement turns the camera.
///
/// Rotation is accumulated without clamping, so pitching past vertical
/// flips the view.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlyControl;

impl FlyControl {
    /// World-space offset for a camera-local direction.
    pub fn local_to_world(rot: Vec3, dir: Vec3) -> Vec3 {
        euler(rot).inverse() * dir
    }
}

impl Controller for FlyControl {
    fn drag_start(&mut self, _pose: &Pose) {}

    fn control(&mut self, pose: &Pose, _zoom: f32, input: &ControlInput) -> Pose {
        let step = Vec3::new(input.movement.x, 0.0, -input.movement.y);
        Pose {
            pos: pose.pos + Self::local_to_world(pose.rot, step),
            rot: pose.rot + Vec3::new(input.rotate.y, input.rotate.x, 0.0),
            target: pose.target,
        }
    }
}
