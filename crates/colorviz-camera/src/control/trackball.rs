//! Trackball placeholder.

use super::{ControlInput, Controller, Pose};

/// Trackball rotation is not implemented; input leaves the pose unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackballControl;

impl Controller for TrackballControl {
    fn drag_start(&mut self, _pose: &Pose) {}

    fn control(&mut self, pose: &Pose, _zoom: f32, _input: &ControlInput) -> Pose {
        *pose
    }
}
