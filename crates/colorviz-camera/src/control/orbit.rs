//! Orbit around a target point.

use super::{ControlInput, Controller, Pose};
use colorviz_math::{TAU4, Vec2, Vec3, euler, point_sphere, sphere_point};

/// Spherical camera around [`Pose::target`].
///
/// `theta` is the elevation, clamped to `[-pi/2, pi/2]` while panning.
/// `phi` is the horizontal angle and is unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitControl {
    /// Distance from target.
    pub distance: f32,
    /// Elevation in radians.
    pub theta: f32,
    /// Horizontal angle in radians.
    pub phi: f32,
    pan_start_theta: f32,
    pan_start_phi: f32,
    target_start: Vec3,
}

impl Default for OrbitControl {
    fn default() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }
}

impl OrbitControl {
    /// Creates an orbit with the pan snapshot at the given angles.
    pub fn new(distance: f32, theta: f32, phi: f32) -> Self {
        Self {
            distance,
            theta,
            phi,
            pan_start_theta: theta,
            pan_start_phi: phi,
            target_start: Vec3::ZERO,
        }
    }

    /// Derives distance and angles from an existing pose.
    ///
    /// The resulting orbit reproduces `pose.pos` exactly, so switching from
    /// another mode does not move the camera. A camera sitting on its target
    /// keeps `fallback_distance`.
    pub fn from_pose(pose: &Pose, fallback_distance: f32) -> Self {
        let offset = pose.pos - pose.target;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            let mut orbit = Self::new(fallback_distance, 0.0, 0.0);
            orbit.target_start = pose.target;
            return orbit;
        }
        let angles = point_sphere(offset);
        let mut orbit = Self::new(distance, angles.x, angles.y);
        orbit.target_start = pose.target;
        orbit
    }

    /// Camera pose for the current angles around `target`.
    pub fn pose(&self, target: Vec3) -> Pose {
        Pose {
            pos: target + sphere_point(self.phi, self.theta) * self.distance,
            rot: Vec3::new(self.theta, -self.phi, 0.0),
            target,
        }
    }

    /// Snapshots angles and target so following pans are relative.
    pub fn pan_start(&mut self, target: Vec3) {
        self.pan_start_theta = self.theta;
        self.pan_start_phi = self.phi;
        self.target_start = target;
    }

    /// Rotates by `delta` (x: phi, y: theta) from the pan start.
    pub fn pan(&mut self, delta: Vec2) {
        self.theta = (self.pan_start_theta + delta.y).clamp(-TAU4, TAU4);
        self.phi = self.pan_start_phi + delta.x;
    }

    /// Mirrors the horizontal angle, including the pan snapshot.
    pub fn invert_phi(&mut self) {
        self.phi = -self.phi;
        self.pan_start_phi = -self.pan_start_phi;
    }
}

impl Controller for OrbitControl {
    fn drag_start(&mut self, pose: &Pose) {
        self.pan_start(pose.target);
    }

    fn control(&mut self, pose: &Pose, zoom: f32, input: &ControlInput) -> Pose {
        // Keyboard pans the target in the camera's screen plane.
        let local = (input.movement / zoom).extend(0.0);
        let target = self.target_start + euler(pose.rot).inverse() * local;
        self.pan(input.drag);
        self.pose(target)
    }
}
