//! Interactive camera control.
//!
//! [`CameraControl`] owns the camera pose between frames and turns pointer
//! and keyboard deltas into a new pose according to the active mode. Each
//! mode is its own [`Controller`] type; [`ControlMode`] holds whichever one
//! is active together with its private state, so orbit angles only exist
//! while orbiting.
//!
//! ```text
//! input deltas --> CameraControl::control --> Pose --> update(&mut Camera)
//! ```

mod fly;
mod orbit;
mod track2d;
mod trackball;

pub use fly::FlyControl;
pub use orbit::OrbitControl;
pub use track2d::{TRACK2D_DEPTH, TRACK2D_DRAG_SCALE, Track2DControl};
pub use trackball::TrackballControl;

use crate::{Camera, OrthoView, Projection};
use colorviz_math::{Vec2, Vec3, point_sphere};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Camera position, Euler rotation and orbit target.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    /// World position.
    pub pos: Vec3,
    /// Euler rotation (X, Y, Z) in radians.
    pub rot: Vec3,
    /// Orbit target.
    pub target: Vec3,
}

/// Per-frame input deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInput {
    /// Mouse-look delta.
    pub rotate: Vec2,
    /// Drag offset accumulated since [`CameraControl::drag_start`].
    pub drag: Vec2,
    /// Keyboard movement.
    pub movement: Vec2,
}

/// One camera interaction mode.
pub trait Controller {
    /// Snapshots whatever a following drag is relative to.
    fn drag_start(&mut self, pose: &Pose);

    /// Computes the next pose from the current one.
    fn control(&mut self, pose: &Pose, zoom: f32, input: &ControlInput) -> Pose;
}

/// Control mode selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Free flight.
    #[default]
    Fly,
    /// Orbit around the target.
    Orbit,
    /// Trackball (no-op).
    Trackball,
    /// Planar panning.
    Track2D,
}

impl Mode {
    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fly => "Fly",
            Self::Orbit => "Orbit",
            Self::Trackball => "Trackball",
            Self::Track2D => "Track 2D",
        }
    }

    /// All modes.
    pub const fn all() -> &'static [Self] {
        &[Self::Fly, Self::Orbit, Self::Trackball, Self::Track2D]
    }
}

/// Active controller with its state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlMode {
    /// Free flight.
    Fly(FlyControl),
    /// Orbit around the target.
    Orbit(OrbitControl),
    /// Trackball (no-op).
    Trackball(TrackballControl),
    /// Planar panning.
    Track2D(Track2DControl),
}

impl ControlMode {
    /// Mode selector for this variant.
    pub fn kind(&self) -> Mode {
        match self {
            Self::Fly(_) => Mode::Fly,
            Self::Orbit(_) => Mode::Orbit,
            Self::Trackball(_) => Mode::Trackball,
            Self::Track2D(_) => Mode::Track2D,
        }
    }

    fn controller_mut(&mut self) -> &mut dyn Controller {
        match self {
            Self::Fly(c) => c,
            Self::Orbit(c) => c,
            Self::Trackball(c) => c,
            Self::Track2D(c) => c,
        }
    }
}

impl Default for ControlMode {
    fn default() -> Self {
        Self::Fly(FlyControl)
    }
}

/// Camera pose, zoom and active control mode.
///
/// # Example
///
/// ```rust
/// use colorviz_camera::{Camera, CameraControl, Mode};
/// use colorviz_math::{Vec2, Vec3};
///
/// let mut control = CameraControl::default();
/// control.set_orbit_dist(10.0);
/// assert_eq!(control.mode(), Mode::Orbit);
///
/// control.drag_start();
/// control.control(Vec2::ZERO, Vec2::new(0.5, 0.2), Vec2::ZERO);
///
/// let mut cam = Camera::default();
/// control.update(&mut cam, Vec2::new(800.0, 600.0));
/// assert!((cam.pos.length() - 10.0).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraControl {
    pose: Pose,
    zoom: f32,
    mode: ControlMode,
    // orbit distance to restore when re-entering orbit with pos == target
    last_distance: f32,
}

impl Default for CameraControl {
    fn default() -> Self {
        Self {
            pose: Pose::default(),
            zoom: 1.0,
            mode: ControlMode::default(),
            last_distance: 1.0,
        }
    }
}

impl CameraControl {
    /// Creates a control at `pose`, starting in fly mode.
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            ..Default::default()
        }
    }

    /// Current pose.
    #[inline]
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Camera position.
    #[inline]
    pub fn pos(&self) -> Vec3 {
        self.pose.pos
    }

    /// Camera rotation.
    #[inline]
    pub fn rot(&self) -> Vec3 {
        self.pose.rot
    }

    /// Zoom factor.
    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Active mode.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode.kind()
    }

    /// Active controller and its state.
    #[inline]
    pub fn control_mode(&self) -> &ControlMode {
        &self.mode
    }

    /// Switches mode.
    ///
    /// Entering orbit derives distance and angles from the current pose, so
    /// the camera position does not jump; rotation is re-aimed at the
    /// target. Other modes continue from the pose as-is.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode() == mode {
            return;
        }
        debug!(from = ?self.mode(), to = ?mode, "camera mode");
        if let ControlMode::Orbit(orbit) = self.mode {
            self.last_distance = orbit.distance;
        }
        self.mode = match mode {
            Mode::Fly => ControlMode::Fly(FlyControl),
            Mode::Trackball => ControlMode::Trackball(TrackballControl),
            Mode::Track2D => {
                let mut track = Track2DControl::default();
                track.drag_start(&self.pose);
                ControlMode::Track2D(track)
            }
            Mode::Orbit => {
                let orbit = OrbitControl::from_pose(&self.pose, self.last_distance);
                self.pose = orbit.pose(self.pose.target);
                ControlMode::Orbit(orbit)
            }
        };
    }

    /// Runs `f` on the orbit state, entering orbit mode first, then
    /// recomputes the pose.
    fn with_orbit(&mut self, f: impl FnOnce(&mut OrbitControl, &mut Vec3)) {
        let mut orbit = match self.mode {
            ControlMode::Orbit(orbit) => orbit,
            _ => {
                debug!(from = ?self.mode(), "entering orbit");
                OrbitControl::from_pose(&self.pose, self.last_distance)
            }
        };
        let mut target = self.pose.target;
        f(&mut orbit, &mut target);
        self.pose = orbit.pose(target);
        self.last_distance = orbit.distance;
        self.mode = ControlMode::Orbit(orbit);
    }

    fn current_orbit(&self) -> OrbitControl {
        match self.mode {
            ControlMode::Orbit(orbit) => orbit,
            _ => OrbitControl::from_pose(&self.pose, self.last_distance),
        }
    }

    /// Orbit target.
    #[inline]
    pub fn orbit_target(&self) -> Vec3 {
        self.pose.target
    }

    /// Moves the orbit target, keeping distance and angles.
    pub fn set_orbit_target(&mut self, target: Vec3) {
        self.with_orbit(|_, t| *t = target);
    }

    /// Distance to the target.
    pub fn orbit_dist(&self) -> f32 {
        self.current_orbit().distance
    }

    /// Sets the distance to the target.
    pub fn set_orbit_dist(&mut self, distance: f32) {
        self.with_orbit(|orbit, _| orbit.distance = distance);
    }

    /// Elevation angle.
    pub fn orbit_theta(&self) -> f32 {
        self.current_orbit().theta
    }

    /// Sets the elevation angle. Not clamped.
    pub fn set_orbit_theta(&mut self, theta: f32) {
        self.with_orbit(|orbit, _| orbit.theta = theta);
    }

    /// Horizontal angle.
    pub fn orbit_phi(&self) -> f32 {
        self.current_orbit().phi
    }

    /// Sets the horizontal angle.
    pub fn set_orbit_phi(&mut self, phi: f32) {
        self.with_orbit(|orbit, _| orbit.phi = phi);
    }

    /// Mirrors the horizontal orbit angle.
    pub fn invert_phi(&mut self) {
        self.with_orbit(|orbit, _| orbit.invert_phi());
    }

    /// Snapshots orbit angles and target for a following [`orbit_pan`](Self::orbit_pan).
    pub fn orbit_pan_start(&mut self) {
        self.with_orbit(|orbit, t| orbit.pan_start(*t));
    }

    /// Rotates the orbit by `delta` relative to the pan start.
    pub fn orbit_pan(&mut self, delta: Vec2) {
        self.with_orbit(|orbit, _| orbit.pan(delta));
    }

    /// Moves along camera-local axes.
    pub fn fly_dir(&mut self, dir: Vec3) {
        self.pose.pos += FlyControl::local_to_world(self.pose.rot, dir);
    }

    /// Starts a drag in the current mode.
    pub fn drag_start(&mut self) {
        let pose = self.pose;
        self.mode.controller_mut().drag_start(&pose);
    }

    /// Applies one frame of input in the current mode.
    ///
    /// `drag` is cumulative since [`drag_start`](Self::drag_start).
    pub fn control(&mut self, rotate: Vec2, drag: Vec2, movement: Vec2) {
        let input = ControlInput {
            rotate,
            drag,
            movement,
        };
        let (pose, zoom) = (self.pose, self.zoom);
        self.pose = self.mode.controller_mut().control(&pose, zoom, &input);
    }

    /// Pushes the control state into `cam`.
    pub fn update(&self, cam: &mut Camera, view_size: Vec2) {
        cam.pos = self.pose.pos;
        cam.rot = self.pose.rot;
        cam.zoom = self.zoom;
        cam.target = self.pose.target;
        cam.view_size = view_size;
    }

    /// Zooms by scaling the distance to the target by `1 + delta` and the
    /// zoom factor by `1 - delta`.
    ///
    /// In orbit mode this scales the orbit distance; in other modes the
    /// position moves along the target direction. `delta = 0` is a no-op.
    pub fn universal_zoom(&mut self, delta: f32) {
        match &mut self.mode {
            ControlMode::Orbit(orbit) => {
                orbit.distance *= 1.0 + delta;
                self.last_distance = orbit.distance;
                self.pose = orbit.pose(self.pose.target);
            }
            _ => {
                let offset = self.pose.pos - self.pose.target;
                self.pose.pos = self.pose.target + offset * (1.0 + delta);
            }
        }
        self.zoom *= 1.0 - delta;
    }

    /// Snaps to an axis-aligned view at the current distance, enters orbit
    /// mode and switches `cam` to orthographic projection.
    pub fn set_ortho_view(&mut self, cam: &mut Camera, view: OrthoView) {
        let mut distance = self.orbit_dist();
        if distance <= f32::EPSILON {
            distance = self.last_distance;
        }
        let angles = point_sphere(view.axis());
        let target = self.pose.target;
        let mut orbit = OrbitControl::new(distance, angles.x, angles.y);
        orbit.pan_start(target);
        self.pose = orbit.pose(target);
        self.last_distance = distance;
        self.mode = ControlMode::Orbit(orbit);
        debug!(?view, distance, "ortho view");

        cam.set_projection(Projection::Orthographic);
        self.update(cam, cam.view_size);
    }
}
