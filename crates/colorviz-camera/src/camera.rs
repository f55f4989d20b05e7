//! Camera value type.
//!
//! A [`Camera`] holds everything needed to build the view and projection
//! matrices for one frame. It is rebuilt each frame from
//! [`CameraControl::update`](crate::CameraControl::update) and never writes
//! back to the control.
//!
//! # Coordinate spaces
//!
//! ```text
//! world --view--> eye --proj--> clip [-1, 1]^3 --> screen (pixels, Y down)
//! ```

use colorviz_math::{Mat4, Ray, Vec2, Vec3, Vec4, euler, orthographic, perspective, transform_point};
use serde::{Deserialize, Serialize};

/// Projection kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Projection {
    /// Perspective with vertical field of view.
    #[default]
    Perspective,
    /// Orthographic with extent tied to the distance to the target.
    Orthographic,
}

impl Projection {
    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Perspective => "Perspective",
            Self::Orthographic => "Orthographic",
        }
    }
}

/// Axis-aligned snap views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrthoView {
    /// Looking down from +Y.
    Top,
    /// Looking up from -Y.
    Bottom,
    /// Looking from -X.
    Left,
    /// Looking from +X.
    Right,
    /// Looking from +Z.
    Front,
    /// Looking from -Z.
    Back,
}

impl OrthoView {
    /// All views.
    pub const fn all() -> &'static [Self] {
        &[
            Self::Top,
            Self::Bottom,
            Self::Left,
            Self::Right,
            Self::Front,
            Self::Back,
        ]
    }

    /// Unit direction from the target to the camera.
    pub const fn axis(self) -> Vec3 {
        match self {
            Self::Top => Vec3::Y,
            Self::Bottom => Vec3::NEG_Y,
            Self::Left => Vec3::NEG_X,
            Self::Right => Vec3::X,
            Self::Front => Vec3::Z,
            Self::Back => Vec3::NEG_Z,
        }
    }
}

/// Default near clip plane.
pub const DEFAULT_NEAR: f32 = 0.01;
/// Default far clip plane.
pub const DEFAULT_FAR: f32 = 1000.0;
/// Default vertical field of view in radians.
pub const DEFAULT_FOV: f32 = 1.1;

/// Camera state for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Viewport size in pixels.
    pub view_size: Vec2,
    /// World position.
    pub pos: Vec3,
    /// Euler rotation (X, Y, Z) in radians.
    pub rot: Vec3,
    /// Orbit target.
    pub target: Vec3,
    /// Near clip plane (perspective only).
    pub near: f32,
    /// Far clip plane (perspective only).
    pub far: f32,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Zoom factor.
    pub zoom: f32,
    /// Projection kind.
    pub projection: Projection,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            view_size: Vec2::ZERO,
            pos: Vec3::ZERO,
            rot: Vec3::ZERO,
            target: Vec3::ZERO,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            fov: DEFAULT_FOV,
            zoom: 1.0,
            projection: Projection::Perspective,
        }
    }
}

impl Camera {
    /// View matrix: rotate by `rot` after translating by `-pos`.
    pub fn view(&self) -> Mat4 {
        Mat4::from_quat(euler(self.rot)) * Mat4::from_translation(-self.pos)
    }

    /// Projection matrix.
    ///
    /// Orthographic extent is `fov * distance(pos, target)` with clip planes
    /// at `-2 * distance` and `2 * distance`, so apparent size is kept when
    /// switching projection while orbiting.
    pub fn proj(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective => perspective(
                self.fov,
                self.view_size.x / self.view_size.y,
                self.near,
                self.far,
            ),
            Projection::Orthographic => {
                let dist = self.pos.distance(self.target);
                orthographic(self.view_size, self.fov * dist, -2.0 * dist, 2.0 * dist)
            }
        }
    }

    /// `proj * view`.
    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.proj() * self.view()
    }

    /// Sets the projection kind.
    #[inline]
    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    /// Point in view space.
    pub fn to_view(&self, point: Vec3) -> Vec3 {
        (self.view() * point.extend(1.0)).truncate()
    }

    /// Screen pixel plus `[0, 1]` depth to world space.
    pub fn screen_to_world(&self, screen: Vec2, depth: f32) -> Vec3 {
        let clip = self.screen_to_clip(screen).extend(depth * 2.0 - 1.0);
        self.clip_to_world(clip)
    }

    /// World point to screen pixels.
    pub fn world_to_screen(&self, world: Vec3) -> Vec2 {
        let clip = self.world_to_clip(world);
        Vec2::new(
            (clip.x + 1.0) / 2.0 * self.view_size.x,
            (1.0 - clip.y) / 2.0 * self.view_size.y,
        )
    }

    /// World point to clip space, with perspective divide.
    ///
    /// Points on the camera plane (w = 0) give non-finite results.
    pub fn world_to_clip(&self, world: Vec3) -> Vec3 {
        transform_point(world, &self.view_projection())
    }

    /// Clip point to world space.
    pub fn clip_to_world(&self, clip: Vec3) -> Vec3 {
        transform_point(clip, &self.view_projection().inverse())
    }

    /// Screen pixels to clip XY. Screen Y grows downward.
    pub fn screen_to_clip(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            (screen.x / self.view_size.x) * 2.0 - 1.0,
            1.0 - (screen.y / self.view_size.y) * 2.0,
        )
    }

    /// Copies pose and lens settings from another camera.
    ///
    /// View size and target are kept.
    pub fn copy_settings_from(&mut self, other: &Camera) {
        self.pos = other.pos;
        self.rot = other.rot;
        self.fov = other.fov;
        self.zoom = other.zoom;
        self.projection = other.projection;
        self.near = other.near;
        self.far = other.far;
    }

    /// World-space ray from the camera position through a screen point.
    ///
    /// The screen point is unprojected at the near plane through the
    /// inverse projection, then rotated into world space.
    pub fn ray(&self, screen: Vec2) -> Ray {
        let clip = self.screen_to_clip(screen);
        let eye = self.proj().inverse() * Vec4::new(clip.x, clip.y, -1.0, 1.0);
        let world = self.view().inverse() * Vec4::new(eye.x, eye.y, -1.0, 0.0);
        Ray::new(self.pos, world.truncate())
    }
}
