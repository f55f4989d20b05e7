//! Rotation, projection and coordinate helpers for the camera.
//!
//! Conventions follow OpenGL: right-handed, +Y up, camera looking down -Z,
//! clip space depth in [-1, 1].

use glam::{Affine3A, Mat4, Quat, Vec2, Vec3, Vec4};

/// Euler angles (radians) to a quaternion, composed X * Y * Z.
#[inline]
pub fn euler(axis_angles: Vec3) -> Quat {
    Quat::from_rotation_x(axis_angles.x)
        * Quat::from_rotation_y(axis_angles.y)
        * Quat::from_rotation_z(axis_angles.z)
}

/// Spherical to cartesian coordinates on the unit sphere, +Y up.
///
/// `(phi = 0, theta = 0)` maps to `(0, 0, 1)`. `phi` is the horizontal
/// angle, `theta` the elevation.
#[inline]
pub fn sphere_point(phi: f32, theta: f32) -> Vec3 {
    Vec3::new(theta.cos() * phi.sin(), theta.sin(), theta.cos() * phi.cos())
}

/// Cartesian to spherical coordinates, inverse of [`sphere_point`].
///
/// Returns `(theta, phi)`. The length of `p` is ignored.
#[inline]
pub fn point_sphere(p: Vec3) -> Vec2 {
    Vec2::new(p.y.atan2((p.x * p.x + p.z * p.z).sqrt()), p.x.atan2(p.z))
}

/// Perspective projection for a vertical field of view in radians.
#[inline]
pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh_gl(fov, aspect, near, far)
}

/// Orthographic projection spanning `extent` vertically, widened by the
/// aspect ratio of `size`.
pub fn orthographic(size: Vec2, extent: f32, near: f32, far: f32) -> Mat4 {
    let aspect = size.x / size.y;
    let half_w = aspect * extent * 0.5;
    let half_h = extent * 0.5;
    Mat4::orthographic_rh_gl(-half_w, half_w, -half_h, half_h, near, far)
}

/// Applies a transform to a point, dividing by the homogeneous w.
///
/// A w of zero yields non-finite components.
#[inline]
pub fn transform_point(point: Vec3, transform: &Mat4) -> Vec3 {
    let v = *transform * point.extend(1.0);
    v.truncate() / v.w
}

/// Applies a transform to a direction (translation ignored) and normalizes it.
#[inline]
pub fn transform_dir(dir: Vec3, transform: &Mat4) -> Vec3 {
    (*transform * Vec4::new(dir.x, dir.y, dir.z, 0.0))
        .truncate()
        .normalize()
}

/// Unit normal of a counter-clockwise triangle.
#[inline]
pub fn triangle_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    (v1 - v0).cross(v2 - v0).normalize()
}

/// Builds a model transform from translation, Euler rotation and scale.
///
/// Applied to a point as scale, then rotate, then translate.
#[inline]
pub fn compose_transform(translation: Vec3, axis_angles: Vec3, scale: Vec3) -> Affine3A {
    Affine3A::from_scale_rotation_translation(scale, euler(axis_angles), translation)
}
