//! Planes, rays and triangles for picking.

use crate::{transform_dir, transform_point};
use glam::{Mat4, Vec2, Vec3};

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

impl Axis {
    /// Unit vector along the axis.
    #[inline]
    pub const fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }
}

/// Plane spanned by two coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisPlane {
    /// Normal +Z.
    XY,
    /// Normal +Y.
    XZ,
    /// Normal +X.
    YZ,
}

impl AxisPlane {
    /// Unit normal of the plane.
    #[inline]
    pub const fn normal(self) -> Vec3 {
        match self {
            Self::XY => Vec3::Z,
            Self::XZ => Vec3::Y,
            Self::YZ => Vec3::X,
        }
    }
}

/// Infinite plane through `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Any point on the plane.
    pub origin: Vec3,
    /// Plane normal.
    pub normal: Vec3,
}

impl Plane {
    /// Creates a plane from a point and a normal.
    #[inline]
    pub fn new(origin: Vec3, normal: Vec3) -> Self {
        Self { origin, normal }
    }

    /// Axis-aligned plane through `origin`.
    #[inline]
    pub fn axis(plane: AxisPlane, origin: Vec3) -> Self {
        Self::new(origin, plane.normal())
    }

    /// Moves the plane by `transform`.
    pub fn transform(&mut self, transform: &Mat4) {
        self.origin = transform_point(self.origin, transform);
        self.normal = transform_dir(self.normal, transform);
    }

    /// 2D coordinates of a point in the plane's own basis.
    ///
    /// The first basis vector is horizontal (perpendicular to +Y) unless the
    /// plane is horizontal itself, in which case +X is used as reference.
    pub fn project(&self, point: Vec3) -> Vec2 {
        let v = point - self.origin;
        let n = self.normal;
        let mut u = n.cross(Vec3::Y);
        if u.length_squared() < 1e-12 {
            u = n.cross(Vec3::X);
        }
        let u = u.normalize();
        let w = n.cross(u).normalize();
        Vec2::new(v.dot(u), v.dot(w))
    }
}

/// Triangle given by its three corners, counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Corners.
    pub verts: [Vec3; 3],
}

impl Triangle {
    /// Creates a triangle.
    #[inline]
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { verts: [v0, v1, v2] }
    }
}

/// Result of a ray-triangle intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Hit point in world space.
    pub point: Vec3,
    /// Unit normal of the hit triangle.
    pub normal: Vec3,
    /// Distance along the ray.
    pub distance: f32,
}

/// Half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    ///
    /// A zero direction gives a NaN direction.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Point at `distance` along the ray.
    #[inline]
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Intersects the front side of a plane.
    ///
    /// When the ray runs parallel to the plane or approaches it from behind
    /// the ray origin is returned. `None` if the plane lies behind the ray.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vec3> {
        let d = plane.normal.dot(self.direction);
        if d < 1e-6 {
            return Some(self.origin);
        }
        let t = (plane.origin - self.origin).dot(plane.normal) / d;
        if t < 0.0 {
            return None;
        }
        Some(self.at(t))
    }

    /// Intersects a plane from either side. `None` when parallel or behind.
    pub fn bi_intersect_plane(&self, plane: &Plane) -> Option<Vec3> {
        let d = plane.normal.dot(self.direction);
        if d.abs() < 1e-6 {
            return None;
        }
        let t = (plane.origin - self.origin).dot(plane.normal) / d;
        if t < 0.0 {
            return None;
        }
        Some(self.at(t))
    }

    /// Moller-Trumbore intersection against the front face of a triangle.
    pub fn intersect_triangle(&self, tri: &Triangle) -> Option<RayHit> {
        let [v0, v1, v2] = tri.verts;
        let e1 = v1 - v0;
        let e2 = v2 - v0;
        let pvec = self.direction.cross(e2);
        let det = e1.dot(pvec);
        if det < 1e-6 {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = self.origin - v0;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(e1);
        let v = self.direction.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(qvec) * inv_det;
        if t < 0.0 {
            return None;
        }
        Some(RayHit {
            point: self.at(t),
            normal: e1.cross(e2).normalize(),
            distance: t,
        })
    }

    /// Returns the ray moved by `transform`.
    pub fn transformed(&self, transform: &Mat4) -> Self {
        Self {
            origin: transform_point(self.origin, transform),
            direction: transform_dir(self.direction, transform),
        }
    }
}
