//! Row-major 3x3 color matrix.
//!
//! XYZ/RGB and cone response matrices are published row by row for column
//! vectors (`xyz = M * rgb`). [`Mat3`] keeps that reading order at the
//! construction site and stores a column-major [`glam::Mat3`] underneath.

use glam::Vec3;
use std::ops::Mul;

/// 3x3 color matrix written in rows.
///
/// ```rust
/// use colorviz_math::{Mat3, Vec3};
///
/// let m = Mat3::from_rows([[2.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 1.0]]);
/// assert_eq!(m * Vec3::new(1.0, 5.0, 3.0), Vec3::new(2.0, 5.0, 4.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3(glam::Mat3);

impl Mat3 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self(glam::Mat3::IDENTITY);

    /// Matrix from its rows, in the order they are printed.
    pub const fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        let [r0, r1, r2] = rows;
        Self(glam::Mat3::from_cols(
            Vec3::new(r0[0], r1[0], r2[0]),
            Vec3::new(r0[1], r1[1], r2[1]),
            Vec3::new(r0[2], r1[2], r2[2]),
        ))
    }

    /// Per-channel scale.
    pub const fn from_diagonal(d: Vec3) -> Self {
        Self(glam::Mat3::from_diagonal(d))
    }

    /// Inverse, or `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        if self.0.determinant().abs() < 1e-10 {
            return None;
        }
        Some(Self(self.0.inverse()))
    }

    /// Element-wise comparison within `max_abs_diff`.
    pub fn abs_diff_eq(&self, other: Self, max_abs_diff: f32) -> bool {
        self.0.abs_diff_eq(other.0, max_abs_diff)
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.0 * rhs
    }
}

impl Mul for Mat3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_read_as_printed() {
        let m = Mat3::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        assert_eq!(m * Vec3::X, Vec3::new(1.0, 4.0, 7.0));
        assert_eq!(m * Vec3::new(1.0, 1.0, 1.0), Vec3::new(6.0, 15.0, 24.0));
    }

    #[test]
    fn test_inverse() {
        let m = Mat3::from_rows([[1.0, 2.0, 3.0], [0.0, 1.0, 4.0], [5.0, 6.0, 0.0]]);
        let inv = m.inverse().unwrap();
        assert!((m * inv).abs_diff_eq(Mat3::IDENTITY, 1e-5));
        assert!((inv * m).abs_diff_eq(Mat3::IDENTITY, 1e-5));
    }

    #[test]
    fn test_singular() {
        let m = Mat3::from_rows([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [1.0, 1.0, 1.0]]);
        assert!(m.inverse().is_none());
    }

    #[test]
    fn test_diagonal_scales_channels() {
        let m = Mat3::from_diagonal(Vec3::new(2.0, 3.0, 0.5));
        assert_eq!(m * Vec3::ONE, Vec3::new(2.0, 3.0, 0.5));
    }
}
