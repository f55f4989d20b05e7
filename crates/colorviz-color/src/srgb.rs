//! sRGB primaries and transfer function.
//!
//! The display color of every gamut vertex ends up in gamma-encoded sRGB.
//! The transfer function is piecewise: a linear segment near black and a
//! 1/2.4 power curve for the rest.
//!
//! # Reference
//!
//! IEC 61966-2-1:1999

use colorviz_math::{Mat3, Vec3};

/// XYZ (D65) to linear sRGB.
pub const XYZ_TO_SRGB: Mat3 = Mat3::from_rows([
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
]);

/// Linear sRGB to XYZ (D65).
pub const SRGB_TO_XYZ: Mat3 = Mat3::from_rows([
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
]);

/// sRGB EOTF: decodes gamma-encoded [0, 1] to linear [0, 1].
///
/// ```text
/// if V <= 0.04045:  L = V / 12.92
/// else:             L = ((V + 0.055) / 1.055)^2.4
/// ```
#[inline]
pub fn eotf(v: f32) -> f32 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB OETF: encodes linear [0, 1] to gamma-encoded [0, 1].
///
/// ```text
/// if L <= 0.0031308:  V = L * 12.92
/// else:               V = 1.055 * L^(1/2.4) - 0.055
/// ```
///
/// # Example
///
/// ```rust
/// use colorviz_color::srgb::oetf;
///
/// let encoded = oetf(0.214);
/// assert!((encoded - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn oetf(l: f32) -> f32 {
    if l <= 0.0031308 {
        l * 12.92
    } else {
        1.055 * l.powf(1.0 / 2.4) - 0.055
    }
}

/// Applies the OETF per channel.
#[inline]
pub fn oetf_rgb(rgb: Vec3) -> Vec3 {
    Vec3::new(oetf(rgb.x), oetf(rgb.y), oetf(rgb.z))
}

/// Applies the EOTF per channel.
#[inline]
pub fn eotf_rgb(rgb: Vec3) -> Vec3 {
    Vec3::new(eotf(rgb.x), eotf(rgb.y), eotf(rgb.z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_inverts() {
        for i in 0..=50 {
            let v = i as f32 / 50.0;
            assert!((oetf(eotf(v)) - v).abs() < 1e-5, "v={v}");
        }
    }

    #[test]
    fn test_transfer_endpoints() {
        assert_eq!(oetf(0.0), 0.0);
        assert!((oetf(1.0) - 1.0).abs() < 1e-6);
        assert!((eotf(0.5) - 0.214).abs() < 0.01);
    }

    #[test]
    fn test_matrices_inverse() {
        let id = XYZ_TO_SRGB * SRGB_TO_XYZ;
        assert!(id.abs_diff_eq(Mat3::IDENTITY, 1e-4));
    }

    #[test]
    fn test_d65_white_maps_to_unit_rgb() {
        let rgb = XYZ_TO_SRGB * colorviz_math::Illuminant::D65.white();
        assert!((rgb - Vec3::ONE).abs().max_element() < 1e-3, "{rgb:?}");
    }
}
