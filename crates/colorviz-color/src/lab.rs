//! CIELAB conversion.
//!
//! Gamut vertices are Lab triples measured relative to a reference
//! illuminant. To display them we go Lab -> XYZ (under that illuminant),
//! adapt to D65 with Bradford when needed, then XYZ -> linear sRGB -> encoded
//! sRGB, clamped to `[0, 1]`.
//!
//! NaN input is not rejected; it propagates to the output channels.

use crate::srgb::{SRGB_TO_XYZ, XYZ_TO_SRGB, eotf_rgb, oetf_rgb};
use colorviz_math::{BRADFORD, Illuminant, Mat3, Vec3, adapt_matrix};
use rayon::prelude::*;

/// CIE epsilon, `(6/29)^3`.
pub const EPSILON: f32 = 216.0 / 24389.0;
/// CIE kappa, `(29/3)^3`.
pub const KAPPA: f32 = 24389.0 / 27.0;

#[inline]
fn f_inv(f: f32) -> f32 {
    let f3 = f * f * f;
    if f3 > EPSILON { f3 } else { (116.0 * f - 16.0) / KAPPA }
}

#[inline]
fn f_fwd(t: f32) -> f32 {
    if t > EPSILON {
        t.cbrt()
    } else {
        (KAPPA * t + 16.0) / 116.0
    }
}

/// Lab to XYZ relative to `white`.
pub fn lab_to_xyz(lab: Vec3, white: Vec3) -> Vec3 {
    let fy = (lab.x + 16.0) / 116.0;
    let fx = fy + lab.y / 500.0;
    let fz = fy - lab.z / 200.0;

    let y = if lab.x > KAPPA * EPSILON {
        fy * fy * fy
    } else {
        lab.x / KAPPA
    };

    Vec3::new(f_inv(fx), y, f_inv(fz)) * white
}

/// XYZ to Lab relative to `white`.
pub fn xyz_to_lab(xyz: Vec3, white: Vec3) -> Vec3 {
    let r = xyz / white;
    let fx = f_fwd(r.x);
    let fy = f_fwd(r.y);
    let fz = f_fwd(r.z);
    Vec3::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

/// Lab to display sRGB with the adaptation matrix prepared once.
///
/// Use this when converting many vertices under the same illuminant.
///
/// # Example
///
/// ```rust
/// use colorviz_color::LabConverter;
/// use colorviz_math::{Illuminant, Vec3};
///
/// let conv = LabConverter::new(Illuminant::D50);
/// let white = conv.lab_to_rgb(Vec3::new(100.0, 0.0, 0.0));
/// assert!((white - Vec3::ONE).abs().max_element() < 1e-2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabConverter {
    illuminant: Illuminant,
    to_rgb: Mat3,
    from_rgb: Mat3,
}

impl LabConverter {
    /// Creates a converter for Lab values measured under `illuminant`.
    pub fn new(illuminant: Illuminant) -> Self {
        let d65 = Illuminant::D65;
        let (to_rgb, from_rgb) = if illuminant == d65 {
            (XYZ_TO_SRGB, SRGB_TO_XYZ)
        } else {
            let to_d65 = adapt_matrix(BRADFORD, illuminant.white(), d65.white());
            let from_d65 = adapt_matrix(BRADFORD, d65.white(), illuminant.white());
            (XYZ_TO_SRGB * to_d65, from_d65 * SRGB_TO_XYZ)
        };
        Self {
            illuminant,
            to_rgb,
            from_rgb,
        }
    }

    /// Reference illuminant.
    #[inline]
    pub fn illuminant(&self) -> Illuminant {
        self.illuminant
    }

    /// Lab to gamma-encoded sRGB clamped to `[0, 1]`.
    #[inline]
    pub fn lab_to_rgb(&self, lab: Vec3) -> Vec3 {
        let xyz = lab_to_xyz(lab, self.illuminant.white());
        let linear = self.to_rgb * xyz;
        let c = oetf_rgb(linear);
        // f32::clamp keeps NaN, Vec3::clamp would not
        Vec3::new(c.x.clamp(0.0, 1.0), c.y.clamp(0.0, 1.0), c.z.clamp(0.0, 1.0))
    }

    /// Gamma-encoded sRGB to Lab under the converter's illuminant.
    #[inline]
    pub fn rgb_to_lab(&self, rgb: Vec3) -> Vec3 {
        let xyz = self.from_rgb * eotf_rgb(rgb);
        xyz_to_lab(xyz, self.illuminant.white())
    }
}

impl Default for LabConverter {
    fn default() -> Self {
        Self::new(Illuminant::D65)
    }
}

/// Converts a Lab triple to display sRGB.
///
/// Every channel of the result lies in `[0, 1]` for finite input.
///
/// # Example
///
/// ```rust
/// use colorviz_color::lab_to_rgb;
/// use colorviz_math::{Illuminant, Vec3};
///
/// let black = lab_to_rgb(Vec3::ZERO, Illuminant::D65);
/// assert_eq!(black, Vec3::ZERO);
/// ```
pub fn lab_to_rgb(lab: Vec3, illuminant: Illuminant) -> Vec3 {
    LabConverter::new(illuminant).lab_to_rgb(lab)
}

/// Converts display sRGB back to Lab under `illuminant`.
pub fn rgb_to_lab(rgb: Vec3, illuminant: Illuminant) -> Vec3 {
    LabConverter::new(illuminant).rgb_to_lab(rgb)
}

/// Converts a slice of Lab triples in parallel, preserving order.
pub fn lab_to_rgb_batch(labs: &[Vec3], illuminant: Illuminant) -> Vec<Vec3> {
    let conv = LabConverter::new(illuminant);
    labs.par_iter().map(|&lab| conv.lab_to_rgb(lab)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_black_and_white() {
        assert_eq!(lab_to_rgb(Vec3::ZERO, Illuminant::D65), Vec3::ZERO);
        let white = lab_to_rgb(Vec3::new(100.0, 0.0, 0.0), Illuminant::D65);
        for c in white.to_array() {
            assert_abs_diff_eq!(c, 1.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_gray_axis_monotonic() {
        let mut last = -1.0;
        for i in 0..=100 {
            let rgb = lab_to_rgb(Vec3::new(i as f32, 0.0, 0.0), Illuminant::D65);
            assert_abs_diff_eq!(rgb.x, rgb.y, epsilon = 1e-3);
            assert_abs_diff_eq!(rgb.y, rgb.z, epsilon = 1e-3);
            assert!(rgb.y >= last, "L={i}: {} < {last}", rgb.y);
            last = rgb.y;
        }
    }

    #[test]
    fn test_gray_axis_adapted() {
        for ill in Illuminant::all() {
            let rgb = lab_to_rgb(Vec3::new(50.0, 0.0, 0.0), *ill);
            assert!(
                (rgb.x - rgb.z).abs() < 1e-2,
                "{ill}: {rgb:?} should be neutral after adaptation"
            );
        }
    }

    #[test]
    fn test_output_clamped() {
        let rgb = lab_to_rgb(Vec3::new(60.0, 120.0, -120.0), Illuminant::D65);
        assert!(rgb.cmpge(Vec3::ZERO).all() && rgb.cmple(Vec3::ONE).all());
    }

    #[test]
    fn test_nan_propagates() {
        let rgb = lab_to_rgb(Vec3::new(f32::NAN, 0.0, 0.0), Illuminant::D65);
        assert!(rgb.is_nan());
    }

    #[test]
    fn test_xyz_lab_inverse() {
        let white = Illuminant::D50.white();
        for lab in [
            Vec3::new(50.0, 20.0, -30.0),
            Vec3::new(5.0, 1.0, 2.0),
            Vec3::new(90.0, -40.0, 60.0),
        ] {
            let back = xyz_to_lab(lab_to_xyz(lab, white), white);
            assert!((back - lab).abs().max_element() < 1e-3, "{lab:?} -> {back:?}");
        }
    }

    #[test]
    fn test_rgb_lab_inverse() {
        let conv = LabConverter::new(Illuminant::D50);
        let rgb = Vec3::new(0.2, 0.5, 0.7);
        let back = conv.lab_to_rgb(conv.rgb_to_lab(rgb));
        assert!((back - rgb).abs().max_element() < 1e-3, "{back:?}");
    }

    #[test]
    fn test_batch_matches_single() {
        let labs: Vec<Vec3> = (0..64)
            .map(|i| Vec3::new(i as f32 * 1.5, (i as f32 - 32.0) * 2.0, 10.0))
            .collect();
        let batch = lab_to_rgb_batch(&labs, Illuminant::F11);
        assert_eq!(batch.len(), labs.len());
        for (lab, rgb) in labs.iter().zip(&batch) {
            assert_eq!(*rgb, lab_to_rgb(*lab, Illuminant::F11));
        }
    }
}
