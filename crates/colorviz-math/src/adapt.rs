//! Standard illuminants and chromatic adaptation.
//!
//! Gamut files are measured under a reference illuminant while the display
//! is D65. Colors measured under another white are adapted with the
//! Bradford transform before being shown.
//!
//! # Usage
//!
//! ```rust
//! use colorviz_math::{adapt_matrix, Illuminant, BRADFORD};
//!
//! let to_d65 = adapt_matrix(BRADFORD, Illuminant::A.white(), Illuminant::D65.white());
//! let adapted = to_d65 * Illuminant::A.white();
//! assert!((adapted.x - 0.95047).abs() < 1e-3);
//! ```

use crate::Mat3;
use glam::Vec3;
use std::fmt;
use std::str::FromStr;

/// CIE standard illuminants (2 degree observer), normalized to Y = 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Illuminant {
    /// Incandescent / tungsten, ~2856K.
    A,
    /// Direct sunlight at noon (obsolete).
    B,
    /// Average daylight (obsolete).
    C,
    /// Horizon light, ICC profile connection space.
    D50,
    /// Mid-morning daylight.
    D55,
    /// Noon daylight, sRGB white.
    #[default]
    D65,
    /// North sky daylight.
    D75,
    /// Equal energy.
    E,
    /// Cool white fluorescent.
    F2,
    /// Broad-band daylight fluorescent.
    F7,
    /// Narrow tri-band fluorescent.
    F11,
}

/// XYZ reference whites indexed in [`Illuminant::all`] order.
const WHITES: [[f32; 3]; 11] = [
    [1.09850, 1.0, 0.35585],
    [0.99072, 1.0, 0.85223],
    [0.98074, 1.0, 1.18232],
    [0.96422, 1.0, 0.82521],
    [0.95682, 1.0, 0.92149],
    [0.95047, 1.0, 1.08883],
    [0.94972, 1.0, 1.22638],
    [1.00000, 1.0, 1.00000],
    [0.99186, 1.0, 0.67393],
    [0.95041, 1.0, 1.08747],
    [1.00962, 1.0, 0.64350],
];

impl Illuminant {
    /// All illuminants in table order.
    pub const fn all() -> &'static [Self] {
        &[
            Self::A,
            Self::B,
            Self::C,
            Self::D50,
            Self::D55,
            Self::D65,
            Self::D75,
            Self::E,
            Self::F2,
            Self::F7,
            Self::F11,
        ]
    }

    /// Reference white in XYZ.
    #[inline]
    pub const fn white(self) -> Vec3 {
        Vec3::from_array(WHITES[self as usize])
    }

    /// Short name as used in file headers and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D50 => "D50",
            Self::D55 => "D55",
            Self::D65 => "D65",
            Self::D75 => "D75",
            Self::E => "E",
            Self::F2 => "F2",
            Self::F7 => "F7",
            Self::F11 => "F11",
        }
    }
}

impl fmt::Display for Illuminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when an illuminant name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIlluminant(pub String);

impl fmt::Display for UnknownIlluminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown illuminant '{}'", self.0)
    }
}

impl std::error::Error for UnknownIlluminant {}

impl FromStr for Illuminant {
    type Err = UnknownIlluminant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|i| i.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownIlluminant(s.to_string()))
    }
}

/// Bradford cone response matrix.
///
/// Lam, K.M. (1985). Metamerism and Colour Constancy.
pub const BRADFORD: Mat3 = Mat3::from_rows([
    [0.8951, 0.2664, -0.1614],
    [-0.7502, 1.7135, 0.0367],
    [0.0389, -0.0685, 1.0296],
]);

/// Inverse Bradford matrix.
pub const BRADFORD_INV: Mat3 = Mat3::from_rows([
    [0.9869929, -0.1470543, 0.1599627],
    [0.4323053, 0.5183603, 0.0492912],
    [-0.0085287, 0.0400428, 0.9684867],
]);

/// Computes a chromatic adaptation matrix between two white points.
///
/// The result maps XYZ under `src_white` to XYZ under `dst_white`:
/// `M^-1 * diag(dst_cone / src_cone) * M`.
pub fn adapt_matrix(method: Mat3, src_white: Vec3, dst_white: Vec3) -> Mat3 {
    let method_inv = if method == BRADFORD {
        BRADFORD_INV
    } else {
        method.inverse().unwrap_or(Mat3::IDENTITY)
    };

    let src_cone = method * src_white;
    let dst_cone = method * dst_white;

    let scale = Mat3::from_diagonal(dst_cone / src_cone);

    method_inv * scale * method
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_table() {
        assert_eq!(Illuminant::all().len(), 11);
        for ill in Illuminant::all() {
            assert_eq!(ill.white().y, 1.0, "{ill}");
        }
        assert_eq!(Illuminant::D65.white(), Vec3::new(0.95047, 1.0, 1.08883));
        assert_eq!(Illuminant::E.white(), Vec3::ONE);
    }

    #[test]
    fn test_adapt_white_to_white() {
        for ill in Illuminant::all() {
            let m = adapt_matrix(BRADFORD, ill.white(), Illuminant::D65.white());
            let result = m * ill.white();
            assert!(
                (result - Illuminant::D65.white()).abs().max_element() < 1e-3,
                "{ill}: {result:?}"
            );
        }
    }

    #[test]
    fn test_adapt_identity() {
        let same = adapt_matrix(BRADFORD, Illuminant::D65.white(), Illuminant::D65.white());
        assert!(same.abs_diff_eq(Mat3::IDENTITY, 1e-3));
    }

    #[test]
    fn test_bradford_inverse_consistent() {
        let roundtrip = BRADFORD * BRADFORD_INV;
        assert!(roundtrip.abs_diff_eq(Mat3::IDENTITY, 1e-4));
    }

    #[test]
    fn test_parse_name() {
        assert_eq!("d50".parse::<Illuminant>().unwrap(), Illuminant::D50);
        assert_eq!(" F11 ".parse::<Illuminant>().unwrap(), Illuminant::F11);
        assert!("D93".parse::<Illuminant>().is_err());
    }
}
