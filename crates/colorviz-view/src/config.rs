//! Viewer configuration.
//!
//! Stored as RON. Every field has a default, so partial files are fine:
//!
//! ```text
//! (
//!     fov: 0.9,
//!     mode: Orbit,
//!     illuminant: "D50",
//! )
//! ```

use crate::error::{Result, ViewerError};
use colorviz_camera::{DEFAULT_FAR, DEFAULT_FOV, DEFAULT_NEAR, Mode, Projection};
use colorviz_math::{Illuminant, Vec3};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Lab point the camera orbits by default (mid-gray).
pub const DEFAULT_TARGET: [f32; 3] = [50.0, 0.0, 0.0];

/// Default distance from the orbit target.
pub const DEFAULT_ORBIT_DISTANCE: f32 = 250.0;

/// Default blend animation length in seconds.
pub const DEFAULT_BLEND_DURATION: f32 = 1.0;

/// Viewer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
    /// Initial control mode.
    pub mode: Mode,
    /// Initial projection.
    pub projection: Projection,
    /// Initial orbit target in Lab.
    pub orbit_target: [f32; 3],
    /// Initial orbit distance.
    pub orbit_distance: f32,
    /// Orbit radians per dragged pixel.
    pub drag_sensitivity: f32,
    /// Fly-look radians per pixel of mouse movement.
    pub look_sensitivity: f32,
    /// Keyboard movement in units per second.
    pub move_speed: f32,
    /// Zoom delta per scroll notch.
    pub zoom_step: f32,
    /// Colorspace blend duration in seconds.
    pub blend_duration: f32,
    /// Opacity of the transparent mesh.
    pub transparent_alpha: f32,
    /// Illuminant for newly loaded gamuts.
    #[serde(with = "illuminant_name")]
    pub illuminant: Illuminant,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fov: DEFAULT_FOV,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            mode: Mode::Orbit,
            projection: Projection::Perspective,
            orbit_target: DEFAULT_TARGET,
            orbit_distance: DEFAULT_ORBIT_DISTANCE,
            drag_sensitivity: 0.005,
            look_sensitivity: 0.003,
            move_speed: 50.0,
            zoom_step: 0.1,
            blend_duration: DEFAULT_BLEND_DURATION,
            transparent_alpha: 0.35,
            illuminant: Illuminant::D50,
        }
    }
}

impl ViewerConfig {
    /// Orbit target as a vector.
    pub fn target(&self) -> Vec3 {
        Vec3::from_array(self.orbit_target)
    }

    /// Parses a RON string.
    pub fn from_ron(text: &str) -> std::result::Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Serializes to pretty RON.
    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Loads a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ViewerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text).map_err(|source| ViewerError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes a config file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_ron()?).map_err(|source| ViewerError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Serializes an [`Illuminant`] by name.
pub(crate) mod illuminant_name {
    use colorviz_math::Illuminant;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(ill: &Illuminant, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(ill.name())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Illuminant, D::Error> {
        let name = String::deserialize(d)?;
        name.parse().map_err(D::Error::custom)
    }
}
