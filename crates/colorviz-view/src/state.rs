//! Settings persisted between sessions.
//!
//! Written as RON to `<config dir>/colorviz/viewer.ron`. A missing or
//! unreadable file is not an error: the viewer starts from defaults.

use crate::config::{DEFAULT_ORBIT_DISTANCE, DEFAULT_TARGET};
use crate::error::{Result, ViewerError};
use colorviz_camera::{Mode, Projection};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name inside the colorviz config directory.
pub const PERSISTENCE_FILE: &str = "viewer.ron";

/// Persistent viewer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerPersistence {
    /// Gamut files open at exit, in load order.
    pub last_files: Vec<PathBuf>,
    /// Camera mode.
    pub mode: Mode,
    /// Projection kind.
    pub projection: Projection,
    /// Orbit target in Lab.
    pub orbit_target: [f32; 3],
    /// Orbit distance.
    pub orbit_distance: f32,
    /// Orbit elevation.
    pub orbit_theta: f32,
    /// Orbit azimuth.
    pub orbit_phi: f32,
}

impl Default for ViewerPersistence {
    fn default() -> Self {
        Self {
            last_files: Vec::new(),
            mode: Mode::Orbit,
            projection: Projection::Perspective,
            orbit_target: DEFAULT_TARGET,
            orbit_distance: DEFAULT_ORBIT_DISTANCE,
            orbit_theta: 0.0,
            orbit_phi: 0.0,
        }
    }
}

/// Platform location of the settings file.
pub fn persistence_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("colorviz").join(PERSISTENCE_FILE))
}

impl ViewerPersistence {
    /// Reads settings from `path`.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ViewerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&text).map_err(|source| ViewerError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads settings from `path`, falling back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from(path) {
            Ok(p) => {
                debug!(path = %path.display(), "loaded viewer settings");
                p
            }
            Err(ViewerError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Self::default()
            }
            Err(e) => {
                warn!(error = %e, "ignoring viewer settings");
                Self::default()
            }
        }
    }

    /// Reads settings from the platform location.
    pub fn load() -> Self {
        match persistence_path() {
            Some(path) => Self::load_or_default(path),
            None => Self::default(),
        }
    }

    /// Writes settings to `path`, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let io_err = |source| ViewerError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, text).map_err(io_err)
    }

    /// Writes settings to the platform location.
    pub fn save(&self) -> Result<()> {
        let path = persistence_path().ok_or(ViewerError::NoConfigDir)?;
        self.save_to(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(PERSISTENCE_FILE);
        let state = ViewerPersistence {
            last_files: vec![PathBuf::from("a.gam"), PathBuf::from("b.gam")],
            mode: Mode::Fly,
            orbit_distance: 42.0,
            ..Default::default()
        };
        state.save_to(&path).unwrap();
        assert_eq!(ViewerPersistence::load_from(&path).unwrap(), state);
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PERSISTENCE_FILE);
        std::fs::write(&path, "(mode: Sideways").unwrap();
        assert!(matches!(
            ViewerPersistence::load_from(&path),
            Err(ViewerError::Decode { .. })
        ));
        assert_eq!(
            ViewerPersistence::load_or_default(&path),
            ViewerPersistence::default()
        );
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let state = ViewerPersistence::load_or_default(dir.path().join("none.ron"));
        assert_eq!(state, ViewerPersistence::default());
    }
}
