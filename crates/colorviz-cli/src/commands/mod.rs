//! CLI command implementations

pub mod boolean;
pub mod info;
pub mod lab;
pub mod pick;

use anyhow::{Context, Result};
use colorviz_gamut::{GamutMesh, IdGenerator, LoadOptions, ParseMode};
use colorviz_math::Vec3;
use colorviz_view::ViewerConfig;
use std::path::Path;

/// Load gamut from path
pub fn load_gamut(
    path: &Path,
    mode: ParseMode,
    config: &ViewerConfig,
    ids: &mut IdGenerator,
) -> Result<GamutMesh> {
    let options = LoadOptions {
        mode,
        illuminant: config.illuminant,
    };
    GamutMesh::load(path, &options, ids).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Format a Lab or XYZ triple
pub fn format_vec3(v: Vec3) -> String {
    format!("{:8.3} {:8.3} {:8.3}", v.x, v.y, v.z)
}
