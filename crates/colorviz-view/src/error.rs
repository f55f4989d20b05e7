//! Viewer errors.

use crate::arena::MeshHandle;
use colorviz_gamut::ParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for viewer operations.
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Errors raised by the viewer core.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Gamut file could not be loaded.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Handle does not refer to a live mesh.
    #[error("no mesh for handle {0:?}")]
    UnknownHandle(MeshHandle),

    /// Config or settings file could not be read or written.
    #[error("{}: {source}", path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config or settings file is not valid RON.
    #[error("{}: {source}", path.display())]
    Decode {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: ron::error::SpannedError,
    },

    /// Settings could not be serialized.
    #[error("cannot encode settings: {0}")]
    Encode(#[from] ron::Error),

    /// No platform config directory.
    #[error("no config directory on this platform")]
    NoConfigDir,
}
