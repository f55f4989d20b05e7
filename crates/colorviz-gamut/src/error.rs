//! Error types for gamut loading, mesh construction and booleans.
//!
//! # Overview
//!
//! - [`ParseError`] - reading a gamut boundary file
//! - [`MeshError`] - building a [`GamutMesh`](crate::GamutMesh) from raw parts
//! - [`BooleanError`] - union/intersection of two meshes
//!
//! All enums use [`thiserror`] for `Display` and `Error`.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for parsing.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors raised while reading a gamut file.
///
/// Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum ParseError {
    /// File could not be opened or written.
    #[error("{}: {source}", path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Reading a line from the input failed.
    #[error("line {line}: read failed: {source}")]
    Read {
        /// Line being read
        line: usize,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Triangle index is not an unsigned integer.
    #[error("line {line}: invalid triangle index '{token}'")]
    InvalidIndex {
        /// Line number
        line: usize,
        /// Offending token
        token: String,
    },

    /// Triangle index refers to a vertex that does not exist.
    #[error("line {line}: triangle index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Line number
        line: usize,
        /// Index found
        index: u32,
        /// Number of vertices parsed
        vertex_count: usize,
    },

    /// Vertex coordinate is not a number (strict mode).
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber {
        /// Line number
        line: usize,
        /// Offending token
        token: String,
    },

    /// Data row has the wrong number of tokens (strict mode).
    #[error("line {line}: expected {expected} tokens, found {found}")]
    MalformedLine {
        /// Line number
        line: usize,
        /// Token count required
        expected: usize,
        /// Token count found
        found: usize,
    },
}

/// Errors raised when assembling a mesh from vertices and triangles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// A triangle refers to a missing vertex.
    #[error("triangle {triangle}: index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Triangle position
        triangle: usize,
        /// Index found
        index: u32,
        /// Number of vertices
        vertex_count: usize,
    },
}

/// Mesh boolean failure.
///
/// The operation is aborted and no mesh is produced. Callers should treat
/// the pair as having no result rather than retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BooleanError {
    /// One of the inputs has no triangles.
    #[error("boolean input mesh is empty")]
    EmptyInput,

    /// An input vertex is NaN or infinite.
    #[error("boolean input has non-finite vertices")]
    NonFinite,

    /// An input is not a closed 2-manifold.
    #[error("boolean input is not closed: {edges} edges without exactly two faces")]
    NonManifold {
        /// Number of offending edges
        edges: usize,
    },

    /// The operation produced no surface.
    #[error("boolean result is empty")]
    EmptyResult,

    /// The result surface has cracks and cannot be used as an operand.
    #[error("boolean result is not closed: {edges} open edges")]
    OpenResult {
        /// Number of offending edges
        edges: usize,
    },

    /// Space partitioning grew past the node limit.
    #[error("boolean exceeded {nodes} partition nodes")]
    TooComplex {
        /// Node limit reached
        nodes: usize,
    },
}
