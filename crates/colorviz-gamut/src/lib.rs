//! # colorviz-gamut
//!
//! Gamut boundary files and the Lab meshes built from them.
//!
//! - [`parse_gamut`] / [`GamutParser`] - line-oriented reader with a
//!   four-state section machine (header, vertices, triangle header, triangles)
//! - [`save_gamut`] - writer for the same format
//! - [`GamutMesh`] - Lab vertices, per-vertex display colors, triangles,
//!   bounds and a model transform
//! - [`mesh_boolean`] - union or intersection of two closed meshes
//!
//! # File Format
//!
//! ```text
//! DESCRIPTOR "sRGB gamut"
//! BEGIN_DATA
//! 0 0.0 0.0 0.0
//! 1 100.0 0.0 0.0
//! 2 53.2 80.1 67.2
//! END_DATA
//! BEGIN_DATA
//! 0 1 2
//! END_DATA
//! ```
//!
//! The first block lists `<label> <L> <a> <b>` vertices, the second lists
//! triangles as three vertex indices.
//!
//! # Example
//!
//! ```rust
//! use colorviz_gamut::{GamutMesh, IdGenerator, ParseMode, parse_reader};
//! use colorviz_math::Illuminant;
//!
//! let text = "BEGIN_DATA\n0 0 0 0\n1 100 0 0\n2 50 40 20\nEND_DATA\nBEGIN_DATA\n0 1 2\nEND_DATA\n";
//! let data = parse_reader(text.as_bytes(), ParseMode::Strict).unwrap();
//!
//! let mut ids = IdGenerator::new();
//! let mesh = GamutMesh::from_data(ids.next_id(), "doc", data, Illuminant::D50).unwrap();
//! assert_eq!(mesh.colors().len(), mesh.vertices().len());
//! assert_eq!(mesh.bounds().max.x, 100.0);
//! ```

#![warn(missing_docs)]

mod boolean;
mod error;
mod ids;
mod mesh;
mod parser;
mod writer;

pub use boolean::{BooleanOp, intersect_gamut_meshes, mesh_boolean, union_gamut_meshes};
pub use error::{BooleanError, MeshError, ParseError, Result};
pub use ids::{IdGenerator, MeshId};
pub use mesh::{Aabb, GamutMesh, LoadOptions, MeshHit};
pub use parser::{
    GamutData, GamutHeader, GamutParser, LineKind, ParseMode, Section, parse_gamut, parse_reader,
};
pub use writer::{save_gamut, write_gamut};
