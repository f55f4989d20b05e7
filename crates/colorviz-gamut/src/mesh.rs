//! Lab gamut mesh.
//!
//! A [`GamutMesh`] holds the gamut surface in Lab coordinates together with
//! one display color per vertex. Vertices, colors and triangles are private
//! so the invariants hold after construction:
//!
//! - `colors.len() == vertices.len()`
//! - every triangle index is `< vertices.len()`
//! - `bounds` is the componentwise min/max of all vertices

use crate::error::{MeshError, Result};
use crate::ids::{IdGenerator, MeshId};
use crate::parser::{GamutData, GamutHeader, ParseMode, parse_gamut};
use colorviz_color::lab_to_rgb_batch;
use colorviz_math::{Affine3A, Illuminant, Mat4, Ray, RayHit, Triangle, Vec3};
use std::path::Path;
use tracing::debug;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb {
    /// Box containing nothing.
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Grows the box to contain `p`. NaN components are ignored.
    #[inline]
    pub fn extend(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Box around all points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        let mut bb = Self::EMPTY;
        for p in points {
            bb.extend(*p);
        }
        bb
    }

    /// True when no point was added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Options for [`GamutMesh::load`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadOptions {
    /// Parser strictness.
    pub mode: ParseMode,
    /// Illuminant the Lab values are relative to.
    pub illuminant: Illuminant,
}

/// Triangle hit by [`GamutMesh::pick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshHit {
    /// Index into [`GamutMesh::triangles`].
    pub triangle: usize,
    /// Hit in world space.
    pub hit: RayHit,
}

/// Gamut surface in Lab space with per-vertex display colors.
#[derive(Debug, Clone)]
pub struct GamutMesh {
    id: MeshId,
    label: String,
    header: GamutHeader,
    vertices: Vec<Vec3>,
    colors: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    bounds: Aabb,
    illuminant: Illuminant,
    transform: Affine3A,
    /// Drawn when true.
    pub active: bool,
    /// Drawn as wireframe when true.
    pub wireframe: bool,
}

impl GamutMesh {
    /// Builds a mesh from vertices and triangles, deriving colors under
    /// `illuminant`.
    pub fn from_parts(
        id: MeshId,
        label: impl Into<String>,
        vertices: Vec<Vec3>,
        triangles: Vec<[u32; 3]>,
        illuminant: Illuminant,
    ) -> std::result::Result<Self, MeshError> {
        let vertex_count = vertices.len();
        for (triangle, tri) in triangles.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    triangle,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(Self::new_unchecked(
            id,
            label.into(),
            GamutHeader::default(),
            vertices,
            triangles,
            illuminant,
        ))
    }

    /// Builds a mesh from parsed file data.
    pub fn from_data(
        id: MeshId,
        label: impl Into<String>,
        data: GamutData,
        illuminant: Illuminant,
    ) -> std::result::Result<Self, MeshError> {
        let mut mesh = Self::from_parts(id, label, data.vertices, data.triangles, illuminant)?;
        mesh.header = data.header;
        Ok(mesh)
    }

    /// Loads a gamut file. The label is the file stem.
    pub fn load(path: impl AsRef<Path>, options: &LoadOptions, ids: &mut IdGenerator) -> Result<Self> {
        let path = path.as_ref();
        let data = parse_gamut(path, options.mode)?;
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        // indices were checked by the parser
        let mesh = Self::new_unchecked(
            ids.next_id(),
            label,
            data.header,
            data.vertices,
            data.triangles,
            options.illuminant,
        );
        debug!(
            id = %mesh.id,
            label = %mesh.label,
            vertices = mesh.vertices.len(),
            triangles = mesh.triangles.len(),
            illuminant = %mesh.illuminant,
            "loaded gamut mesh"
        );
        Ok(mesh)
    }

    pub(crate) fn new_unchecked(
        id: MeshId,
        label: String,
        header: GamutHeader,
        vertices: Vec<Vec3>,
        triangles: Vec<[u32; 3]>,
        illuminant: Illuminant,
    ) -> Self {
        let colors = lab_to_rgb_batch(&vertices, illuminant);
        let bounds = Aabb::from_points(&vertices);
        Self {
            id,
            label,
            header,
            vertices,
            colors,
            triangles,
            bounds,
            illuminant,
            transform: Affine3A::IDENTITY,
            active: true,
            wireframe: false,
        }
    }

    /// Mesh id.
    #[inline]
    pub fn id(&self) -> MeshId {
        self.id
    }

    /// Display label.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Renames the mesh.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Header keywords from the source file.
    #[inline]
    pub fn header(&self) -> &GamutHeader {
        &self.header
    }

    /// Lab vertices.
    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Display colors, one per vertex.
    #[inline]
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Vertex index triples.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Bounding box of the vertices in Lab space.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Reference illuminant of the Lab values.
    #[inline]
    pub fn illuminant(&self) -> Illuminant {
        self.illuminant
    }

    /// Model transform.
    #[inline]
    pub fn transform(&self) -> Affine3A {
        self.transform
    }

    /// Replaces the model transform.
    pub fn set_transform(&mut self, transform: Affine3A) {
        self.transform = transform;
    }

    /// Model transform as a 4x4 matrix.
    #[inline]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from(self.transform)
    }

    /// True when there is nothing to draw.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Sets every vertex color to `color`.
    pub fn set_vertex_color(&mut self, color: Vec3) {
        self.colors.fill(color);
    }

    /// Recomputes colors from the Lab vertices under `illuminant`.
    pub fn set_illuminant(&mut self, illuminant: Illuminant) {
        self.illuminant = illuminant;
        self.recolor();
    }

    /// Recomputes colors from the Lab vertices.
    pub fn recolor(&mut self) {
        self.colors = lab_to_rgb_batch(&self.vertices, self.illuminant);
    }

    /// Area-weighted vertex normals in model space.
    ///
    /// Vertices not used by any triangle get a zero normal.
    pub fn normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];
        for &[a, b, c] in &self.triangles {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            // cross product length is twice the area
            let n = (self.vertices[b] - self.vertices[a]).cross(self.vertices[c] - self.vertices[a]);
            normals[a] += n;
            normals[b] += n;
            normals[c] += n;
        }
        for n in &mut normals {
            *n = n.normalize_or_zero();
        }
        normals
    }

    /// Triangle corners in model space.
    #[inline]
    pub fn triangle(&self, index: usize) -> Triangle {
        let [a, b, c] = self.triangles[index];
        Triangle::new(
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        )
    }

    /// Closest front-facing triangle hit by a world-space ray.
    pub fn pick(&self, ray: &Ray) -> Option<MeshHit> {
        let to_model = Mat4::from(self.transform.inverse());
        let local = ray.transformed(&to_model);
        let to_world = self.model_matrix();

        let (triangle, hit) = (0..self.triangles.len())
            .filter_map(|i| local.intersect_triangle(&self.triangle(i)).map(|h| (i, h)))
            .min_by(|(_, a), (_, b)| a.distance.total_cmp(&b.distance))?;

        let point = to_world.transform_point3(hit.point);
        Some(MeshHit {
            triangle,
            hit: RayHit {
                point,
                normal: to_world.transform_vector3(hit.normal).normalize(),
                distance: point.distance(ray.origin),
            },
        })
    }

    /// Snapshot as file data, for saving.
    pub fn to_data(&self) -> GamutData {
        GamutData {
            header: self.header.clone(),
            vertices: self.vertices.clone(),
            triangles: self.triangles.clone(),
        }
    }
}
