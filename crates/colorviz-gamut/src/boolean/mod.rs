//! Union and intersection of closed gamut meshes.
//!
//! Inputs are checked to be closed, consistently oriented 2-manifolds with
//! finite coordinates. Inside-out inputs are reoriented. The work runs in
//! `f64` on a BSP tree over the untransformed Lab vertices; the result is a
//! fresh [`GamutMesh`] with its own id, vertex colors derived from the first
//! operand's illuminant, and the first operand's transform. Results pass
//! the same closed-manifold check as inputs, so they can be fed back in.

mod bsp;
mod polygon;

use crate::error::BooleanError;
use crate::ids::IdGenerator;
use crate::mesh::GamutMesh;
use crate::parser::GamutHeader;
use bsp::Bsp;
use colorviz_math::Vec3;
use glam::DVec3;
use polygon::{Polygon, WELD_EPSILON, polygons_to_mesh, weld};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Boolean operation on two solids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    /// Points inside either mesh.
    Union,
    /// Points inside both meshes.
    Intersection,
}

impl BooleanOp {
    /// Short operator symbol used in result labels.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Union => "\u{222a}",
            Self::Intersection => "\u{2229}",
        }
    }
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Union => "union",
            Self::Intersection => "intersection",
        })
    }
}

impl FromStr for BooleanOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "union" | "or" => Ok(Self::Union),
            "intersection" | "intersect" | "and" => Ok(Self::Intersection),
            other => Err(format!("unknown boolean op '{other}'")),
        }
    }
}

/// Welded triangle soup of one operand, oriented outward.
fn prepare(mesh: &GamutMesh) -> Result<Vec<Polygon>, BooleanError> {
    if mesh.triangles().is_empty() {
        return Err(BooleanError::EmptyInput);
    }
    if mesh.vertices().iter().any(|v| !v.is_finite()) {
        return Err(BooleanError::NonFinite);
    }

    let (points, remap) = weld(mesh.vertices().iter().map(|v| v.as_dvec3()), WELD_EPSILON);
    let triangles: Vec<[u32; 3]> = mesh
        .triangles()
        .iter()
        .map(|t| t.map(|i| remap[i as usize]))
        .filter(|[a, b, c]| a != b && b != c && a != c)
        .collect();
    if triangles.is_empty() {
        return Err(BooleanError::EmptyInput);
    }

    let edges = open_edges(&triangles);
    if edges > 0 {
        return Err(BooleanError::NonManifold { edges });
    }

    let mut polygons: Vec<Polygon> = triangles
        .iter()
        .filter_map(|&[a, b, c]| {
            Polygon::triangle(points[a as usize], points[b as usize], points[c as usize])
        })
        .collect();
    if polygons.is_empty() {
        return Err(BooleanError::EmptyInput);
    }

    if signed_volume(&points, &triangles) < 0.0 {
        debug!(id = %mesh.id(), "reorienting inside-out mesh");
        for p in &mut polygons {
            p.flip();
        }
    }
    Ok(polygons)
}

/// Counts undirected edges not shared by exactly two oppositely wound faces.
fn open_edges(triangles: &[[u32; 3]]) -> usize {
    // (uses, winding balance)
    let mut edges: HashMap<(u32, u32), (u32, i32)> = HashMap::new();
    for tri in triangles {
        for k in 0..3 {
            let (a, b) = (tri[k], tri[(k + 1) % 3]);
            let key = (a.min(b), a.max(b));
            let entry = edges.entry(key).or_default();
            entry.0 += 1;
            entry.1 += if a < b { 1 } else { -1 };
        }
    }
    edges
        .values()
        .filter(|&&(uses, balance)| uses != 2 || balance != 0)
        .count()
}

fn signed_volume(points: &[DVec3], triangles: &[[u32; 3]]) -> f64 {
    triangles
        .iter()
        .map(|&[a, b, c]| {
            let (a, b, c) = (points[a as usize], points[b as usize], points[c as usize]);
            a.dot(b.cross(c))
        })
        .sum::<f64>()
        / 6.0
}

fn run(a: &GamutMesh, b: &GamutMesh, op: BooleanOp) -> Result<(Vec<Vec3>, Vec<[u32; 3]>), BooleanError> {
    let mut ta = Bsp::from_polygons(prepare(a)?)?;
    let mut tb = Bsp::from_polygons(prepare(b)?)?;

    match op {
        BooleanOp::Union => {
            ta.clip_to(&tb);
            tb.clip_to(&ta);
            tb.invert();
            tb.clip_to(&ta);
            tb.invert();
            ta.build(tb.all_polygons())?;
        }
        BooleanOp::Intersection => {
            ta.invert();
            tb.clip_to(&ta);
            tb.invert();
            ta.clip_to(&tb);
            tb.clip_to(&ta);
            ta.build(tb.all_polygons())?;
            ta.invert();
        }
    }

    let (points, triangles) = polygons_to_mesh(&ta.all_polygons());
    if triangles.is_empty() {
        return Err(BooleanError::EmptyResult);
    }
    let edges = open_edges(&triangles);
    if edges > 0 {
        return Err(BooleanError::OpenResult { edges });
    }
    Ok((points.iter().map(|p| p.as_vec3()).collect(), triangles))
}

/// Computes `a op b` as a new mesh.
///
/// Operands are combined in Lab space; their transforms are ignored and the
/// result carries `a`'s transform.
pub fn mesh_boolean(
    a: &GamutMesh,
    b: &GamutMesh,
    op: BooleanOp,
    ids: &mut IdGenerator,
) -> Result<GamutMesh, BooleanError> {
    let (vertices, triangles) = run(a, b, op).inspect_err(|e| {
        warn!(a = %a.id(), b = %b.id(), %op, error = %e, "mesh boolean failed");
    })?;

    debug!(
        a = %a.id(),
        b = %b.id(),
        %op,
        vertices = vertices.len(),
        triangles = triangles.len(),
        "mesh boolean done"
    );
    let label = format!("{} {} {}", a.label(), op.symbol(), b.label());
    let mut mesh = GamutMesh::new_unchecked(
        ids.next_id(),
        label,
        GamutHeader::default(),
        vertices,
        triangles,
        a.illuminant(),
    );
    mesh.set_transform(a.transform());
    Ok(mesh)
}

/// Volume inside both meshes.
pub fn intersect_gamut_meshes(
    a: &GamutMesh,
    b: &GamutMesh,
    ids: &mut IdGenerator,
) -> Result<GamutMesh, BooleanError> {
    mesh_boolean(a, b, BooleanOp::Intersection, ids)
}

/// Volume inside either mesh.
pub fn union_gamut_meshes(
    a: &GamutMesh,
    b: &GamutMesh,
    ids: &mut IdGenerator,
) -> Result<GamutMesh, BooleanError> {
    mesh_boolean(a, b, BooleanOp::Union, ids)
}
