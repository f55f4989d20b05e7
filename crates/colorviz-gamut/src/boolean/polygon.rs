//! Convex polygons, splitting planes and mesh conversion.

use glam::DVec3;
use std::collections::HashMap;

/// Distance below which a point counts as lying on a plane.
pub(crate) const PLANE_EPSILON: f64 = 1e-5;

/// Distance below which input vertices are merged.
pub(crate) const WELD_EPSILON: f64 = 1e-6;

/// Distance below which result vertices are merged or snapped onto an
/// edge. Split points computed from either side of a seam disagree by a few
/// [`PLANE_EPSILON`], more after repeated operations.
pub(crate) const SNAP_EPSILON: f64 = 1e-3;

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

/// Oriented plane `normal . p = w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SplitPlane {
    pub normal: DVec3,
    pub w: f64,
}

impl SplitPlane {
    /// Plane through three counter-clockwise points. `None` if degenerate.
    pub fn from_points(a: DVec3, b: DVec3, c: DVec3) -> Option<Self> {
        let n = (b - a).cross(c - a);
        let len = n.length();
        if !(len > 1e-12) {
            return None;
        }
        let normal = n / len;
        Some(Self {
            normal,
            w: normal.dot(a),
        })
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    #[inline]
    fn classify(&self, p: DVec3) -> u8 {
        let t = self.normal.dot(p) - self.w;
        if t < -PLANE_EPSILON {
            BACK
        } else if t > PLANE_EPSILON {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Splits `polygon` by this plane.
    pub fn split(&self, polygon: Polygon) -> Split {
        let types: Vec<u8> = polygon.vertices.iter().map(|&v| self.classify(v)).collect();
        let kind = types.iter().fold(COPLANAR, |acc, t| acc | t);

        match kind {
            COPLANAR => {
                if self.normal.dot(polygon.plane.normal) > 0.0 {
                    Split::CoplanarFront(polygon)
                } else {
                    Split::CoplanarBack(polygon)
                }
            }
            FRONT => Split::Front(polygon),
            BACK => Split::Back(polygon),
            _ => {
                let n = polygon.vertices.len();
                let mut f = Vec::with_capacity(n + 1);
                let mut b = Vec::with_capacity(n + 1);
                for i in 0..n {
                    let j = (i + 1) % n;
                    let (ti, tj) = (types[i], types[j]);
                    let (vi, vj) = (polygon.vertices[i], polygon.vertices[j]);
                    if ti != BACK {
                        f.push(vi);
                    }
                    if ti != FRONT {
                        b.push(vi);
                    }
                    if ti | tj == SPANNING {
                        let t = (self.w - self.normal.dot(vi)) / self.normal.dot(vj - vi);
                        let v = vi.lerp(vj, t);
                        f.push(v);
                        b.push(v);
                    }
                }
                let plane = polygon.plane;
                Split::Spanning {
                    front: (f.len() >= 3).then(|| Polygon { vertices: f, plane }),
                    back: (b.len() >= 3).then(|| Polygon { vertices: b, plane }),
                }
            }
        }
    }
}

/// Outcome of [`SplitPlane::split`].
#[derive(Debug)]
pub(crate) enum Split {
    CoplanarFront(Polygon),
    CoplanarBack(Polygon),
    Front(Polygon),
    Back(Polygon),
    Spanning {
        front: Option<Polygon>,
        back: Option<Polygon>,
    },
}

/// Convex planar polygon, counter-clockwise around its plane normal.
///
/// Pieces produced by splitting keep the plane of their parent.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Polygon {
    pub vertices: Vec<DVec3>,
    pub plane: SplitPlane,
}

impl Polygon {
    /// Triangle polygon. `None` if degenerate.
    pub fn triangle(a: DVec3, b: DVec3, c: DVec3) -> Option<Self> {
        SplitPlane::from_points(a, b, c).map(|plane| Self {
            vertices: vec![a, b, c],
            plane,
        })
    }

    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }
}

#[inline]
fn weld_cell(v: DVec3, tolerance: f64) -> [i64; 3] {
    let q = (v / tolerance).floor();
    [q.x as i64, q.y as i64, q.z as i64]
}

/// Merges points closer than `tolerance`. Returns the unique points and,
/// for every input point, its index into them.
///
/// Neighbouring grid cells are searched too, so two close points on either
/// side of a cell boundary still merge.
pub(crate) fn weld(
    points: impl IntoIterator<Item = DVec3>,
    tolerance: f64,
) -> (Vec<DVec3>, Vec<u32>) {
    let mut grid: HashMap<[i64; 3], Vec<u32>> = HashMap::new();
    let mut unique: Vec<DVec3> = Vec::new();
    let mut remap = Vec::new();
    let limit = tolerance * tolerance;
    for p in points {
        let [cx, cy, cz] = weld_cell(p, tolerance);
        let mut found = None;
        'search: for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = grid.get(&[cx + dx, cy + dy, cz + dz]) else {
                        continue;
                    };
                    if let Some(&k) = bucket
                        .iter()
                        .find(|&&k| unique[k as usize].distance_squared(p) <= limit)
                    {
                        found = Some(k);
                        break 'search;
                    }
                }
            }
        }
        let index = match found {
            Some(k) => k,
            None => {
                unique.push(p);
                let k = (unique.len() - 1) as u32;
                grid.entry([cx, cy, cz]).or_default().push(k);
                k
            }
        };
        remap.push(index);
    }
    (unique, remap)
}

/// Welded points sorted by `x`, for finding points that lie on an edge.
struct EdgeIndex {
    order: Vec<u32>,
    xs: Vec<f64>,
}

impl EdgeIndex {
    fn new(points: &[DVec3]) -> Self {
        let mut order: Vec<u32> = (0..points.len() as u32).collect();
        order.sort_by(|&a, &b| points[a as usize].x.total_cmp(&points[b as usize].x));
        let xs = order.iter().map(|&i| points[i as usize].x).collect();
        Self { order, xs }
    }

    /// Points strictly inside segment `a-b`, ordered from `a` to `b`.
    fn interior_points(&self, points: &[DVec3], a: u32, b: u32, out: &mut Vec<(f64, u32)>) {
        out.clear();
        let (pa, pb) = (points[a as usize], points[b as usize]);
        let d = pb - pa;
        let len2 = d.length_squared();
        if len2 == 0.0 {
            return;
        }
        let lo = pa.x.min(pb.x) - SNAP_EPSILON;
        let hi = pa.x.max(pb.x) + SNAP_EPSILON;
        let start = self.xs.partition_point(|&x| x < lo);
        for (&x, &i) in self.xs[start..].iter().zip(&self.order[start..]) {
            if x > hi {
                break;
            }
            if i == a || i == b {
                continue;
            }
            let p = points[i as usize];
            let t = (p - pa).dot(d) / len2;
            if t <= 0.0 || t >= 1.0 {
                continue;
            }
            if (pa + d * t).distance_squared(p) < SNAP_EPSILON * SNAP_EPSILON {
                out.push((t, i));
            }
        }
        out.sort_by(|x, y| x.0.total_cmp(&y.0));
    }
}

/// Near-zero area relative to the edge lengths.
#[inline]
fn is_degenerate(a: DVec3, b: DVec3, c: DVec3) -> bool {
    let (e1, e2) = (b - a, c - a);
    e1.cross(e2).length_squared() <= 1e-18 * e1.length_squared() * e2.length_squared()
}

/// Distance from the longest edge to the opposite corner.
fn height(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    let longest = (b - a)
        .length_squared()
        .max((c - b).length_squared())
        .max((a - c).length_squared())
        .sqrt();
    if longest == 0.0 {
        return 0.0;
    }
    (b - a).cross(c - a).length() / longest
}

/// Triangulates a convex vertex loop.
///
/// A fan from the first corner is used when none of its triangles is
/// thinner than [`SNAP_EPSILON`]. Otherwise the loop is fanned from its
/// centroid so that nearly collinear runs keep every boundary edge.
fn triangulate(points: &mut Vec<DVec3>, ring: &[u32], out: &mut Vec<[u32; 3]>) {
    let n = ring.len();
    let fan_ok = {
        let p = |k: usize| points[ring[k] as usize];
        (1..n - 1).all(|i| height(p(0), p(i), p(i + 1)) >= SNAP_EPSILON)
    };
    if fan_ok {
        out.extend((1..n - 1).map(|i| [ring[0], ring[i], ring[i + 1]]));
        return;
    }

    let centroid = ring.iter().map(|&i| points[i as usize]).sum::<DVec3>() / n as f64;
    let c = points.len() as u32;
    points.push(centroid);
    for i in 0..n {
        let (a, b) = (ring[i], ring[(i + 1) % n]);
        if !is_degenerate(centroid, points[a as usize], points[b as usize]) {
            out.push([c, a, b]);
        }
    }
}

/// Removes coincident triangles of opposite winding, keeping the surplus
/// of whichever winding occurs more often.
fn cancel_opposed(triangles: Vec<[u32; 3]>) -> Vec<[u32; 3]> {
    let mut net: HashMap<[u32; 3], i32> = HashMap::new();
    let mut order = Vec::new();
    for tri in triangles {
        // rotate the smallest index to the front
        let k = (0..3).min_by_key(|&k| tri[k]).unwrap_or(0);
        let [a, b, c] = [tri[k], tri[(k + 1) % 3], tri[(k + 2) % 3]];
        let (key, sign) = if b < c { ([a, b, c], 1) } else { ([a, c, b], -1) };
        *net.entry(key).or_insert_with(|| {
            order.push(key);
            0
        }) += sign;
    }
    order
        .into_iter()
        .flat_map(|key| {
            let count = net[&key];
            let tri = if count > 0 { key } else { [key[0], key[2], key[1]] };
            std::iter::repeat_n(tri, count.unsigned_abs() as usize)
        })
        .collect()
}

/// Converts polygons into an indexed mesh.
///
/// Vertices closer than [`SNAP_EPSILON`] are welded. A vertex lying on
/// another polygon's edge is inserted into that edge, so neighbouring faces
/// meet edge to edge and the mesh stays closed. Degenerate faces and
/// zero-volume fins are dropped and unused vertices are removed.
pub(crate) fn polygons_to_mesh(polygons: &[Polygon]) -> (Vec<DVec3>, Vec<[u32; 3]>) {
    let (mut vertices, remap) = weld(
        polygons.iter().flat_map(|p| p.vertices.iter().copied()),
        SNAP_EPSILON,
    );

    let mut loops = Vec::with_capacity(polygons.len());
    let mut offset = 0;
    for polygon in polygons {
        let mut ids = remap[offset..offset + polygon.vertices.len()].to_vec();
        offset += polygon.vertices.len();
        ids.dedup();
        while ids.len() > 1 && ids.first() == ids.last() {
            ids.pop();
        }
        if ids.len() >= 3 {
            loops.push(ids);
        }
    }

    let index = EdgeIndex::new(&vertices);
    let mut rings = Vec::with_capacity(loops.len());
    let mut on_edge = Vec::new();
    for ids in &loops {
        let mut ring = Vec::with_capacity(ids.len());
        for k in 0..ids.len() {
            let (a, b) = (ids[k], ids[(k + 1) % ids.len()]);
            ring.push(a);
            index.interior_points(&vertices, a, b, &mut on_edge);
            ring.extend(on_edge.iter().map(|&(_, i)| i));
        }
        ring.dedup();
        rings.push(ring);
    }

    let mut triangles = Vec::new();
    for ring in &rings {
        if ring.len() >= 3 {
            triangulate(&mut vertices, ring, &mut triangles);
        }
    }

    let mut triangles = cancel_opposed(triangles);

    // compact
    let mut used = vec![u32::MAX; vertices.len()];
    let mut kept = Vec::new();
    for tri in &mut triangles {
        for i in tri.iter_mut() {
            let slot = &mut used[*i as usize];
            if *slot == u32::MAX {
                *slot = kept.len() as u32;
                kept.push(vertices[*i as usize]);
            }
            *i = *slot;
        }
    }
    (kept, triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Polygon {
        let mut p = Polygon::triangle(
            DVec3::new(-1.0, -1.0, 0.0),
            DVec3::new(1.0, -1.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
        )
        .unwrap();
        p.vertices.push(DVec3::new(-1.0, 1.0, 0.0));
        p
    }

    #[test]
    fn test_split_spanning() {
        let plane = SplitPlane {
            normal: DVec3::X,
            w: 0.0,
        };
        match plane.split(quad()) {
            Split::Spanning {
                front: Some(f),
                back: Some(b),
            } => {
                assert!(f.vertices.iter().all(|v| v.x >= -PLANE_EPSILON));
                assert!(b.vertices.iter().all(|v| v.x <= PLANE_EPSILON));
                assert_eq!(f.vertices.len(), 4);
                assert_eq!(b.vertices.len(), 4);
                assert_eq!(f.plane, quad().plane);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_split_sides() {
        let above = SplitPlane {
            normal: DVec3::Z,
            w: -1.0,
        };
        assert!(matches!(above.split(quad()), Split::Front(_)));
        let below = SplitPlane {
            normal: DVec3::Z,
            w: 1.0,
        };
        assert!(matches!(below.split(quad()), Split::Back(_)));
        let same = SplitPlane {
            normal: DVec3::Z,
            w: 0.0,
        };
        assert!(matches!(same.split(quad()), Split::CoplanarFront(_)));
        let mut flipped = same;
        flipped.flip();
        assert!(matches!(flipped.split(quad()), Split::CoplanarBack(_)));
    }

    #[test]
    fn test_degenerate_triangle() {
        assert!(Polygon::triangle(DVec3::ZERO, DVec3::X, DVec3::X * 2.0).is_none());
    }

    #[test]
    fn test_polygons_to_mesh_welds_and_fans() {
        let a = quad();
        let mut b = quad();
        b.flip();
        let (vertices, triangles) = polygons_to_mesh(&[a, b]);
        assert_eq!(vertices.len(), 4);
        assert_eq!(triangles.len(), 4);
    }

    fn rect(x0: f64, x1: f64, y0: f64, y1: f64, up: bool) -> Polygon {
        let mut p = Polygon {
            vertices: vec![
                DVec3::new(x0, y0, 0.0),
                DVec3::new(x1, y0, 0.0),
                DVec3::new(x1, y1, 0.0),
                DVec3::new(x0, y1, 0.0),
            ],
            plane: SplitPlane {
                normal: DVec3::Z,
                w: 0.0,
            },
        };
        if !up {
            p.flip();
        }
        p
    }

    #[test]
    fn test_polygons_to_mesh_splits_t_junctions() {
        // one face on top, two half faces underneath: (1,0) and (1,2) sit
        // in the middle of the top face's edges
        let polygons = [
            rect(0.0, 2.0, 0.0, 2.0, true),
            rect(0.0, 1.0, 0.0, 2.0, false),
            rect(1.0, 2.0, 0.0, 2.0, false),
        ];
        let (vertices, triangles) = polygons_to_mesh(&polygons);
        assert_eq!(super::super::open_edges(&triangles), 0);
        assert!(vertices.iter().any(|v| *v == DVec3::new(1.0, 0.0, 0.0)));
        for &[a, b, c] in &triangles {
            let [a, b, c] = [a, b, c].map(|i| vertices[i as usize]);
            assert!((b - a).cross(c - a).length_squared() > 1e-12);
        }
        let area: f64 = triangles
            .iter()
            .map(|&[a, b, c]| {
                let [a, b, c] = [a, b, c].map(|i| vertices[i as usize]);
                (b - a).cross(c - a).z * 0.5
            })
            .sum();
        assert!(area.abs() < 1e-12);
    }

    #[test]
    fn test_polygons_to_mesh_drops_unused_vertices() {
        let sliver = Polygon {
            vertices: vec![
                DVec3::new(5.0, 0.0, 0.0),
                DVec3::new(6.0, 0.0, 0.0),
                DVec3::new(7.0, 0.0, 0.0),
            ],
            plane: SplitPlane {
                normal: DVec3::Z,
                w: 0.0,
            },
        };
        let (vertices, triangles) = polygons_to_mesh(&[quad(), sliver]);
        assert_eq!(triangles.len(), 2);
        assert_eq!(vertices.len(), 4);
    }

    #[test]
    fn test_cancel_opposed() {
        let tris = vec![[0, 1, 2], [2, 1, 0], [1, 2, 0], [3, 4, 5], [4, 3, 5], [5, 4, 3]];
        let kept = cancel_opposed(tris);
        assert_eq!(kept, vec![[0, 1, 2], [3, 5, 4]]);
    }

    #[test]
    fn test_weld_across_cell_boundary() {
        for x in [WELD_EPSILON, WELD_EPSILON * 0.5] {
            let a = DVec3::new(x - 5e-8, 0.0, 0.0);
            let b = DVec3::new(x + 5e-8, 0.0, 0.0);
            let far = DVec3::new(x + 3e-6, 0.0, 0.0);
            let (unique, remap) = weld([a, b, far], WELD_EPSILON);
            assert_eq!(unique.len(), 2);
            assert_eq!(remap, vec![0, 0, 1]);
        }
    }
}
