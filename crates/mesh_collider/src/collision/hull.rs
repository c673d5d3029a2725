//! Incremental 3D convex hull construction (Quickhull)
//!
//! Builds a closed, watertight, triangulated hull over a point set by
//! seeding an extremal tetrahedron and repeatedly lifting the farthest
//! outside point onto the hull, replacing every face it can see with a fan
//! of new faces around the horizon.
//!
//! The algorithm is not robust under exact coplanarity; callers are
//! expected to pre-perturb points (see [`perturbed`]) before building.

use crate::foundation::math::{Point3, Vec3};
use rand::Rng;
use std::collections::HashMap;
use thiserror::Error;

/// Per-axis magnitude of the degeneracy-breaking perturbation
const PERTURBATION: f64 = 1e-4;

/// Errors from convex hull construction
#[derive(Error, Debug)]
pub enum HullError {
    /// Fewer than four input points
    #[error("convex hull needs at least 4 points, got {0}")]
    TooFewPoints(usize),
    /// Input points are coincident, collinear, or coplanar
    #[error("degenerate input: points do not span three dimensions")]
    Degenerate,
}

/// A triangular facet of a convex hull
#[derive(Debug, Clone, PartialEq)]
pub struct HullFace {
    /// Vertex indices into [`ConvexHull::vertices`], wound counter-clockwise
    /// seen from outside
    pub indices: [u32; 3],
    /// Outward unit normal
    pub normal: Vec3,
}

/// Final convex hull: compacted vertices plus outward-facing triangles
///
/// Invariants: every face normal points away from the interior; every input
/// point lies on or behind every face plane within tolerance; each
/// undirected edge is shared by exactly two faces with opposite orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexHull {
    /// Vertices referenced by the faces, deduplicated and index-compacted
    pub vertices: Vec<Point3>,
    /// Triangular faces with outward normals
    pub faces: Vec<HullFace>,
}

impl ConvexHull {
    /// Build the convex hull of `points`
    pub fn build(points: &[Point3]) -> Result<Self, HullError> {
        ConvexHullBuilder::new(points)?.build()
    }

    /// Whether `point` lies on or behind every face plane
    #[must_use]
    pub fn contains(&self, point: &Point3, tolerance: f64) -> bool {
        self.faces.iter().all(|face| {
            let origin = &self.vertices[face.indices[0] as usize];
            face.normal.dot(&(point - origin)) <= tolerance
        })
    }
}

/// Returns a perturbed private copy of `points`
///
/// Each coordinate is offset by a uniform random value in
/// `±0.5e-4`, breaking exact coplanarity and collinearity before hull
/// construction. A pragmatic robustness measure, not a correctness
/// guarantee; pass a seeded generator to keep results reproducible.
pub fn perturbed<R: Rng + ?Sized>(points: &[Point3], rng: &mut R) -> Vec<Point3> {
    points
        .iter()
        .map(|p| {
            Point3::new(
                p.x + (rng.gen::<f64>() - 0.5) * PERTURBATION,
                p.y + (rng.gen::<f64>() - 0.5) * PERTURBATION,
                p.z + (rng.gen::<f64>() - 0.5) * PERTURBATION,
            )
        })
        .collect()
}

/// A face of the hull under construction
#[derive(Debug)]
struct Face {
    /// Vertex indices into the builder's point array
    verts: [u32; 3],
    /// Outward unit normal
    normal: Vec3,
    /// Plane offset: `normal · vertex` for any face vertex
    offset: f64,
    /// Indices of not-yet-absorbed points in front of this face
    outside: Vec<u32>,
    /// Dead faces stay in storage until final compaction
    alive: bool,
}

impl Face {
    fn new(a: u32, b: u32, c: u32, points: &[Point3]) -> Self {
        let pa = points[a as usize];
        let normal = (points[b as usize] - pa)
            .cross(&(points[c as usize] - pa))
            .normalize();
        Self {
            verts: [a, b, c],
            normal,
            offset: normal.dot(&pa.coords),
            outside: Vec::new(),
            alive: true,
        }
    }

    /// Signed distance of `point` from this face's plane
    fn distance(&self, point: &Point3) -> f64 {
        self.normal.dot(&point.coords) - self.offset
    }

    /// Directed edges in winding order
    fn edges(&self) -> [(u32, u32); 3] {
        let [a, b, c] = self.verts;
        [(a, b), (b, c), (c, a)]
    }
}

/// Incremental Quickhull state
///
/// Owns a private copy of the input points plus the growing face list; all
/// scratch state is local to one `build` call.
pub struct ConvexHullBuilder {
    points: Vec<Point3>,
    faces: Vec<Face>,
    /// Points at or below this signed distance count as behind a plane
    tolerance: f64,
}

impl ConvexHullBuilder {
    /// Create a builder over a private copy of `points`
    pub fn new(points: &[Point3]) -> Result<Self, HullError> {
        if points.len() < 4 {
            return Err(HullError::TooFewPoints(points.len()));
        }
        let mut max_abs = Vec3::zeros();
        for point in points {
            max_abs = max_abs.sup(&point.coords.abs());
        }
        Ok(Self {
            points: points.to_vec(),
            faces: Vec::new(),
            // Scaled epsilon, the same heuristic graphics hull builders use.
            tolerance: 3.0 * f64::EPSILON * (max_abs.x + max_abs.y + max_abs.z),
        })
    }

    /// Run the algorithm to completion and compact the result
    pub fn build(mut self) -> Result<ConvexHull, HullError> {
        let simplex = self.initial_simplex()?;
        self.seed_tetrahedron(simplex);
        self.assign_initial_outside(&simplex);
        self.expand();
        Ok(self.compact())
    }

    /// Min and max point per axis: up to six extremal candidates
    fn extreme_points(&self) -> [u32; 6] {
        let mut extrema = [0_u32; 6];
        for (i, point) in self.points.iter().enumerate() {
            for axis in 0..3 {
                if point[axis] < self.points[extrema[axis * 2] as usize][axis] {
                    extrema[axis * 2] = i as u32;
                }
                if point[axis] > self.points[extrema[axis * 2 + 1] as usize][axis] {
                    extrema[axis * 2 + 1] = i as u32;
                }
            }
        }
        extrema
    }

    /// Choose the four seed vertices of the initial tetrahedron
    ///
    /// A, B: the farthest-apart pair of axis extrema. C: the extremum
    /// farthest from segment AB. D: the point (of all points) farthest from
    /// plane ABC. Errors if any stage collapses below tolerance.
    fn initial_simplex(&self) -> Result<[u32; 4], HullError> {
        let extrema = self.extreme_points();

        let (mut a, mut b) = (extrema[0], extrema[1]);
        let mut best = -1.0;
        for (i, &p) in extrema.iter().enumerate() {
            for &q in &extrema[i + 1..] {
                let d = (self.points[p as usize] - self.points[q as usize]).norm_squared();
                if d > best {
                    best = d;
                    a = p;
                    b = q;
                }
            }
        }
        if best <= self.tolerance * self.tolerance {
            return Err(HullError::Degenerate);
        }

        let mut c = a;
        best = -1.0;
        for &p in &extrema {
            if p == a || p == b {
                continue;
            }
            let d = segment_distance_squared(
                &self.points[p as usize],
                &self.points[a as usize],
                &self.points[b as usize],
            );
            if d > best {
                best = d;
                c = p;
            }
        }
        if c == a || best <= self.tolerance * self.tolerance {
            return Err(HullError::Degenerate);
        }

        let pa = self.points[a as usize];
        let normal = (self.points[b as usize] - pa).cross(&(self.points[c as usize] - pa));
        if normal.norm_squared() == 0.0 {
            return Err(HullError::Degenerate);
        }
        let normal = normal.normalize();
        let plane_offset = normal.dot(&pa.coords);

        let mut d = a;
        best = -1.0;
        for (i, point) in self.points.iter().enumerate() {
            let i = i as u32;
            if i == a || i == b || i == c {
                continue;
            }
            let dist = (normal.dot(&point.coords) - plane_offset).abs();
            if dist > best {
                best = dist;
                d = i;
            }
        }
        if d == a || best <= self.tolerance {
            return Err(HullError::Degenerate);
        }

        Ok([a, b, c, d])
    }

    /// Create the four outward-oriented faces of the seed tetrahedron
    ///
    /// If D sits in front of plane ABC, the base winding is reversed so
    /// every normal faces away from the tetrahedron's interior.
    fn seed_tetrahedron(&mut self, simplex: [u32; 4]) {
        let [a, mut b, mut c, d] = simplex;
        let pa = self.points[a as usize];
        let normal = (self.points[b as usize] - pa).cross(&(self.points[c as usize] - pa));
        if normal.dot(&(self.points[d as usize] - pa)) > 0.0 {
            std::mem::swap(&mut b, &mut c);
        }

        self.faces.push(Face::new(a, b, c, &self.points));
        self.faces.push(Face::new(d, b, a, &self.points));
        self.faces.push(Face::new(d, c, b, &self.points));
        self.faces.push(Face::new(d, a, c, &self.points));
    }

    /// Partition the remaining points into the seed faces' outside sets
    ///
    /// Each point goes to the first face that sees it; points behind all
    /// four planes are interior and permanently discarded.
    fn assign_initial_outside(&mut self, simplex: &[u32; 4]) {
        for i in 0..self.points.len() as u32 {
            if simplex.contains(&i) {
                continue;
            }
            let point = self.points[i as usize];
            for face in &mut self.faces {
                if face.distance(&point) > self.tolerance {
                    face.outside.push(i);
                    break;
                }
            }
        }
    }

    /// Map of directed edge -> owning alive face index
    fn edge_map(&self) -> HashMap<(u32, u32), usize> {
        let mut map = HashMap::with_capacity(self.faces.len() * 3);
        for (i, face) in self.faces.iter().enumerate() {
            if !face.alive {
                continue;
            }
            for edge in face.edges() {
                map.insert(edge, i);
            }
        }
        map
    }

    /// Iterate until no face retains an outside point
    fn expand(&mut self) {
        while let Some(face_idx) = self
            .faces
            .iter()
            .position(|f| f.alive && !f.outside.is_empty())
        {
            let apex = self.farthest_outside_point(face_idx);
            self.add_point(apex, face_idx);
        }
    }

    /// The outside point of `face_idx` farthest from its plane
    fn farthest_outside_point(&self, face_idx: usize) -> u32 {
        let face = &self.faces[face_idx];
        let mut best = face.outside[0];
        let mut best_dist = f64::MIN;
        for &i in &face.outside {
            let dist = face.distance(&self.points[i as usize]);
            if dist > best_dist {
                best_dist = dist;
                best = i;
            }
        }
        best
    }

    /// Lift `apex` onto the hull, replacing every face it can see
    fn add_point(&mut self, apex: u32, start_face: usize) {
        let apex_point = self.points[apex as usize];
        let edge_map = self.edge_map();

        // Flood-fill the visible set from the starting face across shared
        // edges; edges bordering a hidden face form the horizon.
        let mut visibility: HashMap<usize, bool> = HashMap::new();
        visibility.insert(start_face, true);
        let mut pending = vec![start_face];
        let mut visible = vec![start_face];
        let mut horizon = Vec::new();

        while let Some(face_idx) = pending.pop() {
            for (a, b) in self.faces[face_idx].edges() {
                let neighbor = edge_map[&(b, a)];
                let seen = *visibility.entry(neighbor).or_insert_with(|| {
                    self.faces[neighbor].distance(&apex_point) > self.tolerance
                });
                if seen {
                    if !visible.contains(&neighbor) {
                        visible.push(neighbor);
                        pending.push(neighbor);
                    }
                } else {
                    horizon.push((a, b));
                }
            }
        }

        // Pool the orphaned outside points and retire the visible faces.
        let mut orphans = Vec::new();
        for &face_idx in &visible {
            let face = &mut self.faces[face_idx];
            face.alive = false;
            orphans.extend(face.outside.drain(..).filter(|&i| i != apex));
        }

        // Fan new faces from the apex around the horizon. Each horizon edge
        // keeps its direction, so the new face winds consistently with the
        // retained neighbor.
        let first_new = self.faces.len();
        for &(a, b) in &horizon {
            self.faces.push(Face::new(a, b, apex, &self.points));
        }

        // Reassign orphans against only the new faces; the rest are interior.
        for i in orphans {
            let point = self.points[i as usize];
            for face in &mut self.faces[first_new..] {
                if face.distance(&point) > self.tolerance {
                    face.outside.push(i);
                    break;
                }
            }
        }
    }

    /// Compact surviving faces into the output hull
    ///
    /// Emits only the vertices referenced by alive faces, remapped to a
    /// dense index range with face windings preserved.
    fn compact(self) -> ConvexHull {
        let mut remap: HashMap<u32, u32> = HashMap::new();
        let mut vertices = Vec::new();
        let mut faces = Vec::new();

        for face in self.faces.into_iter().filter(|f| f.alive) {
            let indices = face.verts.map(|v| {
                *remap.entry(v).or_insert_with(|| {
                    vertices.push(self.points[v as usize]);
                    (vertices.len() - 1) as u32
                })
            });
            faces.push(HullFace {
                indices,
                normal: face.normal,
            });
        }

        ConvexHull { vertices, faces }
    }
}

/// Squared distance from `point` to segment `ab`
///
/// Uses the standard projection formula; a projection parameter outside
/// `[0, 1]` clamps to the nearer endpoint.
fn segment_distance_squared(point: &Point3, a: &Point3, b: &Point3) -> f64 {
    let ab = b - a;
    let ap = point - a;
    let denom = ab.norm_squared();
    if denom == 0.0 {
        return ap.norm_squared();
    }
    let t = (ap.dot(&ab) / denom).clamp(0.0, 1.0);
    (ap - ab * t).norm_squared()
}
