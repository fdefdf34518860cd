//! Face, edge and vertex point rules.
//!
//! Positions are accumulated in `f64` and only narrowed to `f32` when the
//! output buffer is assembled.

use nalgebra::{Point2, Point3, Vector2, Vector3};

use crate::error::{Result, SubdivisionError};
use crate::mesh::{Edge, EdgeId, FaceId, PointId, RawMesh, Topology};

/// A generated vertex: position plus texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    /// Position.
    pub position: Point3<f64>,
    /// Texture coordinate.
    pub texcoord: Point2<f64>,
}

/// The edge point(s) generated for one edge, as indices into
/// [`SubdivisionPoints::edge_points`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePoints {
    /// One point used by every incident face.
    Shared(u32),
    /// A UV seam crosses the edge: `a` belongs to `face_a`, `b` to `face_b`.
    Split {
        /// Point used by the edge's first face.
        a: u32,
        /// Point used by the edge's second face.
        b: u32,
    },
}

impl EdgePoints {
    /// The edge point `face` must reference.
    #[inline]
    pub fn for_face(self, edge: &Edge, face: FaceId) -> u32 {
        match self {
            EdgePoints::Shared(i) => i,
            EdgePoints::Split { a, b } => {
                if edge.face_a == face {
                    a
                } else {
                    b
                }
            }
        }
    }

    /// Number of points this edge emitted.
    #[inline]
    pub fn count(self) -> usize {
        match self {
            EdgePoints::Shared(_) => 1,
            EdgePoints::Split { .. } => 2,
        }
    }
}

/// The three point classes of one subdivision step.
#[derive(Debug, Clone)]
pub struct SubdivisionPoints {
    /// One per face, in face order.
    pub face_points: Vec<SurfacePoint>,
    /// One or two per edge, in edge order (`a` before `b` for split edges).
    pub edge_points: Vec<SurfacePoint>,
    /// Which edge points each edge owns, indexed by [`EdgeId`].
    pub edge_slots: Vec<EdgePoints>,
    /// One per welded point, in point order.
    pub vertex_points: Vec<SurfacePoint>,
}

impl SubdivisionPoints {
    /// The edge point index `face` uses on `edge`.
    #[inline]
    pub fn edge_point_for(&self, topology: &Topology, edge: EdgeId, face: FaceId) -> u32 {
        self.edge_slots[edge.index()].for_face(topology.edge(edge), face)
    }

    /// Number of edges split by a UV seam.
    pub fn seam_count(&self) -> usize {
        self.edge_slots
            .iter()
            .filter(|s| matches!(s, EdgePoints::Split { .. }))
            .count()
    }
}

#[inline]
fn position(mesh: &RawMesh, corner: u32) -> Vector3<f64> {
    mesh.positions[corner as usize].coords.cast::<f64>()
}

#[inline]
fn texcoord(mesh: &RawMesh, corner: u32) -> Vector2<f64> {
    mesh.texcoords[corner as usize].coords.cast::<f64>()
}

fn uv_midpoint(mesh: &RawMesh, corners: [u32; 2]) -> Point2<f64> {
    Point2::from((texcoord(mesh, corners[0]) + texcoord(mesh, corners[1])) * 0.5)
}

fn uv_close(a: &Point2<f64>, b: &Point2<f64>, epsilon: f64) -> bool {
    (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon
}

/// Compute face, edge and vertex points for a welded mesh.
///
/// `uv_epsilon` decides when the two UV midpoints of an interior edge count
/// as equal; edges whose midpoints differ by more get two edge points.
pub fn compute_points(mesh: &RawMesh, topology: &Topology, uv_epsilon: f64) -> Result<SubdivisionPoints> {
    let face_points = compute_face_points(mesh, topology);
    let centers = compute_edge_centers(topology);
    let (edge_points, edge_slots) =
        compute_edge_points(mesh, topology, &face_points, &centers, uv_epsilon);
    let vertex_points = compute_vertex_points(mesh, topology, &face_points, &centers)?;

    Ok(SubdivisionPoints {
        face_points,
        edge_points,
        edge_slots,
        vertex_points,
    })
}

/// Centroid of each face, in position and in UV.
fn compute_face_points(mesh: &RawMesh, topology: &Topology) -> Vec<SurfacePoint> {
    topology
        .faces()
        .iter()
        .map(|face| {
            let p: Vector3<f64> = face.corners.iter().map(|&c| position(mesh, c)).sum();
            let uv: Vector2<f64> = face.corners.iter().map(|&c| texcoord(mesh, c)).sum();
            SurfacePoint {
                position: Point3::from(p / 3.0),
                texcoord: Point2::from(uv / 3.0),
            }
        })
        .collect()
}

/// Midpoint of each edge's welded endpoints.
fn compute_edge_centers(topology: &Topology) -> Vec<Vector3<f64>> {
    topology
        .edges()
        .iter()
        .map(|edge| {
            let p0 = topology.point(edge.points[0]).position.coords.cast::<f64>();
            let p1 = topology.point(edge.points[1]).position.coords.cast::<f64>();
            (p0 + p1) * 0.5
        })
        .collect()
}

fn compute_edge_points(
    mesh: &RawMesh,
    topology: &Topology,
    face_points: &[SurfacePoint],
    centers: &[Vector3<f64>],
    uv_epsilon: f64,
) -> (Vec<SurfacePoint>, Vec<EdgePoints>) {
    let mut points = Vec::with_capacity(topology.num_edges());
    let mut slots = Vec::with_capacity(topology.num_edges());

    for (edge, center) in topology.edges().iter().zip(centers) {
        let uv_a = uv_midpoint(mesh, edge.corners_a);

        let Some((face_b, corners_b)) = edge.face_b else {
            // Boundary edge: plain midpoint
            slots.push(EdgePoints::Shared(points.len() as u32));
            points.push(SurfacePoint {
                position: Point3::from(*center),
                texcoord: uv_a,
            });
            continue;
        };

        let fa = face_points[edge.face_a.index()].position.coords;
        let fb = face_points[face_b.index()].position.coords;
        let position = Point3::from((center * 2.0 + fa + fb) / 4.0);
        let uv_b = uv_midpoint(mesh, corners_b);

        let a = points.len() as u32;
        points.push(SurfacePoint {
            position,
            texcoord: uv_a,
        });

        if uv_close(&uv_a, &uv_b, uv_epsilon) {
            slots.push(EdgePoints::Shared(a));
        } else {
            points.push(SurfacePoint {
                position,
                texcoord: uv_b,
            });
            slots.push(EdgePoints::Split { a, b: a + 1 });
        }
    }

    (points, slots)
}

fn compute_vertex_points(
    mesh: &RawMesh,
    topology: &Topology,
    face_points: &[SurfacePoint],
    centers: &[Vector3<f64>],
) -> Result<Vec<SurfacePoint>> {
    let mut out = Vec::with_capacity(topology.num_points());

    for (pi, point) in topology.points().iter().enumerate() {
        let n = point.valence();
        if n == 0 {
            return Err(SubdivisionError::DegenerateVertex { point: pi });
        }

        let s = point.position.coords.cast::<f64>();
        let uv = Point2::from(texcoord(mesh, point.corner));

        let new_pos = if point.is_boundary() {
            let mut neighbors = point
                .edges
                .iter()
                .map(|&e| topology.edge(e))
                .filter(|e| e.is_boundary())
                .map(|e| e.other(PointId::new(pi)));

            match (neighbors.next(), neighbors.next(), neighbors.next()) {
                (Some(a), Some(b), None) => {
                    // Boundary vertex: 3/4 * v + 1/8 * (left + right)
                    let pa = topology.point(a).position.coords.cast::<f64>();
                    let pb = topology.point(b).position.coords.cast::<f64>();
                    Point3::from((s * 6.0 + pa + pb) / 8.0)
                }
                // Where several open fans meet, the point is pinned as a corner
                _ => Point3::from(s),
            }
        } else {
            // Interior vertex: (Q + 2R + (n-3)S) / n
            let q: Vector3<f64> = point
                .faces
                .iter()
                .map(|&f| face_points[f.index()].position.coords)
                .sum::<Vector3<f64>>()
                / point.faces.len() as f64;

            let r: Vector3<f64> = point
                .edges
                .iter()
                .map(|&e| centers[e.index()])
                .sum::<Vector3<f64>>()
                / n as f64;

            let n_f = n as f64;
            Point3::from((q + r * 2.0 + s * (n_f - 3.0)) / n_f)
        };

        out.push(SurfacePoint {
            position: new_pos,
            texcoord: uv,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_topology, weld, WeldMode};

    fn prepare(positions: &[[f32; 3]], texcoords: &[[f32; 2]], indices: &[u32]) -> (RawMesh, Topology) {
        let mesh = RawMesh::new(
            positions.iter().map(|p| Point3::new(p[0], p[1], p[2])).collect(),
            texcoords.iter().map(|t| Point2::new(t[0], t[1])).collect(),
            indices.to_vec(),
        );
        mesh.validate().unwrap();
        let welding = weld(&mesh.positions, WeldMode::Exact);
        let topology = build_topology(&mesh, &welding).unwrap();
        (mesh, topology)
    }

    fn assert_close(a: &Point3<f64>, b: &Point3<f64>) {
        assert!((a - b).norm() < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_single_triangle_points() {
        let (mesh, topo) = prepare(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            &[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            &[0, 1, 2],
        );
        let pts = compute_points(&mesh, &topo, 1e-6).unwrap();

        assert_eq!(pts.face_points.len(), 1);
        assert_close(&pts.face_points[0].position, &Point3::new(1.0 / 3.0, 1.0 / 3.0, 0.0));
        assert!((pts.face_points[0].texcoord - Point2::new(1.0 / 3.0, 1.0 / 3.0)).norm() < 1e-9);

        // Every edge is a boundary edge: plain midpoints
        assert_eq!(pts.edge_points.len(), 3);
        assert_eq!(pts.seam_count(), 0);
        for (edge, slot) in topo.edges().iter().zip(&pts.edge_slots) {
            let EdgePoints::Shared(i) = *slot else {
                panic!("boundary edge split");
            };
            let p0 = topo.point(edge.points[0]).position.cast::<f64>();
            let p1 = topo.point(edge.points[1]).position.cast::<f64>();
            assert_close(&pts.edge_points[i as usize].position, &Point3::from((p0.coords + p1.coords) * 0.5));
        }

        // Boundary rule: (6p + pA + pB) / 8
        assert_close(&pts.vertex_points[0].position, &Point3::new(1.0 / 8.0, 1.0 / 8.0, 0.0));
        assert_close(&pts.vertex_points[1].position, &Point3::new(6.0 / 8.0, 1.0 / 8.0, 0.0));
        assert_close(&pts.vertex_points[2].position, &Point3::new(1.0 / 8.0, 6.0 / 8.0, 0.0));

        // Texcoords pass through
        assert_eq!(pts.vertex_points[1].texcoord, Point2::new(1.0, 0.0));
    }

    #[test]
    fn test_interior_edge_four_point_rule() {
        // Quad ABCD split along AC
        let (mesh, topo) = prepare(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            &[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            &[0, 1, 2, 0, 2, 3],
        );
        let pts = compute_points(&mesh, &topo, 1e-6).unwrap();

        let ac = topo.edge_between(PointId::new(0), PointId::new(2)).unwrap();
        let EdgePoints::Shared(i) = pts.edge_slots[ac.index()] else {
            panic!("uniform UVs must not split");
        };
        // center (0.5,0.5), face points (2/3,1/3) and (1/3,2/3)
        let expected = (Vector3::new(1.0, 1.0, 0.0) + Vector3::new(2.0 / 3.0, 1.0 / 3.0, 0.0)
            + Vector3::new(1.0 / 3.0, 2.0 / 3.0, 0.0))
            / 4.0;
        assert_close(&pts.edge_points[i as usize].position, &Point3::from(expected));
        assert_close(&pts.edge_points[i as usize].position, &Point3::new(0.5, 0.5, 0.0));

        // A: boundary rule with neighbours B and D
        assert_close(&pts.vertex_points[0].position, &Point3::new(1.0 / 8.0, 1.0 / 8.0, 0.0));
        // B: neighbours A and C
        assert_close(&pts.vertex_points[1].position, &Point3::new(7.0 / 8.0, 1.0 / 8.0, 0.0));
    }

    #[test]
    fn test_seam_splits_edge_point() {
        // P=(0,0,0) Q=(1,0,0); face 1 above, face 2 below with wrapped UVs
        let (mesh, topo) = prepare(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.5, 1.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 0.0, 0.0],
                [0.5, -1.0, 0.0],
            ],
            &[[0.0, 0.0], [1.0, 0.0], [0.5, 0.5], [1.0, 1.0], [0.0, 1.0], [0.5, 0.5]],
            &[0, 1, 2, 3, 4, 5],
        );
        let pts = compute_points(&mesh, &topo, 1e-6).unwrap();
        assert_eq!(pts.seam_count(), 1);
        assert_eq!(pts.edge_points.len(), 5 + 1);

        let pq = topo.edge_between(PointId::new(0), PointId::new(1)).unwrap();
        let slot = pts.edge_slots[pq.index()];
        assert_eq!(slot.count(), 2);

        let ia = pts.edge_point_for(&topo, pq, FaceId::new(0)) as usize;
        let ib = pts.edge_point_for(&topo, pq, FaceId::new(1)) as usize;
        assert_ne!(ia, ib);
        assert_eq!(pts.edge_points[ia].position, pts.edge_points[ib].position);
        assert_eq!(pts.edge_points[ia].texcoord, Point2::new(0.5, 0.0));
        assert_eq!(pts.edge_points[ib].texcoord, Point2::new(0.5, 1.0));
    }

    #[test]
    fn test_uv_epsilon_merges_near_equal_midpoints() {
        let (mesh, topo) = prepare(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.5, 1.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 0.0, 0.0],
                [0.5, -1.0, 0.0],
            ],
            &[[0.0, 0.0], [1.0, 0.0], [0.5, 0.5], [1.0, 0.001], [0.0, 0.0], [0.5, 0.5]],
            &[0, 1, 2, 3, 4, 5],
        );
        assert_eq!(compute_points(&mesh, &topo, 1e-6).unwrap().seam_count(), 1);
        assert_eq!(compute_points(&mesh, &topo, 1e-2).unwrap().seam_count(), 0);
    }

    #[test]
    fn test_closed_mesh_uses_interior_rule() {
        // Regular octahedron: every vertex has valence 4
        let (mesh, topo) = prepare(
            &[
                [1.0, 0.0, 0.0],
                [-1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, -1.0, 0.0],
                [0.0, 0.0, 1.0],
                [0.0, 0.0, -1.0],
            ],
            &[[0.0, 0.0]; 6],
            &[
                0, 2, 4, 2, 1, 4, 1, 3, 4, 3, 0, 4, 2, 0, 5, 1, 2, 5, 3, 1, 5, 0, 3, 5,
            ],
        );
        assert!(topo.is_closed());
        let pts = compute_points(&mesh, &topo, 1e-6).unwrap();

        // Q = v / 3, R = v / 2, so (Q + 2R + S) / 4 = 7/12 * v
        assert_close(&pts.vertex_points[0].position, &Point3::new(7.0 / 12.0, 0.0, 0.0));
        assert_close(&pts.vertex_points[5].position, &Point3::new(0.0, 0.0, -7.0 / 12.0));
    }

    #[test]
    fn test_bowtie_point_is_pinned() {
        // Two triangles touching only at the origin
        let (mesh, topo) = prepare(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 0.0, 0.0],
                [-1.0, 0.0, 0.0],
                [-1.0, -1.0, 0.0],
            ],
            &[[0.0, 0.0]; 6],
            &[0, 1, 2, 3, 4, 5],
        );
        let pts = compute_points(&mesh, &topo, 1e-6).unwrap();
        assert_eq!(topo.point(PointId::new(0)).valence(), 4);
        assert_close(&pts.vertex_points[0].position, &Point3::origin());
    }
}
