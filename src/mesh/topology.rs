//! Face/edge/point adjacency for welded triangle meshes.
//!
//! All relations are ids into flat arrays: points know their incident edges
//! and faces, edges know their (at most two) faces, faces know their points
//! and edges. Nothing points back by reference, so the whole structure is a
//! plain arena that is dropped in one go after subdivision.

use nalgebra::Point3;

use super::index::{EdgeId, FaceId, PointId};
use super::raw::RawMesh;
use super::weld::Welding;
use crate::error::{InputDefect, Result, SubdivisionError};

/// A welded point and its adjacency.
#[derive(Debug, Clone)]
pub struct Point {
    /// Position, taken from the first corner that produced the point.
    pub position: Point3<f32>,
    /// The first corner that produced the point.
    pub corner: u32,
    /// Incident edges.
    pub edges: Vec<EdgeId>,
    /// Incident faces.
    pub faces: Vec<FaceId>,
}

impl Point {
    /// Number of incident edges.
    #[inline]
    pub fn valence(&self) -> usize {
        self.edges.len()
    }

    /// A point is on a boundary (or crease) when fewer faces than edges meet there.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.faces.len() < self.edges.len()
    }
}

/// An undirected edge between two welded points.
///
/// `corners_a` (and the corners stored with `face_b`) are the original corner
/// ids each face used for this edge, ordered like `points`. Two faces can
/// reach the same geometric edge through different corners, which is how UV
/// seams show up.
#[derive(Debug, Clone)]
pub struct Edge {
    /// The two endpoints, in the order the first face met them.
    pub points: [PointId; 2],
    /// The face that created the edge.
    pub face_a: FaceId,
    /// Corners of `face_a` at `points[0]` and `points[1]`.
    pub corners_a: [u32; 2],
    /// The second face and its corners at `points[0]` and `points[1]`.
    pub face_b: Option<(FaceId, [u32; 2])>,
}

impl Edge {
    /// Returns true if only one face touches this edge.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.face_b.is_none()
    }

    /// The endpoint opposite `p`.
    #[inline]
    pub fn other(&self, p: PointId) -> PointId {
        if self.points[0] == p {
            self.points[1]
        } else {
            self.points[0]
        }
    }

    /// Returns true if `p` is one of the endpoints.
    #[inline]
    pub fn touches(&self, p: PointId) -> bool {
        self.points[0] == p || self.points[1] == p
    }

    /// The corners `face` used for this edge, if it is incident.
    pub fn corners_for(&self, face: FaceId) -> Option<[u32; 2]> {
        if self.face_a == face {
            return Some(self.corners_a);
        }
        match self.face_b {
            Some((f, corners)) if f == face => Some(corners),
            _ => None,
        }
    }
}

/// An original triangle.
#[derive(Debug, Clone, Copy)]
pub struct Face {
    /// Welded points in winding order.
    pub points: [PointId; 3],
    /// Original corner ids in winding order.
    pub corners: [u32; 3],
    /// `edges[k]` joins `points[k]` and `points[(k + 1) % 3]`.
    pub edges: [EdgeId; 3],
}

/// Adjacency for a welded triangle mesh.
#[derive(Debug, Clone)]
pub struct Topology {
    points: Vec<Point>,
    edges: Vec<Edge>,
    faces: Vec<Face>,
}

impl Topology {
    /// Number of welded points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get a point.
    #[inline]
    pub fn point(&self, id: PointId) -> &Point {
        &self.points[id.index()]
    }

    /// Get an edge.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Get a face.
    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.index()]
    }

    /// All points, indexed by [`PointId`].
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// All edges, indexed by [`EdgeId`].
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// All faces, indexed by [`FaceId`].
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Find the edge joining two points.
    pub fn edge_between(&self, p: PointId, q: PointId) -> Option<EdgeId> {
        self.point(p)
            .edges
            .iter()
            .copied()
            .find(|&e| self.edge(e).other(p) == q)
    }

    /// Number of edges with a single incident face.
    pub fn boundary_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_boundary()).count()
    }

    /// Returns true if the mesh has no boundary edges.
    pub fn is_closed(&self) -> bool {
        self.boundary_edge_count() == 0
    }
}

/// Pairs of face slots in the order edges are discovered: AB, AC, BC.
/// The third element is the winding slot the edge occupies in [`Face::edges`].
const FACE_PAIRS: [(usize, usize, usize); 3] = [(0, 1, 0), (0, 2, 2), (1, 2, 1)];

/// Build the face, edge and point adjacency of a welded mesh.
///
/// `mesh` must already have passed [`RawMesh::validate`], and `welding` must
/// have been computed from its positions.
///
/// # Errors
///
/// - [`InputDefect::CollapsedTriangle`] if two corners of a triangle weld together.
/// - [`SubdivisionError::NonManifoldTopology`] if a third face meets an edge.
/// - [`SubdivisionError::DegenerateVertex`] if a welded point is not used by any triangle.
pub fn build_topology(mesh: &RawMesh, welding: &Welding) -> Result<Topology> {
    let mut points: Vec<Point> = welding
        .point_to_corner()
        .iter()
        .map(|&corner| Point {
            position: mesh.positions[corner as usize],
            corner,
            edges: Vec::new(),
            faces: Vec::new(),
        })
        .collect();

    let num_faces = mesh.num_triangles();
    let mut faces: Vec<Face> = Vec::with_capacity(num_faces);
    // Euler: a closed triangle mesh has 3F/2 edges, an open one at most 3F
    let mut edges: Vec<Edge> = Vec::with_capacity(num_faces * 3 / 2 + 3);

    for (fi, corners) in mesh.triangles().enumerate() {
        let face_id = FaceId::new(fi);
        let tri = corners.map(|c| welding.point_of(c));

        if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
            return Err(InputDefect::CollapsedTriangle { face: fi }.into());
        }

        let mut face_edges = [EdgeId::new(0); 3];

        for (i, j, slot) in FACE_PAIRS {
            let (p, q) = (tri[i], tri[j]);
            let (cp, cq) = (corners[i], corners[j]);

            // Scan whichever endpoint has the shorter incident list
            let (scan, target) = if points[p.index()].edges.len() <= points[q.index()].edges.len() {
                (p, q)
            } else {
                (q, p)
            };
            let existing = points[scan.index()]
                .edges
                .iter()
                .copied()
                .find(|&e| edges[e.index()].other(scan) == target);

            let edge_id = match existing {
                Some(edge_id) => {
                    let edge = &mut edges[edge_id.index()];
                    if edge.face_b.is_some() {
                        return Err(SubdivisionError::NonManifoldTopology {
                            p0: edge.points[0].index(),
                            p1: edge.points[1].index(),
                            face: fi,
                        });
                    }
                    let aligned = if edge.points[0] == p { [cp, cq] } else { [cq, cp] };
                    edge.face_b = Some((face_id, aligned));
                    edge_id
                }
                None => {
                    let edge_id = EdgeId::new(edges.len());
                    edges.push(Edge {
                        points: [p, q],
                        face_a: face_id,
                        corners_a: [cp, cq],
                        face_b: None,
                    });
                    points[p.index()].edges.push(edge_id);
                    points[q.index()].edges.push(edge_id);
                    edge_id
                }
            };
            face_edges[slot] = edge_id;
        }

        for p in tri {
            points[p.index()].faces.push(face_id);
        }

        faces.push(Face {
            points: tri,
            corners,
            edges: face_edges,
        });
    }

    if let Some(point) = points.iter().position(|p| p.edges.is_empty()) {
        return Err(SubdivisionError::DegenerateVertex { point });
    }

    log::debug!(
        "topology: {} points, {} edges ({} boundary), {} faces",
        points.len(),
        edges.len(),
        edges.iter().filter(|e| e.is_boundary()).count(),
        faces.len()
    );

    Ok(Topology {
        points,
        edges,
        faces,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::weld::{weld, WeldMode};
    use nalgebra::Point2;

    fn build(positions: &[[f32; 3]], indices: &[u32]) -> Result<Topology> {
        let mesh = RawMesh::new(
            positions.iter().map(|p| Point3::new(p[0], p[1], p[2])).collect(),
            vec![Point2::origin(); positions.len()],
            indices.to_vec(),
        );
        mesh.validate()?;
        let welding = weld(&mesh.positions, WeldMode::Exact);
        build_topology(&mesh, &welding)
    }

    fn quad() -> Topology {
        // A(0,0) B(1,0) C(1,1) D(0,1), triangles ABC and ACD
        build(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            &[0, 1, 2, 0, 2, 3],
        )
        .unwrap()
    }

    #[test]
    fn test_single_triangle() {
        let topo = build(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], &[0, 1, 2]).unwrap();
        assert_eq!(topo.num_points(), 3);
        assert_eq!(topo.num_edges(), 3);
        assert_eq!(topo.num_faces(), 1);
        assert_eq!(topo.boundary_edge_count(), 3);
        assert!(!topo.is_closed());

        for p in topo.points() {
            assert_eq!(p.valence(), 2);
            assert_eq!(p.faces.len(), 1);
            assert!(p.is_boundary());
        }
    }

    #[test]
    fn test_face_edges_follow_winding() {
        let topo = quad();
        for face in topo.faces() {
            for k in 0..3 {
                let edge = topo.edge(face.edges[k]);
                assert!(edge.touches(face.points[k]));
                assert!(edge.touches(face.points[(k + 1) % 3]));
            }
        }
    }

    #[test]
    fn test_shared_edge_gets_second_face() {
        let topo = quad();
        assert_eq!(topo.num_edges(), 5);
        assert_eq!(topo.boundary_edge_count(), 4);

        let a = PointId::new(0);
        let c = PointId::new(2);
        let ac = topo.edge_between(a, c).expect("diagonal edge");
        let edge = topo.edge(ac);
        assert_eq!(edge.face_a, FaceId::new(0));
        let (face_b, corners_b) = edge.face_b.expect("interior edge");
        assert_eq!(face_b, FaceId::new(1));
        assert_eq!(edge.corners_a, [0, 2]);
        assert_eq!(corners_b, [0, 2]);

        // A and C: 3 edges, 2 faces. B and D: 2 edges, 1 face.
        assert_eq!(topo.point(a).valence(), 3);
        assert_eq!(topo.point(a).faces.len(), 2);
        assert_eq!(topo.point(PointId::new(1)).valence(), 2);
        assert!(topo.points().iter().all(|p| p.is_boundary()));
    }

    #[test]
    fn test_corners_aligned_with_points() {
        // Second face walks the shared edge in the opposite direction, through its own corners
        let topo = build(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 0.0, 0.0],
                [0.0, -1.0, 0.0],
            ],
            &[0, 1, 2, 3, 4, 5],
        )
        .unwrap();
        assert_eq!(topo.num_points(), 4);

        let edge = topo
            .edge_between(PointId::new(0), PointId::new(1))
            .map(|e| topo.edge(e))
            .unwrap();
        assert_eq!(edge.points, [PointId::new(0), PointId::new(1)]);
        assert_eq!(edge.corners_a, [0, 1]);
        assert_eq!(edge.corners_for(FaceId::new(1)), Some([4, 3]));
        assert_eq!(edge.corners_for(FaceId::new(7)), None);
    }

    #[test]
    fn test_closed_tetrahedron() {
        let topo = build(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0], [0.5, 0.5, 1.0]],
            &[0, 2, 1, 0, 1, 3, 1, 2, 3, 2, 0, 3],
        )
        .unwrap();
        assert_eq!(topo.num_edges(), 6);
        assert!(topo.is_closed());
        assert!(topo.points().iter().all(|p| !p.is_boundary()));
    }

    #[test]
    fn test_third_face_is_non_manifold() {
        // Three triangles hinged on the edge (0,1)
        let result = build(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.5, 1.0, 0.0],
                [0.5, -1.0, 0.0],
                [0.5, 0.0, 1.0],
            ],
            &[0, 1, 2, 1, 0, 3, 0, 1, 4],
        );
        match result {
            Err(SubdivisionError::NonManifoldTopology { face, .. }) => assert_eq!(face, 2),
            other => panic!("expected NonManifoldTopology, got {:?}", other),
        }
    }

    #[test]
    fn test_unreferenced_point_is_degenerate() {
        let result = build(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [5.0, 5.0, 5.0]],
            &[0, 1, 2],
        );
        match result {
            Err(SubdivisionError::DegenerateVertex { point }) => assert_eq!(point, 3),
            other => panic!("expected DegenerateVertex, got {:?}", other),
        }
    }

    #[test]
    fn test_collapsed_triangle() {
        let result = build(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]],
            &[0, 1, 2],
        );
        assert!(matches!(
            result,
            Err(SubdivisionError::InvalidInputMesh(InputDefect::CollapsedTriangle { face: 0 }))
        ));
    }
}
