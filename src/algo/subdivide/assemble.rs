//! Output buffer assembly.

use bytemuck::{Pod, Zeroable};
use nalgebra::{Point2, Point3};

use super::points::{SubdivisionPoints, SurfacePoint};
use crate::mesh::{FaceId, RawMesh, Topology};

/// GPU vertex record: position followed by texture coordinate, tightly packed.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SubdividedVertex {
    /// Position (shader location 0, `Float32x3`).
    pub position: [f32; 3],
    /// Texture coordinate (shader location 1, `Float32x2`).
    pub texcoord: [f32; 2],
}

impl From<&SurfacePoint> for SubdividedVertex {
    fn from(p: &SurfacePoint) -> Self {
        Self {
            position: [p.position.x as f32, p.position.y as f32, p.position.z as f32],
            texcoord: [p.texcoord.x as f32, p.texcoord.y as f32],
        }
    }
}

/// Where each point class starts in the vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferLayout {
    /// Offset of the first face point (always 0).
    pub face_base: u32,
    /// Offset of the first edge point.
    pub edge_base: u32,
    /// Offset of the first vertex point.
    pub vertex_base: u32,
    /// Number of face points.
    pub face_points: u32,
    /// Number of edge points, seam duplicates included.
    pub edge_points: u32,
    /// Number of vertex points.
    pub vertex_points: u32,
}

/// Interleaved vertex buffer plus triangle index buffer, ready for upload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubdividedMesh {
    /// Name carried over from the input mesh.
    pub name: Option<String>,
    /// Face points, then edge points, then vertex points.
    pub vertices: Vec<SubdividedVertex>,
    /// 18 indices per input triangle.
    pub indices: Vec<u32>,
    /// Segment offsets within `vertices`.
    pub layout: BufferLayout,
}

impl SubdividedMesh {
    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// The vertex buffer as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The index buffer as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Reinterpret the output as input for another subdivision pass.
    ///
    /// Vertices become corners; coincident seam duplicates weld back together
    /// and their UV split is rediscovered on the edges.
    pub fn to_raw_mesh(&self) -> RawMesh {
        RawMesh {
            name: self.name.clone(),
            positions: self
                .vertices
                .iter()
                .map(|v| Point3::new(v.position[0], v.position[1], v.position[2]))
                .collect(),
            texcoords: self
                .vertices
                .iter()
                .map(|v| Point2::new(v.texcoord[0], v.texcoord[1]))
                .collect(),
            indices: self.indices.clone(),
        }
    }
}

/// Concatenate the point classes and emit six triangles per input face.
///
/// For each corner `p` of face `i`, with `after` the edge point towards the
/// next corner and `before` the edge point from the previous one, the quad
/// around `p` is emitted as the triangles `(face, before, vertex)` and
/// `(face, vertex, after)`. Both keep the winding of the input triangle. On a
/// seam edge the face picks its own edge point.
pub fn assemble(topology: &Topology, points: &SubdivisionPoints) -> SubdividedMesh {
    let face_count = points.face_points.len() as u32;
    let edge_count = points.edge_points.len() as u32;
    let layout = BufferLayout {
        face_base: 0,
        edge_base: face_count,
        vertex_base: face_count + edge_count,
        face_points: face_count,
        edge_points: edge_count,
        vertex_points: points.vertex_points.len() as u32,
    };

    let mut vertices = Vec::with_capacity(
        points.face_points.len() + points.edge_points.len() + points.vertex_points.len(),
    );
    vertices.extend(points.face_points.iter().map(SubdividedVertex::from));
    vertices.extend(points.edge_points.iter().map(SubdividedVertex::from));
    vertices.extend(points.vertex_points.iter().map(SubdividedVertex::from));

    let mut indices = Vec::with_capacity(topology.num_faces() * 18);

    for (fi, face) in topology.faces().iter().enumerate() {
        let face_id = FaceId::new(fi);
        let fp = layout.face_base + fi as u32;
        let edge_point =
            |k: usize| layout.edge_base + points.edge_point_for(topology, face.edges[k], face_id);

        for k in 0..3 {
            // edges[k] leaves corner k, edges[k - 1] enters it
            let after = edge_point(k);
            let before = edge_point((k + 2) % 3);
            let vp = layout.vertex_base + face.points[k].raw();

            indices.extend_from_slice(&[fp, before, vp, fp, vp, after]);
        }
    }

    SubdividedMesh {
        name: None,
        vertices,
        indices,
        layout,
    }
}
