//! Input mesh representation.

use nalgebra::{Point2, Point3};

use crate::error::{InputDefect, Result};

/// A de-indexed triangle mesh as handed over by a model loader.
///
/// Every array is indexed by *corner id*: `positions[c]` and `texcoords[c]`
/// describe corner `c`, and `indices` lists three corner ids per triangle in
/// winding order. Corners that share a position are merged later by the
/// welder, so loaders do not need to deduplicate anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMesh {
    /// Optional name, usually the source primitive's mesh name.
    pub name: Option<String>,
    /// Corner positions.
    pub positions: Vec<Point3<f32>>,
    /// Corner texture coordinates.
    pub texcoords: Vec<Point2<f32>>,
    /// Triangle corner ids, three per triangle.
    pub indices: Vec<u32>,
}

impl RawMesh {
    /// Create a mesh from attribute vectors.
    pub fn new(positions: Vec<Point3<f32>>, texcoords: Vec<Point2<f32>>, indices: Vec<u32>) -> Self {
        Self {
            name: None,
            positions,
            texcoords,
            indices,
        }
    }

    /// Create a mesh from flat `[x, y, z, ...]` and `[u, v, ...]` arrays.
    ///
    /// # Example
    /// ```
    /// use quilt::mesh::RawMesh;
    ///
    /// let mesh = RawMesh::from_flat(
    ///     &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    ///     &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
    ///     &[0, 1, 2],
    /// )
    /// .unwrap();
    /// assert_eq!(mesh.num_triangles(), 1);
    /// ```
    pub fn from_flat(positions: &[f32], texcoords: &[f32], indices: &[u32]) -> Result<Self> {
        if positions.len() % 3 != 0 {
            return Err(InputDefect::FlatArity {
                attribute: "position",
                len: positions.len(),
                arity: 3,
            }
            .into());
        }
        if texcoords.len() % 2 != 0 {
            return Err(InputDefect::FlatArity {
                attribute: "texcoord",
                len: texcoords.len(),
                arity: 2,
            }
            .into());
        }

        let positions = positions
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        let texcoords = texcoords
            .chunks_exact(2)
            .map(|c| Point2::new(c[0], c[1]))
            .collect();

        Ok(Self::new(positions, texcoords, indices.to_vec()))
    }

    /// Attach a name to the mesh.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Number of corners (entries in the attribute arrays).
    #[inline]
    pub fn num_corners(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over triangles as corner-id triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Check the structural invariants the engine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(InputDefect::IndexCount {
                len: self.indices.len(),
            }
            .into());
        }
        if self.indices.is_empty() {
            return Err(InputDefect::Empty.into());
        }
        if self.positions.len() != self.texcoords.len() {
            return Err(InputDefect::AttributeLength {
                positions: self.positions.len(),
                texcoords: self.texcoords.len(),
            }
            .into());
        }

        let corners = self.num_corners();
        for (face, tri) in self.triangles().enumerate() {
            for corner in tri {
                if corner as usize >= corners {
                    return Err(InputDefect::CornerOutOfRange {
                        face,
                        corner: corner as usize,
                        corners,
                    }
                    .into());
                }
            }
        }

        if let Some(corner) = self
            .positions
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return Err(InputDefect::NonFinitePosition { corner }.into());
        }

        Ok(())
    }
}
