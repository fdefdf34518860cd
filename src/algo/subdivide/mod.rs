//! Seam-aware Catmull-Clark subdivision of triangle meshes.
//!
//! One subdivision pass runs four stages over a [`RawMesh`]:
//!
//! 1. **Weld** corners sharing a position into points ([`crate::mesh::weld`])
//! 2. **Build topology**: faces, edges with up to two faces, point adjacency
//! 3. **Generate points**:
//!    - *face point*: centroid of the triangle (position and UV)
//!    - *edge point*: midpoint on boundary edges, otherwise
//!      `(2·midpoint + fp_a + fp_b) / 4`; split in two when the faces
//!      disagree on the edge's UV (a seam)
//!    - *vertex point*: `(Q + 2R + (n-3)S) / n` inside the surface,
//!      `(6S + left + right) / 8` on a boundary
//! 4. **Assemble**: face points, then edge points, then vertex points in one
//!    vertex buffer; every triangle becomes three quads (six triangles)
//!    around its centroid
//!
//! The output of a pass is itself a valid input, so several iterations can be
//! chained with [`SubdivideOptions::iterations`].
//!
//! # Example
//!
//! ```
//! use quilt::algo::subdivide::{subdivide, SubdivideOptions};
//! use quilt::mesh::RawMesh;
//!
//! let mesh = RawMesh::from_flat(
//!     &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
//!     &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
//!     &[0, 1, 2],
//! )
//! .unwrap();
//!
//! let out = subdivide(&mesh, &SubdivideOptions::new(1)).unwrap();
//! assert_eq!(out.num_vertices(), 7);
//! assert_eq!(out.indices.len(), 18);
//! ```
//!
//! # References
//!
//! - Catmull, E. & Clark, J. (1978). "Recursively generated B-spline surfaces
//!   on arbitrary topological meshes." Computer-Aided Design, 10(6), 350-355.

mod assemble;
mod points;

pub use assemble::{assemble, BufferLayout, SubdividedMesh, SubdividedVertex};
pub use points::{compute_points, EdgePoints, SubdivisionPoints, SurfacePoint};

use rayon::prelude::*;

use crate::algo::Progress;
use crate::error::{Result, SubdivisionError};
use crate::mesh::{build_topology, weld, RawMesh, WeldMode};

/// Stages reported per pass by [`subdivide_with_progress`].
const STAGES: usize = 4;

/// Options for subdivision.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Number of subdivision passes (at least 1).
    pub iterations: usize,

    /// How corner positions are welded into points.
    pub weld: WeldMode,

    /// Largest per-axis UV difference at which two faces still agree on an
    /// edge's texture coordinate.
    pub uv_epsilon: f64,

    /// Refuse to run if the final triangle count would exceed this.
    pub max_triangles: usize,

    /// Whether [`subdivide_batch`] processes meshes in parallel (default: true).
    pub parallel: bool,
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self {
            iterations: 1,
            weld: WeldMode::Exact,
            uv_epsilon: 1e-6,
            max_triangles: 50_000_000,
            parallel: true,
        }
    }
}

impl SubdivideOptions {
    /// Create options with the specified number of iterations.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }

    /// Set the welding mode.
    pub fn with_weld(mut self, weld: WeldMode) -> Self {
        self.weld = weld;
        self
    }

    /// Set the UV comparison tolerance.
    pub fn with_uv_epsilon(mut self, uv_epsilon: f64) -> Self {
        self.uv_epsilon = uv_epsilon;
        self
    }

    /// Set the triangle budget.
    pub fn with_max_triangles(mut self, max_triangles: usize) -> Self {
        self.max_triangles = max_triangles;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(SubdivisionError::invalid_param("iterations", 0, "must be at least 1"));
        }
        if !(self.uv_epsilon >= 0.0) {
            return Err(SubdivisionError::invalid_param(
                "uv_epsilon",
                self.uv_epsilon,
                "must be a non-negative number",
            ));
        }
        if let WeldMode::Tolerance(eps) = self.weld {
            if !(eps > 0.0 && eps.is_finite()) {
                return Err(SubdivisionError::invalid_param(
                    "weld_epsilon",
                    eps,
                    "must be a positive finite number",
                ));
            }
        }
        Ok(())
    }

    fn check_budget(&self, triangles: usize) -> Result<()> {
        let projected = (0..self.iterations).try_fold(triangles, |t, _| t.checked_mul(6));
        let Some(projected) = projected.filter(|&t| t <= self.max_triangles) else {
            return Err(SubdivisionError::invalid_param(
                "iterations",
                self.iterations,
                "result would exceed the triangle budget",
            ));
        };

        // The last pass reads F = projected / 6 triangles and emits at most
        // F face points, 6F edge points and 3F vertex points
        if (projected / 6).saturating_mul(10) > u32::MAX as usize {
            return Err(SubdivisionError::invalid_param(
                "iterations",
                self.iterations,
                "result would exceed the 32-bit vertex index range",
            ));
        }
        Ok(())
    }
}

/// Counts describing a welded mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshStats {
    /// Input corners.
    pub corners: usize,
    /// Welded points.
    pub points: usize,
    /// Triangles.
    pub faces: usize,
    /// Undirected edges.
    pub edges: usize,
    /// Edges with one incident face.
    pub boundary_edges: usize,
    /// Interior edges whose faces disagree on UV.
    pub seam_edges: usize,
}

impl MeshStats {
    /// Number of edge points a pass would emit.
    pub fn edge_points(&self) -> usize {
        self.edges + self.seam_edges
    }
}

/// Weld and analyse a mesh without producing output buffers.
pub fn analyze(mesh: &RawMesh, options: &SubdivideOptions) -> Result<MeshStats> {
    options.validate()?;
    mesh.validate()?;

    let welding = weld(&mesh.positions, options.weld);
    let topology = build_topology(mesh, &welding)?;
    let points = compute_points(mesh, &topology, options.uv_epsilon)?;

    Ok(MeshStats {
        corners: mesh.num_corners(),
        points: topology.num_points(),
        faces: topology.num_faces(),
        edges: topology.num_edges(),
        boundary_edges: topology.boundary_edge_count(),
        seam_edges: points.seam_count(),
    })
}

/// Subdivide a triangle mesh.
///
/// # Errors
///
/// Any [`SubdivisionError`] from validation, welding or topology building.
/// No partial output is produced.
pub fn subdivide(mesh: &RawMesh, options: &SubdivideOptions) -> Result<SubdividedMesh> {
    subdivide_with_progress(mesh, options, &Progress::none())
}

/// Subdivision with progress reporting.
pub fn subdivide_with_progress(
    mesh: &RawMesh,
    options: &SubdivideOptions,
    progress: &Progress,
) -> Result<SubdividedMesh> {
    options.validate()?;
    options.check_budget(mesh.num_triangles())?;

    let total = options.iterations;
    let mut out = subdivide_once(mesh, options, progress, 0, total)?;
    for iter in 1..total {
        let input = out.to_raw_mesh();
        out = subdivide_once(&input, options, progress, iter, total)?;
    }
    progress.report(total, total, "Catmull-Clark subdivision");

    Ok(out)
}

/// Subdivide several independent meshes, in parallel unless
/// `options.parallel` is false. Results keep the input order.
pub fn subdivide_batch(meshes: &[RawMesh], options: &SubdivideOptions) -> Vec<Result<SubdividedMesh>> {
    if options.parallel {
        meshes.par_iter().map(|m| subdivide(m, options)).collect()
    } else {
        meshes.iter().map(|m| subdivide(m, options)).collect()
    }
}

/// Perform one pass of subdivision.
fn subdivide_once(
    mesh: &RawMesh,
    options: &SubdivideOptions,
    progress: &Progress,
    iter: usize,
    total: usize,
) -> Result<SubdividedMesh> {
    mesh.validate()?;

    progress.report_sub(0, STAGES, iter, total, "Welding vertices");
    let welding = weld(&mesh.positions, options.weld);

    progress.report_sub(1, STAGES, iter, total, "Building topology");
    let topology = build_topology(mesh, &welding)?;

    progress.report_sub(2, STAGES, iter, total, "Computing subdivision points");
    let points = compute_points(mesh, &topology, options.uv_epsilon)?;

    progress.report_sub(3, STAGES, iter, total, "Assembling buffers");
    let mut out = assemble(&topology, &points);
    out.name = mesh.name.clone();

    log::debug!(
        "pass {}/{}: {} corners -> {} points, {} faces, {} edges ({} seams) -> {} vertices, {} triangles",
        iter + 1,
        total,
        mesh.num_corners(),
        topology.num_points(),
        topology.num_faces(),
        topology.num_edges(),
        points.seam_count(),
        out.num_vertices(),
        out.num_triangles()
    );

    Ok(out)
}
