//! # Quilt
//!
//! Seam-aware Catmull-Clark subdivision for textured triangle meshes.
//!
//! Quilt takes de-indexed triangle meshes, where every corner carries its own
//! position and texture coordinate, and produces a smoother mesh with six
//! triangles per input triangle. Corners that share a position are welded so
//! the surface is smoothed as one piece, while UV seams stay sharp: an edge
//! whose two faces disagree on texture coordinates gets one edge point per
//! side.
//!
//! ## Pipeline
//!
//! 1. **Welding** ([`mesh::weld`]) groups corners into welded points
//! 2. **Topology** ([`mesh::build_topology`]) derives edges and adjacency
//! 3. **Points** ([`algo::subdivide::compute_points`]) computes face, edge and
//!    vertex points
//! 4. **Assembly** ([`algo::subdivide::assemble`]) packs GPU-ready buffers
//!
//! ## Quick Start
//!
//! ```
//! use quilt::prelude::*;
//!
//! // A unit quad as two de-indexed triangles
//! let mesh = RawMesh::from_flat(
//!     &[
//!         0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0,
//!         0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0,
//!     ],
//!     &[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0],
//!     &[0, 1, 2, 3, 4, 5],
//! )
//! .unwrap();
//!
//! let out = subdivide(&mesh, &SubdivideOptions::default()).unwrap();
//!
//! // 2 face points + 5 edge points + 4 vertex points
//! assert_eq!(out.num_vertices(), 11);
//! assert_eq!(out.num_triangles(), 12);
//! ```
//!
//! ## Files
//!
//! ```no_run
//! use quilt::prelude::*;
//!
//! let meshes = quilt::io::load("model.glb").unwrap();
//! let options = SubdivideOptions::new(2).with_weld(WeldMode::Tolerance(1e-5));
//! let smooth: Vec<SubdividedMesh> = subdivide_batch(&meshes, &options)
//!     .into_iter()
//!     .collect::<Result<_>>()
//!     .unwrap();
//! quilt::io::save(&smooth, "smooth.obj").unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use quilt::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::subdivide::{
        subdivide, subdivide_batch, SubdivideOptions, SubdividedMesh, SubdividedVertex,
    };
    pub use crate::algo::Progress;
    pub use crate::error::{InputDefect, Result, SubdivisionError};
    pub use crate::mesh::{RawMesh, WeldMode};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
