//! Core mesh data structures.
//!
//! This module holds the input representation and the first two stages of the
//! subdivision pipeline:
//!
//! - [`RawMesh`] - de-indexed positions, texcoords and triangle corner ids
//! - [`weld`] - merges corners that share a position into welded points
//! - [`build_topology`] - derives faces, edges and per-point adjacency
//!
//! # Index Types
//!
//! Welded elements are identified by type-safe wrappers over `u32`:
//! [`PointId`], [`EdgeId`] and [`FaceId`]. Original corner ids stay plain
//! `u32`, the same type the index buffer uses.
//!
//! # Example
//!
//! ```
//! use quilt::mesh::{build_topology, weld, RawMesh, WeldMode};
//!
//! // Two triangles of a unit quad, de-indexed: six corners, four positions
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
//! let welding = weld(&mesh.positions, WeldMode::Exact);
//! assert_eq!(welding.num_points(), 4);
//!
//! let topology = build_topology(&mesh, &welding).unwrap();
//! assert_eq!(topology.num_edges(), 5);
//! assert_eq!(topology.boundary_edge_count(), 4);
//! ```

mod index;
mod raw;
mod topology;
mod weld;

pub use index::{EdgeId, FaceId, PointId};
pub use raw::RawMesh;
pub use topology::{build_topology, Edge, Face, Point, Topology};
pub use weld::{weld, WeldMode, Welding};
