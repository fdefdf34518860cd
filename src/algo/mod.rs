//! Mesh processing algorithms.
//!
//! - **Subdivision**: seam-aware Catmull-Clark subdivision of triangle meshes
//! - **Progress**: callback plumbing for long-running passes

pub mod progress;
pub mod subdivide;

pub use progress::Progress;
