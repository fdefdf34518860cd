//! Error types for quilt.
//!
//! Every failure is fatal for the mesh being processed: the engine either
//! produces a complete pair of buffers or returns one of these errors.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`SubdivisionError`].
pub type Result<T> = std::result::Result<T, SubdivisionError>;

/// Errors that can occur while loading, subdividing or saving a mesh.
#[derive(Error, Debug)]
pub enum SubdivisionError {
    /// The input arrays violate the [`RawMesh`](crate::mesh::RawMesh) invariants.
    #[error("invalid input mesh: {0}")]
    InvalidInputMesh(#[from] InputDefect),

    /// A third face tried to bind an edge that already has two incident faces.
    #[error("non-manifold topology: edge ({p0}, {p1}) already has two faces, face {face} cannot bind it")]
    NonManifoldTopology {
        /// First welded point of the edge.
        p0: usize,
        /// Second welded point of the edge.
        p1: usize,
        /// The face that attempted to bind the edge.
        face: usize,
    },

    /// A welded point is not referenced by any triangle.
    #[error("point {point} has no incident edges")]
    DegenerateVertex {
        /// The welded point index.
        point: usize,
    },

    /// More than two divergent texture coordinates meet on one edge.
    #[error("edge ({p0}, {p1}) carries more than two distinct texture coordinates")]
    UnsupportedSeamConfiguration {
        /// First welded point of the edge.
        p0: usize,
        /// Second welded point of the edge.
        p1: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

/// The specific way a [`RawMesh`](crate::mesh::RawMesh) is malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputDefect {
    /// The mesh has no triangles.
    #[error("mesh has no triangles")]
    Empty,

    /// The index buffer length is not a multiple of three.
    #[error("index count {len} is not divisible by 3")]
    IndexCount {
        /// Length of the index buffer.
        len: usize,
    },

    /// A triangle references a corner outside the attribute arrays.
    #[error("face {face} references corner {corner}, but only {corners} corners exist")]
    CornerOutOfRange {
        /// The face index.
        face: usize,
        /// The offending corner id.
        corner: usize,
        /// Number of corners available.
        corners: usize,
    },

    /// Position and texcoord arrays describe different numbers of corners.
    #[error("{positions} positions but {texcoords} texcoords")]
    AttributeLength {
        /// Number of positions.
        positions: usize,
        /// Number of texture coordinates.
        texcoords: usize,
    },

    /// A flat attribute array is not a whole number of tuples.
    #[error("flat {attribute} array of length {len} is not a multiple of {arity}")]
    FlatArity {
        /// Attribute name.
        attribute: &'static str,
        /// Array length.
        len: usize,
        /// Components per element.
        arity: usize,
    },

    /// A position contains NaN or infinity.
    #[error("corner {corner} has a non-finite position")]
    NonFinitePosition {
        /// The corner id.
        corner: usize,
    },

    /// Two corners of a triangle weld to the same point.
    #[error("face {face} collapses: two of its corners share a position")]
    CollapsedTriangle {
        /// The face index.
        face: usize,
    },
}

impl SubdivisionError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        SubdivisionError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_defect_display() {
        let err: SubdivisionError = InputDefect::IndexCount { len: 7 }.into();
        assert_eq!(
            err.to_string(),
            "invalid input mesh: index count 7 is not divisible by 3"
        );
    }

    #[test]
    fn test_topology_error_display() {
        let err = SubdivisionError::NonManifoldTopology { p0: 1, p1: 4, face: 9 };
        let text = err.to_string();
        assert!(text.contains("(1, 4)"));
        assert!(text.contains("face 9"));

        let err = SubdivisionError::UnsupportedSeamConfiguration { p0: 2, p1: 3 };
        assert!(err.to_string().contains("(2, 3)"));
    }

    #[test]
    fn test_invalid_param() {
        let err = SubdivisionError::invalid_param("uv_epsilon", -1.0, "must be non-negative");
        assert_eq!(
            err.to_string(),
            "invalid parameter: uv_epsilon = -1 (must be non-negative)"
        );
    }
}
