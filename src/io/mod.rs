//! Mesh file I/O.
//!
//! Loaders produce one [`RawMesh`] per primitive or model in the file; the
//! saver writes a list of [`SubdividedMesh`] buffers.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | Polygons triangulated on load |
//! | glTF | `.gltf`, `.glb` | ✓ | ✗ | Triangle primitives only |
//!
//! # Usage
//!
//! ```no_run
//! use quilt::algo::subdivide::{subdivide, SubdivideOptions};
//! use quilt::io::{load, save};
//!
//! let meshes = load("model.glb").unwrap();
//! let options = SubdivideOptions::new(2);
//! let smooth: Vec<_> = meshes
//!     .iter()
//!     .map(|m| subdivide(m, &options))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! save(&smooth, "smooth.obj").unwrap();
//! ```

pub mod gltf;
pub mod obj;

use std::path::Path;

use crate::algo::subdivide::SubdividedMesh;
use crate::error::{Result, SubdivisionError};
use crate::mesh::RawMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// glTF format.
    Gltf,
    /// glTF binary format.
    Glb,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "gltf" => Some(Format::Gltf),
            "glb" => Some(Format::Glb),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| SubdivisionError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load all meshes from a file with automatic format detection.
///
/// # Example
///
/// ```no_run
/// use quilt::io::load;
///
/// let meshes = load("model.obj").unwrap();
/// println!("{} meshes", meshes.len());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<RawMesh>> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::load(path),
        Format::Gltf | Format::Glb => gltf::load(path),
    }
}

/// Save subdivided meshes to a file with automatic format detection.
pub fn save<P: AsRef<Path>>(meshes: &[SubdividedMesh], path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::save(meshes, path),
        Format::Gltf | Format::Glb => Err(SubdivisionError::SaveError {
            path: path.to_path_buf(),
            message: "glTF saving is not yet supported".to_string(),
        }),
    }
}
