//! glTF format support.
//!
//! Each triangle primitive becomes one [`RawMesh`]: `POSITION`, `TEXCOORD_0`
//! and the index accessor are read as-is, so corner ids are glTF vertex
//! indices. Materials, skins, morph targets and images are ignored.

use std::path::Path;

use ::gltf::mesh::Mode;
use nalgebra::{Point2, Point3};

use crate::error::{Result, SubdivisionError};
use crate::mesh::RawMesh;

/// Load every primitive of a glTF or GLB file.
///
/// # Errors
///
/// Fails if the file cannot be imported, if a primitive is not a triangle
/// list, if a primitive has no positions, or if the file has no meshes.
///
/// # Example
///
/// ```no_run
/// use quilt::io::gltf;
///
/// let meshes = gltf::load("model.glb").unwrap();
/// for mesh in &meshes {
///     println!("{:?}: {} triangles", mesh.name, mesh.num_triangles());
/// }
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<RawMesh>> {
    let path = path.as_ref();
    let load_error = |message: String| SubdivisionError::LoadError {
        path: path.to_path_buf(),
        message,
    };

    let (document, buffers, _images) = ::gltf::import(path).map_err(|e| load_error(e.to_string()))?;

    let mut meshes = Vec::new();

    for mesh in document.meshes() {
        let mesh_name = mesh
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("mesh_{}", mesh.index()));

        for primitive in mesh.primitives() {
            let name = format!("{}#{}", mesh_name, primitive.index());

            if primitive.mode() != Mode::Triangles {
                return Err(load_error(format!(
                    "primitive {} uses {:?}; only triangle lists can be subdivided",
                    name,
                    primitive.mode()
                )));
            }

            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<Point3<f32>> = reader
                .read_positions()
                .ok_or_else(|| load_error(format!("primitive {} has no POSITION attribute", name)))?
                .map(|p| Point3::new(p[0], p[1], p[2]))
                .collect();

            let texcoords: Vec<Point2<f32>> = match reader.read_tex_coords(0) {
                Some(tc) => tc.into_f32().map(|t| Point2::new(t[0], t[1])).collect(),
                None => {
                    log::warn!("primitive {} has no TEXCOORD_0; using zero UVs", name);
                    vec![Point2::origin(); positions.len()]
                }
            };

            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };

            log::debug!(
                "gltf primitive {}: {} corners, {} indices",
                name,
                positions.len(),
                indices.len()
            );

            meshes.push(RawMesh::new(positions, texcoords, indices).with_name(name));
        }
    }

    if meshes.is_empty() {
        return Err(load_error("glTF file contains no meshes".to_string()));
    }

    Ok(meshes)
}
