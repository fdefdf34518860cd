//! Wavefront OBJ support.
//!
//! Loading goes through `tobj` with single-index mode, which yields exactly
//! the per-corner arrays [`RawMesh`] expects. Saving writes subdivided
//! buffers as `v`/`vt`/`f` records, one object per mesh.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::{Point2, Point3};

use crate::algo::subdivide::SubdividedMesh;
use crate::error::{Result, SubdivisionError};
use crate::mesh::RawMesh;

/// Load every model of an OBJ file.
///
/// Polygons are triangulated on load. Models without texture coordinates get
/// zero UVs.
///
/// # Example
///
/// ```no_run
/// use quilt::io::obj;
///
/// let meshes = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<RawMesh>> {
    let path = path.as_ref();
    let options = tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    };

    let (models, _materials) = tobj::load_obj(path, &options).map_err(|e| SubdivisionError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let meshes: Vec<RawMesh> = models
        .into_iter()
        .map(|model| {
            let mesh = model.mesh;
            let positions: Vec<Point3<f32>> = mesh
                .positions
                .chunks_exact(3)
                .map(|p| Point3::new(p[0], p[1], p[2]))
                .collect();

            let texcoords: Vec<Point2<f32>> = if mesh.texcoords.is_empty() {
                log::warn!("OBJ model {} has no texture coordinates; using zero UVs", model.name);
                vec![Point2::origin(); positions.len()]
            } else {
                mesh.texcoords
                    .chunks_exact(2)
                    .map(|t| Point2::new(t[0], t[1]))
                    .collect()
            };

            RawMesh::new(positions, texcoords, mesh.indices).with_name(model.name)
        })
        .collect();

    if meshes.is_empty() {
        return Err(SubdivisionError::LoadError {
            path: path.to_path_buf(),
            message: "OBJ file contains no models".to_string(),
        });
    }

    Ok(meshes)
}

/// Save subdivided meshes to an OBJ file.
///
/// Each mesh becomes an `o` group; vertex and texcoord indices coincide.
///
/// # Example
///
/// ```no_run
/// use quilt::algo::subdivide::{subdivide, SubdivideOptions};
/// use quilt::io::obj;
///
/// let input = obj::load("model.obj").unwrap();
/// let out = subdivide(&input[0], &SubdivideOptions::new(1)).unwrap();
/// obj::save(&[out], "smooth.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(meshes: &[SubdividedMesh], path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "# Generated by quilt")?;

    // OBJ indices are 1-based and global across objects
    let mut offset = 1usize;
    for (i, mesh) in meshes.iter().enumerate() {
        match &mesh.name {
            Some(name) => writeln!(writer, "o {}", name)?,
            None => writeln!(writer, "o mesh_{}", i)?,
        }

        for v in &mesh.vertices {
            writeln!(writer, "v {} {} {}", v.position[0], v.position[1], v.position[2])?;
        }
        for v in &mesh.vertices {
            writeln!(writer, "vt {} {}", v.texcoord[0], v.texcoord[1])?;
        }
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize + offset);
            writeln!(writer, "f {a}/{a} {b}/{b} {c}/{c}")?;
        }

        offset += mesh.vertices.len();
    }

    writer.flush()?;
    Ok(())
}
