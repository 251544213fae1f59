//! Wavefront OBJ ingestion.
//!
//! Polygons are fan-triangulated by `tobj` before they reach us. Faces with
//! a degenerate winding get [`Face::DEFAULT_NORMAL`], and corners without a
//! usable normal inherit their face's normal, so the renderer never sees
//! NaN normals from a file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use cbox_math::{Vec2, Vec3};
use thiserror::Error;

use crate::mesh::{Face, Mesh, Vertex};

/// Errors that can occur during OBJ loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OBJ parse error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("No triangles found in {0}")]
    NoGeometry(String),
}

pub type LoadResult<T> = Result<T, LoadError>;

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    }
}

/// Load every model in an OBJ file into a single mesh named after the file.
pub fn load_obj<P: AsRef<Path>>(path: P) -> LoadResult<Mesh> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut reader = BufReader::new(File::open(path)?);
    load_obj_buf(name, &mut reader)
}

/// Load OBJ data from any buffered reader. Material libraries are ignored.
pub fn load_obj_buf<R: BufRead>(name: impl Into<String>, reader: &mut R) -> LoadResult<Mesh> {
    let name = name.into();
    let (models, _materials) = tobj::load_obj_buf(reader, &load_options(), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })?;

    let mut faces = Vec::new();
    let mut substituted = 0usize;

    for model in &models {
        let m = &model.mesh;
        let has_normals = !m.normals.is_empty();
        let has_uvs = !m.texcoords.is_empty();

        let corner = |index: u32| -> Vertex {
            let i = index as usize;
            let position = Vec3::from_slice(&m.positions[i * 3..i * 3 + 3]);
            let normal = if has_normals && m.normals.len() >= i * 3 + 3 {
                Vec3::from_slice(&m.normals[i * 3..i * 3 + 3])
            } else {
                Vec3::ZERO
            };
            let tex_coord = if has_uvs && m.texcoords.len() >= i * 2 + 2 {
                Vec2::from_slice(&m.texcoords[i * 2..i * 2 + 2])
            } else {
                Vec2::ZERO
            };
            Vertex::new(position, normal, tex_coord)
        };

        for tri in m.indices.chunks_exact(3) {
            let mut vertices: Vec<Vertex> = tri.iter().map(|&i| corner(i)).collect();

            let face_normal = match Face::flat_normal(&vertices) {
                Some(n) => n,
                None => {
                    substituted += 1;
                    Face::DEFAULT_NORMAL
                }
            };

            for v in &mut vertices {
                v.normal = v
                    .normal
                    .try_normalize()
                    .filter(|n| n.is_finite())
                    .unwrap_or(face_normal);
            }

            faces.push(Face {
                vertices,
                normal: face_normal,
            });
        }
    }

    if faces.is_empty() {
        return Err(LoadError::NoGeometry(name));
    }

    if substituted > 0 {
        log::warn!(
            "{}: {} degenerate faces given the default normal",
            name,
            substituted
        );
    }

    let mesh = Mesh::new(name, faces);
    log::info!(
        "Loaded {} | models: {} | triangles: {} | valid normals: {}/{}",
        mesh.name,
        models.len(),
        mesh.triangle_count(),
        mesh.faces.len() - substituted,
        mesh.faces.len()
    );

    Ok(mesh)
}
