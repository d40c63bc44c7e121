//! CPU-side mesh geometry.
//!
//! This module defines [`MeshData`], a flat triangle list stored as parallel arrays of
//! positions, normals and texture coordinates, and the OBJ loading that produces it.

use std::{io::BufRead, path::Path};

use glam::{Vec2, Vec3};

use crate::error::MeshError;

/// A non-indexed triangle list. Element `i` of every array belongs to vertex `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
}

impl MeshData {
    /// Creates a mesh from parallel arrays.
    ///
    /// `uvs` may be empty for an untextured mesh, otherwise it must match the other arrays.
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, uvs: Vec<Vec2>) -> Result<Self, MeshError> {
        if positions.len() != normals.len() || (!uvs.is_empty() && uvs.len() != positions.len()) {
            return Err(MeshError::LengthMismatch {
                positions: positions.len(),
                normals: normals.len(),
                uvs: uvs.len(),
            });
        }
        if positions.is_empty() {
            return Err(MeshError::Empty);
        }
        if !positions.len().is_multiple_of(3) {
            return Err(MeshError::NotTriangles(positions.len()));
        }

        Ok(Self {
            positions,
            normals,
            uvs,
        })
    }

    /// Loads and de-indexes every model in an OBJ file.
    pub fn load_obj(path: impl AsRef<Path>) -> Result<Self, MeshError> {
        let path = path.as_ref();
        let (models, _materials) =
            tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS).map_err(|source| MeshError::Load {
                path: path.to_path_buf(),
                source,
            })?;
        let mesh = Self::from_models(&models)?;
        log::debug!(
            "Loaded {} ({} models, {} vertices)",
            path.display(),
            models.len(),
            mesh.vertex_count()
        );
        Ok(mesh)
    }

    /// Parses OBJ text from a reader. Material libraries referenced by the data are ignored.
    pub fn parse_obj<R: BufRead>(reader: &mut R) -> Result<Self, MeshError> {
        let (models, _materials) = tobj::load_obj_buf(reader, &tobj::GPU_LOAD_OPTIONS, |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })?;
        Self::from_models(&models)
    }

    /// Flattens indexed `tobj` models into one triangle list.
    fn from_models(models: &[tobj::Model]) -> Result<Self, MeshError> {
        let index_total = models.iter().map(|m| m.mesh.indices.len()).sum();
        let mut positions = Vec::with_capacity(index_total);
        let mut normals = Vec::with_capacity(index_total);
        let mut uvs = Vec::with_capacity(index_total);

        let textured = models.iter().all(|m| !m.mesh.texcoords.is_empty());

        for model in models {
            let mesh = &model.mesh;
            if mesh.normals.is_empty() {
                return Err(MeshError::MissingNormals(model.name.clone()));
            }
            // Files that mix faces with and without `vn` or `vt` leave these arrays short.
            let vertices = mesh.positions.len() / 3;
            let uv_count = if textured { mesh.texcoords.len() / 2 } else { vertices };
            if mesh.normals.len() != mesh.positions.len() || uv_count != vertices {
                return Err(MeshError::LengthMismatch {
                    positions: vertices,
                    normals: mesh.normals.len() / 3,
                    uvs: mesh.texcoords.len() / 2,
                });
            }

            for &index in &mesh.indices {
                let i = index as usize;
                positions.push(Vec3::from_slice(&mesh.positions[i * 3..i * 3 + 3]));
                normals.push(Vec3::from_slice(&mesh.normals[i * 3..i * 3 + 3]));
                if textured {
                    uvs.push(Vec2::from_slice(&mesh.texcoords[i * 2..i * 2 + 2]));
                }
            }
        }

        Self::new(positions, normals, uvs)
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    /// Returns `true` if the mesh carries texture coordinates.
    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty()
    }

    /// Number of vertices, i.e. three times the triangle count.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}
