//! Wavefront OBJ import.
//!
//! Every model in the file becomes one triangulated [`Mesh`]. The diffuse
//! colour of the model's MTL material, when present, is carried along so the
//! renderer can give the mesh its flat default material.

use std::path::Path;

use glint_math::Vec3;

use crate::error::{SceneError, SceneResult};
use crate::mesh::Mesh;

/// One model read from an OBJ file.
#[derive(Clone, Debug)]
pub struct ObjModel {
    /// Model name from the `o`/`g` statement
    pub name: String,

    /// Triangulated geometry
    pub mesh: Mesh,

    /// Diffuse colour from the MTL library, if any
    pub color: Option<Vec3>,
}

/// Load every model of an OBJ file.
///
/// Fails with [`SceneError::EmptyMesh`] when the file holds no triangles.
/// A missing or broken MTL library is not fatal: the models simply carry no
/// colour.
pub fn load_obj(path: impl AsRef<Path>) -> SceneResult<Vec<ObjModel>> {
    let path = path.as_ref();
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
    )?;

    let materials = match materials {
        Ok(materials) => materials,
        Err(err) => {
            log::warn!("Ignoring materials of {}: {}", path.display(), err);
            Vec::new()
        }
    };

    let mut out = Vec::with_capacity(models.len());
    for model in models {
        let positions: Vec<Vec3> = model
            .mesh
            .positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
            .collect();

        if model.mesh.indices.len() < 3 {
            log::debug!("Skipping model '{}' without faces", model.name);
            continue;
        }

        let color = model
            .mesh
            .material_id
            .and_then(|id| materials.get(id))
            .and_then(|m| m.diffuse)
            .map(Vec3::from_array);

        log::debug!(
            "Loaded model '{}': {} vertices, {} triangles",
            model.name,
            positions.len(),
            model.mesh.indices.len() / 3
        );

        out.push(ObjModel {
            name: model.name,
            mesh: Mesh::new(positions, model.mesh.indices),
            color,
        });
    }

    if out.is_empty() {
        return Err(SceneError::EmptyMesh(path.to_path_buf()));
    }

    Ok(out)
}
