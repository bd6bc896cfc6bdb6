use glam::{Vec2, Vec3};

use crate::coords::{flip_v, reverse_winding, swap_yz};
use crate::error::{ImportError, Result};
use crate::file_formats::modelfile::Aabb;
use crate::ir::{Geoset, Model};
use crate::settings::ImportSettings;
use crate::skinning::BoneInfluence;

/// Range of the merged buffers that came from one source geoset.
#[derive(Debug, Clone, PartialEq)]
pub struct Submesh {
    /// Source geoset index.
    pub geoset: usize,
    /// Index into `BakedMesh::material_slots`.
    pub material: usize,
    pub index_offset: u32,
    pub index_count: u32,
    pub vertex_offset: u32,
    pub vertex_count: u32,
}

#[derive(Debug, Clone, Default)]
pub struct BakedMesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
    pub submeshes: Vec<Submesh>,
    /// Source material index per slot, in first-use order.
    pub material_slots: Vec<usize>,
    pub bounds: Aabb,
    /// One record per vertex, same order as `positions`.
    pub influences: Vec<BoneInfluence>,
    /// Inverse rest transform per skeleton joint.
    pub bind_poses: Vec<[[f32; 4]; 4]>,
}

impl BakedMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Geosets that make it into the mesh, in source order: not excluded by
/// index, not using an excluded texture, and skinned.
pub fn included_geosets(model: &Model, settings: &ImportSettings) -> Vec<usize> {
    model
        .geosets
        .iter()
        .enumerate()
        .filter(|(idx, geoset)| {
            if settings.exclude_geosets.contains(idx) {
                log::debug!("geoset {} excluded by index", idx);
                return false;
            }
            if uses_excluded_texture(model, geoset, &settings.exclude_by_texture) {
                log::debug!("geoset {} excluded by texture", idx);
                return false;
            }
            if !geoset.is_skinned() {
                log::debug!("geoset {} has no vertex group references, skipping", idx);
                return false;
            }
            true
        })
        .map(|(idx, _)| idx)
        .collect()
}

fn uses_excluded_texture(model: &Model, geoset: &Geoset, excluded: &[String]) -> bool {
    if excluded.is_empty() {
        return false;
    }
    let Some(material) = model.materials.get(geoset.material) else {
        return false;
    };
    model
        .texture_names_of(material)
        .any(|name| excluded.iter().any(|ex| texture_name_matches(name, ex)))
}

/// Case-insensitive match on either the full texture path or its file name.
pub fn texture_name_matches(texture_path: &str, pattern: &str) -> bool {
    let file_name = texture_path
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(texture_path);
    texture_path.eq_ignore_ascii_case(pattern) || file_name.eq_ignore_ascii_case(pattern)
}

/// `true` for every vertex used by at least one face of the geoset. Merging
/// drops the rest, and skinning must skip exactly the same vertices.
pub fn referenced_vertices(geoset: &Geoset, geoset_idx: usize) -> Result<Vec<bool>> {
    let mut used = vec![false; geoset.vertices.len()];
    for (face_idx, face) in geoset.faces.iter().enumerate() {
        for &v in face {
            match used.get_mut(v as usize) {
                Some(flag) => *flag = true,
                None => {
                    return Err(ImportError::MalformedModel(format!(
                        "face {} of geoset {} references vertex {} but the geoset has {} vertices",
                        face_idx,
                        geoset_idx,
                        v,
                        geoset.vertices.len()
                    )))
                }
            }
        }
    }
    Ok(used)
}

/// Converts and concatenates the given geosets into one mesh. Vertices not
/// referenced by any face are dropped; everything else keeps source order.
/// Influences and bind poses are left for the skinning phase.
pub fn bake_geometry(model: &Model, geosets: &[usize]) -> Result<BakedMesh> {
    let mut mesh = BakedMesh {
        name: model.name.clone(),
        bounds: Aabb {
            min: swap_yz(model.extent.min).to_array(),
            max: swap_yz(model.extent.max).to_array(),
        },
        ..Default::default()
    };

    for &geoset_idx in geosets {
        let geoset = model.geosets.get(geoset_idx).ok_or_else(|| {
            ImportError::MalformedModel(format!("geoset {} does not exist", geoset_idx))
        })?;
        let used = referenced_vertices(geoset, geoset_idx)?;

        let vertex_offset = mesh.positions.len() as u32;
        let index_offset = mesh.indices.len() as u32;

        let mut remap = vec![u32::MAX; geoset.vertices.len()];
        for (i, vertex) in geoset.vertices.iter().enumerate() {
            if !used[i] {
                continue;
            }
            remap[i] = mesh.positions.len() as u32;
            mesh.positions.push(swap_yz(vertex.position));
            mesh.normals.push(swap_yz(vertex.normal));
            mesh.uvs.push(flip_v(vertex.tex_coord));
        }
        for face in &geoset.faces {
            mesh.indices
                .extend(reverse_winding(*face).map(|v| remap[v as usize]));
        }

        let material = match mesh.material_slots.iter().position(|&m| m == geoset.material) {
            Some(slot) => slot,
            None => {
                mesh.material_slots.push(geoset.material);
                mesh.material_slots.len() - 1
            }
        };

        mesh.submeshes.push(Submesh {
            geoset: geoset_idx,
            material,
            index_offset,
            index_count: mesh.indices.len() as u32 - index_offset,
            vertex_offset,
            vertex_count: mesh.positions.len() as u32 - vertex_offset,
        });
    }

    log::debug!(
        "baked {} geosets into {} vertices / {} triangles",
        mesh.submeshes.len(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    Ok(mesh)
}
