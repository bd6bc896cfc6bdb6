use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::geometry::BakedMesh;
use crate::skinning::BoneInfluence;

/// Vertex layout of the baked binary buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SkinnedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
    pub joints: [u32; 4],
    pub weights: [f32; 4],
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Submesh {
    pub index_byte_offset: u32,
    pub index_byte_length: u32,
    pub vertex_byte_offset: u32,
    pub vertex_byte_length: u32,
    /// Indices are relative to this vertex.
    pub base_vertex: u32,
    /// Index into `Model::material_paths`.
    pub material: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Deformation {
    None,
    Skinned {
        skeleton: String,
        animations: Vec<String>,
    },
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Model {
    pub submeshes: Vec<Submesh>,
    pub material_paths: Vec<String>,
    pub marker_path: Option<String>,
    pub buffer: String,
    pub deformation: Deformation,
    pub vertex_buffer_start_offset: u32,
    pub aabb: Aabb,
    /// column-major, one per skeleton joint
    pub bind_poses: Vec<[[f32; 4]; 4]>,
}

/// Binary buffer contents plus the submesh table pointing into it.
pub struct EncodedMesh {
    /// All indices (u32) followed by all vertices.
    pub bytes: Vec<u8>,
    pub submeshes: Vec<Submesh>,
    pub vertex_buffer_start_offset: u32,
}

/// Lays the mesh out as index data followed by vertex data.
pub fn encode_mesh(mesh: &BakedMesh) -> EncodedMesh {
    let vertices: Vec<SkinnedVertex> = (0..mesh.vertex_count())
        .map(|i| {
            let influence = mesh
                .influences
                .get(i)
                .copied()
                .unwrap_or(BoneInfluence::EMPTY);
            SkinnedVertex {
                position: mesh.positions[i].to_array(),
                normal: mesh.normals[i].to_array(),
                tex_coords: mesh.uvs[i].to_array(),
                joints: influence.joints,
                weights: influence.weights,
            }
        })
        .collect();

    let mut indices: Vec<u32> = Vec::with_capacity(mesh.indices.len());
    let mut submeshes = vec![];
    let vertex_size = std::mem::size_of::<SkinnedVertex>() as u32;
    for submesh in &mesh.submeshes {
        let start = submesh.index_offset as usize;
        let end = start + submesh.index_count as usize;
        let index_byte_offset = (indices.len() * 4) as u32;
        indices.extend(
            mesh.indices[start..end]
                .iter()
                .map(|&i| i - submesh.vertex_offset),
        );
        submeshes.push(Submesh {
            index_byte_offset,
            index_byte_length: submesh.index_count * 4,
            vertex_byte_offset: submesh.vertex_offset * vertex_size,
            vertex_byte_length: submesh.vertex_count * vertex_size,
            base_vertex: submesh.vertex_offset,
            material: submesh.material as u32,
        });
    }

    let index_bytes: &[u8] = bytemuck::cast_slice(&indices);
    let vertex_bytes: &[u8] = bytemuck::cast_slice(&vertices);
    let mut bytes = Vec::with_capacity(index_bytes.len() + vertex_bytes.len());
    bytes.extend_from_slice(index_bytes);
    // vertex buffer requires 4 byte alignment, which u32 indices already give
    bytes.extend_from_slice(vertex_bytes);

    EncodedMesh {
        bytes,
        submeshes,
        vertex_buffer_start_offset: index_bytes.len() as u32,
    }
}
