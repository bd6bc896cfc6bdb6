use bytemuck::{Pod, Zeroable};
use serde::Serialize;

use crate::error::{ImportError, Result};
use crate::geometry::{referenced_vertices, BakedMesh};
use crate::ir::{Geoset, Model};
use crate::skeleton::Skeleton;

pub const MAX_INFLUENCES: usize = 4;

/// Joint index stored in slots that carry no weight.
pub const UNUSED_JOINT: u32 = u32::MAX;

/// Up to four (skeleton joint, weight) pairs driving one vertex.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable, Serialize)]
pub struct BoneInfluence {
    pub joints: [u32; MAX_INFLUENCES],
    pub weights: [f32; MAX_INFLUENCES],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfluenceOverflow {
    pub count: usize,
}

impl BoneInfluence {
    pub const EMPTY: BoneInfluence = BoneInfluence {
        joints: [UNUSED_JOINT; MAX_INFLUENCES],
        weights: [0.0; MAX_INFLUENCES],
    };

    /// Gives every joint the same weight, 1/N, in reference order.
    pub fn evenly_split(joints: &[u32]) -> std::result::Result<Self, InfluenceOverflow> {
        let mut influence = Self::EMPTY;
        let weight = 1.0 / joints.len() as f32;
        for (slot, &joint) in joints.iter().enumerate() {
            if slot >= MAX_INFLUENCES {
                return Err(InfluenceOverflow {
                    count: joints.len(),
                });
            }
            influence.joints[slot] = joint;
            influence.weights[slot] = weight;
        }
        Ok(influence)
    }

    pub fn used_slots(&self) -> usize {
        self.joints.iter().filter(|&&j| j != UNUSED_JOINT).count()
    }
}

/// One influence record per vertex of `mesh`, in the same order. Walks the
/// same geosets and applies the same referenced-vertex test as the geometry
/// bake so the two arrays line up.
pub fn assign_influences(
    model: &Model,
    mesh: &BakedMesh,
    skeleton: &Skeleton,
) -> Result<Vec<BoneInfluence>> {
    let mut influences = Vec::with_capacity(mesh.vertex_count());

    for submesh in &mesh.submeshes {
        let geoset_idx = submesh.geoset;
        let geoset = model.geosets.get(geoset_idx).ok_or_else(|| {
            ImportError::MalformedModel(format!("geoset {} does not exist", geoset_idx))
        })?;
        let used = referenced_vertices(geoset, geoset_idx)?;
        let mut groups: Vec<Option<BoneInfluence>> = vec![None; geoset.groups.len()];

        for (vertex_idx, vertex) in geoset.vertices.iter().enumerate() {
            if !used[vertex_idx] {
                continue;
            }
            let cached = groups.get_mut(vertex.group).ok_or_else(|| {
                ImportError::MalformedModel(format!(
                    "vertex {} of geoset {} references group {} but the geoset has {} groups",
                    vertex_idx,
                    geoset_idx,
                    vertex.group,
                    geoset.groups.len()
                ))
            })?;
            let influence = match *cached {
                Some(influence) => influence,
                None => {
                    let influence =
                        group_influence(geoset, geoset_idx, vertex.group, skeleton)?;
                    *cached = Some(influence);
                    influence
                }
            };
            influences.push(influence);
        }
    }

    Ok(influences)
}

fn group_influence(
    geoset: &Geoset,
    geoset_idx: usize,
    group_idx: usize,
    skeleton: &Skeleton,
) -> Result<BoneInfluence> {
    let matrices = &geoset.groups[group_idx].matrices;
    if matrices.is_empty() {
        return Err(ImportError::MalformedModel(format!(
            "vertex group {} of geoset {} has no matrices",
            group_idx, geoset_idx
        )));
    }
    let joints = matrices
        .iter()
        .map(|&node| {
            skeleton
                .index_of(node)
                .map(|idx| idx as u32)
                .ok_or(ImportError::UnknownBone {
                    geoset: geoset_idx,
                    node,
                })
        })
        .collect::<Result<Vec<u32>>>()?;

    BoneInfluence::evenly_split(&joints).map_err(|overflow| ImportError::SkinningOverflow {
        geoset: geoset_idx,
        group: group_idx,
        count: overflow.count,
    })
}
