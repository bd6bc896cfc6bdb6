use std::collections::{BTreeMap, HashMap};

use glam::{Mat4, Vec3};
use serde::Serialize;

use crate::coords::swap_yz;
use crate::error::{Diagnostics, ImportError, ImportWarning, Result};
use crate::ir::{Model, Node};

pub const ROOT_NAME: &str = "Skeleton";

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Joint {
    /// Source node id. The synthesized root gets the next free id.
    pub id: u32,
    pub name: String,
    /// Skeleton index of the parent; `None` only for the root.
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub world_position: Vec3,
    /// Rest position relative to the parent joint.
    pub local_position: Vec3,
    /// column-major
    pub inverse_bind_matrix: [[f32; 4]; 4],
}

/// Bones and helpers plus a synthesized root, ordered by node id with the
/// root last. A joint's position in `joints` is its skeleton index, which is
/// what skinning and animation tracks refer to.
#[derive(Serialize, Debug, Clone)]
pub struct Skeleton {
    pub joints: Vec<Joint>,
    pub root: usize,
    #[serde(skip)]
    index_by_id: HashMap<u32, usize>,
}

impl Skeleton {
    /// Builds the hierarchy in two passes since a parent may be declared after
    /// its children. Parent references that don't resolve fall back to the
    /// root and are reported through `diagnostics`.
    pub fn build(model: &Model, diagnostics: &mut Diagnostics) -> Result<Skeleton> {
        let nodes: Vec<&Node> = model.skeleton_nodes().collect();

        let mut by_id = BTreeMap::<u32, &Node>::new();
        for node in &nodes {
            if by_id.insert(node.id, node).is_some() {
                return Err(ImportError::MalformedModel(format!(
                    "node id {} is used by more than one bone or helper",
                    node.id
                )));
            }
        }
        let root_id = next_free_id(by_id.keys().copied())?;

        let mut joints: Vec<Joint> = by_id
            .values()
            .map(|node| {
                let world_position = swap_yz(node.pivot);
                Joint {
                    id: node.id,
                    name: node.name.clone(),
                    parent: None,
                    children: vec![],
                    world_position,
                    local_position: world_position,
                    inverse_bind_matrix: inverse_bind_matrix(world_position),
                }
            })
            .collect();
        let root = joints.len();
        joints.push(Joint {
            id: root_id,
            name: ROOT_NAME.to_string(),
            parent: None,
            children: vec![],
            world_position: Vec3::ZERO,
            local_position: Vec3::ZERO,
            inverse_bind_matrix: Mat4::IDENTITY.to_cols_array_2d(),
        });
        // the root's id is synthesized and may collide with a non-skeleton
        // node, so references to it never resolve
        let index_by_id: HashMap<u32, usize> = joints[..root]
            .iter()
            .enumerate()
            .map(|(idx, joint)| (joint.id, idx))
            .collect();

        for node in &nodes {
            let idx = index_by_id[&node.id];
            let parent = match node.parent {
                Some(parent_id) => match index_by_id.get(&parent_id) {
                    Some(&parent_idx) => parent_idx,
                    None => {
                        diagnostics.warn(ImportWarning::UnresolvedParent {
                            node: node.id,
                            name: node.name.clone(),
                            parent: parent_id,
                        });
                        root
                    }
                },
                None => root,
            };
            // world position stays put when re-parenting
            let parent_world = joints[parent].world_position;
            let joint = &mut joints[idx];
            joint.parent = Some(parent);
            joint.local_position = joint.world_position - parent_world;
            joints[parent].children.push(idx);
        }

        log::debug!(
            "built skeleton with {} joints (root id {})",
            joints.len(),
            root_id
        );

        Ok(Skeleton {
            joints,
            root,
            index_by_id,
        })
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn root_id(&self) -> u32 {
        self.joints[self.root].id
    }

    /// Skeleton index of a source bone or helper. `None` for the root.
    pub fn index_of(&self, node_id: u32) -> Option<usize> {
        self.index_by_id.get(&node_id).copied()
    }

    pub fn joint_by_id(&self, node_id: u32) -> Option<&Joint> {
        self.index_of(node_id).map(|idx| &self.joints[idx])
    }

    /// Joint index to attach a scene object to, root if `parent` is unknown.
    pub fn resolve_parent(&self, parent: Option<u32>) -> (usize, bool) {
        match parent {
            Some(id) => match self.index_of(id) {
                Some(idx) => (idx, true),
                None => (self.root, false),
            },
            None => (self.root, true),
        }
    }

    pub fn bind_poses(&self) -> Vec<[[f32; 4]; 4]> {
        self.joints.iter().map(|j| j.inverse_bind_matrix).collect()
    }

    /// `Skeleton/<ancestors>/<name>`, the binding path animation tracks use.
    pub fn path(&self, idx: usize) -> String {
        if idx == self.root {
            return ROOT_NAME.to_string();
        }
        let mut segments = vec![self.joints[idx].name.as_str()];
        let mut current = idx;
        // cyclic parents are not validated, so never walk more than the joint count
        for _ in 0..self.joints.len() {
            match self.joints[current].parent {
                Some(parent) if parent != self.root => {
                    segments.push(self.joints[parent].name.as_str());
                    current = parent;
                }
                _ => break,
            }
        }
        segments.push(ROOT_NAME);
        segments.reverse();
        segments.join("/")
    }
}

fn next_free_id(ids: impl Iterator<Item = u32>) -> Result<u32> {
    let max = ids.max().ok_or(ImportError::EmptyModel)?;
    max.checked_add(1)
        .ok_or_else(|| ImportError::MalformedModel("node id space exhausted".to_string()))
}

fn inverse_bind_matrix(world_position: Vec3) -> [[f32; 4]; 4] {
    Mat4::from_translation(world_position)
        .inverse()
        .to_cols_array_2d()
}
