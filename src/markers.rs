//! Scene markers hung off the skeleton: attachment points, event objects,
//! particle emitters and collision shapes.

use glam::Vec3;
use serde::Serialize;

use crate::coords::swap_yz;
use crate::error::{Diagnostics, ImportWarning};
use crate::ir::{Model, Node, NodeKind, Shape};
use crate::settings::ImportSettings;
use crate::skeleton::Skeleton;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Attachment,
    Event,
    ParticleEmitter,
    CollisionShape,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    /// Corners relative to the marker, target axes.
    Box { corner1: Vec3, corner2: Vec3 },
    Sphere { radius: f32 },
}

impl Collider {
    fn from_shape(shape: &Shape) -> Self {
        match *shape {
            Shape::Box { vertex1, vertex2 } => Collider::Box {
                corner1: swap_yz(vertex1),
                corner2: swap_yz(vertex2),
            },
            Shape::Sphere { radius } => Collider::Sphere { radius },
        }
    }

    pub fn size(&self) -> Vec3 {
        match *self {
            Collider::Box { corner1, corner2 } => corner2 - corner1,
            Collider::Sphere { radius } => Vec3::splat(radius * 2.0),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: u32,
    pub name: String,
    pub kind: MarkerKind,
    /// Skeleton index of the joint the marker hangs from.
    pub parent: usize,
    pub world_position: Vec3,
    pub local_position: Vec3,
    pub collider: Option<Collider>,
}

fn marker_kind(kind: &NodeKind, settings: &ImportSettings) -> Option<MarkerKind> {
    match kind {
        NodeKind::Attachment if settings.import_attachments => {
            Some(MarkerKind::Attachment)
        }
        NodeKind::Event if settings.import_events => Some(MarkerKind::Event),
        NodeKind::ParticleEmitter if settings.import_particle_emitters => {
            Some(MarkerKind::ParticleEmitter)
        }
        NodeKind::CollisionShape { .. } if settings.import_collision_shapes => {
            Some(MarkerKind::CollisionShape)
        }
        _ => None,
    }
}

const CATEGORY_ORDER: [MarkerKind; 4] = [
    MarkerKind::Attachment,
    MarkerKind::Event,
    MarkerKind::ParticleEmitter,
    MarkerKind::CollisionShape,
];

/// Markers for every node category enabled in `settings`. Grouped by
/// category (attachments, events, emitters, collision shapes), source order
/// within each group.
pub fn build_markers(
    model: &Model,
    skeleton: &Skeleton,
    settings: &ImportSettings,
    diagnostics: &mut Diagnostics,
) -> Vec<Marker> {
    let mut markers = vec![];
    for category in CATEGORY_ORDER {
        for node in &model.nodes {
            if marker_kind(&node.kind, settings) == Some(category) {
                markers.push(build_marker(node, category, skeleton, diagnostics));
            }
        }
    }
    markers
}

fn build_marker(
    node: &Node,
    kind: MarkerKind,
    skeleton: &Skeleton,
    diagnostics: &mut Diagnostics,
) -> Marker {
    let (parent, resolved) = skeleton.resolve_parent(node.parent);
    if !resolved {
        if let Some(parent_id) = node.parent {
            diagnostics.warn(ImportWarning::UnresolvedParent {
                node: node.id,
                name: node.name.clone(),
                parent: parent_id,
            });
        }
    }
    let world_position = swap_yz(node.pivot);
    let collider = match &node.kind {
        NodeKind::CollisionShape { shape } => Some(Collider::from_shape(shape)),
        _ => None,
    };

    Marker {
        id: node.id,
        name: node.name.clone(),
        kind,
        parent,
        world_position,
        local_position: world_position - skeleton.joints[parent].world_position,
        collider,
    }
}
