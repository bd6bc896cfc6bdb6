//! Intermediate representation handed over by the model parser.
//!
//! Everything here is in the source convention: Z up, counter-clockwise
//! winding, texture origin at the top left. The import core only reads it.

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Model {
    pub name: String,
    pub nodes: Vec<Node>,
    pub geosets: Vec<Geoset>,
    pub sequences: Vec<Sequence>,
    pub materials: Vec<Material>,
    pub textures: Vec<Texture>,
    pub extent: Extent,
}

impl Model {
    pub fn bones(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| matches!(n.kind, NodeKind::Bone))
    }

    pub fn helpers(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| matches!(n.kind, NodeKind::Helper))
    }

    /// Bones first, then helpers, each in source order.
    pub fn skeleton_nodes(&self) -> impl Iterator<Item = &Node> {
        self.bones().chain(self.helpers())
    }

    pub fn texture_names_of<'a>(
        &'a self,
        material: &'a Material,
    ) -> impl Iterator<Item = &'a str> + 'a {
        material
            .layers
            .iter()
            .filter_map(|l| l.texture)
            .filter_map(|t| self.textures.get(t))
            .map(|t| t.file_name.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Node {
    pub id: u32,
    pub name: String,
    pub pivot: Vec3,
    #[serde(default)]
    pub parent: Option<u32>,
    pub kind: NodeKind,
    #[serde(default)]
    pub translation: Track<Vec3>,
    /// Quaternion as (x, y, z, w).
    #[serde(default)]
    pub rotation: Track<Vec4>,
    #[serde(default)]
    pub scaling: Track<Vec3>,
}

impl Node {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        kind: NodeKind,
        pivot: Vec3,
        parent: Option<u32>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            pivot,
            parent,
            kind,
            translation: Track::default(),
            rotation: Track::default(),
            scaling: Track::default(),
        }
    }

    pub fn bone(id: u32, name: impl Into<String>, pivot: Vec3, parent: Option<u32>) -> Self {
        Self::new(id, name, NodeKind::Bone, pivot, parent)
    }

    pub fn helper(id: u32, name: impl Into<String>, pivot: Vec3, parent: Option<u32>) -> Self {
        Self::new(id, name, NodeKind::Helper, pivot, parent)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum NodeKind {
    Bone,
    Helper,
    Attachment,
    Event,
    /// Both emitter generations of the format.
    ParticleEmitter,
    CollisionShape { shape: Shape },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Two opposite corners.
    Box { vertex1: Vec3, vertex2: Vec3 },
    Sphere { radius: f32 },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    None,
    #[default]
    Linear,
    Hermite,
    Bezier,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Sample<T> {
    pub time: u32,
    pub value: T,
    pub in_tangent: Option<T>,
    pub out_tangent: Option<T>,
}

impl<T> Sample<T> {
    pub fn new(time: u32, value: T) -> Self {
        Self {
            time,
            value,
            in_tangent: None,
            out_tangent: None,
        }
    }

    pub fn with_tangents(mut self, in_tangent: T, out_tangent: T) -> Self {
        self.in_tangent = Some(in_tangent);
        self.out_tangent = Some(out_tangent);
        self
    }
}

/// Samples of one channel, ordered by time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Track<T> {
    #[serde(default)]
    pub interpolation: Interpolation,
    pub samples: Vec<Sample<T>>,
}

impl<T> Default for Track<T> {
    fn default() -> Self {
        Self {
            interpolation: Interpolation::default(),
            samples: vec![],
        }
    }
}

impl<T> Track<T> {
    pub fn new(interpolation: Interpolation, samples: Vec<Sample<T>>) -> Self {
        Self {
            interpolation,
            samples,
        }
    }

    /// Samples with `start <= time <= end`.
    pub fn window(&self, start: u32, end: u32) -> impl Iterator<Item = &Sample<T>> {
        self.samples
            .iter()
            .filter(move |s| start <= s.time && s.time <= end)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GeosetVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coord: Vec2,
    /// Index into the owning geoset's `groups`.
    pub group: usize,
}

/// The nodes driving a vertex. Each matrix is a node id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct VertexGroup {
    pub matrices: Vec<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Geoset {
    pub vertices: Vec<GeosetVertex>,
    pub faces: Vec<[u32; 3]>,
    pub groups: Vec<VertexGroup>,
    /// Index into `Model::materials`.
    pub material: usize,
}

impl Geoset {
    pub fn is_skinned(&self) -> bool {
        self.groups.iter().any(|g| !g.matrices.is_empty())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Sequence {
    pub name: String,
    /// Closed interval `[start, end]` in source time units.
    pub interval: [u32; 2],
    #[serde(default)]
    pub non_looping: bool,
}

impl Sequence {
    pub fn start(&self) -> u32 {
        self.interval[0]
    }

    pub fn end(&self) -> u32 {
        self.interval[1]
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Texture {
    pub file_name: String,
    /// Non-zero for team color / team glow style textures supplied at runtime.
    #[serde(default)]
    pub replaceable_id: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default)]
pub struct Layer {
    #[serde(default)]
    pub two_sided: bool,
    /// Index into `Model::textures`.
    #[serde(default)]
    pub texture: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Material {
    pub layers: Vec<Layer>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Extent {
    pub min: Vec3,
    pub max: Vec3,
}
