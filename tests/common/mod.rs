#![allow(dead_code)]

use glam::{Vec2, Vec3};
use mdx_import::ir::{
    Geoset, GeosetVertex, Layer, Material, Model, Node, Sequence, Texture, VertexGroup,
};

pub fn triangle(matrices: Vec<u32>, material: usize) -> Geoset {
    let vertex = |position: Vec3, tex_coord: Vec2| GeosetVertex {
        position,
        normal: Vec3::Z,
        tex_coord,
        group: 0,
    };
    Geoset {
        vertices: vec![
            vertex(Vec3::ZERO, Vec2::ZERO),
            vertex(Vec3::X, Vec2::X),
            vertex(Vec3::Y, Vec2::Y),
        ],
        faces: vec![[0, 1, 2]],
        groups: vec![VertexGroup { matrices }],
        material,
    }
}

/// Bone 0 at the origin with bone 1 one unit above it.
pub fn two_bones() -> Vec<Node> {
    vec![
        Node::bone(0, "Root", Vec3::ZERO, None),
        Node::bone(1, "Chest", Vec3::new(0.0, 0.0, 1.0), Some(0)),
    ]
}

pub fn model(geosets: Vec<Geoset>, textures: &[&str]) -> Model {
    Model {
        name: "Footman".to_string(),
        nodes: two_bones(),
        geosets,
        materials: (0..textures.len())
            .map(|i| Material {
                layers: vec![Layer {
                    two_sided: false,
                    texture: Some(i),
                }],
            })
            .collect(),
        textures: textures
            .iter()
            .map(|name| Texture {
                file_name: name.to_string(),
                replaceable_id: 0,
            })
            .collect(),
        ..Default::default()
    }
}

pub fn sequence(name: &str, start: u32, end: u32) -> Sequence {
    Sequence {
        name: name.to_string(),
        interval: [start, end],
        non_looping: false,
    }
}
