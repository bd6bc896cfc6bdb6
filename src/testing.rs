//! Small model fixtures for unit tests.

use glam::{Vec2, Vec3};

use crate::ir::{
    Geoset, GeosetVertex, Layer, Material, Model, Node, Texture, VertexGroup,
};

pub fn vertex(position: Vec3, tex_coord: Vec2, group: usize) -> GeosetVertex {
    GeosetVertex {
        position,
        normal: Vec3::Z,
        tex_coord,
        group,
    }
}

/// One triangle, every vertex in a single group driven by `matrices`.
pub fn triangle_geoset(matrices: Vec<u32>, material: usize) -> Geoset {
    Geoset {
        vertices: vec![
            vertex(Vec3::new(0.0, 0.0, 0.0), Vec2::new(0.0, 0.0), 0),
            vertex(Vec3::new(1.0, 0.0, 0.0), Vec2::new(1.0, 0.0), 0),
            vertex(Vec3::new(0.0, 1.0, 0.0), Vec2::new(0.0, 1.0), 0),
        ],
        faces: vec![[0, 1, 2]],
        groups: vec![VertexGroup { matrices }],
        material,
    }
}

/// Two bones (0 and its child 1), one material per texture name.
pub fn two_bone_model(geosets: Vec<Geoset>, textures: &[&str]) -> Model {
    Model {
        name: "fixture".to_string(),
        nodes: vec![
            Node::bone(0, "root_bone", Vec3::ZERO, None),
            Node::bone(1, "child_bone", Vec3::new(0.0, 0.0, 1.0), Some(0)),
        ],
        geosets,
        materials: textures
            .iter()
            .enumerate()
            .map(|(i, _)| Material {
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
