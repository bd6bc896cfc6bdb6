use serde::Serialize;

use crate::error::{ImportError, Result};
use crate::geometry::BakedMesh;
use crate::ir::{Material, Model};

pub const ALPHA_CUTOFF: f32 = 0.5;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    Opaque,
    Cutout,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    Off,
    Back,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MaterialDescriptor {
    pub name: String,
    /// Index into the source model's materials.
    pub source_material: usize,
    pub blend_mode: BlendMode,
    pub two_sided: bool,
    pub cull: CullMode,
    pub alpha_cutoff: f32,
    pub textures: Vec<String>,
}

/// Cutout unless some layer uses a replaceable (team colored) texture;
/// two-sided if any layer is.
pub fn map_material(
    model: &Model,
    material: &Material,
    source_material: usize,
    name: String,
) -> MaterialDescriptor {
    let mut blend_mode = BlendMode::Cutout;
    let mut two_sided = false;
    for layer in &material.layers {
        two_sided |= layer.two_sided;
        let replaceable = layer
            .texture
            .and_then(|t| model.textures.get(t))
            .is_some_and(|t| t.replaceable_id > 0);
        if replaceable {
            blend_mode = BlendMode::Opaque;
        }
    }

    MaterialDescriptor {
        name,
        source_material,
        blend_mode,
        two_sided,
        cull: if two_sided { CullMode::Off } else { CullMode::Back },
        alpha_cutoff: ALPHA_CUTOFF,
        textures: model
            .texture_names_of(material)
            .map(str::to_string)
            .collect(),
    }
}

/// One descriptor per material slot of the baked mesh, named after the model.
pub fn bake_materials(model: &Model, mesh: &BakedMesh) -> Result<Vec<MaterialDescriptor>> {
    mesh.material_slots
        .iter()
        .enumerate()
        .map(|(slot, &source)| {
            let material = model.materials.get(source).ok_or_else(|| {
                ImportError::MalformedModel(format!(
                    "material {} does not exist ({} materials)",
                    source,
                    model.materials.len()
                ))
            })?;
            Ok(map_material(
                model,
                material,
                source,
                format!("{}{}", model.name, slot),
            ))
        })
        .collect()
}
