use std::path::Path;

use crate::animation::{bake_clips, AnimationClip};
use crate::error::{Diagnostics, ImportError, ImportWarning, Result};
use crate::geometry::{bake_geometry, included_geosets, BakedMesh};
use crate::ir::Model;
use crate::markers::{build_markers, Marker};
use crate::materials::{bake_materials, MaterialDescriptor};
use crate::parser::{read_model, ModelParser};
use crate::settings::ImportSettings;
use crate::skeleton::Skeleton;
use crate::skinning::assign_influences;

/// Everything one import produces. Owned by the caller.
#[derive(Debug)]
pub struct ImportOutput {
    pub name: String,
    pub skeleton: Skeleton,
    pub mesh: BakedMesh,
    pub clips: Vec<AnimationClip>,
    pub materials: Vec<MaterialDescriptor>,
    pub markers: Vec<Marker>,
    pub warnings: Vec<ImportWarning>,
}

/// State for a single import, threaded through the phases in order.
pub struct ImportContext<'a> {
    model: &'a Model,
    settings: &'a ImportSettings,
    diagnostics: Diagnostics,
}

impl<'a> ImportContext<'a> {
    pub fn new(model: &'a Model, settings: &'a ImportSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            model,
            settings,
            diagnostics: Diagnostics::default(),
        })
    }

    pub fn run(mut self) -> Result<ImportOutput> {
        let model = self.model;
        let settings = self.settings;

        let skeleton = Skeleton::build(model, &mut self.diagnostics)?;
        let markers = build_markers(model, &skeleton, settings, &mut self.diagnostics);

        let geosets = included_geosets(model, settings);
        let mut mesh = bake_geometry(model, &geosets)?;
        mesh.influences = assign_influences(model, &mesh, &skeleton)?;
        if mesh.influences.len() != mesh.vertex_count() {
            return Err(ImportError::MalformedModel(format!(
                "{} influence records for {} vertices",
                mesh.influences.len(),
                mesh.vertex_count()
            )));
        }
        mesh.bind_poses = skeleton.bind_poses();

        let clips = if settings.import_animations {
            bake_clips(model, &skeleton, settings)?
        } else {
            vec![]
        };
        let materials = if settings.import_materials {
            bake_materials(model, &mesh)?
        } else {
            vec![]
        };

        log::info!(
            "imported {}: {} joints, {} vertices, {} triangles, {} clips, {} materials, {} markers",
            model.name,
            skeleton.len(),
            mesh.vertex_count(),
            mesh.triangle_count(),
            clips.len(),
            materials.len(),
            markers.len()
        );

        Ok(ImportOutput {
            name: model.name.clone(),
            skeleton,
            mesh,
            clips,
            materials,
            markers,
            warnings: self.diagnostics.into_warnings(),
        })
    }
}

pub fn import_model(model: &Model, settings: &ImportSettings) -> Result<ImportOutput> {
    ImportContext::new(model, settings)?.run()
}

/// Parses `path` with `parser` and imports the result. Nothing is returned
/// unless every phase succeeds.
pub fn import_file(
    path: &Path,
    parser: &dyn ModelParser,
    settings: &ImportSettings,
) -> Result<ImportOutput> {
    settings.validate()?;
    let model = read_model(path, parser)?;
    import_model(&model, settings)
}
