use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};

/// Caller-supplied knobs for one import. Missing fields in a settings file
/// fall back to the defaults below.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ImportSettings {
    pub import_attachments: bool,
    pub import_events: bool,
    pub import_particle_emitters: bool,
    pub import_collision_shapes: bool,
    /// Geoset indices (source order) to leave out of the mesh.
    pub exclude_geosets: BTreeSet<usize>,
    /// Geosets whose material uses any of these textures are left out.
    pub exclude_by_texture: Vec<String>,

    pub import_materials: bool,

    pub import_animations: bool,
    pub import_tangents: bool,
    /// Source time units per second of baked clip time.
    pub sample_rate: f32,
    pub exclude_animations: Vec<String>,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            import_attachments: false,
            import_events: false,
            import_particle_emitters: false,
            import_collision_shapes: false,
            exclude_geosets: BTreeSet::new(),
            exclude_by_texture: vec![],
            import_materials: true,
            import_animations: true,
            import_tangents: true,
            sample_rate: 960.0,
            exclude_animations: vec![],
        }
    }
}

impl ImportSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(ImportError::InvalidSettings(format!(
                "sample_rate must be a positive number, got {}",
                self.sample_rate
            )));
        }
        Ok(())
    }

    pub fn is_animation_excluded(&self, name: &str) -> bool {
        self.exclude_animations.iter().any(|n| n == name)
    }
}
