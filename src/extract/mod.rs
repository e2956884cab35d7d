//! Scene extraction
//!
//! One synchronous pass over the host graph: material catalog, object
//! classification, lights and camera. The result is a complete
//! [`SceneDocument`] plus render settings, ready to serialize.

pub mod attributes;
pub mod camera;
pub mod geometry;
pub mod lights;
pub mod materials;
pub mod objects;

use crate::config::ExportConfig;
use crate::error::Result;
use crate::host::SceneGraph;
use crate::scene::{RenderSettings, SceneDocument};
use log::{info, warn};
use std::collections::HashSet;

pub use attributes::{get_attr, get_attr_any, get_attr_or, FromAttr};
pub use camera::{derive_lens, field_of_view, output_height, render_settings, LensModel};
pub use geometry::{flatten, FlatGeometry};
pub use lights::extract_lights;
pub use materials::build_catalog;
pub use objects::{ClassifiedObjects, ObjectClassifier, ProcessedSet};

/// Non-fatal problems found during extraction
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    warnings: Vec<String>,
}

impl Diagnostics {
    /// Logs and records a warning
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.warnings.push(message);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Everything one extraction run produces
#[derive(Debug, Clone)]
pub struct Extraction {
    pub scene: SceneDocument,
    pub settings: RenderSettings,
    pub diagnostics: Diagnostics,
}

/// Runs the full extraction pipeline over a host graph
pub fn extract_scene(graph: &dyn SceneGraph, config: &ExportConfig) -> Result<Extraction> {
    let mut diagnostics = Diagnostics::default();
    let bindings = &config.bindings;

    let materials = build_catalog(graph, bindings, config.export.linearize_colors);
    let objects = ObjectClassifier::new(graph, bindings).classify(&mut diagnostics)?;
    let lights = extract_lights(graph, bindings, &mut diagnostics)?;
    let lens = derive_lens(graph, &config.camera)?;
    let settings = render_settings(&lens, &config.render);

    let known: HashSet<&str> = materials.iter().map(|m| m.name.as_str()).collect();
    let references = objects
        .meshes
        .iter()
        .map(|m| m.material.as_str())
        .chain(objects.spheres.iter().map(|s| s.material.as_str()));
    let mut reported = HashSet::new();
    for material in references {
        if material != bindings.default_material && !known.contains(material) && reported.insert(material) {
            diagnostics.warn(format!("material {} is referenced but not in the catalog", material));
        }
    }

    let scene = SceneDocument::new(objects.meshes, objects.spheres, materials, lights);
    info!(
        "Extracted {} meshes, {} spheres, {} materials, {} quad lights, {} directional lights",
        scene.mesh_count, scene.sphere_count, scene.material_count, scene.quad_light_count, scene.dir_light_count
    );

    Ok(Extraction {
        scene,
        settings,
        diagnostics,
    })
}
