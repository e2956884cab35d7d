//! Reading back a written scene file

use crate::error::{ExportError, Result};
use crate::scene::SceneFile;
use std::fmt;
use std::path::Path;

/// Counts and sizes of a verified scene file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSummary {
    pub version: String,
    pub export_id: Option<String>,
    pub meshes: usize,
    pub faces: usize,
    pub corners: usize,
    pub spheres: usize,
    pub materials: usize,
    pub quad_lights: usize,
    pub dir_lights: usize,
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "scene file version {}", self.version)?;
        if let Some(id) = &self.export_id {
            writeln!(f, "  export id:   {}", id)?;
        }
        writeln!(f, "  meshes:      {} ({} faces, {} corners)", self.meshes, self.faces, self.corners)?;
        writeln!(f, "  spheres:     {}", self.spheres)?;
        writeln!(f, "  materials:   {}", self.materials)?;
        writeln!(f, "  quad lights: {}", self.quad_lights)?;
        writeln!(f, "  dir lights:  {}", self.dir_lights)?;
        write!(f, "  resolution:  {}x{}", self.width, self.height)
    }
}

/// Summarizes an already parsed scene file after checking its invariants
pub fn summarize(file: &SceneFile) -> Result<SceneSummary> {
    let scene = &file.scene;
    scene.verify_counts()?;
    scene.verify_geometry()?;

    Ok(SceneSummary {
        version: file.version.clone(),
        export_id: file.metadata.as_ref().map(|m| m.export_id.clone()),
        meshes: scene.meshes.len(),
        faces: scene.meshes.iter().map(|m| m.face_count()).sum(),
        corners: scene.meshes.iter().map(|m| m.corner_count()).sum(),
        spheres: scene.spheres.len(),
        materials: scene.materials.len(),
        quad_lights: scene.lights.quad.len(),
        dir_lights: scene.lights.dir.len(),
        width: file.settings.width,
        height: file.settings.height,
    })
}

/// Reads and verifies a scene file from disk
pub fn inspect(path: &Path) -> Result<SceneSummary> {
    let content = std::fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
    let file: SceneFile = serde_json::from_str(&content)?;
    summarize(&file)
}
