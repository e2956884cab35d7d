//! The scene file handed to the renderer

use super::records::{DirLightRecord, MaterialRecord, MeshRecord, QuadLightRecord, SphereRecord};
use crate::constants::format;
use crate::error::{ExportError, Result};
use glam::DVec3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneLights {
    pub quad: Vec<QuadLightRecord>,
    pub dir: Vec<DirLightRecord>,
}

/// All renderable content of one extraction run
///
/// The `*_count` fields duplicate the array lengths because the renderer
/// reads them. [`SceneDocument::refresh_counts`] recomputes them and
/// [`SceneDocument::verify_counts`] checks them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub meshes: Vec<MeshRecord>,
    pub spheres: Vec<SphereRecord>,
    pub materials: Vec<MaterialRecord>,
    pub lights: SceneLights,
    pub mesh_count: usize,
    pub sphere_count: usize,
    pub material_count: usize,
    pub quad_light_count: usize,
    pub dir_light_count: usize,
}

impl SceneDocument {
    pub fn new(
        meshes: Vec<MeshRecord>,
        spheres: Vec<SphereRecord>,
        materials: Vec<MaterialRecord>,
        lights: SceneLights,
    ) -> Self {
        let mut document = Self {
            meshes,
            spheres,
            materials,
            lights,
            ..Default::default()
        };
        document.refresh_counts();
        document
    }

    pub fn refresh_counts(&mut self) {
        self.mesh_count = self.meshes.len();
        self.sphere_count = self.spheres.len();
        self.material_count = self.materials.len();
        self.quad_light_count = self.lights.quad.len();
        self.dir_light_count = self.lights.dir.len();
    }

    pub fn verify_counts(&self) -> Result<()> {
        let checks = [
            ("mesh_count", self.mesh_count, self.meshes.len()),
            ("sphere_count", self.sphere_count, self.spheres.len()),
            ("material_count", self.material_count, self.materials.len()),
            ("quad_light_count", self.quad_light_count, self.lights.quad.len()),
            ("dir_light_count", self.dir_light_count, self.lights.dir.len()),
        ];
        for (field, recorded, actual) in checks {
            if recorded != actual {
                return Err(ExportError::CountMismatch {
                    field,
                    recorded,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Checks that positions, normals and UVs of every mesh line up face by
    /// face. A UV face may be empty when the mesh has no UVs there.
    pub fn verify_geometry(&self) -> Result<()> {
        for mesh in &self.meshes {
            let topology_error = |reason: String| ExportError::Topology {
                mesh: mesh.name.clone(),
                reason,
            };
            let faces = mesh.positions.len();
            if mesh.normals.len() != faces || mesh.uvs.len() != faces {
                return Err(topology_error(format!(
                    "{} position faces, {} normal faces, {} uv faces",
                    faces,
                    mesh.normals.len(),
                    mesh.uvs.len()
                )));
            }
            for (face, ((positions, normals), uvs)) in mesh
                .positions
                .iter()
                .zip(&mesh.normals)
                .zip(&mesh.uvs)
                .enumerate()
            {
                if normals.len() != positions.len()
                    || (!uvs.is_empty() && uvs.len() != positions.len())
                {
                    return Err(topology_error(format!(
                        "face {} has {} corners, {} normals, {} uvs",
                        face,
                        positions.len(),
                        normals.len(),
                        uvs.len()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Render settings consumed by the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(with = "progressive_flag")]
    pub progressive: bool,
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f64,
    pub spp: u32,
    pub depth: u32,
    /// Lens aperture; the renderer reads it under its historical key
    #[serde(rename = "aperature")]
    pub aperture: f64,
    /// Field of view in degrees
    pub fov: f64,
    pub camera_origin: DVec3,
    pub camera_aim: DVec3,
    pub camera_focus: DVec3,
    pub output_file: String,
}

/// The renderer tests `progressive == 1`, so the flag travels as an integer
mod progressive_flag {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Int(u64),
        Bool(bool),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
        Ok(match Flag::deserialize(deserializer)? {
            Flag::Int(v) => v == 1,
            Flag::Bool(v) => v,
        })
    }
}

/// Provenance block of a scene file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// RFC 3339 timestamp
    pub created: String,
    pub creator: String,
    pub export_id: String,
    pub source: String,
}

impl ExportMetadata {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            created: chrono::Utc::now().to_rfc3339(),
            creator: format::CREATOR.to_string(),
            export_id: uuid::Uuid::new_v4().to_string(),
            source: source.into(),
        }
    }
}

fn default_version() -> String {
    format::VERSION.to_string()
}

/// Complete, self-describing scene file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub metadata: Option<ExportMetadata>,
    pub scene: SceneDocument,
    pub settings: RenderSettings,
}

impl SceneFile {
    pub fn new(scene: SceneDocument, settings: RenderSettings, metadata: ExportMetadata) -> Self {
        Self {
            version: format::VERSION.to_string(),
            metadata: Some(metadata),
            scene,
            settings,
        }
    }
}
