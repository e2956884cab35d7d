//! Export configuration
//!
//! Everything the extraction pipeline does not read from the host graph:
//! fixed output settings, the names of the camera locators, the custom
//! attribute names that bind materials and lights, and where the renderer
//! lives. Loaded from an optional TOML file; every section and field has a
//! default.

use crate::constants::{renderer, DEFAULT_MATERIAL};
use crate::error::{ExportError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub render: RenderConfig,
    pub camera: CameraConfig,
    pub bindings: BindingConfig,
    pub renderer: RendererConfig,
    pub export: ExportOptions,
}

impl ExportConfig {
    /// Loads a config file; missing sections and fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
        Self::from_toml(&content).map_err(|source| ExportError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Fixed renderer settings that have no counterpart in the host scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output width in pixels; the height follows the host aspect ratio
    pub width: u32,
    pub spp: u32,
    pub depth: u32,
    pub progressive: bool,
    pub output_file: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            spp: 1024,
            depth: 32,
            progressive: true,
            output_file: default_output_file(),
        }
    }
}

fn default_output_file() -> String {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("scene_bridge_render.exr")
        .to_string_lossy()
        .into_owned()
}

/// Names of the camera and its locators in the host graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub camera: String,
    pub aim: String,
    pub focus: String,
    /// Node holding the host-wide render resolution
    pub resolution: String,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            camera: "camera1".to_string(),
            aim: "camera1_aim".to_string(),
            focus: "camera1_focus".to_string(),
            resolution: "defaultResolution".to_string(),
        }
    }
}

/// Custom node type and attribute names used by the authoring plug-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Node type of renderer materials
    pub material_type: String,
    /// String attribute on objects naming their material
    pub material_attribute: String,
    /// Boolean attribute marking a transform as a quad light
    pub light_tag: String,
    /// String attribute on a quad light naming its reference plane
    pub light_plane_attribute: String,
    /// Material name written for unbound objects
    pub default_material: String,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            material_type: "krrustyMaterial".to_string(),
            material_attribute: "krrustyMaterial".to_string(),
            light_tag: "krrustyLight".to_string(),
            light_plane_attribute: "lightPlane".to_string(),
            default_material: DEFAULT_MATERIAL.to_string(),
        }
    }
}

/// Location and launch behaviour of the external renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Install directory; resolved from the environment when unset
    pub install_dir: Option<PathBuf>,
    /// Executable name inside the install directory, without extension
    pub executable: String,
    pub scene_file_name: String,
    /// Start the renderer after writing the scene file
    pub launch: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            install_dir: None,
            executable: renderer::EXECUTABLE.to_string(),
            scene_file_name: renderer::SCENE_FILE_NAME.to_string(),
            launch: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Convert diffuse, specular and emission colors from sRGB to linear
    pub linearize_colors: bool,
}
