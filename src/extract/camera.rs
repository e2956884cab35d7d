//! Camera and lens derivation
//!
//! Turns the physical camera of the host (film back, focal length, lens
//! aperture) plus the host-wide output resolution into the renderer's
//! field-of-view based camera model.

use super::attributes::{get_attr, get_attr_any};
use crate::config::{CameraConfig, RenderConfig};
use crate::constants::{attr, defaults, lens};
use crate::error::{ExportError, Result};
use crate::host::{NodeHandle, SceneGraph};
use crate::scene::RenderSettings;
use glam::DVec3;

/// Field of view in degrees from a film aperture (inches) and focal length
/// (mm).
///
/// The horizontal film aperture goes in but the renderer treats the result
/// as a vertical angle, and the half-aperture ratio is not doubled. Scenes
/// are framed against this exact formula, so it is kept as is.
pub fn field_of_view(film_aperture: f64, focal_length: f64) -> f64 {
    let fov = ((film_aperture * 0.5) / (focal_length / lens::MM_PER_INCH)).atan();
    fov.to_degrees()
}

/// Output height for a fixed width, rounded down
pub fn output_height(width: u32, aspect_ratio: f64) -> u32 {
    (f64::from(width) / aspect_ratio).floor() as u32
}

/// Camera parameters resolved from the host
#[derive(Debug, Clone, PartialEq)]
pub struct LensModel {
    pub fov: f64,
    pub aspect_ratio: f64,
    pub aperture: f64,
    pub origin: DVec3,
    pub aim: DVec3,
    pub focus: DVec3,
}

fn required(graph: &dyn SceneGraph, role: &'static str, name: &str) -> Result<NodeHandle> {
    let node = NodeHandle::new(name);
    if graph.exists(&node) {
        Ok(node)
    } else {
        Err(ExportError::MissingNode {
            role,
            name: name.to_string(),
        })
    }
}

/// Aspect ratio of the host-wide render resolution
pub fn aspect_ratio(graph: &dyn SceneGraph, resolution_node: &str) -> Result<f64> {
    let node = required(graph, "resolution", resolution_node)?;
    let width: f64 = get_attr(graph, &node, attr::RESOLUTION_WIDTH).unwrap_or(0.0);
    let height: f64 = get_attr(graph, &node, attr::RESOLUTION_HEIGHT).unwrap_or(0.0);
    if width <= 0.0 || height <= 0.0 {
        return Err(ExportError::InvalidResolution { width, height });
    }
    Ok(width / height)
}

pub fn derive_lens(graph: &dyn SceneGraph, camera: &CameraConfig) -> Result<LensModel> {
    let camera_node = required(graph, "camera", &camera.camera)?;
    let aim_node = required(graph, "camera aim", &camera.aim)?;
    let focus_node = required(graph, "camera focus", &camera.focus)?;

    // lens attributes live on the transform or on its camera shape
    let mut sources = vec![camera_node.clone()];
    sources.extend(graph.children(&camera_node).into_iter().take(1));
    let lens_attr = |names: &[&str], default: f64| -> f64 {
        sources
            .iter()
            .find_map(|node| get_attr_any::<f64>(graph, node, names))
            .unwrap_or(default)
    };

    let film_aperture = lens_attr(&[attr::HORIZONTAL_FILM_APERTURE], defaults::FILM_APERTURE);
    let focal_length = lens_attr(&[attr::FOCAL_LENGTH], defaults::FOCAL_LENGTH);
    let lens_aperture = lens_attr(
        &[attr::LENS_APERTURE, attr::LENS_APERTURE_LEGACY],
        defaults::LENS_APERTURE,
    );

    Ok(LensModel {
        fov: field_of_view(film_aperture, focal_length),
        aspect_ratio: aspect_ratio(graph, &camera.resolution)?,
        aperture: lens_aperture / lens::APERTURE_DIVISOR,
        origin: graph.world_translation(&camera_node)?,
        aim: graph.world_translation(&aim_node)?,
        focus: graph.world_translation(&focus_node)?,
    })
}

/// Combines the lens model with the configured render settings
pub fn render_settings(lens: &LensModel, render: &RenderConfig) -> RenderSettings {
    RenderSettings {
        progressive: render.progressive,
        width: render.width,
        height: output_height(render.width, lens.aspect_ratio),
        aspect_ratio: lens.aspect_ratio,
        spp: render.spp,
        depth: render.depth,
        aperture: lens.aperture,
        fov: lens.fov,
        camera_origin: lens.origin,
        camera_aim: lens.aim,
        camera_focus: lens.focus,
        output_file: render.output_file.clone(),
    }
}
