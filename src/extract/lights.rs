//! Light extraction
//!
//! Quad lights are transforms tagged with a custom boolean attribute; their
//! emitting shape is the geometry of a separate reference plane named by
//! another attribute. Directional lights are the host's built-in light type,
//! aimed along the local Z axis of their parent transform.

use super::attributes::{get_attr, get_attr_or};
use super::geometry::flatten_positions;
use super::Diagnostics;
use crate::config::BindingConfig;
use crate::constants::{attr, defaults, node_type};
use crate::error::{ExportError, HostError, Result};
use crate::host::{NodeHandle, SceneGraph};
use crate::scene::{DirLightRecord, QuadLightRecord, SceneLights};
use log::debug;

pub fn extract_quad_lights(
    graph: &dyn SceneGraph,
    bindings: &BindingConfig,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<QuadLightRecord>> {
    let mut lights = Vec::new();
    for node in graph.nodes_with_attribute(&bindings.light_tag) {
        if !get_attr::<bool>(graph, &node, &bindings.light_tag).unwrap_or(false) {
            debug!("Light tag not set on {}", node);
            continue;
        }
        lights.push(quad_light(graph, bindings, &node, diagnostics)?);
    }
    Ok(lights)
}

fn quad_light(
    graph: &dyn SceneGraph,
    bindings: &BindingConfig,
    node: &NodeHandle,
    diagnostics: &mut Diagnostics,
) -> Result<QuadLightRecord> {
    let plane = get_attr::<String>(graph, node, &bindings.light_plane_attribute)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ExportError::MissingLightPlane(node.name().to_string()))?;

    let points = flatten_positions(graph, &NodeHandle::new(plane.clone()))?;
    if points.iter().any(|face| face.len() != 4) {
        diagnostics.warn(format!(
            "light plane {} of {} has non-quad faces",
            plane, node
        ));
    }

    Ok(QuadLightRecord {
        name: node.name().to_string(),
        color: get_attr_or(graph, node, attr::COLOR, defaults::QUAD_LIGHT_COLOR),
        intensity: get_attr_or(graph, node, attr::INTENSITY, defaults::QUAD_LIGHT_INTENSITY),
        points,
    })
}

pub fn extract_dir_lights(graph: &dyn SceneGraph) -> Result<Vec<DirLightRecord>> {
    graph
        .nodes_of_type(node_type::DIRECTIONAL_LIGHT)
        .iter()
        .map(|light| dir_light(graph, light))
        .collect()
}

fn dir_light(graph: &dyn SceneGraph, light: &NodeHandle) -> Result<DirLightRecord> {
    let transform = graph
        .parent(light)
        .ok_or_else(|| HostError::NoParent(light.name().to_string()))?;
    // third basis row of the world matrix: the transform's forward (local Z) axis
    let direction = graph.world_matrix(&transform)?.z_axis.truncate();

    Ok(DirLightRecord {
        name: light.name().to_string(),
        direction,
        color: get_attr_or(graph, light, attr::COLOR, defaults::DIR_LIGHT_COLOR),
        intensity: get_attr_or(graph, light, attr::INTENSITY, defaults::DIR_LIGHT_INTENSITY),
        softness: get_attr_or(graph, light, attr::LIGHT_ANGLE, defaults::DIR_LIGHT_SOFTNESS),
    })
}

pub fn extract_lights(
    graph: &dyn SceneGraph,
    bindings: &BindingConfig,
    diagnostics: &mut Diagnostics,
) -> Result<SceneLights> {
    Ok(SceneLights {
        quad: extract_quad_lights(graph, bindings, diagnostics)?,
        dir: extract_dir_lights(graph)?,
    })
}
