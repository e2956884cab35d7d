//! Material catalog
//!
//! One record per material node of the configured type, in host enumeration
//! order. Downstream lookups go by name, so the order carries no meaning.

use super::attributes::get_attr_or;
use crate::config::BindingConfig;
use crate::constants::{attr, defaults, node_type};
use crate::host::{NodeHandle, SceneGraph};
use crate::scene::{MaterialChannel, MaterialRecord};
use log::debug;

/// sRGB transfer function to linear
pub fn srgb_to_linear(value: f64) -> f64 {
    if value <= 0.04045 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

/// Path of the image texture feeding `node.attribute`, or `""`
pub fn texture_override(graph: &dyn SceneGraph, node: &NodeHandle, attribute: &str) -> String {
    graph
        .connected_sources(node, attribute, node_type::FILE_TEXTURE)
        .first()
        .map(|texture| get_attr_or(graph, texture, attr::FILE_TEXTURE_NAME, String::new()))
        .unwrap_or_default()
}

/// Resolves every channel of one material node
pub fn build_material(graph: &dyn SceneGraph, node: &NodeHandle, linearize_colors: bool) -> MaterialRecord {
    let mut material = MaterialRecord::new(node.name());

    for channel in MaterialChannel::ALL {
        let mut value = get_attr_or(graph, node, channel.attribute(), channel.default_value());
        if linearize_colors && channel.is_color() {
            value = value.map(srgb_to_linear);
        }
        let texture = texture_override(graph, node, channel.attribute());
        if !texture.is_empty() {
            debug!("Material {} {} textured by {}", node, channel.attribute(), texture);
        }
        material.set_channel(channel, value, texture);
    }

    material.ior = get_attr_or(graph, node, attr::IOR, defaults::IOR);
    material.bump_strength = get_attr_or(graph, node, attr::BUMP_STRENGTH, defaults::BUMP_STRENGTH);
    material.normal_strength = get_attr_or(graph, node, attr::NORMAL_STRENGTH, defaults::NORMAL_STRENGTH);
    material
}

/// Builds the catalog of all material nodes in the graph
pub fn build_catalog(graph: &dyn SceneGraph, bindings: &BindingConfig, linearize_colors: bool) -> Vec<MaterialRecord> {
    graph
        .nodes_of_type(&bindings.material_type)
        .iter()
        .map(|node| build_material(graph, node, linearize_colors))
        .collect()
}
