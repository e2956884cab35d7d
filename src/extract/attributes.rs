//! Soft attribute resolution
//!
//! Material and light bindings are attributes that authoring tools add on
//! demand, so any of them may be absent on a given node. Reads here never
//! fail: a missing node, a missing attribute or a value of the wrong shape
//! all resolve to the caller's default.

use crate::host::{AttrValue, NodeHandle, SceneGraph};
use glam::DVec3;

/// Conversion from a loosely-typed host value
pub trait FromAttr: Sized {
    fn from_attr(value: &AttrValue) -> Option<Self>;
}

impl FromAttr for f64 {
    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Double(v) => Some(*v),
            AttrValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl FromAttr for i64 {
    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromAttr for bool {
    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Bool(v) => Some(*v),
            AttrValue::Int(v) => Some(*v != 0),
            _ => None,
        }
    }
}

impl FromAttr for String {
    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::String(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromAttr for [f64; 3] {
    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Double3(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromAttr for DVec3 {
    fn from_attr(value: &AttrValue) -> Option<Self> {
        <[f64; 3]>::from_attr(value).map(DVec3::from_array)
    }
}

/// Reads a typed attribute, `None` on any failure
pub fn get_attr<T: FromAttr>(graph: &dyn SceneGraph, node: &NodeHandle, name: &str) -> Option<T> {
    graph
        .attribute(node, name)
        .and_then(|value| T::from_attr(&value))
}

/// Reads a typed attribute, falling back to `default` on any failure
pub fn get_attr_or<T: FromAttr>(
    graph: &dyn SceneGraph,
    node: &NodeHandle,
    name: &str,
    default: T,
) -> T {
    get_attr(graph, node, name).unwrap_or(default)
}

/// Reads the first of several attribute spellings that resolves
pub fn get_attr_any<T: FromAttr>(
    graph: &dyn SceneGraph,
    node: &NodeHandle,
    names: &[&str],
) -> Option<T> {
    names.iter().find_map(|name| get_attr(graph, node, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryGraph, MemoryNode};

    fn graph() -> MemoryGraph {
        let mut graph = MemoryGraph::new();
        graph.add_node(
            MemoryNode::new("obj", "transform")
                .with_attr("radius", AttrValue::Int(3))
                .with_attr("intensity", AttrValue::Double(2.5))
                .with_attr("krrustyMaterial", AttrValue::String("gold".into()))
                .with_attr("color", AttrValue::Double3([0.1, 0.2, 0.3]))
                .with_attr("visibility", AttrValue::Bool(false)),
        );
        graph
    }

    #[test]
    fn test_present_attributes_resolve() {
        let graph = graph();
        let node = NodeHandle::new("obj");
        assert_eq!(get_attr_or(&graph, &node, "intensity", 0.0), 2.5);
        assert_eq!(get_attr_or(&graph, &node, "radius", 0.0), 3.0);
        assert_eq!(get_attr_or(&graph, &node, "krrustyMaterial", String::new()), "gold");
        assert_eq!(get_attr_or(&graph, &node, "color", [1.0; 3]), [0.1, 0.2, 0.3]);
        assert!(!get_attr_or(&graph, &node, "visibility", true));
    }

    #[test]
    fn test_missing_attribute_uses_default() {
        let graph = graph();
        let node = NodeHandle::new("obj");
        assert_eq!(
            get_attr_or(&graph, &node, "missing", "defaultMaterial".to_string()),
            "defaultMaterial"
        );
        assert_eq!(get_attr::<f64>(&graph, &node, "missing"), None);
    }

    #[test]
    fn test_wrong_shape_uses_default() {
        let graph = graph();
        let node = NodeHandle::new("obj");
        // a color read as a scalar, a string read as a color
        assert_eq!(get_attr_or(&graph, &node, "color", 7.0), 7.0);
        assert_eq!(get_attr_or(&graph, &node, "krrustyMaterial", [0.5; 3]), [0.5; 3]);
    }

    #[test]
    fn test_missing_node_uses_default() {
        let graph = graph();
        let node = NodeHandle::new("ghost");
        assert_eq!(get_attr_or(&graph, &node, "intensity", 4.0), 4.0);
    }

    #[test]
    fn test_first_resolving_spelling_wins() {
        let graph = graph();
        let node = NodeHandle::new("obj");
        let value: Option<f64> = get_attr_any(&graph, &node, &["aperture", "intensity", "radius"]);
        assert_eq!(value, Some(2.5));
    }
}
