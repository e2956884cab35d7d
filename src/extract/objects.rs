//! Object classification
//!
//! Every transform in the graph is examined once and becomes at most one of:
//! an implicit sphere (its history holds a procedural sphere generator) or a
//! polygon mesh (its history holds a mesh shape). The processed set makes the
//! two outcomes mutually exclusive.

use super::attributes::{get_attr, get_attr_or};
use super::geometry::flatten;
use super::Diagnostics;
use crate::config::BindingConfig;
use crate::constants::{attr, defaults, node_type};
use crate::error::Result;
use crate::host::{NodeHandle, SceneGraph};
use crate::scene::{MeshRecord, SphereRecord};
use log::debug;
use std::collections::HashSet;

/// Largest polygon the renderer triangulates
const MAX_RENDERER_CORNERS: usize = 4;

/// Spheres and meshes found in one classification pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedObjects {
    pub spheres: Vec<SphereRecord>,
    pub meshes: Vec<MeshRecord>,
}

/// Nodes already turned into a record during the current run
#[derive(Debug, Default)]
pub struct ProcessedSet {
    nodes: HashSet<NodeHandle>,
}

impl ProcessedSet {
    pub fn contains(&self, node: &NodeHandle) -> bool {
        self.nodes.contains(node)
    }

    /// Returns false if the node was already processed
    pub fn mark(&mut self, node: &NodeHandle) -> bool {
        self.nodes.insert(node.clone())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Single-run classifier over the transforms of a graph
pub struct ObjectClassifier<'a> {
    graph: &'a dyn SceneGraph,
    bindings: &'a BindingConfig,
    processed: ProcessedSet,
}

impl<'a> ObjectClassifier<'a> {
    pub fn new(graph: &'a dyn SceneGraph, bindings: &'a BindingConfig) -> Self {
        Self {
            graph,
            bindings,
            processed: ProcessedSet::default(),
        }
    }

    /// Classifies all transforms in host enumeration order
    pub fn classify(mut self, diagnostics: &mut Diagnostics) -> Result<ClassifiedObjects> {
        let mut objects = ClassifiedObjects::default();
        for node in self.graph.nodes_of_type(node_type::TRANSFORM) {
            self.classify_node(&node, &mut objects, diagnostics)?;
        }
        debug!(
            "Classified {} spheres and {} meshes from {} transforms",
            objects.spheres.len(),
            objects.meshes.len(),
            self.processed.len()
        );
        Ok(objects)
    }

    fn classify_node(
        &mut self,
        node: &NodeHandle,
        objects: &mut ClassifiedObjects,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        if self.processed.contains(node) {
            return Ok(());
        }

        let history = self.graph.history(node)?;
        let sphere_generator = history
            .iter()
            .find(|h| self.is_type(h, node_type::POLY_SPHERE));
        let mesh_shape = history.iter().find(|h| self.is_type(h, node_type::MESH));
        if sphere_generator.is_none() && mesh_shape.is_none() {
            return Ok(());
        }

        if !get_attr_or(self.graph, node, attr::VISIBILITY, true) {
            debug!("Skipping hidden object {}", node);
            return Ok(());
        }

        let material = self.resolve_material(node, mesh_shape);

        if let Some(generator) = sphere_generator {
            let radius = get_attr_or(self.graph, generator, attr::RADIUS, defaults::SPHERE_RADIUS);
            let location = self.graph.world_rotate_pivot(node)?;
            objects.spheres.push(SphereRecord {
                radius,
                location,
                material,
            });
            self.processed.mark(node);
            return Ok(());
        }

        let geometry = flatten(self.graph, node)?;
        if geometry.positions.iter().any(|face| face.len() > MAX_RENDERER_CORNERS) {
            diagnostics.warn(format!(
                "mesh {} has faces with more than {} corners",
                node, MAX_RENDERER_CORNERS
            ));
        }
        objects.meshes.push(MeshRecord {
            name: node.name().to_string(),
            positions: geometry.positions,
            normals: geometry.normals,
            uvs: geometry.uvs,
            material,
        });
        self.processed.mark(node);
        Ok(())
    }

    fn is_type(&self, node: &NodeHandle, expected: &str) -> bool {
        self.graph
            .node_type(node)
            .is_ok_and(|actual| actual == expected)
    }

    /// Material binding of the transform, else of its mesh shape, else the
    /// sentinel
    fn resolve_material(&self, node: &NodeHandle, mesh_shape: Option<&NodeHandle>) -> String {
        let attribute = self.bindings.material_attribute.as_str();
        get_attr::<String>(self.graph, node, attribute)
            .or_else(|| mesh_shape.and_then(|shape| get_attr(self.graph, shape, attribute)))
            .unwrap_or_else(|| self.bindings.default_material.clone())
    }
}
