//! In-memory scene graph snapshot
//!
//! `MemoryGraph` stores a host scene as plain data: nodes in enumeration
//! order, their local transforms, attributes, construction history and mesh
//! shapes, plus attribute connections. It implements [`SceneGraph`] the way
//! the host does, including the local-to-world transform of geometry.

use super::{AttrValue, HostMesh, NodeHandle, SceneGraph, Space};
use crate::error::HostError;
use glam::{DMat3, DMat4, DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A connection from one node attribute into another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttrConnection {
    pub from_node: String,
    pub from_attr: String,
    pub to_node: String,
    pub to_attr: String,
}

impl AttrConnection {
    pub fn new(
        from_node: impl Into<String>,
        from_attr: impl Into<String>,
        to_node: impl Into<String>,
        to_attr: impl Into<String>,
    ) -> Self {
        Self {
            from_node: from_node.into(),
            from_attr: from_attr.into(),
            to_node: to_node.into(),
            to_attr: to_attr.into(),
        }
    }
}

/// Object-space polygon mesh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshShape {
    pub face_vertex_counts: Vec<usize>,
    pub face_vertex_indices: Vec<usize>,
    pub points: Vec<DVec3>,
    /// Per-vertex normals; computed from the faces when empty
    #[serde(default)]
    pub normals: Vec<DVec3>,
    #[serde(default)]
    pub uvs: Vec<DVec2>,
    #[serde(default)]
    pub uv_counts: Vec<usize>,
    #[serde(default)]
    pub uv_ids: Vec<usize>,
}

impl MeshShape {
    pub fn new(points: Vec<DVec3>, faces: Vec<Vec<usize>>) -> Self {
        Self {
            face_vertex_counts: faces.iter().map(Vec::len).collect(),
            face_vertex_indices: faces.into_iter().flatten().collect(),
            points,
            ..Default::default()
        }
    }

    /// Assign per-corner UVs, one index list per face
    pub fn with_uvs(mut self, uvs: Vec<DVec2>, face_uv_ids: Vec<Vec<usize>>) -> Self {
        self.uvs = uvs;
        self.uv_counts = face_uv_ids.iter().map(Vec::len).collect();
        self.uv_ids = face_uv_ids.into_iter().flatten().collect();
        self
    }

    pub fn with_normals(mut self, normals: Vec<DVec3>) -> Self {
        self.normals = normals;
        self
    }

    /// Area-weighted vertex normals (Newell's method per face)
    fn computed_normals(&self) -> Vec<DVec3> {
        let mut normals = vec![DVec3::ZERO; self.points.len()];
        let mut cursor = 0usize;
        for &count in &self.face_vertex_counts {
            let Some(face) = cursor
                .checked_add(count)
                .and_then(|end| self.face_vertex_indices.get(cursor..end))
            else {
                break;
            };
            cursor += count;

            let mut face_normal = DVec3::ZERO;
            for (i, &current) in face.iter().enumerate() {
                let next = face[(i + 1) % face.len()];
                let (Some(a), Some(b)) = (self.points.get(current), self.points.get(next)) else {
                    continue;
                };
                face_normal.x += (a.y - b.y) * (a.z + b.z);
                face_normal.y += (a.z - b.z) * (a.x + b.x);
                face_normal.z += (a.x - b.x) * (a.y + b.y);
            }
            for &vertex in face {
                if let Some(n) = normals.get_mut(vertex) {
                    *n += face_normal;
                }
            }
        }
        normals.into_iter().map(DVec3::normalize_or_zero).collect()
    }

    fn to_host_mesh(&self, world: Option<DMat4>) -> HostMesh {
        let normals = if self.normals.is_empty() {
            self.computed_normals()
        } else {
            self.normals.clone()
        };

        let (points, vertex_normals) = match world {
            None => (self.points.clone(), normals),
            Some(matrix) => {
                let linear = DMat3::from_mat4(matrix);
                let normal_matrix = if linear.determinant().abs() > f64::EPSILON {
                    linear.inverse().transpose()
                } else {
                    linear
                };
                (
                    self.points.iter().map(|p| matrix.transform_point3(*p)).collect(),
                    normals
                        .iter()
                        .map(|n| (normal_matrix * *n).normalize_or_zero())
                        .collect(),
                )
            }
        };

        HostMesh {
            face_vertex_counts: self.face_vertex_counts.clone(),
            face_vertex_indices: self.face_vertex_indices.clone(),
            points,
            vertex_normals,
            uvs: self.uvs.clone(),
            uv_counts: self.uv_counts.clone(),
            uv_ids: self.uv_ids.clone(),
        }
    }
}

fn identity() -> DMat4 {
    DMat4::IDENTITY
}

/// A node of the snapshot graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryNode {
    pub name: String,
    pub node_type: String,
    #[serde(default)]
    pub parent: Option<String>,
    /// Local transform, column-major
    #[serde(default = "identity")]
    pub matrix: DMat4,
    /// Rotate pivot in local space
    #[serde(default)]
    pub rotate_pivot: DVec3,
    #[serde(default)]
    pub attributes: HashMap<String, AttrValue>,
    /// Names of the nodes in this node's construction history
    #[serde(default)]
    pub history: Vec<String>,
    #[serde(default)]
    pub mesh: Option<MeshShape>,
}

impl MemoryNode {
    pub fn new(name: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_type: node_type.into(),
            parent: None,
            matrix: DMat4::IDENTITY,
            rotate_pivot: DVec3::ZERO,
            attributes: HashMap::new(),
            history: Vec::new(),
            mesh: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_matrix(mut self, matrix: DMat4) -> Self {
        self.matrix = matrix;
        self
    }

    pub fn with_translation(mut self, translation: DVec3) -> Self {
        self.matrix = DMat4::from_translation(translation);
        self
    }

    pub fn with_rotate_pivot(mut self, pivot: DVec3) -> Self {
        self.rotate_pivot = pivot;
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn with_history<I, S>(mut self, history: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.history = history.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_mesh(mut self, mesh: MeshShape) -> Self {
        self.mesh = Some(mesh);
        self
    }
}

#[derive(Deserialize)]
struct GraphSnapshot {
    nodes: Vec<MemoryNode>,
    #[serde(default)]
    connections: Vec<AttrConnection>,
}

impl From<GraphSnapshot> for MemoryGraph {
    fn from(snapshot: GraphSnapshot) -> Self {
        let mut graph = MemoryGraph::new();
        for node in snapshot.nodes {
            graph.add_node(node);
        }
        graph.connections = snapshot.connections;
        graph
    }
}

/// Snapshot of a host scene graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "GraphSnapshot")]
pub struct MemoryGraph {
    nodes: Vec<MemoryNode>,
    connections: Vec<AttrConnection>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Adds a node, replacing any existing node of the same name
    pub fn add_node(&mut self, node: MemoryNode) -> NodeHandle {
        let handle = NodeHandle::new(node.name.clone());
        match self.index.get(&node.name) {
            Some(&slot) => self.nodes[slot] = node,
            None => {
                self.index.insert(node.name.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
        handle
    }

    /// Connects `from_node.from_attr` into `to_node.to_attr`
    pub fn connect(
        &mut self,
        from_node: &str,
        from_attr: &str,
        to_node: &str,
        to_attr: &str,
    ) -> Result<(), &'static str> {
        if from_node == to_node {
            return Err("Cannot connect a node to itself");
        }
        if !self.index.contains_key(from_node) {
            return Err("Source node does not exist");
        }
        if !self.index.contains_key(to_node) {
            return Err("Target node does not exist");
        }
        self.connections
            .push(AttrConnection::new(from_node, from_attr, to_node, to_attr));
        Ok(())
    }

    pub fn node(&self, name: &str) -> Option<&MemoryNode> {
        self.index.get(name).map(|&slot| &self.nodes[slot])
    }

    pub fn nodes(&self) -> &[MemoryNode] {
        &self.nodes
    }

    pub fn connections(&self) -> &[AttrConnection] {
        &self.connections
    }

    fn lookup(&self, handle: &NodeHandle) -> Result<&MemoryNode, HostError> {
        self.node(handle.name())
            .ok_or_else(|| HostError::NodeNotFound(handle.name().to_string()))
    }

    /// Resolves the node that actually carries mesh data: the node itself, or
    /// the first child shape with a mesh
    fn mesh_node<'a>(&'a self, node: &'a MemoryNode) -> Option<&'a MemoryNode> {
        if node.mesh.is_some() {
            return Some(node);
        }
        self.nodes
            .iter()
            .find(|child| child.parent.as_deref() == Some(node.name.as_str()) && child.mesh.is_some())
    }
}

impl SceneGraph for MemoryGraph {
    fn nodes_of_type(&self, node_type: &str) -> Vec<NodeHandle> {
        self.nodes
            .iter()
            .filter(|node| node.node_type == node_type)
            .map(|node| NodeHandle::new(node.name.clone()))
            .collect()
    }

    fn nodes_with_attribute(&self, attribute: &str) -> Vec<NodeHandle> {
        self.nodes
            .iter()
            .filter(|node| node.attributes.contains_key(attribute))
            .map(|node| NodeHandle::new(node.name.clone()))
            .collect()
    }

    fn exists(&self, node: &NodeHandle) -> bool {
        self.index.contains_key(node.name())
    }

    fn node_type(&self, node: &NodeHandle) -> Result<String, HostError> {
        Ok(self.lookup(node)?.node_type.clone())
    }

    fn attribute(&self, node: &NodeHandle, name: &str) -> Option<AttrValue> {
        self.node(node.name())?.attributes.get(name).cloned()
    }

    fn history(&self, node: &NodeHandle) -> Result<Vec<NodeHandle>, HostError> {
        Ok(self
            .lookup(node)?
            .history
            .iter()
            .map(|name| NodeHandle::new(name.clone()))
            .collect())
    }

    fn parent(&self, node: &NodeHandle) -> Option<NodeHandle> {
        self.node(node.name())?
            .parent
            .as_ref()
            .map(|name| NodeHandle::new(name.clone()))
    }

    fn children(&self, node: &NodeHandle) -> Vec<NodeHandle> {
        self.nodes
            .iter()
            .filter(|child| child.parent.as_deref() == Some(node.name()))
            .map(|child| NodeHandle::new(child.name.clone()))
            .collect()
    }

    fn world_matrix(&self, node: &NodeHandle) -> Result<DMat4, HostError> {
        let mut current = self.lookup(node)?;
        let mut world = current.matrix;
        let mut depth = 0;
        while let Some(parent) = current.parent.as_deref() {
            depth += 1;
            if depth > self.nodes.len() {
                return Err(HostError::Query {
                    node: node.name().to_string(),
                    message: "parent chain contains a cycle".to_string(),
                });
            }
            current = self.lookup(&NodeHandle::new(parent))?;
            world = current.matrix * world;
        }
        Ok(world)
    }

    fn world_rotate_pivot(&self, node: &NodeHandle) -> Result<DVec3, HostError> {
        let pivot = self.lookup(node)?.rotate_pivot;
        Ok(self.world_matrix(node)?.transform_point3(pivot))
    }

    fn mesh(&self, node: &NodeHandle, space: Space) -> Result<HostMesh, HostError> {
        let owner = self.lookup(node)?;
        let shape_node = self
            .mesh_node(owner)
            .ok_or_else(|| HostError::NotAMesh(node.name().to_string()))?;
        let Some(shape) = shape_node.mesh.as_ref() else {
            return Err(HostError::NotAMesh(node.name().to_string()));
        };

        let world = match space {
            Space::Object => None,
            Space::World => Some(self.world_matrix(&NodeHandle::new(shape_node.name.clone()))?),
        };
        Ok(shape.to_host_mesh(world))
    }

    fn connected_sources(
        &self,
        node: &NodeHandle,
        attribute: &str,
        source_type: &str,
    ) -> Vec<NodeHandle> {
        self.connections
            .iter()
            .filter(|conn| conn.to_node == node.name() && conn.to_attr == attribute)
            .filter(|conn| {
                self.node(&conn.from_node)
                    .is_some_and(|source| source.node_type == source_type)
            })
            .map(|conn| NodeHandle::new(conn.from_node.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> MeshShape {
        MeshShape::new(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(1.0, 1.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2, 3]],
        )
    }

    #[test]
    fn test_enumeration_follows_insertion_order() {
        let mut graph = MemoryGraph::new();
        graph.add_node(MemoryNode::new("b", "transform"));
        graph.add_node(MemoryNode::new("a", "transform"));
        graph.add_node(MemoryNode::new("cam", "camera"));

        let names: Vec<String> = graph
            .nodes_of_type("transform")
            .iter()
            .map(|h| h.name().to_string())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_world_matrix_composes_parents() {
        let mut graph = MemoryGraph::new();
        graph.add_node(MemoryNode::new("root", "transform").with_translation(DVec3::new(1.0, 0.0, 0.0)));
        graph.add_node(
            MemoryNode::new("child", "transform")
                .with_parent("root")
                .with_translation(DVec3::new(0.0, 2.0, 0.0)),
        );

        let t = graph.world_translation(&"child".into()).unwrap();
        assert_eq!(t, DVec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_mesh_resolves_child_shape_in_world_space() {
        let mut graph = MemoryGraph::new();
        graph.add_node(MemoryNode::new("plane", "transform").with_translation(DVec3::new(0.0, 0.0, 5.0)));
        graph.add_node(MemoryNode::new("planeShape", "mesh").with_parent("plane").with_mesh(unit_quad()));

        let world = graph.mesh(&"plane".into(), Space::World).unwrap();
        assert_eq!(world.points[2], DVec3::new(1.0, 1.0, 5.0));
        assert!((world.vertex_normals[0] - DVec3::Z).length() < 1e-9);

        let local = graph.mesh(&"plane".into(), Space::Object).unwrap();
        assert_eq!(local.points[2], DVec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_mesh_on_shape_node_itself() {
        let mut graph = MemoryGraph::new();
        graph.add_node(MemoryNode::new("plane", "transform").with_translation(DVec3::new(2.0, 0.0, 0.0)));
        graph.add_node(MemoryNode::new("planeShape", "mesh").with_parent("plane").with_mesh(unit_quad()));

        let world = graph.mesh(&"planeShape".into(), Space::World).unwrap();
        assert_eq!(world.points[0], DVec3::new(2.0, 0.0, 0.0));
        assert_eq!(world.face_count(), 1);
    }

    #[test]
    fn test_malformed_face_counts_do_not_panic_normal_computation() {
        let mut shape = unit_quad();
        shape.face_vertex_counts = vec![4, usize::MAX];
        let mut graph = MemoryGraph::new();
        graph.add_node(MemoryNode::new("bad", "mesh").with_mesh(shape));

        let mesh = graph.mesh(&"bad".into(), Space::Object).unwrap();
        assert_eq!(mesh.vertex_normals.len(), 4);
    }

    #[test]
    fn test_mesh_on_non_mesh_fails() {
        let mut graph = MemoryGraph::new();
        graph.add_node(MemoryNode::new("empty", "transform"));
        assert!(matches!(
            graph.mesh(&"empty".into(), Space::World),
            Err(HostError::NotAMesh(_))
        ));
    }

    #[test]
    fn test_connect_validation() {
        let mut graph = MemoryGraph::new();
        graph.add_node(MemoryNode::new("mat", "krrustyMaterial"));
        graph.add_node(MemoryNode::new("tex", "file"));

        assert!(graph.connect("mat", "outColor", "mat", "diffuse").is_err());
        assert!(graph.connect("missing", "outColor", "mat", "diffuse").is_err());
        assert!(graph.connect("tex", "outColor", "mat", "diffuse").is_ok());

        let sources = graph.connected_sources(&"mat".into(), "diffuse", "file");
        assert_eq!(sources, vec![NodeHandle::new("tex")]);
        assert!(graph.connected_sources(&"mat".into(), "roughness", "file").is_empty());
    }

    #[test]
    fn test_snapshot_json_rebuilds_index() {
        let json = r#"{
            "nodes": [
                {"name": "ball", "node_type": "transform",
                 "attributes": {"visibility": true, "krrustyMaterial": "red"},
                 "history": ["ballShape", "polySphere1"]},
                {"name": "polySphere1", "node_type": "polySphere",
                 "attributes": {"radius": 2}}
            ]
        }"#;
        let graph = MemoryGraph::from_json(json).unwrap();
        assert!(graph.exists(&"ball".into()));
        assert_eq!(
            graph.attribute(&"ball".into(), "krrustyMaterial"),
            Some(AttrValue::String("red".to_string()))
        );
        assert_eq!(graph.attribute(&"polySphere1".into(), "radius"), Some(AttrValue::Int(2)));
        assert_eq!(graph.history(&"ball".into()).unwrap().len(), 2);
    }
}
