//! Host scene graph interface
//!
//! The modeling application owns the scene graph; this crate only reads it.
//! [`SceneGraph`] is the query surface the extraction pipeline needs, and
//! [`memory::MemoryGraph`] is a snapshot implementation of it that can be
//! loaded from JSON.

pub mod memory;

use crate::error::HostError;
use glam::{DMat4, DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use memory::{AttrConnection, MemoryGraph, MemoryNode, MeshShape};

/// Opaque reference to a node in the host graph
///
/// Handles are names, not owned pointers. A handle may stop resolving if the
/// host graph changes between queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeHandle(String);

impl NodeHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeHandle {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Loosely-typed attribute value as stored by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    /// Colors, points and vectors
    Double3([f64; 3]),
    /// Column-major 4x4 matrix
    Matrix([f64; 16]),
}

impl AttrValue {
    /// Short type name, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::Bool(_) => "bool",
            AttrValue::Int(_) => "int",
            AttrValue::Double(_) => "double",
            AttrValue::String(_) => "string",
            AttrValue::Double3(_) => "double3",
            AttrValue::Matrix(_) => "matrix",
        }
    }
}

/// Coordinate space requested from geometry queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    Object,
    World,
}

/// Polygon mesh topology and vertex data as reported by the host
///
/// `face_vertex_indices` is the flattened vertex index of every face corner,
/// grouped by `face_vertex_counts`. UVs are indirect: `uv_counts` gives the
/// number of mapped corners per face (zero for unmapped faces) and `uv_ids`
/// the flattened index into `uvs` for every mapped corner. A vertex can
/// therefore carry different UVs on different faces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostMesh {
    pub face_vertex_counts: Vec<usize>,
    pub face_vertex_indices: Vec<usize>,
    pub points: Vec<DVec3>,
    pub vertex_normals: Vec<DVec3>,
    pub uvs: Vec<DVec2>,
    pub uv_counts: Vec<usize>,
    pub uv_ids: Vec<usize>,
}

impl HostMesh {
    pub fn face_count(&self) -> usize {
        self.face_vertex_counts.len()
    }

    pub fn has_uvs(&self) -> bool {
        !self.uv_ids.is_empty()
    }
}

/// Read-only query API over a host scene graph
///
/// Enumeration methods return nodes in host enumeration order. Attribute
/// reads are soft: any failure is `None`. Structural and geometric queries
/// fail with [`HostError`].
pub trait SceneGraph {
    /// All nodes of the given type
    fn nodes_of_type(&self, node_type: &str) -> Vec<NodeHandle>;

    /// All nodes carrying an attribute with the given name
    fn nodes_with_attribute(&self, attribute: &str) -> Vec<NodeHandle>;

    fn exists(&self, node: &NodeHandle) -> bool;

    fn node_type(&self, node: &NodeHandle) -> Result<String, HostError>;

    fn attribute(&self, node: &NodeHandle, name: &str) -> Option<AttrValue>;

    /// Construction history of a node, including its shapes and the
    /// generator nodes feeding them
    fn history(&self, node: &NodeHandle) -> Result<Vec<NodeHandle>, HostError>;

    fn parent(&self, node: &NodeHandle) -> Option<NodeHandle>;

    /// Direct children of a node, in host enumeration order
    fn children(&self, node: &NodeHandle) -> Vec<NodeHandle>;

    fn world_matrix(&self, node: &NodeHandle) -> Result<DMat4, HostError>;

    fn world_rotate_pivot(&self, node: &NodeHandle) -> Result<DVec3, HostError>;

    fn world_translation(&self, node: &NodeHandle) -> Result<DVec3, HostError> {
        Ok(self.world_matrix(node)?.w_axis.truncate())
    }

    /// Mesh data of a shape, or of the first mesh shape under a transform
    fn mesh(&self, node: &NodeHandle, space: Space) -> Result<HostMesh, HostError>;

    /// Nodes of `source_type` connected into `node.attribute`
    fn connected_sources(
        &self,
        node: &NodeHandle,
        attribute: &str,
        source_type: &str,
    ) -> Vec<NodeHandle>;
}
