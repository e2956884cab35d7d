//! Mesh flattening into per-face corner loops
//!
//! The renderer wants every face as its own list of corners with position,
//! normal and UV side by side. Positions and normals are looked up by the
//! corner's topological vertex; UVs go through the per-corner UV index, so
//! seams where one vertex carries several UVs survive.

use crate::error::{ExportError, Result};
use crate::host::{HostMesh, NodeHandle, SceneGraph, Space};
use crate::scene::FaceLoops;
use glam::{DVec2, DVec3};

/// Flattened corner data of one mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatGeometry {
    pub positions: FaceLoops<DVec3>,
    pub normals: FaceLoops<DVec3>,
    pub uvs: FaceLoops<DVec2>,
}

/// Flattens the mesh under `node` in world space
pub fn flatten(graph: &dyn SceneGraph, node: &NodeHandle) -> Result<FlatGeometry> {
    let mesh = graph.mesh(node, Space::World)?;
    flatten_host_mesh(node.name(), &mesh)
}

/// World-space corner positions only
pub fn flatten_positions(graph: &dyn SceneGraph, node: &NodeHandle) -> Result<FaceLoops<DVec3>> {
    Ok(flatten(graph, node)?.positions)
}

pub fn flatten_host_mesh(name: &str, mesh: &HostMesh) -> Result<FlatGeometry> {
    let topology_error = |reason: String| ExportError::Topology {
        mesh: name.to_string(),
        reason,
    };

    let corner_total = mesh
        .face_vertex_counts
        .iter()
        .try_fold(0usize, |total, &count| total.checked_add(count))
        .ok_or_else(|| topology_error("face counts overflow".to_string()))?;
    if corner_total != mesh.face_vertex_indices.len() {
        return Err(topology_error(format!(
            "face counts cover {} corners but {} vertex indices are present",
            corner_total,
            mesh.face_vertex_indices.len()
        )));
    }

    let uv_mapped = mesh.has_uvs();
    if uv_mapped && mesh.uv_counts.len() != mesh.face_count() {
        return Err(topology_error(format!(
            "{} uv face counts for {} faces",
            mesh.uv_counts.len(),
            mesh.face_count()
        )));
    }

    let face_count = mesh.face_count();
    let mut flat = FlatGeometry {
        positions: Vec::with_capacity(face_count),
        normals: Vec::with_capacity(face_count),
        uvs: Vec::with_capacity(face_count),
    };

    let mut cursor = 0usize;
    let mut uv_cursor = 0usize;
    for (face, &count) in mesh.face_vertex_counts.iter().enumerate() {
        let corners = cursor
            .checked_add(count)
            .and_then(|end| mesh.face_vertex_indices.get(cursor..end))
            .ok_or_else(|| topology_error(format!("vertex indices end before face {}", face)))?;
        cursor += count;

        let mut positions = Vec::with_capacity(count);
        let mut normals = Vec::with_capacity(count);
        for &vertex in corners {
            let position = mesh.points.get(vertex).ok_or_else(|| {
                topology_error(format!("face {} references missing vertex {}", face, vertex))
            })?;
            let normal = mesh.vertex_normals.get(vertex).ok_or_else(|| {
                topology_error(format!("face {} has no normal for vertex {}", face, vertex))
            })?;
            positions.push(*position);
            normals.push(*normal);
        }

        let mut uvs = Vec::new();
        if uv_mapped {
            let mapped = mesh.uv_counts[face];
            if mapped != 0 && mapped != count {
                return Err(topology_error(format!(
                    "face {} maps {} of {} corners",
                    face, mapped, count
                )));
            }
            let ids = uv_cursor
                .checked_add(mapped)
                .and_then(|end| mesh.uv_ids.get(uv_cursor..end))
                .ok_or_else(|| topology_error(format!("uv ids end before face {}", face)))?;
            uv_cursor += mapped;
            uvs.reserve(mapped);
            for &uv_id in ids {
                let uv = mesh.uvs.get(uv_id).ok_or_else(|| {
                    topology_error(format!("face {} references missing uv {}", face, uv_id))
                })?;
                uvs.push(*uv);
            }
        }

        flat.positions.push(positions);
        flat.normals.push(normals);
        flat.uvs.push(uvs);
    }

    Ok(flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryGraph, MemoryNode, MeshShape};

    /// Two quads sharing an edge, with a UV seam on the shared vertices
    fn seamed_strip() -> MeshShape {
        MeshShape::new(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(1.0, 1.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
                DVec3::new(2.0, 0.0, 0.0),
                DVec3::new(2.0, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2, 3], vec![1, 4, 5, 2]],
        )
        .with_uvs(
            vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(0.5, 0.0),
                DVec2::new(0.5, 1.0),
                DVec2::new(0.0, 1.0),
                DVec2::new(0.6, 0.0),
                DVec2::new(1.0, 0.0),
                DVec2::new(1.0, 1.0),
                DVec2::new(0.6, 1.0),
            ],
            vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7]],
        )
    }

    fn graph_with(mesh: MeshShape, offset: DVec3) -> MemoryGraph {
        let mut graph = MemoryGraph::new();
        graph.add_node(MemoryNode::new("strip", "transform").with_translation(offset));
        graph.add_node(MemoryNode::new("stripShape", "mesh").with_parent("strip").with_mesh(mesh));
        graph
    }

    #[test]
    fn test_flatten_mirrors_face_corner_order() {
        let graph = graph_with(seamed_strip(), DVec3::ZERO);
        let flat = flatten(&graph, &"strip".into()).unwrap();

        assert_eq!(flat.positions.len(), 2);
        assert_eq!(flat.normals.len(), 2);
        assert_eq!(flat.uvs.len(), 2);
        assert_eq!(flat.positions[1][0], DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(flat.positions[1][3], DVec3::new(1.0, 1.0, 0.0));
        for face in 0..2 {
            assert_eq!(flat.positions[face].len(), 4);
            assert_eq!(flat.normals[face].len(), 4);
            assert_eq!(flat.uvs[face].len(), 4);
        }
    }

    #[test]
    fn test_uv_seam_keeps_per_face_values() {
        let graph = graph_with(seamed_strip(), DVec3::ZERO);
        let flat = flatten(&graph, &"strip".into()).unwrap();

        // vertex 1 is corner 1 of face 0 and corner 0 of face 1
        assert_eq!(flat.uvs[0][1], DVec2::new(0.5, 0.0));
        assert_eq!(flat.uvs[1][0], DVec2::new(0.6, 0.0));
    }

    #[test]
    fn test_positions_are_world_space() {
        let graph = graph_with(seamed_strip(), DVec3::new(0.0, 0.0, -3.0));
        let positions = flatten_positions(&graph, &"strip".into()).unwrap();
        assert_eq!(positions[0][2], DVec3::new(1.0, 1.0, -3.0));
    }

    #[test]
    fn test_mesh_without_uvs_yields_empty_faces() {
        let mesh = MeshShape::new(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y],
            vec![vec![0, 1, 2], vec![2, 1, 0]],
        );
        let graph = graph_with(mesh, DVec3::ZERO);
        let flat = flatten(&graph, &"strip".into()).unwrap();
        assert_eq!(flat.uvs, vec![Vec::<DVec2>::new(), Vec::new()]);
        assert_eq!(flat.positions[0].len(), 3);
    }

    #[test]
    fn test_partially_mapped_mesh() {
        let mut mesh = HostMesh {
            face_vertex_counts: vec![3, 3],
            face_vertex_indices: vec![0, 1, 2, 2, 1, 0],
            points: vec![DVec3::ZERO, DVec3::X, DVec3::Y],
            vertex_normals: vec![DVec3::Z; 3],
            uvs: vec![DVec2::ZERO, DVec2::X, DVec2::Y],
            uv_counts: vec![0, 3],
            uv_ids: vec![2, 1, 0],
        };
        let flat = flatten_host_mesh("partial", &mesh).unwrap();
        assert!(flat.uvs[0].is_empty());
        assert_eq!(flat.uvs[1], vec![DVec2::Y, DVec2::X, DVec2::ZERO]);

        mesh.uv_counts = vec![2, 3];
        assert!(matches!(
            flatten_host_mesh("partial", &mesh),
            Err(ExportError::Topology { .. })
        ));
    }

    #[test]
    fn test_inconsistent_topology_is_an_error() {
        let mesh = HostMesh {
            face_vertex_counts: vec![3],
            face_vertex_indices: vec![0, 1, 7],
            points: vec![DVec3::ZERO, DVec3::X, DVec3::Y],
            vertex_normals: vec![DVec3::Z; 3],
            ..Default::default()
        };
        assert!(flatten_host_mesh("broken", &mesh).is_err());

        let short = HostMesh {
            face_vertex_counts: vec![4],
            face_vertex_indices: vec![0, 1, 2],
            ..mesh
        };
        assert!(flatten_host_mesh("short", &short).is_err());
    }

    #[test]
    fn test_overflowing_face_counts_are_an_error() {
        let mesh = HostMesh {
            face_vertex_counts: vec![usize::MAX, 2],
            face_vertex_indices: vec![0],
            points: vec![DVec3::ZERO],
            vertex_normals: vec![DVec3::Z],
            ..Default::default()
        };
        assert!(matches!(
            flatten_host_mesh("huge", &mesh),
            Err(ExportError::Topology { .. })
        ));

        let wide = HostMesh {
            face_vertex_counts: vec![usize::MAX],
            ..mesh
        };
        assert!(matches!(
            flatten_host_mesh("wide", &wide),
            Err(ExportError::Topology { .. })
        ));
    }

    #[test]
    fn test_flatten_non_mesh_propagates_host_error() {
        let mut graph = MemoryGraph::new();
        graph.add_node(MemoryNode::new("locator", "transform"));
        assert!(matches!(
            flatten(&graph, &"locator".into()),
            Err(ExportError::Host(_))
        ));
    }
}
