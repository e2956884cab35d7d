use scene_bridge::config::ExportConfig;
use scene_bridge::export::{export_scene, inspect};
use scene_bridge::host::{AttrValue, MemoryGraph, MemoryNode, MeshShape};
use scene_bridge::scene::SceneFile;
use scene_bridge::ExportError;
use glam::{DMat4, DVec2, DVec3};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("scene-bridge-it-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn unit_quad() -> MeshShape {
    MeshShape::new(
        vec![
            DVec3::new(-1.0, 0.0, -1.0),
            DVec3::new(1.0, 0.0, -1.0),
            DVec3::new(1.0, 0.0, 1.0),
            DVec3::new(-1.0, 0.0, 1.0),
        ],
        vec![vec![0, 1, 2, 3]],
    )
}

fn studio() -> MemoryGraph {
    let mut graph = MemoryGraph::new();

    graph.add_node(
        MemoryNode::new("camera1", "transform")
            .with_translation(DVec3::new(0.0, 2.0, 10.0))
            .with_attr("horizontalFilmAperture", AttrValue::Double(1.417))
            .with_attr("focalLength", AttrValue::Double(35.0))
            .with_attr("aperture", AttrValue::Double(2.0)),
    );
    graph.add_node(MemoryNode::new("camera1_aim", "transform").with_translation(DVec3::new(0.0, 1.0, 0.0)));
    graph.add_node(MemoryNode::new("camera1_focus", "transform").with_translation(DVec3::new(0.0, 5.0, 0.0)));
    graph.add_node(
        MemoryNode::new("defaultResolution", "resolution")
            .with_attr("width", AttrValue::Int(1920))
            .with_attr("height", AttrValue::Int(1080)),
    );

    graph.add_node(
        MemoryNode::new("ball", "transform")
            .with_translation(DVec3::new(0.0, 5.0, 0.0))
            .with_history(["ballShape", "polySphere1"]),
    );
    graph.add_node(MemoryNode::new("ballShape", "mesh").with_parent("ball").with_mesh(unit_quad()));
    graph.add_node(MemoryNode::new("polySphere1", "polySphere").with_attr("radius", AttrValue::Double(2.0)));

    graph.add_node(
        MemoryNode::new("floor", "transform")
            .with_history(["floorShape"])
            .with_attr("krrustyMaterial", AttrValue::String("tiles".into())),
    );
    graph.add_node(
        MemoryNode::new("floorShape", "mesh").with_parent("floor").with_mesh(
            unit_quad().with_uvs(
                vec![DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0), DVec2::new(1.0, 1.0), DVec2::new(0.0, 1.0)],
                vec![vec![0, 1, 2, 3]],
            ),
        ),
    );

    graph.add_node(
        MemoryNode::new("tiles", "krrustyMaterial").with_attr("diffuse", AttrValue::Double3([0.9, 0.9, 0.9])),
    );
    graph.add_node(
        MemoryNode::new("tilesTex", "file").with_attr("fileTextureName", AttrValue::String("/tex/tiles.png".into())),
    );
    graph.connect("tilesTex", "outColor", "tiles", "diffuse").unwrap();

    graph.add_node(
        MemoryNode::new("keyLight", "transform")
            .with_translation(DVec3::new(0.0, 6.0, 0.0))
            .with_attr("krrustyLight", AttrValue::Bool(true))
            .with_attr("lightPlane", AttrValue::String("keyLightPlane".into())),
    );
    graph.add_node(MemoryNode::new("keyLightPlane", "transform").with_parent("keyLight"));
    graph.add_node(MemoryNode::new("keyLightPlaneShape", "mesh").with_parent("keyLightPlane").with_mesh(unit_quad()));

    graph.add_node(MemoryNode::new("sun", "transform").with_matrix(DMat4::from_rotation_x(-std::f64::consts::FRAC_PI_4)));
    graph.add_node(MemoryNode::new("sunShape", "directionalLight").with_parent("sun"));

    graph
}

fn config_for(dir: &PathBuf) -> ExportConfig {
    let mut config = ExportConfig::default();
    config.renderer.install_dir = Some(dir.clone());
    config.renderer.launch = false;
    config.render.output_file = dir.join("frame.exr").to_string_lossy().into_owned();
    config
}

#[test]
fn test_export_writes_renderer_scene_file() {
    let dir = temp_dir();
    let report = export_scene(&studio(), &config_for(&dir), "studio", None).unwrap();

    assert_eq!(report.scene_file, dir.join("render_data.json"));
    assert!(report.handoff.is_none());
    assert!(report.diagnostics.warnings().is_empty());

    let value: Value = serde_json::from_str(&fs::read_to_string(&report.scene_file).unwrap()).unwrap();
    let scene = &value["scene"];

    assert_eq!(scene["sphere_count"], 1);
    assert_eq!(scene["spheres"][0]["radius"], 2.0);
    assert_eq!(scene["spheres"][0]["location"], serde_json::json!([0.0, 5.0, 0.0]));
    assert_eq!(scene["spheres"][0]["material"], "defaultMaterial");

    // the floor is the only mesh: the sphere's tessellated shape is not exported twice
    assert_eq!(scene["mesh_count"], 1);
    assert_eq!(scene["meshes"][0]["name"], "floor");
    assert_eq!(scene["meshes"][0]["material"], "tiles");
    assert_eq!(scene["meshes"][0]["vertices"][0].as_array().unwrap().len(), 4);
    assert_eq!(scene["meshes"][0]["uvs"][0][2], serde_json::json!([1.0, 1.0]));

    assert_eq!(scene["material_count"], 1);
    assert_eq!(scene["materials"][0]["diffuse_tex"], "/tex/tiles.png");
    assert_eq!(scene["materials"][0]["normal_tex"], "");

    assert_eq!(scene["quad_light_count"], 1);
    assert_eq!(scene["lights"]["quad"][0]["points"][0][0], serde_json::json!([-1.0, 6.0, -1.0]));
    assert_eq!(scene["lights"]["quad"][0]["intensity"], 4.0);
    assert_eq!(scene["dir_light_count"], 1);

    let settings = &value["settings"];
    assert_eq!(settings["progressive"], 1);
    assert_eq!(settings["width"], 1920);
    assert_eq!(settings["height"], 1080);
    assert_eq!(settings["aperature"], 0.2);
    assert_eq!(settings["camera_origin"], serde_json::json!([0.0, 2.0, 10.0]));
    assert_eq!(settings["camera_focus"], serde_json::json!([0.0, 5.0, 0.0]));

    assert_eq!(value["version"], "1.0");
    assert_eq!(value["metadata"]["export_id"], report.export_id.as_str());

    let summary = inspect(&report.scene_file).unwrap();
    assert_eq!(summary.meshes, 1);
    assert_eq!(summary.spheres, 1);
    assert_eq!(summary.quad_lights, 1);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_output_override_skips_launch() {
    let dir = temp_dir();
    let mut config = config_for(&dir);
    config.renderer.launch = true;
    let out = dir.join("nested").join("scene.json");

    let report = export_scene(&studio(), &config, "studio", Some(&out)).unwrap();
    assert_eq!(report.scene_file, out);
    assert!(report.handoff.is_none());
    let file: SceneFile = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(file.scene.sphere_count, 1);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_failed_export_leaves_no_file() {
    let dir = temp_dir();
    let mut graph = studio();
    graph.add_node(
        MemoryNode::new("brokenLight", "transform").with_attr("krrustyLight", AttrValue::Bool(true)),
    );

    assert!(export_scene(&graph, &config_for(&dir), "studio", None).is_err());
    assert!(!dir.join("render_data.json").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_export_from_json_snapshot() {
    let snapshot = r#"{
        "nodes": [
            {"name": "camera1", "node_type": "transform",
             "matrix": [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,8,1]},
            {"name": "camera1_aim", "node_type": "transform"},
            {"name": "camera1_focus", "node_type": "transform"},
            {"name": "defaultResolution", "node_type": "resolution",
             "attributes": {"width": 1280, "height": 720}},
            {"name": "tri", "node_type": "transform", "history": ["triShape"]},
            {"name": "triShape", "node_type": "mesh", "parent": "tri",
             "mesh": {"face_vertex_counts": [3], "face_vertex_indices": [0, 1, 2],
                      "points": [[0,0,0], [1,0,0], [0,1,0]]}}
        ]
    }"#;
    let graph = MemoryGraph::from_json(snapshot).unwrap();

    let dir = temp_dir();
    let report = export_scene(&graph, &config_for(&dir), "snapshot.json", None).unwrap();
    let file: SceneFile = serde_json::from_str(&fs::read_to_string(&report.scene_file).unwrap()).unwrap();

    assert_eq!(file.settings.height, 1080);
    assert_eq!(file.settings.camera_origin, DVec3::new(0.0, 0.0, 8.0));
    assert_eq!(file.scene.meshes[0].uvs, vec![Vec::<DVec2>::new()]);
    assert_eq!(file.scene.meshes[0].normals[0][0], DVec3::Z);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_launch_failure_happens_after_complete_write() {
    let dir = temp_dir();
    let mut config = config_for(&dir);
    config.renderer.launch = true;
    config.renderer.executable = format!("missing-renderer-{}", uuid::Uuid::new_v4());

    let result = export_scene(&studio(), &config, "studio", None);
    assert!(matches!(result, Err(ExportError::Launch { .. })));

    let written = dir.join("render_data.json");
    let file: SceneFile = serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();
    assert_eq!(file.scene.mesh_count, 1);
    assert_eq!(file.scene.sphere_count, 1);
    assert_eq!(file.settings.width, 1920);
    assert!(file.metadata.is_some());

    fs::remove_dir_all(&dir).unwrap();
}
