//! Intermediate scene format
//!
//! Field names and nesting of these types are the contract with the external
//! renderer.

pub mod document;
pub mod records;

pub use document::{ExportMetadata, RenderSettings, SceneDocument, SceneFile, SceneLights};
pub use records::{
    DirLightRecord, FaceLoops, MaterialChannel, MaterialRecord, MeshRecord, QuadLightRecord,
    SphereRecord,
};
