//! scene-bridge library
//!
//! Reads a host scene graph through the [`host::SceneGraph`] trait, turns it
//! into the renderer's intermediate scene format and hands the result to the
//! external renderer.

pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod extract;
pub mod host;
pub mod scene;

// Re-export commonly used types
pub use config::ExportConfig;
pub use error::{ExportError, HostError, Result};
pub use export::{export_scene, inspect, ExportReport};
pub use extract::{extract_scene, Diagnostics, Extraction};
pub use host::{MemoryGraph, NodeHandle, SceneGraph};
pub use scene::{RenderSettings, SceneDocument, SceneFile};
