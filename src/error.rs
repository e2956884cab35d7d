//! Error types for scene extraction and export
//!
//! Soft absences (optional attributes, missing texture connections, meshes
//! without UVs) never reach these types; they are resolved to defaults at the
//! call site. Everything here is a hard failure that aborts the export.

use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by a host scene graph query
#[derive(Debug, Error)]
pub enum HostError {
    #[error("node '{0}' does not exist in the scene graph")]
    NodeNotFound(String),

    #[error("node '{0}' has no polygonal mesh shape")]
    NotAMesh(String),

    #[error("node '{0}' has no parent transform")]
    NoParent(String),

    #[error("host query failed on '{node}': {message}")]
    Query { node: String, message: String },
}

/// Failures that abort an export run
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error("required {role} node '{name}' is missing")]
    MissingNode { role: &'static str, name: String },

    #[error("quad light '{0}' does not reference a light plane")]
    MissingLightPlane(String),

    #[error("invalid render resolution {width}x{height}")]
    InvalidResolution { width: f64, height: f64 },

    #[error("mesh '{mesh}' has inconsistent topology: {reason}")]
    Topology { mesh: String, reason: String },

    #[error("{field} is {recorded} but {actual} records are present")]
    CountMismatch {
        field: &'static str,
        recorded: usize,
        actual: usize,
    },

    #[error("scene document encoding failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to parse config '{}': {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch renderer '{}': {source}", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
