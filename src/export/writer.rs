//! Scene file writer
//!
//! The whole document is serialized into memory first, then written to a
//! sibling temp file and renamed over the target. A reader polling the
//! target path sees either the previous file or the complete new one.

use crate::error::{ExportError, Result};
use crate::scene::SceneFile;
use log::info;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Recomputes and checks counts and per-face parity before serializing
pub fn prepare(file: &mut SceneFile) -> Result<Vec<u8>> {
    file.scene.refresh_counts();
    file.scene.verify_counts()?;
    file.scene.verify_geometry()?;
    Ok(serde_json::to_vec_pretty(file)?)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `bytes` to `path` through a temp file and rename
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
    }

    let temp = temp_sibling(path);
    let written = File::create(&temp)
        .and_then(|mut out| {
            out.write_all(bytes)?;
            out.sync_all()
        })
        .map_err(|e| ExportError::io(&temp, e));
    if let Err(err) = written {
        let _ = fs::remove_file(&temp);
        return Err(err);
    }

    fs::rename(&temp, path).map_err(|e| {
        let _ = fs::remove_file(&temp);
        ExportError::io(path, e)
    })
}

/// Validates, serializes and writes a scene file
pub fn write_scene_file(path: &Path, file: &mut SceneFile) -> Result<()> {
    let bytes = prepare(file)?;
    write_atomic(path, &bytes)?;
    info!("Wrote scene file {:?} ({} bytes)", path, bytes.len());
    Ok(())
}
