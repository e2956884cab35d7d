//! Scene export and renderer hand-off
//!
//! [`export_scene`] is the single entry point used by the host plug-in and
//! the CLI: extract, write the scene file where the renderer expects it,
//! then start the renderer.

pub mod handoff;
pub mod inspect;
pub mod install;
pub mod writer;

use crate::config::ExportConfig;
use crate::error::Result;
use crate::extract::{extract_scene, Diagnostics};
use crate::host::SceneGraph;
use crate::scene::{ExportMetadata, SceneFile};
use log::{info, warn};
use std::path::{Path, PathBuf};

pub use handoff::{build_command, launch_renderer, HandoffReceipt};
pub use inspect::{inspect, summarize, SceneSummary};
pub use install::{check_installation, renderer_dir, renderer_executable, scene_path, InstallStatus};
pub use writer::{write_atomic, write_scene_file};

/// Result of one export run
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub scene_file: PathBuf,
    pub export_id: String,
    pub diagnostics: Diagnostics,
    /// Present when the renderer was started
    pub handoff: Option<HandoffReceipt>,
}

/// Extracts the scene, writes it and hands it to the renderer
///
/// `output` overrides the scene file location. The renderer only reads the
/// scene file from its install directory, so an override skips the launch.
pub fn export_scene(
    graph: &dyn SceneGraph,
    config: &ExportConfig,
    source: &str,
    output: Option<&Path>,
) -> Result<ExportReport> {
    let extraction = extract_scene(graph, config)?;

    let install_dir = renderer_dir(&config.renderer);
    let scene_file = match output {
        Some(path) => path.to_path_buf(),
        None => scene_path(&install_dir, &config.renderer),
    };

    let metadata = ExportMetadata::new(source);
    let export_id = metadata.export_id.clone();
    let mut file = SceneFile::new(extraction.scene, extraction.settings, metadata);
    write_scene_file(&scene_file, &mut file)?;

    let handoff = if !config.renderer.launch {
        info!("Renderer launch disabled, scene written to {:?}", scene_file);
        None
    } else if output.is_some() {
        warn!("Scene written outside the renderer directory, launch skipped");
        None
    } else {
        let executable = renderer_executable(&install_dir, &config.renderer);
        Some(launch_renderer(&executable, &install_dir, &scene_file)?)
    };

    Ok(ExportReport {
        scene_file,
        export_id,
        diagnostics: extraction.diagnostics,
        handoff,
    })
}
