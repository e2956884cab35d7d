//! Renderer hand-off
//!
//! The renderer picks up its scene file from its own working directory, so
//! it is started from the install directory with no arguments and left
//! running. Nothing is reported back; the receipt only says that a process
//! was started.

use crate::error::{ExportError, Result};
use log::info;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Proof that the renderer process was started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffReceipt {
    pub pid: u32,
    pub program: PathBuf,
    pub scene_file: PathBuf,
}

/// Command that starts the renderer detached from this process's stdio
pub fn build_command(executable: &Path, install_dir: &Path) -> Command {
    let mut cmd = Command::new(executable);
    cmd.current_dir(install_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    cmd
}

/// Starts the renderer without waiting on it
pub fn launch_renderer(executable: &Path, install_dir: &Path, scene_file: &Path) -> Result<HandoffReceipt> {
    let child = build_command(executable, install_dir)
        .spawn()
        .map_err(|source| ExportError::Launch {
            program: executable.to_path_buf(),
            source,
        })?;

    info!("Started renderer {:?} (pid {})", executable, child.id());
    Ok(HandoffReceipt {
        pid: child.id(),
        program: executable.to_path_buf(),
        scene_file: scene_file.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_runs_from_install_dir_without_args() {
        let cmd = build_command(Path::new("/opt/krrust/krrust"), Path::new("/opt/krrust"));
        assert_eq!(cmd.get_program(), "/opt/krrust/krrust");
        assert_eq!(cmd.get_current_dir(), Some(Path::new("/opt/krrust")));
        assert_eq!(cmd.get_args().count(), 0);
    }

    #[test]
    fn test_missing_executable_is_a_launch_error() {
        let dir = std::env::temp_dir();
        let missing = dir.join(format!("no-such-renderer-{}", uuid::Uuid::new_v4()));
        let result = launch_renderer(&missing, &dir, &dir.join("render_data.json"));
        assert!(matches!(result, Err(ExportError::Launch { program, .. }) if program == missing));
    }
}
