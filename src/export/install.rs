//! Renderer installation lookup and pre-flight check

use crate::config::RendererConfig;
use crate::constants::renderer;
use log::debug;
use std::env;
use std::path::{Path, PathBuf};

/// Resolves the renderer install directory
///
/// Order: configured directory, `SCENE_BRIDGE_RENDERER_DIR`, a `renderer`
/// directory next to the running executable, the platform data directory.
pub fn renderer_dir(config: &RendererConfig) -> PathBuf {
    if let Some(dir) = &config.install_dir {
        return dir.clone();
    }

    if let Ok(dir) = env::var(renderer::INSTALL_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }

    if let Some(exe_dir) = env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf)) {
        let bundled = exe_dir.join(renderer::INSTALL_SUBDIR);
        if bundled.exists() {
            return bundled;
        }
    }

    let fallback = dirs::data_local_dir()
        .unwrap_or_else(env::temp_dir)
        .join("scene-bridge")
        .join(renderer::INSTALL_SUBDIR);
    debug!("No renderer directory configured, using {:?}", fallback);
    fallback
}

/// Full path of the renderer executable in `install_dir`
pub fn renderer_executable(install_dir: &Path, config: &RendererConfig) -> PathBuf {
    install_dir.join(format!("{}{}", config.executable, env::consts::EXE_SUFFIX))
}

/// Where the scene file for the renderer goes
pub fn scene_path(install_dir: &Path, config: &RendererConfig) -> PathBuf {
    install_dir.join(&config.scene_file_name)
}

/// Outcome of the pre-flight check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallStatus {
    pub install_dir: PathBuf,
    pub executable: PathBuf,
    pub dir_exists: bool,
    pub executable_exists: bool,
}

impl InstallStatus {
    pub fn is_ready(&self) -> bool {
        self.dir_exists && self.executable_exists
    }
}

/// Checks that the renderer is installed where the export will look for it
pub fn check_installation(config: &RendererConfig) -> InstallStatus {
    let install_dir = renderer_dir(config);
    let executable = renderer_executable(&install_dir, config);
    InstallStatus {
        dir_exists: install_dir.is_dir(),
        executable_exists: executable.is_file(),
        install_dir,
        executable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(dir: &Path) -> RendererConfig {
        RendererConfig {
            install_dir: Some(dir.to_path_buf()),
            ..RendererConfig::default()
        }
    }

    #[test]
    fn test_configured_dir_wins() {
        let config = configured(Path::new("/opt/krrust"));
        assert_eq!(renderer_dir(&config), PathBuf::from("/opt/krrust"));
        assert_eq!(
            scene_path(&renderer_dir(&config), &config),
            PathBuf::from("/opt/krrust/render_data.json")
        );
    }

    #[test]
    fn test_executable_name_has_platform_suffix() {
        let config = RendererConfig::default();
        let exe = renderer_executable(Path::new("/opt/krrust"), &config);
        let expected = format!("krrust{}", env::consts::EXE_SUFFIX);
        assert_eq!(exe.file_name().unwrap().to_str().unwrap(), expected);
    }

    #[test]
    fn test_check_installation() {
        let dir = env::temp_dir().join(format!("scene-bridge-install-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = configured(&dir);

        let status = check_installation(&config);
        assert!(status.dir_exists);
        assert!(!status.executable_exists);
        assert!(!status.is_ready());

        std::fs::write(&status.executable, b"").unwrap();
        assert!(check_installation(&config).is_ready());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
