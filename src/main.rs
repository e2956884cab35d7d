//! scene-bridge command line
//!
//! Exports host scene snapshots, inspects written scene files and checks the
//! renderer installation.

use scene_bridge::export::{check_installation, inspect};
use scene_bridge::{export_scene, ExportConfig, MemoryGraph};
use std::env;
use std::path::{Path, PathBuf};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let Some(command) = args.get(1).map(String::as_str) else {
        print_usage();
        std::process::exit(2);
    };

    let result = match command {
        "export" => export_command(&args),
        "inspect" => inspect_command(&args),
        "check" => check_command(&args),
        "-h" | "--help" | "help" => {
            print_usage();
            Ok(())
        }
        _ => {
            print_usage();
            Err(format!("unknown command `{command}`"))
        }
    };

    if let Err(err) = result {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  scene-bridge export <snapshot.json> [--config <file.toml>] [--no-launch] [--out <scene.json>]");
    eprintln!("  scene-bridge inspect <scene.json>");
    eprintln!("  scene-bridge check [--config <file.toml>]   # renderer install pre-flight");
}

fn parse_flag_value(args: &[String], flag: &str) -> Option<String> {
    let idx = args.iter().position(|a| a == flag)?;
    args.get(idx + 1).cloned()
}

fn positional(args: &[String], what: &str) -> Result<PathBuf, String> {
    match args.get(2) {
        Some(arg) if !arg.starts_with("--") => Ok(PathBuf::from(arg)),
        _ => Err(format!("missing {what} path")),
    }
}

fn load_config(args: &[String]) -> Result<ExportConfig, String> {
    let path = parse_flag_value(args, "--config").map(PathBuf::from);
    ExportConfig::load_or_default(path.as_deref()).map_err(|e| e.to_string())
}

fn load_snapshot(path: &Path) -> Result<MemoryGraph, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read snapshot {}: {e}", path.display()))?;
    MemoryGraph::from_json(&content).map_err(|e| format!("failed to parse snapshot {}: {e}", path.display()))
}

fn export_command(args: &[String]) -> Result<(), String> {
    let snapshot = positional(args, "snapshot")?;
    let mut config = load_config(args)?;
    if args.iter().any(|a| a == "--no-launch") {
        config.renderer.launch = false;
    }
    let out = parse_flag_value(args, "--out").map(PathBuf::from);

    let graph = load_snapshot(&snapshot)?;
    let source = snapshot.display().to_string();
    let report = export_scene(&graph, &config, &source, out.as_deref()).map_err(|e| e.to_string())?;

    println!("Scene written to {}", report.scene_file.display());
    println!("Export id {}", report.export_id);
    for warning in report.diagnostics.warnings() {
        println!("  warning: {warning}");
    }
    if let Some(receipt) = report.handoff {
        println!("Renderer started (pid {})", receipt.pid);
    }
    Ok(())
}

fn inspect_command(args: &[String]) -> Result<(), String> {
    let path = positional(args, "scene file")?;
    let summary = inspect(&path).map_err(|e| e.to_string())?;
    println!("{summary}");
    Ok(())
}

fn check_command(args: &[String]) -> Result<(), String> {
    let config = load_config(args)?;
    let status = check_installation(&config.renderer);

    println!("Renderer directory: {}", status.install_dir.display());
    if !status.dir_exists {
        return Err(format!(
            "renderer directory not found; set [renderer] install_dir or {}",
            scene_bridge::constants::renderer::INSTALL_DIR_ENV
        ));
    }
    if !status.executable_exists {
        return Err(format!("renderer executable not found at {}", status.executable.display()));
    }
    println!("✓ Renderer found at {}", status.executable.display());
    Ok(())
}
