//! Host naming conventions and default values
//!
//! Centralized location for the node types, attribute names and fallbacks the
//! extraction pipeline relies on.

/// Sentinel material name written for objects without a material binding
pub const DEFAULT_MATERIAL: &str = "defaultMaterial";

/// Host node type names
pub mod node_type {
    pub const TRANSFORM: &str = "transform";
    pub const MESH: &str = "mesh";
    pub const POLY_SPHERE: &str = "polySphere";
    pub const DIRECTIONAL_LIGHT: &str = "directionalLight";
    /// Image texture node feeding material channels
    pub const FILE_TEXTURE: &str = "file";
}

/// Built-in host attribute names
pub mod attr {
    pub const VISIBILITY: &str = "visibility";
    pub const RADIUS: &str = "radius";
    pub const COLOR: &str = "color";
    pub const INTENSITY: &str = "intensity";
    pub const FILE_TEXTURE_NAME: &str = "fileTextureName";
    /// Renderer-specific angular softness on directional lights
    pub const LIGHT_ANGLE: &str = "aiAngle";

    pub const HORIZONTAL_FILM_APERTURE: &str = "horizontalFilmAperture";
    pub const FOCAL_LENGTH: &str = "focalLength";
    pub const LENS_APERTURE: &str = "aperture";
    /// Older scenes carry the lens aperture under this spelling
    pub const LENS_APERTURE_LEGACY: &str = "aperature";

    pub const RESOLUTION_WIDTH: &str = "width";
    pub const RESOLUTION_HEIGHT: &str = "height";

    pub const IOR: &str = "ior";
    pub const BUMP_STRENGTH: &str = "bumpStrength";
    pub const NORMAL_STRENGTH: &str = "normalStrength";
}

/// Fallbacks used when an optional attribute is absent
pub mod defaults {
    pub const SPHERE_RADIUS: f64 = 1.0;
    pub const QUAD_LIGHT_COLOR: [f64; 3] = [1.0, 1.0, 1.0];
    pub const QUAD_LIGHT_INTENSITY: f64 = 4.0;
    pub const DIR_LIGHT_COLOR: [f64; 3] = [1.0, 1.0, 1.0];
    pub const DIR_LIGHT_INTENSITY: f64 = 1.0;
    pub const DIR_LIGHT_SOFTNESS: f64 = 0.0;

    /// 35mm full aperture, in inches
    pub const FILM_APERTURE: f64 = 1.417;
    pub const FOCAL_LENGTH: f64 = 35.0;
    pub const LENS_APERTURE: f64 = 0.0;

    pub const IOR: f64 = 1.5;
    pub const BUMP_STRENGTH: f64 = 1.0;
    pub const NORMAL_STRENGTH: f64 = 1.0;
}

/// Camera and lens unit conversions
pub mod lens {
    pub const MM_PER_INCH: f64 = 25.4;
    /// Host lens aperture units per renderer aperture unit
    pub const APERTURE_DIVISOR: f64 = 10.0;
}

/// Renderer hand-off defaults
pub mod renderer {
    /// Environment variable overriding the renderer install directory
    pub const INSTALL_DIR_ENV: &str = "SCENE_BRIDGE_RENDERER_DIR";
    pub const EXECUTABLE: &str = "krrust";
    pub const SCENE_FILE_NAME: &str = "render_data.json";
    pub const INSTALL_SUBDIR: &str = "renderer";
}

/// Scene file envelope
pub mod format {
    pub const VERSION: &str = "1.0";
    pub const CREATOR: &str = concat!("scene-bridge ", env!("CARGO_PKG_VERSION"));
}
