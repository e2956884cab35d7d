//! Per-object records of the scene document

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Per-face corner data: one inner list per polygon, one entry per corner
pub type FaceLoops<T> = Vec<Vec<T>>;

/// Polygonal mesh flattened into world-space face loops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshRecord {
    pub name: String,
    #[serde(rename = "vertices")]
    pub positions: FaceLoops<DVec3>,
    pub normals: FaceLoops<DVec3>,
    /// Empty inner list for faces without assigned UVs
    pub uvs: FaceLoops<DVec2>,
    /// Material name; not checked against the material catalog
    pub material: String,
}

impl MeshRecord {
    pub fn face_count(&self) -> usize {
        self.positions.len()
    }

    pub fn corner_count(&self) -> usize {
        self.positions.iter().map(Vec::len).sum()
    }
}

/// Implicit sphere
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereRecord {
    pub radius: f64,
    pub location: DVec3,
    pub material: String,
}

/// Area light emitting from the faces of a bound reference plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadLightRecord {
    pub name: String,
    pub color: [f64; 3],
    pub intensity: f64,
    pub points: FaceLoops<DVec3>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirLightRecord {
    pub name: String,
    pub direction: DVec3,
    pub color: [f64; 3],
    pub intensity: f64,
    pub softness: f64,
}

/// The ten color channels of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialChannel {
    Diffuse,
    DiffuseWeight,
    Specular,
    SpecularWeight,
    Roughness,
    Metallic,
    Refraction,
    Emission,
    Bump,
    Normal,
}

impl MaterialChannel {
    pub const ALL: [MaterialChannel; 10] = [
        MaterialChannel::Diffuse,
        MaterialChannel::DiffuseWeight,
        MaterialChannel::Specular,
        MaterialChannel::SpecularWeight,
        MaterialChannel::Roughness,
        MaterialChannel::Metallic,
        MaterialChannel::Refraction,
        MaterialChannel::Emission,
        MaterialChannel::Bump,
        MaterialChannel::Normal,
    ];

    /// Attribute name on the host material node
    pub fn attribute(self) -> &'static str {
        match self {
            MaterialChannel::Diffuse => "diffuse",
            MaterialChannel::DiffuseWeight => "diffuseWeight",
            MaterialChannel::Specular => "specular",
            MaterialChannel::SpecularWeight => "specularWeight",
            MaterialChannel::Roughness => "roughness",
            MaterialChannel::Metallic => "metallic",
            MaterialChannel::Refraction => "refraction",
            MaterialChannel::Emission => "emission",
            MaterialChannel::Bump => "bump",
            MaterialChannel::Normal => "normal",
        }
    }

    /// Value the material node is created with
    pub fn default_value(self) -> [f64; 3] {
        match self {
            MaterialChannel::Diffuse => [0.05, 0.7, 0.5],
            MaterialChannel::DiffuseWeight
            | MaterialChannel::Specular
            | MaterialChannel::SpecularWeight => [1.0, 1.0, 1.0],
            MaterialChannel::Roughness => [0.4, 0.4, 0.4],
            MaterialChannel::Metallic
            | MaterialChannel::Refraction
            | MaterialChannel::Emission
            | MaterialChannel::Bump
            | MaterialChannel::Normal => [0.0, 0.0, 0.0],
        }
    }

    /// Channels holding display colors rather than weights or masks
    pub fn is_color(self) -> bool {
        matches!(
            self,
            MaterialChannel::Diffuse | MaterialChannel::Specular | MaterialChannel::Emission
        )
    }
}

/// One material of the catalog
///
/// Every channel carries a constant and a texture path. An empty path means
/// the constant applies; a non-empty one tells the renderer to sample the
/// texture instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub name: String,
    pub diffuse: [f64; 3],
    pub diffuse_tex: String,
    pub diffuse_weight: [f64; 3],
    pub diffuse_weight_tex: String,
    pub specular: [f64; 3],
    pub specular_tex: String,
    pub specular_weight: [f64; 3],
    pub specular_weight_tex: String,
    pub roughness: [f64; 3],
    pub roughness_tex: String,
    pub ior: f64,
    pub metallic: [f64; 3],
    pub metallic_tex: String,
    pub refraction: [f64; 3],
    pub refraction_tex: String,
    pub emission: [f64; 3],
    pub emission_tex: String,
    pub bump: [f64; 3],
    pub bump_tex: String,
    pub bump_strength: f64,
    pub normal: [f64; 3],
    pub normal_tex: String,
    pub normal_strength: f64,
}

impl MaterialRecord {
    /// A material with every channel at its default and no textures
    pub fn new(name: impl Into<String>) -> Self {
        use crate::constants::defaults;
        use MaterialChannel as C;
        Self {
            name: name.into(),
            diffuse: C::Diffuse.default_value(),
            diffuse_tex: String::new(),
            diffuse_weight: C::DiffuseWeight.default_value(),
            diffuse_weight_tex: String::new(),
            specular: C::Specular.default_value(),
            specular_tex: String::new(),
            specular_weight: C::SpecularWeight.default_value(),
            specular_weight_tex: String::new(),
            roughness: C::Roughness.default_value(),
            roughness_tex: String::new(),
            ior: defaults::IOR,
            metallic: C::Metallic.default_value(),
            metallic_tex: String::new(),
            refraction: C::Refraction.default_value(),
            refraction_tex: String::new(),
            emission: C::Emission.default_value(),
            emission_tex: String::new(),
            bump: C::Bump.default_value(),
            bump_tex: String::new(),
            bump_strength: defaults::BUMP_STRENGTH,
            normal: C::Normal.default_value(),
            normal_tex: String::new(),
            normal_strength: defaults::NORMAL_STRENGTH,
        }
    }

    fn slots_mut(&mut self, channel: MaterialChannel) -> (&mut [f64; 3], &mut String) {
        match channel {
            MaterialChannel::Diffuse => (&mut self.diffuse, &mut self.diffuse_tex),
            MaterialChannel::DiffuseWeight => (&mut self.diffuse_weight, &mut self.diffuse_weight_tex),
            MaterialChannel::Specular => (&mut self.specular, &mut self.specular_tex),
            MaterialChannel::SpecularWeight => (&mut self.specular_weight, &mut self.specular_weight_tex),
            MaterialChannel::Roughness => (&mut self.roughness, &mut self.roughness_tex),
            MaterialChannel::Metallic => (&mut self.metallic, &mut self.metallic_tex),
            MaterialChannel::Refraction => (&mut self.refraction, &mut self.refraction_tex),
            MaterialChannel::Emission => (&mut self.emission, &mut self.emission_tex),
            MaterialChannel::Bump => (&mut self.bump, &mut self.bump_tex),
            MaterialChannel::Normal => (&mut self.normal, &mut self.normal_tex),
        }
    }

    pub fn set_channel(&mut self, channel: MaterialChannel, value: [f64; 3], texture: String) {
        let (slot, tex) = self.slots_mut(channel);
        *slot = value;
        *tex = texture;
    }

    /// Constant and texture path of a channel
    pub fn channel(&self, channel: MaterialChannel) -> ([f64; 3], &str) {
        match channel {
            MaterialChannel::Diffuse => (self.diffuse, &self.diffuse_tex),
            MaterialChannel::DiffuseWeight => (self.diffuse_weight, &self.diffuse_weight_tex),
            MaterialChannel::Specular => (self.specular, &self.specular_tex),
            MaterialChannel::SpecularWeight => (self.specular_weight, &self.specular_weight_tex),
            MaterialChannel::Roughness => (self.roughness, &self.roughness_tex),
            MaterialChannel::Metallic => (self.metallic, &self.metallic_tex),
            MaterialChannel::Refraction => (self.refraction, &self.refraction_tex),
            MaterialChannel::Emission => (self.emission, &self.emission_tex),
            MaterialChannel::Bump => (self.bump, &self.bump_tex),
            MaterialChannel::Normal => (self.normal, &self.normal_tex),
        }
    }
}
