//! Material library
//!
//! Meshes pick their material by name when a model is converted:
//! `shade<Name>` uses a matcap shade, `pure<Name>` a flat palette colour and
//! `floorShadow` the shared floor shadow. Everything else keeps the colour
//! it was authored with.

use std::collections::BTreeMap;

use drivescape_math::Color;

/// Surface of a placed mesh
#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    /// Authored colour from the model file
    Model(Color),
    /// Flat unlit colour
    Flat(Color),
    /// Vertical gradient, bottom to top
    Gradient { bottom: Color, top: Color },
    /// Matcap shade by library key
    Shade(String),
    FloorShadow,
    /// Image texture by cache key
    Texture(String),
    /// Debug outline
    Wireframe(Color),
}

impl Material {
    /// Base colour where the material has one
    pub fn color(&self) -> Option<Color> {
        match self {
            Material::Model(c) | Material::Flat(c) | Material::Wireframe(c) => Some(*c),
            Material::Shade(_) | Material::Texture(_) => Some(Color::WHITE),
            Material::Gradient { .. } | Material::FloorShadow => None,
        }
    }
}

/// Lighting parameters shared by every shade
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadeUniforms {
    pub reveal_progress: f32,
    pub indirect_distance_amplitude: f32,
    pub indirect_distance_strength: f32,
    pub indirect_distance_power: f32,
    pub indirect_angle_strength: f32,
    pub indirect_angle_offset: f32,
    pub indirect_angle_power: f32,
    pub indirect_color: Color,
}

impl Default for ShadeUniforms {
    fn default() -> Self {
        Self {
            reveal_progress: 0.0,
            indirect_distance_amplitude: 1.75,
            indirect_distance_strength: 0.5,
            indirect_distance_power: 2.0,
            indirect_angle_strength: 1.5,
            indirect_angle_offset: 0.6,
            indirect_angle_power: 1.0,
            indirect_color: Color::from_hex(0xd04500),
        }
    }
}

/// A matcap material
#[derive(Clone, Debug, PartialEq)]
pub struct ShadeMaterial {
    /// Display name, e.g. `shadeWhite`
    pub name: String,
    /// Matcap texture resource
    pub matcap: String,
    pub uniforms: ShadeUniforms,
}

/// A named flat or gradient colour
#[derive(Clone, Debug, PartialEq)]
pub struct PureMaterial {
    pub name: String,
    pub material: Material,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloorShadowMaterial {
    pub shadow_color: Color,
    pub alpha: f32,
}

/// The `customcolor1..50` palette in order
const CUSTOM_COLORS: [u32; 50] = [
    0x04F404, 0x303030, 0x6D7367, 0xD7DEE2, 0xEB3F3F, 0x4F6A94, 0xEEEEEE, 0xEB3F3F, 0x00A29C, 0x373A3D,
    0xFF0200, 0xFFCFF0, 0x717171, 0x132227, 0x01B3E3, 0xDEDEDE, 0xB1B1B1, 0x1E83FF, 0xE9E9E9, 0x49CECE,
    0x267C6B, 0x4C98FF, 0xCCA173, 0xD1D1D1, 0xCAE0FF, 0xBBBBBB, 0xEBB54F, 0x27501F, 0x76423B, 0x8CCD70,
    0xFFFFFF, 0xD99B59, 0xD40000, 0xFFFBF3, 0x95A1B1, 0xF9EDD7, 0xCFCCC7, 0xF4F3F3, 0x00A300, 0xFFF3C6,
    0x132227, 0xFEB34A, 0x404041, 0xBDC0CC, 0x6F6F6F, 0xBBDAFF, 0xBDC0CC, 0x5C5C5C, 0xCD8B61, 0x71ECEC,
];

/// (key, matcap texture)
const SHADES: [(&str, &str); 14] = [
    ("white", "matcapWhiteTexture"),
    ("orange", "matcapOrangeTexture"),
    ("green", "matcapGreenTexture"),
    ("brown", "matcapBrownTexture"),
    ("gray", "matcapGrayTexture"),
    ("beige", "matcapBeigeTexture"),
    ("red", "matcapRedTexture"),
    ("black", "matcapBlackTexture"),
    ("emeraldGreen", "matcapEmeraldGreenTexture"),
    ("purple", "matcapPurpleTexture"),
    ("blue", "matcapBlueTexture"),
    ("yellow", "matcapYellowTexture"),
    ("metal", "matcapMetalTexture"),
    ("road", "matcapGrayTexture"),
];

/// All shared materials of the city
#[derive(Clone, Debug)]
pub struct MaterialLibrary {
    pures: BTreeMap<String, PureMaterial>,
    shades: BTreeMap<String, ShadeMaterial>,
    /// Edited by the debug panel, then pushed with [`update_shades`](Self::update_shades)
    pub shared: ShadeUniforms,
    floor_shadow: FloorShadowMaterial,
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialLibrary {
    pub fn new() -> Self {
        let mut library = Self {
            pures: BTreeMap::new(),
            shades: BTreeMap::new(),
            shared: ShadeUniforms::default(),
            floor_shadow: FloorShadowMaterial {
                shadow_color: Color::from_hex(0xd04500),
                alpha: 0.0,
            },
        };
        library.set_pures();
        library.set_shades();
        library.update_shades();
        library
    }

    fn set_pures(&mut self) {
        let mut add = |key: &str, material: Material| {
            let name = format!("pure{}", capitalize(key));
            self.pures.insert(key.to_string(), PureMaterial { name, material });
        };

        add(
            "uc",
            Material::Gradient {
                bottom: Color::from_hex(0x04F404),
                top: Color::from_hex(0x02752c),
            },
        );
        add("red", Material::Flat(Color::from_hex(0xff0000)));
        add("white", Material::Flat(Color::from_hex(0xffffff)));
        add("yellow", Material::Flat(Color::from_hex(0xffe889)));
        add("golden", Material::Flat(Color::from_hex(0xFFD700)));
        for (i, hex) in CUSTOM_COLORS.iter().enumerate() {
            add(&format!("customcolor{}", i + 1), Material::Flat(Color::from_hex(*hex)));
        }
    }

    fn set_shades(&mut self) {
        for (key, matcap) in SHADES {
            self.shades.insert(
                key.to_string(),
                ShadeMaterial {
                    name: format!("shade{}", capitalize(key)),
                    matcap: matcap.to_string(),
                    uniforms: self.shared,
                },
            );
        }
    }

    /// Push the shared uniforms into every shade
    pub fn update_shades(&mut self) {
        let shared = self.shared;
        for shade in self.shades.values_mut() {
            shade.uniforms = shared;
        }
    }

    pub fn pure(&self, key: &str) -> Option<&PureMaterial> {
        self.pures.get(key)
    }

    pub fn shade(&self, key: &str) -> Option<&ShadeMaterial> {
        self.shades.get(key)
    }

    pub fn shade_count(&self) -> usize {
        self.shades.len()
    }

    pub fn pure_count(&self) -> usize {
        self.pures.len()
    }

    pub fn floor_shadow(&self) -> FloorShadowMaterial {
        self.floor_shadow
    }

    /// Change the floor shadow colour; every mesh using it follows
    pub fn set_floor_shadow_color(&mut self, color: Color) {
        self.floor_shadow.shadow_color = color;
    }

    /// Material for a mesh called `mesh_name` authored with `authored`
    ///
    /// Unknown shade names fall back to the white shade and unknown pure
    /// names keep the authored colour.
    pub fn resolve(&self, mesh_name: &str, authored: Color) -> Material {
        if let Some(key) = material_key(mesh_name, "shade") {
            if self.shades.contains_key(&key) {
                return Material::Shade(key);
            }
            log::warn!("Unknown shade '{}' on mesh '{}', using white", key, mesh_name);
            return Material::Shade("white".to_string());
        }
        if let Some(key) = material_key(mesh_name, "pure") {
            if let Some(pure) = self.pures.get(&key) {
                return pure.material.clone();
            }
            log::warn!("Unknown pure colour '{}' on mesh '{}'", key, mesh_name);
            return Material::Model(authored);
        }
        if material_key(mesh_name, "floor").map_or(false, |rest| rest.eq_ignore_ascii_case("shadow")) {
            return Material::FloorShadow;
        }
        Material::Model(authored)
    }
}

/// `shadeEmeraldGreen_2` with prefix `shade` → `emeraldGreen`
///
/// Strips a trailing `_NNN` or `.NNN` copy suffix and lowercases the first
/// letter. Returns `None` if the prefix does not match.
fn material_key(mesh_name: &str, prefix: &str) -> Option<String> {
    let head = mesh_name.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let mut rest = &mesh_name[prefix.len()..];
    if let Some(pos) = rest.rfind(|c: char| c == '_' || c == '.') {
        let suffix = &rest[pos + 1..];
        if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
            rest = &rest[..pos];
        }
    }
    let mut chars = rest.chars();
    let first = chars.next()?;
    Some(first.to_ascii_lowercase().to_string() + chars.as_str())
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
