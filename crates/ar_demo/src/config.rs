//! Settings sections stored in `<app_id>.settings.json`.

use anyhow::{Context, Result};
use app::LOG_SCENE;
use bevy::color::Srgba;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use settings::Settings;
use surface_cursor::SurfaceCursorConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    /// glTF model, relative to the asset folder.
    pub model_path: String,
    pub model_scale: f32,
    pub cursor_diameter: f32,
    pub indicator_texture: Option<String>,
    /// `#RRGGBB` tint multiplied into the indicator texture.
    pub indicator_color: String,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            model_path: "models/Biplane.glb".into(),
            model_scale: 2.0,
            cursor_diameter: 1.5,
            indicator_texture: Some("textures/ar-placement-target.png".into()),
            indicator_color: "#FFE082".into(),
        }
    }
}

impl Settings for DemoSettings {
    const SECTION: &'static str = "demo";
}

impl DemoSettings {
    pub fn cursor_config(&self) -> SurfaceCursorConfig {
        let fallback = SurfaceCursorConfig::default();
        let indicator_color = parse_hex_color(&self.indicator_color).unwrap_or_else(|err| {
            warn!(target: LOG_SCENE, "{err:#}, using the default indicator color");
            fallback.indicator_color
        });

        SurfaceCursorConfig {
            diameter: self.cursor_diameter,
            indicator_texture: self.indicator_texture.clone(),
            indicator_color,
            ..fallback
        }
    }
}

/// Prefiltered cube maps for image based lighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentMapPaths {
    pub diffuse: String,
    pub specular: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Edge length of the square ground plane.
    pub ground_size: f32,
    /// Without a map the scene falls back to ambient light.
    pub environment_map: Option<EnvironmentMapPaths>,
    /// Multiplier on [`ENVIRONMENT_LUMINANCE`].
    pub environment_intensity: f32,
    /// Used only without an environment map.
    pub ambient_brightness: f32,
    pub key_light_illuminance: f32,
    pub shadow_map_size: usize,
    /// Initial look target of the AR camera until a tracker pose arrives.
    pub ar_camera_look_at: [f32; 3],
}

/// Environment map luminance at intensity 1.0, in cd/m².
pub const ENVIRONMENT_LUMINANCE: f32 = 1_000.0;

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            ground_size: 20.0,
            environment_map: None,
            environment_intensity: 0.8,
            ambient_brightness: 800.0,
            key_light_illuminance: 5_000.0,
            shadow_map_size: 1024,
            ar_camera_look_at: [0.0, 0.0, -2.0],
        }
    }
}

impl Settings for SceneSettings {
    const SECTION: &'static str = "scene";
}

impl SceneSettings {
    pub fn ar_look_target(&self) -> Vec3 {
        Vec3::from_array(self.ar_camera_look_at)
    }
}

pub fn parse_hex_color(hex: &str) -> Result<Color> {
    let srgba = Srgba::hex(hex).with_context(|| format!("invalid color {hex:?}"))?;
    Ok(Color::Srgba(srgba))
}
