use super::SceneSetup;
use crate::config::SceneSettings;
use app::LOG_SCENE;
use bevy::light::DirectionalLightShadowMap;
use bevy::prelude::*;
use settings::SettingsArc;

pub const KEY_LIGHT_HEIGHT: f32 = 4.0;
pub const KEY_LIGHT_DIRECTION: Vec3 = Vec3::new(-0.3, -2.0, 0.7);

/// Plugin for the key light and ambient lighting
pub(super) struct LightingPlugin;

impl Plugin for LightingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_lighting.in_set(SceneSetup::Base));
    }
}

/// Marker component for the shadow casting key light
#[derive(Component)]
pub struct KeyLight;

fn setup_lighting(
    mut commands: Commands,
    scene: Res<SettingsArc<SceneSettings>>,
    ambient_light: Option<ResMut<AmbientLight>>,
) {
    // The environment map lights the scene on its own; see camera setup
    if let Some(mut ambient_light) = ambient_light {
        ambient_light.color = Color::WHITE;
        ambient_light.brightness = if scene.environment_map.is_some() {
            0.0
        } else {
            scene.ambient_brightness
        };
    }

    commands.insert_resource(DirectionalLightShadowMap {
        size: scene.shadow_map_size,
    });

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            illuminance: scene.key_light_illuminance,
            ..default()
        },
        key_light_transform(),
        KeyLight,
        Name::new("Key Light"),
    ));

    info!(
        target: LOG_SCENE,
        "Key light set up ({} lx, shadow map {})",
        scene.key_light_illuminance, scene.shadow_map_size
    );
}

fn key_light_transform() -> Transform {
    Transform::from_xyz(0.0, KEY_LIGHT_HEIGHT, 0.0).looking_to(KEY_LIGHT_DIRECTION, Vec3::Y)
}
