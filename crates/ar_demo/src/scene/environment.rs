use super::{SceneMode, SceneSetup};
use crate::config::SceneSettings;
use app::LOG_SCENE;
use bevy::image::{ImageAddressMode, ImageLoaderSettings, ImageSampler, ImageSamplerDescriptor};
use bevy::math::Affine2;
use bevy::prelude::*;
use settings::SettingsArc;

const GRID_TEXTURE: &str = "textures/grey-grid.png";
const GRID_REPEAT: f32 = 12.0;

/// Plugin for the ground plane and background
pub(super) struct EnvironmentPlugin;

impl Plugin for EnvironmentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_environment.in_set(SceneSetup::Base));
    }
}

/// Marker component for the ground plane
#[derive(Component)]
pub struct Ground;

fn setup_environment(
    mut commands: Commands,
    mode: Res<SceneMode>,
    scene: Res<SettingsArc<SceneSettings>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
) {
    let (clear_color, material) = match *mode {
        // Transparent so the camera feed stays visible behind the scene
        SceneMode::Ar => (Color::NONE, shadow_catcher_material()),
        SceneMode::NonAr => (Color::BLACK, grid_material(&asset_server)),
    };
    commands.insert_resource(ClearColor(clear_color));

    let size = scene.ground_size;
    commands.spawn((
        Ground,
        Mesh3d(meshes.add(Plane3d::default().mesh().size(size, size))),
        MeshMaterial3d(materials.add(material)),
        Transform::default(),
        Name::new("Ground"),
    ));

    info!(target: LOG_SCENE, "Ground {size}x{size} set up for {:?}", *mode);
}

/// White ground multiplied onto the background: lit areas keep the feed, shadows darken it.
fn shadow_catcher_material() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::WHITE,
        alpha_mode: AlphaMode::Multiply,
        perceptual_roughness: 1.0,
        reflectance: 0.0,
        ..default()
    }
}

fn grid_material(asset_server: &AssetServer) -> StandardMaterial {
    let grid = asset_server.load_with_settings(GRID_TEXTURE, |settings: &mut ImageLoaderSettings| {
        settings.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
            address_mode_u: ImageAddressMode::Repeat,
            address_mode_v: ImageAddressMode::Repeat,
            ..ImageSamplerDescriptor::linear()
        });
    });

    StandardMaterial {
        base_color_texture: Some(grid),
        uv_transform: Affine2::from_scale(Vec2::splat(GRID_REPEAT)),
        perceptual_roughness: 1.0,
        ..default()
    }
}
