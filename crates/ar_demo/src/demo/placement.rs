//! Placing the hero model at the cursor.
//!
//! A press locks the cursor and starts an asynchronous glTF load. Once the
//! scene is ready it is spawned at the locked position, turned towards the
//! camera, and the cursor is disabled. Load failures are logged; the button
//! comes back so the user can try again.

use super::DemoCursor;
use super::ui::{PlaceObjectButton, PlaceObjectRequested, set_button_visible};
use crate::config::DemoSettings;
use app::LOG_PLACEMENT;
use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use settings::SettingsArc;
use surface_cursor::{CursorCamera, SurfaceCursor, SurfaceCursorSystems};

/// Plugin for loading and placing the hero model
pub(super) struct PlacementPlugin;

impl Plugin for PlacementPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (handle_place_requests, spawn_loaded_hero)
                .chain()
                .after(SurfaceCursorSystems::Tick),
        );
    }
}

/// Marker component for the placed model
#[derive(Component)]
pub struct Hero;

/// Model load in flight and where it goes once loaded.
///
/// Failures can surface on either the file or its first scene, so both handles are kept.
#[derive(Resource, Debug)]
pub struct PendingHero {
    pub gltf: Handle<Gltf>,
    pub scene: Handle<Scene>,
    pub path: String,
    pub position: Vec3,
}

/// Locks the cursor at its current position and returns it.
///
/// Without a position nothing changes.
pub fn begin_placement(cursor: &mut SurfaceCursor) -> Option<Vec3> {
    let position = cursor.position()?;
    cursor.lock(true);
    Some(position)
}

/// Yaw that turns a model's +Z towards the camera.
///
/// The camera is projected onto the model's height first, so the model stays
/// upright no matter how high the camera is.
pub fn facing_camera_rotation(position: Vec3, camera: Vec3) -> Quat {
    let to_camera = Vec3::new(camera.x, position.y, camera.z) - position;
    if to_camera.length_squared() <= f32::EPSILON {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_y(to_camera.x.atan2(to_camera.z))
}

fn handle_place_requests(
    mut commands: Commands,
    mut requests: MessageReader<PlaceObjectRequested>,
    mut cursors: Query<&mut SurfaceCursor, With<DemoCursor>>,
    mut buttons: Query<&mut Visibility, With<PlaceObjectButton>>,
    heroes: Query<Entity, With<Hero>>,
    pending: Option<Res<PendingHero>>,
    demo: Res<SettingsArc<DemoSettings>>,
    asset_server: Res<AssetServer>,
) {
    // Several clicks in one frame count as one
    if requests.read().count() == 0 || pending.is_some() {
        return;
    }
    let Ok(mut cursor) = cursors.single_mut() else {
        return;
    };
    let Some(position) = begin_placement(&mut cursor) else {
        debug!(target: LOG_PLACEMENT, "Place requested without a cursor position");
        return;
    };

    set_button_visible(&mut buttons, false);
    for hero in &heroes {
        commands.entity(hero).despawn();
    }

    info!(target: LOG_PLACEMENT, "Starting hero mesh load.");
    let path = demo.model_path.clone();
    let gltf = asset_server.load(path.clone());
    let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(path.clone()));
    commands.insert_resource(PendingHero {
        gltf,
        scene,
        path,
        position,
    });
}

fn load_failure(asset_server: &AssetServer, pending: &PendingHero) -> Option<String> {
    [
        asset_server.load_state(&pending.gltf),
        asset_server.load_state(&pending.scene),
    ]
    .into_iter()
    .find_map(|state| match state {
        LoadState::Failed(err) => Some(err.to_string()),
        _ => None,
    })
}

fn spawn_loaded_hero(
    mut commands: Commands,
    pending: Option<Res<PendingHero>>,
    mut cursors: Query<&mut SurfaceCursor, With<DemoCursor>>,
    mut buttons: Query<&mut Visibility, With<PlaceObjectButton>>,
    cameras: Query<&GlobalTransform, With<CursorCamera>>,
    demo: Res<SettingsArc<DemoSettings>>,
    asset_server: Res<AssetServer>,
    scenes: Res<Assets<Scene>>,
) {
    let Some(pending) = pending else {
        return;
    };

    if let Some(err) = load_failure(&asset_server, &pending) {
        error!(target: LOG_PLACEMENT, "Failed to load {}: {err}", pending.path);
        commands.remove_resource::<PendingHero>();
        for mut cursor in &mut cursors {
            cursor.lock(false);
        }
        set_button_visible(&mut buttons, true);
        return;
    }
    if !scenes.contains(&pending.scene) {
        return;
    }

    info!(target: LOG_PLACEMENT, "Hero mesh loaded.");
    for mut cursor in &mut cursors {
        cursor.set_enabled(false);
    }

    let rotation = cameras
        .iter()
        .next()
        .map(|camera| facing_camera_rotation(pending.position, camera.translation()))
        .unwrap_or(Quat::IDENTITY);

    commands.spawn((
        Hero,
        SceneRoot(pending.scene.clone()),
        Transform {
            translation: pending.position,
            rotation,
            scale: Vec3::splat(demo.model_scale),
        },
        Name::new("Hero"),
    ));
    commands.remove_resource::<PendingHero>();
}
