//! Demo scene: a surface cursor at the screen center and a button that
//! places a model where the cursor points.

mod placement;
mod ui;

use crate::config::DemoSettings;
use crate::scene::SceneSetup;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use placement::PlacementPlugin;
use settings::SettingsArc;
use surface_cursor::{
    SurfaceCursor, SurfaceCursorPlugin, SurfaceCursorSystems, spawn_surface_cursor, window_center,
};
use ui::PlaceButtonPlugin;

pub struct DemoScenePlugin;

impl Plugin for DemoScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((SurfaceCursorPlugin, PlaceButtonPlugin, PlacementPlugin))
            .add_systems(Startup, spawn_cursor.after(SceneSetup::Base))
            .add_systems(
                Update,
                keep_cursor_centered.before(SurfaceCursorSystems::Tick),
            );
    }
}

/// Marker component for the cursor owned by the demo scene
#[derive(Component)]
pub struct DemoCursor;

fn spawn_cursor(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    demo: Res<SettingsArc<DemoSettings>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let target = windows.single().ok().map(window_center);
    let cursor = spawn_surface_cursor(
        &mut commands,
        &mut meshes,
        &mut materials,
        &asset_server,
        &demo.cursor_config(),
        target,
    );
    commands.entity(cursor).insert(DemoCursor);
}

/// Retargets the cursor when the window is resized
fn keep_cursor_centered(
    windows: Query<&Window, (With<PrimaryWindow>, Changed<Window>)>,
    mut cursors: Query<&mut SurfaceCursor, With<DemoCursor>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let center = window_center(window);

    for mut cursor in &mut cursors {
        if cursor.target_screen_position() != Some(center) {
            cursor.set_target_screen_position(center);
        }
    }
}
