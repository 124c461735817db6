use bevy::asset::AssetPlugin;
use bevy::ecs::system::RunSystemOnce;
use bevy::picking::Pickable;
use bevy::prelude::*;
use bevy::transform::TransformPlugin;
use surface_cursor::{
    CursorIndicator, CursorParts, CursorSurface, SurfaceCursor, SurfaceCursorConfig,
    SurfaceRayPicker, camera_ray, spawn_surface_cursor,
};
use test_log::test;

const CENTER: Vec2 = Vec2::new(640.0, 360.0);

fn app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, AssetPlugin::default(), TransformPlugin))
        .init_asset::<Mesh>()
        .init_asset::<StandardMaterial>();
    app
}

fn config() -> SurfaceCursorConfig {
    SurfaceCursorConfig {
        diameter: 1.5,
        // No image loader in a headless app
        indicator_texture: None,
        ..default()
    }
}

fn spawn(app: &mut App, target: Option<Vec2>) -> Entity {
    let config = config();
    app.world_mut()
        .run_system_once(
            move |mut commands: Commands,
                  mut meshes: ResMut<Assets<Mesh>>,
                  mut materials: ResMut<Assets<StandardMaterial>>,
                  asset_server: Res<AssetServer>| {
                spawn_surface_cursor(
                    &mut commands,
                    &mut meshes,
                    &mut materials,
                    &asset_server,
                    &config,
                    target,
                )
            },
        )
        .expect("spawn cursor")
}

fn parts(app: &App, cursor: Entity) -> CursorParts {
    *app.world().get::<CursorParts>(cursor).unwrap()
}

fn pick_along(app: &mut App, surface: Entity, ray: Ray3d) -> Option<Vec3> {
    app.world_mut()
        .run_system_once(move |picker: SurfaceRayPicker| picker.pick_surface_along(surface, ray))
        .expect("pick")
}

fn pick_screen(app: &mut App, surface: Entity, screen: Vec2) -> Option<Vec3> {
    app.world_mut()
        .run_system_once(move |picker: SurfaceRayPicker| picker.pick_surface(surface, screen))
        .expect("pick")
}

#[test]
fn spawned_cursor_owns_hidden_surface_and_indicator() {
    let mut app = app();
    let cursor = spawn(&mut app, Some(CENTER));
    let parts = parts(&app, cursor);
    let world = app.world();

    let children = world.get::<Children>(cursor).unwrap();
    assert!(children.contains(&parts.surface));
    assert!(children.contains(&parts.indicator));

    assert_eq!(
        world.get::<CursorSurface>(parts.surface).unwrap().half_size,
        Vec2::splat(10.0)
    );
    assert_eq!(
        *world.get::<Visibility>(parts.surface).unwrap(),
        Visibility::Hidden
    );

    assert!(world.get::<CursorIndicator>(parts.indicator).is_some());
    assert_eq!(
        *world.get::<Visibility>(parts.indicator).unwrap(),
        Visibility::Hidden
    );
    let pickable = world.get::<Pickable>(parts.indicator).unwrap();
    assert!(!pickable.should_block_lower);
    assert!(!pickable.is_hoverable);
}

#[test]
fn spawned_cursor_starts_enabled_at_its_target() {
    let mut app = app();
    let centered = spawn(&mut app, Some(CENTER));
    let untargeted = spawn(&mut app, None);
    let world = app.world();

    let cursor = world.get::<SurfaceCursor>(centered).unwrap();
    assert_eq!(cursor.target_screen_position(), Some(CENTER));
    assert!(cursor.is_enabled());
    assert!(!cursor.is_locked());
    assert_eq!(cursor.position(), None);

    let cursor = world.get::<SurfaceCursor>(untargeted).unwrap();
    assert_eq!(cursor.target_screen_position(), None);
}

#[test]
fn camera_ray_hits_the_spawned_surface_ahead() {
    let mut app = app();
    let cursor = spawn(&mut app, Some(CENTER));
    let surface = parts(&app, cursor).surface;
    app.update();

    // Eye height 1.6 looking at a point two units ahead on the floor
    let eye = Transform::from_xyz(0.0, 1.6, 0.0).looking_at(Vec3::new(0.0, 0.0, -2.0), Vec3::Y);
    let ray = Ray3d::new(eye.translation, eye.forward());

    let hit = pick_along(&mut app, surface, ray).unwrap();
    assert!(hit.abs_diff_eq(Vec3::new(0.0, 0.0, -2.0), 1e-4));

    // Looking at the horizon never meets the floor
    let level = Ray3d::new(eye.translation, Dir3::NEG_Z);
    assert_eq!(pick_along(&mut app, surface, level), None);
}

#[test]
fn pick_follows_the_surface_transform() {
    let mut app = app();
    let cursor = spawn(&mut app, Some(CENTER));
    let surface = parts(&app, cursor).surface;
    app.world_mut()
        .get_mut::<Transform>(surface)
        .unwrap()
        .translation = Vec3::new(0.0, 0.5, 0.0);
    app.update();

    let down = Ray3d::new(Vec3::new(1.0, 3.0, -1.0), Dir3::NEG_Y);
    let hit = pick_along(&mut app, surface, down).unwrap();
    assert!(hit.abs_diff_eq(Vec3::new(1.0, 0.5, -1.0), 1e-5));

    // Beyond the 20 x 20 rectangle
    let outside = Ray3d::new(Vec3::new(12.0, 3.0, 0.0), Dir3::NEG_Y);
    assert_eq!(pick_along(&mut app, surface, outside), None);
}

#[test]
fn only_the_given_surface_can_be_hit() {
    let mut app = app();
    let cursor = spawn(&mut app, Some(CENTER));
    let indicator = parts(&app, cursor).indicator;
    app.update();

    let down = Ray3d::new(Vec3::new(0.0, 3.0, 0.0), Dir3::NEG_Y);
    assert_eq!(pick_along(&mut app, indicator, down), None);
}

#[test]
fn screen_pick_without_camera_misses() {
    let mut app = app();
    let cursor = spawn(&mut app, Some(CENTER));
    let surface = parts(&app, cursor).surface;
    app.update();

    assert_eq!(pick_screen(&mut app, surface, CENTER), None);
}

#[test]
fn camera_without_viewport_yields_no_ray() {
    let transform = GlobalTransform::from(Transform::from_xyz(0.0, 1.6, 0.0));

    let inactive = Camera {
        is_active: false,
        ..default()
    };
    assert_eq!(camera_ray(&inactive, &transform, CENTER), None);

    // Never rendered, so there is no viewport size yet
    assert_eq!(camera_ray(&Camera::default(), &transform, CENTER), None);
}
