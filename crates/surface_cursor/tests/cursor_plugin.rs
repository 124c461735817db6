use bevy::prelude::*;
use surface_cursor::{
    CursorIndicator, CursorParts, CursorSurface, SurfaceCursor, SurfaceCursorPlugin, TickOutcome,
};
use test_log::test;

const HIT: Vec3 = Vec3::new(0.25, 0.0, -1.5);

fn app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, SurfaceCursorPlugin));
    app
}

/// Spawns a cursor without render assets. Returns (cursor, indicator).
fn spawn_cursor(app: &mut App, cursor: SurfaceCursor) -> (Entity, Entity) {
    let world = app.world_mut();
    let surface = world
        .spawn((
            CursorSurface {
                half_size: Vec2::splat(10.0),
            },
            Transform::default(),
            GlobalTransform::default(),
        ))
        .id();
    let indicator = world
        .spawn((CursorIndicator, Transform::default(), Visibility::Hidden))
        .id();
    let cursor = world
        .spawn((cursor, CursorParts { surface, indicator }))
        .id();
    (cursor, indicator)
}

fn cursor_with_position() -> SurfaceCursor {
    let mut cursor = SurfaceCursor::new(Some(Vec2::new(640.0, 360.0)));
    assert_eq!(cursor.tick(&mut |_: Vec2| Some(HIT)), TickOutcome::Hit(HIT));
    cursor
}

fn cursor(app: &App, entity: Entity) -> &SurfaceCursor {
    app.world().get::<SurfaceCursor>(entity).unwrap()
}

fn indicator(app: &App, entity: Entity) -> (Vec3, Visibility) {
    let world = app.world();
    (
        world.get::<Transform>(entity).unwrap().translation,
        *world.get::<Visibility>(entity).unwrap(),
    )
}

#[test]
fn no_camera_means_no_position() {
    let mut app = app();
    let (cursor_entity, indicator_entity) = spawn_cursor(&mut app, cursor_with_position());

    app.update();

    assert_eq!(cursor(&app, cursor_entity).position(), None);
    assert_eq!(indicator(&app, indicator_entity).1, Visibility::Hidden);
}

#[test]
fn locked_cursor_keeps_position_and_shows_indicator() {
    let mut app = app();
    let mut locked = cursor_with_position();
    locked.lock(true);
    let (cursor_entity, indicator_entity) = spawn_cursor(&mut app, locked);

    app.update();
    app.update();

    assert_eq!(cursor(&app, cursor_entity).position(), Some(HIT));
    assert_eq!(indicator(&app, indicator_entity), (HIT, Visibility::Visible));
}

#[test]
fn disabling_a_locked_cursor_hides_indicator_in_the_same_frame() {
    let mut app = app();
    let mut locked = cursor_with_position();
    locked.lock(true);
    let (cursor_entity, indicator_entity) = spawn_cursor(&mut app, locked);
    app.update();

    app.world_mut()
        .get_mut::<SurfaceCursor>(cursor_entity)
        .unwrap()
        .set_enabled(false);
    app.update();

    assert_eq!(cursor(&app, cursor_entity).position(), Some(HIT));
    assert_eq!(indicator(&app, indicator_entity).1, Visibility::Hidden);
}

#[test]
fn unlocking_resumes_sampling() {
    let mut app = app();
    let mut locked = cursor_with_position();
    locked.lock(true);
    let (cursor_entity, indicator_entity) = spawn_cursor(&mut app, locked);
    app.update();

    app.world_mut()
        .get_mut::<SurfaceCursor>(cursor_entity)
        .unwrap()
        .lock(false);
    app.update();

    // Nothing to cast from, so the fresh sample is a miss
    assert_eq!(cursor(&app, cursor_entity).position(), None);
    assert_eq!(indicator(&app, indicator_entity).1, Visibility::Hidden);
}
