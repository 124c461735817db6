use crate::cursor::SurfaceCursor;
use crate::picking::intersect_surface;
use app::LOG_CURSOR;
use bevy::ecs::system::SystemParam;
use bevy::picking::Pickable;
use bevy::prelude::*;
use tracing::info;

/// Drives every [`SurfaceCursor`] once per frame.
pub struct SurfaceCursorPlugin;

impl Plugin for SurfaceCursorPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(Update, SurfaceCursorSystems::Tick)
            .add_systems(
                Update,
                (tick_surface_cursors, sync_cursor_indicators)
                    .chain()
                    .in_set(SurfaceCursorSystems::Tick),
            );
    }
}

/// Systems that read `SurfaceCursor::position` should run after `Tick`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SurfaceCursorSystems {
    Tick,
}

/// Marker for the camera whose view defines the screen rays.
#[derive(Component, Default)]
pub struct CursorCamera;

/// Invisible rectangle in the local XZ plane; the only thing a cursor ray can hit.
#[derive(Component, Debug, Clone, Copy)]
pub struct CursorSurface {
    pub half_size: Vec2,
}

/// Marker for the visible indicator mesh.
#[derive(Component)]
pub struct CursorIndicator;

/// Entities owned by a cursor. Both are children of the cursor entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct CursorParts {
    pub surface: Entity,
    pub indicator: Entity,
}

#[derive(Resource, Debug, Clone)]
pub struct SurfaceCursorConfig {
    /// Width and depth of the indicator plane.
    pub diameter: f32,
    /// Width and depth of the invisible surface.
    pub surface_size: Vec2,
    pub indicator_texture: Option<String>,
    pub indicator_color: Color,
}

impl Default for SurfaceCursorConfig {
    fn default() -> Self {
        Self {
            diameter: 1.0,
            surface_size: Vec2::splat(20.0),
            indicator_texture: Some("textures/ar-placement-target.png".into()),
            indicator_color: Color::srgb_u8(0xFF, 0xE0, 0x82),
        }
    }
}

/// Center of the window in logical pixels.
pub fn window_center(window: &Window) -> Vec2 {
    window.size() / 2.0
}

/// Spawns a cursor with its surface and indicator and returns the cursor entity.
///
/// The cursor entity stays at the origin; indicator translation is in world space.
pub fn spawn_surface_cursor(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    asset_server: &AssetServer,
    config: &SurfaceCursorConfig,
    target: Option<Vec2>,
) -> Entity {
    let surface = commands
        .spawn((
            CursorSurface {
                half_size: config.surface_size / 2.0,
            },
            Transform::default(),
            Visibility::Hidden,
            Name::new("ArSurface"),
        ))
        .id();

    let indicator_material = StandardMaterial {
        base_color: config.indicator_color,
        base_color_texture: config
            .indicator_texture
            .as_ref()
            .map(|path| asset_server.load(path.clone())),
        unlit: true,
        double_sided: true,
        cull_mode: None,
        alpha_mode: AlphaMode::Blend,
        // Stay in front of a ground plane at the same height
        depth_bias: 100.0,
        ..default()
    };
    let indicator = commands
        .spawn((
            CursorIndicator,
            Mesh3d(meshes.add(
                Plane3d::default()
                    .mesh()
                    .size(config.diameter, config.diameter),
            )),
            MeshMaterial3d(materials.add(indicator_material)),
            Transform::default(),
            Visibility::Hidden,
            Pickable::IGNORE,
            Name::new("ArCursor"),
        ))
        .id();

    let cursor = commands
        .spawn((
            SurfaceCursor::new(target),
            CursorParts { surface, indicator },
            Transform::default(),
            Visibility::default(),
            Name::new("Surface Cursor"),
        ))
        .add_children(&[surface, indicator])
        .id();

    info!(
        target: LOG_CURSOR,
        "Spawned surface cursor {:?} (diameter {}, target {:?})",
        cursor, config.diameter, target
    );
    cursor
}

/// Casts screen rays from the [`CursorCamera`] against [`CursorSurface`]s.
#[derive(SystemParam)]
pub struct SurfaceRayPicker<'w, 's> {
    cameras: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<CursorCamera>>,
    surfaces: Query<'w, 's, (&'static CursorSurface, &'static GlobalTransform)>,
}

impl SurfaceRayPicker<'_, '_> {
    /// Ray through `screen` (logical pixels) from the first active cursor camera.
    pub fn screen_ray(&self, screen: Vec2) -> Option<Ray3d> {
        self.cameras
            .iter()
            .find_map(|(camera, transform)| camera_ray(camera, transform, screen))
    }

    /// Nearest hit on `surface` only; every other entity is ignored.
    pub fn pick_surface(&self, surface: Entity, screen: Vec2) -> Option<Vec3> {
        let ray = self.screen_ray(screen)?;
        self.pick_surface_along(surface, ray)
    }

    /// Hit of `ray` on `surface`, using the surface's current `GlobalTransform`.
    pub fn pick_surface_along(&self, surface: Entity, ray: Ray3d) -> Option<Vec3> {
        let (surface, transform) = self.surfaces.get(surface).ok()?;
        intersect_surface(ray, transform, surface.half_size)
    }
}

/// Ray through `screen` (logical pixels) as seen by `camera`. Inactive cameras
/// and cameras without a computed viewport yield `None`.
pub fn camera_ray(camera: &Camera, transform: &GlobalTransform, screen: Vec2) -> Option<Ray3d> {
    if !camera.is_active {
        return None;
    }
    camera.viewport_to_world(transform, screen).ok()
}

pub fn tick_surface_cursors(
    picker: SurfaceRayPicker,
    mut cursors: Query<(&mut SurfaceCursor, &CursorParts)>,
) {
    for (mut cursor, parts) in &mut cursors {
        // Only flag a change when the tick actually moved something
        let mut next = cursor.clone();
        next.tick(&mut |screen: Vec2| picker.pick_surface(parts.surface, screen));
        cursor.set_if_neq(next);
    }
}

pub fn sync_cursor_indicators(
    cursors: Query<(&SurfaceCursor, &CursorParts)>,
    mut indicators: Query<(&mut Transform, &mut Visibility), With<CursorIndicator>>,
) {
    for (cursor, parts) in &cursors {
        let Ok((mut transform, mut visibility)) = indicators.get_mut(parts.indicator) else {
            continue;
        };
        let state = cursor.indicator();
        if state.visible {
            if transform.translation != state.translation {
                transform.translation = state.translation;
            }
            visibility.set_if_neq(Visibility::Visible);
        } else {
            visibility.set_if_neq(Visibility::Hidden);
        }
    }
}
