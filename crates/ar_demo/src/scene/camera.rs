use super::{SceneMode, SceneSetup};
use crate::config::{ENVIRONMENT_LUMINANCE, SceneSettings};
use app::LOG_SCENE;
use bevy::light::ShadowFilteringMethod;
use bevy::prelude::*;
use bevy_panorbit_camera::{PanOrbitCamera, PanOrbitCameraPlugin};
use settings::SettingsArc;
use surface_cursor::{CursorCamera, SurfaceCursorSystems};

const AR_CAMERA_START: Vec3 = Vec3::new(0.0, 1.0, 0.0);
const NEAR_CLIP: f32 = 0.001;

const ORBIT_FOCUS: Vec3 = Vec3::new(0.0, 0.3, 0.0);
// yaw=0 puts the camera on +Z looking along -Z, positive yaw swings it towards +X.
// pitch>0 raises the camera and looks down.
const ORBIT_YAW_DEGREES: f32 = 70.0;
const ORBIT_PITCH_DEGREES: f32 = 30.0;
const ORBIT_RADIUS: f32 = 5.0;
const ORBIT_ZOOM_MIN: f32 = 0.01;

/// Where the orbit camera starts, using the same yaw/pitch convention as `PanOrbitCamera`.
fn orbit_start_translation() -> Vec3 {
    let rotation = Quat::from_euler(
        EulerRot::YXZ,
        ORBIT_YAW_DEGREES.to_radians(),
        -ORBIT_PITCH_DEGREES.to_radians(),
        0.0,
    );
    ORBIT_FOCUS + rotation * Vec3::new(0.0, 0.0, ORBIT_RADIUS)
}

/// Plugin for the scene camera in either mode
pub(super) struct SceneCameraPlugin;

impl Plugin for SceneCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PanOrbitCameraPlugin)
            .add_message::<ArCameraPose>()
            .add_systems(Startup, setup_camera.in_set(SceneSetup::Base))
            .add_systems(
                Update,
                apply_ar_camera_pose.before(SurfaceCursorSystems::Tick),
            );
    }
}

/// Marker component for the camera driven by the AR tracker
#[derive(Component)]
pub struct ArCamera;

/// World pose of the device camera, written by the AR tracker.
///
/// Only the latest pose of a frame is applied.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct ArCameraPose {
    pub translation: Vec3,
    pub rotation: Quat,
}

fn setup_camera(
    mut commands: Commands,
    mode: Res<SceneMode>,
    scene: Res<SettingsArc<SceneSettings>>,
    asset_server: Res<AssetServer>,
) {
    let projection = Projection::Perspective(PerspectiveProjection {
        near: NEAR_CLIP,
        ..default()
    });

    let mut camera = match *mode {
        SceneMode::Ar => commands.spawn((
            Camera3d::default(),
            projection,
            Transform::from_translation(AR_CAMERA_START)
                .looking_at(scene.ar_look_target(), Vec3::Y),
            ArCamera,
            Name::new("AR Camera"),
        )),
        SceneMode::NonAr => commands.spawn((
            Camera3d::default(),
            projection,
            Transform::from_translation(orbit_start_translation()).looking_at(ORBIT_FOCUS, Vec3::Y),
            PanOrbitCamera {
                focus: ORBIT_FOCUS,
                yaw: Some(ORBIT_YAW_DEGREES.to_radians()),
                pitch: Some(ORBIT_PITCH_DEGREES.to_radians()),
                radius: Some(ORBIT_RADIUS),
                zoom_lower_limit: ORBIT_ZOOM_MIN,
                ..default()
            },
            Name::new("Orbit Camera"),
        )),
    };

    camera.insert((CursorCamera, ShadowFilteringMethod::Gaussian));

    if let Some(environment_map) = &scene.environment_map {
        camera.insert(EnvironmentMapLight {
            diffuse_map: asset_server.load(environment_map.diffuse.clone()),
            specular_map: asset_server.load(environment_map.specular.clone()),
            intensity: ENVIRONMENT_LUMINANCE * scene.environment_intensity,
            ..default()
        });
        info!(target: LOG_SCENE, "Image based lighting from {:?}", environment_map);
    }

    info!(target: LOG_SCENE, "Camera {:?} set up for {:?}", camera.id(), *mode);
}

fn apply_ar_camera_pose(
    mut poses: MessageReader<ArCameraPose>,
    mut cameras: Query<&mut Transform, With<ArCamera>>,
) {
    let Some(pose) = poses.read().last().copied() else {
        return;
    };

    for mut transform in &mut cameras {
        transform.translation = pose.translation;
        transform.rotation = pose.rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with_ar_camera() -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_message::<ArCameraPose>()
            .add_systems(Update, apply_ar_camera_pose);
        let camera = app
            .world_mut()
            .spawn((ArCamera, Transform::from_translation(AR_CAMERA_START)))
            .id();
        (app, camera)
    }

    #[test]
    fn latest_pose_wins() {
        let (mut app, camera) = app_with_ar_camera();
        let last = ArCameraPose {
            translation: Vec3::new(0.5, 1.4, 2.0),
            rotation: Quat::from_rotation_y(0.3),
        };
        app.world_mut().write_message(ArCameraPose {
            translation: Vec3::ONE,
            rotation: Quat::IDENTITY,
        });
        app.world_mut().write_message(last);
        app.update();

        let transform = app.world().get::<Transform>(camera).unwrap();
        assert_eq!(transform.translation, last.translation);
        assert_eq!(transform.rotation, last.rotation);
    }

    #[test]
    fn orbit_camera_starts_mostly_on_positive_x() {
        let offset = orbit_start_translation() - ORBIT_FOCUS;

        assert!((offset.length() - ORBIT_RADIUS).abs() < 1e-4);
        assert!(offset.x > 0.0 && offset.z > 0.0);
        assert!(offset.x > 2.0 * offset.z);
        // 30 degrees above the focus
        assert!((offset.y - ORBIT_RADIUS * 0.5).abs() < 1e-4);
    }

    #[test]
    fn without_pose_camera_stays() {
        let (mut app, camera) = app_with_ar_camera();
        app.update();

        let transform = app.world().get::<Transform>(camera).unwrap();
        assert_eq!(transform.translation, AR_CAMERA_START);
    }
}
