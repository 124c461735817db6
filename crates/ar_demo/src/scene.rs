//! Base scene for AR: ground, lighting and camera.
//!
//! In [`SceneMode::Ar`] the ground only catches shadows and the background is
//! transparent so the camera feed shows through. [`SceneMode::NonAr`] renders a
//! visible grid ground on black with an orbit camera instead.

mod camera;
mod environment;
mod lighting;

use bevy::prelude::*;
use camera::SceneCameraPlugin;
use environment::EnvironmentPlugin;
use lighting::LightingPlugin;

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneMode {
    #[default]
    Ar,
    NonAr,
}

impl SceneMode {
    pub fn is_ar(self) -> bool {
        self == SceneMode::Ar
    }
}

/// Ordering of the scene setup.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SceneSetup {
    /// Ground, lights and camera exist after this set.
    Base,
}

pub struct ArScenePlugin;

impl Plugin for ArScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneMode>()
            .configure_sets(Startup, SceneSetup::Base)
            .add_plugins((EnvironmentPlugin, LightingPlugin, SceneCameraPlugin));
    }
}
