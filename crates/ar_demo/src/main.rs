mod ar_app;
mod cli;
mod config;
mod demo;
mod scene;

use crate::ar_app::ArDemo;
use crate::cli::Cli;
use crate::config::{DemoSettings, SceneSettings};
use crate::demo::DemoScenePlugin;
use crate::scene::ArScenePlugin;
use app::{AppBuilder, BoxError, LOG_MAIN};
use bevy::{log::LogPlugin, prelude::*};
use clap::Parser;
use settings::{AppSettingsExt, SettingsArc, SettingsStore};
use std::sync::Arc;

fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let mode = cli.mode();

    let mut app = AppBuilder::<ArDemo>::with_level(env!("CARGO_PKG_VERSION"), cli.log_level())?
        .build_with_bevy(|mut app, ctx| {
            info!(target: LOG_MAIN, "Starting {} v{} in {:?} mode", ctx.app_id(), ctx.version(), mode);
            app.add_plugins(
                DefaultPlugins
                    .build()
                    .disable::<LogPlugin>()
                    .set(WindowPlugin {
                        primary_window: Some(Window {
                            title: "AR Placement".to_string(),
                            // Lets the camera feed show through in AR
                            transparent: mode.is_ar(),
                            ..default()
                        }),
                        ..default()
                    }),
            );
            app
        });

    let settings_file = app.context().path_context().settings_file(None);
    info!(target: LOG_MAIN, "Settings file: {}", settings_file.display());
    let store = SettingsStore::builder()
        .with_settings_file(settings_file)
        .build()?;

    let bevy_app = app.app_mut();
    bevy_app
        .insert_settings_store(store)
        .register_settings_section::<DemoSettings>()?
        .register_settings_section::<SceneSettings>()?;

    if let Some(model) = cli.model {
        // Only for this run, the settings file is left untouched
        let world = bevy_app.world_mut();
        let mut demo = DemoSettings::clone(world.resource::<SettingsArc<DemoSettings>>());
        info!(target: LOG_MAIN, "Model overridden: {} -> {}", demo.model_path, model);
        demo.model_path = model;
        world.insert_resource(SettingsArc(Arc::new(demo)));
    }

    bevy_app
        .insert_resource(mode)
        .add_plugins((ArScenePlugin, DemoScenePlugin));

    match app.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => Err(format!("application exited with code {code}").into()),
    }
}
