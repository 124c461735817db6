use bevy::{
    app::App,
    ecs::resource::Resource,
    prelude::{Deref, DerefMut},
};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;

use crate::{Settings, SettingsError, SettingsStore};

#[derive(Resource, Clone)]
pub struct SettingsStoreRef(pub Arc<SettingsStore>);

/// Snapshot of one registered section, kept as a Bevy resource.
#[derive(Resource, Deref, DerefMut, Clone)]
pub struct SettingsArc<T: Send + Sync + 'static>(pub Arc<T>);

pub trait AppSettingsExt {
    fn insert_settings_store(&mut self, store: SettingsStore) -> &mut Self;

    /// Registers `S` in the store and seeds a `SettingsArc<S>` resource.
    fn register_settings_section<S>(&mut self) -> Result<&mut Self, SettingsError>
    where
        S: Settings + Default + Serialize + DeserializeOwned;
}

impl AppSettingsExt for App {
    fn insert_settings_store(&mut self, store: SettingsStore) -> &mut Self {
        self.world_mut()
            .insert_resource(SettingsStoreRef(Arc::new(store)));
        self
    }

    fn register_settings_section<S>(&mut self) -> Result<&mut Self, SettingsError>
    where
        S: Settings + Default + Serialize + DeserializeOwned,
    {
        let store = self
            .world()
            .get_resource::<SettingsStoreRef>()
            .ok_or(SettingsError::Invalid("settings store not inserted"))?
            .0
            .clone();

        if !store.is_registered::<S>() {
            store.register::<S>()?;
        }
        let arc = store.get::<S>()?;
        self.world_mut().insert_resource(SettingsArc::<S>(arc));
        Ok(self)
    }
}
