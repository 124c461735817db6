#[cfg(feature = "bevy")]
mod bevy_adapter;
mod errors;
mod store;

#[cfg(feature = "bevy")]
pub use bevy_adapter::*;
pub use errors::SettingsError;
pub use store::{SettingsStore, SettingsStoreBuilder};

/// A typed section of the settings file.
///
/// The section is stored under [`Settings::SECTION`]; only fields that differ
/// from `Default` are written to disk.
pub trait Settings: 'static + Send + Sync {
    const SECTION: &'static str;

    fn name() -> &'static str {
        Self::SECTION
    }
}
