use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{Settings, SettingsError};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::{debug, warn};

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, SettingsError> {
    lock.read().map_err(|_| SettingsError::Poisoned)
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, SettingsError> {
    lock.write().map_err(|_| SettingsError::Poisoned)
}

/// Serialize a section into its map form.
fn to_map<T: Serialize>(value: &T) -> Result<JsonMap<String, JsonValue>, SettingsError> {
    match serde_json::to_value(value)? {
        JsonValue::Object(m) => Ok(m),
        _ => Err(SettingsError::Invalid("section must serialize to a map")),
    }
}

/// Merge default + delta recursively (maps only).
fn merge_maps(
    default: &JsonMap<String, JsonValue>,
    delta: &JsonMap<String, JsonValue>,
) -> JsonMap<String, JsonValue> {
    let mut merged = default.clone();
    for (k, v_delta) in delta {
        match (merged.get(k), v_delta) {
            (Some(JsonValue::Object(def_m)), JsonValue::Object(delta_m)) => {
                let rec = merge_maps(def_m, delta_m);
                merged.insert(k.clone(), JsonValue::Object(rec));
            }
            _ => {
                merged.insert(k.clone(), v_delta.clone());
            }
        }
    }
    merged
}

/// Recursive diff (new vs default). Returns None if identical.
fn diff_value(new_v: &JsonValue, default_v: &JsonValue) -> Option<JsonValue> {
    match (new_v, default_v) {
        (JsonValue::Object(new_m), JsonValue::Object(def_m)) => {
            let diff_m = diff_map(new_m, def_m);
            (!diff_m.is_empty()).then_some(JsonValue::Object(diff_m))
        }
        _ => (new_v != default_v).then(|| new_v.clone()),
    }
}

fn diff_map(
    new_m: &JsonMap<String, JsonValue>,
    def_m: &JsonMap<String, JsonValue>,
) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();
    for (k, new_v) in new_m {
        match def_m.get(k) {
            Some(def_v) => {
                if let Some(d) = diff_value(new_v, def_v) {
                    out.insert(k.clone(), d);
                }
            }
            None => {
                out.insert(k.clone(), new_v.clone());
            }
        }
    }
    out
}

/// Checks that a merged section still deserializes into its type.
type SectionCheck = fn(&JsonValue) -> Result<(), serde_json::Error>;

fn check_section<T: DeserializeOwned>(value: &JsonValue) -> Result<(), serde_json::Error> {
    serde_json::from_value::<T>(value.clone()).map(|_| ())
}

/// Defaults of a registered section and the type check for its merged value.
struct RegisteredSection {
    defaults: JsonMap<String, JsonValue>,
    check: SectionCheck,
}

impl RegisteredSection {
    /// Defaults merged with `delta`. Malformed or mistyped deltas yield the defaults.
    fn effective_value(&self, section: &str, delta: Option<&JsonValue>) -> JsonValue {
        let merged = match delta {
            Some(JsonValue::Object(delta_m)) => JsonValue::Object(merge_maps(&self.defaults, delta_m)),
            Some(_) => {
                warn!("Ignoring malformed settings section '{section}'");
                return JsonValue::Object(self.defaults.clone());
            }
            None => return JsonValue::Object(self.defaults.clone()),
        };

        match (self.check)(&merged) {
            Ok(()) => merged,
            Err(err) => {
                warn!("Settings section '{section}' does not match its type ({err}), using defaults");
                JsonValue::Object(self.defaults.clone())
            }
        }
    }
}

fn read_deltas(path: &Path) -> Result<HashMap<String, JsonValue>, SettingsError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }
    Ok(serde_json::from_str(&content)?)
}

/// Builder for `SettingsStore` (single delta file).
#[derive(Default)]
pub struct SettingsStoreBuilder {
    settings_file: Option<PathBuf>,
}

impl SettingsStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.settings_file = Some(path.into());
        self
    }

    pub fn build(self) -> Result<SettingsStore, SettingsError> {
        let file_path = self
            .settings_file
            .ok_or(SettingsError::Invalid("settings file not specified"))?;

        if let Some(dir) = file_path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let deltas = read_deltas(&file_path)?;
        debug!(
            "Settings store opened at {:?} ({} stored sections)",
            file_path,
            deltas.len()
        );

        Ok(SettingsStore {
            file_path,
            deltas: RwLock::new(deltas),
            sections: RwLock::new(HashMap::new()),
            values: RwLock::new(HashMap::new()),
        })
    }
}

/// Settings store (thread-safe).
///
/// Every registered section has a full default map; the file only holds the
/// recursive delta from those defaults.
pub struct SettingsStore {
    file_path: PathBuf,
    deltas: RwLock<HashMap<String, JsonValue>>, // section -> delta value (usually Map)
    sections: RwLock<HashMap<&'static str, RegisteredSection>>,
    values: RwLock<HashMap<&'static str, JsonValue>>, // section -> effective merged value
}

impl SettingsStore {
    pub fn builder() -> SettingsStoreBuilder {
        SettingsStoreBuilder::new()
    }

    pub fn file_path(&self) -> &PathBuf {
        &self.file_path
    }

    pub fn is_registered<T: Settings>(&self) -> bool {
        read(&self.values)
            .map(|values| values.contains_key(T::name()))
            .unwrap_or(false)
    }

    /// Register a section type (loads defaults and applies existing delta if present).
    pub fn register<T>(&self) -> Result<(), SettingsError>
    where
        T: Settings + Default + Serialize + DeserializeOwned,
    {
        let section = T::name();
        if read(&self.values)?.contains_key(section) {
            return Err(SettingsError::Invalid("section already registered"));
        }

        let registered = RegisteredSection {
            defaults: to_map(&T::default())?,
            check: check_section::<T>,
        };
        let value = registered.effective_value(section, read(&self.deltas)?.get(section));

        write(&self.sections)?.insert(section, registered);
        write(&self.values)?.insert(section, value);

        Ok(())
    }

    /// Snapshot get (Arc).
    pub fn get<T>(&self) -> Result<Arc<T>, SettingsError>
    where
        T: Settings + DeserializeOwned,
    {
        self.try_get::<T>()?.ok_or(SettingsError::NotRegistered)
    }

    /// Optional variant: None if not registered.
    pub fn try_get<T>(&self) -> Result<Option<Arc<T>>, SettingsError>
    where
        T: Settings + DeserializeOwned,
    {
        let values = read(&self.values)?;
        let Some(value) = values.get(T::name()) else {
            return Ok(None);
        };
        let inst: T = serde_json::from_value(value.clone())?;
        Ok(Some(Arc::new(inst)))
    }

    /// Update via mutable closure. Only the delta (recursive) is persisted.
    pub fn update<T, F>(&self, mutator: F) -> Result<(), SettingsError>
    where
        T: Settings + Default + Serialize + DeserializeOwned,
        F: FnOnce(&mut T),
    {
        let section = T::name();

        let mut instance: T = {
            let values = read(&self.values)?;
            let raw = values.get(section).ok_or(SettingsError::NotRegistered)?;
            serde_json::from_value(raw.clone())?
        };
        mutator(&mut instance);
        let new_map = to_map(&instance)?;

        let diff_root = {
            let sections = read(&self.sections)?;
            let registered = sections.get(section).ok_or(SettingsError::NotRegistered)?;
            diff_map(&new_map, &registered.defaults)
        };

        write(&self.values)?.insert(section, JsonValue::Object(new_map));
        {
            let mut deltas = write(&self.deltas)?;
            if diff_root.is_empty() {
                deltas.remove(section);
            } else {
                deltas.insert(section.to_string(), JsonValue::Object(diff_root));
            }
        }

        self.persist_deltas()
    }

    /// Reload deltas from disk and re-merge all registered sections.
    ///
    /// Sections that no longer fit their type fall back to defaults, as on register.
    pub fn reload(&self) -> Result<(), SettingsError> {
        let new_deltas = read_deltas(&self.file_path)?;
        let sections = read(&self.sections)?;
        let mut values = write(&self.values)?;

        for (section, registered) in sections.iter() {
            let value = registered.effective_value(section, new_deltas.get(*section));
            values.insert(*section, value);
        }

        *write(&self.deltas)? = new_deltas;
        Ok(())
    }

    fn persist_deltas(&self) -> Result<(), SettingsError> {
        let deltas = read(&self.deltas)?;

        // Keep only non-empty map deltas
        let clean: HashMap<&String, &JsonValue> = deltas
            .iter()
            .filter(|(_, v)| !matches!(v, JsonValue::Object(m) if m.is_empty()))
            .collect();

        let pretty = serde_json::to_string_pretty(&clean)?;
        let tmp = self.file_path.with_extension("tmp");
        fs::write(&tmp, pretty)?;
        fs::rename(&tmp, &self.file_path)?;
        Ok(())
    }
}
