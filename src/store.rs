//! Persistence of user overrides and the last-viewed position.
//!
//! The store is a plain string key/value map. Implement
//! [`PersistenceStore`] over whatever your host offers (browser
//! `localStorage`, a settings file, a database row).
//!
//! Reads never fail: a missing or malformed record is treated as absent.

use std::collections::HashMap;

use tracing::warn;

use crate::error::StoreError;
use crate::{PlaybackPosition, TrainerConfig};

/// String-keyed get/set storage.
pub trait PersistenceStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store for native hosts and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without going through [`PersistenceStore::set`].
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PersistenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read the last-viewed position, falling back to `{0, 0}`.
pub fn load_position<S: PersistenceStore + ?Sized>(
    store: &S,
    config: &TrainerConfig,
) -> PlaybackPosition {
    let Some(raw) = store.get(&config.position_key) else {
        return PlaybackPosition::default();
    };
    match serde_json::from_str::<PlaybackPosition>(&raw) {
        Ok(position) => position,
        Err(err) => {
            warn!(key = %config.position_key, error = %err, "ignoring malformed stored position");
            PlaybackPosition::default()
        }
    }
}

/// Persist the last-viewed position as `{"group":g,"index":i}`.
pub fn save_position<S: PersistenceStore + ?Sized>(
    store: &mut S,
    config: &TrainerConfig,
    position: PlaybackPosition,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(&position).map_err(|e| StoreError::backend(e.to_string()))?;
    store.set(&config.position_key, &raw)
}

/// Read the stored notation override for `name`. Empty values count as absent.
pub fn load_override<S: PersistenceStore + ?Sized>(
    store: &S,
    config: &TrainerConfig,
    name: &str,
) -> Option<String> {
    store
        .get(&config.override_key(name))
        .filter(|exp| !exp.is_empty())
}

/// Persist a notation override for `name`.
pub fn save_override<S: PersistenceStore + ?Sized>(
    store: &mut S,
    config: &TrainerConfig,
    name: &str,
    exp: &str,
) -> Result<(), StoreError> {
    store.set(&config.override_key(name), exp)
}

/// Browser `localStorage` backend.
#[cfg(feature = "web")]
pub mod web {
    use super::*;
    use wasm_bindgen::JsValue;

    /// Store backed by `window.localStorage`.
    ///
    /// When storage is unavailable (private mode, no window) reads return
    /// nothing and writes fail with [`StoreError::Unavailable`].
    #[derive(Clone, Debug)]
    pub struct LocalStorageStore {
        storage: Option<web_sys::Storage>,
    }

    impl Default for LocalStorageStore {
        fn default() -> Self {
            Self::new()
        }
    }

    impl LocalStorageStore {
        pub fn new() -> Self {
            let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
            if storage.is_none() {
                warn!("localStorage is unavailable, settings will not persist");
            }
            Self { storage }
        }

        pub fn is_available(&self) -> bool {
            self.storage.is_some()
        }
    }

    impl PersistenceStore for LocalStorageStore {
        fn get(&self, key: &str) -> Option<String> {
            self.storage.as_ref()?.get_item(key).ok().flatten()
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
            storage.set_item(key, value).map_err(js_error)
        }
    }

    fn js_error(value: JsValue) -> StoreError {
        StoreError::backend(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}
