//! `window.localStorage` backend for the session store.

use nutrition_track_auth::{KeyValueStore, StorageError};

/// Session storage backed by `window.localStorage`.
///
/// Reads treat an unavailable store (private mode, sandboxed frame) as empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn backend() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError("window not available".to_string()))?
            .local_storage()
            .map_err(|error| StorageError(format!("{error:?}")))?
            .ok_or_else(|| StorageError("localStorage not available".to_string()))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::backend().ok()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::backend()?
            .set_item(key, value)
            .map_err(|error| StorageError(format!("{error:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::backend()?
            .remove_item(key)
            .map_err(|error| StorageError(format!("{error:?}")))
    }
}
