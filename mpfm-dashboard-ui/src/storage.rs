//! Token storage backed by the browser's `localStorage` and `sessionStorage`.

use mpfm_api::token::{Persistence, StorageError, TokenStorage};
use web_sys::Storage;

/// `localStorage` for remembered sessions, `sessionStorage` otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

fn area(persistence: Persistence) -> Result<Storage, StorageError> {
    let window = web_sys::window().ok_or_else(|| StorageError("no window".into()))?;
    let storage = match persistence {
        Persistence::Persistent => window.local_storage(),
        Persistence::Session => window.session_storage(),
    };
    storage
        .map_err(|e| StorageError(format!("{:?}", e)))?
        .ok_or_else(|| StorageError("storage is disabled".into()))
}

impl TokenStorage for BrowserStorage {
    fn load(&self, persistence: Persistence, key: &str) -> Option<String> {
        area(persistence).ok()?.get_item(key).ok().flatten()
    }

    fn store(&mut self, persistence: Persistence, key: &str, value: &str) -> Result<(), StorageError> {
        area(persistence)?
            .set_item(key, value)
            .map_err(|e| StorageError(format!("{:?}", e)))
    }

    fn remove(&mut self, persistence: Persistence, key: &str) -> Result<(), StorageError> {
        area(persistence)?
            .remove_item(key)
            .map_err(|e| StorageError(format!("{:?}", e)))
    }
}
