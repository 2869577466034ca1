use storefront::error::{Result, StorefrontError};
use storefront::store::KeyValueStore;

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// `window.localStorage`, looked up on every call so the handle never goes stale.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct LocalStorage;

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let s = local_storage()
            .ok_or_else(|| StorefrontError::storage("get", key, "localStorage unavailable"))?;
        s.get_item(key)
            .map_err(|_| StorefrontError::storage("get", key, "get_item() threw"))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let s = local_storage()
            .ok_or_else(|| StorefrontError::storage("set", key, "localStorage unavailable"))?;
        s.set_item(key, value)
            .map_err(|_| StorefrontError::storage("set", key, "set_item() threw"))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let s = local_storage()
            .ok_or_else(|| StorefrontError::storage("remove", key, "localStorage unavailable"))?;
        s.remove_item(key)
            .map_err(|_| StorefrontError::storage("remove", key, "remove_item() threw"))
    }
}
