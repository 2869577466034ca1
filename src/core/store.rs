use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::cart::Cart;
use super::error::{Result, StorefrontError};

/// String key-value persistence, shaped after `window.localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-process store. Clones share the same map, so a test can keep a handle
/// and inspect what the cart wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Read the cart stored under `key`. `Ok(None)` when nothing is stored.
pub fn load_cart<S: KeyValueStore>(store: &S, key: &str) -> Result<Option<Cart>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    let cart: Cart = serde_json::from_str(&raw).map_err(StorefrontError::CorruptCart)?;
    Ok(Some(Cart::from_items(cart.into_items())))
}

pub fn save_cart<S: KeyValueStore>(store: &mut S, key: &str, cart: &Cart) -> Result<()> {
    let raw = serde_json::to_string(cart).map_err(StorefrontError::Encode)?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::NewLineItem;
    use crate::money::Money;

    #[test]
    fn absent_key_loads_as_none() {
        let store = MemoryStore::new();
        assert!(load_cart(&store, "cart").unwrap().is_none());
    }

    #[test]
    fn corrupt_value_is_reported() {
        let store = MemoryStore::with_entry("cart", "[{oops");
        let err = load_cart(&store, "cart").unwrap_err();
        assert!(matches!(err, StorefrontError::CorruptCart(_)));
    }

    #[test]
    fn non_array_value_is_corrupt() {
        let store = MemoryStore::with_entry("cart", r#"{"id":"1"}"#);
        assert!(load_cart(&store, "cart").is_err());
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut store = MemoryStore::new();
        let mut cart = Cart::new();
        cart.add(
            NewLineItem {
                name: "Tea".to_string(),
                price: Money::parse_display("RM4.50", "RM"),
                quantity: 3,
                image: "tea.png".to_string(),
            },
            || "7".to_string(),
        );
        save_cart(&mut store, "cart", &cart).unwrap();
        assert_eq!(load_cart(&store, "cart").unwrap(), Some(cart));
    }

    #[test]
    fn clones_share_entries() {
        let store = MemoryStore::new();
        let mut handle = store.clone();
        handle.set("k", "v").unwrap();
        assert_eq!(store.raw("k").as_deref(), Some("v"));
        handle.remove("k").unwrap();
        assert!(store.raw("k").is_none());
    }
}
