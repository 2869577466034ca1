use tracing::{debug, info, warn};

use super::cart::{AddOutcome, Cart, NewLineItem};
use super::clock::{Clock, LineIdGenerator};
use super::error::{Result, StorefrontError};
use super::store::{self, KeyValueStore};

/// What `CartManager::load` found in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadReport {
    /// No cart was stored yet.
    Empty,
    /// A stored cart with this many lines was restored.
    Restored(usize),
    /// The stored cart was unreadable and the cart was reset to empty.
    Recovered,
}

/// Cart state with write-through persistence: every mutation is saved
/// before it returns.
pub struct CartManager<S: KeyValueStore, C: Clock> {
    cart: Cart,
    store: S,
    key: String,
    ids: LineIdGenerator<C>,
}

impl<S: KeyValueStore, C: Clock> CartManager<S, C> {
    pub fn new(store: S, key: impl Into<String>, clock: C) -> Self {
        Self {
            cart: Cart::new(),
            store,
            key: key.into(),
            ids: LineIdGenerator::new(clock),
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace the in-memory cart with the stored one. Unreadable state resets
    /// the cart instead of failing start-up.
    pub fn load(&mut self) -> LoadReport {
        match store::load_cart(&self.store, &self.key) {
            Ok(Some(cart)) => {
                for item in cart.items() {
                    self.ids.observe(&item.id);
                }
                self.cart = cart;
                info!(items = self.cart.len(), key = %self.key, "restored cart");
                LoadReport::Restored(self.cart.len())
            }
            Ok(None) => {
                self.cart = Cart::new();
                LoadReport::Empty
            }
            Err(StorefrontError::CorruptCart(e)) => {
                warn!(error = %e, key = %self.key, "stored cart is unreadable; starting empty");
                self.cart = Cart::new();
                LoadReport::Recovered
            }
            Err(e) => {
                warn!(error = %e, key = %self.key, "could not read stored cart; starting empty");
                self.cart = Cart::new();
                LoadReport::Empty
            }
        }
    }

    pub fn add(&mut self, item: NewLineItem) -> AddOutcome {
        let ids = &mut self.ids;
        let outcome = self.cart.add(item, || ids.next_id());
        match &outcome {
            AddOutcome::Added { id, name, quantity } => {
                debug!(%id, %name, quantity, "added line")
            }
            AddOutcome::Updated {
                id, name, quantity, ..
            } => debug!(%id, %name, quantity, "merged into existing line"),
        }
        self.persist();
        outcome
    }

    /// Remove the line with `id`; `false` (and no write) when nothing matched.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.cart.remove(id) {
            Some(item) => {
                debug!(%id, name = %item.name, "removed line");
                self.persist();
                true
            }
            None => {
                debug!(%id, "remove ignored: no such line");
                false
            }
        }
    }

    /// Save the whole cart. A failed write keeps the in-memory cart, which
    /// stays authoritative for the rest of the page's life.
    fn persist(&mut self) {
        if let Err(e) = self.try_persist() {
            warn!(error = %e, "failed to persist cart");
        }
    }

    fn try_persist(&mut self) -> Result<()> {
        store::save_cart(&mut self.store, &self.key, &self.cart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::money::Money;
    use crate::store::MemoryStore;
    use proptest::prelude::*;

    fn item(name: &str, price: &str, quantity: u32) -> NewLineItem {
        NewLineItem {
            name: name.to_string(),
            price: Money::parse_display(price, "RM"),
            quantity,
            image: String::new(),
        }
    }

    fn manager(store: MemoryStore) -> CartManager<MemoryStore, FixedClock> {
        CartManager::new(store, "cart", FixedClock(1_000))
    }

    /// A store whose writes always fail.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }
        fn set(&mut self, key: &str, _value: &str) -> Result<()> {
            Err(StorefrontError::storage("set", key, "read-only"))
        }
        fn remove(&mut self, key: &str) -> Result<()> {
            Err(StorefrontError::storage("remove", key, "read-only"))
        }
    }

    #[test]
    fn add_writes_through() {
        let store = MemoryStore::new();
        let mut m = manager(store.clone());
        m.add(item("Tea", "RM4.00", 2));
        let raw = store.raw("cart").unwrap();
        assert!(raw.contains("\"quantity\":2"));
        assert!(raw.contains("\"id\":\"1000\""));
    }

    #[test]
    fn same_millisecond_additions_get_distinct_ids() {
        let mut m = manager(MemoryStore::new());
        let a = m.add(item("Tea", "RM4.00", 1));
        let b = m.add(item("Cake", "RM9.00", 1));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn remove_unknown_id_does_not_write() {
        let store = MemoryStore::new();
        let mut m = manager(store.clone());
        assert!(!m.remove("missing"));
        assert!(store.raw("cart").is_none());
    }

    #[test]
    fn load_restores_and_avoids_id_reuse() {
        let store = MemoryStore::with_entry(
            "cart",
            r#"[{"id":"5000","name":"Tea","price":"RM4.00","quantity":1,"image":""}]"#,
        );
        let mut m = manager(store);
        assert_eq!(m.load(), LoadReport::Restored(1));
        let out = m.add(item("Cake", "RM1.00", 1));
        assert_eq!(out.id(), "5001");
    }

    #[test]
    fn corrupt_state_resets_to_empty() {
        let mut m = manager(MemoryStore::with_entry("cart", "not json"));
        assert_eq!(m.load(), LoadReport::Recovered);
        assert!(m.cart().is_empty());
    }

    #[test]
    fn missing_state_is_empty() {
        let mut m = manager(MemoryStore::new());
        assert_eq!(m.load(), LoadReport::Empty);
    }

    #[test]
    fn failed_writes_keep_memory_state() {
        let mut m = CartManager::new(ReadOnlyStore, "cart", FixedClock(1));
        m.add(item("Tea", "RM4.00", 1));
        assert_eq!(m.cart().len(), 1);
        let id = m.cart().items()[0].id.clone();
        assert!(m.remove(&id));
        assert!(m.cart().is_empty());
    }

    const PREFIXES: [&str; 4] = ["RM", "$", "€", "USD "];

    #[derive(Debug, Clone)]
    enum Op {
        Add(u8, u32, usize),
        Remove(usize),
        RemoveUnknown,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..5, 1u32..=10, 0..PREFIXES.len()).prop_map(|(n, q, c)| Op::Add(n, q, c)),
            (0usize..8).prop_map(Op::Remove),
            Just(Op::RemoveUnknown),
        ]
    }

    proptest! {
        #[test]
        fn persisted_cart_reloads_identically(ops in prop::collection::vec(op(), 0..40)) {
            let store = MemoryStore::new();
            let mut m = manager(store.clone());
            for op in ops {
                match op {
                    Op::Add(n, q, c) => {
                        let price = format!("{}{n}.{n}05", PREFIXES[c]);
                        m.add(item(&format!("P{n}"), &price, q));
                    }
                    Op::Remove(i) => {
                        if let Some(id) = m.cart().items().get(i).map(|l| l.id.clone()) {
                            m.remove(&id);
                        }
                    }
                    Op::RemoveUnknown => {
                        m.remove("no-such-id");
                    }
                }
            }

            let mut reloaded = manager(store);
            reloaded.load();
            prop_assert_eq!(reloaded.cart(), m.cart());
        }
    }
}
