use serde::{Deserialize, Serialize};

use super::money::Money;

/// One distinct product in the cart. Serialized in the shape the checkout page
/// reads: `{ id, name, price, quantity, image }` with `price` as a display string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Money,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub image: String,
}

fn default_quantity() -> u32 {
    1
}

/// A product about to be added; the cart assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    pub name: String,
    pub price: Money,
    pub quantity: u32,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended.
    Added { id: String, name: String, quantity: u32 },
    /// An existing line with the same name absorbed the quantity.
    Updated {
        id: String,
        name: String,
        added: u32,
        quantity: u32,
    },
}

impl AddOutcome {
    pub fn id(&self) -> &str {
        match self {
            AddOutcome::Added { id, .. } | AddOutcome::Updated { id, .. } => id,
        }
    }
}

/// Ordered line items; insertion order is display order and names are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from stored lines, folding any repeated names into the
    /// first occurrence so the uniqueness invariant holds from the start.
    pub fn from_items(items: Vec<CartLineItem>) -> Self {
        let mut cart = Cart::new();
        for item in items {
            match cart.items.iter_mut().find(|i| i.name == item.name) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity)
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<CartLineItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.name == name)
    }

    /// Add `item`, merging by name. `next_id` is only called when a new line
    /// is created. A zero quantity counts as one.
    pub fn add(&mut self, item: NewLineItem, next_id: impl FnOnce() -> String) -> AddOutcome {
        let added = item.quantity.max(1);

        if let Some(existing) = self.items.iter_mut().find(|i| i.name == item.name) {
            existing.quantity = existing.quantity.saturating_add(added);
            return AddOutcome::Updated {
                id: existing.id.clone(),
                name: existing.name.clone(),
                added,
                quantity: existing.quantity,
            };
        }

        let id = next_id();
        self.items.push(CartLineItem {
            id: id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: added,
            image: item.image,
        });
        AddOutcome::Added {
            id,
            name: item.name,
            quantity: added,
        }
    }

    /// Remove the line with `id`. Unknown ids leave the cart untouched.
    pub fn remove(&mut self, id: &str) -> Option<CartLineItem> {
        let pos = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Sum of quantities, as shown on the cart badge.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of price times quantity at full precision; round with
    /// [`Money::amount`]. An empty cart totals zero in `currency`, otherwise the
    /// first line's currency is used.
    pub fn total(&self, currency: &str) -> Money {
        let start = match self.items.first() {
            Some(first) => Money::zero(first.price.currency()),
            None => Money::zero(currency),
        };
        self.items
            .iter()
            .fold(start, |acc, i| acc.saturating_add(&i.price.times(i.quantity)))
    }
}
