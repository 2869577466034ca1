//! Plain-data projection of the cart for the page.
//!
//! The shell renders `CartView` declaratively; nothing here touches the DOM, so
//! badge counts, line markup inputs and totals are checked on the host.

use super::cart::{Cart, CartLineItem};

pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CartLineView {
    pub id: String,
    pub title: String,
    pub price: String,
    pub quantity: String,
    pub image: String,
    pub image_alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartView {
    pub count: String,
    pub lines: Vec<CartLineView>,
    pub total: String,
}

impl CartView {
    pub fn from_cart(cart: &Cart, currency: &str) -> Self {
        Self {
            count: cart.item_count().to_string(),
            lines: cart.items().iter().map(line_view).collect(),
            total: cart.total(currency).amount(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn line_view(item: &CartLineItem) -> CartLineView {
    CartLineView {
        id: item.id.clone(),
        title: display_title(&item.name, item.price.currency()),
        price: item.price.to_string(),
        quantity: format!("Qty: {}", item.quantity),
        image: item.image.clone(),
        image_alt: item.name.clone(),
    }
}

/// Product titles scraped from the page sometimes carry a doubled currency
/// prefix (`"RMRM"`); show it once.
pub fn display_title(name: &str, currency: &str) -> String {
    if currency.is_empty() {
        return name.to_string();
    }
    let doubled = format!("{currency}{currency}");
    name.replacen(&doubled, currency, 1)
}

/// Longest prefix of `full` (on char boundaries) for which `fits(candidate)`
/// holds, with `...` appended when anything was cut.
///
/// `fits` is the layout probe: on the page it sets the element text and
/// compares `scrollHeight` against the allowed height. It must be monotone
/// (a shorter text never overflows when a longer one fits).
pub fn truncate_to_fit(full: &str, mut fits: impl FnMut(&str) -> bool) -> String {
    if fits(full) {
        return full.to_string();
    }

    // Byte offset just past each char, so `&full[..ends[n - 1]]` keeps n chars.
    let ends: Vec<usize> = full.char_indices().map(|(i, c)| i + c.len_utf8()).collect();
    let (mut lo, mut hi) = (0usize, ends.len());
    while lo < hi {
        let mid = (lo + hi + 1) / 2;
        if fits(&format!("{}...", &full[..ends[mid - 1]])) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    if lo == 0 {
        return "...".to_string();
    }
    format!("{}...", &full[..ends[lo - 1]])
}
