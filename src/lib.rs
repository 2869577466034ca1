//! Cart, popup and quantity-stepper logic for a product-detail page.
//!
//! Everything here runs on the host; the browser shell in `storefront_web`
//! binds it to the document.

#[path = "core/cart.rs"]
pub mod cart;

#[path = "core/clock.rs"]
pub mod clock;

#[path = "core/config.rs"]
pub mod config;

#[path = "core/error.rs"]
pub mod error;

#[path = "core/manager.rs"]
pub mod manager;

#[path = "core/money.rs"]
pub mod money;

#[path = "core/notify.rs"]
pub mod notify;

#[path = "core/popup.rs"]
pub mod popup;

#[path = "core/render.rs"]
pub mod render;

#[path = "core/stepper.rs"]
pub mod stepper;

#[path = "core/store.rs"]
pub mod store;

#[path = "core/storefront.rs"]
pub mod storefront;

pub use cart::{AddOutcome, Cart, CartLineItem, NewLineItem};
pub use config::StorefrontConfig;
pub use error::StorefrontError;
pub use money::Money;
pub use storefront::Storefront;
