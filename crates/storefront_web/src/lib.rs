//! Browser shell for the product page: mounts the cart panel and toasts with
//! Leptos and routes page events into [`storefront::Storefront`].
//!
//! Only `ui_model` is compiled on native targets. The shell itself needs
//! `--features web` and a wasm32 target.

pub mod ui_model;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::start;
