use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use storefront::clock::SystemClock;
use storefront::notify::{Scheduled, Toast};
use storefront::render::CartView;
use storefront::{Storefront, StorefrontError};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

mod dom;
mod events;
mod logging;
mod storage;
mod timers;
mod views;

use crate::ui_model::{dom as sel, required_ids};
use dom::DomViewport;
use storage::LocalStorage;
use views::{CartCount, CartItems, CartTotal, ToastStack};

type Page = Storefront<LocalStorage, SystemClock>;

pub fn start() {
    console_error_panic_hook::set_once();
    logging::init();

    let ready = dom::document().is_some_and(|d| d.ready_state() != "loading");
    if ready {
        boot_or_log();
        return;
    }

    let Some(doc) = dom::document() else {
        tracing::error!("no document; storefront not started");
        return;
    };
    let cb = Closure::once_into_js(boot_or_log);
    if doc
        .add_event_listener_with_callback("DOMContentLoaded", cb.unchecked_ref())
        .is_err()
    {
        tracing::error!("could not wait for DOMContentLoaded");
    }
}

fn boot_or_log() {
    match boot() {
        Ok(()) => {}
        Err(e) if e.is_recoverable() => tracing::warn!(error = %e, "storefront started degraded"),
        Err(e) => tracing::error!(error = %e, "storefront failed to start"),
    }
}

fn boot() -> Result<(), StorefrontError> {
    for id in required_ids() {
        dom::require(id)?;
    }

    let owner = Owner::new();
    owner.set();

    let config = dom::read_config();
    let title_lines = config.title_lines;
    let shell = Shell {
        page: Rc::new(RefCell::new(Storefront::new(config, LocalStorage, SystemClock))),
        cart: RwSignal::new(CartView::default()),
        toasts: RwSignal::new(Vec::new()),
    };

    mount_cart(&shell)?;
    let toasts = shell.toasts;
    leptos::mount::mount_to_body(move || view! { <ToastStack toasts=toasts /> });

    let cart = shell.cart;
    Effect::new(move |_| {
        cart.with(|_| ());
        // Titles are measured once the new rows are laid out.
        if let Err(e) = timers::set_timeout(0, move || dom::truncate_titles(title_lines)) {
            tracing::warn!(error = %e, "could not schedule title truncation");
        }
    });

    events::bind(shell.clone());

    let fragment = dom::location_hash();
    let report = shell.with_page(|page, timers| page.start(&mut DomViewport, timers, &fragment));
    tracing::info!(?report, "storefront ready");

    // The page lives as long as the document.
    std::mem::forget(owner);
    Ok(())
}

/// Render the cart panel into the page's own containers, replacing whatever
/// placeholder markup they carried.
fn mount_cart(shell: &Shell) -> Result<(), StorefrontError> {
    let cart = shell.cart;

    let list = dom::html(dom::require(sel::CART_ITEMS_LIST_ID)?)
        .ok_or(StorefrontError::MissingElement(sel::CART_ITEMS_LIST_ID))?;
    list.set_inner_html("");
    leptos::mount::mount_to(list, move || view! { <CartItems cart=cart /> }).forget();

    let total = dom::html(dom::require(sel::CART_TOTAL_PRICE_ID)?)
        .ok_or(StorefrontError::MissingElement(sel::CART_TOTAL_PRICE_ID))?;
    total.set_text_content(None);
    leptos::mount::mount_to(total, move || view! { <CartTotal cart=cart /> }).forget();

    // The badge is optional markup.
    if let Some(count) = dom::query(sel::CART_COUNT).and_then(dom::html) {
        count.set_text_content(None);
        leptos::mount::mount_to(count, move || view! { <CartCount cart=cart /> }).forget();
    }
    Ok(())
}

/// Shared handle given to every event listener and timer callback.
#[derive(Clone)]
pub(super) struct Shell {
    page: Rc<RefCell<Page>>,
    cart: RwSignal<CartView>,
    toasts: RwSignal<Vec<Toast>>,
}

impl Shell {
    /// Run `f` against the page, publish the resulting state, then arm any
    /// timers it requested. Timers are armed only after the borrow ends.
    pub(super) fn with_page<R>(&self, f: impl FnOnce(&mut Page, &mut Vec<Scheduled>) -> R) -> R {
        let mut pending = Vec::new();
        let out = {
            let mut page = self.page.borrow_mut();
            let out = f(&mut page, &mut pending);
            self.publish(&page);
            out
        };
        self.arm(pending);
        out
    }

    pub(super) fn page(&self) -> std::cell::Ref<'_, Page> {
        self.page.borrow()
    }

    fn publish(&self, page: &Page) {
        let view = page.view();
        if self.cart.with_untracked(|v| *v != view) {
            self.cart.set(view);
        }
        let toasts = page.toasts();
        if self.toasts.with_untracked(|ts| ts.as_slice() != toasts) {
            self.toasts.set(toasts.to_vec());
        }
    }

    fn arm(&self, pending: Vec<Scheduled>) {
        for Scheduled { delay_ms, timer } in pending {
            let shell = self.clone();
            let res = timers::set_timeout(delay_ms, move || {
                shell.with_page(|page, timers| page.fire_timer(timers, timer));
            });
            if let Err(e) = res {
                tracing::warn!(error = %e, ?timer, "could not schedule toast timer");
            }
        }
    }
}
