use tracing::{info, warn};

use super::cart::{AddOutcome, Cart, NewLineItem};
use super::clock::Clock;
use super::config::StorefrontConfig;
use super::error::{Result, StorefrontError};
use super::manager::{CartManager, LoadReport};
use super::money::Money;
use super::notify::{Notifications, Timers, Toast, ToastLevel, ToastTimer};
use super::popup::{popup_id_from_fragment, PopupController, Viewport};
use super::render::CartView;
use super::stepper::QuantityStepper;
use super::store::KeyValueStore;

/// Everything the product page keeps between events: the cart, the open popup
/// and the toasts on screen. One instance per page.
pub struct Storefront<S: KeyValueStore, C: Clock> {
    config: StorefrontConfig,
    cart: CartManager<S, C>,
    popups: PopupController,
    toasts: Notifications,
}

impl<S: KeyValueStore, C: Clock> Storefront<S, C> {
    pub fn new(config: StorefrontConfig, store: S, clock: C) -> Self {
        let cart = CartManager::new(store, config.storage_key.clone(), clock);
        let toasts = Notifications::new(config.entry_delay_ms, config.exit_delay_ms);
        Self {
            config,
            cart,
            popups: PopupController::new(),
            toasts,
        }
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn cart(&self) -> &Cart {
        self.cart.cart()
    }

    pub fn view(&self) -> CartView {
        CartView::from_cart(self.cart.cart(), &self.config.currency)
    }

    pub fn toasts(&self) -> &[Toast] {
        self.toasts.toasts()
    }

    pub fn popups(&self) -> &PopupController {
        &self.popups
    }

    /// Restore the stored cart and honor a `#popup-*` deep link.
    pub fn start(
        &mut self,
        view: &mut impl Viewport,
        timers: &mut impl Timers,
        fragment: &str,
    ) -> LoadReport {
        let report = self.cart.load();
        if report == LoadReport::Recovered {
            self.toasts.show(
                timers,
                "Cart reset",
                "Your saved cart could not be read and was cleared",
                ToastLevel::Info,
                self.config.notification_ms,
            );
        }

        if let Some(id) = popup_id_from_fragment(fragment, &self.config.popup_prefix) {
            info!(popup = id, "opening popup from link");
            self.popups.open(view, id);
        }
        report
    }

    pub fn add_to_cart(&mut self, timers: &mut impl Timers, item: NewLineItem) -> AddOutcome {
        let outcome = self.cart.add(item);
        let (title, message) = match &outcome {
            AddOutcome::Added { name, quantity, .. } => (
                "Added to Cart",
                format!("{quantity} × {name} added to your cart"),
            ),
            AddOutcome::Updated { name, added, .. } => (
                "Cart Updated",
                format!("Added {added} more × {name} to your cart"),
            ),
        };
        self.toasts.show(
            timers,
            title,
            message,
            ToastLevel::Success,
            self.config.notification_ms,
        );
        outcome
    }

    /// The popup's add-to-cart button: add, then close the popup.
    pub fn add_from_popup(
        &mut self,
        view: &mut impl Viewport,
        timers: &mut impl Timers,
        item: NewLineItem,
    ) -> AddOutcome {
        let outcome = self.add_to_cart(timers, item);
        self.popups.close_all(view);
        outcome
    }

    pub fn remove_from_cart(&mut self, id: &str) -> bool {
        self.cart.remove(id)
    }

    pub fn open_popup(&mut self, view: &mut impl Viewport, id: &str) {
        self.popups.open(view, id);
    }

    pub fn close_popups(&mut self, view: &mut impl Viewport) {
        self.popups.close_all(view);
    }

    pub fn dismiss_toast(&mut self, timers: &mut impl Timers, id: u64) -> bool {
        self.toasts.dismiss(timers, id)
    }

    pub fn fire_timer(&mut self, timers: &mut impl Timers, timer: ToastTimer) -> bool {
        self.toasts.fire(timers, timer)
    }

    /// Where to send the shopper, or `EmptyCart` when there is nothing to buy.
    pub fn checkout(&self) -> Result<&str> {
        if self.cart.cart().is_empty() {
            warn!("checkout attempted with an empty cart");
            return Err(StorefrontError::EmptyCart);
        }
        Ok(self.config.checkout_url.as_str())
    }

    pub fn stepper(&self, min_attr: Option<&str>) -> QuantityStepper {
        QuantityStepper::new(min_attr, self.config.max_quantity)
    }

    pub fn parse_price(&self, raw: &str) -> Money {
        Money::parse_display(raw, &self.config.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::notify::testing::TimerQueue;
    use crate::notify::ToastPhase;
    use crate::popup::testing::RecordingViewport;
    use crate::stepper::quantity_from_field;
    use crate::store::MemoryStore;

    fn storefront(store: MemoryStore) -> Storefront<MemoryStore, FixedClock> {
        Storefront::new(StorefrontConfig::default(), store, FixedClock(1_700_000_000_000))
    }

    fn product(
        sf: &Storefront<MemoryStore, FixedClock>,
        name: &str,
        price: &str,
        qty: &str,
    ) -> NewLineItem {
        NewLineItem {
            name: name.to_string(),
            price: sf.parse_price(price),
            quantity: quantity_from_field(qty),
            image: format!("https://shop.example/{name}.jpg"),
        }
    }

    #[test]
    fn add_shows_added_then_updated_toasts() {
        let mut sf = storefront(MemoryStore::new());
        let mut timers = TimerQueue::new();

        let tea = product(&sf, "Tea", "RM4.00", "2");
        sf.add_to_cart(&mut timers, tea);
        let tea = product(&sf, "Tea", "RM4.00", "3");
        sf.add_to_cart(&mut timers, tea);

        let toasts = sf.toasts();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].title, "Added to Cart");
        assert_eq!(toasts[0].message, "2 × Tea added to your cart");
        assert_eq!(toasts[1].title, "Cart Updated");
        assert_eq!(toasts[1].message, "Added 3 more × Tea to your cart");
        assert_eq!(sf.view().count, "5");
    }

    #[test]
    fn add_from_popup_closes_it() {
        let mut sf = storefront(MemoryStore::new());
        let mut view = RecordingViewport::with_popups(&["popup-tea"]);
        let mut timers = TimerQueue::new();

        sf.open_popup(&mut view, "popup-tea");
        let tea = product(&sf, "Tea", "RM4.00", "1");
        sf.add_from_popup(&mut view, &mut timers, tea);

        assert!(view.visible.is_empty());
        assert_eq!(view.fragment, None);
        assert_eq!(sf.cart().len(), 1);
    }

    #[test]
    fn start_restores_cart_and_opens_deep_link() {
        let store = MemoryStore::with_entry(
            "cart",
            r#"[{"id":"1","name":"Tea","price":"RM4.00","quantity":2,"image":"t.jpg"}]"#,
        );
        let mut sf = storefront(store);
        let mut view = RecordingViewport::with_popups(&["popup-cake"]);
        let mut timers = TimerQueue::new();

        let report = sf.start(&mut view, &mut timers, "#popup-cake");

        assert_eq!(report, LoadReport::Restored(1));
        assert_eq!(sf.view().total, "8.00");
        assert_eq!(sf.popups().current(), Some("popup-cake"));
        assert_eq!(view.fragment.as_deref(), Some("popup-cake"));
    }

    #[test]
    fn start_ignores_unrelated_fragments() {
        let mut sf = storefront(MemoryStore::new());
        let mut view = RecordingViewport::with_popups(&["popup-cake"]);
        let mut timers = TimerQueue::new();
        sf.start(&mut view, &mut timers, "#reviews");
        assert_eq!(sf.popups().current(), None);
    }

    #[test]
    fn corrupt_cart_resets_with_a_notice() {
        let store = MemoryStore::with_entry("cart", "{{{{");
        let mut sf = storefront(store.clone());
        let mut view = RecordingViewport::default();
        let mut timers = TimerQueue::new();

        assert_eq!(sf.start(&mut view, &mut timers, ""), LoadReport::Recovered);
        assert!(sf.cart().is_empty());
        assert_eq!(sf.toasts()[0].level, ToastLevel::Info);

        // Next write replaces the unreadable value.
        let tea = product(&sf, "Tea", "RM4.00", "1");
        sf.add_to_cart(&mut timers, tea);
        assert!(store.raw("cart").unwrap().starts_with("[{"));
    }

    #[test]
    fn symbol_currency_survives_reload() {
        let mut config = StorefrontConfig::default();
        config.currency = "$".to_string();
        let store = MemoryStore::new();
        let mut sf = Storefront::new(config.clone(), store.clone(), FixedClock(0));
        let mut timers = TimerQueue::new();
        let mug = product(&sf, "Mug", "$10.00", "2");
        sf.add_to_cart(&mut timers, mug);

        let mut reloaded = Storefront::new(config, store, FixedClock(0));
        let mut view = RecordingViewport::default();
        reloaded.start(&mut view, &mut timers, "");

        assert_eq!(reloaded.cart(), sf.cart());
        assert_eq!(reloaded.view().lines[0].price, "$10.00");
    }

    #[test]
    fn checkout_requires_items() {
        let mut sf = storefront(MemoryStore::new());
        let mut timers = TimerQueue::new();
        assert!(matches!(sf.checkout(), Err(StorefrontError::EmptyCart)));

        let tea = product(&sf, "Tea", "RM4.00", "1");
        sf.add_to_cart(&mut timers, tea);
        assert_eq!(sf.checkout().unwrap(), "checkout.html");
    }

    #[test]
    fn remove_then_view_reflects_it() {
        let mut sf = storefront(MemoryStore::new());
        let mut timers = TimerQueue::new();
        let a = product(&sf, "A", "RM10.00", "2");
        let b = product(&sf, "B", "RM5.50", "1");
        sf.add_to_cart(&mut timers, a);
        let out = sf.add_to_cart(&mut timers, b);
        assert_eq!(sf.view().total, "25.50");

        assert!(sf.remove_from_cart(out.id()));
        assert!(!sf.remove_from_cart("missing"));
        assert_eq!(sf.view().total, "20.00");
        assert_eq!(sf.view().count, "2");
    }

    #[test]
    fn toast_lifecycle_through_controller() {
        let mut sf = storefront(MemoryStore::new());
        let mut timers = TimerQueue::new();
        let tea = product(&sf, "Tea", "RM4.00", "1");
        sf.add_to_cart(&mut timers, tea);
        let id = sf.toasts()[0].id;

        // Route timers through the controller the way the page does.
        let mut pending: Vec<crate::notify::Scheduled> = Vec::new();
        assert!(sf.fire_timer(&mut pending, ToastTimer::Reveal(id)));
        assert_eq!(sf.toasts()[0].phase, ToastPhase::Visible);
        assert!(sf.dismiss_toast(&mut pending, id));
        assert!(!sf.fire_timer(&mut pending, ToastTimer::Dismiss(id)));
        assert!(sf.fire_timer(&mut pending, ToastTimer::Remove(id)));
        assert!(sf.toasts().is_empty());
    }

    #[test]
    fn stepper_uses_configured_max() {
        let mut config = StorefrontConfig::default();
        config.max_quantity = 4;
        let sf = Storefront::new(config, MemoryStore::new(), FixedClock(0));
        let s = sf.stepper(Some("1"));
        assert_eq!(s.increment("4"), None);
        assert_eq!(s.commit("9"), 4);
    }
}
