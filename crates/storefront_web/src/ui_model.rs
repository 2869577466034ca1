//! The page markup this shell binds to, kept outside the wasm-only `web`
//! module so the inventory can be unit-tested on the host.

/// Ids and classes the pre-rendered page provides.
pub mod dom {
    pub const CART_ICON_ID: &str = "cart-icon";
    pub const CART_DROPDOWN_ID: &str = "cart-dropdown";
    pub const CART_ITEMS_LIST_ID: &str = "cart-items-list";
    pub const CART_TOTAL_PRICE_ID: &str = "cart-total-price";
    pub const CART_COUNT: &str = ".cart-count";
    pub const CHECKOUT_BUTTON: &str = ".checkout-btn";
    pub const CONFIG_SCRIPT_ID: &str = "storefront-config";

    pub const POPUP_OVERLAY: &str = ".product-popup-overlay";
    pub const POPUP_OVERLAY_CLASS: &str = "product-popup-overlay";
    pub const POPUP: &str = ".product-popup";
    pub const CLOSE_POPUP: &str = ".close-popup";
    pub const PRODUCT_TITLE: &str = ".product-title";
    pub const PRODUCT_PRICE: &str = ".price";
    pub const PRODUCT_IMAGE: &str = ".product-image-container img";
    pub const ADD_TO_CART: &str = ".add-to-cart";

    pub const QUANTITY_SELECTOR: &str = ".quantity-selector";
    pub const QUANTITY_MINUS: &str = ".quantity-selector .minus";
    pub const QUANTITY_PLUS: &str = ".quantity-selector .plus";
    pub const QUANTITY_INPUT: &str = ".qty-input";

    pub const CART_ITEM_TITLE: &str = ".cart-item-title";
    pub const CART_ITEM_REMOVE: &str = ".cart-item-remove";
    pub const TOAST_CLOSE: &str = ".cart-notification-close";

    /// Class toggled on the dropdown and on visible toasts.
    pub const SHOW_CLASS: &str = "show";

    pub const DATA_ID: &str = "data-id";
    pub const DATA_TOAST: &str = "data-toast";
    pub const DATA_FULL_TEXT: &str = "data-full-text";
}

/// Elements the shell refuses to start without.
pub fn required_ids() -> &'static [&'static str] {
    &[
        dom::CART_ICON_ID,
        dom::CART_DROPDOWN_ID,
        dom::CART_ITEMS_LIST_ID,
        dom::CART_TOTAL_PRICE_ID,
    ]
}

/// Clickable page controls, in the order a click is matched against them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    ToastClose,
    CartIcon,
    RemoveLine,
    Checkout,
    PopupLink,
    ClosePopup,
    /// The dimmed area around a popup. Only a click on the overlay itself
    /// counts, not one that bubbled up from the popup inside it.
    Backdrop,
    StepDown,
    StepUp,
    AddToCart,
}

impl Control {
    pub const ALL: [Control; 10] = [
        Control::ToastClose,
        Control::CartIcon,
        Control::RemoveLine,
        Control::Checkout,
        Control::PopupLink,
        Control::ClosePopup,
        Control::Backdrop,
        Control::StepDown,
        Control::StepUp,
        Control::AddToCart,
    ];

    /// Selector for `Element::closest`, so clicks on an icon or label inside
    /// the control still reach it. `None` for `Backdrop`.
    pub fn selector(self, popup_prefix: &str) -> Option<String> {
        let sel = match self {
            Control::ToastClose => dom::TOAST_CLOSE.to_string(),
            Control::CartIcon => id_selector(dom::CART_ICON_ID),
            Control::RemoveLine => dom::CART_ITEM_REMOVE.to_string(),
            Control::Checkout => dom::CHECKOUT_BUTTON.to_string(),
            Control::PopupLink => popup_link_selector(popup_prefix),
            Control::ClosePopup => dom::CLOSE_POPUP.to_string(),
            Control::Backdrop => return None,
            Control::StepDown => dom::QUANTITY_MINUS.to_string(),
            Control::StepUp => dom::QUANTITY_PLUS.to_string(),
            Control::AddToCart => dom::ADD_TO_CART.to_string(),
        };
        Some(sel)
    }

    /// Whether the browser's own click handling is cancelled. Controls are
    /// often `<a href="#">` or buttons inside a form; following them would put
    /// a bare `#` back in the address or submit the form.
    pub fn cancels_default(self) -> bool {
        !matches!(
            self,
            Control::ToastClose | Control::CartIcon | Control::RemoveLine
        )
    }
}

/// Selector matching every link that opens a popup, e.g. `[href^="#popup-"]`.
pub fn popup_link_selector(prefix: &str) -> String {
    format!("[href^=\"#{prefix}\"]")
}

/// `#id` selector for a bare element id.
pub fn id_selector(id: &str) -> String {
    format!("#{id}")
}

/// Address of the current page without its fragment, used to clear `#popup-*`.
pub fn url_without_fragment(pathname: &str, search: &str) -> String {
    let path = if pathname.is_empty() { "/" } else { pathname };
    format!("{path}{search}")
}

/// Parse a computed `line-height` such as `"24px"`. `"normal"` and other
/// keywords yield `None` and disable truncation.
pub fn parse_px(value: &str) -> Option<f64> {
    let v = value.trim().strip_suffix("px")?.trim();
    v.parse::<f64>().ok().filter(|px| px.is_finite() && *px > 0.0)
}
