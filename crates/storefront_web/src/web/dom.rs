use storefront::cart::NewLineItem;
use storefront::config::StorefrontConfig;
use storefront::popup::Viewport;
use storefront::render::truncate_to_fit;
use storefront::stepper::quantity_from_field;
use storefront::StorefrontError;
use wasm_bindgen::{JsCast, JsValue};

use crate::ui_model::{dom, parse_px, url_without_fragment};

pub(super) fn document() -> Option<web_sys::Document> {
    web_sys::window().and_then(|w| w.document())
}

pub(super) fn by_id(id: &str) -> Option<web_sys::Element> {
    document().and_then(|d| d.get_element_by_id(id))
}

pub(super) fn query(selector: &str) -> Option<web_sys::Element> {
    document().and_then(|d| d.query_selector(selector).ok().flatten())
}

pub(super) fn query_all(selector: &str) -> Vec<web_sys::Element> {
    let Some(list) = document().and_then(|d| d.query_selector_all(selector).ok()) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<web_sys::Element>().ok())
        .collect()
}

pub(super) fn closest(el: &web_sys::Element, selector: &str) -> Option<web_sys::Element> {
    el.closest(selector).ok().flatten()
}

pub(super) fn has_class(el: &web_sys::Element, class: &str) -> bool {
    el.class_list().contains(class)
}

pub(super) fn require(id: &'static str) -> Result<web_sys::Element, StorefrontError> {
    by_id(id).ok_or(StorefrontError::MissingElement(id))
}

pub(super) fn html(el: web_sys::Element) -> Option<web_sys::HtmlElement> {
    el.dyn_into::<web_sys::HtmlElement>().ok()
}

fn set_display(el: web_sys::Element, value: &str) {
    if let Some(el) = html(el) {
        let _ = el.style().set_property("display", value);
    }
}

/// Current location hash including the leading `#`, or empty.
pub(super) fn location_hash() -> String {
    web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default()
}

/// Page overrides from `<script type="application/json" id="storefront-config">`.
pub(super) fn read_config() -> StorefrontConfig {
    let Some(raw) = by_id(dom::CONFIG_SCRIPT_ID).and_then(|el| el.text_content()) else {
        return StorefrontConfig::default();
    };
    match StorefrontConfig::from_json(&raw) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring malformed storefront config");
            StorefrontConfig::default()
        }
    }
}

/// The popup surface of the real document.
pub(super) struct DomViewport;

impl Viewport for DomViewport {
    fn scroll_y(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.scroll_y().ok())
            .unwrap_or(0.0)
    }

    fn scroll_to(&mut self, y: f64) {
        if let Some(w) = web_sys::window() {
            w.scroll_to_with_x_and_y(0.0, y);
        }
    }

    fn set_fragment(&mut self, fragment: Option<&str>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Ok(history) = window.history() else {
            return;
        };
        // History API instead of `location.hash` so the browser doesn't jump
        // to the popup element.
        let res = match fragment {
            Some(id) => history.push_state_with_url(&JsValue::NULL, "", Some(&format!("#{id}"))),
            None => {
                let location = window.location();
                let url = url_without_fragment(
                    &location.pathname().unwrap_or_default(),
                    &location.search().unwrap_or_default(),
                );
                history.replace_state_with_url(&JsValue::NULL, "", Some(&url))
            }
        };
        if res.is_err() {
            tracing::debug!(?fragment, "history update rejected");
        }
    }

    fn show_popup(&mut self, id: &str) -> bool {
        match by_id(id) {
            Some(el) => {
                set_display(el, "flex");
                true
            }
            None => false,
        }
    }

    fn hide_all_popups(&mut self) {
        for el in query_all(dom::POPUP_OVERLAY) {
            set_display(el, "none");
        }
    }
}

/// Read the product shown in the popup that contains `button`.
pub(super) fn product_from_popup(
    button: &web_sys::Element,
    config: &StorefrontConfig,
) -> Option<NewLineItem> {
    let popup = closest(button, dom::POPUP)?;
    let text = |sel: &str| {
        popup
            .query_selector(sel)
            .ok()
            .flatten()
            .and_then(|el| el.text_content())
            .unwrap_or_default()
    };

    let name = text(dom::PRODUCT_TITLE).trim().to_string();
    let price = text(dom::PRODUCT_PRICE);
    let quantity = popup
        .query_selector(dom::QUANTITY_INPUT)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map_or(1, |input| quantity_from_field(&input.value()));
    let image = popup
        .query_selector(dom::PRODUCT_IMAGE)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<web_sys::HtmlImageElement>().ok())
        .map(|img| img.src())
        .unwrap_or_default();

    Some(NewLineItem {
        name,
        price: storefront::Money::parse_display(&price, &config.currency),
        quantity,
        image,
    })
}

/// Trim every cart item title to `lines` rendered lines, keeping the full text
/// in `data-full-text` so later passes start from the untrimmed title.
pub(super) fn truncate_titles(lines: u32) {
    let Some(window) = web_sys::window() else {
        return;
    };
    for el in query_all(dom::CART_ITEM_TITLE) {
        let Some(line_height) = window
            .get_computed_style(&el)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value("line-height").ok())
            .and_then(|v| parse_px(&v))
        else {
            continue;
        };
        let max_height = line_height * f64::from(lines);

        if let Some(h) = html(el.clone()) {
            let _ = h.style().set_property("height", "auto");
        }
        let full = el
            .get_attribute(dom::DATA_FULL_TEXT)
            .or_else(|| el.text_content())
            .unwrap_or_default();
        let _ = el.set_attribute(dom::DATA_FULL_TEXT, &full);

        let fitted = truncate_to_fit(&full, |candidate| {
            el.set_text_content(Some(candidate));
            f64::from(el.scroll_height()) <= max_height
        });
        el.set_text_content(Some(&fitted));
    }
}
