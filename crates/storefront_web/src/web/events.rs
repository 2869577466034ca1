//! Delegated listeners. Cart rows and toasts are re-rendered freely, so every
//! control is matched from the event target instead of bound per node.

use storefront::popup::popup_id_from_fragment;
use storefront::stepper::suppresses_key;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::dom::{self, DomViewport};
use super::Shell;
use crate::ui_model::{dom as sel, Control};

pub(super) fn bind(shell: Shell) {
    let Some(doc) = dom::document() else {
        return;
    };

    let click_shell = shell.clone();
    listen(&doc, "click", move |ev| on_click(&click_shell, ev));
    let change_shell = shell;
    listen(&doc, "change", move |ev| on_change(&change_shell, ev));
    listen(&doc, "keydown", on_keydown);
}

fn listen(doc: &web_sys::Document, name: &str, f: impl FnMut(web_sys::Event) + 'static) {
    let cb = Closure::wrap(Box::new(f) as Box<dyn FnMut(_)>);
    if doc
        .add_event_listener_with_callback(name, cb.as_ref().unchecked_ref())
        .is_err()
    {
        tracing::error!(event = name, "could not attach listener");
    }
    cb.forget();
}

fn target(ev: &web_sys::Event) -> Option<web_sys::Element> {
    ev.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok())
}

fn qty_input(el: &web_sys::Element) -> Option<web_sys::HtmlInputElement> {
    if !el.matches(sel::QUANTITY_INPUT).unwrap_or(false) {
        return None;
    }
    el.clone().dyn_into::<web_sys::HtmlInputElement>().ok()
}

/// The first control, in [`Control::ALL`] order, that the click landed in.
fn hit(el: &web_sys::Element, popup_prefix: &str) -> Option<(Control, web_sys::Element)> {
    Control::ALL.iter().find_map(|&c| match c.selector(popup_prefix) {
        Some(selector) => dom::closest(el, &selector).map(|found| (c, found)),
        None => dom::has_class(el, sel::POPUP_OVERLAY_CLASS).then(|| (c, el.clone())),
    })
}

fn on_click(shell: &Shell, ev: web_sys::Event) {
    let Some(el) = target(&ev) else {
        return;
    };
    let prefix = shell.page().config().popup_prefix.clone();
    let clicked = hit(&el, &prefix);

    let dropdown = dom::by_id(sel::CART_DROPDOWN_ID);
    if let Some((Control::CartIcon, _)) = clicked {
        if let Some(d) = &dropdown {
            let _ = d.class_list().toggle(sel::SHOW_CLASS);
        }
        return;
    }
    // Measured before any re-render can detach the target.
    if let Some(d) = &dropdown {
        let node: &web_sys::Node = &el;
        if !d.contains(Some(node)) {
            let _ = d.class_list().remove_1(sel::SHOW_CLASS);
        }
    }

    let Some((control, found)) = clicked else {
        return;
    };
    if control.cancels_default() {
        ev.prevent_default();
    }

    match control {
        Control::ToastClose => {
            if let Some(id) = found
                .get_attribute(sel::DATA_TOAST)
                .and_then(|v| v.parse::<u64>().ok())
            {
                shell.with_page(|page, timers| page.dismiss_toast(timers, id));
            }
        }
        Control::CartIcon => {}
        Control::RemoveLine => {
            if let Some(id) = found.get_attribute(sel::DATA_ID) {
                let removed = shell.with_page(|page, _| page.remove_from_cart(&id));
                tracing::debug!(id = %id, removed, "remove clicked");
            }
        }
        Control::Checkout => checkout(shell),
        Control::PopupLink => {
            let href = found.get_attribute("href").unwrap_or_default();
            if let Some(id) = popup_id_from_fragment(&href, &prefix) {
                let id = id.to_string();
                shell.with_page(|page, _| page.open_popup(&mut DomViewport, &id));
            }
        }
        Control::ClosePopup | Control::Backdrop => {
            shell.with_page(|page, _| page.close_popups(&mut DomViewport));
        }
        Control::StepDown => step(shell, &found, true),
        Control::StepUp => step(shell, &found, false),
        Control::AddToCart => {
            let item = dom::product_from_popup(&found, shell.page().config());
            match item {
                Some(item) => {
                    shell.with_page(|page, timers| {
                        page.add_from_popup(&mut DomViewport, timers, item)
                    });
                }
                None => tracing::warn!("add-to-cart outside a product popup"),
            }
        }
    }
}

fn checkout(shell: &Shell) {
    let target = shell.page().checkout().map(str::to_string);
    let Some(window) = web_sys::window() else {
        return;
    };
    match target {
        Ok(url) => {
            if window.location().set_href(&url).is_err() {
                tracing::error!(url = %url, "checkout navigation failed");
            }
        }
        Err(e) => {
            let _ = window.alert_with_message(&e.to_string());
        }
    }
}

fn step(shell: &Shell, button: &web_sys::Element, minus: bool) {
    let Some(input) = dom::closest(button, sel::QUANTITY_SELECTOR)
        .and_then(|s| s.query_selector(sel::QUANTITY_INPUT).ok().flatten())
        .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
    else {
        return;
    };
    let stepper = shell.page().stepper(input.get_attribute("min").as_deref());
    let raw = input.value();
    let next = if minus {
        stepper.decrement(&raw)
    } else {
        stepper.increment(&raw)
    };
    if let Some(v) = next {
        input.set_value(&v.to_string());
    }
}

fn on_change(shell: &Shell, ev: web_sys::Event) {
    let Some(input) = target(&ev).as_ref().and_then(qty_input) else {
        return;
    };
    let stepper = shell.page().stepper(input.get_attribute("min").as_deref());
    input.set_value(&stepper.commit(&input.value()).to_string());
}

fn on_keydown(ev: web_sys::Event) {
    if target(&ev).as_ref().and_then(qty_input).is_none() {
        return;
    }
    let enter = ev
        .dyn_ref::<web_sys::KeyboardEvent>()
        .is_some_and(|k| suppresses_key(&k.key()));
    if enter {
        ev.prevent_default();
    }
}
