use leptos::prelude::*;
use storefront::notify::Toast;
use storefront::render::{CartLineView, CartView, EMPTY_CART_MESSAGE};

#[component]
pub(super) fn CartItems(cart: RwSignal<CartView>) -> impl IntoView {
    view! {
        <Show
            when=move || cart.with(|c| !c.is_empty())
            fallback=|| view! { <p class="empty-cart-message">{EMPTY_CART_MESSAGE}</p> }
        >
            <For
                each=move || cart.with(|c| c.lines.clone())
                // Whole line as key: any change re-creates the row.
                key=|line| line.clone()
                children=move |line: CartLineView| {
                    view! {
                        <div class="cart-item">
                            <img src=line.image alt=line.image_alt class="cart-item-image" />
                            <div class="cart-item-details">
                                <div class="cart-item-title">{line.title}</div>
                                <div class="cart-item-price">{line.price}</div>
                                <div class="cart-item-quantity">{line.quantity}</div>
                                <div class="cart-item-remove" data-id=line.id>
                                    "Remove"
                                </div>
                            </div>
                        </div>
                    }
                }
            />
        </Show>
    }
}

#[component]
pub(super) fn CartCount(cart: RwSignal<CartView>) -> impl IntoView {
    move || cart.with(|c| c.count.clone())
}

#[component]
pub(super) fn CartTotal(cart: RwSignal<CartView>) -> impl IntoView {
    move || cart.with(|c| c.total.clone())
}

#[component]
pub(super) fn ToastStack(toasts: RwSignal<Vec<Toast>>) -> impl IntoView {
    view! {
        <For
            each=move || toasts.get()
            key=|t| t.id
            children=move |t: Toast| {
                let id = t.id;
                // The class follows the toast's phase so the entry/exit
                // transitions run on the same node.
                let class = move || {
                    toasts.with(|ts| {
                        ts.iter()
                            .find(|x| x.id == id)
                            .map(Toast::class)
                            .unwrap_or_default()
                    })
                };
                view! {
                    <div class=class>
                        <div class="cart-notification-icon">"🛒"</div>
                        <div class="cart-notification-content">
                            <div class="cart-notification-title">{t.title}</div>
                            <div class="cart-notification-message">{t.message}</div>
                        </div>
                        <div class="cart-notification-close" data-toast=id.to_string()>
                            "×"
                        </div>
                    </div>
                }
            }
        />
    }
}
