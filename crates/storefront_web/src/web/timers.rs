use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Run `f` once after `delay_ms` on the page's event loop.
pub(super) fn set_timeout(delay_ms: u32, f: impl FnOnce() + 'static) -> Result<(), String> {
    let window = web_sys::window().ok_or("no window".to_string())?;
    let cb = Closure::once_into_js(f);
    let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), delay)
        .map(|_| ())
        .map_err(|_| "set_timeout() threw".to_string())
}
