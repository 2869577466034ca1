// Trunk entrypoint. Does nothing unless built for wasm32 with `--features web`.

fn main() {}

#[cfg(all(feature = "web", target_arch = "wasm32"))]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_start() {
    storefront_web::start();
}
