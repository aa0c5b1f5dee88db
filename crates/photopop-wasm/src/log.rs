//! Debug logging to the browser console.
//!
//! On non-wasm targets these calls compile to nothing, so native tests never
//! reach a JS import.

#[cfg(target_arch = "wasm32")]
pub(crate) fn debug(message: &str) {
    web_sys::console::debug_1(&wasm_bindgen::JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn debug(_message: &str) {}

/// Milliseconds since the epoch, for render timings.
#[cfg(target_arch = "wasm32")]
pub(crate) fn now() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn now() -> f64 {
    0.0
}
