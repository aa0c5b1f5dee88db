//! PhotoPop WASM - WebAssembly bindings for PhotoPop
//!
//! This crate exposes the photopop-core pipeline to JavaScript/TypeScript
//! applications running in a browser.
//!
//! # Module Structure
//!
//! - `photopop` - The `JsPhotoPop` editor: base image, configuration, draw
//! - `histogram` - Histogram bindings for rendered or raw RGBA pixels
//! - `types` - WASM-compatible wrapper types for surfaces
//! - `log` - Debug output to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsPhotoPop } from '@photopop/wasm';
//!
//! await init();
//!
//! const editor = new JsPhotoPop({ exposure: 25, contrast: 25, scale: 0.5 });
//! editor.with_img(imageData.width, imageData.height, imageData.data);
//! editor.draw({ rotate: 90 });
//!
//! const out = new ImageData(editor.image_data(), editor.width, editor.height);
//! ctx.putImageData(out, 0, 0);
//! ```

use wasm_bindgen::prelude::*;

mod histogram;
mod log;
mod photopop;
mod types;

pub use histogram::{compute_histogram, surface_histogram, JsHistogram};
pub use photopop::JsPhotoPop;
pub use types::JsSurface;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    log::debug(&format!("photopop-wasm {} loaded", version()));
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
