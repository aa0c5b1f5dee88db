//! WASM-compatible wrapper types for surfaces.

use photopop_core::{FilterType, Surface, SurfaceError};
use wasm_bindgen::prelude::*;

/// An RGBA surface wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is
/// made to JavaScript memory as a `Uint8Array`.
#[wasm_bindgen]
pub struct JsSurface {
    inner: Surface,
}

#[wasm_bindgen]
impl JsSurface {
    /// Create a surface from dimensions and RGBA pixel data.
    ///
    /// # Arguments
    /// * `width` - Surface width in pixels
    /// * `height` - Surface height in pixels
    /// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsSurface, JsValue> {
        Surface::from_rgba(width, height, pixels)
            .map(Self::from_surface)
            .map_err(to_js_error)
    }

    /// Get the surface width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Get the surface height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels().len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels().to_vec()
    }
}

impl JsSurface {
    pub(crate) fn from_surface(inner: Surface) -> Self {
        Self { inner }
    }

    pub(crate) fn surface(&self) -> &Surface {
        &self.inner
    }
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest (fastest, lowest quality)
/// - 1 = Bilinear (good balance of speed and quality)
/// - 2 = Lanczos3 (best quality, slowest)
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear,
    }
}

pub(crate) fn to_js_error(err: SurfaceError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
