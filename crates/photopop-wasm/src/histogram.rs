//! Histogram computation WASM bindings.
//!
//! Rendered pixels are streamed into a core `Histogram`; these bindings let
//! JavaScript read the bins back without re-walking the image.

use photopop_core::{Histogram, Surface};
use wasm_bindgen::prelude::*;

use crate::types::{to_js_error, JsSurface};

/// Channel counts for a rendered image, handed to JavaScript for drawing.
///
/// Bin arrays are copied out on every call (`Uint32Array`, 256 entries), so
/// read each one once per frame.
#[wasm_bindgen]
pub struct JsHistogram {
    inner: Histogram,
}

#[wasm_bindgen]
impl JsHistogram {
    pub fn red(&self) -> Vec<u32> {
        self.inner.red.to_vec()
    }

    pub fn green(&self) -> Vec<u32> {
        self.inner.green.to_vec()
    }

    pub fn blue(&self) -> Vec<u32> {
        self.inner.blue.to_vec()
    }

    /// BT.709 luma bins.
    pub fn luminance(&self) -> Vec<u32> {
        self.inner.luminance.to_vec()
    }

    /// Number of pixels counted.
    #[wasm_bindgen(getter)]
    pub fn total(&self) -> f64 {
        self.inner.total() as f64
    }

    /// Tallest red, green or blue bin; divide by this to scale the plot.
    #[wasm_bindgen(getter)]
    pub fn max_value(&self) -> u32 {
        self.inner.max_value()
    }

    #[wasm_bindgen(getter)]
    pub fn has_highlight_clipping(&self) -> bool {
        self.inner.has_highlight_clipping()
    }

    #[wasm_bindgen(getter)]
    pub fn has_shadow_clipping(&self) -> bool {
        self.inner.has_shadow_clipping()
    }
}

impl From<Histogram> for JsHistogram {
    fn from(inner: Histogram) -> Self {
        Self { inner }
    }
}

pub(crate) fn histogram_of(surface: &Surface) -> JsHistogram {
    photopop_core::compute_histogram(surface).into()
}

/// Compute histogram from RGBA pixel data.
///
/// Alpha is ignored; every pixel counts once.
///
/// # Example (TypeScript)
/// ```typescript
/// const hist = compute_histogram(imageData.data, imageData.width, imageData.height);
/// const redBins = hist.red();        // Uint32Array[256]
/// const max = hist.max_value;        // For normalization
/// hist.free();
/// ```
#[wasm_bindgen]
pub fn compute_histogram(rgba: Vec<u8>, width: u32, height: u32) -> Result<JsHistogram, JsValue> {
    let surface = Surface::from_rgba(width, height, rgba).map_err(to_js_error)?;
    Ok(histogram_of(&surface))
}

/// Compute histogram for a surface already living in WASM memory.
#[wasm_bindgen]
pub fn surface_histogram(surface: &JsSurface) -> JsHistogram {
    histogram_of(surface.surface())
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_compute_histogram_rejects_bad_length() {
        assert!(compute_histogram(vec![0; 5], 1, 1).is_err());
    }

    #[wasm_bindgen_test]
    fn test_compute_histogram() {
        let hist = compute_histogram(vec![0, 0, 0, 255], 1, 1).unwrap();
        assert_eq!(hist.luminance()[0], 1);
    }
}
