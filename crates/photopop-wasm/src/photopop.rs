//! The `JsPhotoPop` editor binding.
//!
//! Holds a base image, a pipeline and the last rendered output. Partial
//! configurations cross the boundary as plain JS objects such as
//! `{ exposure: 25, rotate: 90 }`; `null` and `undefined` mean "no change".

use photopop_core::{
    Configuration, Crop, Pipeline, PixelCompositor, Rotate, Scale, Surface, SurfaceError,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::histogram::{histogram_of, JsHistogram};
use crate::log;
use crate::types::{filter_from_u8, to_js_error, JsSurface};

/// Image editor for JavaScript.
///
/// # Example (TypeScript)
/// ```typescript
/// const editor = new JsPhotoPop({ saturation: -100 });
/// editor.with_img(width, height, rgba);
/// editor.draw({ cropWidth: 100, cropHeight: 100 });
/// const pixels = editor.pixels();
/// ```
#[wasm_bindgen]
pub struct JsPhotoPop {
    pipeline: Pipeline,
    source: Surface,
    output: Surface,
}

#[wasm_bindgen]
impl JsPhotoPop {
    /// Create an editor with the default modifiers and an optional initial
    /// partial configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(conf: JsValue) -> Result<JsPhotoPop, JsValue> {
        let conf = conf_from_js(conf)?;
        Ok(Self::with_conf(conf.as_ref()))
    }

    /// Set the base image from RGBA bytes. The output is reset to a copy of
    /// the base image until the next `draw`.
    pub fn with_img(&mut self, width: u32, height: u32, pixels: Vec<u8>) -> Result<(), JsValue> {
        self.load(width, height, pixels).map_err(to_js_error)
    }

    /// Set the base image from a surface already in WASM memory.
    pub fn with_surface(&mut self, surface: &JsSurface) {
        self.set_source(surface.surface().clone());
    }

    /// Merge a partial configuration without drawing.
    pub fn set_conf(&mut self, conf: JsValue) -> Result<(), JsValue> {
        let conf = conf_from_js(conf)?;
        self.pipeline.set_conf(conf.as_ref());
        Ok(())
    }

    /// Merge a partial configuration and render the base image.
    pub fn draw(&mut self, conf: JsValue) -> Result<(), JsValue> {
        let conf = conf_from_js(conf)?;
        self.render(conf.as_ref());
        Ok(())
    }

    /// The canonical configuration as a plain JS object.
    pub fn conf(&self) -> Result<JsValue, JsValue> {
        self.pipeline
            .conf()
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Rendered width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.output.width()
    }

    /// Rendered height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.output.height()
    }

    /// Rendered RGBA pixels as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.output.pixels().to_vec()
    }

    /// Rendered RGBA pixels as a Uint8ClampedArray, ready for `new ImageData`.
    pub fn image_data(&self) -> js_sys::Uint8ClampedArray {
        js_sys::Uint8ClampedArray::from(self.output.pixels())
    }

    /// Rendered output as a surface handle.
    pub fn output(&self) -> JsSurface {
        JsSurface::from_surface(self.output.clone())
    }

    /// Histogram of the rendered output.
    pub fn histogram(&self) -> JsHistogram {
        histogram_of(&self.output)
    }

    /// Remove every modifier and clear the configuration.
    pub fn clear_modifiers(&mut self) {
        self.pipeline.clear_modifiers();
    }

    /// Append the default modifiers (scale, pixel effects, rotate, crop).
    pub fn default_modifiers(&mut self) {
        self.pipeline.default_modifiers();
    }

    /// Rebuild the default modifiers with a different resampling filter for
    /// scale and rotate (0 = nearest, 1 = bilinear, 2 = Lanczos3). The current
    /// configuration is kept.
    pub fn set_filter(&mut self, filter: u8) {
        let filter = filter_from_u8(filter);
        let conf = self.pipeline.conf().clone();

        self.pipeline.clear_modifiers();
        self.pipeline.add_modifier(Box::new(Scale::new().with_filter(filter)));
        self.pipeline.add_modifier(Box::new(PixelCompositor::new()));
        self.pipeline.add_modifier(Box::new(Rotate::new().with_filter(filter)));
        self.pipeline.add_modifier(Box::new(Crop::new()));
        self.pipeline.set_conf(Some(&conf));
    }
}

impl JsPhotoPop {
    pub(crate) fn with_conf(conf: Option<&Configuration>) -> Self {
        let mut pipeline = Pipeline::new();
        pipeline.set_conf(conf);
        Self {
            pipeline,
            source: Surface::default(),
            output: Surface::default(),
        }
    }

    pub(crate) fn load(
        &mut self,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<(), SurfaceError> {
        let surface = Surface::from_rgba(width, height, pixels)?;
        self.set_source(surface);
        Ok(())
    }

    fn set_source(&mut self, surface: Surface) {
        log::debug(&format!("base image {}x{}", surface.width(), surface.height()));
        self.output = surface.clone();
        self.source = surface;
    }

    pub(crate) fn render(&mut self, conf: Option<&Configuration>) {
        let start = log::now();
        let rendered = self.pipeline.render(&self.source, conf);
        self.output.clone_from(rendered);
        log::debug(&format!(
            "drew {}x{} -> {}x{} in {:.1}ms",
            self.source.width(),
            self.source.height(),
            self.output.width(),
            self.output.height(),
            log::now() - start
        ));
    }

    pub(crate) fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

/// Read an optional partial configuration from JS.
fn conf_from_js(value: JsValue) -> Result<Option<Configuration>, JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(value)
        .map(Some)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
