//! Uniform scaling.
//!
//! Resampling uses the `image` crate's algorithms; the target size is the
//! source size times `scale`, truncated to whole pixels.

use image::{ImageBuffer, Rgba};

use super::Modifier;
use crate::config::{keys, Configuration};
use crate::surface::{FilterType, Surface};

const MIN_SCALE: f64 = 0.1;
const MAX_SCALE: f64 = 2.0;

/// Modifier that resizes the surface by the `scale` factor (0.1 to 2.0).
///
/// A scale of exactly 1 is a no-op and returns the input surface.
#[derive(Debug, Default)]
pub struct Scale {
    filter: FilterType,
    scratch: Surface,
}

impl Scale {
    /// Create a scale modifier using bilinear resampling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different resampling filter.
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn filter(&self) -> FilterType {
        self.filter
    }
}

/// Target dimensions for scaling `width x height` by `scale`.
fn scaled_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let w = (width as f64 * scale).floor() as u32;
    let h = (height as f64 * scale).floor() as u32;
    (w, h)
}

impl Modifier for Scale {
    fn set_default_conf(&self, conf: &mut Configuration) {
        conf.insert(keys::SCALE, 1.0);
    }

    fn set_conf_value(&self, conf: &mut Configuration, key: &str, value: f64) {
        if key == keys::SCALE {
            conf.insert_clamped(keys::SCALE, value, MIN_SCALE, MAX_SCALE);
        }
    }

    fn test(&self, conf: &Configuration) -> bool {
        let scale = conf.value(keys::SCALE);
        scale > 0.0 && scale != 1.0
    }

    fn modify<'a>(&'a mut self, source: &'a Surface, conf: &Configuration) -> &'a Surface {
        if !self.test(conf) {
            return source;
        }

        let (width, height) =
            scaled_dimensions(source.width(), source.height(), conf.value(keys::SCALE));

        if width == 0 || height == 0 {
            self.scratch.reset(width, height);
            return &self.scratch;
        }

        // Borrow the source bytes instead of copying them into an RgbaImage
        let Some(view) = ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(
            source.width(),
            source.height(),
            source.pixels(),
        ) else {
            self.scratch.reset(width, height);
            return &self.scratch;
        };

        let resized = image::imageops::resize(&view, width, height, self.filter.to_image_filter());
        self.scratch.reset(width, height);
        self.scratch.pixels_mut().copy_from_slice(resized.as_raw());
        &self.scratch
    }
}
