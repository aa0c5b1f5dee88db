//! Pixel-space cropping.
//!
//! The crop rectangle is `cropX, cropY, cropWidth, cropHeight` in pixels of
//! the incoming surface. Fractional values truncate. The output is always
//! exactly `cropWidth x cropHeight`; any part of the rectangle lying outside
//! the source comes out transparent black. A size too large to allocate
//! yields an empty surface.
//!
//! # Example
//!
//! ```
//! use photopop_core::{keys, Configuration, Crop, Modifier, Surface};
//!
//! let image = Surface::new(100, 100);
//! let conf = Configuration::from([(keys::CROP_WIDTH, 10.0), (keys::CROP_HEIGHT, 50.0)]);
//!
//! let mut crop = Crop::new();
//! let cropped = crop.modify(&image, &conf);
//! assert_eq!((cropped.width(), cropped.height()), (10, 50));
//! ```

use super::Modifier;
use crate::config::{keys, Configuration};
use crate::surface::Surface;

const CROP_KEYS: [&str; 4] = [
    keys::CROP_X,
    keys::CROP_Y,
    keys::CROP_WIDTH,
    keys::CROP_HEIGHT,
];

/// Modifier that extracts a sub-rectangle of the surface.
///
/// Active only when both `cropWidth` and `cropHeight` are positive.
#[derive(Debug, Default)]
pub struct Crop {
    scratch: Surface,
}

impl Crop {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Modifier for Crop {
    fn set_default_conf(&self, conf: &mut Configuration) {
        for key in CROP_KEYS {
            conf.insert(key, 0.0);
        }
    }

    fn set_conf_value(&self, conf: &mut Configuration, key: &str, value: f64) {
        if CROP_KEYS.iter().any(|k| *k == key) {
            conf.insert(key, value.max(0.0));
        }
    }

    fn test(&self, conf: &Configuration) -> bool {
        conf.value(keys::CROP_WIDTH) > 0.0 && conf.value(keys::CROP_HEIGHT) > 0.0
    }

    fn modify<'a>(&'a mut self, source: &'a Surface, conf: &Configuration) -> &'a Surface {
        if !self.test(conf) {
            return source;
        }

        let x = conf.value(keys::CROP_X) as i64;
        let y = conf.value(keys::CROP_Y) as i64;
        let width = conf.value(keys::CROP_WIDTH) as u32;
        let height = conf.value(keys::CROP_HEIGHT) as u32;

        if self.scratch.try_reset(width, height).is_ok() {
            self.scratch.copy_region_from(source, x, y);
        }
        &self.scratch
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for generating surface dimensions (keep reasonable for speed).
    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=60, 1u32..=60)
    }

    /// Strategy for generating crop rectangles, including negative inputs.
    fn crop_strategy() -> impl Strategy<Value = (f64, f64, f64, f64)> {
        (-20.0f64..80.0, -20.0f64..80.0, -20.0f64..80.0, -20.0f64..80.0)
    }

    proptest! {
        /// Property: test passes exactly when both extents are positive.
        #[test]
        fn prop_test_matches_extents(
            (x, y, w, h) in crop_strategy(),
        ) {
            let crop = Crop::new();
            let mut conf = Configuration::new();
            crop.set_conf_value(&mut conf, keys::CROP_X, x);
            crop.set_conf_value(&mut conf, keys::CROP_Y, y);
            crop.set_conf_value(&mut conf, keys::CROP_WIDTH, w);
            crop.set_conf_value(&mut conf, keys::CROP_HEIGHT, h);

            prop_assert_eq!(crop.test(&conf), w > 0.0 && h > 0.0);
            for key in CROP_KEYS {
                prop_assert!(conf.value(key) >= 0.0);
            }
        }

        /// Property: output is exactly the truncated crop size.
        #[test]
        fn prop_output_size_matches_request(
            (width, height) in dimensions_strategy(),
            (x, y, w, h) in crop_strategy(),
        ) {
            let mut crop = Crop::new();
            let src = Surface::new(width, height);
            let mut conf = Configuration::new();
            crop.set_conf_value(&mut conf, keys::CROP_X, x);
            crop.set_conf_value(&mut conf, keys::CROP_Y, y);
            crop.set_conf_value(&mut conf, keys::CROP_WIDTH, w);
            crop.set_conf_value(&mut conf, keys::CROP_HEIGHT, h);

            let active = crop.test(&conf);
            let out = crop.modify(&src, &conf);
            if active {
                prop_assert_eq!(out.width(), w as u32);
                prop_assert_eq!(out.height(), h as u32);
                prop_assert_eq!(out.pixels().len(), out.pixel_count() * 4);
            } else {
                prop_assert!(std::ptr::eq(out, &src));
            }
        }
    }
}
