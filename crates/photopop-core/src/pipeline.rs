//! The modifier pipeline.
//!
//! A [`Pipeline`] owns an ordered list of modifiers and the canonical
//! [`Configuration`]. Rendering merges a partial configuration and then
//! folds the source surface through every modifier whose `test` passes:
//!
//! ```text
//! surface = modifier.test(conf) ? modifier.modify(surface, conf) : surface
//! ```
//!
//! # Example
//!
//! ```
//! use photopop_core::{keys, Configuration, Pipeline, Surface};
//!
//! let mut pipeline = Pipeline::new();
//! let image = Surface::new(100, 100);
//!
//! let partial = Configuration::from([(keys::SCALE, 0.5), (keys::EXPOSURE, 25.0)]);
//! let rendered = pipeline.render(&image, Some(&partial));
//! assert_eq!((rendered.width(), rendered.height()), (50, 50));
//! ```

use crate::config::Configuration;
use crate::modifier::{Crop, Modifier, Rotate, Scale};
use crate::pixel::PixelCompositor;
use crate::surface::Surface;

/// Ordered list of modifiers plus the configuration that drives them.
pub struct Pipeline {
    modifiers: Vec<Box<dyn Modifier>>,
    conf: Configuration,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Create a pipeline with the default modifiers: scale, pixel effects,
    /// rotate, crop.
    pub fn new() -> Self {
        let mut pipeline = Self::empty();
        pipeline.default_modifiers();
        pipeline
    }

    /// Create a pipeline with no modifiers and an empty configuration.
    pub fn empty() -> Self {
        Self {
            modifiers: Vec::new(),
            conf: Configuration::new(),
        }
    }

    /// Apply an initial partial configuration.
    pub fn with_conf(mut self, partial: &Configuration) -> Self {
        self.set_conf(Some(partial));
        self
    }

    /// Append the default modifiers.
    pub fn default_modifiers(&mut self) {
        self.add_modifier(Box::new(Scale::new()));
        self.add_modifier(Box::new(PixelCompositor::new()));
        self.add_modifier(Box::new(Rotate::new()));
        self.add_modifier(Box::new(Crop::new()));
    }

    /// Append a modifier and write its default configuration values.
    pub fn add_modifier(&mut self, modifier: Box<dyn Modifier>) {
        modifier.set_default_conf(&mut self.conf);
        self.modifiers.push(modifier);
    }

    /// Remove every modifier and clear the configuration.
    pub fn clear_modifiers(&mut self) {
        self.modifiers.clear();
        self.conf.clear();
    }

    pub fn modifiers(&self) -> &[Box<dyn Modifier>] {
        &self.modifiers
    }

    /// The canonical configuration.
    pub fn conf(&self) -> &Configuration {
        &self.conf
    }

    /// Merge `partial` into the configuration.
    ///
    /// Every key is offered to every modifier in order; each one stores the
    /// keys it owns, clamped to range, and ignores the rest. `None` is the
    /// same as an empty mapping.
    pub fn set_conf(&mut self, partial: Option<&Configuration>) {
        let Some(partial) = partial else {
            return;
        };
        for (key, value) in partial.iter() {
            for modifier in &self.modifiers {
                modifier.set_conf_value(&mut self.conf, key, value);
            }
        }
    }

    /// Merge `partial` and run `source` through every active modifier.
    ///
    /// The result is `source` itself when no modifier is active, otherwise a
    /// scratch surface owned by the last active modifier. It borrows the
    /// pipeline, so it must be dropped (or copied) before the next render.
    pub fn render<'a>(
        &'a mut self,
        source: &'a Surface,
        partial: Option<&Configuration>,
    ) -> &'a Surface {
        self.set_conf(partial);

        let conf = &self.conf;
        let mut current = source;
        for modifier in self.modifiers.iter_mut() {
            if modifier.test(conf) {
                current = modifier.modify(current, conf);
            }
        }
        current
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::config::keys;
    use proptest::prelude::*;

    fn pixels_strategy() -> impl Strategy<Value = (u32, u32, Vec<u8>)> {
        (1u32..=12, 1u32..=12).prop_flat_map(|(w, h)| {
            (
                Just(w),
                Just(h),
                prop::collection::vec(any::<u8>(), (w * h * 4) as usize),
            )
        })
    }

    proptest! {
        /// Property: clamped scale is always in range and idempotent.
        #[test]
        fn prop_scale_clamp_idempotent(value in -10.0f64..10.0) {
            let mut pipeline = Pipeline::new();
            pipeline.set_conf(Some(&Configuration::from([(keys::SCALE, value)])));
            let stored = pipeline.conf().value(keys::SCALE);
            prop_assert!((0.1..=2.0).contains(&stored));

            pipeline.set_conf(Some(&Configuration::from([(keys::SCALE, stored)])));
            prop_assert_eq!(pipeline.conf().value(keys::SCALE), stored);
        }

        /// Property: for positive scale, the modifier runs iff scale != 1.
        #[test]
        fn prop_scale_test_law(value in -5.0f64..5.0) {
            let conf = Configuration::from([(keys::SCALE, value)]);
            let expected = value > 0.0 && value != 1.0;
            prop_assert_eq!(Scale::new().test(&conf), expected);
        }

        /// Property: rotate runs for every angle strictly inside (-180, 180)
        /// except zero.
        #[test]
        fn prop_rotate_test_law(angle in -179.999f64..179.999) {
            let conf = Configuration::from([(keys::ROTATE, angle)]);
            prop_assert_eq!(Rotate::new().test(&conf), angle != 0.0);
        }

        /// Property: the compositor is active iff any single effect is.
        #[test]
        fn prop_compositor_or_law(
            exposure in prop::sample::select(vec![0.0, -30.0, 45.0]),
            contrast in prop::sample::select(vec![0.0, 10.0]),
            saturation in prop::sample::select(vec![0.0, -100.0]),
        ) {
            use crate::pixel::{Contrast, Exposure, PixelEffect, Saturation};
            let conf = Configuration::from([
                (keys::EXPOSURE, exposure),
                (keys::CONTRAST, contrast),
                (keys::SATURATION, saturation),
            ]);
            let any = Exposure.test(&conf) || Contrast.test(&conf) || Saturation.test(&conf);
            prop_assert_eq!(PixelCompositor::new().test(&conf), any);
        }

        /// Property: with every modifier inactive the output equals the input.
        #[test]
        fn prop_identity_law((w, h, pixels) in pixels_strategy()) {
            let source = Surface::from_rgba(w, h, pixels).unwrap();
            let expected = source.clone();
            let mut pipeline = Pipeline::new();
            let out = pipeline.render(&source, None);
            prop_assert_eq!(out, &expected);
        }
    }
}
