//! Per-pixel color effects and the modifier that runs them.
//!
//! A [`PixelCompositor`] holds an ordered list of [`PixelEffect`]s. When any
//! effect is active it walks the source surface once in row-major order,
//! folding each pixel through every active effect in registration order:
//!
//! ```text
//! val = pixel
//! for fx in active_effects: val = fx.apply(val, conf)
//! out[x, y] = clamp(val)
//! ```
//!
//! Intermediate values are rounded after every effect but only clamped to
//! 0-255 when stored, so one effect can push a channel past white and the
//! next can pull it back.

mod effects;

pub use effects::{Contrast, Exposure, Saturation};

use crate::config::Configuration;
use crate::modifier::Modifier;
use crate::surface::{Surface, BYTES_PER_PIXEL};
use crate::PixelColor;

/// A per-pixel color transform contributing to a [`PixelCompositor`].
///
/// Effects own one or more configuration keys, clamp them on write and read
/// them in [`apply`](PixelEffect::apply). They hold no mutable state.
pub trait PixelEffect {
    /// Write this effect's keys with their default values.
    fn set_default_conf(&self, conf: &mut Configuration);

    /// Store `value` under `key` if this effect owns `key`, clamped to its
    /// range. Other keys are ignored.
    fn set_conf_value(&self, conf: &mut Configuration, key: &str, value: f64);

    /// Whether this effect changes pixels under `conf`.
    fn test(&self, conf: &Configuration) -> bool;

    /// Transform one pixel.
    fn apply(&self, color: PixelColor, conf: &Configuration) -> PixelColor;
}

/// Modifier that applies a chain of [`PixelEffect`]s to every pixel.
///
/// Holds one scratch surface reused across calls; the surface returned by
/// [`modify`](Modifier::modify) is only valid until the next call.
pub struct PixelCompositor {
    effects: Vec<Box<dyn PixelEffect>>,
    scratch: Surface,
}

impl Default for PixelCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelCompositor {
    /// Create a compositor with the default effects: exposure, contrast,
    /// saturation.
    pub fn new() -> Self {
        let mut compositor = Self::empty();
        compositor.default_effects();
        compositor
    }

    /// Create a compositor with no effects.
    pub fn empty() -> Self {
        Self {
            effects: Vec::new(),
            scratch: Surface::default(),
        }
    }

    /// Append the default effects.
    pub fn default_effects(&mut self) {
        self.add_effect(Box::new(Exposure));
        self.add_effect(Box::new(Contrast));
        self.add_effect(Box::new(Saturation));
    }

    /// Append an effect to the end of the chain.
    ///
    /// Its keys are not written until the next `set_default_conf`, which
    /// happens when the compositor is added to a pipeline.
    pub fn add_effect(&mut self, effect: Box<dyn PixelEffect>) {
        self.effects.push(effect);
    }

    /// Remove every effect.
    pub fn clear_effects(&mut self) {
        self.effects.clear();
    }

    pub fn effects(&self) -> &[Box<dyn PixelEffect>] {
        &self.effects
    }

    /// Effects whose `test` passes under `conf`, in registration order.
    pub fn active_effects(&self, conf: &Configuration) -> Vec<&dyn PixelEffect> {
        self.effects
            .iter()
            .map(|fx| fx.as_ref())
            .filter(|fx| fx.test(conf))
            .collect()
    }
}

impl Modifier for PixelCompositor {
    fn set_default_conf(&self, conf: &mut Configuration) {
        for fx in &self.effects {
            fx.set_default_conf(conf);
        }
    }

    fn set_conf_value(&self, conf: &mut Configuration, key: &str, value: f64) {
        for fx in &self.effects {
            fx.set_conf_value(conf, key, value);
        }
    }

    fn test(&self, conf: &Configuration) -> bool {
        self.effects.iter().any(|fx| fx.test(conf))
    }

    fn modify<'a>(&'a mut self, source: &'a Surface, conf: &Configuration) -> &'a Surface {
        if !self.test(conf) {
            return source;
        }

        let active = self
            .effects
            .iter()
            .map(|fx| fx.as_ref())
            .filter(|fx| fx.test(conf))
            .collect::<Vec<_>>();

        self.scratch.reset(source.width(), source.height());

        for (src, dst) in source
            .pixels()
            .chunks_exact(BYTES_PER_PIXEL)
            .zip(self.scratch.pixels_mut().chunks_exact_mut(BYTES_PER_PIXEL))
        {
            let mut val = PixelColor::from_rgba(src);
            for fx in &active {
                val = fx.apply(val, conf);
            }
            dst.copy_from_slice(&val.to_rgba());
        }

        &self.scratch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::keys;

    /// Effect that halves alpha, used to check chain order and extension.
    struct HalveAlpha;

    impl PixelEffect for HalveAlpha {
        fn set_default_conf(&self, conf: &mut Configuration) {
            conf.insert("halveAlpha", 0.0);
        }

        fn set_conf_value(&self, conf: &mut Configuration, key: &str, value: f64) {
            if key == "halveAlpha" {
                conf.insert_clamped(key, value, 0.0, 1.0);
            }
        }

        fn test(&self, conf: &Configuration) -> bool {
            conf.value("halveAlpha") != 0.0
        }

        fn apply(&self, color: PixelColor, _conf: &Configuration) -> PixelColor {
            PixelColor::new(color.r, color.g, color.b, color.a / 2)
        }
    }

    fn gray_surface(width: u32, height: u32) -> Surface {
        Surface::filled(width, height, PixelColor::new(128, 128, 128, 255))
    }

    fn defaults() -> Configuration {
        let mut conf = Configuration::new();
        PixelCompositor::new().set_default_conf(&mut conf);
        conf
    }

    #[test]
    fn test_default_effects_registered_in_order() {
        let compositor = PixelCompositor::new();
        assert_eq!(compositor.effects().len(), 3);

        let conf = Configuration::from([(keys::EXPOSURE, 1.0), (keys::SATURATION, 1.0)]);
        let active = compositor.active_effects(&conf);
        assert_eq!(active.len(), 2);
    }

    #[test]
    fn test_set_default_conf_fans_out() {
        let conf = defaults();
        assert_eq!(conf.get(keys::EXPOSURE), Some(0.0));
        assert_eq!(conf.get(keys::CONTRAST), Some(0.0));
        assert_eq!(conf.get(keys::SATURATION), Some(0.0));
        assert_eq!(conf.len(), 3);
    }

    #[test]
    fn test_set_conf_value_fans_out_and_clamps() {
        let compositor = PixelCompositor::new();
        let mut conf = Configuration::new();
        compositor.set_conf_value(&mut conf, keys::CONTRAST, 250.0);
        compositor.set_conf_value(&mut conf, keys::SATURATION, -250.0);
        compositor.set_conf_value(&mut conf, keys::SCALE, 0.5);
        assert_eq!(conf.get(keys::CONTRAST), Some(100.0));
        assert_eq!(conf.get(keys::SATURATION), Some(-100.0));
        assert!(!conf.contains_key(keys::SCALE), "scale is not a pixel key");
    }

    #[test]
    fn test_test_is_or_over_effects() {
        let compositor = PixelCompositor::new();
        assert!(!compositor.test(&Configuration::new()));
        assert!(!compositor.test(&defaults()));
        for key in [keys::EXPOSURE, keys::CONTRAST, keys::SATURATION] {
            let conf = Configuration::from([(key, 5.0)]);
            assert!(compositor.test(&conf), "{key} alone should activate");
        }
    }

    #[test]
    fn test_empty_compositor_never_active() {
        let compositor = PixelCompositor::empty();
        let conf = Configuration::from([(keys::EXPOSURE, 50.0)]);
        assert!(!compositor.test(&conf));
        assert!(compositor.active_effects(&conf).is_empty());
    }

    #[test]
    fn test_modify_inactive_returns_source() {
        let mut compositor = PixelCompositor::new();
        let source = gray_surface(4, 4);
        let out = compositor.modify(&source, &defaults());
        assert!(std::ptr::eq(out, &source));
    }

    #[test]
    fn test_modify_applies_chain_in_order() {
        let mut compositor = PixelCompositor::new();
        let source = gray_surface(3, 2);
        let conf = Configuration::from([
            (keys::EXPOSURE, 50.0),
            (keys::CONTRAST, 50.0),
            (keys::SATURATION, 50.0),
        ]);
        let out = compositor.modify(&source, &conf);

        assert!(!std::ptr::eq(out, &source));
        assert_eq!((out.width(), out.height()), (3, 2));
        for chunk in out.pixels().chunks_exact(4) {
            assert_eq!(chunk, &[221, 221, 221, 255]);
        }
    }

    #[test]
    fn test_modify_clamps_on_store() {
        let mut compositor = PixelCompositor::new();
        let source = gray_surface(1, 1);
        let conf = Configuration::from([(keys::EXPOSURE, 100.0)]);
        let out = compositor.modify(&source, &conf);
        assert_eq!(out.pixels(), &[255, 255, 255, 255]);
    }

    #[test]
    fn test_chain_sees_unclamped_intermediate() {
        // Exposure pushes to 328; contrast then sees v = 255 - 328 = -73 and
        // with amount 50 adds 36.5, still above white.
        let mut compositor = PixelCompositor::new();
        let source = gray_surface(1, 1);
        let conf = Configuration::from([(keys::EXPOSURE, 100.0), (keys::CONTRAST, 100.0)]);
        let out = compositor.modify(&source, &conf);
        assert_eq!(out.pixels(), &[255, 255, 255, 255]);
    }

    #[test]
    fn test_modify_reuses_scratch_between_sizes() {
        let mut compositor = PixelCompositor::new();
        let conf = Configuration::from([(keys::EXPOSURE, -10.0)]);

        let big = gray_surface(8, 8);
        assert_eq!(compositor.modify(&big, &conf).pixel_count(), 64);

        let small = gray_surface(2, 1);
        let out = compositor.modify(&small, &conf);
        assert_eq!((out.width(), out.height()), (2, 1));
        assert_eq!(out.pixels(), &[108, 108, 108, 255, 108, 108, 108, 255]);
    }

    #[test]
    fn test_custom_effect_extension() {
        let mut compositor = PixelCompositor::empty();
        compositor.add_effect(Box::new(HalveAlpha));

        let mut conf = Configuration::new();
        compositor.set_default_conf(&mut conf);
        assert_eq!(conf.get("halveAlpha"), Some(0.0));
        assert!(!compositor.test(&conf));

        compositor.set_conf_value(&mut conf, "halveAlpha", 7.0);
        assert_eq!(conf.get("halveAlpha"), Some(1.0));

        let source = gray_surface(1, 1);
        let out = compositor.modify(&source, &conf);
        assert_eq!(out.pixels(), &[128, 128, 128, 127]);
    }

    #[test]
    fn test_clear_effects() {
        let mut compositor = PixelCompositor::new();
        compositor.clear_effects();
        assert!(compositor.effects().is_empty());
        compositor.default_effects();
        assert_eq!(compositor.effects().len(), 3);
    }

    #[test]
    fn test_row_major_position_preserved() {
        let pixels = vec![
            10, 0, 0, 255, 20, 0, 0, 255, //
            30, 0, 0, 255, 40, 0, 0, 255,
        ];
        let source = Surface::from_rgba(2, 2, pixels).unwrap();
        let mut compositor = PixelCompositor::new();
        let conf = Configuration::from([(keys::EXPOSURE, -1.0)]);
        let out = compositor.modify(&source, &conf);
        let reds: Vec<u8> = out.pixels().chunks_exact(4).map(|p| p[0]).collect();
        assert_eq!(reds, vec![8, 18, 28, 38]);
    }
}
