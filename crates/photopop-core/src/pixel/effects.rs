//! The built-in per-pixel effects.
//!
//! Each effect owns one configuration key in the range -100 to 100 and is a
//! no-op at 0. All three touch only r, g and b; alpha passes through.

use super::PixelEffect;
use crate::config::{keys, Configuration};
use crate::PixelColor;

const MIN: f64 = -100.0;
const MAX: f64 = 100.0;

/// Brighten or darken by shifting every channel.
///
/// Formula: with `e = -2 * exposure`, each channel becomes
/// `max(channel - e, 0)` when `e < 0` and `min(channel - e, 255)` otherwise.
/// Only the bound in the direction of travel is enforced.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exposure;

impl PixelEffect for Exposure {
    fn set_default_conf(&self, conf: &mut Configuration) {
        conf.insert(keys::EXPOSURE, 0.0);
    }

    fn set_conf_value(&self, conf: &mut Configuration, key: &str, value: f64) {
        if key == keys::EXPOSURE {
            conf.insert_clamped(keys::EXPOSURE, value, MIN, MAX);
        }
    }

    fn test(&self, conf: &Configuration) -> bool {
        conf.value(keys::EXPOSURE) != 0.0
    }

    fn apply(&self, color: PixelColor, conf: &Configuration) -> PixelColor {
        let e = -2.0 * conf.value(keys::EXPOSURE);
        let shift = |channel: i32| {
            let v = channel as f64 - e;
            if e < 0.0 {
                v.max(0.0)
            } else {
                v.min(255.0)
            }
        };
        PixelColor::from_f64(
            shift(color.r),
            shift(color.g),
            shift(color.b),
            color.a as f64,
        )
    }
}

/// Shift every channel by an amount proportional to the pixel's headroom
/// below white.
///
/// Formula: `amount = contrast / 2`, `v = 255 - max(r, g, b)`, each channel
/// `-= (v / 100) * amount`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Contrast;

impl PixelEffect for Contrast {
    fn set_default_conf(&self, conf: &mut Configuration) {
        conf.insert(keys::CONTRAST, 0.0);
    }

    fn set_conf_value(&self, conf: &mut Configuration, key: &str, value: f64) {
        if key == keys::CONTRAST {
            conf.insert_clamped(keys::CONTRAST, value, MIN, MAX);
        }
    }

    fn test(&self, conf: &Configuration) -> bool {
        conf.value(keys::CONTRAST) != 0.0
    }

    fn apply(&self, color: PixelColor, conf: &Configuration) -> PixelColor {
        let amount = conf.value(keys::CONTRAST) / 2.0;
        let v = (255 - color.max_rgb()) as f64;
        let delta = (v / 100.0) * amount;
        PixelColor::from_f64(
            color.r as f64 - delta,
            color.g as f64 - delta,
            color.b as f64 - delta,
            color.a as f64,
        )
    }
}

/// Push channels away from (or toward) the brightest channel.
///
/// Formula: `sat = -saturation`, `v = max(r, g, b)`, each channel
/// `-= ((channel - v) / 100) * sat`. At -100 every channel collapses to `v`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Saturation;

impl PixelEffect for Saturation {
    fn set_default_conf(&self, conf: &mut Configuration) {
        conf.insert(keys::SATURATION, 0.0);
    }

    fn set_conf_value(&self, conf: &mut Configuration, key: &str, value: f64) {
        if key == keys::SATURATION {
            conf.insert_clamped(keys::SATURATION, value, MIN, MAX);
        }
    }

    fn test(&self, conf: &Configuration) -> bool {
        conf.value(keys::SATURATION) != 0.0
    }

    fn apply(&self, color: PixelColor, conf: &Configuration) -> PixelColor {
        let sat = -conf.value(keys::SATURATION);
        let v = color.max_rgb() as f64;
        let adjust = |channel: i32| {
            let c = channel as f64;
            c - ((c - v) / 100.0) * sat
        };
        PixelColor::from_f64(
            adjust(color.r),
            adjust(color.g),
            adjust(color.b),
            color.a as f64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conf(key: &str, value: f64) -> Configuration {
        Configuration::from([(key, value)])
    }

    const GRAY: PixelColor = PixelColor::new(128, 128, 128, 255);

    // ===== Exposure =====

    #[test]
    fn test_exposure_default_and_test() {
        let mut c = Configuration::new();
        assert!(!Exposure.test(&c), "missing exposure reads as 0");
        Exposure.set_default_conf(&mut c);
        assert_eq!(c.get(keys::EXPOSURE), Some(0.0));
        assert!(!Exposure.test(&c));
        assert!(Exposure.test(&conf(keys::EXPOSURE, 1.0)));
        assert!(Exposure.test(&conf(keys::EXPOSURE, -1.0)));
    }

    #[test]
    fn test_exposure_clamps_on_write() {
        let mut c = Configuration::new();
        Exposure.set_conf_value(&mut c, keys::EXPOSURE, -101.0);
        assert_eq!(c.get(keys::EXPOSURE), Some(-100.0));
        Exposure.set_conf_value(&mut c, keys::EXPOSURE, 101.0);
        assert_eq!(c.get(keys::EXPOSURE), Some(100.0));
    }

    #[test]
    fn test_exposure_ignores_other_keys() {
        let mut c = Configuration::new();
        Exposure.set_conf_value(&mut c, keys::CONTRAST, 50.0);
        assert!(c.is_empty());
    }

    #[test]
    fn test_exposure_positive_brightens_unbounded_above() {
        let out = Exposure.apply(GRAY, &conf(keys::EXPOSURE, 50.0));
        assert_eq!(out, PixelColor::new(228, 228, 228, 255));

        // Only the lower bound applies when brightening
        let out = Exposure.apply(GRAY, &conf(keys::EXPOSURE, 100.0));
        assert_eq!(out, PixelColor::new(328, 328, 328, 255));
    }

    #[test]
    fn test_exposure_negative_darkens() {
        let out = Exposure.apply(GRAY, &conf(keys::EXPOSURE, -50.0));
        assert_eq!(out, PixelColor::new(28, 28, 28, 255));

        // Only the upper bound applies when darkening
        let out = Exposure.apply(GRAY, &conf(keys::EXPOSURE, -100.0));
        assert_eq!(out, PixelColor::new(-72, -72, -72, 255));
    }

    #[test]
    fn test_exposure_clamps_overflow_in_direction() {
        let white = PixelColor::new(255, 250, 0, 10);
        let out = Exposure.apply(white, &conf(keys::EXPOSURE, -1.0));
        assert_eq!(out, PixelColor::new(253, 248, -2, 10));

        let negative = PixelColor::new(-300, 0, 0, 255);
        let out = Exposure.apply(negative, &conf(keys::EXPOSURE, 1.0));
        assert_eq!(out.r, 0);
    }

    // ===== Contrast =====

    #[test]
    fn test_contrast_clamps_on_write() {
        let mut c = Configuration::new();
        Contrast.set_conf_value(&mut c, keys::CONTRAST, 500.0);
        assert_eq!(c.get(keys::CONTRAST), Some(100.0));
    }

    #[test]
    fn test_contrast_positive() {
        // amount = 25, v = 255 - 128 = 127, delta = 31.75
        let out = Contrast.apply(GRAY, &conf(keys::CONTRAST, 50.0));
        assert_eq!(out, PixelColor::new(96, 96, 96, 255));
    }

    #[test]
    fn test_contrast_negative() {
        // amount = -50, v = 127, delta = -63.5, 128 + 63.5 = 191.5 -> 192
        let out = Contrast.apply(GRAY, &conf(keys::CONTRAST, -100.0));
        assert_eq!(out, PixelColor::new(192, 192, 192, 255));
    }

    #[test]
    fn test_contrast_leaves_white_alone() {
        let white = PixelColor::new(255, 255, 255, 255);
        assert_eq!(Contrast.apply(white, &conf(keys::CONTRAST, 100.0)), white);
    }

    // ===== Saturation =====

    #[test]
    fn test_saturation_clamps_on_write() {
        let mut c = Configuration::new();
        Saturation.set_conf_value(&mut c, keys::SATURATION, -1000.0);
        assert_eq!(c.get(keys::SATURATION), Some(-100.0));
    }

    #[test]
    fn test_saturation_gray_unchanged() {
        assert_eq!(Saturation.apply(GRAY, &conf(keys::SATURATION, 80.0)), GRAY);
    }

    #[test]
    fn test_full_desaturation_collapses_to_max() {
        let c = PixelColor::new(200, 100, 50, 255);
        let out = Saturation.apply(c, &conf(keys::SATURATION, -100.0));
        assert_eq!(out, PixelColor::new(200, 200, 200, 255));
    }

    #[test]
    fn test_saturation_boost() {
        // sat = -50, v = 200: g = 100 + (-100/100)*50 = 50, b = 50 - 75 = -25
        let c = PixelColor::new(200, 100, 50, 255);
        let out = Saturation.apply(c, &conf(keys::SATURATION, 50.0));
        assert_eq!(out, PixelColor::new(200, 50, -25, 255));
    }

    #[test]
    fn test_effects_preserve_alpha() {
        let c = PixelColor::new(10, 20, 30, 77);
        assert_eq!(Exposure.apply(c, &conf(keys::EXPOSURE, 10.0)).a, 77);
        assert_eq!(Contrast.apply(c, &conf(keys::CONTRAST, 10.0)).a, 77);
        assert_eq!(Saturation.apply(c, &conf(keys::SATURATION, 10.0)).a, 77);
    }
}
