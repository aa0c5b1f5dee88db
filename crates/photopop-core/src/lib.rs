//! PhotoPop Core - Image editing pipeline
//!
//! This crate provides a configurable sequence of transform stages applied
//! to an RGBA [`Surface`], driven by a single flat [`Configuration`]:
//! scaling, per-pixel color effects, rotation and cropping.
//!
//! # Pipeline Order
//!
//! The default [`Pipeline`] applies modifiers in this order:
//! 1. Scale
//! 2. Pixel effects (exposure, contrast, saturation)
//! 3. Rotate
//! 4. Crop
//!
//! Every modifier checks the configuration first and passes the surface
//! through untouched when it has nothing to do.

pub mod config;
pub mod histogram;
pub mod modifier;
pub mod pipeline;
pub mod pixel;
pub mod surface;

pub use config::{keys, Configuration};
pub use histogram::{compute_histogram, stream_pixels, PixelSink};
pub use modifier::{rotated_bounds, Crop, Modifier, Rotate, RotatedBounds, Scale};
pub use pipeline::Pipeline;
pub use pixel::{Contrast, Exposure, PixelCompositor, PixelEffect, Saturation};
pub use surface::{FilterType, Surface, SurfaceError};

use serde::{Deserialize, Serialize};
use surface::round_half_up;

/// A single RGBA color.
///
/// Channels are stored as `i32` so that a chain of effects can carry values
/// outside 0-255 from one effect to the next. Values are clamped only when
/// written back to a [`Surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelColor {
    pub r: i32,
    pub g: i32,
    pub b: i32,
    pub a: i32,
}

impl PixelColor {
    pub const fn new(r: i32, g: i32, b: i32, a: i32) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from real-valued channels, rounding each to the nearest
    /// integer.
    pub fn from_f64(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: round_half_up(r) as i32,
            g: round_half_up(g) as i32,
            b: round_half_up(b) as i32,
            a: round_half_up(a) as i32,
        }
    }

    /// Read a color from the first four bytes of an RGBA slice.
    #[inline]
    pub fn from_rgba(bytes: &[u8]) -> Self {
        Self {
            r: bytes[0] as i32,
            g: bytes[1] as i32,
            b: bytes[2] as i32,
            a: bytes[3] as i32,
        }
    }

    /// Clamp each channel to 0-255 for storage.
    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [
            self.r.clamp(0, 255) as u8,
            self.g.clamp(0, 255) as u8,
            self.b.clamp(0, 255) as u8,
            self.a.clamp(0, 255) as u8,
        ]
    }

    /// Largest of the r, g and b channels.
    #[inline]
    pub fn max_rgb(self) -> i32 {
        self.r.max(self.g).max(self.b)
    }
}

/// Per-channel counts collected from a stream of rendered pixels.
///
/// Filled through [`PixelSink`]; bin `i` of each channel counts the pixels
/// whose stored (clamped) channel value is `i`. Alpha is not binned.
#[derive(Debug, Clone)]
pub struct Histogram {
    pub red: [u32; 256],
    pub green: [u32; 256],
    pub blue: [u32; 256],
    /// BT.709 luma of each pixel.
    pub luminance: [u32; 256],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            red: [0; 256],
            green: [0; 256],
            blue: [0; 256],
            luminance: [0; 256],
        }
    }
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    fn color_channels(&self) -> [&[u32; 256]; 3] {
        [&self.red, &self.green, &self.blue]
    }

    /// Number of pixels streamed since the last `clear_rgb`.
    pub fn total(&self) -> u64 {
        self.red.iter().map(|&n| n as u64).sum()
    }

    /// Tallest bin over red, green and blue. Luminance is left out so it
    /// can share the color channels' vertical scale.
    pub fn max_value(&self) -> u32 {
        self.color_channels()
            .into_iter()
            .flat_map(|bins| bins.iter().copied())
            .max()
            .unwrap_or(0)
    }

    /// Whether any color channel reached 255.
    pub fn has_highlight_clipping(&self) -> bool {
        self.color_channels().iter().any(|bins| bins[255] > 0)
    }

    /// Whether any color channel reached 0.
    pub fn has_shadow_clipping(&self) -> bool {
        self.color_channels().iter().any(|bins| bins[0] > 0)
    }
}
