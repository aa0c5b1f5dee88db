//! Streaming rendered pixels into a histogram.
//!
//! A [`PixelSink`] receives every pixel of a finished surface: one
//! `clear_rgb` call followed by one `set_rgb` per pixel. [`Histogram`] is the
//! built-in sink; drawing it is left to the caller.

use crate::surface::{Surface, BYTES_PER_PIXEL};
use crate::{Histogram, PixelColor};

/// Consumer of a stream of pixel colors.
pub trait PixelSink {
    /// Forget everything seen so far.
    fn clear_rgb(&mut self);

    /// Record one pixel.
    fn set_rgb(&mut self, color: PixelColor);
}

impl PixelSink for Histogram {
    fn clear_rgb(&mut self) {
        *self = Histogram::new();
    }

    fn set_rgb(&mut self, color: PixelColor) {
        let [r, g, b, _] = color.to_rgba();
        self.red[r as usize] += 1;
        self.green[g as usize] += 1;
        self.blue[b as usize] += 1;

        let lum = calculate_luminance_u8(r, g, b);
        self.luminance[lum as usize] += 1;
    }
}

/// Feed every pixel of `surface` to `sink` in row-major order.
pub fn stream_pixels<S: PixelSink + ?Sized>(surface: &Surface, sink: &mut S) {
    sink.clear_rgb();
    for chunk in surface.pixels().chunks_exact(BYTES_PER_PIXEL) {
        sink.set_rgb(PixelColor::from_rgba(chunk));
    }
}

/// Compute RGB and luminance histograms for a surface.
///
/// # Example
/// ```
/// use photopop_core::{compute_histogram, Surface};
///
/// let surface = Surface::from_rgba(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]).unwrap();
/// let hist = compute_histogram(&surface);
/// assert_eq!(hist.red[255], 1);
/// assert_eq!(hist.green[255], 1);
/// ```
pub fn compute_histogram(surface: &Surface) -> Histogram {
    let mut hist = Histogram::new();
    stream_pixels(surface, &mut hist);
    hist
}

/// Calculate luminance from RGB using ITU-R BT.709 coefficients.
///
/// Returns a value in range 0-255.
#[inline]
fn calculate_luminance_u8(r: u8, g: u8, b: u8) -> u8 {
    let lum = 0.2126 * r as f32 + 0.7152 * g as f32 + 0.0722 * b as f32;
    lum.clamp(0.0, 255.0).round() as u8
}
