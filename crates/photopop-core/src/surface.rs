//! RGBA pixel surfaces and resampling filters.
//!
//! A [`Surface`] is the unit of work passed between pipeline stages. It is a
//! dense RGBA buffer (4 bytes per pixel, row-major). Modifiers keep one
//! surface each as scratch space and resize it in place between renders, so
//! the region helpers here follow canvas semantics: reads outside the surface
//! yield transparent black and writes outside it are clipped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::PixelColor;

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Error types for surface construction and region writes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// The pixel buffer does not match the declared dimensions.
    #[error("Pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// The requested dimensions need more memory than can be allocated.
    #[error("Surface of {width}x{height} pixels is too large to allocate")]
    TooLarge { width: u32, height: u32 },
}

/// Filter type for resampling operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Round to the nearest integer, halves toward positive infinity.
///
/// `-2.5` rounds to `-2`, unlike [`f64::round`] which rounds it to `-3`.
#[inline]
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// An RGBA image buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    pixels: Vec<u8>,
}

impl Surface {
    /// Create a transparent surface of the given size.
    ///
    /// # Panics
    ///
    /// Panics if the pixel buffer cannot be allocated, like `vec!`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; buffer_len(width, height)],
        }
    }

    /// Create a surface from existing RGBA pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::BufferSizeMismatch`] if `pixels` is not exactly
    /// `width * height * 4` bytes long.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, SurfaceError> {
        let expected = buffer_len(width, height);
        if pixels.len() != expected {
            return Err(SurfaceError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a surface filled with a single color.
    pub fn filled(width: u32, height: u32, color: PixelColor) -> Self {
        let mut surface = Self::new(width, height);
        let rgba = color.to_rgba();
        for chunk in surface.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            chunk.copy_from_slice(&rgba);
        }
        surface
    }

    /// Create a surface from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an image::RgbaImage for further processing.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Surface width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable raw RGBA bytes.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Consume the surface, returning its RGBA bytes.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if this surface has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Resize to `width x height` and clear every pixel to transparent black.
    ///
    /// The backing allocation is kept when it is already large enough, which
    /// is what lets modifiers reuse one scratch surface across renders.
    ///
    /// # Panics
    ///
    /// Panics if the pixel buffer cannot be allocated. Use
    /// [`try_reset`](Self::try_reset) for caller-controlled sizes.
    pub fn reset(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(buffer_len(width, height), 0);
    }

    /// Like [`reset`](Self::reset), but fails instead of aborting when the
    /// buffer size overflows or the allocation is refused.
    ///
    /// On error the surface is left empty (0x0).
    pub fn try_reset(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        let too_large = || SurfaceError::TooLarge { width, height };
        let len = checked_buffer_len(width, height).ok_or_else(too_large)?;

        self.width = 0;
        self.height = 0;
        self.pixels.clear();
        self.pixels.try_reserve_exact(len).map_err(|_| too_large())?;

        self.pixels.resize(len, 0);
        self.width = width;
        self.height = height;
        Ok(())
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    /// Read a single pixel, or `None` outside the surface.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<PixelColor> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some(PixelColor::from_rgba(&self.pixels[i..i + BYTES_PER_PIXEL]))
    }

    /// Write a single pixel, clamping each channel to 0-255. Ignored outside
    /// the surface.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: PixelColor) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.index(x, y);
        self.pixels[i..i + BYTES_PER_PIXEL].copy_from_slice(&color.to_rgba());
    }

    /// Read a `w x h` region starting at `(x, y)` into a new RGBA buffer.
    ///
    /// Parts of the region outside the surface read as transparent black.
    pub fn get_pixels(&self, x: i64, y: i64, w: u32, h: u32) -> Vec<u8> {
        let mut region = Surface::new(w, h);
        region.copy_region_from(self, x, y);
        region.pixels
    }

    /// Write a `w x h` RGBA buffer into this surface with its top-left corner
    /// at `(x, y)`. Parts falling outside the surface are clipped.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::BufferSizeMismatch`] if `data` is not exactly
    /// `w * h * 4` bytes long.
    pub fn put_pixels(
        &mut self,
        data: &[u8],
        w: u32,
        h: u32,
        x: i64,
        y: i64,
    ) -> Result<(), SurfaceError> {
        let expected = buffer_len(w, h);
        if data.len() != expected {
            return Err(SurfaceError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        let src_row_len = w as usize * BYTES_PER_PIXEL;
        let Some(span) = Span::clip(x, w, self.width) else {
            return Ok(());
        };

        for row in 0..h as i64 {
            let dst_y = y.saturating_add(row);
            if dst_y < 0 || dst_y >= self.height as i64 {
                continue;
            }
            let src_start = row as usize * src_row_len + span.src_offset * BYTES_PER_PIXEL;
            let dst_start = self.index(span.dst_offset as u32, dst_y as u32);
            let len = span.len * BYTES_PER_PIXEL;
            self.pixels[dst_start..dst_start + len]
                .copy_from_slice(&data[src_start..src_start + len]);
        }
        Ok(())
    }

    /// Fill this surface with the region of `source` whose top-left corner is
    /// at `(x, y)`. This surface's own dimensions select the region size.
    ///
    /// Pixels with no counterpart in `source` are cleared to transparent black.
    pub fn copy_region_from(&mut self, source: &Surface, x: i64, y: i64) {
        self.pixels.fill(0);
        let Some(span) = Span::clip(x.saturating_neg(), source.width, self.width) else {
            return;
        };

        for row in 0..self.height as i64 {
            let src_y = y.saturating_add(row);
            if src_y < 0 || src_y >= source.height as i64 {
                continue;
            }
            let src_start = source.index(span.src_offset as u32, src_y as u32);
            let dst_start = self.index(span.dst_offset as u32, row as u32);
            let len = span.len * BYTES_PER_PIXEL;
            self.pixels[dst_start..dst_start + len]
                .copy_from_slice(&source.pixels[src_start..src_start + len]);
        }
    }
}

/// Horizontal overlap between a source row placed at `offset` and a
/// destination row.
struct Span {
    src_offset: usize,
    dst_offset: usize,
    len: usize,
}

impl Span {
    /// Clip a source row of `src_len` pixels, placed at `offset` in a
    /// destination row of `dst_len` pixels.
    fn clip(offset: i64, src_len: u32, dst_len: u32) -> Option<Span> {
        let start = offset.max(0);
        let end = offset.saturating_add(src_len as i64).min(dst_len as i64);
        if end <= start {
            return None;
        }
        Some(Span {
            src_offset: (start - offset) as usize,
            dst_offset: start as usize,
            len: (end - start) as usize,
        })
    }
}

/// Byte length of a `width x height` buffer, saturating so that oversized
/// requests fail in the allocator rather than in the arithmetic.
#[inline]
fn buffer_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(BYTES_PER_PIXEL)
}

/// Byte length of a `width x height` buffer, or `None` past `isize::MAX`.
fn checked_buffer_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(BYTES_PER_PIXEL)
        .filter(|&len| len <= isize::MAX as usize)
}
