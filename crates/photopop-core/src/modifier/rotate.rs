//! Rotation about the surface center with canvas expansion.
//!
//! The output canvas is the axis-aligned bounding box of the rotated source
//! corners, so the rotated image is never clipped. Uncovered pixels are
//! transparent black.
//!
//! # Algorithm
//!
//! Corners are rotated with the negated angle and rounded to whole pixels:
//! ```text
//! x' = ox + (x - ox) * cos(-θ) + (y - oy) * sin(-θ)
//! y' = oy - (x - ox) * sin(-θ) + (y - oy) * cos(-θ)
//! ```
//! The source is then drawn translated to the new canvas center, rotated by
//! θ, and offset by `(-cx + max(-minX, 0), -cy + max(-minY, 0))`.
//!
//! Drawing uses inverse mapping: for each output pixel we undo the
//! translation and rotation to find the source position and interpolate.

use super::Modifier;
use crate::config::{keys, Configuration};
use crate::surface::{round_half_up, FilterType, Surface, BYTES_PER_PIXEL};

const MIN_ANGLE: f64 = -180.0;
const MAX_ANGLE: f64 = 180.0;

/// Bounding box of a rotated rectangle, in the source's pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotatedBounds {
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
}

impl RotatedBounds {
    pub fn width(&self) -> u32 {
        (self.max_x - self.min_x) as u32
    }

    pub fn height(&self) -> u32 {
        (self.max_y - self.min_y) as u32
    }
}

/// Rotate `(x, y)` about `(ox, oy)` by `angle` radians, rounding to whole
/// pixels.
fn rotate_coord(x: f64, y: f64, ox: f64, oy: f64, angle: f64) -> (i64, i64) {
    let (sin, cos) = angle.sin_cos();
    let rx = ox + (x - ox) * cos + (y - oy) * sin;
    let ry = oy - (x - ox) * sin + (y - oy) * cos;
    (round_half_up(rx) as i64, round_half_up(ry) as i64)
}

/// Compute the bounding box of a `width x height` rectangle rotated about
/// its center by `angle_degrees`.
///
/// # Example
///
/// ```
/// use photopop_core::rotated_bounds;
///
/// // 90-degree rotation swaps dimensions
/// let bounds = rotated_bounds(100, 50, 90.0);
/// assert_eq!((bounds.width(), bounds.height()), (50, 100));
/// ```
pub fn rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> RotatedBounds {
    let angle = -angle_degrees.to_radians();
    let (w, h) = (width as f64, height as f64);
    let (ox, oy) = (w / 2.0, h / 2.0);

    let corners = [
        rotate_coord(0.0, h, ox, oy, angle),
        rotate_coord(w, h, ox, oy, angle),
        rotate_coord(0.0, 0.0, ox, oy, angle),
        rotate_coord(w, 0.0, ox, oy, angle),
    ];

    let mut bounds = RotatedBounds {
        min_x: i64::MAX,
        max_x: i64::MIN,
        min_y: i64::MAX,
        max_y: i64::MIN,
    };
    for (x, y) in corners {
        bounds.min_x = bounds.min_x.min(x);
        bounds.max_x = bounds.max_x.max(x);
        bounds.min_y = bounds.min_y.min(y);
        bounds.max_y = bounds.max_y.max(y);
    }
    bounds
}

/// Modifier that rotates the surface by `rotate` degrees (-180 to 180).
///
/// `rotate` values of exactly 0, -180 and 180 leave the surface untouched.
#[derive(Debug, Default)]
pub struct Rotate {
    filter: FilterType,
    scratch: Surface,
}

impl Rotate {
    /// Create a rotate modifier using bilinear interpolation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different interpolation filter.
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn filter(&self) -> FilterType {
        self.filter
    }
}

impl Modifier for Rotate {
    fn set_default_conf(&self, conf: &mut Configuration) {
        conf.insert(keys::ROTATE, 0.0);
    }

    fn set_conf_value(&self, conf: &mut Configuration, key: &str, value: f64) {
        if key == keys::ROTATE {
            conf.insert_clamped(keys::ROTATE, value, MIN_ANGLE, MAX_ANGLE);
        }
    }

    fn test(&self, conf: &Configuration) -> bool {
        let angle = conf.value(keys::ROTATE);
        angle != 0.0 && angle > MIN_ANGLE && angle < MAX_ANGLE
    }

    fn modify<'a>(&'a mut self, source: &'a Surface, conf: &Configuration) -> &'a Surface {
        if !self.test(conf) {
            return source;
        }

        let degrees = conf.value(keys::ROTATE);
        let bounds = rotated_bounds(source.width(), source.height(), degrees);
        let (dst_w, dst_h) = (bounds.width(), bounds.height());
        self.scratch.reset(dst_w, dst_h);

        let cx = dst_w as f64 / 2.0;
        let cy = dst_h as f64 / 2.0;
        let x_offset = -cx + (-bounds.min_x as f64).max(0.0);
        let y_offset = -cy + (-bounds.min_y as f64).max(0.0);

        let (sin, cos) = degrees.to_radians().sin_cos();
        let filter = self.filter;
        let row_len = dst_w as usize * BYTES_PER_PIXEL;

        for (dst_y, row) in self
            .scratch
            .pixels_mut()
            .chunks_exact_mut(row_len.max(1))
            .enumerate()
        {
            for (dst_x, out) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
                // Pixel center relative to the canvas center
                let px = dst_x as f64 + 0.5 - cx;
                let py = dst_y as f64 + 0.5 - cy;

                // Undo the rotation, then the draw offset
                let src_x = px * cos + py * sin - x_offset;
                let src_y = -px * sin + py * cos - y_offset;

                // Sample grid is pixel centers
                let pixel = match filter {
                    FilterType::Nearest => sample_nearest(source, src_x - 0.5, src_y - 0.5),
                    FilterType::Bilinear => sample_bilinear(source, src_x - 0.5, src_y - 0.5),
                    FilterType::Lanczos3 => sample_lanczos3(source, src_x - 0.5, src_y - 0.5),
                };
                out.copy_from_slice(&pixel);
            }
        }

        &self.scratch
    }
}

/// Get a pixel as [f64; 4], transparent black outside the surface.
#[inline]
fn texel(image: &Surface, px: i64, py: i64) -> [f64; 4] {
    if px < 0 || py < 0 || px >= image.width() as i64 || py >= image.height() as i64 {
        return [0.0; 4];
    }
    let idx = (py as usize * image.width() as usize + px as usize) * BYTES_PER_PIXEL;
    let p = &image.pixels()[idx..idx + BYTES_PER_PIXEL];
    [p[0] as f64, p[1] as f64, p[2] as f64, p[3] as f64]
}

#[inline]
fn to_u8(v: [f64; 4]) -> [u8; 4] {
    v.map(|c| c.clamp(0.0, 255.0).round() as u8)
}

fn sample_nearest(image: &Surface, x: f64, y: f64) -> [u8; 4] {
    to_u8(texel(image, round_half_up(x) as i64, round_half_up(y) as i64))
}

/// Sample a pixel using bilinear interpolation.
///
/// Bilinear interpolation considers the 4 nearest pixels and weights
/// their contribution based on distance. Neighbors outside the surface
/// count as transparent black, which fades the edges.
fn sample_bilinear(image: &Surface, x: f64, y: f64) -> [u8; 4] {
    let x0f = x.floor();
    let y0f = y.floor();
    let fx = x - x0f;
    let fy = y - y0f;
    let (x0, y0) = (x0f as i64, y0f as i64);

    let p00 = texel(image, x0, y0);
    let p10 = texel(image, x0 + 1, y0);
    let p01 = texel(image, x0, y0 + 1);
    let p11 = texel(image, x0 + 1, y0 + 1);

    let mut result = [0.0f64; 4];
    for i in 0..4 {
        result[i] = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }
    to_u8(result)
}

/// Sample a pixel using Lanczos3 interpolation.
///
/// Lanczos3 considers a 6x6 neighborhood of pixels. Near the edges it falls
/// back to bilinear.
fn sample_lanczos3(image: &Surface, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (image.width() as i64, image.height() as i64);

    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(image, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 4];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;
            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);
            let pixel = texel(image, px, py);
            for i in 0..4 {
                sum[i] += pixel[i] * weight;
            }
            weight_sum += weight;
        }
    }

    if weight_sum <= 0.0 {
        return [0; 4];
    }
    to_u8(sum.map(|s| s / weight_sum))
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
