//! Pipeline stages that operate on a whole surface.
//!
//! Every stage implements [`Modifier`]. A modifier owns some configuration
//! keys, decides from the configuration whether it has work to do, and
//! either returns its input untouched or renders into a scratch surface it
//! owns.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y grows downward
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Crop coordinates are in pixels of the surface entering the crop stage

mod crop;
mod rotate;
mod scale;

pub use crop::Crop;
pub use rotate::{rotated_bounds, Rotate, RotatedBounds};
pub use scale::Scale;

use crate::config::Configuration;
use crate::surface::Surface;

/// A pipeline stage with a test/modify contract.
///
/// # Scratch surfaces
///
/// `modify` takes `&mut self` and ties the returned reference to both the
/// modifier and the source. The result is either `source` itself or the
/// modifier's own scratch surface, which the next `modify` call overwrites;
/// the borrow checker keeps callers from holding a result across that call.
pub trait Modifier {
    /// Write this modifier's keys with their default values.
    fn set_default_conf(&self, conf: &mut Configuration);

    /// Store `value` under `key` if this modifier owns `key`, clamped to its
    /// range. Other keys are ignored.
    fn set_conf_value(&self, conf: &mut Configuration, key: &str, value: f64);

    /// Whether [`modify`](Modifier::modify) would change anything under
    /// `conf`. Missing keys never pass.
    fn test(&self, conf: &Configuration) -> bool;

    /// Transform `source`, or return it unchanged when `test` fails.
    fn modify<'a>(&'a mut self, source: &'a Surface, conf: &Configuration) -> &'a Surface;
}
