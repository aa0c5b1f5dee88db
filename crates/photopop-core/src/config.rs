//! The flat configuration map that drives every pipeline stage.
//!
//! Keys are owned by whichever modifier or effect registers them. Owners
//! clamp values when they write them, so a stored value is always inside its
//! key's range and readers never need to validate.
//!
//! | key | range | default |
//! |---|---|---|
//! | `scale` | 0.1 to 2.0 | 1 |
//! | `rotate` | -180 to 180 | 0 |
//! | `cropX`, `cropY`, `cropWidth`, `cropHeight` | 0 and up | 0 |
//! | `exposure`, `contrast`, `saturation` | -100 to 100 | 0 |

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Configuration key names.
pub mod keys {
    pub const SCALE: &str = "scale";
    pub const ROTATE: &str = "rotate";
    pub const CROP_X: &str = "cropX";
    pub const CROP_Y: &str = "cropY";
    pub const CROP_WIDTH: &str = "cropWidth";
    pub const CROP_HEIGHT: &str = "cropHeight";
    pub const EXPOSURE: &str = "exposure";
    pub const CONTRAST: &str = "contrast";
    pub const SATURATION: &str = "saturation";
}

/// Mapping from parameter name to value.
///
/// Serializes as a plain object (`{"scale": 0.5, "rotate": 15}`), which is
/// also the shape accepted for partial updates. Deserializing keeps numeric
/// entries only; anything else (`"title": "holiday"`, `null`, nested objects)
/// is skipped, and NaN is dropped as it is by [`insert`](Self::insert).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Configuration {
    values: BTreeMap<String, f64>,
}

impl Configuration {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value, or `None` if the key has never been set.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Get a value, reading a missing key as 0.
    #[inline]
    pub fn value(&self, key: &str) -> f64 {
        self.get(key).unwrap_or(0.0)
    }

    /// Store a value as-is.
    ///
    /// This is the primitive owners use after clamping. NaN is never stored;
    /// writing it leaves the previous value in place.
    pub fn insert(&mut self, key: &str, value: f64) {
        if value.is_nan() {
            return;
        }
        self.values.insert(key.to_string(), value);
    }

    /// Store `value` clamped to `[min, max]`.
    pub fn insert_clamped(&mut self, key: &str, value: f64, min: f64, max: f64) {
        self.insert(key, value.clamp(min, max));
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Remove every key.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Configuration {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<K: Into<String>, const N: usize> From<[(K, f64); N]> for Configuration {
    fn from(pairs: [(K, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<'de> Deserialize<'de> for Configuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ConfigurationVisitor)
    }
}

struct ConfigurationVisitor;

/// A map value that is either a number or something to skip.
#[derive(Deserialize)]
#[serde(untagged)]
enum Entry {
    Number(f64),
    Other(IgnoredAny),
}

impl<'de> Visitor<'de> for ConfigurationVisitor {
    type Value = Configuration;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of configuration values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Configuration, A::Error> {
        let mut conf = Configuration::new();
        while let Some(key) = map.next_key::<String>()? {
            match map.next_value::<Entry>()? {
                Entry::Number(value) => conf.insert(&key, value),
                Entry::Other(_) => {}
            }
        }
        Ok(conf)
    }
}
