//! Graph model types
//!
//! This module defines the data handed to the renderer: grouped numeric
//! series, the legend mapping, and the RGB color used by the default
//! color policy.

use crate::error::{ChartError, ChartResult};
use std::collections::BTreeMap;

/// Largest value a chart accepts; leaves room for scale headroom in `f64`
pub const MAX_DATA_VALUE: f64 = 1.0e300;

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a new color from RGB values
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from hue, saturation and lightness, each in [0, 1]
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let h = hue.rem_euclid(1.0);
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);

        if s == 0.0 {
            let v = channel(l);
            return Self::rgb(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Self::rgb(
            channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            channel(hue_to_rgb(p, q, h)),
            channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        )
    }

    /// Convert to a lowercase `#rrggbb` string
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// One category position on the horizontal axis: a group of values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slot(pub Vec<f64>);

impl Slot {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all values in the slot
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl From<f64> for Slot {
    fn from(value: f64) -> Self {
        Slot(vec![value])
    }
}

impl From<Vec<f64>> for Slot {
    fn from(values: Vec<f64>) -> Self {
        Slot(values)
    }
}

/// Ordered sequence of slots
///
/// Bare numbers are normalized into one-element slots on construction,
/// so layout code only ever sees groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesData(pub Vec<Slot>);

impl SeriesData {
    /// Data for a simple (ungrouped) chart: one value per slot
    pub fn simple(values: impl IntoIterator<Item = f64>) -> Self {
        SeriesData(values.into_iter().map(Slot::from).collect())
    }

    /// Data for a grouped chart: several values per slot
    pub fn grouped(groups: impl IntoIterator<Item = Vec<f64>>) -> Self {
        SeriesData(groups.into_iter().map(Slot::from).collect())
    }

    pub fn slots(&self) -> &[Slot] {
        &self.0
    }

    pub fn slot_count(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest individual value across all slots, if any; NaN is skipped
    pub fn max_value(&self) -> Option<f64> {
        self.0
            .iter()
            .flat_map(|slot| slot.0.iter().copied())
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                Some(m) if m >= v => Some(m),
                _ => Some(v),
            })
    }

    /// Reject values the scale cannot represent
    pub fn validate(&self) -> ChartResult<()> {
        for (slot_index, slot) in self.0.iter().enumerate() {
            for &value in slot.values() {
                if !value.is_finite() || value > MAX_DATA_VALUE {
                    return Err(ChartError::InvalidConfiguration(format!(
                        "value {} in slot {} must be finite and at most {:e}",
                        value, slot_index, MAX_DATA_VALUE
                    )));
                }
            }
        }
        Ok(())
    }

    /// Largest number of items in any slot
    pub fn series_count(&self) -> usize {
        self.0.iter().map(Slot::len).max().unwrap_or(0)
    }
}

impl From<Vec<f64>> for SeriesData {
    fn from(values: Vec<f64>) -> Self {
        SeriesData::simple(values)
    }
}

impl From<Vec<Vec<f64>>> for SeriesData {
    fn from(groups: Vec<Vec<f64>>) -> Self {
        SeriesData::grouped(groups)
    }
}

impl From<Vec<Slot>> for SeriesData {
    fn from(slots: Vec<Slot>) -> Self {
        SeriesData(slots)
    }
}

/// Mapping from color key to legend label, iterated in key order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Legend(BTreeMap<String, String>);

impl Legend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the label for a color
    pub fn insert(&mut self, color: impl Into<String>, label: impl Into<String>) {
        self.0.insert(color.into(), label.into());
    }

    pub fn with_entry(mut self, color: impl Into<String>, label: impl Into<String>) -> Self {
        self.insert(color, label);
        self
    }

    /// Entries sorted by color key
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Legend {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Legend(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
