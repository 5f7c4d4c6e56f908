//! Color policies
//!
//! A `ColorPolicy` decides the color of every item in every slot. It can be
//! a single color, a flat sequence cycled per slot, a nested sequence cycled
//! per slot and then per item, or a function of the slot/item indices.

use crate::error::{ChartError, ChartResult};
use crate::model::Color;
use std::fmt;
use std::sync::Arc;

/// Color function: `(slot_index, item_index, slot_count, item_count_in_slot) -> color`
pub type ColorFn = dyn Fn(usize, usize, usize, usize) -> String + Send + Sync;

/// One entry of a nested color sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorEntry {
    /// Same color for every item in the slot
    Single(String),
    /// Colors cycled per item within the slot
    Group(Vec<String>),
}

impl From<&str> for ColorEntry {
    fn from(color: &str) -> Self {
        ColorEntry::Single(color.to_string())
    }
}

impl From<String> for ColorEntry {
    fn from(color: String) -> Self {
        ColorEntry::Single(color)
    }
}

impl From<Vec<String>> for ColorEntry {
    fn from(colors: Vec<String>) -> Self {
        ColorEntry::Group(colors)
    }
}

impl From<Vec<&str>> for ColorEntry {
    fn from(colors: Vec<&str>) -> Self {
        ColorEntry::Group(colors.into_iter().map(str::to_string).collect())
    }
}

/// How colors are assigned to slots and items
#[derive(Clone)]
pub enum ColorPolicy {
    Function(Arc<ColorFn>),
    Nested(Vec<ColorEntry>),
    Flat(Vec<String>),
    Scalar(String),
}

impl ColorPolicy {
    /// One color for everything
    pub fn scalar(color: impl Into<String>) -> Self {
        ColorPolicy::Scalar(color.into())
    }

    /// Colors cycled per slot
    pub fn flat<S: Into<String>>(colors: impl IntoIterator<Item = S>) -> ChartResult<Self> {
        let colors: Vec<String> = colors.into_iter().map(Into::into).collect();
        if colors.is_empty() {
            return Err(ChartError::InvalidConfiguration(
                "color sequence must not be empty".to_string(),
            ));
        }
        Ok(ColorPolicy::Flat(colors))
    }

    /// Colors cycled per slot, then per item where an entry is a group
    pub fn nested<E: Into<ColorEntry>>(entries: impl IntoIterator<Item = E>) -> ChartResult<Self> {
        let entries: Vec<ColorEntry> = entries.into_iter().map(Into::into).collect();
        if entries.is_empty() {
            return Err(ChartError::InvalidConfiguration(
                "color sequence must not be empty".to_string(),
            ));
        }
        if let Some(index) = entries
            .iter()
            .position(|e| matches!(e, ColorEntry::Group(g) if g.is_empty()))
        {
            return Err(ChartError::InvalidConfiguration(format!(
                "color group {} must not be empty",
                index
            )));
        }
        Ok(ColorPolicy::Nested(entries))
    }

    /// Colors computed from `(slot_index, item_index, slot_count, item_count_in_slot)`
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(usize, usize, usize, usize) -> String + Send + Sync + 'static,
    {
        ColorPolicy::Function(Arc::new(f))
    }

    /// Color of item `item` in slot `slot`
    ///
    /// Sequences are never empty (enforced by the constructors), so the
    /// modulo indexing below always lands on an entry.
    pub fn resolve(
        &self,
        slot: usize,
        item: usize,
        slot_count: usize,
        item_count: usize,
    ) -> String {
        match self {
            ColorPolicy::Function(f) => f(slot, item, slot_count, item_count),
            ColorPolicy::Nested(entries) => match entries.get(slot % entries.len().max(1)) {
                Some(ColorEntry::Group(group)) => group
                    .get(item % group.len().max(1))
                    .cloned()
                    .unwrap_or_default(),
                Some(ColorEntry::Single(color)) => color.clone(),
                None => String::new(),
            },
            ColorPolicy::Flat(colors) => colors
                .get(slot % colors.len().max(1))
                .cloned()
                .unwrap_or_default(),
            ColorPolicy::Scalar(color) => color.clone(),
        }
    }
}

impl Default for ColorPolicy {
    fn default() -> Self {
        ColorPolicy::function(default_color)
    }
}

impl fmt::Debug for ColorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorPolicy::Function(_) => f.write_str("Function(..)"),
            ColorPolicy::Nested(entries) => f.debug_tuple("Nested").field(entries).finish(),
            ColorPolicy::Flat(colors) => f.debug_tuple("Flat").field(colors).finish(),
            ColorPolicy::Scalar(color) => f.debug_tuple("Scalar").field(color).finish(),
        }
    }
}

/// Default color: hue spread evenly across slots, items in a slot get
/// progressively lighter shades of the slot's hue.
pub fn default_color(slot: usize, item: usize, slot_count: usize, item_count: usize) -> String {
    let hue = slot as f64 / slot_count.max(1) as f64;
    let lightness = 0.4 + 0.4 * (item as f64 / item_count.max(1) as f64);
    Color::from_hsl(hue, 1.0, lightness).to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar() {
        let policy = ColorPolicy::scalar("red");
        assert_eq!(policy.resolve(0, 0, 3, 1), "red");
        assert_eq!(policy.resolve(7, 4, 9, 5), "red");
    }

    #[test]
    fn test_flat_cycles_per_slot() {
        let policy = ColorPolicy::flat(["red", "blue"]).unwrap();
        assert_eq!(policy.resolve(0, 0, 3, 2), "red");
        assert_eq!(policy.resolve(0, 1, 3, 2), "red");
        assert_eq!(policy.resolve(1, 0, 3, 2), "blue");
        assert_eq!(policy.resolve(2, 1, 3, 2), "red");
    }

    #[test]
    fn test_nested_cycles_per_slot_then_item() {
        let policy = ColorPolicy::nested(vec![
            ColorEntry::from(vec!["#111111", "#222222"]),
            ColorEntry::from("#333333"),
        ])
        .unwrap();

        assert_eq!(policy.resolve(0, 0, 4, 3), "#111111");
        assert_eq!(policy.resolve(0, 1, 4, 3), "#222222");
        assert_eq!(policy.resolve(0, 2, 4, 3), "#111111");
        assert_eq!(policy.resolve(1, 0, 4, 3), "#333333");
        assert_eq!(policy.resolve(1, 2, 4, 3), "#333333");
        assert_eq!(policy.resolve(2, 1, 4, 3), "#222222");
    }

    #[test]
    fn test_function() {
        let policy = ColorPolicy::function(|s, i, n, m| format!("{}-{}-{}-{}", s, i, n, m));
        assert_eq!(policy.resolve(1, 2, 3, 4), "1-2-3-4");
    }

    #[test]
    fn test_empty_sequences_rejected() {
        assert!(matches!(
            ColorPolicy::flat(Vec::<String>::new()),
            Err(ChartError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            ColorPolicy::nested(Vec::<ColorEntry>::new()),
            Err(ChartError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            ColorPolicy::nested(vec![ColorEntry::Group(vec![])]),
            Err(ChartError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_default_color() {
        assert_eq!(default_color(0, 0, 1, 1), "#cc0000");
        assert_eq!(default_color(0, 1, 1, 2), "#ff3333");
        // Hue 1/3 of the way round is green
        assert_eq!(default_color(1, 0, 3, 1), "#00cc00");
    }

    #[test]
    fn test_default_policy_distinct_hues() {
        let policy = ColorPolicy::default();
        let colors: Vec<String> = (0..6).map(|i| policy.resolve(i, 0, 6, 1)).collect();
        let mut unique = colors.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 6);
    }
}
