//! Graph options
//!
//! The resolved option set used for one render, plus the partial
//! `OptionsPatch` used to override individual keys after construction.
//! Applying a patch merges it over the current options; keys the patch
//! leaves out keep their current values.

use crate::error::{ChartError, ChartResult};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Kind of series geometry to draw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
}

/// Text drawn above each non-zero value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarText {
    None,
    #[default]
    Number,
    Percent,
}

/// Side of the plot the legend box is anchored to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendSide {
    Left,
    #[default]
    Right,
}

impl FromStr for ChartType {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bar" => Ok(ChartType::Bar),
            "line" => Ok(ChartType::Line),
            other => Err(ChartError::InvalidConfiguration(format!(
                "unknown chart type '{}'",
                other
            ))),
        }
    }
}

impl FromStr for BarText {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(BarText::None),
            "number" => Ok(BarText::Number),
            "percent" => Ok(BarText::Percent),
            other => Err(ChartError::InvalidConfiguration(format!(
                "unknown bar text mode '{}'",
                other
            ))),
        }
    }
}

impl FromStr for LegendSide {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(LegendSide::Left),
            "right" => Ok(LegendSide::Right),
            other => Err(ChartError::InvalidConfiguration(format!(
                "unknown legend side '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
        })
    }
}

/// Canvas size in user units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewbox {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewbox {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Space between the canvas edge and the plot area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 50.0,
            left: 50.0,
            right: 50.0,
            bottom: 100.0,
        }
    }
}

/// Resolved option set for a render
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// `width` attribute of the root svg element, passed through verbatim
    pub width: String,
    /// `height` attribute of the root svg element, passed through verbatim
    pub height: String,
    /// Spaces per nesting level in the output; zero writes compact markup
    pub indent: usize,
    /// Gap between adjacent category slots
    pub padding: f64,
    pub viewbox: Viewbox,
    pub margin: Margin,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub chart_type: ChartType,
    pub bar_text: BarText,
    pub legend_side: LegendSide,
    /// Top gridline equals the data maximum instead of leaving headroom
    pub flush: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            width: "100%".to_string(),
            height: "100%".to_string(),
            indent: 2,
            padding: 14.0,
            viewbox: Viewbox::default(),
            margin: Margin::default(),
            title: None,
            subtitle: None,
            chart_type: ChartType::default(),
            bar_text: BarText::default(),
            legend_side: LegendSide::default(),
            flush: false,
        }
    }
}

/// Partial viewbox override
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewboxPatch {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Partial margin override
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarginPatch {
    pub top: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
}

/// A set of option overrides; absent keys leave the current value alone
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OptionsPatch {
    pub width: Option<String>,
    pub height: Option<String>,
    pub indent: Option<usize>,
    pub padding: Option<f64>,
    pub viewbox: Option<ViewboxPatch>,
    pub margin: Option<MarginPatch>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub chart_type: Option<ChartType>,
    pub bar_text: Option<BarText>,
    pub legend_side: Option<LegendSide>,
    pub flush: Option<bool>,
}

impl OptionsPatch {
    /// Parse a flat JSON key mapping
    pub fn from_json(json: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Options {
    /// Default options with the given overrides applied
    pub fn new(patch: OptionsPatch) -> Self {
        let mut options = Self::default();
        options.update(patch);
        options
    }

    /// Merge a patch over the current options
    pub fn update(&mut self, patch: OptionsPatch) {
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(indent) = patch.indent {
            self.indent = indent;
        }
        if let Some(padding) = patch.padding {
            self.padding = padding;
        }
        if let Some(viewbox) = patch.viewbox {
            self.viewbox.width = viewbox.width.unwrap_or(self.viewbox.width);
            self.viewbox.height = viewbox.height.unwrap_or(self.viewbox.height);
        }
        if let Some(margin) = patch.margin {
            self.margin.top = margin.top.unwrap_or(self.margin.top);
            self.margin.left = margin.left.unwrap_or(self.margin.left);
            self.margin.right = margin.right.unwrap_or(self.margin.right);
            self.margin.bottom = margin.bottom.unwrap_or(self.margin.bottom);
        }
        if patch.title.is_some() {
            self.title = patch.title;
        }
        if patch.subtitle.is_some() {
            self.subtitle = patch.subtitle;
        }
        if let Some(chart_type) = patch.chart_type {
            self.chart_type = chart_type;
        }
        if let Some(bar_text) = patch.bar_text {
            self.bar_text = bar_text;
        }
        if let Some(legend_side) = patch.legend_side {
            self.legend_side = legend_side;
        }
        if let Some(flush) = patch.flush {
            self.flush = flush;
        }
    }

    /// Merge a flat JSON key mapping over the current options
    pub fn update_json(&mut self, json: &str) -> ChartResult<()> {
        let patch = OptionsPatch::from_json(json)?;
        self.update(patch);
        Ok(())
    }

    /// Width of the plot area inside the margins
    pub fn graph_width(&self) -> f64 {
        self.viewbox.width - self.margin.left - self.margin.right
    }

    /// Height of the plot area inside the margins
    pub fn graph_height(&self) -> f64 {
        self.viewbox.height - self.margin.top - self.margin.bottom
    }

    /// Check the options before rendering
    ///
    /// Non-finite numbers are rejected. A plot area with no room left
    /// inside the margins still renders, it just looks broken.
    pub fn validate(&self) -> ChartResult<()> {
        let numbers = [
            ("viewbox.width", self.viewbox.width),
            ("viewbox.height", self.viewbox.height),
            ("margin.top", self.margin.top),
            ("margin.left", self.margin.left),
            ("margin.right", self.margin.right),
            ("margin.bottom", self.margin.bottom),
            ("padding", self.padding),
        ];
        for (name, value) in numbers {
            if !value.is_finite() {
                return Err(ChartError::InvalidConfiguration(format!(
                    "{} must be a finite number, got {}",
                    name, value
                )));
            }
        }

        if self.graph_width() <= 0.0 || self.graph_height() <= 0.0 {
            tracing::warn!(
                "Plot area is empty ({}x{}); margins exceed the viewbox",
                self.graph_width(),
                self.graph_height()
            );
        }

        Ok(())
    }
}
