//! Chart layout calculations
//!
//! This module maps the data onto the canvas: background, gridlines with
//! value labels, rotated category labels, bars or line points, value labels
//! above the geometry, and the legend box. The output is an ordered list of
//! draw commands with final coordinates; later commands paint over earlier
//! ones.

use crate::model::{Legend, SeriesData};
use crate::options::{BarText, ChartType, LegendSide, Options};
use crate::scale::Scale;
use crate::styles::ColorPolicy;
use svg_markup::{format_number, AttrValue};

/// Minimum vertical distance between two neighbouring value labels
pub const LABEL_CLEARANCE: f64 = 14.0;

/// Height of one legend row
const LEGEND_ROW: f64 = 15.0;

/// Largest scale top that still gets half-step gridlines
const MINOR_GRIDLINE_LIMIT: f64 = 55.0;

/// A rectangle in layout coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutRect {
    /// Create a new rectangle
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Get the right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// A point in layout coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

impl LayoutPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Text anchor position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// A single drawing operation with final coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A filled rectangle
    Rect {
        bounds: LayoutRect,
        fill: String,
        stroke: Option<String>,
        stroke_width: Option<f64>,
        corner_radius: Option<f64>,
    },
    /// A straight line
    Line {
        start: LayoutPoint,
        end: LayoutPoint,
        stroke: String,
        stroke_width: Option<f64>,
    },
    /// A circle
    Circle {
        center: LayoutPoint,
        radius: f64,
        fill: String,
        stroke: String,
    },
    /// Text, optionally rotated about its own anchor point
    Text {
        position: LayoutPoint,
        text: String,
        font_size: Option<String>,
        anchor: Option<TextAnchor>,
        stroke_width: Option<f64>,
        rotation: Option<f64>,
    },
    /// A group whose attributes are inherited by its children
    Group {
        attributes: Vec<(String, AttrValue)>,
        children: Vec<DrawCommand>,
    },
}

impl DrawCommand {
    fn text(x: f64, y: f64, text: impl Into<String>) -> Self {
        DrawCommand::Text {
            position: LayoutPoint::new(x, y),
            text: text.into(),
            font_size: None,
            anchor: None,
            stroke_width: None,
            rotation: None,
        }
    }

    fn group(attributes: &[(&str, AttrValue)], children: Vec<DrawCommand>) -> Self {
        DrawCommand::Group {
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            children,
        }
    }
}

/// Layout for a complete chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    /// Plot area fill, drawn first
    pub background: DrawCommand,
    /// Everything drawn on top of the background, in paint order
    pub elements: Vec<DrawCommand>,
}

impl ChartLayout {
    /// All commands depth-first in paint order, groups included
    pub fn commands(&self) -> Vec<&DrawCommand> {
        fn walk<'a>(command: &'a DrawCommand, out: &mut Vec<&'a DrawCommand>) {
            out.push(command);
            if let DrawCommand::Group { children, .. } = command {
                for child in children {
                    walk(child, out);
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.background, &mut out);
        for element in &self.elements {
            walk(element, &mut out);
        }
        out
    }
}

/// Last drawn point per series index, used to join line-chart points
/// across slots
#[derive(Debug, Clone, Default)]
pub struct LineTracker {
    last: Vec<Option<LayoutPoint>>,
}

impl LineTracker {
    pub fn new(series_count: usize) -> Self {
        Self {
            last: vec![None; series_count],
        }
    }

    /// Record `point` for `series` and return the previous point, if any
    pub fn replace(&mut self, series: usize, point: LayoutPoint) -> Option<LayoutPoint> {
        if series >= self.last.len() {
            self.last.resize(series + 1, None);
        }
        self.last[series].replace(point)
    }
}

/// Geometry of one item within a slot
#[derive(Debug, Clone, Copy)]
struct ItemGeometry {
    bar_x: f64,
    bar_y: f64,
    bar_width: f64,
    height: f64,
}

/// Layout calculator for bar and line charts
pub struct ChartLayoutEngine<'a> {
    options: &'a Options,
    scale: Scale,
}

impl<'a> ChartLayoutEngine<'a> {
    /// Create a layout engine for the given options and scale
    pub fn new(options: &'a Options, scale: Scale) -> Self {
        Self { options, scale }
    }

    /// Plot area inside the margins
    pub fn plot_area(&self) -> LayoutRect {
        let o = self.options;
        LayoutRect::new(o.margin.left, o.margin.top, o.graph_width(), o.graph_height())
    }

    /// Horizontal pitch per slot
    pub fn dx(&self, slot_count: usize) -> f64 {
        self.options.graph_width() / slot_count as f64
    }

    /// Vertical pixels per gridline step
    pub fn dy(&self) -> f64 {
        self.options.graph_height() * self.scale.division / self.scale.max
    }

    /// Calculate the complete layout
    pub fn layout(
        &self,
        data: &SeriesData,
        labels: &[String],
        colors: &ColorPolicy,
        legend: Option<&Legend>,
    ) -> ChartLayout {
        let plot = self.plot_area();
        let background = DrawCommand::Rect {
            bounds: plot,
            fill: "lightgray".to_string(),
            stroke: None,
            stroke_width: None,
            corner_radius: None,
        };

        let mut elements = self.titles();

        let slot_count = data.slot_count();
        if slot_count == 0 {
            tracing::debug!("No data slots; drawing background and titles only");
            return ChartLayout { background, elements };
        }

        tracing::debug!(
            slot_count,
            series_count = data.series_count(),
            chart_type = %self.options.chart_type,
            "Laying out chart"
        );

        elements.push(self.gridlines());
        elements.push(self.category_labels(labels, slot_count));
        elements.push(self.series(data, colors));
        if self.options.bar_text != BarText::None {
            elements.push(self.value_labels(data));
        }
        if let Some(legend) = legend {
            elements.push(self.legend(legend));
        }

        ChartLayout { background, elements }
    }

    fn titles(&self) -> Vec<DrawCommand> {
        let o = self.options;
        let center = (o.viewbox.width / 2.0).round();
        let mut titles = Vec::new();

        if let Some(ref title) = o.title {
            let y = if o.subtitle.is_some() { 24.0 } else { 32.0 };
            titles.push(DrawCommand::Text {
                position: LayoutPoint::new(center, y),
                text: title.clone(),
                font_size: Some("24px".to_string()),
                anchor: Some(TextAnchor::Middle),
                stroke_width: None,
                rotation: None,
            });
        }
        if let Some(ref subtitle) = o.subtitle {
            titles.push(DrawCommand::Text {
                position: LayoutPoint::new(center, 34.0),
                text: subtitle.clone(),
                font_size: Some("18px".to_string()),
                anchor: Some(TextAnchor::Middle),
                stroke_width: None,
                rotation: None,
            });
        }
        titles
    }

    fn gridlines(&self) -> DrawCommand {
        let dy = self.dy();
        let max = self.scale.max;
        let division = self.scale.division;
        let minor = max < MINOR_GRIDLINE_LIMIT;

        let plot = self.plot_area();
        let x1 = plot.x + 1.0;
        let x2 = plot.right() - 1.0;
        let text_x = plot.x - 5.0;

        let label = |y: f64, value: f64| DrawCommand::Text {
            position: LayoutPoint::new(text_x, y + 4.0),
            text: format_number(value),
            font_size: None,
            anchor: None,
            stroke_width: Some(0.5),
            rotation: None,
        };
        let line = |y: f64, stroke: &str| DrawCommand::Line {
            start: LayoutPoint::new(x1, y),
            end: LayoutPoint::new(x2, y),
            stroke: stroke.to_string(),
            stroke_width: None,
        };

        let mut children = vec![label(plot.bottom(), 0.0)];

        for line_number in 1..self.scale.steps() {
            let y = (plot.y + line_number as f64 * dy).round();
            children.push(line(y, "#666666"));
            children.push(label(y, max - line_number as f64 * division));
            if minor {
                children.push(line(y + 0.5 * dy, "#999999"));
            }
        }

        children.push(label(plot.y, max));
        if minor {
            children.push(line(plot.y + 0.5 * dy, "#999999"));
        }

        DrawCommand::group(
            &[
                ("font-size", AttrValue::from("10px")),
                ("text-anchor", AttrValue::from("end")),
            ],
            children,
        )
    }

    fn category_labels(&self, labels: &[String], slot_count: usize) -> DrawCommand {
        let o = self.options;
        let dx = self.dx(slot_count);
        let y = o.viewbox.height - o.margin.bottom + 15.0;

        let children = (0..slot_count.max(labels.len()))
            .map(|index| {
                let x = (o.margin.left + dx * index as f64 + dx / 2.0).round();
                let text = labels.get(index).cloned().unwrap_or_default();
                DrawCommand::Text {
                    position: LayoutPoint::new(x, y),
                    text,
                    font_size: None,
                    anchor: None,
                    stroke_width: None,
                    rotation: Some(-45.0),
                }
            })
            .collect();

        DrawCommand::group(
            &[
                ("text-anchor", AttrValue::from("end")),
                ("font-size", AttrValue::from("12px")),
                ("stroke-width", AttrValue::from(0.3)),
            ],
            children,
        )
    }

    /// Position of item `item` out of `item_count` in slot `slot`
    fn item_geometry(
        &self,
        dx: f64,
        slot: usize,
        item: usize,
        item_count: usize,
        value: f64,
    ) -> ItemGeometry {
        let o = self.options;
        let available = dx - o.padding;
        let bar_width = available / item_count as f64;
        let x = o.margin.left + dx * slot as f64;
        let height = (value * self.dy() / self.scale.division).round();

        ItemGeometry {
            bar_x: (x + (dx - available) / 2.0 + item as f64 * bar_width).round(),
            bar_y: o.viewbox.height - o.margin.bottom - height,
            bar_width,
            height,
        }
    }

    fn series(&self, data: &SeriesData, colors: &ColorPolicy) -> DrawCommand {
        let slot_count = data.slot_count();
        let dx = self.dx(slot_count);
        let mut tracker = LineTracker::new(data.series_count());
        let mut children = Vec::new();

        for (slot_index, slot) in data.slots().iter().enumerate() {
            let item_count = slot.len();
            for (item_index, &value) in slot.values().iter().enumerate() {
                let geometry = self.item_geometry(dx, slot_index, item_index, item_count, value);
                let color = colors.resolve(slot_index, item_index, slot_count, item_count);
                let point = LayoutPoint::new(geometry.bar_x, geometry.bar_y);

                match self.options.chart_type {
                    ChartType::Bar => children.push(DrawCommand::Rect {
                        bounds: LayoutRect::new(
                            geometry.bar_x,
                            geometry.bar_y,
                            geometry.bar_width.max(0.0),
                            (geometry.height - 1.0).max(0.0),
                        ),
                        fill: color.clone(),
                        stroke: Some(color),
                        stroke_width: Some(0.0),
                        corner_radius: None,
                    }),
                    ChartType::Line => {
                        if let Some(previous) = tracker.replace(item_index, point) {
                            children.push(DrawCommand::Line {
                                start: previous,
                                end: point,
                                stroke: color.clone(),
                                stroke_width: Some(2.0),
                            });
                        }
                        children.push(DrawCommand::Circle {
                            center: point,
                            radius: (1.5 * geometry.bar_width).max(0.0),
                            fill: color.clone(),
                            stroke: color,
                        });
                    }
                }
            }
        }

        DrawCommand::group(
            &[
                ("font-size", AttrValue::from("8px")),
                ("stroke-width", AttrValue::from(0.3)),
            ],
            children,
        )
    }

    /// Value labels, drawn after every bar so they sit on top
    ///
    /// When a label would land within `LABEL_CLEARANCE` of the previous
    /// item's label it is lifted to sit exactly that far above it, and the
    /// next item compares against nothing. Only immediate neighbours are
    /// separated.
    fn value_labels(&self, data: &SeriesData) -> DrawCommand {
        let dx = self.dx(data.slot_count());
        let mut children = Vec::new();

        for (slot_index, slot) in data.slots().iter().enumerate() {
            let item_count = slot.len();
            let total = slot.sum();
            let mut last_height: Option<f64> = None;

            for (item_index, &value) in slot.values().iter().enumerate() {
                if value <= 0.0 {
                    last_height = None;
                    continue;
                }

                let geometry = self.item_geometry(dx, slot_index, item_index, item_count, value);
                let text_x = (geometry.bar_x + geometry.bar_width / 2.0).round();
                let mut text_y = geometry.bar_y - 3.0;

                match last_height.filter(|last| (last - geometry.height).abs() < LABEL_CLEARANCE) {
                    Some(last) => {
                        text_y -= LABEL_CLEARANCE - (geometry.height - last);
                        last_height = None;
                    }
                    None => last_height = Some(geometry.height),
                }

                let text = match self.options.bar_text {
                    BarText::Percent => format!("{}%", (100.0 * value / total).round() as i64),
                    BarText::Number | BarText::None => format_number(value),
                };
                children.push(DrawCommand::text(text_x, text_y, text));
            }
        }

        DrawCommand::group(
            &[
                ("font-size", AttrValue::from("8px")),
                ("stroke-width", AttrValue::from(0.3)),
                ("text-anchor", AttrValue::from("middle")),
            ],
            children,
        )
    }

    fn legend(&self, legend: &Legend) -> DrawCommand {
        let o = self.options;
        let x = match o.legend_side {
            LegendSide::Right => o.viewbox.width - 3.0 * o.margin.right,
            LegendSide::Left => 1.5 * o.margin.left,
        };
        let y = 1.5 * o.margin.top;

        let mut children = vec![DrawCommand::Rect {
            bounds: LayoutRect::new(
                x,
                y,
                2.5 * o.margin.right,
                legend.len() as f64 * LEGEND_ROW + 16.0,
            ),
            fill: "#ffffff".to_string(),
            stroke: Some("#000000".to_string()),
            stroke_width: Some(2.0),
            corner_radius: Some(5.0),
        }];

        for (row, (color, label)) in legend.entries().enumerate() {
            let row_y = y + row as f64 * LEGEND_ROW;
            children.push(DrawCommand::Rect {
                bounds: LayoutRect::new(x + 10.0, row_y + 10.0, 35.0, 10.0),
                fill: color.to_string(),
                stroke: Some(color.to_string()),
                stroke_width: Some(0.0),
                corner_radius: None,
            });
            children.push(DrawCommand::text(x + 55.0, row_y + 18.0, label));
        }

        DrawCommand::group(&[("text-anchor", AttrValue::from("start"))], children)
    }
}
