//! Graph rendering
//!
//! `Graph` holds everything one chart needs (options, data, labels, colors,
//! legend) and renders it to a complete SVG 1.1 document. Callers can hook
//! in extra drawing that runs after all chart elements, inside the same
//! coordinate space.

use crate::error::ChartResult;
use crate::layout::{ChartLayout, ChartLayoutEngine, DrawCommand};
use crate::model::{Legend, SeriesData};
use crate::options::{Options, OptionsPatch};
use crate::scale::Scale;
use crate::styles::ColorPolicy;
use svg_markup::{format_number, Document, Element, SVG11_DOCTYPE};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// A chart ready to be rendered
#[derive(Debug, Clone, Default)]
pub struct Graph {
    options: Options,
    data: SeriesData,
    labels: Vec<String>,
    colors: ColorPolicy,
    legend: Option<Legend>,
}

impl Graph {
    /// Create a graph with the given options and no data
    pub fn new(options: Options) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Set the data
    pub fn with_data(mut self, data: impl Into<SeriesData>) -> Self {
        self.data = data.into();
        self
    }

    /// Set the category labels
    pub fn with_labels<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.set_labels(labels);
        self
    }

    /// Set the color policy
    pub fn with_colors(mut self, colors: ColorPolicy) -> Self {
        self.colors = colors;
        self
    }

    /// Set the legend
    pub fn with_legend(mut self, legend: Legend) -> Self {
        self.legend = Some(legend);
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn data(&self) -> &SeriesData {
        &self.data
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    pub fn set_data(&mut self, data: impl Into<SeriesData>) {
        self.data = data.into();
    }

    pub fn set_labels<S: Into<String>>(&mut self, labels: impl IntoIterator<Item = S>) {
        self.labels = labels.into_iter().map(Into::into).collect();
    }

    pub fn set_colors(&mut self, colors: ColorPolicy) {
        self.colors = colors;
    }

    pub fn set_legend(&mut self, legend: Option<Legend>) {
        self.legend = legend;
    }

    /// Merge option overrides over the current options
    pub fn update_options(&mut self, patch: OptionsPatch) {
        self.options.update(patch);
    }

    /// Merge option overrides given as a flat JSON key mapping
    pub fn update_options_json(&mut self, json: &str) -> ChartResult<()> {
        self.options.update_json(json)
    }

    /// Scale derived from the current data and options
    pub fn scale(&self) -> Scale {
        Scale::compute(&self.data, self.options.flush)
    }

    /// Lay out the chart without serializing it
    pub fn layout(&self) -> ChartResult<ChartLayout> {
        self.options.validate()?;
        self.data.validate()?;
        let scale = self.scale();
        Ok(ChartLayoutEngine::new(&self.options, scale).layout(
            &self.data,
            &self.labels,
            &self.colors,
            self.legend.as_ref(),
        ))
    }

    /// Build the document tree
    pub fn document(&self) -> ChartResult<Document> {
        self.document_with(|_, _| {})
    }

    /// Build the document tree, running `extra` once after all chart
    /// elements with the drawing group and the options
    pub fn document_with<F>(&self, extra: F) -> ChartResult<Document>
    where
        F: FnOnce(&mut Element, &Options),
    {
        let layout = self.layout()?;
        let o = &self.options;

        let mut body = Element::new("g").attr("stroke-width", 1.0);
        for command in &layout.elements {
            body.push(command_to_element(command));
        }
        extra(&mut body, o);

        let drawing = Element::new("g")
            .attr("fill", "black")
            .attr("stroke", "black")
            .attr("stroke-width", "2")
            .attr("font-family", "Helvetica, Arial, sans-serif")
            .attr("font-size", "10px")
            .attr("font-weight", "medium")
            .child(command_to_element(&layout.background))
            .child(body);

        let root = Element::new("svg")
            .attr(
                "viewBox",
                format!(
                    "0 0 {} {}",
                    format_number(o.viewbox.width),
                    format_number(o.viewbox.height)
                ),
            )
            .attr("width", &o.width)
            .attr("height", &o.height)
            .attr("xmlns", SVG_NAMESPACE)
            .attr("version", "1.1")
            .child(drawing);

        Ok(Document::new(root).doctype(SVG11_DOCTYPE).indent(o.indent))
    }

    /// Render the chart to an SVG document string
    pub fn render(&self) -> ChartResult<String> {
        self.render_with(|_, _| {})
    }

    /// Render the chart, running `extra` once after all chart elements
    pub fn render_with<F>(&self, extra: F) -> ChartResult<String>
    where
        F: FnOnce(&mut Element, &Options),
    {
        let svg = self.document_with(extra)?.to_xml()?;
        tracing::debug!(bytes = svg.len(), "Rendered graph");
        Ok(svg)
    }
}

/// Convert a draw command to a markup element
pub fn command_to_element(command: &DrawCommand) -> Element {
    match command {
        DrawCommand::Rect {
            bounds,
            fill,
            stroke,
            stroke_width,
            corner_radius,
        } => {
            let mut el = Element::new("rect")
                .attr("x", bounds.x)
                .attr("y", bounds.y)
                .attr("width", bounds.width)
                .attr("height", bounds.height);
            if let Some(r) = corner_radius {
                el = el.attr("rx", *r).attr("ry", *r);
            }
            el = el.attr("fill", fill);
            if let Some(s) = stroke {
                el = el.attr("stroke", s);
            }
            if let Some(sw) = stroke_width {
                el = el.attr("stroke-width", *sw);
            }
            el
        }
        DrawCommand::Line {
            start,
            end,
            stroke,
            stroke_width,
        } => {
            let el = Element::new("line")
                .attr("x1", start.x)
                .attr("y1", start.y)
                .attr("x2", end.x)
                .attr("y2", end.y)
                .attr("stroke", stroke);
            match stroke_width {
                Some(sw) => el.attr("stroke-width", *sw),
                None => el,
            }
        }
        DrawCommand::Circle {
            center,
            radius,
            fill,
            stroke,
        } => Element::new("circle")
            .attr("cx", center.x)
            .attr("cy", center.y)
            .attr("r", *radius)
            .attr("fill", fill)
            .attr("stroke", stroke),
        DrawCommand::Text {
            position,
            text,
            font_size,
            anchor,
            stroke_width,
            rotation,
        } => {
            let mut el = Element::new("text").attr("x", position.x).attr("y", position.y);
            if let Some(size) = font_size {
                el = el.attr("font-size", size);
            }
            if let Some(anchor) = anchor {
                el = el.attr("text-anchor", anchor.as_str());
            }
            if let Some(sw) = stroke_width {
                el = el.attr("stroke-width", *sw);
            }
            if let Some(angle) = rotation {
                el = el.attr(
                    "transform",
                    format!(
                        "rotate({} {} {})",
                        format_number(*angle),
                        format_number(position.x),
                        format_number(position.y)
                    ),
                );
            }
            el.text(text.as_str())
        }
        DrawCommand::Group {
            attributes,
            children,
        } => {
            let mut el = Element::new("g");
            for (key, value) in attributes {
                el.set_attr(key.as_str(), value.clone());
            }
            for child in children {
                el.push(command_to_element(child));
            }
            el
        }
    }
}
