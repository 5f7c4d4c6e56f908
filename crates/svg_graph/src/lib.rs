//! SVG Graph - bar and line charts as standalone SVG documents
//!
//! This crate provides:
//! - A "nice" gridline scale derived from the data
//! - Color policies (single color, cycled sequences, or a function)
//! - Layout of bars, line points, value labels and legend on a fixed canvas
//! - Rendering the laid-out chart to an SVG 1.1 document

mod error;
mod layout;
mod model;
mod options;
mod render;
mod scale;
mod styles;

pub use error::*;
pub use layout::*;
pub use model::*;
pub use options::*;
pub use render::*;
pub use scale::*;
pub use styles::*;

pub use svg_markup::{AttrValue, Element, Node};
