//! SVG Markup - element tree and XML serialization
//!
//! This crate provides:
//! - An ordered element tree (`Element`, `Node`, `AttrValue`)
//! - A document writer producing indented XML with declaration and DOCTYPE

mod element;
mod error;
mod writer;

pub use element::*;
pub use error::*;
pub use writer::*;
