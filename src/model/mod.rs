//! Layout element model.
//!
//! This module defines the intermediate representation that bridges the
//! upstream layout parser and the redraw core: a per-page tree of typed,
//! positioned drawable units. Every variant carries the exact fields the
//! renderer needs; there is no attribute-bag access anywhere downstream.

mod color;
mod element;
mod page;

pub use color::GraphicsColor;
pub use element::{
    CharElement, ColorSpace, CurveElement, FigureElement, ImageElement, LayoutElement,
    LineElement, RectElement, TextGroupElement, TextLineElement,
};
pub use page::PageLayout;
