//! The redraw core.
//!
//! Everything between the parsed element tree and the output canvas:
//! font-name resolution, graphics-state color mapping, the redaction
//! predicate, embedded-image reconstruction with blank rejection, and
//! the page renderer that orchestrates them.

mod fonts;
mod graphics;
pub mod image;
mod options;
mod redaction;
mod renderer;

pub use fonts::{strip_subset_prefix, BuiltinFont, FontResolver, DEFAULT_FONT};
pub use graphics::apply_color_state;
pub use image::{decode, is_blank, reconstruct, BmpEncoder, ReconstructedImage};
pub use options::{RenderOptions, LINE_WIDTH_SCALE, RECT_BASELINE_ADJUST};
pub use redaction::RedactionPolicy;
pub use renderer::PageRenderer;
