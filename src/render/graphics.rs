//! Graphics-state color mapping.
//!
//! Translates recorded [`GraphicsColor`] values into drawing-context
//! color calls. Stroke and fill channels are mapped independently with
//! the same rule: gray scalars (including the 0/1 boundary values) apply
//! as grayscale, triples apply as RGB, and `Unset` leaves the current
//! context color untouched.

use crate::model::GraphicsColor;
use crate::writer::PageCanvas;

/// Apply a recorded stroke/fill color pair to the canvas.
pub fn apply_color_state(canvas: &mut PageCanvas, stroke: GraphicsColor, fill: GraphicsColor) {
    match stroke {
        GraphicsColor::Unset => {}
        GraphicsColor::Gray(g) => canvas.set_stroke_gray(g),
        GraphicsColor::Rgb(r, g, b) => canvas.set_stroke_rgb(r, g, b),
    }

    match fill {
        GraphicsColor::Unset => {}
        GraphicsColor::Gray(g) => canvas.set_fill_gray(g),
        GraphicsColor::Rgb(r, g, b) => canvas.set_fill_rgb(r, g, b),
    }
}
