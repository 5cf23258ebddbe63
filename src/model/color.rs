//! Recorded graphics-state color values.

use serde::{Deserialize, Serialize};

/// A color value recorded from the source document's graphics state.
///
/// `Unset` means no color was recorded for the channel; when redrawing,
/// the current drawing-context color is left unchanged (no reset).
/// Scalars are in the range [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GraphicsColor {
    /// No recorded value; leave the context color as-is.
    Unset,
    /// Grayscale intensity (0 = black, 1 = white).
    Gray(f32),
    /// RGB triple.
    Rgb(f32, f32, f32),
}

impl GraphicsColor {
    /// Whether this value is pure black or absent.
    ///
    /// Weak redaction boxes are drawn with either no recorded fill color
    /// or a zero gray fill; colored fills never count.
    pub fn is_black_or_unset(&self) -> bool {
        match self {
            GraphicsColor::Unset => true,
            GraphicsColor::Gray(g) => *g == 0.0,
            GraphicsColor::Rgb(..) => false,
        }
    }

    /// Build from a CMYK tuple, as recorded by `k`/`K` operators.
    pub fn from_cmyk(c: f32, m: f32, y: f32, k: f32) -> Self {
        GraphicsColor::Rgb(
            (1.0 - c) * (1.0 - k),
            (1.0 - m) * (1.0 - k),
            (1.0 - y) * (1.0 - k),
        )
    }
}

impl Default for GraphicsColor {
    fn default() -> Self {
        GraphicsColor::Unset
    }
}
