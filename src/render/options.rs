//! Rendering options.

use serde::{Deserialize, Serialize};

use super::fonts::{BuiltinFont, DEFAULT_FONT};
use super::redaction::RedactionPolicy;

/// Vertical offset applied to every redrawn rectangle.
///
/// Underline-style shapes in recovered documents sit high enough to strike
/// through the words they underline; this nudges them down. Heuristic,
/// carried from field observation rather than derived.
pub const RECT_BASELINE_ADJUST: f32 = -3.0;

/// Recorded line widths are scaled down by this factor before drawing.
pub const LINE_WIDTH_SCALE: f32 = 0.1;

/// Options controlling how pages are redrawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Fallback font for names missing from the alias table.
    pub default_font: BuiltinFont,

    /// The redaction-overlay predicate.
    pub redaction: RedactionPolicy,

    /// Vertical offset applied to redrawn rectangles.
    pub rect_baseline_adjust: f32,

    /// Scale factor applied to recorded line widths.
    pub line_width_scale: f32,
}

impl RenderOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback font.
    pub fn with_default_font(mut self, font: BuiltinFont) -> Self {
        self.default_font = font;
        self
    }

    /// Set the redaction policy.
    pub fn with_redaction(mut self, policy: RedactionPolicy) -> Self {
        self.redaction = policy;
        self
    }

    /// Set the rectangle baseline adjustment.
    pub fn with_rect_baseline_adjust(mut self, adjust: f32) -> Self {
        self.rect_baseline_adjust = adjust;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            default_font: DEFAULT_FONT,
            redaction: RedactionPolicy::default(),
            rect_baseline_adjust: RECT_BASELINE_ADJUST,
            line_width_scale: LINE_WIDTH_SCALE,
        }
    }
}
