//! Redaction-overlay detection.
//!
//! Weak redactions are rendered as solid, colorless-or-black cover boxes
//! tall enough to obscure a line of content. The predicate here is an
//! empirically tuned heuristic, not a proof: thin redaction bars slip
//! through and large black decorative rectangles are swallowed. Both
//! trade-offs are accepted and the knobs are exposed rather than hidden.

use serde::{Deserialize, Serialize};

use crate::model::RectElement;

/// Decides whether a rectangle is a redaction overlay to suppress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RedactionPolicy {
    /// Minimum height (page units) for a filled black box to count as a
    /// cover shape. Thin rules and underlines must still render.
    pub min_cover_height: f32,
}

impl RedactionPolicy {
    /// Policy with the default height threshold of 2 page units.
    pub fn new() -> Self {
        Self {
            min_cover_height: 2.0,
        }
    }

    /// Override the height threshold.
    pub fn with_min_cover_height(mut self, height: f32) -> Self {
        self.min_cover_height = height;
        self
    }

    /// Suppress iff the rectangle is filled, the fill is absent or pure
    /// black gray, and it is taller than the threshold. Colored boxes are
    /// never suppressed.
    pub fn is_redaction_overlay(&self, rect: &RectElement) -> bool {
        rect.fill && rect.fill_color.is_black_or_unset() && rect.height > self.min_cover_height
    }
}

impl Default for RedactionPolicy {
    fn default() -> Self {
        Self::new()
    }
}
