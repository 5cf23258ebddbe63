//! Page-level layout container.

use serde::{Deserialize, Serialize};

use super::LayoutElement;

/// The parsed layout of a single page.
///
/// Produced once per page by the parser, consumed read-only by the
/// renderer, and discarded after the page is emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page number (1-indexed).
    pub number: u32,

    /// Bounding-box width in points (1 point = 1/72 inch).
    pub width: f32,

    /// Bounding-box height in points.
    pub height: f32,

    /// Top-level elements, in the order they were encountered.
    pub elements: Vec<LayoutElement>,
}

impl PageLayout {
    /// Create an empty page layout with the given bounding box.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            elements: Vec::new(),
        }
    }

    /// Add a top-level element.
    pub fn push(&mut self, element: LayoutElement) {
        self.elements.push(element);
    }

    /// Check if the page has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Page dimensions as a (width, height) tuple.
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GraphicsColor, LineElement};

    #[test]
    fn test_page_layout() {
        let mut page = PageLayout::new(1, 612.0, 792.0);
        assert!(page.is_empty());
        assert_eq!(page.dimensions(), (612.0, 792.0));

        page.push(LayoutElement::Line(LineElement {
            x0: 0.0,
            y0: 0.0,
            x1: 100.0,
            y1: 0.0,
            line_width: 1.0,
            stroke_color: GraphicsColor::Gray(0.0),
            fill_color: GraphicsColor::Unset,
        }));
        assert_eq!(page.elements.len(), 1);
    }
}
