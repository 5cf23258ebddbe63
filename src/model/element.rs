//! Drawable layout elements.

use serde::{Deserialize, Serialize};

use super::GraphicsColor;

/// One drawable unit on a page, as produced by the layout parser.
///
/// The set of variants is closed; the renderer matches exhaustively.
/// Constructs the parser recognizes but cannot classify arrive as
/// [`LayoutElement::Unsupported`] so the renderer can surface a
/// diagnostic instead of silently dropping them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayoutElement {
    /// A single positioned glyph run.
    Char(CharElement),
    /// An embedded raster image.
    Image(ImageElement),
    /// A stroked line segment.
    Line(LineElement),
    /// An axis-aligned rectangle.
    Rect(RectElement),
    /// A path with more than two points.
    Curve(CurveElement),
    /// A container with one level of nested elements.
    Figure(FigureElement),
    /// A group of text lines, drawn after all other content.
    TextGroup(TextGroupElement),
    /// A recognized but unclassifiable construct (inline image, shading...).
    Unsupported { kind: String, detail: String },
}

impl LayoutElement {
    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &str {
        match self {
            LayoutElement::Char(_) => "Char",
            LayoutElement::Image(_) => "Image",
            LayoutElement::Line(_) => "Line",
            LayoutElement::Rect(_) => "Rect",
            LayoutElement::Curve(_) => "Curve",
            LayoutElement::Figure(_) => "Figure",
            LayoutElement::TextGroup(_) => "TextGroup",
            LayoutElement::Unsupported { kind, .. } => kind,
        }
    }
}

/// A glyph run with its font and recorded color state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharElement {
    /// Raw font name as recorded in the document (possibly subset-prefixed).
    pub font_name: String,
    /// Point size.
    pub size: f32,
    /// Baseline origin.
    pub x: f32,
    pub y: f32,
    /// One or more glyphs of decoded text.
    pub text: String,
    pub stroke_color: GraphicsColor,
    pub fill_color: GraphicsColor,
}

/// Colorspace tag of an embedded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorSpace {
    Gray,
    Rgb,
    Cmyk,
    Other(String),
}

/// An embedded raster image with its raw stream bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    /// Stable resource name (diagnostics identify images by it).
    pub name: String,
    /// Placement on the page.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Source raster dimensions in pixels.
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Declared bits per component.
    pub bits: u8,
    pub colorspace: ColorSpace,
    /// True when the declared filter chain is DCT/JPEG.
    pub dct_encoded: bool,
    /// Raw stream bytes: the JPEG payload for DCT images, the decoded
    /// (post-filter) bytes otherwise.
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// A stroked line segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineElement {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub line_width: f32,
    pub stroke_color: GraphicsColor,
    pub fill_color: GraphicsColor,
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectElement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: bool,
    pub stroke: bool,
    pub line_width: f32,
    pub stroke_color: GraphicsColor,
    pub fill_color: GraphicsColor,
}

/// A path with an ordered point sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveElement {
    /// Ordered points; the first is the path origin.
    pub points: Vec<(f32, f32)>,
    pub fill: bool,
    pub stroke: bool,
    pub line_width: f32,
    pub stroke_color: GraphicsColor,
    pub fill_color: GraphicsColor,
}

/// A container element; images typically arrive nested inside figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureElement {
    /// Resource name of the form XObject this figure came from.
    pub name: String,
    pub children: Vec<LayoutElement>,
}

/// One line of text: a run of characters sharing a baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLineElement {
    pub chars: Vec<CharElement>,
}

/// A group of text lines collected from one text object.
///
/// The renderer defers these until every non-text element on the page has
/// been drawn, so recovered text is never obscured by boxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextGroupElement {
    pub lines: Vec<TextLineElement>,
}
