//! Page renderer.
//!
//! The orchestrator of the redraw pipeline: walks each page's element
//! tree, suppresses redaction overlays, reconstructs images, and emits
//! draw calls to the output canvas. Text lines collected from text groups
//! are drawn last so recovered content is never obscured by shapes.
//!
//! Every per-element failure is contained here: the element is logged
//! with its kind and page number, skipped, and processing continues.

use std::path::Path;

use crate::error::Result;
use crate::model::{
    CharElement, CurveElement, ImageElement, LayoutElement, LineElement, PageLayout, RectElement,
    TextLineElement,
};
use crate::writer::PageCanvas;

use super::graphics::apply_color_state;
use super::image as raster;
use super::image::ReconstructedImage;
use super::FontResolver;
use super::RenderOptions;

/// Renders parsed page layouts into the output document.
///
/// Owns the output canvas, the font resolver, and the page counter;
/// nothing else mutates them.
pub struct PageRenderer {
    canvas: PageCanvas,
    fonts: FontResolver,
    options: RenderOptions,
    page_count: u32,
}

impl PageRenderer {
    /// Create a renderer with the given options and a fresh output document.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            canvas: PageCanvas::new(),
            fonts: FontResolver::with_default(options.default_font),
            options,
            page_count: 0,
        }
    }

    /// Number of pages committed so far.
    pub fn pages_rendered(&self) -> u32 {
        self.page_count
    }

    /// Render one page: size from the layout's bounding box, non-text
    /// elements in encountered order, then deferred text lines, then commit.
    pub fn render_page(&mut self, layout: &PageLayout) -> Result<()> {
        self.canvas.begin_page(layout.width, layout.height);

        let mut deferred: Vec<&TextLineElement> = Vec::new();
        for element in &layout.elements {
            self.render_element(element, layout.number, &mut deferred, true);
        }

        // Text last so it is never obscured by boxes drawn after it.
        for line in deferred {
            for ch in &line.chars {
                self.draw_char(ch);
            }
        }

        self.canvas.end_page()?;
        self.page_count += 1;
        Ok(())
    }

    /// Finalize the output document and write it to `path`.
    pub fn finish<P: AsRef<Path>>(self, path: P) -> Result<()> {
        self.canvas.save(path)
    }

    fn render_element<'a>(
        &mut self,
        element: &'a LayoutElement,
        page: u32,
        deferred: &mut Vec<&'a TextLineElement>,
        allow_nested: bool,
    ) {
        match element {
            LayoutElement::Char(ch) => self.draw_char(ch),
            LayoutElement::Image(img) => self.draw_image(img, page),
            LayoutElement::Line(line) => self.draw_line(line),
            LayoutElement::Rect(rect) => self.draw_rect(rect, page),
            LayoutElement::Curve(curve) => self.draw_curve(curve),
            LayoutElement::Figure(figure) => {
                if allow_nested {
                    // One level of nesting suffices; deeper figures are
                    // surfaced instead of followed.
                    for child in &figure.children {
                        self.render_element(child, page, deferred, false);
                    }
                } else {
                    log::warn!(
                        "skipping figure {:?} nested beyond one level on page {}",
                        figure.name,
                        page
                    );
                }
            }
            LayoutElement::TextGroup(group) => {
                deferred.extend(group.lines.iter());
            }
            LayoutElement::Unsupported { kind, detail } => {
                log::warn!(
                    "skipping unsupported element on page {}: kind={} {}",
                    page,
                    kind,
                    detail
                );
            }
        }
    }

    fn draw_char(&mut self, ch: &CharElement) {
        let font = self.fonts.resolve(&ch.font_name);
        self.canvas.set_font(font, ch.size);
        apply_color_state(&mut self.canvas, ch.stroke_color, ch.fill_color);
        self.canvas.draw_text(ch.x, ch.y, &ch.text);
    }

    fn draw_line(&mut self, line: &LineElement) {
        self.canvas
            .set_line_width(line.line_width * self.options.line_width_scale);
        apply_color_state(&mut self.canvas, line.stroke_color, line.fill_color);
        self.canvas.draw_line(line.x0, line.y0, line.x1, line.y1);
    }

    fn draw_rect(&mut self, rect: &RectElement, page: u32) {
        if self.options.redaction.is_redaction_overlay(rect) {
            // Policy, not an error: this is the whole point of the tool.
            log::debug!(
                "suppressing redaction overlay on page {}: {}x{} at ({}, {})",
                page,
                rect.width,
                rect.height,
                rect.x,
                rect.y
            );
            return;
        }

        self.canvas
            .set_line_width(rect.line_width * self.options.line_width_scale);
        apply_color_state(&mut self.canvas, rect.stroke_color, rect.fill_color);
        self.canvas.draw_rect(
            rect.x,
            rect.y + self.options.rect_baseline_adjust,
            rect.width,
            rect.height,
            rect.stroke,
            rect.fill,
        );
    }

    fn draw_curve(&mut self, curve: &CurveElement) {
        self.canvas
            .set_line_width(curve.line_width * self.options.line_width_scale);
        apply_color_state(&mut self.canvas, curve.stroke_color, curve.fill_color);
        self.canvas
            .draw_path(&curve.points, curve.stroke, curve.fill);
    }

    fn draw_image(&mut self, img: &ImageElement, page: u32) {
        match self.try_draw_image(img) {
            Ok(true) => {}
            Ok(false) => {
                // Blank rejection is policy, never a failure.
                log::debug!("omitting blank image {:?} on page {}", img.name, page);
            }
            Err(e) => {
                log::warn!(
                    "skipping image {:?} on page {} ({}x{}, {} bpp): {}",
                    img.name,
                    page,
                    img.pixel_width,
                    img.pixel_height,
                    img.bits,
                    e
                );
            }
        }
    }

    /// Reconstruct, blank-check, and draw one image.
    /// Returns Ok(false) when the image was rejected as blank.
    fn try_draw_image(&mut self, img: &ImageElement) -> Result<bool> {
        let reconstructed = raster::reconstruct(img)?;
        let decoded = raster::decode(&reconstructed)?;

        if raster::is_blank(&decoded) {
            return Ok(false);
        }

        match reconstructed {
            ReconstructedImage::Jpeg(bytes) => {
                let grayscale = decoded.color().channel_count() == 1;
                self.canvas.draw_image_jpeg(
                    &bytes,
                    decoded.width(),
                    decoded.height(),
                    grayscale,
                    img.x,
                    img.y,
                    img.width,
                    img.height,
                );
            }
            _ => {
                self.canvas
                    .draw_image_rgb(&decoded.to_rgb8(), img.x, img.y, img.width, img.height)?;
            }
        }
        Ok(true)
    }
}
