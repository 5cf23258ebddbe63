//! Low-level page canvas over a lopdf document.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::error::{Error, Result};
use crate::render::BuiltinFont;

/// Canvas building the output document one page at a time.
///
/// The canvas owns the lopdf [`Document`] exclusively; pages already
/// committed with [`end_page`](Self::end_page) survive even if a later
/// page is never finished.
pub struct PageCanvas {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,

    // Per-page state, reset by begin_page.
    ops: Vec<Operation>,
    page_size: (f32, f32),
    in_page: bool,
    page_fonts: HashMap<BuiltinFont, String>,
    page_xobjects: Vec<(String, ObjectId)>,

    // Document-wide registries.
    font_objects: HashMap<BuiltinFont, (String, ObjectId)>,
    image_count: u32,

    current_font: Option<(String, f32)>,
}

impl PageCanvas {
    /// Create a canvas with an empty output document.
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            ops: Vec::new(),
            page_size: (612.0, 792.0),
            in_page: false,
            page_fonts: HashMap::new(),
            page_xobjects: Vec::new(),
            font_objects: HashMap::new(),
            image_count: 0,
            current_font: None,
        }
    }

    /// Start a new page with the given media-box size.
    pub fn begin_page(&mut self, width: f32, height: f32) {
        self.ops.clear();
        self.page_fonts.clear();
        self.page_xobjects.clear();
        self.page_size = (width, height);
        self.current_font = None;
        self.in_page = true;
    }

    /// Number of operations queued for the current page. Used by tests.
    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// Number of pages committed so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    // -- Graphics state -------------------------------------------------------

    /// Select the font and size for subsequent text.
    pub fn set_font(&mut self, font: BuiltinFont, size: f32) {
        let resource = self.register_font(font);
        self.page_fonts.insert(font, resource.clone());
        self.current_font = Some((resource, size));
    }

    pub fn set_stroke_gray(&mut self, gray: f32) {
        self.ops.push(Operation::new("G", vec![gray.into()]));
    }

    pub fn set_fill_gray(&mut self, gray: f32) {
        self.ops.push(Operation::new("g", vec![gray.into()]));
    }

    pub fn set_stroke_rgb(&mut self, r: f32, g: f32, b: f32) {
        self.ops
            .push(Operation::new("RG", vec![r.into(), g.into(), b.into()]));
    }

    pub fn set_fill_rgb(&mut self, r: f32, g: f32, b: f32) {
        self.ops
            .push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.ops.push(Operation::new("w", vec![width.into()]));
    }

    // -- Drawing --------------------------------------------------------------

    /// Draw a text run with its baseline origin at (x, y), using the font
    /// selected by the last [`set_font`](Self::set_font) call.
    pub fn draw_text(&mut self, x: f32, y: f32, text: &str) {
        let (resource, size) = match &self.current_font {
            Some((r, s)) => (r.clone(), *s),
            None => {
                // Callers always set a font first; fall back defensively.
                self.set_font(BuiltinFont::TimesRoman, 12.0);
                let (r, s) = self.current_font.clone().unwrap();
                (r, s)
            }
        };

        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![Object::Name(resource.into_bytes()), size.into()],
        ));
        self.ops.push(Operation::new(
            "Tm",
            vec![
                1f32.into(),
                0f32.into(),
                0f32.into(),
                1f32.into(),
                x.into(),
                y.into(),
            ],
        ));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_pdf_text(text), StringFormat::Literal)],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }

    /// Draw a line segment between two points.
    pub fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        self.ops
            .push(Operation::new("m", vec![x0.into(), y0.into()]));
        self.ops
            .push(Operation::new("l", vec![x1.into(), y1.into()]));
        self.ops.push(Operation::new("S", vec![]));
    }

    /// Draw a rectangle, painted per the stroke/fill flags.
    pub fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, stroke: bool, fill: bool) {
        self.ops.push(Operation::new(
            "re",
            vec![x.into(), y.into(), width.into(), height.into()],
        ));
        self.ops.push(Operation::new(paint_op(stroke, fill), vec![]));
    }

    /// Draw a polyline path through the given points.
    pub fn draw_path(&mut self, points: &[(f32, f32)], stroke: bool, fill: bool) {
        let mut iter = points.iter();
        let Some((x0, y0)) = iter.next() else {
            return;
        };
        self.ops
            .push(Operation::new("m", vec![(*x0).into(), (*y0).into()]));
        for (x, y) in iter {
            self.ops
                .push(Operation::new("l", vec![(*x).into(), (*y).into()]));
        }
        self.ops.push(Operation::new(paint_op(stroke, fill), vec![]));
    }

    /// Embed an RGB raster and draw it at (x, y) scaled to width × height.
    pub fn draw_image_rgb(
        &mut self,
        pixels: &image::RgbImage,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<()> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(pixels.as_raw())?;
        let compressed = encoder
            .finish()
            .map_err(|e| Error::Render(format!("image stream compression failed: {e}")))?;

        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => pixels.width() as i64,
                "Height" => pixels.height() as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            compressed,
        );
        self.place_xobject(stream, x, y, width, height);
        Ok(())
    }

    /// Embed a JPEG payload as-is and draw it at (x, y) scaled to
    /// width × height. `grayscale` selects the declared colorspace.
    pub fn draw_image_jpeg(
        &mut self,
        jpeg: &[u8],
        pixel_width: u32,
        pixel_height: u32,
        grayscale: bool,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) {
        let colorspace = if grayscale { "DeviceGray" } else { "DeviceRGB" };
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => pixel_width as i64,
                "Height" => pixel_height as i64,
                "ColorSpace" => colorspace,
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg.to_vec(),
        );
        self.place_xobject(stream, x, y, width, height);
    }

    // -- Page lifecycle -------------------------------------------------------

    /// Commit the current page to the document.
    pub fn end_page(&mut self) -> Result<()> {
        if !self.in_page {
            return Err(Error::Render("end_page without begin_page".to_string()));
        }
        self.in_page = false;

        let content = Content {
            operations: std::mem::take(&mut self.ops),
        };
        let content_bytes = content
            .encode()
            .map_err(|e| Error::Render(format!("content encoding failed: {e}")))?;
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, content_bytes));

        let mut font_dict = lopdf::Dictionary::new();
        for (font, resource) in &self.page_fonts {
            let object_id = self.font_objects[font].1;
            font_dict.set(resource.as_bytes().to_vec(), Object::Reference(object_id));
        }

        let mut resources = lopdf::Dictionary::new();
        if !font_dict.is_empty() {
            resources.set("Font", Object::Dictionary(font_dict));
        }
        if !self.page_xobjects.is_empty() {
            let mut xobject_dict = lopdf::Dictionary::new();
            for (name, id) in &self.page_xobjects {
                xobject_dict.set(name.as_bytes().to_vec(), Object::Reference(*id));
            }
            resources.set("XObject", Object::Dictionary(xobject_dict));
        }

        let (width, height) = self.page_size;
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0i64.into(), 0i64.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => Object::Dictionary(resources),
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Finalize the document and write it to `path`.
    ///
    /// Consumes the canvas: the page tree, catalog, and trailer are
    /// assembled here, streams are compressed, and the file is flushed.
    pub fn save<P: AsRef<Path>>(mut self, path: P) -> Result<()> {
        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|id| Object::Reference(*id))
            .collect();
        let count = kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();
        self.doc.save(path)?;
        Ok(())
    }

    // -- Internals ------------------------------------------------------------

    /// Ensure a font object exists for the given base font; returns its
    /// page-resource name.
    fn register_font(&mut self, font: BuiltinFont) -> String {
        if let Some((resource, _)) = self.font_objects.get(&font) {
            return resource.clone();
        }
        let resource = format!("F{}", self.font_objects.len());
        let object_id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.postscript_name(),
        });
        self.font_objects
            .insert(font, (resource.clone(), object_id));
        resource
    }

    fn place_xobject(&mut self, stream: Stream, x: f32, y: f32, width: f32, height: f32) {
        let name = format!("Im{}", self.image_count);
        self.image_count += 1;
        let id = self.doc.add_object(stream);
        self.page_xobjects.push((name.clone(), id));

        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "cm",
            vec![
                width.into(),
                0f32.into(),
                0f32.into(),
                height.into(),
                x.into(),
                y.into(),
            ],
        ));
        self.ops
            .push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        self.ops.push(Operation::new("Q", vec![]));
    }
}

impl Default for PageCanvas {
    fn default() -> Self {
        Self::new()
    }
}

/// Choose the path-painting operator for a stroke/fill flag pair.
fn paint_op(stroke: bool, fill: bool) -> &'static str {
    match (stroke, fill) {
        (true, true) => "B",
        (false, true) => "f",
        (true, false) => "S",
        (false, false) => "n",
    }
}

/// Encode text as PDF literal-string bytes.
///
/// The built-in Type1 fonts use a Latin-1-compatible encoding; characters
/// outside it are replaced so the output stays well-formed.
fn encode_pdf_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
        .collect()
}
