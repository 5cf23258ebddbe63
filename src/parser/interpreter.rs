//! Content-stream interpreter.
//!
//! Walks a page's operator stream with a small graphics-state machine and
//! emits the element tree the renderer consumes. Path construction is
//! classified at paint time: a single `re` becomes a rectangle, a
//! two-point path a line, anything longer a curve. Text objects become
//! one text group each, split into lines at baseline moves. Form XObjects
//! are followed one level deep; constructs the interpreter recognizes but
//! does not classify (inline images, shading) come out as `Unsupported`.

use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Dictionary, Object, ObjectId, Stream};

use crate::error::{Error, Result};
use crate::model::{
    CharElement, ColorSpace, CurveElement, FigureElement, GraphicsColor, ImageElement,
    LayoutElement, LineElement, PageLayout, RectElement, TextGroupElement, TextLineElement,
};

use super::backend::{stream_bytes, DocumentReader};

/// Form XObjects deeper than this are surfaced, not followed.
const MAX_FIGURE_DEPTH: u8 = 1;

/// A 2D affine transform in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translation(tx: f32, ty: f32) -> Matrix {
        Matrix {
            e: tx,
            f: ty,
            ..Matrix::IDENTITY
        }
    }

    /// Compose: apply `self` first, then `after`.
    fn then(&self, after: &Matrix) -> Matrix {
        Matrix {
            a: self.a * after.a + self.b * after.c,
            b: self.a * after.b + self.b * after.d,
            c: self.c * after.a + self.d * after.c,
            d: self.c * after.b + self.d * after.d,
            e: self.e * after.a + self.f * after.c + after.e,
            f: self.e * after.b + self.f * after.d + after.f,
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }
}

/// The subset of PDF graphics state the element tree records.
#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    ctm: Matrix,
    stroke_color: GraphicsColor,
    fill_color: GraphicsColor,
    line_width: f32,
}

impl GraphicsState {
    fn new(ctm: Matrix) -> Self {
        Self {
            ctm,
            stroke_color: GraphicsColor::Unset,
            fill_color: GraphicsColor::Unset,
            line_width: 1.0,
        }
    }
}

/// Resources visible to one content stream.
struct ResourceSet<'a> {
    fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
    xobjects: Option<&'a Dictionary>,
}

/// Per-text-object state between `BT` and `ET`.
struct TextState<'a> {
    text_matrix: Matrix,
    line_matrix: Matrix,
    font_dict: Option<&'a Dictionary>,
    font_name: String,
    size: f32,
    leading: f32,
    current_line: Vec<CharElement>,
    lines: Vec<TextLineElement>,
}

impl<'a> TextState<'a> {
    fn new() -> Self {
        Self {
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            font_dict: None,
            font_name: String::new(),
            size: 12.0,
            leading: 0.0,
            current_line: Vec::new(),
            lines: Vec::new(),
        }
    }

    fn break_line(&mut self) {
        if !self.current_line.is_empty() {
            self.lines.push(TextLineElement {
                chars: std::mem::take(&mut self.current_line),
            });
        }
    }
}

/// Turns content streams into element trees.
pub struct LayoutInterpreter<'a> {
    reader: &'a DocumentReader,
}

impl<'a> LayoutInterpreter<'a> {
    pub fn new(reader: &'a DocumentReader) -> Self {
        Self { reader }
    }

    /// Interpret one page into a layout tree.
    pub fn interpret_page(&self, page_id: ObjectId, number: u32) -> Result<PageLayout> {
        let (width, height) = self.reader.page_dimensions(page_id);
        let content = self.reader.page_content(page_id)?;

        let resources = ResourceSet {
            fonts: self.reader.page_fonts(page_id),
            xobjects: self.reader.page_xobjects(page_id),
        };

        let mut layout = PageLayout::new(number, width, height);
        layout.elements = self.run(&content, &resources, Matrix::IDENTITY, 0)?;
        Ok(layout)
    }

    /// Walk one operator stream and collect elements.
    fn run(
        &self,
        content: &[u8],
        res: &ResourceSet<'a>,
        base_ctm: Matrix,
        depth: u8,
    ) -> Result<Vec<LayoutElement>> {
        let content =
            Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut elements = Vec::new();
        let mut gs = GraphicsState::new(base_ctm);
        let mut gs_stack: Vec<GraphicsState> = Vec::new();

        // Path points in user space; transformed at paint time.
        let mut path: Vec<(f32, f32)> = Vec::new();
        // Set while the path is exactly one `re`.
        let mut rect_candidate: Option<(f32, f32, f32, f32)> = None;

        let mut text: Option<TextState<'a>> = None;

        for op in &content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                // --- graphics state ---
                "q" => gs_stack.push(gs),
                "Q" => gs = gs_stack.pop().unwrap_or_else(|| GraphicsState::new(base_ctm)),
                "cm" => {
                    let m = matrix_from_operands(operands);
                    gs.ctm = m.then(&gs.ctm);
                }
                "w" => gs.line_width = num(operands, 0),

                // --- color ---
                "g" => gs.fill_color = GraphicsColor::Gray(num(operands, 0)),
                "G" => gs.stroke_color = GraphicsColor::Gray(num(operands, 0)),
                "rg" => {
                    gs.fill_color =
                        GraphicsColor::Rgb(num(operands, 0), num(operands, 1), num(operands, 2))
                }
                "RG" => {
                    gs.stroke_color =
                        GraphicsColor::Rgb(num(operands, 0), num(operands, 1), num(operands, 2))
                }
                "k" => {
                    gs.fill_color = GraphicsColor::from_cmyk(
                        num(operands, 0),
                        num(operands, 1),
                        num(operands, 2),
                        num(operands, 3),
                    )
                }
                "K" => {
                    gs.stroke_color = GraphicsColor::from_cmyk(
                        num(operands, 0),
                        num(operands, 1),
                        num(operands, 2),
                        num(operands, 3),
                    )
                }
                "sc" | "scn" => {
                    if let Some(color) = color_from_components(operands) {
                        gs.fill_color = color;
                    }
                }
                "SC" | "SCN" => {
                    if let Some(color) = color_from_components(operands) {
                        gs.stroke_color = color;
                    }
                }

                // --- path construction ---
                "m" => {
                    rect_candidate = None;
                    path.push((num(operands, 0), num(operands, 1)));
                }
                "l" => {
                    rect_candidate = None;
                    path.push((num(operands, 0), num(operands, 1)));
                }
                "c" => {
                    rect_candidate = None;
                    path.push((num(operands, 0), num(operands, 1)));
                    path.push((num(operands, 2), num(operands, 3)));
                    path.push((num(operands, 4), num(operands, 5)));
                }
                "v" | "y" => {
                    rect_candidate = None;
                    path.push((num(operands, 0), num(operands, 1)));
                    path.push((num(operands, 2), num(operands, 3)));
                }
                "h" => {
                    rect_candidate = None;
                    if let Some(&first) = path.first() {
                        path.push(first);
                    }
                }
                "re" => {
                    let (x, y, w, h) =
                        (num(operands, 0), num(operands, 1), num(operands, 2), num(operands, 3));
                    rect_candidate = if path.is_empty() {
                        Some((x, y, w, h))
                    } else {
                        None
                    };
                    path.push((x, y));
                    path.push((x + w, y));
                    path.push((x + w, y + h));
                    path.push((x, y + h));
                    path.push((x, y));
                }

                // --- path painting ---
                "S" | "s" | "f" | "F" | "f*" | "B" | "B*" | "b" | "b*" => {
                    let stroke = matches!(op.operator.as_str(), "S" | "s" | "B" | "B*" | "b" | "b*");
                    let fill = matches!(op.operator.as_str(), "f" | "F" | "f*" | "B" | "B*" | "b" | "b*");
                    if let Some(element) =
                        classify_path(&path, rect_candidate, &gs, stroke, fill)
                    {
                        elements.push(element);
                    }
                    path.clear();
                    rect_candidate = None;
                }
                "n" => {
                    path.clear();
                    rect_candidate = None;
                }
                "W" | "W*" => {} // clip; the following paint op clears the path

                // --- text ---
                "BT" => text = Some(TextState::new()),
                "ET" => {
                    if let Some(mut ts) = text.take() {
                        ts.break_line();
                        if !ts.lines.is_empty() {
                            elements.push(LayoutElement::TextGroup(TextGroupElement {
                                lines: ts.lines,
                            }));
                        }
                    }
                }
                "Tf" => {
                    if let Some(ts) = text.as_mut() {
                        let resource_name =
                            operands.first().and_then(|o| o.as_name().ok()).unwrap_or(b"");
                        ts.font_dict = res.fonts.get(resource_name).copied();
                        ts.font_name = base_font_name(ts.font_dict, resource_name);
                        ts.size = num(operands, 1);
                    }
                }
                "TL" => {
                    if let Some(ts) = text.as_mut() {
                        ts.leading = num(operands, 0);
                    }
                }
                "Td" => {
                    if let Some(ts) = text.as_mut() {
                        let (tx, ty) = (num(operands, 0), num(operands, 1));
                        if ty != 0.0 {
                            ts.break_line();
                        }
                        ts.line_matrix = Matrix::translation(tx, ty).then(&ts.line_matrix);
                        ts.text_matrix = ts.line_matrix;
                    }
                }
                "TD" => {
                    if let Some(ts) = text.as_mut() {
                        let (tx, ty) = (num(operands, 0), num(operands, 1));
                        ts.leading = -ty;
                        ts.break_line();
                        ts.line_matrix = Matrix::translation(tx, ty).then(&ts.line_matrix);
                        ts.text_matrix = ts.line_matrix;
                    }
                }
                "Tm" => {
                    if let Some(ts) = text.as_mut() {
                        ts.break_line();
                        ts.line_matrix = matrix_from_operands(operands);
                        ts.text_matrix = ts.line_matrix;
                    }
                }
                "T*" => {
                    if let Some(ts) = text.as_mut() {
                        ts.break_line();
                        ts.line_matrix =
                            Matrix::translation(0.0, -ts.leading).then(&ts.line_matrix);
                        ts.text_matrix = ts.line_matrix;
                    }
                }
                "Tj" => {
                    if let Some(ts) = text.as_mut() {
                        if let Some(Object::String(bytes, _)) = operands.first() {
                            self.emit_text(ts, &gs, bytes);
                        }
                    }
                }
                "'" => {
                    if let Some(ts) = text.as_mut() {
                        ts.break_line();
                        ts.line_matrix =
                            Matrix::translation(0.0, -ts.leading).then(&ts.line_matrix);
                        ts.text_matrix = ts.line_matrix;
                        if let Some(Object::String(bytes, _)) = operands.first() {
                            self.emit_text(ts, &gs, bytes);
                        }
                    }
                }
                "\"" => {
                    if let Some(ts) = text.as_mut() {
                        ts.break_line();
                        ts.line_matrix =
                            Matrix::translation(0.0, -ts.leading).then(&ts.line_matrix);
                        ts.text_matrix = ts.line_matrix;
                        if let Some(Object::String(bytes, _)) = operands.get(2) {
                            self.emit_text(ts, &gs, bytes);
                        }
                    }
                }
                "TJ" => {
                    if let Some(ts) = text.as_mut() {
                        if let Some(Object::Array(items)) = operands.first() {
                            for item in items {
                                match item {
                                    Object::String(bytes, _) => self.emit_text(ts, &gs, bytes),
                                    _ => {
                                        if let Ok(adj) = item.as_float() {
                                            let dx = -adj / 1000.0 * ts.size;
                                            ts.text_matrix =
                                                Matrix::translation(dx, 0.0).then(&ts.text_matrix);
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                // --- XObjects ---
                "Do" => {
                    let name = operands.first().and_then(|o| o.as_name().ok()).unwrap_or(b"");
                    let name_str = String::from_utf8_lossy(name).into_owned();
                    match self.lookup_xobject(res, name) {
                        Some(stream) => {
                            elements.push(self.xobject_element(name_str, stream, &gs, depth));
                        }
                        None => elements.push(LayoutElement::Unsupported {
                            kind: "XObject".to_string(),
                            detail: format!("unresolved resource /{name_str}"),
                        }),
                    }
                }
                "BI" => elements.push(LayoutElement::Unsupported {
                    kind: "InlineImage".to_string(),
                    detail: "BI/ID/EI sequence".to_string(),
                }),
                "sh" => elements.push(LayoutElement::Unsupported {
                    kind: "Shading".to_string(),
                    detail: format!(
                        "sh /{}",
                        operands
                            .first()
                            .and_then(|o| o.as_name().ok())
                            .map(|n| String::from_utf8_lossy(n).into_owned())
                            .unwrap_or_default()
                    ),
                }),

                // Spacing, rendering-mode, marked-content and device
                // operators have no bearing on the element tree.
                _ => {}
            }
        }

        Ok(elements)
    }

    /// Decode one shown string and append it to the current line.
    fn emit_text(&self, ts: &mut TextState<'a>, gs: &GraphicsState, bytes: &[u8]) {
        let decoded = self.reader.decode_text(ts.font_dict, bytes);
        if decoded.is_empty() {
            return;
        }

        let (x, y) = gs.ctm.apply(ts.text_matrix.e, ts.text_matrix.f);
        ts.current_line.push(CharElement {
            font_name: ts.font_name.clone(),
            size: ts.size,
            x,
            y,
            text: decoded.clone(),
            stroke_color: gs.stroke_color,
            fill_color: gs.fill_color,
        });

        // No glyph metrics without embedded font programs; a half-em per
        // glyph keeps successive runs from stacking on one origin.
        let advance = 0.5 * ts.size * decoded.chars().count() as f32;
        ts.text_matrix = Matrix::translation(advance, 0.0).then(&ts.text_matrix);
    }

    fn lookup_xobject(&self, res: &ResourceSet<'a>, name: &[u8]) -> Option<&'a Stream> {
        let xobjects = res.xobjects?;
        self.reader.resolve_stream(xobjects.get(name).ok()?)
    }

    /// Classify a referenced XObject as an image, a one-level figure, or
    /// an unsupported construct.
    fn xobject_element(
        &self,
        name: String,
        stream: &'a Stream,
        gs: &GraphicsState,
        depth: u8,
    ) -> LayoutElement {
        let subtype = stream
            .dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .unwrap_or(b"");

        match subtype {
            b"Image" => LayoutElement::Image(self.image_element(name, stream, gs)),
            b"Form" => {
                if depth >= MAX_FIGURE_DEPTH {
                    return LayoutElement::Figure(FigureElement {
                        name,
                        children: Vec::new(),
                    });
                }
                let form_ctm = form_matrix(stream).then(&gs.ctm);
                let form_res = self.form_resources(stream);
                let children = stream_bytes(stream)
                    .and_then(|content| self.run(&content, &form_res, form_ctm, depth + 1))
                    .unwrap_or_else(|e| {
                        log::warn!("failed to interpret form XObject /{name}: {e}");
                        Vec::new()
                    });
                LayoutElement::Figure(FigureElement { name, children })
            }
            other => LayoutElement::Unsupported {
                kind: "XObject".to_string(),
                detail: format!(
                    "/{} has subtype {}",
                    name,
                    String::from_utf8_lossy(other)
                ),
            },
        }
    }

    /// Build an image element from an image XObject stream. Placement is
    /// the CTM's image of the unit square.
    fn image_element(&self, name: String, stream: &'a Stream, gs: &GraphicsState) -> ImageElement {
        let dict = &stream.dict;

        let pixel_width = dict
            .get(b"Width")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(0) as u32;
        let pixel_height = dict
            .get(b"Height")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(0) as u32;
        let bits = dict
            .get(b"BitsPerComponent")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(8) as u8;

        let colorspace = dict
            .get(b"ColorSpace")
            .ok()
            .map(|o| self.parse_colorspace(o))
            .unwrap_or(ColorSpace::Other("missing".to_string()));

        let filters = filter_names(dict);
        let dct_encoded = filters.iter().any(|f| f == "DCTDecode" || f == "DCT");

        // DCT payloads stay as-is for passthrough; everything else is
        // decoded to raw samples here.
        let data = if dct_encoded {
            stream.content.clone()
        } else {
            stream_bytes(stream).unwrap_or_else(|_| stream.content.clone())
        };

        let (x0, y0) = gs.ctm.apply(0.0, 0.0);
        let (x1, y1) = gs.ctm.apply(1.0, 1.0);

        ImageElement {
            name,
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
            pixel_width,
            pixel_height,
            bits,
            colorspace,
            dct_encoded,
            data,
        }
    }

    fn parse_colorspace(&self, obj: &Object) -> ColorSpace {
        match obj {
            Object::Reference(r) => match self.reader.raw_doc().get_object(*r) {
                Ok(resolved) => self.parse_colorspace(resolved),
                Err(_) => ColorSpace::Other("unresolved".to_string()),
            },
            Object::Name(name) => colorspace_from_name(name),
            Object::Array(arr) => {
                let family = arr.first().and_then(|o| o.as_name().ok()).unwrap_or(b"");
                if family == b"ICCBased" {
                    if let Some(profile) =
                        arr.get(1).and_then(|o| self.reader.resolve_stream(o))
                    {
                        return match profile
                            .dict
                            .get(b"N")
                            .ok()
                            .and_then(|o| o.as_i64().ok())
                        {
                            Some(1) => ColorSpace::Gray,
                            Some(3) => ColorSpace::Rgb,
                            Some(4) => ColorSpace::Cmyk,
                            _ => ColorSpace::Other("ICCBased".to_string()),
                        };
                    }
                }
                colorspace_from_name(family)
            }
            _ => ColorSpace::Other("unknown".to_string()),
        }
    }

    /// Resources declared by a form XObject; absent entries fall back to
    /// nothing rather than the page's resources.
    fn form_resources(&self, stream: &'a Stream) -> ResourceSet<'a> {
        let mut fonts = BTreeMap::new();
        let mut xobjects = None;

        if let Some(resources) = stream
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|o| self.reader.resolve_dict(o))
        {
            if let Some(font_dict) = resources
                .get(b"Font")
                .ok()
                .and_then(|o| self.reader.resolve_dict(o))
            {
                for (name, value) in font_dict.iter() {
                    if let Some(d) = self.reader.resolve_dict(value) {
                        fonts.insert(name.clone(), d);
                    }
                }
            }
            xobjects = resources
                .get(b"XObject")
                .ok()
                .and_then(|o| self.reader.resolve_dict(o));
        }

        ResourceSet { fonts, xobjects }
    }
}

/// Numeric operand at `index`, defaulting to zero.
fn num(operands: &[Object], index: usize) -> f32 {
    operands
        .get(index)
        .and_then(|o| o.as_float().ok())
        .unwrap_or(0.0)
}

fn matrix_from_operands(operands: &[Object]) -> Matrix {
    Matrix {
        a: num(operands, 0),
        b: num(operands, 1),
        c: num(operands, 2),
        d: num(operands, 3),
        e: num(operands, 4),
        f: num(operands, 5),
    }
}

/// Map `sc`/`scn` components by arity; pattern names leave the color
/// unchanged.
fn color_from_components(operands: &[Object]) -> Option<GraphicsColor> {
    let nums: Vec<f32> = operands.iter().filter_map(|o| o.as_float().ok()).collect();
    if nums.len() != operands.len() {
        return None;
    }
    match nums.as_slice() {
        [g] => Some(GraphicsColor::Gray(*g)),
        [r, g, b] => Some(GraphicsColor::Rgb(*r, *g, *b)),
        [c, m, y, k] => Some(GraphicsColor::from_cmyk(*c, *m, *y, *k)),
        _ => None,
    }
}

fn base_font_name(font_dict: Option<&Dictionary>, resource_name: &[u8]) -> String {
    font_dict
        .and_then(|d| d.get(b"BaseFont").ok())
        .and_then(|o| o.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).into_owned())
        .unwrap_or_else(|| String::from_utf8_lossy(resource_name).into_owned())
}

fn filter_names(dict: &Dictionary) -> Vec<String> {
    match dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![String::from_utf8_lossy(name).into_owned()],
        Ok(Object::Array(arr)) => arr
            .iter()
            .filter_map(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).into_owned())
            .collect(),
        _ => Vec::new(),
    }
}

fn colorspace_from_name(name: &[u8]) -> ColorSpace {
    match name {
        b"DeviceGray" | b"CalGray" | b"G" => ColorSpace::Gray,
        b"DeviceRGB" | b"CalRGB" | b"RGB" => ColorSpace::Rgb,
        b"DeviceCMYK" | b"CMYK" => ColorSpace::Cmyk,
        other => ColorSpace::Other(String::from_utf8_lossy(other).into_owned()),
    }
}

/// Classify the accumulated path at paint time.
fn classify_path(
    path: &[(f32, f32)],
    rect_candidate: Option<(f32, f32, f32, f32)>,
    gs: &GraphicsState,
    stroke: bool,
    fill: bool,
) -> Option<LayoutElement> {
    if let Some((x, y, w, h)) = rect_candidate {
        let (x0, y0) = gs.ctm.apply(x, y);
        let (x1, y1) = gs.ctm.apply(x + w, y + h);
        return Some(LayoutElement::Rect(RectElement {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
            fill,
            stroke,
            line_width: gs.line_width,
            stroke_color: gs.stroke_color,
            fill_color: gs.fill_color,
        }));
    }

    match path.len() {
        0 | 1 => None,
        2 => {
            let (x0, y0) = gs.ctm.apply(path[0].0, path[0].1);
            let (x1, y1) = gs.ctm.apply(path[1].0, path[1].1);
            Some(LayoutElement::Line(LineElement {
                x0,
                y0,
                x1,
                y1,
                line_width: gs.line_width,
                stroke_color: gs.stroke_color,
                fill_color: gs.fill_color,
            }))
        }
        _ => Some(LayoutElement::Curve(CurveElement {
            points: path.iter().map(|&(x, y)| gs.ctm.apply(x, y)).collect(),
            fill,
            stroke,
            line_width: gs.line_width,
            stroke_color: gs.stroke_color,
            fill_color: gs.fill_color,
        })),
    }
}

/// A form XObject's own /Matrix entry, identity when absent.
fn form_matrix(stream: &Stream) -> Matrix {
    if let Ok(Object::Array(arr)) = stream.dict.get(b"Matrix") {
        if arr.len() >= 6 {
            return matrix_from_operands(arr);
        }
    }
    Matrix::IDENTITY
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::Document as LopdfDocument;

    fn interpreter_fixture() -> DocumentReader {
        DocumentReader::from_document(LopdfDocument::with_version("1.5"))
    }

    fn empty_resources() -> ResourceSet<'static> {
        ResourceSet {
            fonts: BTreeMap::new(),
            xobjects: None,
        }
    }

    fn run_stream(content: &[u8]) -> Vec<LayoutElement> {
        let reader = interpreter_fixture();
        let interp = LayoutInterpreter::new(&reader);
        interp
            .run(content, &empty_resources(), Matrix::IDENTITY, 0)
            .unwrap()
    }

    #[test]
    fn test_matrix_compose_and_apply() {
        let scale = Matrix {
            a: 2.0,
            b: 0.0,
            c: 0.0,
            d: 2.0,
            e: 0.0,
            f: 0.0,
        };
        let translate = Matrix::translation(10.0, 5.0);

        // Scale first, then translate.
        let m = scale.then(&translate);
        assert_eq!(m.apply(3.0, 4.0), (16.0, 13.0));
    }

    #[test]
    fn test_filled_re_becomes_rect() {
        let elements = run_stream(b"0 g 10 700 200 20 re f\n");
        assert_eq!(elements.len(), 1);
        match &elements[0] {
            LayoutElement::Rect(rect) => {
                assert_eq!(rect.x, 10.0);
                assert_eq!(rect.y, 700.0);
                assert_eq!(rect.width, 200.0);
                assert_eq!(rect.height, 20.0);
                assert!(rect.fill);
                assert!(!rect.stroke);
                assert_eq!(rect.fill_color, GraphicsColor::Gray(0.0));
            }
            other => panic!("expected rect, got {}", other.kind()),
        }
    }

    #[test]
    fn test_ctm_scales_rect() {
        let elements = run_stream(b"q 2 0 0 2 0 0 cm 0 0 10 10 re f Q\n");
        match &elements[0] {
            LayoutElement::Rect(rect) => {
                assert_eq!(rect.width, 20.0);
                assert_eq!(rect.height, 20.0);
            }
            other => panic!("expected rect, got {}", other.kind()),
        }
    }

    #[test]
    fn test_two_point_path_becomes_line() {
        let elements = run_stream(b"1 0 0 RG 100 100 m 200 150 l S\n");
        match &elements[0] {
            LayoutElement::Line(line) => {
                assert_eq!((line.x0, line.y0), (100.0, 100.0));
                assert_eq!((line.x1, line.y1), (200.0, 150.0));
                assert_eq!(line.stroke_color, GraphicsColor::Rgb(1.0, 0.0, 0.0));
            }
            other => panic!("expected line, got {}", other.kind()),
        }
    }

    #[test]
    fn test_bezier_path_becomes_curve() {
        let elements = run_stream(b"0 0 m 10 20 30 40 50 60 c S\n");
        match &elements[0] {
            LayoutElement::Curve(curve) => {
                assert_eq!(curve.points.len(), 4);
                assert!(curve.stroke);
                assert!(!curve.fill);
            }
            other => panic!("expected curve, got {}", other.kind()),
        }
    }

    #[test]
    fn test_no_op_path_emits_nothing() {
        assert!(run_stream(b"10 10 m n\n").is_empty());
    }

    #[test]
    fn test_text_object_becomes_group() {
        let elements = run_stream(b"BT /F1 14 Tf 72 700 Td (Hello) Tj 0 -20 Td (World) Tj ET\n");
        assert_eq!(elements.len(), 1);
        match &elements[0] {
            LayoutElement::TextGroup(group) => {
                assert_eq!(group.lines.len(), 2);
                assert_eq!(group.lines[0].chars[0].text, "Hello");
                assert_eq!(group.lines[0].chars[0].x, 72.0);
                assert_eq!(group.lines[0].chars[0].y, 700.0);
                assert_eq!(group.lines[0].chars[0].size, 14.0);
                assert_eq!(group.lines[1].chars[0].text, "World");
                assert_eq!(group.lines[1].chars[0].y, 680.0);
            }
            other => panic!("expected text group, got {}", other.kind()),
        }
    }

    #[test]
    fn test_empty_text_object_emits_nothing() {
        assert!(run_stream(b"BT /F1 12 Tf ET\n").is_empty());
    }

    #[test]
    fn test_text_color_recorded_from_state() {
        let elements = run_stream(b"0.2 0.4 0.6 rg BT /F1 12 Tf 10 10 Td (x) Tj ET\n");
        match &elements[0] {
            LayoutElement::TextGroup(group) => {
                assert_eq!(
                    group.lines[0].chars[0].fill_color,
                    GraphicsColor::Rgb(0.2, 0.4, 0.6)
                );
            }
            other => panic!("expected text group, got {}", other.kind()),
        }
    }

    #[test]
    fn test_shading_surfaces_as_unsupported() {
        let elements = run_stream(b"/Sh0 sh\n");
        match &elements[0] {
            LayoutElement::Unsupported { kind, .. } => assert_eq!(kind, "Shading"),
            other => panic!("expected unsupported, got {}", other.kind()),
        }
    }

    #[test]
    fn test_unresolved_xobject_surfaces_as_unsupported() {
        let elements = run_stream(b"/Im0 Do\n");
        match &elements[0] {
            LayoutElement::Unsupported { kind, detail } => {
                assert_eq!(kind, "XObject");
                assert!(detail.contains("Im0"));
            }
            other => panic!("expected unsupported, got {}", other.kind()),
        }
    }

    #[test]
    fn test_state_restore_on_q() {
        let elements = run_stream(b"q 1 1 1 rg Q 0 0 50 5 re f\n");
        match &elements[0] {
            // The white fill was pushed and popped; the paint sees Unset.
            LayoutElement::Rect(rect) => {
                assert_eq!(rect.fill_color, GraphicsColor::Unset)
            }
            other => panic!("expected rect, got {}", other.kind()),
        }
    }

    #[test]
    fn test_colorspace_names() {
        assert_eq!(colorspace_from_name(b"DeviceRGB"), ColorSpace::Rgb);
        assert_eq!(colorspace_from_name(b"CalGray"), ColorSpace::Gray);
        assert_eq!(colorspace_from_name(b"DeviceCMYK"), ColorSpace::Cmyk);
        assert_eq!(
            colorspace_from_name(b"Indexed"),
            ColorSpace::Other("Indexed".to_string())
        );
    }

    #[test]
    fn test_cmyk_stroke_operator() {
        let elements = run_stream(b"0 0 0 1 K 0 0 m 10 10 l S\n");
        match &elements[0] {
            LayoutElement::Line(line) => {
                assert_eq!(line.stroke_color, GraphicsColor::Rgb(0.0, 0.0, 0.0));
            }
            other => panic!("expected line, got {}", other.kind()),
        }
    }
}
