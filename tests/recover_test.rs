//! End-to-end recovery tests over synthetic documents.
//!
//! Each test assembles a small PDF with lopdf, runs the full pipeline,
//! and inspects the rebuilt document.

use std::fs;
use std::path::PathBuf;

use lopdf::{dictionary, Document, Object, Stream};
use tempfile::TempDir;

use unredact::{
    extract_layouts, unredact_bytes, unredact_file, GraphicsColor, LayoutElement, ParseOptions,
    UnredactOptions,
};

/// Build a one-page PDF whose content stream is `content_ops`, with a
/// Helvetica font registered as /F1.
fn build_pdf(content_ops: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content_ops.as_bytes().to_vec(),
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![0i64.into(), 0i64.into(), 612i64.into(), 792i64.into()],
        "Contents" => Object::Reference(content_id),
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        },
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("save synthetic pdf");
    buf
}

fn write_input(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

/// Text painted first, then a black cover box over it: the classic weak
/// redaction. The rebuilt page must carry the text and not the box.
#[test]
fn test_covered_text_is_recovered() {
    let dir = TempDir::new().unwrap();
    let pdf = build_pdf(
        "BT /F1 12 Tf 60 700 Td (SECRET) Tj ET\n\
         q 0 g 50 690 200 30 re f Q\n",
    );
    let input = write_input(&dir, "memo.pdf", &pdf);

    let output = unredact_file(&input, None, UnredactOptions::default()).unwrap();
    assert_eq!(output, dir.path().join("memo-unredacted.pdf"));

    // The recovered text is really in the output document.
    let text = Document::load(&output)
        .unwrap()
        .extract_text(&[1])
        .unwrap();
    assert!(text.contains("SECRET"), "recovered text missing: {text:?}");

    // And the cover box is gone.
    let layouts = extract_layouts(&output, ParseOptions::default()).unwrap();
    let rects = layouts[0]
        .elements
        .iter()
        .filter(|e| matches!(e, LayoutElement::Rect(_)))
        .count();
    assert_eq!(rects, 0, "cover box survived the rebuild");
}

/// A white box is decoration, not a redaction; it must be redrawn.
#[test]
fn test_white_box_is_redrawn() {
    let dir = TempDir::new().unwrap();
    let pdf = build_pdf("q 1 1 1 rg 50 400 100 50 re f Q\n");
    let input = write_input(&dir, "boxes.pdf", &pdf);

    let output = unredact_file(&input, None, UnredactOptions::default()).unwrap();
    let layouts = extract_layouts(&output, ParseOptions::default()).unwrap();

    let white_rect = layouts[0].elements.iter().any(|e| {
        matches!(e, LayoutElement::Rect(r)
            if r.fill && r.fill_color == GraphicsColor::Rgb(1.0, 1.0, 1.0))
    });
    assert!(white_rect, "decorative white box was dropped");
}

/// Thin black rules (underlines) sit below the cover-height threshold.
#[test]
fn test_thin_black_rule_is_redrawn() {
    let dir = TempDir::new().unwrap();
    let pdf = build_pdf("q 0 g 50 398 200 1 re f Q\n");
    let input = write_input(&dir, "rules.pdf", &pdf);

    let output = unredact_file(&input, None, UnredactOptions::default()).unwrap();
    let layouts = extract_layouts(&output, ParseOptions::default()).unwrap();

    let thin_rule = layouts[0]
        .elements
        .iter()
        .any(|e| matches!(e, LayoutElement::Rect(r) if r.fill && r.height <= 2.0));
    assert!(thin_rule, "underline rule was swallowed");
}

/// An RGB-black box is a colored fill, not a cover shape; the predicate
/// only suppresses gray-black or colorless fills.
#[test]
fn test_rgb_black_box_is_redrawn() {
    let dir = TempDir::new().unwrap();
    let pdf = build_pdf("q 0 0 0 rg 50 500 200 30 re f Q\n");
    let input = write_input(&dir, "art.pdf", &pdf);

    let output = unredact_file(&input, None, UnredactOptions::default()).unwrap();
    let layouts = extract_layouts(&output, ParseOptions::default()).unwrap();

    let black_rect = layouts[0].elements.iter().any(|e| {
        matches!(e, LayoutElement::Rect(r)
            if r.fill && r.fill_color == GraphicsColor::Rgb(0.0, 0.0, 0.0))
    });
    assert!(black_rect, "RGB-black decorative box was suppressed");
}

/// Build a one-page PDF with an 8-bit grayscale image XObject /Im0 drawn
/// at 100x100 page units.
fn build_pdf_with_gray_image(pixels: Vec<u8>, width: i64, height: i64) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        pixels,
    ));

    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        b"q 100 0 0 100 200 400 cm /Im0 Do Q\n".to_vec(),
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![0i64.into(), 0i64.into(), 612i64.into(), 792i64.into()],
        "Contents" => Object::Reference(content_id),
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => Object::Reference(image_id) },
        },
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("save synthetic pdf");
    buf
}

/// An all-white grayscale image is a redaction artifact; the rebuilt page
/// must contain no image element at all.
#[test]
fn test_all_white_image_is_omitted_from_output() {
    let dir = TempDir::new().unwrap();
    let pdf = build_pdf_with_gray_image(vec![255u8; 16], 4, 4);
    let input = write_input(&dir, "blank.pdf", &pdf);

    let output = unredact_file(&input, None, UnredactOptions::default()).unwrap();
    let layouts = extract_layouts(&output, ParseOptions::default()).unwrap();

    let images = layouts[0]
        .elements
        .iter()
        .filter(|e| matches!(e, LayoutElement::Image(_)))
        .count();
    assert_eq!(images, 0, "blank image survived the rebuild");
}

/// A textured image is content and is carried into the output.
#[test]
fn test_textured_image_is_carried() {
    let dir = TempDir::new().unwrap();
    let pixels: Vec<u8> = (0..16).map(|i| (i * 16) as u8).collect();
    let pdf = build_pdf_with_gray_image(pixels, 4, 4);
    let input = write_input(&dir, "photo.pdf", &pdf);

    let output = unredact_file(&input, None, UnredactOptions::default()).unwrap();
    let layouts = extract_layouts(&output, ParseOptions::default()).unwrap();

    let image = layouts[0]
        .elements
        .iter()
        .any(|e| matches!(e, LayoutElement::Image(_)));
    assert!(image, "textured image was dropped");
}

/// Multi-page documents come back with every page, in order.
#[test]
fn test_page_order_and_dimensions_preserved() {
    let dir = TempDir::new().unwrap();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();
    for label in ["(page one) Tj", "(page two) Tj"] {
        let content = format!("BT /F1 12 Tf 72 700 Td {label} ET\n");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![0i64.into(), 0i64.into(), 612i64.into(), 792i64.into()],
            "Contents" => Object::Reference(content_id),
        });
        kids.push(Object::Reference(page_id));
    }
    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", catalog_id);
    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();

    let input = write_input(&dir, "twopage.pdf", &buf);
    let output = unredact_file(&input, None, UnredactOptions::default()).unwrap();

    let layouts = extract_layouts(&output, ParseOptions::default()).unwrap();
    assert_eq!(layouts.len(), 2);
    assert_eq!(layouts[0].number, 1);
    assert_eq!(layouts[1].number, 2);
    assert_eq!(layouts[0].dimensions(), (612.0, 792.0));

    let text = Document::load(&output).unwrap();
    assert!(text.extract_text(&[1]).unwrap().contains("page one"));
    assert!(text.extract_text(&[2]).unwrap().contains("page two"));
}

/// In-memory input with an explicit destination.
#[test]
fn test_unredact_bytes_writes_destination() {
    let dir = TempDir::new().unwrap();
    let pdf = build_pdf("BT /F1 10 Tf 100 100 Td (hello) Tj ET\n");
    let dest = dir.path().join("out.pdf");

    unredact_bytes(&pdf, &dest, UnredactOptions::default()).unwrap();

    let text = Document::load(&dest).unwrap().extract_text(&[1]).unwrap();
    assert!(text.contains("hello"));
}

/// Non-PDF bytes are rejected before parsing begins.
#[test]
fn test_non_pdf_input_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "notes.pdf", b"just some text, no header");

    let err = unredact_file(&input, None, UnredactOptions::default()).unwrap_err();
    assert!(matches!(err, unredact::Error::UnknownFormat));
}

/// An explicit output path wins over the derived default.
#[test]
fn test_explicit_output_path() {
    let dir = TempDir::new().unwrap();
    let pdf = build_pdf("BT /F1 10 Tf 100 100 Td (x) Tj ET\n");
    let input = write_input(&dir, "in.pdf", &pdf);
    let wanted = dir.path().join("elsewhere.pdf");

    let output = unredact_file(&input, Some(wanted.clone()), UnredactOptions::default()).unwrap();
    assert_eq!(output, wanted);
    assert!(wanted.exists());
}

/// A page whose content stream is garbage renders as a blank page in
/// lenient mode; the rest of the pipeline still completes.
#[test]
fn test_lenient_mode_survives_garbage_content() {
    let dir = TempDir::new().unwrap();
    let pdf = build_pdf("this is not a content stream (((\n");
    let input = write_input(&dir, "broken.pdf", &pdf);

    let output = unredact_file(&input, None, UnredactOptions::default()).unwrap();
    assert!(output.exists());
}
