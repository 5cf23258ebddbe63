//! Recover weakly redacted PDF content.
//!
//! A "weak" redaction covers text with an opaque shape instead of removing
//! it; the words are still in the file, merely painted over. This crate
//! rebuilds each page from its recorded layout while refusing to redraw
//! shapes that look like redaction overlays, producing a new document in
//! which the covered content is visible again.
//!
//! # Example
//!
//! ```no_run
//! use unredact::{unredact_file, UnredactOptions};
//!
//! let out = unredact_file("report.pdf", None, UnredactOptions::default())?;
//! println!("recovered copy written to {}", out.display());
//! # Ok::<(), unredact::Error>(())
//! ```
//!
//! The pipeline has three stages: [`parser`] extracts a layout tree from
//! the source document, [`render`] redraws it (suppressing overlays,
//! reconstructing images, substituting standard fonts), and [`writer`]
//! assembles the output document.

pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod writer;

use std::path::{Path, PathBuf};

pub use error::{Error, Result};
pub use model::{GraphicsColor, LayoutElement, PageLayout};
pub use parser::{ParseOptions, PdfParser};
pub use render::{BuiltinFont, PageRenderer, RedactionPolicy, RenderOptions};

/// Options for the whole recovery pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnredactOptions {
    pub parse: ParseOptions,
    pub render: RenderOptions,
}

impl UnredactOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parse(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    pub fn with_render(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }
}

/// Default output path: `report.pdf` becomes `report-unredacted.pdf`.
pub fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = match input.extension() {
        Some(ext) => format!("{stem}-unredacted.{}", ext.to_string_lossy()),
        None => format!("{stem}-unredacted"),
    };
    input.with_file_name(name)
}

/// Recover a document from a file, writing the rebuilt copy next to the
/// input unless `output` names a destination. Returns the output path.
pub fn unredact_file<P: AsRef<Path>>(
    input: P,
    output: Option<PathBuf>,
    options: UnredactOptions,
) -> Result<PathBuf> {
    let input = input.as_ref();
    let output = output.unwrap_or_else(|| output_path(input));

    let parser = PdfParser::open(input, options.parse)?;
    run_pipeline(&parser, options.render, &output)?;
    Ok(output)
}

/// Recover a document already held in memory, writing the result to `output`.
pub fn unredact_bytes<P: AsRef<Path>>(
    data: &[u8],
    output: P,
    options: UnredactOptions,
) -> Result<()> {
    let parser = PdfParser::from_bytes(data, options.parse)?;
    run_pipeline(&parser, options.render, output.as_ref())
}

/// Parse a document's layout trees without rendering anything.
pub fn extract_layouts<P: AsRef<Path>>(
    input: P,
    options: ParseOptions,
) -> Result<Vec<PageLayout>> {
    PdfParser::open(input, options)?.parse_document()
}

fn run_pipeline(parser: &PdfParser, options: RenderOptions, output: &Path) -> Result<()> {
    let total = parser.page_count();
    let mut renderer = PageRenderer::new(options);

    for number in 1..=total {
        log::info!("page {number}/{total}");
        let layout = parser.parse_page(number)?;
        renderer.render_page(&layout)?;
    }

    renderer.finish(output)?;
    log::info!("saved {}", output.display());
    Ok(())
}
