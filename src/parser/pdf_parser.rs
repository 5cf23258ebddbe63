//! Document-level layout extraction.

use std::path::Path;

use lopdf::ObjectId;

use crate::error::{Error, Result};
use crate::model::PageLayout;

use super::backend::DocumentReader;
use super::interpreter::LayoutInterpreter;
use super::options::ParseOptions;

/// Extracts page layout trees from a PDF document.
pub struct PdfParser {
    reader: DocumentReader,
    options: ParseOptions,
}

impl PdfParser {
    /// Open a document from a file path.
    pub fn open<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        Ok(Self {
            reader: DocumentReader::open(path)?,
            options,
        })
    }

    /// Open a document from an in-memory byte slice.
    pub fn from_bytes(data: &[u8], options: ParseOptions) -> Result<Self> {
        Ok(Self {
            reader: DocumentReader::from_bytes(data)?,
            options,
        })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.reader.page_count()
    }

    /// Extract the layout of one page, 1-indexed.
    ///
    /// In lenient mode an uninterpretable page comes back empty, so the
    /// rest of the document still renders.
    pub fn parse_page(&self, number: u32) -> Result<PageLayout> {
        let page_id = self.page_id(number)?;
        let interpreter = LayoutInterpreter::new(&self.reader);

        match interpreter.interpret_page(page_id, number) {
            Ok(layout) => Ok(layout),
            Err(e) if !self.options.strict => {
                log::warn!("failed to interpret page {number}: {e}");
                let (width, height) = self.reader.page_dimensions(page_id);
                Ok(PageLayout::new(number, width, height))
            }
            Err(e) => Err(e),
        }
    }

    /// Extract every page in document order.
    pub fn parse_document(&self) -> Result<Vec<PageLayout>> {
        let mut layouts = Vec::with_capacity(self.page_count() as usize);
        for number in self.reader.pages().keys() {
            layouts.push(self.parse_page(*number)?);
        }
        Ok(layouts)
    }

    fn page_id(&self, number: u32) -> Result<ObjectId> {
        self.reader
            .pages()
            .get(&number)
            .copied()
            .ok_or_else(|| Error::PdfParse(format!("no page {number} in document")))
    }
}
