//! Document access layer over lopdf.
//!
//! Wraps the loaded document and exposes the handful of lookups the
//! layout interpreter needs: the page map, page bounding boxes, decoded
//! content streams, font tables, and resource dictionaries. A document
//! that cannot be loaded at all is a fatal error; everything past that
//! point is handled leniently by the caller.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::detect::detect_pdf_version;
use crate::error::{Error, Result};

/// Read-only access to the source document.
pub struct DocumentReader {
    doc: LopdfDocument,
}

impl DocumentReader {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Cheap header sniff first so a non-PDF fails with a clear error.
        detect_pdf_version(path)?;

        let doc = LopdfDocument::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }

        Ok(Self { doc })
    }

    /// Open a PDF from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        crate::detect::detect_pdf_version_from_bytes(data)?;

        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }

        Ok(Self { doc })
    }

    /// All pages as (page number → page id), 1-indexed.
    pub fn pages(&self) -> BTreeMap<u32, ObjectId> {
        self.doc.get_pages()
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Page bounding box from the MediaBox, defaulting to Letter size.
    pub fn page_dimensions(&self, page_id: ObjectId) -> (f32, f32) {
        if let Ok(page_dict) = self.doc.get_dictionary(page_id) {
            if let Ok(media_box) = page_dict.get(b"MediaBox") {
                if let Ok(array) = media_box.as_array() {
                    if array.len() >= 4 {
                        let width = array[2].as_float().unwrap_or(612.0);
                        let height = array[3].as_float().unwrap_or(792.0);
                        return (width, height);
                    }
                }
            }
        }
        (612.0, 792.0)
    }

    /// Raw (decompressed) content stream bytes for a page.
    pub fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = page_dict
            .get(b"Contents")
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    return stream_bytes(s);
                }
                Err(Error::PdfParse("Invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = stream_bytes(s) {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    /// Font dictionaries for a page, keyed by resource name. Empty when
    /// the page carries no font resources.
    pub fn page_fonts(&self, page_id: ObjectId) -> BTreeMap<Vec<u8>, &Dictionary> {
        self.doc.get_page_fonts(page_id).unwrap_or_default()
    }

    /// The page's XObject resource dictionary, if any.
    pub fn page_xobjects(&self, page_id: ObjectId) -> Option<&Dictionary> {
        let page_dict = self.doc.get_dictionary(page_id).ok()?;
        let resources = self.resolve_dict(page_dict.get(b"Resources").ok()?)?;
        self.resolve_dict(resources.get(b"XObject").ok()?)
    }

    /// Decode a text byte sequence using the font's declared encoding,
    /// falling back to simple byte decoding.
    pub fn decode_text(&self, font: Option<&Dictionary>, bytes: &[u8]) -> String {
        if let Some(font_dict) = font {
            if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                    return text;
                }
            }
        }
        decode_text_simple(bytes)
    }

    /// Dereference an object that may be a dictionary or a reference to one.
    pub fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Reference(r) => self.doc.get_object(*r).ok()?.as_dict().ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Dereference an object that may be a stream or a reference to one.
    pub fn resolve_stream<'a>(&'a self, obj: &'a Object) -> Option<&'a lopdf::Stream> {
        match obj {
            Object::Reference(r) => match self.doc.get_object(*r).ok()? {
                Object::Stream(s) => Some(s),
                _ => None,
            },
            Object::Stream(s) => Some(s),
            _ => None,
        }
    }

    /// Direct access to the underlying document for lookups not covered
    /// by the helpers above.
    pub(crate) fn raw_doc(&self) -> &LopdfDocument {
        &self.doc
    }

    /// Wrap an already-constructed document, bypassing the header sniff.
    #[cfg(test)]
    pub(crate) fn from_document(doc: LopdfDocument) -> Self {
        Self { doc }
    }
}

/// Decoded bytes of a stream. Streams without a declared filter chain
/// hold their payload as-is; asking lopdf to decompress one is an error,
/// not a no-op.
pub(crate) fn stream_bytes(stream: &lopdf::Stream) -> Result<Vec<u8>> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| Error::PdfParse(e.to_string()))
    } else {
        Ok(stream.content.clone())
    }
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM marker first.
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Latin-1 fallback.
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Stream};

    #[test]
    fn test_stream_bytes_without_filter_returns_payload() {
        // Uncompressed content streams are valid and common.
        let stream = Stream::new(dictionary! {}, b"BT /F1 12 Tf (x) Tj ET".to_vec());
        assert_eq!(
            stream_bytes(&stream).unwrap(),
            b"BT /F1 12 Tf (x) Tj ET".to_vec()
        );
    }

    #[test]
    fn test_stream_bytes_with_filter_decompresses() {
        // lopdf only applies FlateDecode when it shrinks the stream, so use a
        // payload long enough to actually compress.
        let ops = b"0 0 10 10 re f ".repeat(32).to_vec();
        let mut stream = Stream::new(dictionary! {}, ops.clone());
        stream.compress().unwrap();
        assert!(stream.dict.get(b"Filter").is_ok());
        assert_eq!(stream_bytes(&stream).unwrap(), ops);
    }

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        let bytes = vec![0x48, 0x65, 0x6C, 0x6C, 0xE9];
        assert_eq!(decode_text_simple(&bytes), "Hellé");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_open_rejects_non_pdf_bytes() {
        assert!(matches!(
            DocumentReader::from_bytes(b"not a pdf at all"),
            Err(Error::UnknownFormat)
        ));
    }
}
