//! PDF format detection.
//!
//! A cheap header sniff used as the fatal gate before handing the file to
//! the full parser: anything that does not start with a plausible
//! `%PDF-x.y` header is rejected up front with [`Error::UnknownFormat`].

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Detect the PDF version from a file path.
///
/// Returns the version string (e.g., `"1.7"`) when the file carries a valid
/// PDF header, or [`Error::UnknownFormat`] otherwise.
pub fn detect_pdf_version<P: AsRef<Path>>(path: P) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 16];
    let n = reader.read(&mut header)?;
    detect_pdf_version_from_bytes(&header[..n])
}

/// Detect the PDF version from the first bytes of a file.
pub fn detect_pdf_version_from_bytes(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC.len() + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnknownFormat);
    }

    Ok(version)
}

/// Check whether a version string looks like "d.d".
fn is_valid_version(version: &str) -> bool {
    let chars: Vec<char> = version.chars().collect();
    chars.len() == 3 && chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}

/// Check if bytes represent a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_pdf_version_from_bytes(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_valid_pdf() {
        let data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        assert_eq!(detect_pdf_version_from_bytes(data).unwrap(), "1.7");
    }

    #[test]
    fn test_detect_pdf_2_0() {
        let data = b"%PDF-2.0\n%\xe2\xe3\xcf\xd3";
        assert_eq!(detect_pdf_version_from_bytes(data).unwrap(), "2.0");
    }

    #[test]
    fn test_detect_invalid_format() {
        let result = detect_pdf_version_from_bytes(b"<!DOCTYPE html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_too_short() {
        let result = detect_pdf_version_from_bytes(b"%PDF");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.4\nrest"));
        assert!(!is_pdf_bytes(b"Not a PDF"));
    }
}
