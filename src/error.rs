//! Error types for the unredact library.

use std::io;
use thiserror::Error;

/// Result type alias for unredact operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while recovering a document.
///
/// Only document-level failures surface here. Per-element problems (an
/// undecodable image, an unknown font, an unsupported construct) are
/// contained inside the page renderer and reported through the log.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted; decryption is not supported.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error decoding an embedded image stream.
    #[error("Image decoding error: {0}")]
    ImageDecode(String),

    /// Error while emitting the output document.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageDecode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::ImageDecode("truncated stream".to_string());
        assert_eq!(err.to_string(), "Image decoding error: truncated stream");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_lopdf_error_conversion() {
        let err: Error = lopdf::Error::PageNumberNotFound(3).into();
        assert!(matches!(err, Error::PdfParse(_)));
    }
}
