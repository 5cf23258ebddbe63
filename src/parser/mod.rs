//! Layout extraction from the source document.
//!
//! [`PdfParser`] drives the pipeline: [`backend::DocumentReader`] handles
//! object-level access, [`interpreter::LayoutInterpreter`] turns content
//! streams into element trees.

mod backend;
mod interpreter;
mod options;
mod pdf_parser;

pub use backend::DocumentReader;
pub use options::ParseOptions;
pub use pdf_parser::PdfParser;
