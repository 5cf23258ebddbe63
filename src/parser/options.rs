//! Parsing options.

use serde::{Deserialize, Serialize};

/// Options controlling layout extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// When false (the default), a page whose content stream cannot be
    /// interpreted yields an empty layout with a warning instead of
    /// aborting the document.
    pub strict: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the whole document on the first bad page.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { strict: false }
    }
}
