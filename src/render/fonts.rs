//! Font-name resolution.
//!
//! Source documents reference embedded fonts by vendor names such as
//! `TimesNewRomanPS-BoldMT`, often behind a six-letter subset prefix
//! (`ABCDEF+`). The output document only carries the standard Type1 base
//! fonts, so every raw name must map to one of them. Resolution is total:
//! unknown names warn once and fall back to the configured default.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// The fixed set of output fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinFont {
    TimesRoman,
    TimesItalic,
    TimesBold,
    TimesBoldItalic,
    Helvetica,
    HelveticaOblique,
    HelveticaBold,
    HelveticaBoldOblique,
    Courier,
    ZapfDingbats,
}

impl BuiltinFont {
    /// PostScript name used in the output document's font dictionaries.
    pub fn postscript_name(&self) -> &'static str {
        match self {
            BuiltinFont::TimesRoman => "Times-Roman",
            BuiltinFont::TimesItalic => "Times-Italic",
            BuiltinFont::TimesBold => "Times-Bold",
            BuiltinFont::TimesBoldItalic => "Times-BoldItalic",
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaOblique => "Helvetica-Oblique",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
            BuiltinFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            BuiltinFont::Courier => "Courier",
            BuiltinFont::ZapfDingbats => "ZapfDingbats",
        }
    }
}

/// Fallback when a raw name is not in the alias table.
pub const DEFAULT_FONT: BuiltinFont = BuiltinFont::TimesRoman;

/// Known family-name aliases. Pure data; extend freely.
static FONT_ALIASES: &[(&str, BuiltinFont)] = &[
    ("TimesNewRomanPSMT", BuiltinFont::TimesRoman),
    ("TimesNewRomanPS-ItalicMT", BuiltinFont::TimesItalic),
    ("TimesNewRomanPS-BoldItalicMT", BuiltinFont::TimesBoldItalic),
    ("TimesNewRomanPS-BoldMT", BuiltinFont::TimesBold),
    ("ArialMT", BuiltinFont::Helvetica),
    ("Arial-ItalicMT", BuiltinFont::HelveticaOblique),
    ("Arial-BoldMT", BuiltinFont::HelveticaBold),
    ("Arial-BoldItalicMT", BuiltinFont::HelveticaBoldOblique),
    ("CambriaMath", BuiltinFont::TimesRoman),
    ("Calibri", BuiltinFont::Helvetica),
    ("Corbel", BuiltinFont::Helvetica),
    ("CourierNew", BuiltinFont::Courier),
    ("CourierNewPSMT", BuiltinFont::Courier),
    ("Arial", BuiltinFont::Helvetica),
    ("Arial,Bold", BuiltinFont::HelveticaBold),
    ("Arial,BoldItalic", BuiltinFont::HelveticaBoldOblique),
    ("QuickTypeII", BuiltinFont::Helvetica),
    ("QuickTypeII,Italic", BuiltinFont::HelveticaOblique),
    ("QuickTypeII,Bold", BuiltinFont::HelveticaBold),
    ("QuickTypeIICondensed", BuiltinFont::Helvetica),
    ("QuickTypeIICondensed,Bold", BuiltinFont::HelveticaBold),
    ("QuickTypeIICourierA", BuiltinFont::Courier),
    ("QuickTypeIIPi", BuiltinFont::Helvetica),
    ("UniversLTStd-Light", BuiltinFont::Helvetica),
    ("Univers_LT_Std_45_LightBold", BuiltinFont::HelveticaBold),
    ("Univers_LT_Std_47_Cn_LtBold", BuiltinFont::HelveticaBold),
    ("Univers_LT_Std_47_Cn_Lt", BuiltinFont::Helvetica),
    ("Univers_LT_Std_57_Cn", BuiltinFont::Helvetica),
    ("Univers_LT_Std_55", BuiltinFont::Helvetica),
    ("Univers_LT_67_CondensedBoldBold", BuiltinFont::HelveticaBold),
    ("Verdana", BuiltinFont::Helvetica),
    ("Wingdings-Regular", BuiltinFont::ZapfDingbats),
    ("Wingdings2", BuiltinFont::ZapfDingbats),
    // The output fonts map to themselves so already-standard names pass
    // through untouched.
    ("Times-Roman", BuiltinFont::TimesRoman),
    ("Times-Italic", BuiltinFont::TimesItalic),
    ("Times-Bold", BuiltinFont::TimesBold),
    ("Times-BoldItalic", BuiltinFont::TimesBoldItalic),
    ("Helvetica", BuiltinFont::Helvetica),
    ("Helvetica-Oblique", BuiltinFont::HelveticaOblique),
    ("Helvetica-Bold", BuiltinFont::HelveticaBold),
    ("Helvetica-BoldOblique", BuiltinFont::HelveticaBoldOblique),
    ("Courier", BuiltinFont::Courier),
    ("ZapfDingbats", BuiltinFont::ZapfDingbats),
];

fn subset_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{6}\+").unwrap())
}

/// Strip a leading six-uppercase-letter subset prefix, if present.
pub fn strip_subset_prefix(font_name: &str) -> &str {
    match subset_prefix_regex().find(font_name) {
        Some(m) => &font_name[m.end()..],
        None => font_name,
    }
}

/// Resolves raw font names to output fonts.
///
/// Keeps a set of names it has already warned about so a document using
/// one exotic font on every character does not flood the log.
#[derive(Debug)]
pub struct FontResolver {
    default: BuiltinFont,
    warned: HashSet<String>,
}

impl FontResolver {
    /// Create a resolver falling back to [`DEFAULT_FONT`].
    pub fn new() -> Self {
        Self::with_default(DEFAULT_FONT)
    }

    /// Create a resolver with a custom fallback font.
    pub fn with_default(default: BuiltinFont) -> Self {
        Self {
            default,
            warned: HashSet::new(),
        }
    }

    /// Resolve a raw font name to an output font. Total: never fails.
    pub fn resolve(&mut self, raw_name: &str) -> BuiltinFont {
        let name = strip_subset_prefix(raw_name);

        if let Some((_, font)) = FONT_ALIASES.iter().find(|(alias, _)| *alias == name) {
            return *font;
        }

        if self.warned.insert(name.to_string()) {
            log::warn!(
                "unknown font {:?}, falling back to {}; add it to the alias table to improve output",
                name,
                self.default.postscript_name()
            );
        }
        self.default
    }
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_subset_prefix() {
        assert_eq!(strip_subset_prefix("ABCDEF+Arial-BoldMT"), "Arial-BoldMT");
        assert_eq!(strip_subset_prefix("Arial-BoldMT"), "Arial-BoldMT");
        // Prefix must be exactly six uppercase letters followed by '+'.
        assert_eq!(strip_subset_prefix("ABCDE+Arial"), "ABCDE+Arial");
        assert_eq!(strip_subset_prefix("abcdef+Arial"), "abcdef+Arial");
    }

    #[test]
    fn test_resolve_known_alias() {
        let mut resolver = FontResolver::new();
        assert_eq!(
            resolver.resolve("TimesNewRomanPS-BoldMT"),
            BuiltinFont::TimesBold
        );
        assert_eq!(resolver.resolve("Wingdings2"), BuiltinFont::ZapfDingbats);
    }

    #[test]
    fn test_resolve_subset_prefixed_equals_bare() {
        let mut resolver = FontResolver::new();
        let a = resolver.resolve("ABCDEF+Arial-BoldMT");
        let b = resolver.resolve("Arial-BoldMT");
        assert_eq!(a, b);
        assert_eq!(a, BuiltinFont::HelveticaBold);
    }

    #[test]
    fn test_resolve_is_total() {
        let mut resolver = FontResolver::new();
        assert_eq!(resolver.resolve("NoSuchFamily-Heavy"), DEFAULT_FONT);
        assert_eq!(resolver.resolve(""), DEFAULT_FONT);
    }

    #[test]
    fn test_resolve_custom_default() {
        let mut resolver = FontResolver::with_default(BuiltinFont::Courier);
        assert_eq!(resolver.resolve("NoSuchFamily"), BuiltinFont::Courier);
    }

    #[test]
    fn test_identity_mapping() {
        let mut resolver = FontResolver::new();
        assert_eq!(resolver.resolve("Helvetica"), BuiltinFont::Helvetica);
        assert_eq!(
            resolver.resolve("GHIJKL+Times-BoldItalic"),
            BuiltinFont::TimesBoldItalic
        );
    }
}
