//! Unicode normalization for rendered glyph text.

use unicode_normalization::UnicodeNormalization;

/// Unicode normalization form applied to glyph text.
///
/// Producers disagree on composed versus decomposed forms (and on
/// compatibility ligatures like `ﬁ`); normalizing makes highlighted text
/// comparable across them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnicodeNorm {
    /// Leave text untouched.
    #[default]
    None,
    Nfc,
    Nfd,
    Nfkc,
    Nfkd,
}

impl UnicodeNorm {
    /// Apply this form to `text`.
    pub fn normalize(&self, text: &str) -> String {
        match self {
            UnicodeNorm::None => text.to_string(),
            UnicodeNorm::Nfc => text.nfc().collect(),
            UnicodeNorm::Nfd => text.nfd().collect(),
            UnicodeNorm::Nfkc => text.nfkc().collect(),
            UnicodeNorm::Nfkd => text.nfkd().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_identity() {
        assert_eq!(UnicodeNorm::None.normalize("e\u{0301}"), "e\u{0301}");
    }

    #[test]
    fn nfc_composes() {
        assert_eq!(UnicodeNorm::Nfc.normalize("e\u{0301}"), "\u{00e9}");
    }

    #[test]
    fn nfd_decomposes() {
        assert_eq!(UnicodeNorm::Nfd.normalize("\u{00e9}"), "e\u{0301}");
    }

    #[test]
    fn nfkc_expands_ligature() {
        assert_eq!(UnicodeNorm::Nfkc.normalize("\u{FB01}le"), "file");
    }

    #[test]
    fn nfkd_expands_and_decomposes() {
        assert_eq!(UnicodeNorm::Nfkd.normalize("\u{FB01}\u{00e9}"), "fie\u{0301}");
    }
}
