//! Decoding of PDF text strings (`/Contents`, `/Title`, `/T`, ...).
//!
//! A text string is UTF-16BE when it starts with a `FE FF` byte-order mark,
//! UTF-8 when it starts with `EF BB BF`, and PDFDocEncoding otherwise.

use encoding_rs::{UTF_16BE, UTF_16LE};

/// PDFDocEncoding code points for 0x18..=0x1F.
const PDFDOC_18_1F: [char; 8] = [
    '\u{02D8}', '\u{02C7}', '\u{02C6}', '\u{02D9}', '\u{02DD}', '\u{02DB}', '\u{02DA}', '\u{02DC}',
];

/// PDFDocEncoding code points for 0x80..=0xA0 (0x9F is undefined).
const PDFDOC_80_A0: [char; 33] = [
    '\u{2022}', '\u{2020}', '\u{2021}', '\u{2026}', '\u{2014}', '\u{2013}', '\u{0192}', '\u{2044}',
    '\u{2039}', '\u{203A}', '\u{2212}', '\u{2030}', '\u{201E}', '\u{201C}', '\u{201D}', '\u{2018}',
    '\u{2019}', '\u{201A}', '\u{2122}', '\u{FB01}', '\u{FB02}', '\u{0141}', '\u{0152}', '\u{0160}',
    '\u{0178}', '\u{017D}', '\u{0131}', '\u{0142}', '\u{0153}', '\u{0161}', '\u{017E}', '\u{FFFD}',
    '\u{20AC}',
];

/// Decode raw text-string bytes to a Rust string.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let (text, _) = UTF_16BE.decode_without_bom_handling(rest);
        return text.into_owned();
    }
    // Not allowed by ISO 32000 but written by some producers.
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        let (text, _) = UTF_16LE.decode_without_bom_handling(rest);
        return text.into_owned();
    }
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(rest).into_owned();
    }
    if !bytes.is_ascii() {
        if let Ok(text) = std::str::from_utf8(bytes) {
            return text.to_string();
        }
    }
    bytes.iter().map(|&b| pdfdoc_char(b)).collect()
}

fn pdfdoc_char(b: u8) -> char {
    match b {
        0x18..=0x1F => PDFDOC_18_1F[(b - 0x18) as usize],
        0x80..=0xA0 => PDFDOC_80_A0[(b - 0x80) as usize],
        _ => b as char,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        assert_eq!(decode_text_string(b"Four"), "Four");
    }

    #[test]
    fn utf16be_with_bom() {
        let bytes = [0xFE, 0xFF, 0x04, 0x1F, 0x04, 0x35, 0x04, 0x42];
        assert_eq!(decode_text_string(&bytes), "\u{041f}\u{0435}\u{0442}");
    }

    #[test]
    fn utf16be_surrogate_pair() {
        let bytes = [0xFE, 0xFF, 0xD8, 0x3D, 0xDE, 0x00];
        assert_eq!(decode_text_string(&bytes), "\u{1F600}");
    }

    #[test]
    fn utf16le_with_bom() {
        let bytes = [0xFF, 0xFE, 0x41, 0x00, 0x42, 0x00];
        assert_eq!(decode_text_string(&bytes), "AB");
    }

    #[test]
    fn utf8_with_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("café".as_bytes());
        assert_eq!(decode_text_string(&bytes), "café");
    }

    #[test]
    fn bare_utf8_is_accepted() {
        assert_eq!(decode_text_string("naïve".as_bytes()), "naïve");
    }

    #[test]
    fn pdfdoc_typographic_quotes() {
        assert_eq!(decode_text_string(&[0x8D, b'q', 0x8E]), "\u{201C}q\u{201D}");
    }

    #[test]
    fn pdfdoc_latin1_range() {
        assert_eq!(decode_text_string(&[0xE9, b't', 0xE9]), "été");
    }

    #[test]
    fn pdfdoc_euro_and_breve() {
        assert_eq!(decode_text_string(&[0xA0, 0x18]), "\u{20AC}\u{02D8}");
    }

    #[test]
    fn empty_input() {
        assert_eq!(decode_text_string(b""), "");
        assert_eq!(decode_text_string(&[0xFE, 0xFF]), "");
    }
}
