//! Font loading: character codes, Unicode mapping, widths, and vertical
//! metrics for simple (Type1, TrueType, Type3) and composite (Type0) fonts.
//!
//! Loading never fails. Missing or malformed entries fall back to the
//! standard font tables and then to generic defaults, so that a damaged
//! font degrades text quality instead of dropping the page.

use std::collections::HashMap;

use anotex_core::glyph::DEFAULT_SPACE_RATIO;
use lopdf::{Dictionary, Document, Object};
use tracing::debug;

use crate::cmap::CMap;
use crate::encoding::{BaseEncoding, SimpleEncoding, parse_differences};
use crate::lopdf_backend::{decode_content_stream, object_to_f64, resolve_object};
use crate::standard_fonts::{self, StandardFont};

const DEFAULT_MISSING_WIDTH: f64 = 600.0;
const DEFAULT_ASCENT: f64 = 750.0;
const DEFAULT_DESCENT: f64 = -250.0;
const DEFAULT_CID_WIDTH: f64 = 1000.0;

/// A loaded font.
#[derive(Debug, Clone)]
pub struct Font {
    base_font: String,
    kind: FontKind,
    to_unicode: Option<CMap>,
    ascent: f64,
    descent: f64,
}

#[derive(Debug, Clone)]
enum FontKind {
    Simple {
        encoding: SimpleEncoding,
        first_char: u32,
        widths: Vec<f64>,
        missing_width: f64,
        standard: Option<&'static StandardFont>,
    },
    Composite {
        default_width: f64,
        widths: HashMap<u32, f64>,
    },
}

impl Font {
    /// Load a font from its resource dictionary.
    pub fn from_dict(doc: &Document, dict: &Dictionary) -> Self {
        let base_font = dict
            .get(b"BaseFont")
            .ok()
            .and_then(|o| resolve_object(doc, o).as_name().ok())
            .map(|n| String::from_utf8_lossy(n).into_owned())
            .unwrap_or_default();
        let subtype = dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .unwrap_or(b"Type1".as_slice());
        let to_unicode = load_to_unicode(doc, dict);

        if subtype == b"Type0" {
            let descendant = descendant_font(doc, dict);
            let (ascent, descent) = descendant
                .and_then(|d| descriptor_metrics(doc, d))
                .unwrap_or((DEFAULT_ASCENT, DEFAULT_DESCENT));
            let default_width = descendant
                .and_then(|d| d.get(b"DW").ok())
                .and_then(|o| object_to_f64(resolve_object(doc, o)).ok())
                .unwrap_or(DEFAULT_CID_WIDTH);
            let widths = descendant
                .and_then(|d| d.get(b"W").ok())
                .and_then(|o| resolve_object(doc, o).as_array().ok())
                .map(|w| parse_cid_widths(doc, w))
                .unwrap_or_default();
            if to_unicode.is_none() {
                debug!(font = %base_font, "composite font without ToUnicode; text will be empty");
            }
            return Font {
                base_font,
                kind: FontKind::Composite {
                    default_width,
                    widths,
                },
                to_unicode,
                ascent,
                descent,
            };
        }

        let standard = standard_fonts::lookup(&base_font);
        let default_base = if subtype == b"TrueType" {
            BaseEncoding::WinAnsi
        } else {
            BaseEncoding::Standard
        };
        let encoding = load_encoding(doc, dict, default_base);
        let first_char = dict
            .get(b"FirstChar")
            .ok()
            .and_then(|o| object_to_f64(resolve_object(doc, o)).ok())
            .map_or(0, |n| n.max(0.0) as u32);
        let widths = dict
            .get(b"Widths")
            .ok()
            .and_then(|o| resolve_object(doc, o).as_array().ok())
            .map(|arr| {
                arr.iter()
                    .map(|w| object_to_f64(resolve_object(doc, w)).unwrap_or(0.0))
                    .collect()
            })
            .unwrap_or_default();
        let descriptor = font_descriptor(doc, dict);
        let missing_width = descriptor
            .and_then(|d| d.get(b"MissingWidth").ok())
            .and_then(|o| object_to_f64(resolve_object(doc, o)).ok())
            .unwrap_or(DEFAULT_MISSING_WIDTH);
        let (ascent, descent) = descriptor_metrics(doc, dict)
            .or_else(|| standard.map(|s| (s.ascent, s.descent)))
            .unwrap_or((DEFAULT_ASCENT, DEFAULT_DESCENT));

        Font {
            base_font,
            kind: FontKind::Simple {
                encoding,
                first_char,
                widths,
                missing_width,
                standard,
            },
            to_unicode,
            ascent,
            descent,
        }
    }

    /// Fallback used when a `Tf` names a font the resources do not define.
    pub fn fallback() -> Self {
        Font {
            base_font: String::new(),
            kind: FontKind::Simple {
                encoding: SimpleEncoding::new(BaseEncoding::WinAnsi),
                first_char: 0,
                widths: Vec::new(),
                missing_width: DEFAULT_MISSING_WIDTH,
                standard: None,
            },
            to_unicode: None,
            ascent: DEFAULT_ASCENT,
            descent: DEFAULT_DESCENT,
        }
    }

    pub fn base_font(&self) -> &str {
        &self.base_font
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.kind, FontKind::Composite { .. })
    }

    /// Split a shown string into character codes.
    ///
    /// Composite fonts use two-byte codes; a trailing odd byte becomes its
    /// own code.
    pub fn codes<'a>(&self, bytes: &'a [u8]) -> Box<dyn Iterator<Item = u32> + 'a> {
        if self.is_composite() {
            Box::new(bytes.chunks(2).map(|pair| {
                pair.iter()
                    .fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
            }))
        } else {
            Box::new(bytes.iter().map(|&b| u32::from(b)))
        }
    }

    /// Unicode text for `code`: ToUnicode first, then the simple encoding.
    pub fn decode(&self, code: u32) -> Option<String> {
        if let Some(text) = self.to_unicode.as_ref().and_then(|c| c.lookup(code)) {
            return Some(text.to_string());
        }
        match &self.kind {
            FontKind::Simple { encoding, .. } => u8::try_from(code)
                .ok()
                .and_then(|b| encoding.decode(b))
                .map(String::from),
            FontKind::Composite { .. } => None,
        }
    }

    /// Advance width of `code` in glyph space (thousandths of an em).
    pub fn width(&self, code: u32) -> f64 {
        match &self.kind {
            FontKind::Simple {
                first_char,
                widths,
                missing_width,
                standard,
                ..
            } => {
                let explicit = code
                    .checked_sub(*first_char)
                    .and_then(|i| widths.get(i as usize))
                    .copied();
                match (explicit, standard) {
                    (Some(w), _) => w,
                    (None, Some(builtin)) if widths.is_empty() => builtin.width(code),
                    _ => *missing_width,
                }
            }
            FontKind::Composite {
                default_width,
                widths,
            } => widths.get(&code).copied().unwrap_or(*default_width),
        }
    }

    /// Whether word spacing (`Tw`) applies to `code`.
    pub fn is_word_space(&self, code: u32) -> bool {
        !self.is_composite() && code == 32
    }

    /// Width of a space in glyph space.
    pub fn space_width(&self) -> f64 {
        if !self.is_composite() {
            let width = self.width(32);
            if width > 0.0 {
                return width;
            }
        }
        DEFAULT_SPACE_RATIO * 1000.0
    }

    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    pub fn descent(&self) -> f64 {
        self.descent
    }
}

fn load_to_unicode(doc: &Document, dict: &Dictionary) -> Option<CMap> {
    let stream = resolve_object(doc, dict.get(b"ToUnicode").ok()?)
        .as_stream()
        .ok()?;
    match decode_content_stream(stream) {
        Ok(data) => Some(CMap::parse(&data)),
        Err(err) => {
            debug!(%err, "unreadable ToUnicode stream");
            None
        }
    }
}

fn load_encoding(doc: &Document, dict: &Dictionary, default_base: BaseEncoding) -> SimpleEncoding {
    let Some(obj) = dict.get(b"Encoding").ok().map(|o| resolve_object(doc, o)) else {
        return SimpleEncoding::new(default_base);
    };
    if let Ok(name) = obj.as_name() {
        return SimpleEncoding::new(BaseEncoding::from_name(name).unwrap_or(default_base));
    }
    let Ok(enc) = obj.as_dict() else {
        return SimpleEncoding::new(default_base);
    };
    let base = enc
        .get(b"BaseEncoding")
        .ok()
        .and_then(|o| resolve_object(doc, o).as_name().ok())
        .and_then(BaseEncoding::from_name)
        .unwrap_or(default_base);
    let differences = enc
        .get(b"Differences")
        .ok()
        .and_then(|o| resolve_object(doc, o).as_array().ok())
        .map(|arr| parse_differences(arr))
        .unwrap_or_default();
    SimpleEncoding::new(base).with_differences(differences)
}

fn descendant_font<'a>(doc: &'a Document, dict: &'a Dictionary) -> Option<&'a Dictionary> {
    let array = resolve_object(doc, dict.get(b"DescendantFonts").ok()?)
        .as_array()
        .ok()?;
    resolve_object(doc, array.first()?).as_dict().ok()
}

fn font_descriptor<'a>(doc: &'a Document, dict: &'a Dictionary) -> Option<&'a Dictionary> {
    resolve_object(doc, dict.get(b"FontDescriptor").ok()?)
        .as_dict()
        .ok()
}

/// `/Ascent` and `/Descent` from the font descriptor, if both are usable.
fn descriptor_metrics(doc: &Document, font: &Dictionary) -> Option<(f64, f64)> {
    let descriptor = font_descriptor(doc, font)?;
    let read = |key: &[u8]| {
        descriptor
            .get(key)
            .ok()
            .and_then(|o| object_to_f64(resolve_object(doc, o)).ok())
    };
    let ascent = read(b"Ascent")?;
    let descent = read(b"Descent")?;
    (ascent != 0.0 && ascent > descent).then_some((ascent, descent))
}

/// Parse a CIDFont `/W` array: `c [w1 w2 ...]` and `c_first c_last w` runs.
fn parse_cid_widths(doc: &Document, array: &[Object]) -> HashMap<u32, f64> {
    let mut widths = HashMap::new();
    let mut i = 0;
    while i < array.len() {
        let Ok(first) = object_to_f64(resolve_object(doc, &array[i])) else {
            break;
        };
        let first = first.max(0.0) as u32;
        match array.get(i + 1).map(|o| resolve_object(doc, o)) {
            Some(Object::Array(run)) => {
                for (offset, w) in run.iter().enumerate() {
                    let Some(cid) = u32::try_from(offset)
                        .ok()
                        .and_then(|offset| first.checked_add(offset))
                    else {
                        break;
                    };
                    if let Ok(w) = object_to_f64(resolve_object(doc, w)) {
                        widths.insert(cid, w);
                    }
                }
                i += 2;
            }
            Some(last) => {
                let (Ok(last), Some(Ok(w))) = (
                    object_to_f64(last),
                    array.get(i + 2).map(|o| object_to_f64(resolve_object(doc, o))),
                ) else {
                    break;
                };
                let last = last.max(0.0) as u32;
                // Guard against absurd ranges in damaged files.
                for cid in first..=last.min(first.saturating_add(0xFFFF)) {
                    widths.insert(cid, w);
                }
                i += 3;
            }
            None => break,
        }
    }
    widths
}
