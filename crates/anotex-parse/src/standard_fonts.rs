//! Metrics for the standard Type1 fonts.
//!
//! Used when a simple font dictionary has no `/Widths` array, which is
//! allowed for the base-14 fonts. Widths cover printable ASCII (32..=126)
//! in 1/1000 em units and come from the Adobe AFM files; codes outside that
//! range fall back to a per-family average.

/// Metrics for one standard font family member.
#[derive(Debug)]
pub struct StandardFont {
    /// Widths for codes 32..=126, or `None` for monospaced fonts.
    ascii_widths: Option<&'static [u16; 95]>,
    fallback_width: u16,
    pub ascent: f64,
    pub descent: f64,
}

impl StandardFont {
    /// Width of `code` in glyph space units.
    pub fn width(&self, code: u32) -> f64 {
        let width = match (self.ascii_widths, code) {
            (Some(widths), 32..=126) => widths[(code - 32) as usize],
            _ => self.fallback_width,
        };
        f64::from(width)
    }
}

/// Look up a standard font by its `/BaseFont` name.
///
/// Subset prefixes (`ABCDEF+`) are stripped and the common TrueType
/// aliases (Arial, Times New Roman, Courier New) resolve to their
/// standard counterparts. Italic and oblique faces share the widths of
/// the upright face.
pub fn lookup(base_font: &str) -> Option<&'static StandardFont> {
    let name = strip_subset_prefix(base_font);
    let (family, style) = match name.split_once(['-', ',']) {
        Some((family, style)) => (family, style),
        None => (name, ""),
    };
    let bold = style.contains("Bold") || family.ends_with("Bold");
    let family = family.trim_end_matches("Bold").trim_end_matches("MT");
    match family {
        "Helvetica" | "Arial" | "ArialMT" => Some(if bold { &HELVETICA_BOLD } else { &HELVETICA }),
        "Times" | "TimesNewRoman" | "TimesNewRomanPS" => {
            Some(if bold { &TIMES_BOLD } else { &TIMES_ROMAN })
        }
        "Courier" | "CourierNew" | "CourierNewPS" => Some(&COURIER),
        _ => None,
    }
}

/// Strip a six-letter subset tag such as `ABCDEF+`.
pub fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => {
            rest
        }
        _ => name,
    }
}

static COURIER: StandardFont = StandardFont {
    ascii_widths: None,
    fallback_width: 600,
    ascent: 629.0,
    descent: -157.0,
};

#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

static HELVETICA: StandardFont = StandardFont {
    ascii_widths: Some(&HELVETICA_WIDTHS),
    fallback_width: 556,
    ascent: 718.0,
    descent: -207.0,
};

#[rustfmt::skip]
static HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

static HELVETICA_BOLD: StandardFont = StandardFont {
    ascii_widths: Some(&HELVETICA_BOLD_WIDTHS),
    fallback_width: 556,
    ascent: 718.0,
    descent: -207.0,
};

#[rustfmt::skip]
static TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

static TIMES_ROMAN: StandardFont = StandardFont {
    ascii_widths: Some(&TIMES_ROMAN_WIDTHS),
    fallback_width: 500,
    ascent: 683.0,
    descent: -217.0,
};

#[rustfmt::skip]
static TIMES_BOLD_WIDTHS: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

static TIMES_BOLD: StandardFont = StandardFont {
    ascii_widths: Some(&TIMES_BOLD_WIDTHS),
    fallback_width: 500,
    ascent: 683.0,
    descent: -217.0,
};
