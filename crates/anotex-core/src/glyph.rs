use crate::geometry::Rect;

/// Fraction of the font size used as space width when a font has no space glyph.
pub const DEFAULT_SPACE_RATIO: f64 = 0.25;

/// One rendered character (or short ligature run) with its page-space box.
///
/// Glyphs are produced by a page renderer in content-stream emission order.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Unicode text of the glyph.
    pub text: String,
    /// Bounding box in page space (bottom-left origin).
    pub bbox: Rect,
    /// Effective font size in page space.
    pub font_size: f64,
    /// Width of a space in the glyph's font, in page space.
    pub space_width: f64,
}

impl Glyph {
    /// Create a glyph whose font size is taken from the box height.
    pub fn new(text: impl Into<String>, bbox: Rect) -> Self {
        let font_size = bbox.height;
        Self {
            text: text.into(),
            bbox,
            font_size,
            space_width: font_size * DEFAULT_SPACE_RATIO,
        }
    }

    pub fn with_metrics(text: impl Into<String>, bbox: Rect, font_size: f64, space_width: f64) -> Self {
        Self {
            text: text.into(),
            bbox,
            font_size,
            space_width,
        }
    }

    /// True when the glyph text is empty or only whitespace.
    pub fn is_whitespace(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}
