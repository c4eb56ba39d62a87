//! Region text filter: the text of the glyphs fully inside a rectangle.
//!
//! Inclusion is decided per glyph with [`Rect::contains`] before any line or
//! word reconstruction happens, so a selection that only grazes a glyph does
//! not pull it in.

use crate::geometry::Rect;
use crate::glyph::Glyph;
use crate::layout::TextBuilder;

/// Filter that keeps glyphs whose boxes lie entirely inside a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionFilter {
    region: Rect,
}

impl RegionFilter {
    pub fn new(region: Rect) -> Self {
        Self { region }
    }

    pub fn region(&self) -> &Rect {
        &self.region
    }

    /// Whether `glyph` belongs to the region.
    pub fn accepts(&self, glyph: &Glyph) -> bool {
        self.region.contains(&glyph.bbox)
    }

    /// Consume `glyphs` and return the text of the accepted ones.
    ///
    /// A degenerate region yields an empty string without touching the input.
    pub fn extract<I>(&self, glyphs: I) -> String
    where
        I: IntoIterator<Item = Glyph>,
    {
        if self.region.is_degenerate() {
            return String::new();
        }
        let mut builder = TextBuilder::new();
        for glyph in glyphs.into_iter().filter(|g| self.accepts(g)) {
            builder.push(&glyph);
        }
        builder.finish()
    }
}

/// Shorthand for `RegionFilter::new(*region).extract(glyphs)`.
pub fn region_text<I>(glyphs: I, region: &Rect) -> String
where
    I: IntoIterator<Item = Glyph>,
{
    RegionFilter::new(*region).extract(glyphs)
}
