//! The provider seam between the assembler and a concrete document format.

use crate::annotation::AnnotationRecord;
use crate::document::DocumentInfo;
use crate::error::Result;
use crate::geometry::Rect;
use crate::glyph::Glyph;
use crate::region::RegionFilter;

/// An opened document that can list annotations and render page glyphs.
///
/// Pages are addressed by 1-based number. Glyph iterators are lazy and
/// single-pass; they yield glyphs in content-stream emission order.
pub trait DocumentSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Title, subject, author, and raw keywords.
    fn info(&self) -> DocumentInfo;

    /// Annotations on `page`, in the document's native order.
    fn annotations(&self, page: usize) -> Result<Vec<AnnotationRecord>>;

    /// Rendered glyphs of `page`.
    fn glyphs(&self, page: usize) -> Result<Box<dyn Iterator<Item = Glyph> + '_>>;

    /// Text of the glyphs on `page` fully inside `rect`.
    fn region_text(&self, page: usize, rect: &Rect) -> Result<String> {
        if rect.is_degenerate() {
            return Ok(String::new());
        }
        Ok(RegionFilter::new(*rect).extract(self.glyphs(page)?))
    }
}
