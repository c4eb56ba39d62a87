//! Line and word reconstruction from glyphs in emission order.
//!
//! Glyphs are never reordered. A line break is emitted when a glyph's
//! vertical midpoint leaves the previous glyph's vertical span, and a single
//! space when a same-line gap is wider than half a space.

use crate::geometry::Rect;
use crate::glyph::Glyph;

/// Incremental text builder fed one glyph at a time.
#[derive(Debug, Default)]
pub struct TextBuilder {
    out: String,
    last: Option<Anchor>,
}

#[derive(Debug, Clone, Copy)]
struct Anchor {
    bbox: Rect,
    space_width: f64,
    whitespace: bool,
}

impl TextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, glyph: &Glyph) {
        let whitespace = glyph.is_whitespace();
        if let Some(prev) = self.last {
            if !same_line(&prev.bbox, &glyph.bbox) {
                if !self.out.ends_with('\n') {
                    self.out.push('\n');
                }
            } else if !prev.whitespace && !whitespace && is_word_gap(&prev, glyph) {
                self.out.push(' ');
            }
        }
        self.out.push_str(&glyph.text);
        self.last = Some(Anchor {
            bbox: glyph.bbox,
            space_width: glyph.space_width,
            whitespace,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Reconstruct text for a full glyph sequence.
pub fn reconstruct_text<'a, I>(glyphs: I) -> String
where
    I: IntoIterator<Item = &'a Glyph>,
{
    let mut builder = TextBuilder::new();
    for glyph in glyphs {
        builder.push(glyph);
    }
    builder.finish()
}

fn same_line(prev: &Rect, next: &Rect) -> bool {
    let mid = next.mid_y();
    mid >= prev.y && mid <= prev.top()
}

fn is_word_gap(prev: &Anchor, next: &Glyph) -> bool {
    // Jumping back to the left on the same line also separates words.
    if next.bbox.right() <= prev.bbox.x {
        return true;
    }
    let threshold = prev.space_width.max(next.space_width) / 2.0;
    next.bbox.x - prev.bbox.right() > threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(text: &str, x: f64, y: f64, width: f64) -> Glyph {
        Glyph::with_metrics(text, Rect::new(x, y, width, 12.0), 12.0, 3.0)
    }

    fn word(text: &str, x: f64, y: f64) -> Vec<Glyph> {
        text.chars()
            .enumerate()
            .map(|(i, c)| glyph(&c.to_string(), x + i as f64 * 6.0, y, 6.0))
            .collect()
    }

    #[test]
    fn adjacent_glyphs_form_one_word() {
        assert_eq!(reconstruct_text(&word("abc", 0.0, 100.0)), "abc");
    }

    #[test]
    fn gap_wider_than_half_space_inserts_space() {
        let mut glyphs = word("One", 0.0, 100.0);
        glyphs.extend(word("Two", 18.0 + 3.3, 100.0));
        assert_eq!(reconstruct_text(&glyphs), "One Two");
    }

    #[test]
    fn small_kerning_gap_keeps_word_together() {
        let mut glyphs = word("ke", 0.0, 100.0);
        glyphs.extend(word("rn", 12.0 + 1.0, 100.0));
        assert_eq!(reconstruct_text(&glyphs), "kern");
    }

    #[test]
    fn explicit_space_glyph_is_not_doubled() {
        let mut glyphs = word("One", 0.0, 100.0);
        glyphs.push(glyph(" ", 18.0, 100.0, 3.0));
        glyphs.extend(word("Two", 25.0, 100.0));
        assert_eq!(reconstruct_text(&glyphs), "One Two");
    }

    #[test]
    fn vertical_move_starts_new_line() {
        let mut glyphs = word("top", 0.0, 700.0);
        glyphs.extend(word("next", 0.0, 686.0));
        assert_eq!(reconstruct_text(&glyphs), "top\nnext");
    }

    #[test]
    fn backwards_jump_on_same_line_separates_words() {
        let mut glyphs = word("right", 100.0, 50.0);
        glyphs.extend(word("left", 0.0, 50.0));
        assert_eq!(reconstruct_text(&glyphs), "right left");
    }

    #[test]
    fn emission_order_is_preserved() {
        let mut glyphs = word("second", 0.0, 600.0);
        glyphs.extend(word("first", 0.0, 700.0));
        assert_eq!(reconstruct_text(&glyphs), "second\nfirst");
    }

    #[test]
    fn empty_input_yields_empty_string() {
        assert_eq!(reconstruct_text(&Vec::<Glyph>::new()), "");
        assert!(TextBuilder::new().is_empty());
    }
}
