//! Lazy page renderer producing positioned glyphs.
//!
//! [`PageGlyphs`] interprets a page's content stream one operator at a time
//! and yields a [`Glyph`] for every shown character code that maps to text.
//! Form XObjects are entered in place up to the configured nesting depth.
//! Nothing beyond the glyphs of the current text-showing operator is
//! buffered, so a caller that stops early never pays for the rest of the
//! page.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use anotex_core::{Ctm, ExtractOptions, Glyph, Point, Rect, UnicodeNorm};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, warn};

use crate::font::Font;
use crate::lopdf_backend::{decode_content_stream, object_to_f64, resolve_object};
use crate::text_state::{TextParams, TextState};
use crate::tokenizer::{Operand, Operation, Operations};

/// Graphics state saved by `q` and restored by `Q`.
#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Ctm,
    text: TextParams,
    font: Rc<Font>,
}

/// One content stream being interpreted: the page itself or a form XObject.
struct Frame<'a> {
    ops: Operations<'static>,
    resources: &'a Dictionary,
    /// Graphics state to reinstate when the frame ends.
    saved: Option<GraphicsState>,
    /// `q`/`Q` stack depth on entry; `Q` never pops below it.
    stack_floor: usize,
}

/// Iterator over the glyphs of one page, in content-stream order.
pub struct PageGlyphs<'a> {
    doc: &'a Document,
    frames: Vec<Frame<'a>>,
    ctm: Ctm,
    font: Rc<Font>,
    stack: Vec<GraphicsState>,
    text: TextState,
    fonts: HashMap<ObjectId, Rc<Font>>,
    fallback_font: Rc<Font>,
    pending: VecDeque<Glyph>,
    norm: UnicodeNorm,
    max_depth: usize,
}

impl<'a> PageGlyphs<'a> {
    /// Start interpreting `content` with `resources` in scope.
    pub fn new(
        doc: &'a Document,
        content: Vec<u8>,
        resources: &'a Dictionary,
        options: &ExtractOptions,
    ) -> Self {
        let fallback_font = Rc::new(Font::fallback());
        Self {
            doc,
            frames: vec![Frame {
                ops: Operations::owned(content),
                resources,
                saved: None,
                stack_floor: 0,
            }],
            ctm: Ctm::identity(),
            font: Rc::clone(&fallback_font),
            stack: Vec::new(),
            text: TextState::new(),
            fonts: HashMap::new(),
            fallback_font,
            pending: VecDeque::new(),
            norm: options.unicode_norm,
            max_depth: options.max_recursion_depth,
        }
    }

    fn snapshot(&self) -> GraphicsState {
        GraphicsState {
            ctm: self.ctm,
            text: self.text.params.clone(),
            font: Rc::clone(&self.font),
        }
    }

    fn restore(&mut self, state: GraphicsState) {
        self.ctm = state.ctm;
        self.text.params = state.text;
        self.font = state.font;
    }

    fn apply(&mut self, op: Operation) {
        match op.operator.as_str() {
            "q" => self.stack.push(self.snapshot()),
            "Q" => {
                let floor = self.frames.last().map_or(0, |f| f.stack_floor);
                if self.stack.len() > floor {
                    if let Some(state) = self.stack.pop() {
                        self.restore(state);
                    }
                }
            }
            "cm" => {
                if let Some([a, b, c, d, e, f]) = op.numbers::<6>() {
                    self.ctm = Ctm::new(a, b, c, d, e, f).concat(&self.ctm);
                }
            }
            "BT" => self.text.begin_text(),
            "Tc" => self.set_param(&op, |p, v| p.char_spacing = v),
            "Tw" => self.set_param(&op, |p, v| p.word_spacing = v),
            "Tz" => self.set_param(&op, |p, v| p.h_scaling = v),
            "TL" => self.set_param(&op, |p, v| p.leading = v),
            "Ts" => self.set_param(&op, |p, v| p.rise = v),
            "Tf" => self.set_font(&op),
            // Every render mode yields glyphs, including invisible (OCR) text.
            "Tr" => {}
            "Td" => {
                if let Some([tx, ty]) = op.numbers::<2>() {
                    self.text.move_text_position(tx, ty);
                }
            }
            "TD" => {
                if let Some([tx, ty]) = op.numbers::<2>() {
                    self.text.move_text_position_and_set_leading(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = op.numbers::<6>() {
                    self.text.set_text_matrix(m);
                }
            }
            "T*" => self.text.move_to_next_line(),
            "Tj" => {
                if let Some(bytes) = op.operands.last().and_then(Operand::as_bytes) {
                    self.show(bytes);
                }
            }
            "'" => {
                self.text.move_to_next_line();
                if let Some(bytes) = op.operands.last().and_then(Operand::as_bytes) {
                    self.show(bytes);
                }
            }
            "\"" => {
                if let [.., Operand::Number(aw), Operand::Number(ac), Operand::Bytes(bytes)] =
                    op.operands.as_slice()
                {
                    self.text.params.word_spacing = *aw;
                    self.text.params.char_spacing = *ac;
                    self.text.move_to_next_line();
                    self.show(bytes);
                }
            }
            "TJ" => {
                if let Some(Operand::Array(items)) = op.operands.last() {
                    for item in items {
                        match item {
                            Operand::Bytes(bytes) => self.show(bytes),
                            Operand::Number(adj) => {
                                let tx = self.text.adjustment_advance(*adj);
                                self.text.advance(tx);
                            }
                            _ => {}
                        }
                    }
                }
            }
            "Do" => {
                if let Some(name) = op.operands.last().and_then(Operand::as_name) {
                    self.enter_xobject(name);
                }
            }
            _ => {}
        }
    }

    fn set_param(&mut self, op: &Operation, set: impl FnOnce(&mut TextParams, f64)) {
        if let Some([value]) = op.numbers::<1>() {
            set(&mut self.text.params, value);
        }
    }

    fn set_font(&mut self, op: &Operation) {
        let (Some(name), Some(size)) = (
            op.operands.first().and_then(Operand::as_name),
            op.operands.get(1).and_then(Operand::as_number),
        ) else {
            return;
        };
        self.font = self.load_font(name);
        self.text.set_font(name.to_string(), size);
    }

    fn load_font(&mut self, name: &str) -> Rc<Font> {
        let Some(resources) = self.frames.last().map(|f| f.resources) else {
            return Rc::clone(&self.fallback_font);
        };
        let entry = resources
            .get(b"Font")
            .ok()
            .map(|o| resolve_object(self.doc, o))
            .and_then(|o| o.as_dict().ok())
            .and_then(|fonts| fonts.get(name.as_bytes()).ok());
        let Some(entry) = entry else {
            debug!(font = name, "font resource not found; using fallback metrics");
            return Rc::clone(&self.fallback_font);
        };
        if let Object::Reference(id) = entry {
            if let Some(font) = self.fonts.get(id) {
                return Rc::clone(font);
            }
        }
        let font = match resolve_object(self.doc, entry).as_dict() {
            Ok(dict) => Rc::new(Font::from_dict(self.doc, dict)),
            Err(_) => {
                debug!(font = name, "font resource is not a dictionary");
                return Rc::clone(&self.fallback_font);
            }
        };
        if let Object::Reference(id) = entry {
            self.fonts.insert(*id, Rc::clone(&font));
        }
        font
    }

    /// Render each character code of `bytes` and advance the text matrix.
    fn show(&mut self, bytes: &[u8]) {
        let font = Rc::clone(&self.font);
        let ascent = font.ascent() / 1000.0;
        let descent = font.descent() / 1000.0;
        for code in font.codes(bytes) {
            let w0 = font.width(code);
            let trm = self.text.rendering_matrix(&self.ctm);
            if let Some(text) = font.decode(code).filter(|t| !t.is_empty()) {
                let w = w0 / 1000.0;
                let corners = [
                    Point::new(0.0, descent),
                    Point::new(w, descent),
                    Point::new(0.0, ascent),
                    Point::new(w, ascent),
                ]
                .map(|p| trm.transform_point(p));
                if let Some(bbox) = Rect::from_points(&corners) {
                    let font_size = trm.vertical_scale();
                    let space_width = font.space_width() / 1000.0 * trm.a.hypot(trm.b);
                    self.pending.push_back(Glyph::with_metrics(
                        self.norm.normalize(&text),
                        bbox,
                        font_size,
                        space_width,
                    ));
                }
            }
            let tx = self.text.glyph_advance(w0, font.is_word_space(code));
            self.text.advance(tx);
        }
    }

    fn enter_xobject(&mut self, name: &str) {
        let Some(resources) = self.frames.last().map(|f| f.resources) else {
            return;
        };
        let stream = resources
            .get(b"XObject")
            .ok()
            .map(|o| resolve_object(self.doc, o))
            .and_then(|o| o.as_dict().ok())
            .and_then(|xobjects| xobjects.get(name.as_bytes()).ok())
            .map(|o| resolve_object(self.doc, o))
            .and_then(|o| o.as_stream().ok());
        let Some(stream) = stream else {
            debug!(xobject = name, "XObject not found");
            return;
        };
        let is_form = stream
            .dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            == Some(b"Form".as_slice());
        if !is_form {
            return;
        }
        if self.frames.len() > self.max_depth {
            warn!(
                xobject = name,
                limit = self.max_depth,
                "form XObject nesting limit reached; skipping"
            );
            return;
        }
        let content = match decode_content_stream(stream) {
            Ok(content) => content,
            Err(err) => {
                warn!(xobject = name, %err, "unreadable form XObject");
                return;
            }
        };
        let form_resources = stream
            .dict
            .get(b"Resources")
            .ok()
            .map(|o| resolve_object(self.doc, o))
            .and_then(|o| o.as_dict().ok())
            .unwrap_or(resources);

        let saved = self.snapshot();
        if let Some(m) = stream
            .dict
            .get(b"Matrix")
            .ok()
            .map(|o| resolve_object(self.doc, o))
            .and_then(|o| o.as_array().ok())
            .and_then(|arr| matrix_from_array(arr))
        {
            self.ctm = m.concat(&self.ctm);
        }
        self.frames.push(Frame {
            ops: Operations::owned(content),
            resources: form_resources,
            saved: Some(saved),
            stack_floor: self.stack.len(),
        });
    }

    fn leave_frame(&mut self) {
        if let Some(frame) = self.frames.pop() {
            self.stack.truncate(frame.stack_floor);
            if let Some(saved) = frame.saved {
                self.restore(saved);
            }
        }
    }
}

fn matrix_from_array(arr: &[Object]) -> Option<Ctm> {
    let values: Vec<f64> = arr
        .iter()
        .map(|o| object_to_f64(o).ok())
        .collect::<Option<_>>()?;
    match values.as_slice() {
        [a, b, c, d, e, f] => Some(Ctm::new(*a, *b, *c, *d, *e, *f)),
        _ => None,
    }
}

impl Iterator for PageGlyphs<'_> {
    type Item = Glyph;

    fn next(&mut self) -> Option<Glyph> {
        loop {
            if let Some(glyph) = self.pending.pop_front() {
                return Some(glyph);
            }
            let frame = self.frames.last_mut()?;
            match frame.ops.next() {
                Some(Ok(op)) => self.apply(op),
                Some(Err(err)) => {
                    warn!(%err, depth = self.frames.len(), "malformed content stream; remaining operators skipped");
                    self.leave_frame();
                }
                None => self.leave_frame(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Stream, dictionary};

    fn helvetica_resources() -> Dictionary {
        dictionary! {
            "Font" => dictionary! {
                "F1" => dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica",
                },
            },
        }
    }

    fn render(doc: &Document, resources: &Dictionary, content: &[u8]) -> Vec<Glyph> {
        PageGlyphs::new(doc, content.to_vec(), resources, &ExtractOptions::default()).collect()
    }

    fn text(glyphs: &[Glyph]) -> String {
        glyphs.iter().map(|g| g.text.as_str()).collect()
    }

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn simple_text_positions() {
        let doc = Document::with_version("1.5");
        let resources = helvetica_resources();
        let glyphs = render(&doc, &resources, b"BT /F1 12 Tf 72 700 Td (One Two) Tj ET");
        assert_eq!(text(&glyphs), "One Two");
        let first = &glyphs[0];
        assert_approx(first.bbox.x, 72.0);
        assert_approx(first.bbox.y, 700.0 - 0.207 * 12.0);
        assert_approx(first.bbox.top(), 700.0 + 0.718 * 12.0);
        assert_approx(first.bbox.width, 0.778 * 12.0);
        assert_approx(first.font_size, 12.0);
        assert_approx(first.space_width, 0.278 * 12.0);
        let last = glyphs.last().unwrap();
        assert_approx(last.bbox.right(), 72.0 + 4.057 * 12.0);
    }

    #[test]
    fn tj_array_adjustment_shifts_following_glyph() {
        let doc = Document::with_version("1.5");
        let resources = helvetica_resources();
        let glyphs = render(&doc, &resources, b"BT /F1 10 Tf 0 0 Td [(A) -1000 (B)] TJ ET");
        assert_eq!(text(&glyphs), "AB");
        // A is 667 wide; -1000 adds a full em.
        assert_approx(glyphs[1].bbox.x, 6.67 + 10.0);
    }

    #[test]
    fn ctm_scales_glyph_boxes() {
        let doc = Document::with_version("1.5");
        let resources = helvetica_resources();
        let glyphs = render(
            &doc,
            &resources,
            b"q 2 0 0 2 10 20 cm BT /F1 10 Tf 5 5 Td (A) Tj ET Q BT /F1 10 Tf 5 5 Td (B) Tj ET",
        );
        assert_approx(glyphs[0].bbox.x, 20.0);
        assert_approx(glyphs[0].font_size, 20.0);
        // Q restored the identity CTM.
        assert_approx(glyphs[1].bbox.x, 5.0);
        assert_approx(glyphs[1].font_size, 10.0);
    }

    #[test]
    fn quote_operators_move_to_next_line() {
        let doc = Document::with_version("1.5");
        let resources = helvetica_resources();
        let glyphs = render(
            &doc,
            &resources,
            b"BT /F1 12 Tf 14 TL 72 700 Td (a) Tj (b) ' 1 0 (c) \" ET",
        );
        assert_eq!(text(&glyphs), "abc");
        assert_approx(glyphs[1].bbox.x, 72.0);
        assert_approx(glyphs[1].bbox.y, 686.0 - 0.207 * 12.0);
        assert_approx(glyphs[2].bbox.y, 672.0 - 0.207 * 12.0);
    }

    #[test]
    fn word_spacing_applies_to_spaces_only() {
        let doc = Document::with_version("1.5");
        let resources = helvetica_resources();
        let glyphs = render(&doc, &resources, b"BT /F1 10 Tf 5 Tw (a b) Tj ET");
        // a: 5.56, space: 2.78 + 5
        assert_approx(glyphs[2].bbox.x, 5.56 + 2.78 + 5.0);
    }

    #[test]
    fn unknown_font_uses_fallback_metrics() {
        let doc = Document::with_version("1.5");
        let resources = Dictionary::new();
        let glyphs = render(&doc, &resources, b"BT /F9 10 Tf (Hi) Tj ET");
        assert_eq!(text(&glyphs), "Hi");
        assert_approx(glyphs[1].bbox.x, 6.0);
    }

    #[test]
    fn form_xobject_is_rendered_in_place() {
        let mut doc = Document::with_version("1.5");
        let form = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => vec![0.into(), 0.into(), 200.into(), 50.into()],
                "Matrix" => vec![1.into(), 0.into(), 0.into(), 1.into(), 100.into(), 0.into()],
                "Resources" => helvetica_resources(),
            },
            b"BT /F1 10 Tf 0 0 Td (In) Tj ET".to_vec(),
        ));
        let mut resources = helvetica_resources();
        resources.set("XObject", dictionary! { "Fm0" => form });
        let glyphs = render(
            &doc,
            &resources,
            b"BT /F1 10 Tf 0 0 Td (A) Tj ET /Fm0 Do BT /F1 10 Tf 0 20 Td (Z) Tj ET",
        );
        assert_eq!(text(&glyphs), "AInZ");
        assert_approx(glyphs[1].bbox.x, 100.0);
        // Matrix does not leak out of the form.
        assert_approx(glyphs[3].bbox.x, 0.0);
    }

    #[test]
    fn self_referencing_form_stops_at_depth_limit() {
        let mut doc = Document::with_version("1.5");
        let form_id = doc.new_object_id();
        let form = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "Resources" => dictionary! {
                    "Font" => helvetica_resources().get(b"Font").unwrap().clone(),
                    "XObject" => dictionary! { "Me" => form_id },
                },
            },
            b"BT /F1 10 Tf (x) Tj ET /Me Do".to_vec(),
        );
        doc.objects.insert(form_id, Object::Stream(form));
        let mut resources = helvetica_resources();
        resources.set("XObject", dictionary! { "Me" => form_id });
        let options = ExtractOptions::default().with_max_recursion_depth(3);
        let glyphs: Vec<Glyph> = PageGlyphs::new(&doc, b"/Me Do".to_vec(), &resources, &options).collect();
        assert_eq!(text(&glyphs), "xxx");
    }

    #[test]
    fn malformed_stream_keeps_earlier_glyphs() {
        let doc = Document::with_version("1.5");
        let resources = helvetica_resources();
        let glyphs = render(&doc, &resources, b"BT /F1 10 Tf (ok) Tj ] (lost) Tj ET");
        assert_eq!(text(&glyphs), "ok");
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let doc = Document::with_version("1.5");
        let resources = helvetica_resources();
        let glyphs = render(&doc, &resources, b"Q Q BT /F1 10 Tf (a) Tj ET");
        assert_eq!(text(&glyphs), "a");
    }

    #[test]
    fn unicode_normalization_is_applied() {
        let mut doc = Document::with_version("1.5");
        let cmap = doc.add_object(Stream::new(
            dictionary! {},
            b"1 beginbfchar <01> <FB01> endbfchar".to_vec(),
        ));
        let resources = dictionary! {
            "Font" => dictionary! {
                "F1" => dictionary! {
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica",
                    "ToUnicode" => cmap,
                },
            },
        };
        let options = ExtractOptions::default().with_unicode_norm(UnicodeNorm::Nfkc);
        let glyphs: Vec<Glyph> =
            PageGlyphs::new(&doc, b"BT /F1 10 Tf <01> Tj ET".to_vec(), &resources, &options).collect();
        assert_eq!(text(&glyphs), "fi");
    }

    #[test]
    fn iteration_is_lazy() {
        let doc = Document::with_version("1.5");
        let resources = helvetica_resources();
        let mut glyphs = PageGlyphs::new(
            &doc,
            b"BT /F1 10 Tf (ab) Tj (cd) Tj ET".to_vec(),
            &resources,
            &ExtractOptions::default(),
        );
        assert_eq!(glyphs.next().map(|g| g.text), Some("a".to_string()));
        // Only the first Tj has been interpreted.
        assert_eq!(glyphs.pending.len(), 1);
    }
}
