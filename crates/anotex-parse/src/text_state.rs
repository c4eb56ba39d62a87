//! Text state for the glyph renderer.
//!
//! Tracks the parameters set by text state operators (Tc, Tw, Tz, TL, Tf,
//! Ts), the text and line matrices (BT, Tm, Td, TD, T*), and computes the
//! text rendering matrix used to place each glyph.

use anotex_core::Ctm;

/// Text state parameters saved and restored by `q`/`Q`.
///
/// Text and line matrices are not part of the graphics state and are
/// not included.
#[derive(Debug, Clone, PartialEq)]
pub struct TextParams {
    pub char_spacing: f64,
    pub word_spacing: f64,
    /// Horizontal scaling as a percentage (100 = normal).
    pub h_scaling: f64,
    pub leading: f64,
    /// Resource name of the current font (`F1`), empty before any `Tf`.
    pub font_name: String,
    pub font_size: f64,
    pub rise: f64,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 100.0,
            leading: 0.0,
            font_name: String::new(),
            font_size: 0.0,
            rise: 0.0,
        }
    }
}

/// Full text state: parameters plus the matrices of the current text object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextState {
    pub params: TextParams,
    text_matrix: Ctm,
    line_matrix: Ctm,
}

impl TextState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text_matrix(&self) -> &Ctm {
        &self.text_matrix
    }

    pub fn line_matrix(&self) -> &Ctm {
        &self.line_matrix
    }

    /// Horizontal scaling as a fraction (1.0 = 100%).
    pub fn h_scaling_normalized(&self) -> f64 {
        self.params.h_scaling / 100.0
    }

    /// `BT`: reset both matrices to identity.
    pub fn begin_text(&mut self) {
        self.text_matrix = Ctm::identity();
        self.line_matrix = Ctm::identity();
    }

    /// `Tf`
    pub fn set_font(&mut self, font_name: String, font_size: f64) {
        self.params.font_name = font_name;
        self.params.font_size = font_size;
    }

    /// `Tm`: replace (not concatenate) the text and line matrices.
    pub fn set_text_matrix(&mut self, m: [f64; 6]) {
        let m = Ctm::new(m[0], m[1], m[2], m[3], m[4], m[5]);
        self.text_matrix = m;
        self.line_matrix = m;
    }

    /// `Td`: start a new line offset from the start of the current one.
    pub fn move_text_position(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Ctm::translation(tx, ty).concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    /// `TD`: `-ty TL` followed by `tx ty Td`.
    pub fn move_text_position_and_set_leading(&mut self, tx: f64, ty: f64) {
        self.params.leading = -ty;
        self.move_text_position(tx, ty);
    }

    /// `T*`: equivalent to `0 -TL Td`.
    pub fn move_to_next_line(&mut self) {
        let leading = self.params.leading;
        self.move_text_position(0.0, -leading);
    }

    /// Move the text matrix horizontally by `tx` text space units.
    pub fn advance(&mut self, tx: f64) {
        self.text_matrix = Ctm::translation(tx, 0.0).concat(&self.text_matrix);
    }

    /// Horizontal displacement after showing a glyph of width `w0`
    /// (glyph space, thousandths of an em).
    pub fn glyph_advance(&self, w0: f64, is_space: bool) -> f64 {
        let p = &self.params;
        let mut tx = (w0 / 1000.0) * p.font_size + p.char_spacing;
        if is_space {
            tx += p.word_spacing;
        }
        tx * self.h_scaling_normalized()
    }

    /// Displacement for a `TJ` number adjustment.
    pub fn adjustment_advance(&self, adjustment: f64) -> f64 {
        -(adjustment / 1000.0) * self.params.font_size * self.h_scaling_normalized()
    }

    /// Text rendering matrix: `[Tfs×Th 0 0 Tfs 0 Trise] × Tm × CTM`.
    pub fn rendering_matrix(&self, ctm: &Ctm) -> Ctm {
        let p = &self.params;
        let font = Ctm::new(
            p.font_size * self.h_scaling_normalized(),
            0.0,
            0.0,
            p.font_size,
            0.0,
            p.rise,
        );
        font.concat(&self.text_matrix).concat(ctm)
    }
}
