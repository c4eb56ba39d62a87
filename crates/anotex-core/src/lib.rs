//! anotex-core: backend-independent types and algorithms for extracting
//! annotation text.
//!
//! The pipeline is: [`assemble`] walks a [`DocumentSource`], [`resolve`]
//! picks literal or region-derived text for each [`AnnotationRecord`], the
//! [`RegionFilter`] keeps glyphs fully inside a highlight, and the passes in
//! [`normalize`] clean the result.

pub mod annotation;
pub mod assemble;
pub mod document;
pub mod error;
pub mod geometry;
pub mod glyph;
pub mod layout;
pub mod normalize;
pub mod region;
pub mod source;
pub mod unicode_norm;

pub use annotation::{AnnotationRecord, AnnotationSubtype, TextSource, resolve};
pub use assemble::assemble;
pub use document::{AnnotatedDocument, Annotation, DocumentInfo, parse_keywords};
pub use error::{AnotexError, ExtractOptions, Result};
pub use geometry::{Ctm, Point, Rect};
pub use glyph::Glyph;
pub use layout::{TextBuilder, reconstruct_text};
pub use region::{RegionFilter, region_text};
pub use source::DocumentSource;
pub use unicode_norm::UnicodeNorm;
