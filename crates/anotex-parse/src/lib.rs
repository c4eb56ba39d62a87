//! anotex-parse: PDF document provider for anotex.
//!
//! Opens documents with lopdf, reads `/Info` and `/Annots`, and renders page
//! content streams into positioned glyphs on demand. The entry point is
//! [`LopdfDocument`], which implements [`anotex_core::DocumentSource`].

pub mod cmap;
pub mod encoding;
pub mod error;
pub mod font;
pub mod glyphs;
pub mod lopdf_backend;
pub mod standard_fonts;
pub mod text_state;
pub mod text_string;
pub mod tokenizer;

pub use anotex_core;
pub use error::BackendError;
pub use glyphs::PageGlyphs;
pub use lopdf_backend::LopdfDocument;
pub use text_string::decode_text_string;
