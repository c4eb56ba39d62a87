//! anotex: extract highlights and comments from PDF documents.
//!
//! This is the public API facade. It re-exports anotex-core and uses
//! anotex-parse to open PDFs.
//!
//! # Architecture
//!
//! - **anotex-core**: backend-independent geometry, resolution, normalization
//!   and assembly
//! - **anotex-parse**: lopdf document provider and page text renderer
//! - **anotex** (this crate): format detection, importers, exporters and
//!   [`AnnotationExtractor`]

pub mod exporter;
pub mod extractor;
pub mod format;
pub mod importer;

pub use anotex_core;
pub use anotex_core::{
    AnnotatedDocument, Annotation, AnotexError, ExtractOptions, Result, UnicodeNorm,
};
pub use anotex_parse;
pub use exporter::{AnnotationExporter, MarkdownExporter, exporter_for};
pub use extractor::AnnotationExtractor;
pub use format::FileFormat;
pub use importer::{AnnotationImporter, PdfAnnotationImporter, importer_for};
