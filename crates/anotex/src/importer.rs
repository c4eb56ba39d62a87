//! Importers turn a document file into an [`AnnotatedDocument`].

use std::fs;
use std::path::Path;

use anotex_core::{AnnotatedDocument, AnotexError, ExtractOptions, Result, assemble};
use anotex_parse::LopdfDocument;
use tracing::debug;

use crate::format::FileFormat;

/// Reads the annotations of one document format.
pub trait AnnotationImporter {
    fn read_annotations(&self, path: &Path, options: &ExtractOptions) -> Result<AnnotatedDocument>;
}

/// Importer for PDF documents, backed by [`LopdfDocument`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfAnnotationImporter;

impl PdfAnnotationImporter {
    /// Read annotations from PDF bytes already in memory.
    pub fn read_bytes(&self, bytes: &[u8], options: &ExtractOptions) -> Result<AnnotatedDocument> {
        let doc = LopdfDocument::open(bytes, options)?;
        Ok(assemble(&doc))
    }
}

impl AnnotationImporter for PdfAnnotationImporter {
    fn read_annotations(&self, path: &Path, options: &ExtractOptions) -> Result<AnnotatedDocument> {
        if !path.is_file() {
            return Err(AnotexError::NotFound(path.to_path_buf()));
        }
        let bytes = fs::read(path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "read PDF input");
        self.read_bytes(&bytes, options)
    }
}

/// The importer registered for `format`.
pub fn importer_for(format: FileFormat) -> Result<Box<dyn AnnotationImporter>> {
    match format {
        FileFormat::Pdf => Ok(Box::new(PdfAnnotationImporter)),
        other => Err(AnotexError::UnsupportedFormat(format!(
            "no importer for {other} documents"
        ))),
    }
}
