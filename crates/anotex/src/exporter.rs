//! Exporters serialize an [`AnnotatedDocument`].

use std::io::Write;

use anotex_core::{AnnotatedDocument, AnotexError, Result};

use crate::format::FileFormat;

/// Writes an annotated document in one output format.
pub trait AnnotationExporter {
    fn export(&self, doc: &AnnotatedDocument, out: &mut dyn Write) -> Result<()>;
}

/// Plain Markdown: title heading, quoted subject, keyword list, then one
/// annotation per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownExporter;

impl MarkdownExporter {
    pub fn render(&self, doc: &AnnotatedDocument) -> String {
        let mut buf = String::with_capacity(1024);
        if let Some(title) = &doc.title {
            buf.push_str("# ");
            buf.push_str(title);
            buf.push_str(" #\n\n");
        }
        if let Some(subject) = &doc.subject {
            buf.push('"');
            buf.push_str(subject);
            buf.push_str("\"\n");
        }
        if !doc.keywords.is_empty() {
            buf.push('[');
            buf.push_str(&doc.keywords.join(", "));
            buf.push_str("]\n");
        }
        buf.push('\n');
        for text in doc.texts() {
            buf.push_str(text);
            buf.push('\n');
        }
        buf
    }
}

impl AnnotationExporter for MarkdownExporter {
    fn export(&self, doc: &AnnotatedDocument, out: &mut dyn Write) -> Result<()> {
        out.write_all(self.render(doc).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// The exporter registered for `format`.
pub fn exporter_for(format: FileFormat) -> Result<Box<dyn AnnotationExporter>> {
    match format {
        FileFormat::Markdown => Ok(Box::new(MarkdownExporter)),
        other => Err(AnotexError::UnsupportedFormat(format!(
            "no exporter for {other} documents"
        ))),
    }
}
