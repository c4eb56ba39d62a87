//! High-level extraction: detect the input format, import, export.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anotex_core::{AnnotatedDocument, AnotexError, ExtractOptions, Result};
use tracing::info;

use crate::exporter::exporter_for;
use crate::format::{FileFormat, file_extension};
use crate::importer::importer_for;

/// Extracts annotations from documents and writes them out.
///
/// # Example
///
/// ```no_run
/// use anotex::AnnotationExtractor;
///
/// let written = AnnotationExtractor::new()
///     .extract_annotations("paper.pdf", None)
///     .unwrap();
/// assert_eq!(written.to_str(), Some("paper.pdf.md"));
/// ```
#[derive(Debug, Clone)]
pub struct AnnotationExtractor {
    options: ExtractOptions,
    export_format: FileFormat,
}

impl Default for AnnotationExtractor {
    fn default() -> Self {
        Self {
            options: ExtractOptions::default(),
            export_format: FileFormat::Markdown,
        }
    }
}

impl AnnotationExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_export_format(mut self, format: FileFormat) -> Self {
        self.export_format = format;
        self
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    pub fn export_format(&self) -> FileFormat {
        self.export_format
    }

    /// Read the annotations of `input`.
    ///
    /// # Errors
    ///
    /// [`AnotexError::UnsupportedFormat`] when the extension has no importer,
    /// [`AnotexError::NotFound`] when the file does not exist, and
    /// [`AnotexError::ParseError`] when it cannot be opened as its format.
    pub fn read_annotations(&self, input: impl AsRef<Path>) -> Result<AnnotatedDocument> {
        let input = input.as_ref();
        let format = FileFormat::detect(input).ok_or_else(|| unsupported_input(input))?;
        let importer = importer_for(format)?;
        importer.read_annotations(input, &self.options)
    }

    /// Extract annotations from `input` and write them to `output`.
    ///
    /// Without an explicit output the export format's extension is appended
    /// to the input path. Missing parent directories are created and an
    /// existing file is overwritten. Returns the path written.
    pub fn extract_annotations(
        &self,
        input: impl AsRef<Path>,
        output: Option<&Path>,
    ) -> Result<PathBuf> {
        let input = input.as_ref();
        let exporter = exporter_for(self.export_format)?;
        let doc = self.read_annotations(input)?;

        let output = match output {
            Some(path) => path.to_path_buf(),
            None => self.default_output(input),
        };
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(&output)?);
        exporter.export(&doc, &mut writer)?;

        info!(
            input = %input.display(),
            output = %output.display(),
            annotations = doc.annotations.len(),
            "annotations extracted"
        );
        Ok(output)
    }

    /// `input` with the export format's extension appended.
    pub fn default_output(&self, input: &Path) -> PathBuf {
        let mut name = input.as_os_str().to_owned();
        name.push(self.export_format.extension());
        PathBuf::from(name)
    }
}

fn unsupported_input(path: &Path) -> AnotexError {
    match file_extension(path) {
        Some(ext) => AnotexError::UnsupportedFormat(format!("'{ext}'")),
        None => AnotexError::UnsupportedFormat(format!(
            "cannot detect format of '{}'",
            path.display()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_appends_extension() {
        let extractor = AnnotationExtractor::new();
        assert_eq!(
            extractor.default_output(Path::new("docs/paper.pdf")),
            PathBuf::from("docs/paper.pdf.md")
        );
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = AnnotationExtractor::new()
            .read_annotations("notes.txt")
            .unwrap_err();
        assert_eq!(err, AnotexError::UnsupportedFormat("'.txt'".to_string()));
    }

    #[test]
    fn markdown_input_is_unsupported() {
        let err = AnnotationExtractor::new()
            .read_annotations("notes.md")
            .unwrap_err();
        assert!(matches!(err, AnotexError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_pdf_is_not_found() {
        let err = AnnotationExtractor::new()
            .read_annotations("no/such/file.pdf")
            .unwrap_err();
        assert_eq!(err, AnotexError::NotFound(PathBuf::from("no/such/file.pdf")));
    }

    #[test]
    fn pdf_is_not_an_export_format() {
        let err = AnnotationExtractor::new()
            .with_export_format(FileFormat::Pdf)
            .extract_annotations("whatever.pdf", None)
            .unwrap_err();
        assert!(matches!(err, AnotexError::UnsupportedFormat(_)));
    }
}
