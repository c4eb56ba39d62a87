//! File formats known to the extractor.

use std::fmt;
use std::path::Path;

/// A document format that can be imported from or exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Pdf,
    Markdown,
}

impl FileFormat {
    pub const ALL: [FileFormat; 2] = [FileFormat::Pdf, FileFormat::Markdown];

    pub fn name(self) -> &'static str {
        match self {
            FileFormat::Pdf => "Pdf",
            FileFormat::Markdown => "Markdown",
        }
    }

    /// File extension including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Pdf => ".pdf",
            FileFormat::Markdown => ".md",
        }
    }

    /// Look up a format by its display name (`"Pdf"`, `"Markdown"`).
    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Detect the format of `path` from its file extension.
    pub fn detect(path: &Path) -> Option<Self> {
        let ext = file_extension(path)?;
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercased extension of the final path component, with its dot.
///
/// A dot that is the first or the last character does not start an
/// extension, so `.hidden` and `name.` have none.
pub(crate) fn file_extension(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let idx = name.rfind('.')?;
    if idx == 0 || idx == name.len() - 1 {
        return None;
    }
    Some(name[idx..].to_lowercase())
}
