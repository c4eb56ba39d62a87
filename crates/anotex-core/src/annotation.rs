//! Annotation records and the per-annotation text resolver.
//!
//! A record either carries usable literal text, or (for highlights) points at
//! a page region whose rendered text stands in for it. [`TextSource::of`]
//! makes that decision once; [`resolve`] runs it and normalizes the result.

use std::fmt;

use crate::geometry::Rect;
use crate::normalize;
use crate::source::DocumentSource;

/// Annotation subtype as named by the PDF `/Subtype` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationSubtype {
    Text,
    FreeText,
    Highlight,
    Underline,
    StrikeOut,
    Squiggly,
    Square,
    Circle,
    Ink,
    Stamp,
    Link,
    Popup,
    /// Any subtype not listed above, with its raw name.
    Other(String),
}

impl AnnotationSubtype {
    /// Parse a `/Subtype` name (without the leading slash).
    pub fn from_name(name: &str) -> Self {
        match name {
            "Text" => Self::Text,
            "FreeText" => Self::FreeText,
            "Highlight" => Self::Highlight,
            "Underline" => Self::Underline,
            "StrikeOut" => Self::StrikeOut,
            "Squiggly" => Self::Squiggly,
            "Square" => Self::Square,
            "Circle" => Self::Circle,
            "Ink" => Self::Ink,
            "Stamp" => Self::Stamp,
            "Link" => Self::Link,
            "Popup" => Self::Popup,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "Text",
            Self::FreeText => "FreeText",
            Self::Highlight => "Highlight",
            Self::Underline => "Underline",
            Self::StrikeOut => "StrikeOut",
            Self::Squiggly => "Squiggly",
            Self::Square => "Square",
            Self::Circle => "Circle",
            Self::Ink => "Ink",
            Self::Stamp => "Stamp",
            Self::Link => "Link",
            Self::Popup => "Popup",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for AnnotationSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One annotation as read from a page, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRecord {
    pub subtype: AnnotationSubtype,
    /// Annotation rectangle in page space.
    pub rect: Rect,
    /// Decoded `/Contents`, if present.
    pub contents: Option<String>,
    /// 1-based page number the annotation belongs to.
    pub page: usize,
    /// `/T` entry (author); logged, never emitted.
    pub author: Option<String>,
    /// `/M` entry (modification date); logged, never emitted.
    pub modified: Option<String>,
}

impl AnnotationRecord {
    pub fn new(subtype: AnnotationSubtype, rect: Rect, page: usize) -> Self {
        Self {
            subtype,
            rect,
            contents: None,
            page,
            author: None,
            modified: None,
        }
    }

    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    /// Literal contents, if they hold anything besides whitespace.
    pub fn literal_text(&self) -> Option<&str> {
        self.contents
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// Where an annotation's text comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum TextSource {
    /// Text stored in the annotation itself.
    Literal(String),
    /// Text rendered inside `rect` on `page`.
    Region { rect: Rect, page: usize },
    /// The annotation has no text.
    None,
}

impl TextSource {
    /// Literal text wins for every subtype; otherwise only highlights fall
    /// back to their region.
    pub fn of(record: &AnnotationRecord) -> Self {
        if let Some(text) = record.literal_text() {
            return Self::Literal(text.to_string());
        }
        match record.subtype {
            AnnotationSubtype::Highlight => Self::Region {
                rect: record.rect,
                page: record.page,
            },
            _ => Self::None,
        }
    }
}

/// Resolve and normalize the text of one annotation.
///
/// Returns `None` when the annotation contributes nothing. Never fails: a
/// region that cannot be rendered is logged and treated as empty.
pub fn resolve<S>(record: &AnnotationRecord, source: &S) -> Option<String>
where
    S: DocumentSource + ?Sized,
{
    let text = match TextSource::of(record) {
        TextSource::Literal(text) => normalize::normalize_literal(&text),
        TextSource::Region { rect, page } => match source.region_text(page, &rect) {
            Ok(raw) => normalize::normalize_derived(&raw),
            Err(err) => {
                tracing::warn!(page, error = %err, "failed to render highlighted region");
                return None;
            }
        },
        TextSource::None => return None,
    };
    (!text.is_empty()).then_some(text)
}
