//! Document metadata and the assembled, annotation-only document.

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::strip_quotes;

static KEYWORD_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(" ?, ?").expect("valid keyword separator regex"));

/// Document-level metadata as supplied by the document provider.
///
/// `keywords` is the raw, unsplit `/Keywords` string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub author: Option<String>,
    pub keywords: Option<String>,
}

/// A resolved, non-empty annotation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub text: String,
    /// 1-based page the annotation was found on.
    pub page: usize,
}

/// The result of one extraction run.
///
/// Annotations are ordered by page, then by their order on the page, and
/// never carry empty text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedDocument {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub author: Option<String>,
    pub keywords: Vec<String>,
    pub annotations: Vec<Annotation>,
}

impl AnnotatedDocument {
    /// Annotation texts in document order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.annotations.iter().map(|a| a.text.as_str())
    }
}

/// Split a raw keyword string on commas with optional surrounding spaces.
///
/// One layer of enclosing double quotes is removed first. Absent or empty
/// input gives an empty list; trailing empty tokens are dropped.
pub fn parse_keywords(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return Vec::new();
    };
    let unquoted = strip_quotes(raw);
    let mut keywords: Vec<String> = KEYWORD_SEPARATOR
        .split(&unquoted)
        .map(str::to_string)
        .collect();
    while keywords.last().is_some_and(|k| k.is_empty()) {
        keywords.pop();
    }
    keywords
}
