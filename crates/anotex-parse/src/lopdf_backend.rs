//! lopdf-based PDF document provider.
//!
//! [`LopdfDocument`] opens a PDF with the [lopdf](https://crates.io/crates/lopdf)
//! crate and implements [`DocumentSource`]: document info, per-page
//! annotation records, and lazily rendered page glyphs.

use std::sync::LazyLock;

use anotex_core::{
    AnnotationRecord, AnnotationSubtype, AnotexError, DocumentInfo, DocumentSource,
    ExtractOptions, Glyph, Rect,
};
use lopdf::{Dictionary, Object, ObjectId};
use tracing::{debug, info};

use crate::error::BackendError;
use crate::glyphs::PageGlyphs;
use crate::text_string::decode_text_string;

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: lopdf::Document,
    /// Page object ids in page order (index 0 is page 1).
    page_ids: Vec<ObjectId>,
    options: ExtractOptions,
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

impl LopdfDocument {
    /// Parse `bytes` as a PDF document.
    ///
    /// Encrypted documents are opened with the empty user password first and
    /// then with [`ExtractOptions::password`].
    pub fn open(bytes: &[u8], options: &ExtractOptions) -> Result<Self, BackendError> {
        options.check_input_size(bytes.len())?;
        let mut inner = load(bytes)?;

        let encrypted = inner.is_encrypted() || inner.was_encrypted();
        if inner.is_encrypted() {
            // Loading already tried the empty user password.
            let Some(password) = options.password.as_deref() else {
                return Err(AnotexError::PasswordRequired.into());
            };
            inner = lopdf::Document::load_mem_with_password(bytes, password)
                .map_err(password_error)?;
            debug!("decrypted with supplied password");
        } else if encrypted {
            debug!("decrypted with empty user password");
        }

        let page_ids: Vec<ObjectId> = inner.get_pages().values().copied().collect();
        if encrypted && page_ids.is_empty() {
            return Err(BackendError::Parse(
                "encrypted document has no readable pages".to_string(),
            ));
        }
        info!(pages = page_ids.len(), "opened PDF document");
        Ok(LopdfDocument {
            inner,
            page_ids,
            options: options.clone(),
        })
    }

    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }

    fn page_id(&self, page: usize) -> Result<ObjectId, BackendError> {
        page.checked_sub(1)
            .and_then(|i| self.page_ids.get(i))
            .copied()
            .ok_or_else(|| {
                BackendError::Parse(format!(
                    "page {page} out of range (1..={})",
                    self.page_ids.len()
                ))
            })
    }

    /// Glyph iterator for a page, with the concrete type.
    pub fn page_glyphs(&self, page: usize) -> Result<PageGlyphs<'_>, BackendError> {
        let page_id = self.page_id(page)?;
        let page_dict = self
            .inner
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;
        let content = get_page_content_bytes(&self.inner, page_dict)?;
        let resources = get_page_resources(&self.inner, page_id)?;
        Ok(PageGlyphs::new(&self.inner, content, resources, &self.options))
    }
}

impl DocumentSource for LopdfDocument {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn info(&self) -> DocumentInfo {
        extract_document_info(&self.inner)
    }

    fn annotations(&self, page: usize) -> anotex_core::Result<Vec<AnnotationRecord>> {
        let page_id = self.page_id(page)?;
        Ok(extract_page_annotations(&self.inner, page_id, page)?)
    }

    fn glyphs(&self, page: usize) -> anotex_core::Result<Box<dyn Iterator<Item = Glyph> + '_>> {
        Ok(Box::new(self.page_glyphs(page)?))
    }
}

fn load(bytes: &[u8]) -> Result<lopdf::Document, BackendError> {
    lopdf::Document::load_mem(bytes)
        .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))
}

fn password_error(e: lopdf::Error) -> BackendError {
    match e {
        lopdf::Error::InvalidPassword
        | lopdf::Error::Decryption(lopdf::encryption::DecryptionError::IncorrectPassword) => {
            BackendError::Core(AnotexError::InvalidPassword)
        }
        e => BackendError::Parse(format!("decryption failed: {e}")),
    }
}

/// Convert a lopdf numeric object (Integer or Real) to f64.
pub(crate) fn object_to_f64(obj: &Object) -> Result<f64, BackendError> {
    match obj {
        Object::Integer(i) => Ok(*i as f64),
        Object::Real(f) => Ok(f64::from(*f)),
        _ => Err(BackendError::Parse(format!("expected number, got {obj:?}"))),
    }
}

/// Follow one level of indirect reference; unresolvable references are
/// returned as-is.
pub(crate) fn resolve_object<'a>(doc: &'a lopdf::Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Decode a stream, decompressing if needed.
pub(crate) fn decode_content_stream(stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Parse(format!("failed to decompress stream: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}

/// Look up a key in the page dictionary, walking up the page tree
/// (via /Parent) if the key is not found on the page itself.
fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, BackendError> {
    let mut current_id = page_id;
    // Bounded walk; a /Parent cycle must not hang.
    for _ in 0..64 {
        let dict = doc
            .get_object(current_id)
            .and_then(Object::as_dict)
            .map_err(|e| BackendError::Parse(format!("failed to get page tree node: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }

        match dict.get(b"Parent") {
            Ok(parent) => {
                current_id = parent
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
    Ok(None)
}

/// Content stream bytes of a page; arrays of streams are joined with a
/// space.
fn get_page_content_bytes(
    doc: &lopdf::Document,
    page_dict: &Dictionary,
) -> Result<Vec<u8>, BackendError> {
    let Ok(contents) = page_dict.get(b"Contents") else {
        return Ok(Vec::new());
    };

    match resolve_object(doc, contents) {
        Object::Stream(stream) => decode_content_stream(stream),
        Object::Array(items) => {
            let mut content = Vec::new();
            for item in items {
                let stream = resolve_object(doc, item).as_stream().map_err(|e| {
                    BackendError::Parse(format!("/Contents array item is not a stream: {e}"))
                })?;
                let bytes = decode_content_stream(stream)?;
                if !content.is_empty() {
                    content.push(b' ');
                }
                content.extend_from_slice(&bytes);
            }
            Ok(content)
        }
        _ => Err(BackendError::Parse(
            "/Contents is not a stream or array".to_string(),
        )),
    }
}

/// The resources dictionary for a page, honoring inheritance.
fn get_page_resources(
    doc: &lopdf::Document,
    page_id: ObjectId,
) -> Result<&Dictionary, BackendError> {
    static EMPTY_DICT: LazyLock<Dictionary> = LazyLock::new(Dictionary::new);
    match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => resolve_object(doc, obj)
            .as_dict()
            .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string())),
        None => Ok(&EMPTY_DICT),
    }
}

/// A text-string (or name) entry of a dictionary, decoded.
fn extract_string_from_dict(
    doc: &lopdf::Document,
    dict: &Dictionary,
    key: &[u8],
) -> Option<String> {
    match resolve_object(doc, dict.get(key).ok()?) {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

/// Title, subject, author, and keywords from the trailer's `/Info`.
fn extract_document_info(doc: &lopdf::Document) -> DocumentInfo {
    let info = doc
        .trailer
        .get(b"Info")
        .ok()
        .map(|o| resolve_object(doc, o))
        .and_then(|o| o.as_dict().ok());
    let Some(info) = info else {
        return DocumentInfo::default();
    };
    DocumentInfo {
        title: extract_string_from_dict(doc, info, b"Title"),
        subject: extract_string_from_dict(doc, info, b"Subject"),
        author: extract_string_from_dict(doc, info, b"Author"),
        keywords: extract_string_from_dict(doc, info, b"Keywords"),
    }
}

/// Annotation records from a page's `/Annots` array, in array order.
fn extract_page_annotations(
    doc: &lopdf::Document,
    page_id: ObjectId,
    page: usize,
) -> Result<Vec<AnnotationRecord>, BackendError> {
    let page_dict = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

    let Ok(annots) = page_dict.get(b"Annots") else {
        return Ok(Vec::new());
    };
    let annots = resolve_object(doc, annots)
        .as_array()
        .map_err(|e| BackendError::Parse(format!("/Annots is not an array: {e}")))?;

    let mut records = Vec::with_capacity(annots.len());
    for (index, entry) in annots.iter().enumerate() {
        let Ok(dict) = resolve_object(doc, entry).as_dict() else {
            debug!(page, index, "skipping annotation that is not a dictionary");
            continue;
        };
        let Some(subtype) = dict
            .get(b"Subtype")
            .ok()
            .map(|o| resolve_object(doc, o))
            .and_then(|o| o.as_name().ok())
        else {
            debug!(page, index, "skipping annotation without /Subtype");
            continue;
        };
        let Some(rect) = dict
            .get(b"Rect")
            .ok()
            .map(|o| resolve_object(doc, o))
            .and_then(|o| o.as_array().ok())
            .and_then(|arr| rect_from_array(doc, arr))
        else {
            debug!(page, index, "skipping annotation without a usable /Rect");
            continue;
        };

        let mut record = AnnotationRecord::new(
            AnnotationSubtype::from_name(&String::from_utf8_lossy(subtype)),
            rect,
            page,
        );
        record.contents = extract_string_from_dict(doc, dict, b"Contents");
        record.author = extract_string_from_dict(doc, dict, b"T");
        record.modified = extract_string_from_dict(doc, dict, b"M");
        records.push(record);
    }
    Ok(records)
}

/// A `[x1 y1 x2 y2]` rectangle in any corner order.
fn rect_from_array(doc: &lopdf::Document, array: &[Object]) -> Option<Rect> {
    let [x1, y1, x2, y2] = array else {
        return None;
    };
    let n = |o: &Object| object_to_f64(resolve_object(doc, o)).ok();
    Some(Rect::from_array([n(x1)?, n(y1)?, n(x2)?, n(y2)?]))
}
