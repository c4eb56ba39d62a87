//! Document assembler: walks pages and annotations in order and collects
//! the resolved texts together with document metadata.

use tracing::{debug, info, warn};

use crate::annotation::resolve;
use crate::document::{AnnotatedDocument, Annotation, parse_keywords};
use crate::source::DocumentSource;

/// Build the annotation-only view of an opened document.
///
/// Pages are visited from 1 to `page_count()`; annotations keep the
/// provider's order within a page. Nothing below the open boundary fails:
/// a page whose annotations cannot be read is skipped with a warning.
pub fn assemble<S>(source: &S) -> AnnotatedDocument
where
    S: DocumentSource + ?Sized,
{
    let info = source.info();
    let keywords = parse_keywords(info.keywords.as_deref());
    let page_count = source.page_count();

    let mut annotations = Vec::new();
    for page in 1..=page_count {
        let records = match source.annotations(page) {
            Ok(records) => records,
            Err(err) => {
                warn!(page, error = %err, "skipping page with unreadable annotations");
                continue;
            }
        };
        for record in &records {
            let author = record.author.as_deref();
            let modified = record.modified.as_deref();
            match resolve(record, source) {
                Some(text) => {
                    debug!(page, subtype = %record.subtype, author, modified, "resolved annotation");
                    annotations.push(Annotation { text, page });
                }
                None => debug!(
                    page,
                    subtype = %record.subtype,
                    author,
                    modified,
                    "annotation yields no text"
                ),
            }
        }
    }

    info!(
        pages = page_count,
        annotations = annotations.len(),
        "assembled annotated document"
    );

    AnnotatedDocument {
        title: info.title,
        subject: info.subject,
        author: info.author,
        keywords,
        annotations,
    }
}
