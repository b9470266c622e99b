//! Page size cataloguing across documents

use crate::backend::PageSource;
use crate::types::PageSize;

/// Size of one page of one input document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometryRecord {
    /// Position of the document in the input list
    pub document_id: usize,
    /// Zero-based page index within the document
    pub page_index: usize,
    pub size: PageSize,
}

/// Record every page size, in document-then-page order.
///
/// Documents are paired with their position in the original input list, so
/// callers that already dropped unreadable inputs keep stable ids. Pages whose
/// size cannot be read are left out.
pub fn catalog_documents<'a, S, I>(documents: I) -> Vec<PageGeometryRecord>
where
    S: PageSource + 'a,
    I: IntoIterator<Item = (usize, &'a S)>,
{
    let mut records = Vec::new();

    for (document_id, doc) in documents {
        for page_index in 0..doc.page_count() {
            match doc.page_size(page_index) {
                Ok(size) => records.push(PageGeometryRecord {
                    document_id,
                    page_index,
                    size,
                }),
                Err(e) => log::warn!(
                    "Skipping size of page {} in document {}: {}",
                    page_index + 1,
                    document_id + 1,
                    e
                ),
            }
        }
    }

    records
}
