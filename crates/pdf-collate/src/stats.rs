use crate::backend::{PageSource, PdfBackend};
use crate::types::*;
use std::collections::HashMap;

/// Page size distribution of one input document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSizes {
    /// Position of the document in the input list
    pub document: usize,
    pub page_count: usize,
    /// Rounded sizes with their page counts, in first-seen order
    pub sizes: Vec<(PageSize, usize)>,
}

/// Page size analysis across a set of documents
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SizeReport {
    pub documents: Vec<DocumentSizes>,
    /// Documents that could not be opened, with the reason
    pub unreadable: Vec<(usize, String)>,
    /// Distribution over every readable page
    pub overall: Vec<(PageSize, usize)>,
}

impl SizeReport {
    pub fn total_pages(&self) -> usize {
        self.documents.iter().map(|d| d.page_count).sum()
    }
}

/// Tally page sizes per document and overall
pub fn analyze_page_sizes<B, D>(backend: &B, documents: &[D]) -> SizeReport
where
    B: PdfBackend,
    D: AsRef<[u8]>,
{
    let mut report = SizeReport::default();
    let mut overall = SizeTally::default();

    for (document, bytes) in documents.iter().enumerate() {
        let source = match backend.open(bytes.as_ref()) {
            Ok(source) => source,
            Err(e) => {
                report.unreadable.push((document, e.to_string()));
                continue;
            }
        };

        let mut tally = SizeTally::default();
        for page in 0..source.page_count() {
            if let Ok(size) = source.page_size(page) {
                tally.add(size);
                overall.add(size);
            }
        }

        report.documents.push(DocumentSizes {
            document,
            page_count: source.page_count(),
            sizes: tally.into_counts(),
        });
    }

    report.overall = overall.into_counts();
    report
}

/// Counts of rounded sizes, remembering first-seen order
#[derive(Default)]
struct SizeTally {
    index: HashMap<(i64, i64), usize>,
    counts: Vec<(PageSize, usize)>,
}

impl SizeTally {
    fn add(&mut self, size: PageSize) {
        let rounded = size.rounded();
        match self.index.get(&rounded.key()) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(rounded.key(), self.counts.len());
                self.counts.push((rounded, 1));
            }
        }
    }

    fn into_counts(self) -> Vec<(PageSize, usize)> {
        self.counts
    }
}
