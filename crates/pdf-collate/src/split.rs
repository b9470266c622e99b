//! Document splitting
//!
//! Pages are copied into the outputs unmodified; no size normalization
//! happens on this path.

use crate::backend::{PageSource, PdfBackend};
use crate::selector::{PageIndexSet, parse_page_spec};
use crate::types::*;
use std::collections::HashSet;

/// One output document of a split
#[derive(Debug, Clone)]
pub struct SplitPart {
    /// File-name friendly label, e.g. `page_3` or `range_1-4`
    pub label: String,
    /// Zero-based source pages in output order
    pub pages: Vec<usize>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct SplitOutcome {
    pub parts: Vec<SplitPart>,
    /// Range entries that named no page of the document
    pub dropped_entries: usize,
}

/// Split one document into several.
///
/// [`SplitMode::All`] yields one single-page document per page.
/// [`SplitMode::Ranges`] yields one document per entry, each entry read with
/// the [`parse_page_spec`] grammar as the set of pages to include; entries that
/// select nothing are dropped and counted.
pub fn split<B: PdfBackend>(backend: &B, document: &[u8], mode: &SplitMode) -> Result<SplitOutcome> {
    let source = backend
        .open(document)
        .map_err(|e| CollateError::DocumentUnreadable {
            document: 0,
            reason: e.to_string(),
        })?;
    let total = source.page_count();

    let mut dropped_entries = 0;
    let groups: Vec<(String, PageIndexSet)> = match mode {
        SplitMode::All => (0..total)
            .map(|page| (format!("page_{}", page + 1), PageIndexSet::from_iter([page])))
            .collect(),
        SplitMode::Ranges(entries) => {
            let mut groups = Vec::new();
            let mut labels = HashSet::new();
            for entry in entries {
                let pages = parse_page_spec(entry, Some(total));
                if pages.is_empty() {
                    log::warn!("Range {:?} selects no pages of a {}-page document", entry, total);
                    dropped_entries += 1;
                } else {
                    groups.push((unique_label(range_label(entry), &mut labels), pages));
                }
            }
            if groups.is_empty() {
                return Err(CollateError::NoValidInput(format!(
                    "none of the {} ranges selects a page",
                    entries.len()
                )));
            }
            groups
        }
    };

    let mut parts = Vec::with_capacity(groups.len());
    for (label, pages) in groups {
        let mut output = backend.new_document();
        for page in pages.iter() {
            backend.append_page(&mut output, &source, page)?;
        }
        log::debug!("Split part {}: {} pages", label, pages.len());
        parts.push(SplitPart {
            label,
            pages: pages.iter().collect(),
            bytes: backend.serialize(output)?,
        });
    }

    log::info!(
        "Split {} pages into {} documents ({} ranges dropped)",
        total,
        parts.len(),
        dropped_entries
    );

    Ok(SplitOutcome {
        parts,
        dropped_entries,
    })
}

/// Label for a range entry, keeping digits and dashes. Distinct entries may
/// share a label; see [`unique_label`].
fn range_label(entry: &str) -> String {
    let body: String = entry
        .trim()
        .chars()
        .map(|c| if c.is_ascii_digit() || c == '-' { c } else { '_' })
        .collect();
    format!("range_{}", body)
}

/// `label`, or `label_2`, `label_3`, ... if already taken
fn unique_label(label: String, taken: &mut HashSet<String>) -> String {
    let mut candidate = label.clone();
    let mut n = 1;
    while !taken.insert(candidate.clone()) {
        n += 1;
        candidate = format!("{}_{}", label, n);
    }
    candidate
}
