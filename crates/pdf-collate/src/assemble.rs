//! Normalizing merge
//!
//! This module orchestrates the merge process:
//! 1. Open every input, skipping the unreadable ones
//! 2. Catalogue page sizes and pick one target size
//! 3. Drop deleted pages and redraw the rest onto the target canvas
//! 4. Join the per-document results in input order

use crate::backend::{PageSource, PdfBackend};
use crate::cancel::CancellationFlag;
use crate::geometry::{
    PlanCache, PlanNotice, SizeSelection, catalog_documents, select_target_size,
};
use crate::options::MergeOptions;
use crate::selector::{PageIndexSet, parse_page_spec};
use crate::types::*;

/// Merged document bytes with what happened along the way
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub bytes: Vec<u8>,
    pub stats: MergeStatistics,
}

/// What became of one kept page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageOutcome {
    Rendered,
    KeptOriginal,
    Dropped,
}

/// Per-document context shared by every page of the document
struct DocumentJob<'a, B: PdfBackend> {
    backend: &'a B,
    document: usize,
    source: &'a B::Source,
    plans: &'a mut PlanCache,
    warnings: &'a mut Vec<Warning>,
}

/// Merge documents into one, normalizing every page to a single size.
///
/// `deletion_specs[i]` names the pages removed from `documents[i]` before
/// merging (see [`parse_page_spec`]); a missing entry removes nothing.
/// Unreadable documents and failing pages are skipped and reported in the
/// statistics. Fails with [`CollateError::NoValidInput`] only when no
/// document contributes a page.
pub fn normalize_and_merge<B, D, S>(
    backend: &B,
    documents: &[D],
    deletion_specs: &[S],
    options: &MergeOptions,
    cancel: Option<&CancellationFlag>,
) -> Result<MergeOutcome>
where
    B: PdfBackend,
    D: AsRef<[u8]>,
    S: AsRef<str>,
{
    options.validate()?;

    let mut warnings = Vec::new();
    let sources = open_documents(backend, documents, &mut warnings);
    let mut documents_failed = documents.len() - sources.len();

    let records = catalog_documents(sources.iter().map(|(document, source)| (*document, source)));
    let selection = select_target_size(&records, options);
    match &selection.standard_name {
        Some(name) => log::info!("Target page size: {} ({})", selection.size, name),
        None if selection.is_default => {
            log::info!("Target page size: {} (default)", selection.size)
        }
        None => log::info!("Target page size: {}", selection.size),
    }

    let mut plans = PlanCache::new(selection.size, options.transform_mode);
    let mut parts = Vec::new();
    let mut original_pages = 0;
    let mut removed_pages = 0;
    let mut documents_processed = 0;

    for (document, source) in &sources {
        let total = source.page_count();
        let spec = deletion_specs.get(*document).map_or("", |s| s.as_ref());
        let excluded = parse_page_spec(spec, Some(total));
        if !excluded.is_empty() {
            log::info!("Document {}: removing pages {}", document + 1, excluded);
        }

        let mut job = DocumentJob {
            backend,
            document: *document,
            source,
            plans: &mut plans,
            warnings: &mut warnings,
        };

        match job.assemble(&excluded, cancel) {
            Ok(part) => {
                documents_processed += 1;
                original_pages += total;
                removed_pages += excluded.len();
                let pages = backend.output_page_count(&part);
                log::info!("Document {}: {} of {} pages kept", document + 1, pages, total);
                if pages > 0 {
                    parts.push(part);
                }
            }
            Err(reason) => {
                log::warn!("Document {} failed: {}", document + 1, reason);
                documents_failed += 1;
                warnings.push(Warning::DocumentFailed {
                    document: *document,
                    reason,
                });
            }
        }
    }
    log::debug!("Planned {} distinct source sizes", plans.len());

    if parts.is_empty() {
        return Err(CollateError::NoValidInput(
            "no document contributed any pages".to_string(),
        ));
    }

    let merged = backend.concatenate(parts)?;
    let final_pages = backend.output_page_count(&merged);
    let bytes = backend.serialize(merged)?;

    Ok(MergeOutcome {
        bytes,
        stats: MergeStatistics {
            original_pages,
            removed_pages,
            final_pages,
            documents_processed,
            documents_failed,
            target_size: selection.size,
            warnings,
        },
    })
}

/// The target size a merge of `documents` would normalize to
pub fn preview_target_size<B, D>(backend: &B, documents: &[D], options: &MergeOptions) -> SizeSelection
where
    B: PdfBackend,
    D: AsRef<[u8]>,
{
    let sources = open_documents(backend, documents, &mut Vec::new());
    let records = catalog_documents(sources.iter().map(|(document, source)| (*document, source)));
    select_target_size(&records, options)
}

/// Open every document, recording the unreadable ones as warnings
fn open_documents<B, D>(
    backend: &B,
    documents: &[D],
    warnings: &mut Vec<Warning>,
) -> Vec<(usize, B::Source)>
where
    B: PdfBackend,
    D: AsRef<[u8]>,
{
    let mut sources = Vec::with_capacity(documents.len());
    for (document, bytes) in documents.iter().enumerate() {
        match backend.open(bytes.as_ref()) {
            Ok(source) => sources.push((document, source)),
            Err(e) => {
                log::warn!("Skipping unreadable document {}: {}", document + 1, e);
                warnings.push(Warning::DocumentUnreadable {
                    document,
                    reason: e.to_string(),
                });
            }
        }
    }
    sources
}

impl<B: PdfBackend> DocumentJob<'_, B> {
    /// Build this document's contribution. Errors carry the reason the whole
    /// document was given up on.
    fn assemble(
        &mut self,
        excluded: &PageIndexSet,
        cancel: Option<&CancellationFlag>,
    ) -> std::result::Result<B::Output, String> {
        let mut output = self.backend.new_document();
        let mut kept = 0;
        let mut dropped = 0;

        for page in 0..self.source.page_count() {
            if cancel.is_some_and(CancellationFlag::is_cancelled) {
                return Err("cancelled".to_string());
            }
            if excluded.contains(page) {
                continue;
            }

            kept += 1;
            if self.append_page(&mut output, page) == PageOutcome::Dropped {
                dropped += 1;
            }
        }

        if kept > 0 && dropped == kept {
            return Err(format!("all {} pages failed", kept));
        }
        Ok(output)
    }

    /// Append one page, falling back from the planned render to an
    /// unmodified copy, and finally to dropping the page.
    fn append_page(&mut self, output: &mut B::Output, page: usize) -> PageOutcome {
        let document = self.document;

        let failure = match self.source.page_size(page) {
            Ok(size) => {
                let planned = self.plans.plan(size);
                match planned.notice {
                    Some(PlanNotice::DegenerateSource) => {
                        log::warn!(
                            "Document {} page {}: unusable size {}, keeping original",
                            document + 1,
                            page + 1,
                            size
                        );
                        self.warnings
                            .push(Warning::DegenerateSource { document, page });
                        None
                    }
                    notice => {
                        if notice == Some(PlanNotice::MayClip) {
                            log::warn!(
                                "Document {} page {}: {} is larger than the canvas and may be clipped",
                                document + 1,
                                page + 1,
                                size
                            );
                            self.warnings.push(Warning::MayClip {
                                document,
                                page,
                                source: size,
                                target: planned.plan.target_size,
                            });
                        }
                        log::debug!(
                            "Document {} page {}: scale {:.4}, offset ({:.2}, {:.2})",
                            document + 1,
                            page + 1,
                            planned.plan.scale,
                            planned.plan.offset_x,
                            planned.plan.offset_y
                        );
                        match self.backend.append_rendered_page(
                            output,
                            self.source,
                            page,
                            &planned.plan,
                        ) {
                            Ok(()) => return PageOutcome::Rendered,
                            Err(e) => Some(e.to_string()),
                        }
                    }
                }
            }
            Err(e) => Some(e.to_string()),
        };

        match self.backend.append_page(output, self.source, page) {
            Ok(()) => {
                if let Some(reason) = failure {
                    log::warn!(
                        "Document {} page {}: transform failed ({}), keeping original size",
                        document + 1,
                        page + 1,
                        reason
                    );
                    self.warnings.push(Warning::PageTransformFailed {
                        document,
                        page,
                        reason,
                        dropped: false,
                    });
                }
                PageOutcome::KeptOriginal
            }
            Err(e) => {
                let reason = match failure {
                    Some(first) => format!("{}; copy failed: {}", first, e),
                    None => format!("copy failed: {}", e),
                };
                log::warn!("Document {} page {}: dropped ({})", document + 1, page + 1, reason);
                self.warnings.push(Warning::PageTransformFailed {
                    document,
                    page,
                    reason,
                    dropped: true,
                });
                PageOutcome::Dropped
            }
        }
    }
}
