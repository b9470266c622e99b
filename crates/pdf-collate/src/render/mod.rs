//! lopdf rendering backend
//!
//! This module handles all PDF-specific operations:
//! - Reading page geometry from loaded documents
//! - Creating XObjects from source pages
//! - Building normalized output pages
//! - Copying pages unmodified
//! - Joining and serializing output documents

mod output;
mod page;
mod xobject;

pub use output::OutputDocument;
pub use page::{copy_page, render_planned_page};
pub use xobject::{
    copy_object_deep, create_page_xobject, inherited_attribute, page_media_box, page_rotation,
};

use crate::backend::{PageSource, PdfBackend};
use crate::geometry::TransformPlan;
use crate::types::{CollateError, PageSize, Result};
use lopdf::{Document, ObjectId};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SOURCE_KEY: AtomicU64 = AtomicU64::new(0);

/// A parsed source document with its pages in reading order
#[derive(Debug)]
pub struct LoadedDocument {
    pub(crate) doc: Document,
    page_ids: Vec<ObjectId>,
    /// Distinguishes sources when their objects are copied into one output
    pub(crate) key: u64,
}

impl LoadedDocument {
    pub fn new(doc: Document) -> Self {
        let page_ids = doc.get_pages().values().copied().collect();
        Self {
            doc,
            page_ids,
            key: NEXT_SOURCE_KEY.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub(crate) fn page_id(&self, index: usize) -> Result<ObjectId> {
        self.page_ids.get(index).copied().ok_or_else(|| {
            CollateError::InvalidPage(format!(
                "page {} is out of range (document has {} pages)",
                index + 1,
                self.page_ids.len()
            ))
        })
    }
}

impl PageSource for LoadedDocument {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page_size(&self, index: usize) -> Result<PageSize> {
        let page_id = self.page_id(index)?;
        let [x0, y0, x1, y1] = page_media_box(&self.doc, page_id).ok_or_else(|| {
            CollateError::InvalidPage(format!("page {} has no usable MediaBox", index + 1))
        })?;
        let (width, height) = ((x1 - x0).abs(), (y1 - y0).abs());
        // Sizes are as displayed, after /Rotate
        match page_rotation(&self.doc, page_id) {
            90 | 270 => Ok(PageSize::new(height, width)),
            _ => Ok(PageSize::new(width, height)),
        }
    }
}

/// [`PdfBackend`] built on lopdf.
///
/// Rendered pages are drawn as Form XObjects under a `cm` matrix; unmodified
/// pages are deep-copied with their inherited attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfBackend;

impl PdfBackend for LopdfBackend {
    type Source = LoadedDocument;
    type Output = OutputDocument;

    fn open(&self, bytes: &[u8]) -> Result<LoadedDocument> {
        Ok(LoadedDocument::new(Document::load_mem(bytes)?))
    }

    fn new_document(&self) -> OutputDocument {
        OutputDocument::new()
    }

    fn append_rendered_page(
        &self,
        dst: &mut OutputDocument,
        source: &LoadedDocument,
        index: usize,
        plan: &TransformPlan,
    ) -> Result<()> {
        render_planned_page(dst, source, index, plan)
    }

    fn append_page(
        &self,
        dst: &mut OutputDocument,
        source: &LoadedDocument,
        index: usize,
    ) -> Result<()> {
        copy_page(dst, source, index)
    }

    fn output_page_count(&self, doc: &OutputDocument) -> usize {
        doc.page_count()
    }

    fn concatenate(&self, parts: Vec<OutputDocument>) -> Result<OutputDocument> {
        let mut parts = parts.into_iter();
        let mut merged = parts.next().unwrap_or_default();
        for part in parts {
            merged.append(part);
        }
        Ok(merged)
    }

    fn serialize(&self, doc: OutputDocument) -> Result<Vec<u8>> {
        let mut doc = doc.finish();
        doc.compress();
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok(writer)
    }
}
