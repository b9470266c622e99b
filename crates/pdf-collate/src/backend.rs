//! Document capability interface
//!
//! The merge and split engines only talk to PDFs through these traits, so the
//! page rendering strategy is a property of the backend rather than of the
//! algorithms. [`crate::render::LopdfBackend`] is the production backend.

use crate::geometry::TransformPlan;
use crate::types::{PageSize, Result};

/// Read access to the pages of an opened document
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Size of the page at `index` (zero-based) in points
    fn page_size(&self, index: usize) -> Result<PageSize>;
}

/// Open, compose and serialize documents
pub trait PdfBackend {
    type Source: PageSource;
    type Output;

    /// Parse a document from bytes
    fn open(&self, bytes: &[u8]) -> Result<Self::Source>;

    /// Start an empty output document
    fn new_document(&self) -> Self::Output;

    /// Append page `index` of `source` to `dst`, drawn on a fresh canvas
    /// according to `plan`
    fn append_rendered_page(
        &self,
        dst: &mut Self::Output,
        source: &Self::Source,
        index: usize,
        plan: &TransformPlan,
    ) -> Result<()>;

    /// Append page `index` of `source` to `dst` unmodified
    fn append_page(&self, dst: &mut Self::Output, source: &Self::Source, index: usize)
    -> Result<()>;

    fn output_page_count(&self, doc: &Self::Output) -> usize;

    /// Join documents in order into one
    fn concatenate(&self, parts: Vec<Self::Output>) -> Result<Self::Output>;

    fn serialize(&self, doc: Self::Output) -> Result<Vec<u8>>;
}
