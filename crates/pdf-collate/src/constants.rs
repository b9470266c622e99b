//! Shared constants for page normalization
//!
//! This module centralizes magic numbers and constants used throughout
//! the merge and split process.

use crate::types::PageSize;

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

// =============================================================================
// Target Size Selection
// =============================================================================

/// Default target size when nothing can be catalogued (A4 in whole points)
pub const DEFAULT_PAGE_SIZE: PageSize = PageSize::new(595.0, 842.0);

/// Default tolerance for treating two sizes as equal (points)
pub const DEFAULT_TOLERANCE_PT: f32 = 5.0;

/// Weight of the down-scaling penalty in best-fit cost, per point of overflow
pub const DEFAULT_DOWNSCALE_WEIGHT: f32 = 0.01;

// =============================================================================
// Rendering
// =============================================================================

/// MediaBox used when a page has none and no ancestor provides one (US Letter)
pub const FALLBACK_MEDIA_BOX: (f32, f32) = (612.0, 792.0);

/// PDF version written for newly built documents
pub const OUTPUT_PDF_VERSION: &str = "1.7";

/// Name under which a page's Form XObject is registered on its output page
pub const PAGE_XOBJECT_NAME: &str = "P0";

/// Page attributes a page may inherit from its ancestors in the page tree
pub const INHERITABLE_PAGE_KEYS: [&[u8]; 4] = [b"MediaBox", b"Resources", b"CropBox", b"Rotate"];
