use crate::constants::mm_to_pt;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollateError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Invalid page: {0}")]
    InvalidPage(String),
    #[error("Document {document} is unreadable: {reason}")]
    DocumentUnreadable { document: usize, reason: String },
    #[error("Page {page} of document {document} could not be transformed: {reason}")]
    PageTransformFailed {
        document: usize,
        page: usize,
        reason: String,
    },
    #[error("No valid input: {0}")]
    NoValidInput(String),
}

pub type Result<T> = std::result::Result<T, CollateError>;

/// Page dimensions in points (1/72 inch)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions are finite and strictly positive
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn approx_eq(&self, other: &PageSize, tolerance: f32) -> bool {
        (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }

    /// Width divided by height
    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    /// Size rounded to one decimal place, which absorbs floating noise
    /// from MediaBox values like 595.2756.
    pub fn rounded(&self) -> PageSize {
        PageSize::new(
            (self.width * 10.0).round() / 10.0,
            (self.height * 10.0).round() / 10.0,
        )
    }

    /// Hashable key for the rounded size (tenths of a point)
    pub(crate) fn key(&self) -> (i64, i64) {
        (
            (self.width * 10.0).round() as i64,
            (self.height * 10.0).round() as i64,
        )
    }

    pub fn with_orientation(self, orientation: Orientation) -> PageSize {
        let (short, long) = if self.width <= self.height {
            (self.width, self.height)
        } else {
            (self.height, self.width)
        };
        match orientation {
            Orientation::Portrait => PageSize::new(short, long),
            Orientation::Landscape => PageSize::new(long, short),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} × {:.1} pt", self.width, self.height)
    }
}

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height > width (default for most paper sizes)
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl PaperSize {
    /// Get base dimensions (always portrait: width < height)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Tabloid => (279.4, 431.8),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PaperSize::A3 => "A3",
            PaperSize::A4 => "A4",
            PaperSize::A5 => "A5",
            PaperSize::Letter => "Letter",
            PaperSize::Legal => "Legal",
            PaperSize::Tabloid => "Tabloid",
        }
    }

    /// Page size in points with orientation applied
    pub fn size_with_orientation(self, orientation: Orientation) -> PageSize {
        let (w, h) = self.dimensions_mm();
        PageSize::new(mm_to_pt(w), mm_to_pt(h)).with_orientation(orientation)
    }
}

/// How the single target page size of a merge is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SizeMode {
    /// Most frequent literal page size
    #[default]
    MostCommonExact,
    /// Most frequent page size snapped to the nearest standard paper size
    MostCommonStandard,
    /// Standard paper size with the lowest aspect/down-scaling cost
    BestFitStandard,
}

/// How a page is brought onto the target canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TransformMode {
    /// Uniform scale to fit inside the target, centered with symmetric margins
    #[default]
    FitCentered,
    /// Content left unscaled; only the page boundary changes.
    /// Content larger than the target may be clipped by viewers.
    CanvasOnly,
}

/// A recovered, non-fatal problem encountered during a merge
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// The document could not be opened and contributed no pages
    DocumentUnreadable { document: usize, reason: String },
    /// The page could not be rendered with its planned transform and was
    /// copied at its original size instead (or dropped when `dropped` is set)
    PageTransformFailed {
        document: usize,
        page: usize,
        reason: String,
        dropped: bool,
    },
    /// The page's size could not be used for planning; it keeps its own size
    DegenerateSource { document: usize, page: usize },
    /// Canvas-only mode on a page larger than the target
    MayClip {
        document: usize,
        page: usize,
        source: PageSize,
        target: PageSize,
    },
    /// The document's processing was cancelled or every page failed
    DocumentFailed { document: usize, reason: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DocumentUnreadable { document, reason } => {
                write!(f, "document {} skipped (unreadable): {}", document + 1, reason)
            }
            Warning::PageTransformFailed {
                document,
                page,
                reason,
                dropped,
            } => {
                let outcome = if *dropped { "dropped" } else { "kept at original size" };
                write!(
                    f,
                    "document {} page {}: transform failed ({}), {}",
                    document + 1,
                    page + 1,
                    reason,
                    outcome
                )
            }
            Warning::DegenerateSource { document, page } => write!(
                f,
                "document {} page {}: unusable page size, kept at original size",
                document + 1,
                page + 1
            ),
            Warning::MayClip {
                document,
                page,
                source,
                target,
            } => write!(
                f,
                "document {} page {}: {} exceeds canvas {}, content may be clipped",
                document + 1,
                page + 1,
                source,
                target
            ),
            Warning::DocumentFailed { document, reason } => {
                write!(f, "document {} failed: {}", document + 1, reason)
            }
        }
    }
}

/// Statistics about a merge
#[derive(Debug, Clone, PartialEq)]
pub struct MergeStatistics {
    /// Total pages across the documents counted in `documents_processed`
    pub original_pages: usize,
    /// Pages those documents excluded by deletion specs
    pub removed_pages: usize,
    /// Pages in the merged output
    pub final_pages: usize,
    /// Documents that contributed pages
    pub documents_processed: usize,
    /// Documents that were unreadable, cancelled, or failed on every page
    pub documents_failed: usize,
    /// The page size every page was normalized to
    pub target_size: PageSize,
    pub warnings: Vec<Warning>,
}

/// Split output options
#[derive(Debug, Clone, PartialEq)]
pub enum SplitMode {
    /// One document per page
    All,
    /// One document per page-spec entry
    Ranges(Vec<String>),
}
