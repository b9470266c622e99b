pub mod assemble;
pub mod backend;
mod cancel;
pub mod constants;
pub mod geometry;
pub mod io;
mod options;
pub mod render;
mod selector;
pub mod split;
mod stats;
mod types;

pub use assemble::{MergeOutcome, normalize_and_merge, preview_target_size};
pub use backend::{PageSource, PdfBackend};
pub use cancel::CancellationFlag;
pub use io::{load_multiple, load_pdf_bytes, merge_files, save_bytes, split_file, write_split_outputs};
pub use options::*;
pub use render::{LoadedDocument, LopdfBackend, OutputDocument};
pub use selector::{PageIndexSet, RangeToken, parse_page_spec};
pub use split::{SplitOutcome, SplitPart, split};
pub use stats::{DocumentSizes, SizeReport, analyze_page_sizes};
pub use types::*;
