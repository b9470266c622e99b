//! Page geometry normalization
//!
//! This module decides how every page of a merge ends up on a common canvas:
//! - Cataloguing the page sizes of all inputs
//! - Choosing one target size
//! - Planning the scale and offset of each source size

mod catalog;
mod plan;
mod standard;
mod target;

pub use catalog::{PageGeometryRecord, catalog_documents};
pub use plan::{PlanCache, PlanNotice, PlannedTransform, TransformPlan, plan_transform};
pub use standard::{StandardSize, nearest_standard_size, standard_sizes};
pub use target::{SizeSelection, select_target_size};
