//! Per-page transform planning
//!
//! A plan says how a source page is drawn onto the target canvas: a uniform
//! scale and the offset of the scaled content's lower-left corner.

use crate::types::{PageSize, TransformMode};
use std::collections::HashMap;

/// How one source page maps onto the output canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformPlan {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    /// Size of the output page
    pub target_size: PageSize,
}

impl TransformPlan {
    /// Leave the page exactly as it is
    pub fn identity(size: PageSize) -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            target_size: size,
        }
    }

    /// Size of the source content after scaling
    pub fn scaled_size(&self, source: PageSize) -> PageSize {
        PageSize::new(source.width * self.scale, source.height * self.scale)
    }
}

/// Something the caller should know about a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanNotice {
    /// The source size was unusable; the plan keeps the page as is
    DegenerateSource,
    /// Canvas-only plan for content larger than the canvas
    MayClip,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedTransform {
    pub plan: TransformPlan,
    pub notice: Option<PlanNotice>,
}

/// Plan how `source` is placed on a `target` canvas.
///
/// Fit-centered scales uniformly so the content fits on both axes and centers
/// it. Canvas-only keeps the content unscaled at the origin and only swaps the
/// page boundary. A source without a usable size gets an identity plan.
pub fn plan_transform(source: PageSize, target: PageSize, mode: TransformMode) -> PlannedTransform {
    if !source.is_valid() || !target.is_valid() {
        return PlannedTransform {
            plan: TransformPlan::identity(source),
            notice: Some(PlanNotice::DegenerateSource),
        };
    }

    match mode {
        TransformMode::FitCentered => {
            let scale_w = target.width / source.width;
            let scale_h = target.height / source.height;
            let scale = scale_w.min(scale_h);

            let offset_x = ((target.width - source.width * scale) / 2.0).max(0.0);
            let offset_y = ((target.height - source.height * scale) / 2.0).max(0.0);

            PlannedTransform {
                plan: TransformPlan {
                    scale,
                    offset_x,
                    offset_y,
                    target_size: target,
                },
                notice: None,
            }
        }
        TransformMode::CanvasOnly => {
            let clips = source.width > target.width || source.height > target.height;
            PlannedTransform {
                plan: TransformPlan {
                    target_size: target,
                    ..TransformPlan::identity(source)
                },
                notice: clips.then_some(PlanNotice::MayClip),
            }
        }
    }
}

/// Plans memoized by exact source size; many pages of a document share one
#[derive(Debug)]
pub struct PlanCache {
    target: PageSize,
    mode: TransformMode,
    plans: HashMap<(u32, u32), PlannedTransform>,
}

impl PlanCache {
    pub fn new(target: PageSize, mode: TransformMode) -> Self {
        Self {
            target,
            mode,
            plans: HashMap::new(),
        }
    }

    pub fn plan(&mut self, source: PageSize) -> PlannedTransform {
        let key = (source.width.to_bits(), source.height.to_bits());
        *self
            .plans
            .entry(key)
            .or_insert_with(|| plan_transform(source, self.target, self.mode))
    }

    /// Number of distinct source sizes planned so far
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}
