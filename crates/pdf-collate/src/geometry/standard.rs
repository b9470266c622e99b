//! Standard paper size table

use crate::types::{Orientation, PageSize, PaperSize};
use std::sync::LazyLock;

/// A named entry of the standard size table
#[derive(Debug, Clone, PartialEq)]
pub struct StandardSize {
    /// Human name, e.g. "A4" or "Letter Horizontal"
    pub name: String,
    pub size: PageSize,
}

const TABLE_ORDER: [PaperSize; 6] = [
    PaperSize::A4,
    PaperSize::Letter,
    PaperSize::Legal,
    PaperSize::A3,
    PaperSize::A5,
    PaperSize::Tabloid,
];

static STANDARD_SIZES: LazyLock<Vec<StandardSize>> = LazyLock::new(|| {
    TABLE_ORDER
        .iter()
        .flat_map(|&paper| {
            [
                StandardSize {
                    name: paper.name().to_string(),
                    size: paper.size_with_orientation(Orientation::Portrait),
                },
                StandardSize {
                    name: format!("{} Horizontal", paper.name()),
                    size: paper.size_with_orientation(Orientation::Landscape),
                },
            ]
        })
        .collect()
});

/// The ordered standard size table. Order decides ties.
pub fn standard_sizes() -> &'static [StandardSize] {
    &STANDARD_SIZES
}

/// Closest table entry within `tolerance` on both axes.
///
/// Distance is the larger of the two axis differences; ties go to the
/// earlier entry.
pub fn nearest_standard_size(size: PageSize, tolerance: f32) -> Option<&'static StandardSize> {
    let mut best: Option<(&StandardSize, f32)> = None;

    for entry in standard_sizes() {
        if !entry.size.approx_eq(&size, tolerance) {
            continue;
        }
        let distance = (entry.size.width - size.width)
            .abs()
            .max((entry.size.height - size.height).abs());
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((entry, distance));
        }
    }

    best.map(|(entry, _)| entry)
}
