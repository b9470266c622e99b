//! Target page size selection

use super::catalog::PageGeometryRecord;
use super::standard::{nearest_standard_size, standard_sizes};
use crate::options::MergeOptions;
use crate::types::{PageSize, SizeMode};
use std::collections::HashMap;

/// The chosen target size and how it was arrived at
#[derive(Debug, Clone, PartialEq)]
pub struct SizeSelection {
    pub size: PageSize,
    /// Standard size name when the size came from the table
    pub standard_name: Option<String>,
    /// The configured default was used
    pub is_default: bool,
}

impl SizeSelection {
    fn default_size(options: &MergeOptions) -> Self {
        Self {
            size: options.default_size,
            standard_name: None,
            is_default: true,
        }
    }

    fn measured(size: PageSize) -> Self {
        Self {
            size,
            standard_name: None,
            is_default: false,
        }
    }
}

/// Pick the single page size every merged page is normalized to.
///
/// Never fails: an empty catalog yields the configured default size.
pub fn select_target_size(records: &[PageGeometryRecord], options: &MergeOptions) -> SizeSelection {
    if records.is_empty() {
        return SizeSelection::default_size(options);
    }

    match options.size_mode {
        SizeMode::MostCommonExact => most_common_size(records)
            .map(SizeSelection::measured)
            .unwrap_or_else(|| SizeSelection::default_size(options)),
        SizeMode::MostCommonStandard => most_common_size(records)
            .and_then(|size| nearest_standard_size(size, options.tolerance_pt))
            .map(|entry| SizeSelection {
                size: entry.size,
                standard_name: Some(entry.name.clone()),
                is_default: false,
            })
            .unwrap_or_else(|| SizeSelection::default_size(options)),
        SizeMode::BestFitStandard => best_fit_standard(records, options.downscale_weight),
    }
}

/// Most frequent usable size after rounding to 0.1 pt; ties go to the size
/// seen first
fn most_common_size(records: &[PageGeometryRecord]) -> Option<PageSize> {
    let mut counts: HashMap<(i64, i64), usize> = HashMap::new();
    let mut first_seen: Vec<((i64, i64), PageSize)> = Vec::new();

    for record in records.iter().filter(|r| r.size.is_valid()) {
        let rounded = record.size.rounded();
        let key = rounded.key();
        let count = counts.entry(key).or_insert(0);
        if *count == 0 {
            first_seen.push((key, rounded));
        }
        *count += 1;
    }

    let mut best: Option<(PageSize, usize)> = None;
    for (key, size) in first_seen {
        let count = counts[&key];
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((size, count));
        }
    }

    best.map(|(size, _)| size)
}

/// Cost of normalizing every catalogued page onto `candidate`
fn fit_cost(records: &[PageGeometryRecord], candidate: PageSize, weight: f32) -> f32 {
    records
        .iter()
        .filter(|r| r.size.is_valid())
        .map(|r| {
            let ratio_diff = (r.size.aspect_ratio() - candidate.aspect_ratio()).abs();
            let overflow = (r.size.width - candidate.width)
                .max(r.size.height - candidate.height)
                .max(0.0);
            ratio_diff + weight * overflow
        })
        .sum()
}

fn best_fit_standard(records: &[PageGeometryRecord], weight: f32) -> SizeSelection {
    let mut best: Option<(usize, f32)> = None;

    for (idx, entry) in standard_sizes().iter().enumerate() {
        let cost = fit_cost(records, entry.size, weight);
        log::debug!("Best-fit cost for {}: {:.4}", entry.name, cost);
        if best.is_none_or(|(_, c)| cost < c) {
            best = Some((idx, cost));
        }
    }

    // The table is never empty
    let entry = &standard_sizes()[best.map_or(0, |(idx, _)| idx)];
    SizeSelection {
        size: entry.size,
        standard_name: Some(entry.name.clone()),
        is_default: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(sizes: &[(f32, f32)]) -> Vec<PageGeometryRecord> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| PageGeometryRecord {
                document_id: 0,
                page_index: i,
                size: PageSize::new(w, h),
            })
            .collect()
    }

    fn options(size_mode: SizeMode) -> MergeOptions {
        MergeOptions {
            size_mode,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_catalog_returns_default() {
        for mode in [
            SizeMode::MostCommonExact,
            SizeMode::MostCommonStandard,
            SizeMode::BestFitStandard,
        ] {
            let selection = select_target_size(&[], &options(mode));
            assert_eq!(selection.size, PageSize::new(595.0, 842.0));
            assert!(selection.is_default);
        }
    }

    #[test]
    fn test_most_common_exact() {
        let recs = records(&[(612.0, 792.0), (595.0, 842.0), (595.0, 842.0)]);
        let selection = select_target_size(&recs, &options(SizeMode::MostCommonExact));
        assert_eq!(selection.size, PageSize::new(595.0, 842.0));
        assert!(!selection.is_default);
    }

    #[test]
    fn test_rounding_absorbs_noise() {
        let recs = records(&[(612.0, 792.0), (595.2756, 841.8898), (595.28, 841.89)]);
        let selection = select_target_size(&recs, &options(SizeMode::MostCommonExact));
        assert_eq!(selection.size, PageSize::new(595.3, 841.9));
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let recs = records(&[(400.0, 600.0), (612.0, 792.0), (612.0, 792.0), (400.0, 600.0)]);
        let selection = select_target_size(&recs, &options(SizeMode::MostCommonExact));
        assert_eq!(selection.size, PageSize::new(400.0, 600.0));
    }

    #[test]
    fn test_most_common_standard_snaps() {
        let recs = records(&[(610.0, 790.0), (610.0, 790.0), (842.0, 595.0)]);
        let selection = select_target_size(&recs, &options(SizeMode::MostCommonStandard));
        assert_eq!(selection.standard_name.as_deref(), Some("Letter"));
        assert!((selection.size.width - 612.0).abs() < 0.1);
    }

    #[test]
    fn test_most_common_standard_falls_back_to_default() {
        let recs = records(&[(300.0, 300.0)]);
        let selection = select_target_size(&recs, &options(SizeMode::MostCommonStandard));
        assert!(selection.is_default);
        assert_eq!(selection.size, PageSize::new(595.0, 842.0));
    }

    #[test]
    fn test_best_fit_prefers_matching_size() {
        let recs = records(&[(612.0, 792.0), (612.0, 792.0), (600.0, 780.0)]);
        let selection = select_target_size(&recs, &options(SizeMode::BestFitStandard));
        assert_eq!(selection.standard_name.as_deref(), Some("Letter"));
    }

    #[test]
    fn test_best_fit_landscape() {
        let recs = records(&[(840.0, 593.0), (840.0, 593.0)]);
        let selection = select_target_size(&recs, &options(SizeMode::BestFitStandard));
        assert_eq!(selection.standard_name.as_deref(), Some("A4 Horizontal"));
    }

    #[test]
    fn test_best_fit_penalizes_downscaling() {
        // A3-shaped pages match A4's aspect ratio too, but would need shrinking
        let recs = records(&[(842.0, 1191.0)]);
        let selection = select_target_size(&recs, &options(SizeMode::BestFitStandard));
        assert_eq!(selection.standard_name.as_deref(), Some("A3"));
    }
}
