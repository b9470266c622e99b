//! Page specification mini-language
//!
//! Turns user text such as `1,3,5-7` into a set of zero-based page indices.
//! Parsing is lenient: a token that cannot be understood is ignored and the
//! rest of the input is still honored.

use std::fmt;
use std::ops::Range;

/// One comma-separated token of a page specification (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeToken {
    /// A single page number
    Single(usize),
    /// An inclusive page interval, `start <= end`
    Span { start: usize, end: usize },
}

impl RangeToken {
    /// Parse one trimmed token.
    ///
    /// A span's start is clamped up to 1. Returns `None` for anything that is
    /// not an integer or a dashed pair of integers, and for intervals that are
    /// empty after clamping.
    pub fn parse(token: &str) -> Option<RangeToken> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        match token.split_once('-') {
            Some((start, end)) => {
                let start: i64 = start.trim().parse().ok()?;
                let end: i64 = end.trim().parse().ok()?;
                let start = start.max(1);
                if end < start {
                    return None;
                }
                Some(RangeToken::Span {
                    start: usize::try_from(start).ok()?,
                    end: usize::try_from(end).ok()?,
                })
            }
            None => {
                let page: i64 = token.parse().ok()?;
                if page < 1 {
                    return None;
                }
                Some(RangeToken::Single(usize::try_from(page).ok()?))
            }
        }
    }

    /// Zero-based indices named by this token.
    ///
    /// With a known total, a span's end is clamped to it and a single page
    /// outside the document yields nothing.
    pub fn indices(self, total_pages: Option<usize>) -> Range<usize> {
        match self {
            RangeToken::Span { start, end } => {
                let end = total_pages.map_or(end, |total| end.min(total));
                let first = start - 1;
                first..end.max(first)
            }
            RangeToken::Single(page) => {
                let index = page - 1;
                match total_pages {
                    Some(total) if index >= total => index..index,
                    _ => index..page,
                }
            }
        }
    }
}

/// Canonical set of zero-based page indices.
///
/// Stored as sorted, disjoint, non-touching ranges, so an open-ended span
/// costs the same as a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageIndexSet(Vec<Range<usize>>);

impl PageIndexSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: usize) -> bool {
        let added = !self.contains(index);
        self.insert_range(index..index.saturating_add(1));
        added
    }

    /// Add every index in `range`, merging with overlapping or adjacent runs
    pub fn insert_range(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }

        let first = self.0.partition_point(|r| r.end < range.start);
        let last = first + self.0[first..].partition_point(|r| r.start <= range.end);

        let mut merged = range;
        if first < last {
            merged.start = merged.start.min(self.0[first].start);
            merged.end = merged.end.max(self.0[last - 1].end);
        }
        self.0.splice(first..last, [merged]);
    }

    pub fn contains(&self, index: usize) -> bool {
        let slot = self.0.partition_point(|r| r.end <= index);
        self.0.get(slot).is_some_and(|r| r.start <= index)
    }

    pub fn len(&self) -> usize {
        self.0.iter().map(|r| r.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().flat_map(|r| r.clone())
    }

    /// Maximal runs of consecutive indices, ascending
    pub fn ranges(&self) -> &[Range<usize>] {
        &self.0
    }

    /// Pages left in a document of `total_pages` after removing this set
    pub fn remaining(&self, total_pages: usize) -> usize {
        let removed: usize = self
            .0
            .iter()
            .map(|r| r.end.min(total_pages).saturating_sub(r.start))
            .sum();
        total_pages - removed
    }
}

impl FromIterator<usize> for PageIndexSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<usize> for PageIndexSet {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        for index in iter {
            self.insert(index);
        }
    }
}

/// Displays as 1-based page numbers with runs collapsed, e.g. `1, 3, 5-7`
impl fmt::Display for PageIndexSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, run) in self.0.iter().enumerate() {
            if n > 0 {
                f.write_str(", ")?;
            }
            if run.len() == 1 {
                write!(f, "{}", run.start + 1)?;
            } else {
                write!(f, "{}-{}", run.start + 1, run.end)?;
            }
        }
        Ok(())
    }
}

/// Parse a page specification into zero-based indices.
///
/// `total_pages` bounds the result when known; without it single pages are
/// accepted unchecked and span ends are not clamped. Never fails: empty input
/// yields an empty set and malformed tokens are skipped.
pub fn parse_page_spec(text: &str, total_pages: Option<usize>) -> PageIndexSet {
    let mut set = PageIndexSet::new();
    for token in text.split(',') {
        match RangeToken::parse(token) {
            Some(range) => set.insert_range(range.indices(total_pages)),
            None => {
                if !token.trim().is_empty() {
                    log::debug!("Ignoring malformed page token {:?}", token.trim());
                }
            }
        }
    }
    set
}
