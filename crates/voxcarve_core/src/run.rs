//! Per-cell triangle bookkeeping.
//!
//! Every cell owns one [`RunRecord`]: the contiguous range it emitted during
//! the full meshing pass, plus any ranges appended later when a neighbor's
//! removal exposed one of its hidden faces. Together they are exactly the
//! triangles to blank when the cell itself goes away.

use crate::mesh::TriangleRange;

/// Triangle ranges that draw one cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunRecord {
    /// Range written by the full meshing pass, if the cell emitted anything.
    primary: Option<TriangleRange>,
    /// Ranges appended by later removals, oldest first.
    extra: Vec<TriangleRange>,
}

impl RunRecord {
    /// A record with only a primary range.
    #[must_use]
    pub const fn with_primary(primary: Option<TriangleRange>) -> Self {
        Self {
            primary,
            extra: Vec::new(),
        }
    }

    /// Range from the full meshing pass.
    #[inline]
    #[must_use]
    pub const fn primary(&self) -> Option<TriangleRange> {
        self.primary
    }

    /// Ranges appended since meshing.
    #[inline]
    #[must_use]
    pub fn extra(&self) -> &[TriangleRange] {
        &self.extra
    }

    /// Primary range followed by every extra range.
    pub fn ranges(&self) -> impl Iterator<Item = TriangleRange> + '_ {
        self.primary.into_iter().chain(self.extra.iter().copied())
    }

    /// True if the cell has no triangles at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.extra.is_empty()
    }

    /// Total triangles across all ranges.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.ranges().map(TriangleRange::count).sum()
    }

    /// Appends a range to the tail of the extra list.
    pub fn push_extra(&mut self, range: TriangleRange) {
        self.extra.push(range);
    }

    /// Removes and returns every range, leaving the record empty.
    pub fn take_ranges(&mut self) -> Vec<TriangleRange> {
        let mut ranges: Vec<_> = self.primary.take().into_iter().collect();
        ranges.append(&mut self.extra);
        ranges
    }
}

/// One [`RunRecord`] per cell, in the volume's linear index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTable {
    records: Vec<RunRecord>,
}

impl RunTable {
    /// Creates a table of empty records.
    #[must_use]
    pub fn with_cells(cells: usize) -> Self {
        Self {
            records: vec![RunRecord::default(); cells],
        }
    }

    /// Number of records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if there are no records (the table was never built).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record for a linear cell index.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RunRecord> {
        self.records.get(index)
    }

    /// Mutable record for a linear cell index.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut RunRecord> {
        self.records.get_mut(index)
    }

    /// All records.
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    /// Replaces the record at `index`.
    ///
    /// # Panics
    /// Panics if `index` is past the end.
    pub fn set(&mut self, index: usize, record: RunRecord) {
        self.records[index] = record;
    }
}
