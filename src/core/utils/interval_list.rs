//! Sorted list of merged half-open intervals.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalMergeList {
    ivals: Vec<(i64, i64)>,
}

impl IntervalMergeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ivals.clear();
    }

    /// Number of disjoint intervals after merging.
    #[inline]
    pub fn len(&self) -> usize {
        self.ivals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ivals.is_empty()
    }

    pub fn intervals(&self) -> &[(i64, i64)] {
        &self.ivals
    }

    /// Add `[start, end)`, merging with any interval it overlaps or touches.
    pub fn add(&mut self, start: i64, end: i64) {
        if end <= start {
            return;
        }
        // first interval whose end reaches start
        let lo = self.ivals.partition_point(|&(_, e)| e < start);
        // first interval that begins after end
        let hi = self.ivals.partition_point(|&(s, _)| s <= end);
        if lo == hi {
            self.ivals.insert(lo, (start, end));
            return;
        }
        let merged_start = start.min(self.ivals[lo].0);
        let merged_end = end.max(self.ivals[hi - 1].1);
        self.ivals.drain(lo..hi);
        self.ivals.insert(lo, (merged_start, merged_end));
    }

    /// True iff `x` lies inside some interval.
    pub fn contains(&self, x: i64) -> bool {
        let idx = self.ivals.partition_point(|&(s, _)| s <= x);
        idx > 0 && x < self.ivals[idx - 1].1
    }
}
