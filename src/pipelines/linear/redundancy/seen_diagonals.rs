//! Diagonals already covered by a DP window, per mate and reference strand.

use std::collections::HashMap;

use crate::core::alignment::Mate;
use crate::core::utils::IntervalMergeList;

#[derive(Debug, Clone, Default)]
pub struct SeenDiagonals {
    // indexed by Mate::slot
    mates: [HashMap<(usize, bool), IntervalMergeList>; 2],
}

impl SeenDiagonals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `diag` on (`ref_id`, `fw`) was already covered for `mate`.
    pub fn contains(&self, mate: Mate, ref_id: usize, fw: bool, diag: i64) -> bool {
        self.mates[mate.slot()]
            .get(&(ref_id, fw))
            .is_some_and(|l| l.contains(diag))
    }

    /// Mark diagonals `[lo, hi)` as covered.
    pub fn add(&mut self, mate: Mate, ref_id: usize, fw: bool, lo: i64, hi: i64) {
        self.mates[mate.slot()]
            .entry((ref_id, fw))
            .or_default()
            .add(lo, hi);
    }

    pub fn clear(&mut self) {
        for m in &mut self.mates {
            m.clear();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mates.iter().all(|m| m.values().all(|l| l.is_empty()))
    }

    /// Merged intervals recorded for `mate`.
    pub fn num_intervals(&self, mate: Mate) -> usize {
        self.mates[mate.slot()].values().map(|l| l.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_by_reference_and_strand() {
        let mut seen = SeenDiagonals::new();
        seen.add(Mate::Mate1, 2, true, 100, 111);
        assert!(seen.contains(Mate::Mate1, 2, true, 100));
        assert!(seen.contains(Mate::Mate1, 2, true, 110));
        assert!(!seen.contains(Mate::Mate1, 2, true, 111));
        assert!(!seen.contains(Mate::Mate1, 2, false, 105));
        assert!(!seen.contains(Mate::Mate1, 3, true, 105));
        assert!(!seen.contains(Mate::Mate2, 2, true, 105));
    }

    #[test]
    fn test_unpaired_shares_first_slot() {
        let mut seen = SeenDiagonals::new();
        seen.add(Mate::Unpaired, 0, true, 0, 5);
        assert!(seen.contains(Mate::Mate1, 0, true, 3));
    }

    #[test]
    fn test_merge_and_clear() {
        let mut seen = SeenDiagonals::new();
        seen.add(Mate::Mate2, 0, true, 0, 10);
        seen.add(Mate::Mate2, 0, true, 10, 20);
        assert_eq!(seen.num_intervals(Mate::Mate2), 1);
        seen.clear();
        assert!(seen.is_empty());
        assert!(!seen.contains(Mate::Mate2, 0, true, 5));
    }
}
