//! Scoring scheme shared by the backtracer and the driver.
//!
//! Gap of length `k` in the read costs `read_gap_open + k * read_gap_extend`;
//! same shape for reference gaps.

use crate::defaults;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoring {
    /// Bonus per matching base (0 in end-to-end mode)
    pub match_bonus: i64,
    pub mismatch_penalty: i64,
    /// Penalty for a position where read or reference is N
    pub n_penalty: i64,
    pub read_gap_open: i64,
    pub read_gap_extend: i64,
    pub ref_gap_open: i64,
    pub ref_gap_extend: i64,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            match_bonus: defaults::MATCH_BONUS,
            mismatch_penalty: defaults::MISMATCH_PENALTY,
            n_penalty: defaults::N_PENALTY,
            read_gap_open: defaults::READ_GAP_OPEN,
            read_gap_extend: defaults::READ_GAP_EXTEND,
            ref_gap_open: defaults::REF_GAP_OPEN,
            ref_gap_extend: defaults::REF_GAP_EXTEND,
        }
    }
}

impl Scoring {
    /// Score for aligning read base `rd` against reference base `rf`.
    #[inline]
    pub fn pair_score(&self, rd: u8, rf: u8) -> i64 {
        if rd > 3 || rf > 3 {
            -self.n_penalty
        } else if rd == rf {
            self.match_bonus
        } else {
            -self.mismatch_penalty
        }
    }

    /// Best possible score for a read of this length.
    #[inline]
    pub fn perfect_score(&self, read_len: usize) -> i64 {
        self.match_bonus * read_len as i64
    }

    /// Most read-gap positions an alignment can hold and still reach `min_score`.
    pub fn max_read_gaps(&self, min_score: i64, read_len: usize) -> usize {
        max_gaps(
            self.perfect_score(read_len) - min_score,
            self.read_gap_open,
            self.read_gap_extend,
        )
    }

    /// Most reference-gap positions an alignment can hold and still reach `min_score`.
    pub fn max_ref_gaps(&self, min_score: i64, read_len: usize) -> usize {
        max_gaps(
            self.perfect_score(read_len) - min_score,
            self.ref_gap_open,
            self.ref_gap_extend,
        )
    }
}

fn max_gaps(budget: i64, open: i64, extend: i64) -> usize {
    let first = open + extend;
    if budget < first {
        return 0;
    }
    if extend <= 0 {
        return usize::MAX;
    }
    1 + ((budget - first) / extend) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_score() {
        let sc = Scoring::default();
        assert_eq!(sc.pair_score(0, 0), 2);
        assert_eq!(sc.pair_score(0, 1), -6);
        assert_eq!(sc.pair_score(4, 1), -1);
        assert_eq!(sc.pair_score(2, 4), -1);
    }

    #[test]
    fn test_max_gaps() {
        let sc = Scoring::default();
        // 50bp read, perfect 100, min 80 -> budget 20: first gap 8, then 3 each
        assert_eq!(sc.max_read_gaps(80, 50), 5);
        assert_eq!(sc.max_ref_gaps(80, 50), 5);
        // budget below one gap
        assert_eq!(sc.max_read_gaps(95, 50), 0);
    }
}
