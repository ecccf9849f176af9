//! Backtrace start-cell candidates.
//!
//! After a DP fill, every cell scoring at least the minimum is a potential
//! place to start a backtrace. Candidates are explored best-first; cells that
//! are heuristically redundant with something already tried are skipped and
//! tagged with the reason.

use std::cmp::Ordering;

use super::score::AlnScore;
use crate::defaults::DOMINATION_SQUARE;
use crate::error::Result;

/// What happened to a candidate. Assigned once, never reverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BtFate {
    #[default]
    Unset,
    Succeeded,
    Failed,
    /// Skipped: the start cell was already explored by an earlier backtrace
    FilteredStart,
    /// Skipped: dominated by an earlier attempted candidate
    FilteredDominated,
    /// Skipped: score can no longer matter
    FilteredScore,
}

impl BtFate {
    #[inline]
    pub fn is_filtered(self) -> bool {
        matches!(
            self,
            BtFate::FilteredStart | BtFate::FilteredDominated | BtFate::FilteredScore
        )
    }
}

/// Return `(hi, lo)` of two values.
#[inline]
pub fn ordered_pair(a: usize, b: usize) -> (usize, usize) {
    if a >= b { (a, b) } else { (b, a) }
}

/// A DP cell considered as a backtrace start.
///
/// Row and column are relative to the DP rectangle. The score is always a
/// valid alignment score; `BtCandidate::new` rejects `AlnScore::Invalid`.
#[derive(Debug, Clone, Copy)]
pub struct BtCandidate {
    pub row: usize,
    pub col: usize,
    score: i64,
    fate: BtFate,
}

impl BtCandidate {
    pub fn new(row: usize, col: usize, score: AlnScore) -> Result<Self> {
        let score = score.require("backtrace candidate")?;
        Ok(Self {
            row,
            col,
            score,
            fate: BtFate::Unset,
        })
    }

    #[inline]
    pub fn score(&self) -> i64 {
        self.score
    }

    #[inline]
    pub fn fate(&self) -> BtFate {
        self.fate
    }

    /// True iff this candidate is heuristically dominated by `other`: it lies
    /// within `DOMINATION_SQUARE` rows and columns of `other` (absolute
    /// distance) and does not outscore it.
    #[inline]
    pub fn dominated_by(&self, other: &BtCandidate) -> bool {
        let (row_hi, row_lo) = ordered_pair(self.row, other.row);
        let (col_hi, col_lo) = ordered_pair(self.col, other.col);
        row_hi - row_lo <= DOMINATION_SQUARE
            && col_hi - col_lo <= DOMINATION_SQUARE
            && self.score <= other.score
    }

    fn set_fate(&mut self, fate: BtFate) {
        debug_assert_eq!(self.fate, BtFate::Unset, "candidate fate assigned twice");
        debug_assert_ne!(fate, BtFate::Unset);
        self.fate = fate;
    }
}

impl PartialEq for BtCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.row == other.row && self.col == other.col && self.score == other.score
    }
}

impl Eq for BtCandidate {}

impl PartialOrd for BtCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// "Less" means "explore sooner": higher score first, then lower-right cells.
impl Ord for BtCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.row.cmp(&self.row))
            .then_with(|| other.col.cmp(&self.col))
    }
}

/// Best-first queue of candidates with fate bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct BtCandidateSet {
    cands: Vec<BtCandidate>,
    cursor: usize,
    attempted: Vec<usize>,
    min_score: i64,
}

impl BtCandidateSet {
    /// Collect every cell scoring at least `min_score` and sort into
    /// exploration order. Cells without a valid score are not candidates.
    pub fn from_cells<I>(cells: I, min_score: i64) -> Self
    where
        I: IntoIterator<Item = (usize, usize, AlnScore)>,
    {
        let mut cands: Vec<BtCandidate> = cells
            .into_iter()
            .filter(|(_, _, score)| score.at_least(min_score))
            .filter_map(|(row, col, score)| BtCandidate::new(row, col, score).ok())
            .collect();
        cands.sort();
        Self {
            cands,
            cursor: 0,
            attempted: Vec::new(),
            min_score,
        }
    }

    pub fn clear(&mut self) {
        self.cands.clear();
        self.attempted.clear();
        self.cursor = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cands.is_empty()
    }

    /// Candidates not yet handed out or filtered.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.cands.len() - self.cursor
    }

    #[inline]
    pub fn get(&self, idx: usize) -> &BtCandidate {
        &self.cands[idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = &BtCandidate> {
        self.cands.iter()
    }

    #[inline]
    pub fn min_score(&self) -> i64 {
        self.min_score
    }

    /// Tighten the score floor. Never lowers it.
    pub fn raise_min_score(&mut self, min_score: i64) {
        self.min_score = self.min_score.max(min_score);
    }

    /// Hand out the next candidate worth a backtrace attempt.
    ///
    /// Candidates passed over get their filter fate here. `start_explored`
    /// reports whether a candidate's cell was already covered by an earlier
    /// backtrace.
    pub fn next_candidate<F>(&mut self, mut start_explored: F) -> Option<usize>
    where
        F: FnMut(&BtCandidate) -> bool,
    {
        while self.cursor < self.cands.len() {
            let idx = self.cursor;
            self.cursor += 1;
            let cand = self.cands[idx];
            if cand.score < self.min_score {
                self.cands[idx].set_fate(BtFate::FilteredScore);
                continue;
            }
            if start_explored(&cand) {
                self.cands[idx].set_fate(BtFate::FilteredStart);
                continue;
            }
            let dominated = self
                .attempted
                .iter()
                .any(|&t| cand.dominated_by(&self.cands[t]));
            if dominated {
                self.cands[idx].set_fate(BtFate::FilteredDominated);
                continue;
            }
            self.attempted.push(idx);
            return Some(idx);
        }
        None
    }

    /// Record the outcome of a backtrace attempt from candidate `idx`.
    pub fn resolve(&mut self, idx: usize, succeeded: bool) {
        let fate = if succeeded {
            BtFate::Succeeded
        } else {
            BtFate::Failed
        };
        self.cands[idx].set_fate(fate);
    }

    /// Number of candidates with the given fate.
    pub fn count(&self, fate: BtFate) -> usize {
        self.cands.iter().filter(|c| c.fate == fate).count()
    }
}
