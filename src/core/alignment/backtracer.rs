//! Candidate-driven backtracing over a filled DP matrix.
//!
//! The DP engine owns the matrix and exposes it through `TraceMatrix`; the
//! `NucBacktracer` owns everything else: the candidate queue, the frame
//! stack, the trace arena and the set of cells already reported through.
//! One matrix can yield several alignments; no two of them share a cell.

use std::collections::HashSet;

use rand::Rng;

use super::backtrace::{BacktraceStack, BtCursor, GapCounts, TraceArena, TraceMask, TraceMove};
use super::candidate::{BtCandidate, BtCandidateSet, BtFate};
use super::score::AlnScore;
use super::scoring::Scoring;
use super::types::{DpTable, Edit};
use crate::error::Result;

/// Read-only view of a filled DP matrix.
///
/// Rows are read positions, columns are reference positions, both relative
/// to the DP rectangle.
pub trait TraceMatrix {
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;
    /// Score of the overall table at a cell.
    fn cell_score(&self, row: usize, col: usize) -> AlnScore;
    /// Moves that explain the value of `table` at a cell.
    fn trace_mask(&self, row: usize, col: usize, table: DpTable) -> TraceMask;
    fn read_chr(&self, row: usize) -> u8;
    fn ref_chr(&self, col: usize) -> u8;
}

/// A finished backtrace, in rectangle coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    pub row_start: usize,
    pub col_start: usize,
    /// Cell the backtrace started from (last aligned pair)
    pub row_end: usize,
    pub col_end: usize,
    pub score: AlnScore,
    /// Edits ordered by read position
    pub edits: Vec<Edit>,
    pub ambiguous_edits: Vec<Edit>,
    /// Cells the alignment passes through, start to end
    pub cells: Vec<(usize, usize)>,
    pub gaps: GapCounts,
}

impl Trace {
    /// Number of reference positions the alignment spans.
    pub fn ref_extent(&self) -> usize {
        self.col_end + 1 - self.col_start
    }

    /// Number of read positions the alignment spans.
    pub fn read_extent(&self) -> usize {
        self.row_end + 1 - self.row_start
    }
}

enum Step {
    Continue,
    Done,
    DeadEnd,
}

/// Per-candidate backtrace counters, for metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BacktraceCounts {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub filtered_start: usize,
    pub filtered_dominated: usize,
    pub filtered_score: usize,
}

#[derive(Debug, Default)]
pub struct NucBacktracer {
    cands: BtCandidateSet,
    stack: BacktraceStack,
    arena: TraceArena,
    reported: HashSet<(usize, usize)>,
}

impl NucBacktracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare for a freshly filled matrix: collect candidates scoring at
    /// least `min_score` and forget cells reported for any earlier matrix.
    pub fn init<M: TraceMatrix + ?Sized>(&mut self, matrix: &M, min_score: i64) {
        let cols = matrix.cols();
        let cells = (0..matrix.rows())
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .map(|(row, col)| (row, col, matrix.cell_score(row, col)));
        self.cands = BtCandidateSet::from_cells(cells, min_score);
        self.stack.clear();
        self.arena.clear();
        self.reported.clear();
    }

    /// Raise the score floor for candidates not yet handed out.
    pub fn raise_min_score(&mut self, min_score: i64) {
        self.cands.raise_min_score(min_score);
    }

    /// True once every candidate has been tried or filtered.
    pub fn done(&self) -> bool {
        self.cands.remaining() == 0
    }

    pub fn candidates(&self) -> &BtCandidateSet {
        &self.cands
    }

    pub fn counts(&self) -> BacktraceCounts {
        BacktraceCounts {
            attempted: self.cands.count(BtFate::Succeeded) + self.cands.count(BtFate::Failed),
            succeeded: self.cands.count(BtFate::Succeeded),
            failed: self.cands.count(BtFate::Failed),
            filtered_start: self.cands.count(BtFate::FilteredStart),
            filtered_dominated: self.cands.count(BtFate::FilteredDominated),
            filtered_score: self.cands.count(BtFate::FilteredScore),
        }
    }

    /// Produce the next alignment, or `None` when no candidate yields one.
    pub fn next_trace<M, R>(
        &mut self,
        matrix: &M,
        scoring: &Scoring,
        rng: &mut R,
    ) -> Result<Option<Trace>>
    where
        M: TraceMatrix + ?Sized,
        R: Rng + ?Sized,
    {
        loop {
            let reported = &self.reported;
            let Some(idx) = self
                .cands
                .next_candidate(|c| reported.contains(&(c.row, c.col)))
            else {
                return Ok(None);
            };
            let cand = *self.cands.get(idx);
            let trace = self.backtrace_from(matrix, scoring, &cand, rng)?;
            self.cands.resolve(idx, trace.is_some());
            if let Some(trace) = trace {
                self.reported.extend(trace.cells.iter().copied());
                return Ok(Some(trace));
            }
        }
    }

    fn backtrace_from<M, R>(
        &mut self,
        matrix: &M,
        scoring: &Scoring,
        cand: &BtCandidate,
        rng: &mut R,
    ) -> Result<Option<Trace>>
    where
        M: TraceMatrix + ?Sized,
        R: Rng + ?Sized,
    {
        self.arena.clear();
        self.stack.clear();
        let mut cursor = BtCursor::start(cand.row, cand.col);

        let mut next = self.choose(matrix, &cursor, rng)?;
        loop {
            let mv = match next {
                Some(mv) => mv,
                None => match self.stack.resume(&mut self.arena, &mut cursor, rng)? {
                    Some(mv) => mv,
                    None => return Ok(None),
                },
            };
            match apply_move(matrix, scoring, &mut self.arena, &self.reported, &mut cursor, mv) {
                Step::Continue => next = self.choose(matrix, &cursor, rng)?,
                Step::DeadEnd => next = None,
                Step::Done => {
                    let mut edits = self.arena.nuc_edits.clone();
                    edits.reverse();
                    let mut ambiguous_edits = self.arena.amb_edits.clone();
                    ambiguous_edits.reverse();
                    let mut cells = self.arena.cells.clone();
                    cells.reverse();
                    return Ok(Some(Trace {
                        row_start: cursor.row,
                        col_start: cursor.col,
                        row_end: cand.row,
                        col_end: cand.col,
                        score: AlnScore::new(cand.score()),
                        edits,
                        ambiguous_edits,
                        cells,
                        gaps: cursor.gaps,
                    }));
                }
            }
        }
    }

    fn choose<M, R>(
        &mut self,
        matrix: &M,
        cursor: &BtCursor,
        rng: &mut R,
    ) -> Result<Option<TraceMove>>
    where
        M: TraceMatrix + ?Sized,
        R: Rng + ?Sized,
    {
        let mask = matrix
            .trace_mask(cursor.row, cursor.col, cursor.table)
            .intersect(TraceMask::allowed(cursor.table));
        if mask.is_empty() {
            return Ok(None);
        }
        self.stack.branch(&self.arena, cursor, mask, rng).map(Some)
    }
}

fn apply_move<M: TraceMatrix + ?Sized>(
    matrix: &M,
    scoring: &Scoring,
    arena: &mut TraceArena,
    reported: &HashSet<(usize, usize)>,
    cursor: &mut BtCursor,
    mv: TraceMove,
) -> Step {
    let (row, col) = (cursor.row, cursor.col);
    if mv.consumes_cell() {
        if reported.contains(&(row, col)) {
            return Step::DeadEnd;
        }
        arena.cells.push((row, col));
    }
    match mv {
        TraceMove::Diag | TraceMove::Start => {
            let rd = matrix.read_chr(row);
            let rf = matrix.ref_chr(col);
            cursor.score = cursor.score.add(scoring.pair_score(rd, rf));
            if rd != rf || rd > 3 {
                let edit = Edit::mismatch(row, rd, rf);
                arena.nuc_edits.push(edit);
                if edit.is_ambiguous_ref() {
                    arena.amb_edits.push(edit);
                }
            }
            if mv == TraceMove::Start {
                return Step::Done;
            }
            if row == 0 || col == 0 {
                return Step::DeadEnd;
            }
            cursor.row -= 1;
            cursor.col -= 1;
        }
        TraceMove::FromReadGap => cursor.table = DpTable::ReadGap,
        TraceMove::FromRefGap => cursor.table = DpTable::RefGap,
        TraceMove::ReadGapOpen | TraceMove::ReadGapExtend => {
            let penalty = if mv == TraceMove::ReadGapOpen {
                scoring.read_gap_open + scoring.read_gap_extend
            } else {
                scoring.read_gap_extend
            };
            cursor.score = cursor.score.add(-penalty);
            arena.nuc_edits.push(Edit::read_gap(row + 1, matrix.ref_chr(col)));
            cursor.gaps.total += 1;
            cursor.gaps.read += 1;
            if col == 0 {
                return Step::DeadEnd;
            }
            cursor.col -= 1;
            cursor.table = if mv == TraceMove::ReadGapOpen {
                DpTable::Overall
            } else {
                DpTable::ReadGap
            };
        }
        TraceMove::RefGapOpen | TraceMove::RefGapExtend => {
            let penalty = if mv == TraceMove::RefGapOpen {
                scoring.ref_gap_open + scoring.ref_gap_extend
            } else {
                scoring.ref_gap_extend
            };
            cursor.score = cursor.score.add(-penalty);
            arena.nuc_edits.push(Edit::ref_gap(row, matrix.read_chr(row)));
            cursor.gaps.total += 1;
            cursor.gaps.reference += 1;
            if row == 0 {
                return Step::DeadEnd;
            }
            cursor.row -= 1;
            cursor.table = if mv == TraceMove::RefGapOpen {
                DpTable::Overall
            } else {
                DpTable::RefGap
            };
        }
    }
    Step::Continue
}
