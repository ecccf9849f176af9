//! Resumable backtrace state.
//!
//! A backtrace walks from a high-scoring cell toward the alignment start.
//! Where more than one predecessor explains a cell's value, the walk picks
//! one and saves a `BtFrame` holding the untried alternatives. Edits and
//! traversed cells live in a `TraceArena`; frames store arena *lengths*, so
//! going back to a branch point is a truncation.

use rand::Rng;

use super::score::AlnScore;
use super::types::{DpTable, Edit};
use crate::error::{Error, Result};

/// One way of explaining a cell's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TraceMove {
    /// Overall(r, c) from Overall(r-1, c-1): match or mismatch
    Diag = 0,
    /// Overall(r, c) is the first aligned pair of a local alignment
    Start = 1,
    /// Overall(r, c) takes its value from ReadGap(r, c)
    FromReadGap = 2,
    /// Overall(r, c) takes its value from RefGap(r, c)
    FromRefGap = 3,
    /// ReadGap(r, c) from Overall(r, c-1)
    ReadGapOpen = 4,
    /// ReadGap(r, c) from ReadGap(r, c-1)
    ReadGapExtend = 5,
    /// RefGap(r, c) from Overall(r-1, c)
    RefGapOpen = 6,
    /// RefGap(r, c) from RefGap(r-1, c)
    RefGapExtend = 7,
}

impl TraceMove {
    const ALL: [TraceMove; 8] = [
        TraceMove::Diag,
        TraceMove::Start,
        TraceMove::FromReadGap,
        TraceMove::FromRefGap,
        TraceMove::ReadGapOpen,
        TraceMove::ReadGapExtend,
        TraceMove::RefGapOpen,
        TraceMove::RefGapExtend,
    ];

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Table the move starts from.
    pub fn table(self) -> DpTable {
        match self {
            TraceMove::Diag | TraceMove::Start | TraceMove::FromReadGap | TraceMove::FromRefGap => {
                DpTable::Overall
            }
            TraceMove::ReadGapOpen | TraceMove::ReadGapExtend => DpTable::ReadGap,
            TraceMove::RefGapOpen | TraceMove::RefGapExtend => DpTable::RefGap,
        }
    }

    /// Whether the move aligns something at the current cell.
    #[inline]
    pub fn consumes_cell(self) -> bool {
        !matches!(self, TraceMove::FromReadGap | TraceMove::FromRefGap)
    }
}

/// Set of candidate moves at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TraceMask(u8);

impl TraceMask {
    pub const EMPTY: TraceMask = TraceMask(0);

    pub fn from_moves(moves: &[TraceMove]) -> Self {
        TraceMask(moves.iter().fold(0, |acc, m| acc | m.bit()))
    }

    /// Every move that may leave a cell of `table`.
    pub fn allowed(table: DpTable) -> Self {
        match table {
            DpTable::Overall => TraceMask::from_moves(&[
                TraceMove::Diag,
                TraceMove::Start,
                TraceMove::FromReadGap,
                TraceMove::FromRefGap,
            ]),
            DpTable::ReadGap => {
                TraceMask::from_moves(&[TraceMove::ReadGapOpen, TraceMove::ReadGapExtend])
            }
            DpTable::RefGap => {
                TraceMask::from_moves(&[TraceMove::RefGapOpen, TraceMove::RefGapExtend])
            }
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn contains(self, mv: TraceMove) -> bool {
        self.0 & mv.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, mv: TraceMove) {
        self.0 |= mv.bit();
    }

    #[inline]
    pub fn without(self, mv: TraceMove) -> Self {
        TraceMask(self.0 & !mv.bit())
    }

    #[inline]
    pub fn intersect(self, other: TraceMask) -> Self {
        TraceMask(self.0 & other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = TraceMove> {
        TraceMove::ALL.into_iter().filter(move |m| self.contains(*m))
    }

    /// Pick one move uniformly at random. `None` if the mask is empty.
    pub fn pick<R: Rng + ?Sized>(self, rng: &mut R) -> Option<TraceMove> {
        let n = self.count();
        if n == 0 {
            return None;
        }
        let k = if n == 1 { 0 } else { rng.gen_range(0..n) };
        self.iter().nth(k)
    }
}

/// Gap positions accumulated along a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GapCounts {
    pub total: usize,
    pub read: usize,
    pub reference: usize,
}

/// Where a backtrace currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BtCursor {
    pub row: usize,
    pub col: usize,
    pub table: DpTable,
    pub gaps: GapCounts,
    pub score: AlnScore,
}

impl BtCursor {
    pub fn start(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            table: DpTable::Overall,
            gaps: GapCounts::default(),
            score: AlnScore::new(0),
        }
    }
}

/// Edits and cells appended while descending.
#[derive(Debug, Clone, Default)]
pub struct TraceArena {
    pub nuc_edits: Vec<Edit>,
    pub amb_edits: Vec<Edit>,
    pub cells: Vec<(usize, usize)>,
}

/// Arena list lengths at some instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArenaMark {
    pub nuc_edits: usize,
    pub amb_edits: usize,
    pub cells: usize,
}

impl TraceArena {
    pub fn clear(&mut self) {
        self.nuc_edits.clear();
        self.amb_edits.clear();
        self.cells.clear();
    }

    #[inline]
    pub fn mark(&self) -> ArenaMark {
        ArenaMark {
            nuc_edits: self.nuc_edits.len(),
            amb_edits: self.amb_edits.len(),
            cells: self.cells.len(),
        }
    }

    /// Drop everything appended after `mark` was taken.
    #[inline]
    pub fn truncate(&mut self, mark: ArenaMark) {
        debug_assert!(self.nuc_edits.len() >= mark.nuc_edits);
        debug_assert!(self.amb_edits.len() >= mark.amb_edits);
        debug_assert!(self.cells.len() >= mark.cells);
        self.nuc_edits.truncate(mark.nuc_edits);
        self.amb_edits.truncate(mark.amb_edits);
        self.cells.truncate(mark.cells);
    }
}

/// A saved branch point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BtFrame {
    /// Arena lengths before the branch move was applied
    pub mark: ArenaMark,
    pub row: usize,
    pub col: usize,
    pub gaps: GapCounts,
    pub score: AlnScore,
    pub table: DpTable,
    /// Moves not yet tried at this cell
    pub mask: TraceMask,
}

impl BtFrame {
    fn capture(arena: &TraceArena, cursor: &BtCursor, mask: TraceMask) -> Self {
        Self {
            mark: arena.mark(),
            row: cursor.row,
            col: cursor.col,
            gaps: cursor.gaps,
            score: cursor.score,
            table: cursor.table,
            mask,
        }
    }

    fn restore(&self, arena: &mut TraceArena, cursor: &mut BtCursor) {
        arena.truncate(self.mark);
        cursor.row = self.row;
        cursor.col = self.col;
        cursor.gaps = self.gaps;
        cursor.score = self.score;
        cursor.table = self.table;
    }
}

/// Stack of branch points for one backtrace. Passive: the backtracer drives it.
#[derive(Debug, Clone, Default)]
pub struct BacktraceStack {
    frames: Vec<BtFrame>,
}

impl BacktraceStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// No alternatives remain for the current start cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn top(&self) -> Option<&BtFrame> {
        self.frames.last()
    }

    /// Choose a move at the cursor. When more than one move is possible the
    /// rest are saved in a new frame.
    pub fn branch<R: Rng + ?Sized>(
        &mut self,
        arena: &TraceArena,
        cursor: &BtCursor,
        mask: TraceMask,
        rng: &mut R,
    ) -> Result<TraceMove> {
        let mv = mask.pick(rng).ok_or(Error::ExhaustedFrame {
            row: cursor.row,
            col: cursor.col,
        })?;
        let rest = mask.without(mv);
        if !rest.is_empty() {
            self.frames.push(BtFrame::capture(arena, cursor, rest));
        }
        Ok(mv)
    }

    /// Go back to the most recent branch point and pick a move not tried
    /// there yet. Returns `Ok(None)` once the stack is empty.
    pub fn resume<R: Rng + ?Sized>(
        &mut self,
        arena: &mut TraceArena,
        cursor: &mut BtCursor,
        rng: &mut R,
    ) -> Result<Option<TraceMove>> {
        let Some(frame) = self.frames.pop() else {
            return Ok(None);
        };
        let mv = frame.mask.pick(rng).ok_or(Error::ExhaustedFrame {
            row: frame.row,
            col: frame.col,
        })?;
        frame.restore(arena, cursor);
        let rest = frame.mask.without(mv);
        if !rest.is_empty() {
            self.frames.push(BtFrame { mask: rest, ..frame });
        }
        Ok(Some(mv))
    }

    #[cfg(test)]
    pub(crate) fn push_raw(&mut self, frame: BtFrame) {
        self.frames.push(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_way() -> TraceMask {
        TraceMask::from_moves(&[TraceMove::Diag, TraceMove::FromReadGap])
    }

    #[test]
    fn test_mask_basics() {
        let m = TraceMask::from_moves(&[TraceMove::Diag, TraceMove::RefGapOpen]);
        assert_eq!(m.count(), 2);
        assert!(m.contains(TraceMove::Diag));
        assert!(!m.contains(TraceMove::Start));
        assert_eq!(m.without(TraceMove::Diag).count(), 1);
        assert_eq!(m.intersect(TraceMask::allowed(DpTable::Overall)).count(), 1);
        assert!(TraceMask::EMPTY.pick(&mut StdRng::seed_from_u64(1)).is_none());
    }

    #[test]
    fn test_single_choice_pushes_nothing() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut stack = BacktraceStack::new();
        let arena = TraceArena::default();
        let cursor = BtCursor::start(4, 4);
        let mv = stack
            .branch(&arena, &cursor, TraceMask::from_moves(&[TraceMove::Diag]), &mut rng)
            .unwrap();
        assert_eq!(mv, TraceMove::Diag);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_branch_on_empty_mask_is_error() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut stack = BacktraceStack::new();
        let err = stack
            .branch(&TraceArena::default(), &BtCursor::start(2, 3), TraceMask::EMPTY, &mut rng)
            .unwrap_err();
        assert_eq!(err, Error::ExhaustedFrame { row: 2, col: 3 });
    }

    #[test]
    fn test_frame_round_trip() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut stack = BacktraceStack::new();
        let mut arena = TraceArena::default();
        let mut cursor = BtCursor::start(10, 12);

        arena.nuc_edits.push(Edit::mismatch(10, 0, 1));
        arena.cells.push((10, 12));
        cursor.score = AlnScore::new(-4);
        cursor.gaps.total = 1;
        cursor.gaps.read = 1;
        let saved_cursor = cursor;
        let saved_mark = arena.mark();

        let first = stack.branch(&arena, &cursor, two_way(), &mut rng).unwrap();
        assert_eq!(stack.depth(), 1);

        // descend: append to every list, move, change counters
        arena.nuc_edits.push(Edit::mismatch(9, 2, 3));
        arena.amb_edits.push(Edit::mismatch(9, 2, 4));
        arena.cells.push((9, 11));
        arena.cells.push((8, 10));
        cursor.row = 8;
        cursor.col = 10;
        cursor.table = DpTable::RefGap;
        cursor.gaps.total = 3;
        cursor.gaps.reference = 2;
        cursor.score = AlnScore::new(-20);

        let second = stack.resume(&mut arena, &mut cursor, &mut rng).unwrap().unwrap();
        assert_ne!(first, second);
        assert_eq!(arena.mark(), saved_mark);
        assert_eq!(cursor, saved_cursor);
        // both alternatives used: frame discarded, not re-pushed
        assert!(stack.is_empty());
        assert_eq!(stack.resume(&mut arena, &mut cursor, &mut rng).unwrap(), None);
    }

    #[test]
    fn test_nested_frames_restore_in_order() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut stack = BacktraceStack::new();
        let mut arena = TraceArena::default();
        let mut cursor = BtCursor::start(20, 20);

        let three = TraceMask::from_moves(&[
            TraceMove::Diag,
            TraceMove::FromReadGap,
            TraceMove::FromRefGap,
        ]);
        stack.branch(&arena, &cursor, three, &mut rng).unwrap();
        let outer_mark = arena.mark();
        let outer_cursor = cursor;

        arena.cells.push((20, 20));
        cursor.row = 19;
        cursor.col = 19;
        stack.branch(&arena, &cursor, two_way(), &mut rng).unwrap();
        let inner_mark = arena.mark();
        let inner_cursor = cursor;
        assert_eq!(stack.depth(), 2);

        arena.cells.push((19, 19));
        arena.nuc_edits.push(Edit::mismatch(19, 1, 2));
        cursor.row = 18;
        cursor.col = 18;

        // inner frame has one alternative left: resumed and dropped
        stack.resume(&mut arena, &mut cursor, &mut rng).unwrap().unwrap();
        assert_eq!(arena.mark(), inner_mark);
        assert_eq!(cursor, inner_cursor);
        assert_eq!(stack.depth(), 1);

        // outer frame had two alternatives left: one is used, frame stays
        stack.resume(&mut arena, &mut cursor, &mut rng).unwrap().unwrap();
        assert_eq!(arena.mark(), outer_mark);
        assert_eq!(cursor, outer_cursor);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top().unwrap().mask.count(), 1);

        stack.resume(&mut arena, &mut cursor, &mut rng).unwrap().unwrap();
        assert!(stack.is_empty());
    }

    #[test]
    fn test_resume_exhausted_frame_is_error() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut stack = BacktraceStack::new();
        let mut arena = TraceArena::default();
        let mut cursor = BtCursor::start(1, 1);
        stack.push_raw(BtFrame {
            mark: ArenaMark::default(),
            row: 6,
            col: 2,
            gaps: GapCounts::default(),
            score: AlnScore::new(0),
            table: DpTable::Overall,
            mask: TraceMask::EMPTY,
        });
        let err = stack.resume(&mut arena, &mut cursor, &mut rng).unwrap_err();
        assert_eq!(err, Error::ExhaustedFrame { row: 6, col: 2 });
    }
}
