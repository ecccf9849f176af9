//! Alignment results in reference coordinates.

use crate::core::alignment::{AlnScore, DpCell, Edit, GapCounts, Mate, RefCoord, Trace};

use super::rect::DpRect;

/// One alignment of a read (or mate) against the reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlnRes {
    pub mate: Mate,
    /// Leftmost aligned reference position and the strand aligned to
    pub coord: RefCoord,
    /// Aligned read interval `[read_start, read_end)`, oriented read coords
    pub read_start: usize,
    pub read_end: usize,
    /// Reference positions spanned
    pub ref_extent: usize,
    pub score: AlnScore,
    pub edits: Vec<Edit>,
    pub ambiguous_edits: Vec<Edit>,
    pub gaps: GapCounts,
    /// DP cells the alignment passes through
    pub cells: Vec<DpCell>,
}

impl AlnRes {
    /// Convert a rectangle-relative backtrace into reference coordinates.
    pub fn from_trace(trace: Trace, rect: &DpRect, ref_id: usize, fw: bool, mate: Mate) -> Self {
        let cells = trace
            .cells
            .iter()
            .map(|&(row, col)| DpCell {
                ref_id,
                fw,
                ref_off: rect.ref_left + col as i64,
                read_off: row,
            })
            .collect();
        Self {
            mate,
            coord: RefCoord::new(ref_id, rect.ref_left + trace.col_start as i64, fw),
            read_start: trace.row_start,
            read_end: trace.row_end + 1,
            ref_extent: trace.ref_extent(),
            score: trace.score,
            edits: trace.edits,
            ambiguous_edits: trace.ambiguous_edits,
            gaps: trace.gaps,
            cells,
        }
    }

    #[inline]
    pub fn ref_id(&self) -> usize {
        self.coord.ref_id
    }

    #[inline]
    pub fn fw(&self) -> bool {
        self.coord.fw
    }

    #[inline]
    pub fn ref_left(&self) -> i64 {
        self.coord.off
    }

    /// Rightmost aligned reference position (inclusive).
    #[inline]
    pub fn ref_right(&self) -> i64 {
        self.coord.off + self.ref_extent as i64 - 1
    }

    /// Score value; alignments handed out by an aligner always carry one.
    #[inline]
    pub fn score_value(&self) -> i64 {
        self.score.value().unwrap_or(i64::MIN)
    }

    /// Diagonal of the first aligned cell.
    pub fn diagonal(&self) -> i64 {
        self.coord.off - self.read_start as i64
    }
}
