//! Interfaces to the index, the reference and the DP engine.
//!
//! The driver never computes genome offsets or DP scores itself. It asks an
//! `IndexWalk` to turn index rows into reference coordinates and a
//! `DpAligner` to fill a window and hand back alignments one at a time.

use rand::Rng;

use super::rect::DpRect;
use super::result::AlnRes;
use crate::core::alignment::{AlnScore, Mate, RefCoord};
use crate::error::Result;
use crate::pipelines::linear::finalization::{SwMetrics, WalkMetrics};
use crate::pipelines::linear::seeding::{IndexRange, SeedHitPosition};

/// Resolves index ranges to reference coordinates.
pub trait IndexWalk {
    /// Reference coordinate of row `elt` of `range`: the offset of the
    /// seed's leftmost base on the forward reference. The strand of the
    /// returned coordinate is ignored; the seed position decides it.
    fn resolve(&mut self, range: &IndexRange, elt: usize, metrics: &mut WalkMetrics)
        -> Option<RefCoord>;

    /// Whether `scan_reference` can resolve a whole range at once.
    fn supports_ref_scan(&self) -> bool {
        false
    }

    /// Resolve every row of `range` by scanning the reference for the seed.
    fn scan_reference(
        &mut self,
        _read: &[u8],
        _pos: &SeedHitPosition,
        _range: &IndexRange,
        _metrics: &mut WalkMetrics,
    ) -> Option<Vec<RefCoord>> {
        None
    }

    /// Length of reference `ref_id`, `None` if unknown.
    fn ref_len(&self, ref_id: usize) -> Option<usize>;
}

/// The reference sequences, for whole-reference search.
pub trait ReferenceSet {
    fn num_refs(&self) -> usize;
    fn ref_len(&self, ref_id: usize) -> usize;
}

/// One DP problem: a read orientation against one reference window.
#[derive(Debug, Clone, Copy)]
pub struct DpProblem<'a> {
    /// Read bases, already oriented for `fw`
    pub read: &'a [u8],
    pub qual: &'a [u8],
    pub mate: Mate,
    pub fw: bool,
    pub ref_id: usize,
    pub rect: DpRect,
    pub min_score: i64,
    /// Local-mode floor; `None` for end-to-end
    pub floor: Option<i64>,
    /// Max reference Ns tolerated in the window
    pub n_ceil: usize,
    /// 8-bit fill is acceptable for this problem
    pub enable8: bool,
}

/// Fills DP windows and backtraces alignments out of them.
pub trait DpAligner {
    /// Fill the matrix for `problem`. Returns the best cell score, or
    /// `AlnScore::Invalid` when no cell reaches the minimum.
    fn fill(&mut self, problem: &DpProblem<'_>, metrics: &mut SwMetrics) -> AlnScore;

    /// Next alignment scoring at least `min_score` from the last fill, in
    /// reference coordinates. `min_score` may be higher than the one the
    /// matrix was filled with.
    fn next_alignment<R: Rng + ?Sized>(
        &mut self,
        min_score: i64,
        rng: &mut R,
        metrics: &mut SwMetrics,
    ) -> Result<Option<AlnRes>>;

    /// True once the last fill has no more candidates.
    fn done(&self) -> bool;
}
