// Shared collaborators for the integration tests: a scalar local
// Smith-Waterman aligner that backtraces through NucBacktracer, an in-memory
// index and a reference set.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ferrous_extend::core::alignment::{
    AlnScore, DpTable, Mate, NucBacktracer, Read, RefCoord, Scoring, TraceMask, TraceMatrix,
    TraceMove,
};
use ferrous_extend::pipelines::linear::extension::{
    AlnRes, DpAligner, DpProblem, DpRect, IndexWalk, ReferenceSet,
};
use ferrous_extend::pipelines::linear::finalization::{SwMetrics, WalkMetrics};
use ferrous_extend::pipelines::linear::seeding::{IndexRange, SeedHitPosition};
use ferrous_extend::Result;

const NEG: i64 = i64::MIN / 4;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Random reference of 2-bit codes.
pub fn random_reference(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(0..4u8)).collect()
}

pub fn read_at(reference: &[u8], start: usize, len: usize, name: &str, mate: Mate) -> Read {
    Read::new(name, reference[start..start + len].to_vec(), mate)
}

/// Reverse complement of a code sequence.
pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| if b < 4 { 3 - b } else { 4 }).collect()
}

/// Substitute a different base at `pos`.
pub fn mutate(seq: &mut [u8], pos: usize) {
    seq[pos] = (seq[pos] + 1) % 4;
}

/// Filled local-alignment matrices with affine gaps.
pub struct ScalarMatrix {
    read: Vec<u8>,
    reference: Vec<u8>,
    cols: usize,
    h: Vec<i64>,
    e: Vec<i64>,
    f: Vec<i64>,
    scoring: Scoring,
}

impl ScalarMatrix {
    pub fn fill(read: &[u8], reference: &[u8], scoring: &Scoring) -> Self {
        let (rows, cols) = (read.len(), reference.len());
        let mut h = vec![0i64; rows * cols];
        let mut e = vec![NEG; rows * cols];
        let mut f = vec![NEG; rows * cols];
        let rd_oe = scoring.read_gap_open + scoring.read_gap_extend;
        let rf_oe = scoring.ref_gap_open + scoring.ref_gap_extend;
        for i in 0..rows {
            for j in 0..cols {
                let idx = i * cols + j;
                let s = scoring.pair_score(read[i], reference[j]);
                let diag = if i > 0 && j > 0 { h[idx - cols - 1] } else { 0 };
                if j > 0 {
                    e[idx] = (h[idx - 1] - rd_oe).max(e[idx - 1] - scoring.read_gap_extend);
                }
                if i > 0 {
                    f[idx] = (h[idx - cols] - rf_oe).max(f[idx - cols] - scoring.ref_gap_extend);
                }
                h[idx] = 0.max(diag + s).max(e[idx]).max(f[idx]);
            }
        }
        Self {
            read: read.to_vec(),
            reference: reference.to_vec(),
            cols,
            h,
            e,
            f,
            scoring: scoring.clone(),
        }
    }

    fn at(&self, v: &[i64], row: usize, col: usize) -> i64 {
        v[row * self.cols + col]
    }

    pub fn best(&self) -> AlnScore {
        match self.h.iter().copied().max() {
            Some(b) if b > 0 => AlnScore::new(b),
            _ => AlnScore::Invalid,
        }
    }
}

impl TraceMatrix for ScalarMatrix {
    fn rows(&self) -> usize {
        self.read.len()
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn cell_score(&self, row: usize, col: usize) -> AlnScore {
        let h = self.at(&self.h, row, col);
        if h > 0 {
            AlnScore::new(h)
        } else {
            AlnScore::Invalid
        }
    }

    fn trace_mask(&self, row: usize, col: usize, table: DpTable) -> TraceMask {
        let sc = &self.scoring;
        let mut mask = TraceMask::EMPTY;
        match table {
            DpTable::Overall => {
                let h = self.at(&self.h, row, col);
                if h <= 0 {
                    return mask;
                }
                let s = sc.pair_score(self.read[row], self.reference[col]);
                let prev = if row > 0 && col > 0 {
                    self.at(&self.h, row - 1, col - 1)
                } else {
                    0
                };
                if prev + s == h {
                    mask.insert(if prev > 0 { TraceMove::Diag } else { TraceMove::Start });
                }
                if self.at(&self.e, row, col) == h {
                    mask.insert(TraceMove::FromReadGap);
                }
                if self.at(&self.f, row, col) == h {
                    mask.insert(TraceMove::FromRefGap);
                }
            }
            DpTable::ReadGap => {
                let e = self.at(&self.e, row, col);
                if col > 0 && e > NEG / 2 {
                    if self.at(&self.h, row, col - 1) - sc.read_gap_open - sc.read_gap_extend == e {
                        mask.insert(TraceMove::ReadGapOpen);
                    }
                    if self.at(&self.e, row, col - 1) - sc.read_gap_extend == e {
                        mask.insert(TraceMove::ReadGapExtend);
                    }
                }
            }
            DpTable::RefGap => {
                let f = self.at(&self.f, row, col);
                if row > 0 && f > NEG / 2 {
                    if self.at(&self.h, row - 1, col) - sc.ref_gap_open - sc.ref_gap_extend == f {
                        mask.insert(TraceMove::RefGapOpen);
                    }
                    if self.at(&self.f, row - 1, col) - sc.ref_gap_extend == f {
                        mask.insert(TraceMove::RefGapExtend);
                    }
                }
            }
        }
        mask
    }

    fn read_chr(&self, row: usize) -> u8 {
        self.read[row]
    }

    fn ref_chr(&self, col: usize) -> u8 {
        self.reference[col]
    }
}

/// DP engine backed by `ScalarMatrix`.
pub struct ScalarAligner {
    refs: Arc<Vec<Vec<u8>>>,
    scoring: Scoring,
    matrix: Option<ScalarMatrix>,
    bt: NucBacktracer,
    problem: Option<(usize, bool, Mate, DpRect)>,
    pub fills: usize,
}

impl ScalarAligner {
    pub fn new(refs: Arc<Vec<Vec<u8>>>, scoring: Scoring) -> Self {
        Self {
            refs,
            scoring,
            matrix: None,
            bt: NucBacktracer::new(),
            problem: None,
            fills: 0,
        }
    }
}

impl DpAligner for ScalarAligner {
    fn fill(&mut self, problem: &DpProblem<'_>, _metrics: &mut SwMetrics) -> AlnScore {
        self.fills += 1;
        let rect = problem.rect;
        let span = rect.ref_left as usize..=rect.ref_right as usize;
        let reference = &self.refs[problem.ref_id][span];
        let matrix = ScalarMatrix::fill(problem.read, reference, &self.scoring);
        self.bt.init(&matrix, problem.min_score);
        let best = matrix.best();
        self.matrix = Some(matrix);
        self.problem = Some((problem.ref_id, problem.fw, problem.mate, rect));
        best
    }

    fn next_alignment<R: Rng + ?Sized>(
        &mut self,
        min_score: i64,
        rng: &mut R,
        _metrics: &mut SwMetrics,
    ) -> Result<Option<AlnRes>> {
        let (Some(matrix), Some((ref_id, fw, mate, rect))) = (self.matrix.as_ref(), self.problem)
        else {
            return Ok(None);
        };
        self.bt.raise_min_score(min_score);
        let trace = self.bt.next_trace(matrix, &self.scoring, rng)?;
        Ok(trace.map(|t| AlnRes::from_trace(t, &rect, ref_id, fw, mate)))
    }

    fn done(&self) -> bool {
        self.matrix.is_none() || self.bt.done()
    }
}

/// In-memory index: each range `top` lists the coordinates of its rows.
#[derive(Clone, Default)]
pub struct MockIndex {
    ranges: HashMap<u64, Vec<RefCoord>>,
    ref_lens: Vec<usize>,
    pub scan: bool,
}

impl MockIndex {
    pub fn new(ref_lens: Vec<usize>) -> Self {
        Self {
            ranges: HashMap::new(),
            ref_lens,
            scan: false,
        }
    }

    /// Register a range whose rows resolve to `(ref_id, off)` pairs.
    pub fn add_range(&mut self, top: u64, coords: &[(usize, i64)]) -> IndexRange {
        self.ranges.insert(
            top,
            coords
                .iter()
                .map(|&(r, o)| RefCoord::new(r, o, true))
                .collect(),
        );
        IndexRange::new(top, coords.len())
    }
}

impl IndexWalk for MockIndex {
    fn resolve(
        &mut self,
        range: &IndexRange,
        elt: usize,
        _metrics: &mut WalkMetrics,
    ) -> Option<RefCoord> {
        self.ranges.get(&range.top)?.get(elt).copied()
    }

    fn supports_ref_scan(&self) -> bool {
        self.scan
    }

    fn scan_reference(
        &mut self,
        _read: &[u8],
        _pos: &SeedHitPosition,
        range: &IndexRange,
        _metrics: &mut WalkMetrics,
    ) -> Option<Vec<RefCoord>> {
        self.ranges.get(&range.top).cloned()
    }

    fn ref_len(&self, ref_id: usize) -> Option<usize> {
        self.ref_lens.get(ref_id).copied()
    }
}

/// Reference sequences for whole-reference search.
#[derive(Clone)]
pub struct Refs(pub Arc<Vec<Vec<u8>>>);

impl ReferenceSet for Refs {
    fn num_refs(&self) -> usize {
        self.0.len()
    }

    fn ref_len(&self, ref_id: usize) -> usize {
        self.0[ref_id].len()
    }
}
