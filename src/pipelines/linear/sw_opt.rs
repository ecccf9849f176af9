// Seed-extension driver options.
//
// Mirrors the shape of the aligner's option structure: one flat struct with
// defaults taken from `defaults.rs`, plus small helper types for the
// read-length-dependent thresholds.

use crate::core::alignment::Scoring;
use crate::defaults;
use crate::error::{Error, Result};

/// Shape of the `x`-dependent term of a `SimpleFunc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuncKind {
    Const,
    Linear,
    Sqrt,
    Log,
}

/// `clamp(constant + coeff * g(x), min, max)`.
///
/// Used for every threshold that scales with read length or with the number
/// of seed-hit elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleFunc {
    pub kind: FuncKind,
    pub constant: f64,
    pub coeff: f64,
    pub min: f64,
    pub max: f64,
}

impl SimpleFunc {
    pub fn new(kind: FuncKind, constant: f64, coeff: f64) -> Self {
        Self {
            kind,
            constant,
            coeff,
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(FuncKind::Const, value, 0.0)
    }

    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn eval(&self, x: f64) -> f64 {
        let g = match self.kind {
            FuncKind::Const => 0.0,
            FuncKind::Linear => x,
            FuncKind::Sqrt => x.max(0.0).sqrt(),
            FuncKind::Log => x.max(1.0).ln(),
        };
        (self.constant + self.coeff * g).clamp(self.min, self.max)
    }

    /// Evaluate and round to the nearest integer.
    pub fn eval_i64(&self, x: f64) -> i64 {
        self.eval(x).round() as i64
    }

    /// Evaluate and floor at zero, for counts.
    pub fn eval_usize(&self, x: f64) -> usize {
        self.eval(x).max(0.0) as usize
    }
}

/// How the minimum score moves after alignments are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TightenMode {
    #[default]
    Off,
    /// Raise to the best score reported so far
    Best,
    /// Raise to the second-best score reported so far
    SecondBest,
    /// Raise three quarters of the way from second best to best
    Blend,
}

/// Options for `SwDriver`.
#[derive(Debug, Clone)]
pub struct SwDriverOpt {
    pub scoring: Scoring,
    /// Minimum alignment score as a function of read length
    pub score_min: SimpleFunc,
    /// Local-alignment floor; `None` for end-to-end
    pub floor: Option<i64>,
    /// Max Ns permitted in the reference window, as a function of read length
    pub n_ceil: SimpleFunc,
    /// Elements to explore as a function of total seed-hit elements
    pub max_elt: SimpleFunc,
    /// Max DP window width on either side of the seed diagonal
    pub max_half: usize,
    /// Ranges with at most this many elements are always explored whole
    pub n_small: usize,
    /// Hint to the DP engine: 8-bit vectorized fill is acceptable
    pub enable8: bool,
    /// Resolve large ranges by reference scanning when supported
    pub refscan: bool,
    pub refscan_min_range: usize,
    pub tighten: TightenMode,
    /// Skip forward-strand alignments
    pub nofw: bool,
    /// Skip reverse-complement alignments
    pub norc: bool,
    /// Paired mode: also report unpaired alignments of the anchor
    pub mixed: bool,
    /// Paired mode: report non-concordant pairs found by the mate search
    pub discord: bool,
    /// Paired mode: search for the opposite mate as soon as an anchor is
    /// accepted. When off, anchors are handled as if the opposite mate were
    /// filtered, and pairs only come from the other mate's turn.
    pub mate_immediately: bool,
}

impl Default for SwDriverOpt {
    fn default() -> Self {
        Self {
            scoring: Scoring::default(),
            score_min: SimpleFunc::new(
                FuncKind::Log,
                defaults::SCORE_MIN_CONST,
                defaults::SCORE_MIN_COEFF,
            ),
            floor: Some(0),
            n_ceil: SimpleFunc::new(
                FuncKind::Linear,
                defaults::N_CEIL_CONST,
                defaults::N_CEIL_COEFF,
            ),
            max_elt: SimpleFunc::new(
                FuncKind::Sqrt,
                defaults::MAX_ELT_CONST,
                defaults::MAX_ELT_COEFF,
            )
            .with_bounds(1.0, defaults::MAX_ELT_CAP),
            max_half: defaults::MAX_HALF,
            n_small: defaults::N_SMALL,
            enable8: true,
            refscan: false,
            refscan_min_range: defaults::REFSCAN_MIN_RANGE,
            tighten: TightenMode::Off,
            nofw: false,
            norc: false,
            mixed: true,
            discord: true,
            mate_immediately: true,
        }
    }
}

impl SwDriverOpt {
    /// Reject option combinations that can never align anything.
    pub fn validate(&self) -> Result<()> {
        if self.nofw && self.norc {
            return Err(Error::InvalidConfig(
                "both strands disabled (nofw and norc)".to_string(),
            ));
        }
        let sc = &self.scoring;
        if sc.mismatch_penalty < 0
            || sc.n_penalty < 0
            || sc.read_gap_open < 0
            || sc.read_gap_extend < 0
            || sc.ref_gap_open < 0
            || sc.ref_gap_extend < 0
        {
            return Err(Error::InvalidConfig(
                "penalties must be non-negative".to_string(),
            ));
        }
        if sc.match_bonus < 0 {
            return Err(Error::InvalidConfig(
                "match bonus must be non-negative".to_string(),
            ));
        }
        if self.max_elt.max < 1.0 {
            return Err(Error::InvalidConfig(
                "element budget must allow at least one element".to_string(),
            ));
        }
        Ok(())
    }

    /// Minimum score for a read of `read_len` bases.
    pub fn min_score(&self, read_len: usize) -> i64 {
        let min = self.score_min.eval_i64(read_len as f64);
        match self.floor {
            // local mode: never below the floor
            Some(floor) => min.max(floor),
            None => min,
        }
    }

    /// Max reference Ns for a read of `read_len` bases.
    pub fn n_ceil(&self, read_len: usize) -> usize {
        self.n_ceil.eval_usize(read_len as f64)
    }

    /// Maximum elements to explore when `total` are available.
    pub fn max_elements(&self, total: usize) -> usize {
        self.max_elt.eval_usize(total as f64).max(1)
    }

    /// Whether alignments on this strand may be searched.
    #[inline]
    pub fn strand_allowed(&self, fw: bool) -> bool {
        if fw { !self.nofw } else { !self.norc }
    }
}
