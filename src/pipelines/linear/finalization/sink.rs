//! Reporting sinks.
//!
//! The driver only needs two things from the reporting policy: a place to
//! put an accepted alignment and a yes/no answer to "is that enough?".

use crate::core::alignment::Mate;
use crate::pipelines::linear::extension::AlnRes;

/// An alignment or alignment pair handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportedHit {
    Unpaired(AlnRes),
    Pair {
        mate1: AlnRes,
        mate2: AlnRes,
        concordant: bool,
    },
}

impl ReportedHit {
    /// Build a pair hit, putting the alignments in mate order.
    pub fn pair(a: AlnRes, b: AlnRes, concordant: bool) -> Self {
        let (mate1, mate2) = if a.mate == Mate::Mate2 { (b, a) } else { (a, b) };
        ReportedHit::Pair {
            mate1,
            mate2,
            concordant,
        }
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, ReportedHit::Pair { .. })
    }

    pub fn is_concordant(&self) -> bool {
        matches!(self, ReportedHit::Pair { concordant: true, .. })
    }

    pub fn alignments(&self) -> Vec<&AlnRes> {
        match self {
            ReportedHit::Unpaired(a) => vec![a],
            ReportedHit::Pair { mate1, mate2, .. } => vec![mate1, mate2],
        }
    }

    /// Summed alignment score.
    pub fn score(&self) -> i64 {
        self.alignments().iter().map(|a| a.score_value()).sum()
    }
}

/// Reporting policy as seen by the driver.
pub trait AlignmentSink {
    /// Record `hit`; returns true once the policy is satisfied.
    fn report(&mut self, hit: ReportedHit) -> bool;

    fn is_satisfied(&self) -> bool;

    /// Best alignment score recorded for `mate`, for score tightening.
    fn best_score(&self, _mate: Mate) -> Option<i64> {
        None
    }

    fn second_best_score(&self, _mate: Mate) -> Option<i64> {
        None
    }
}

/// Keeps the first `k` hits and is satisfied once it has them.
#[derive(Debug, Clone)]
pub struct TopKSink {
    k: usize,
    hits: Vec<ReportedHit>,
    // best and second best per mate: unpaired, mate 1, mate 2
    best: [(Option<i64>, Option<i64>); 3],
}

impl TopKSink {
    pub fn new(k: usize) -> Self {
        Self {
            k: k.max(1),
            hits: Vec::new(),
            best: [(None, None); 3],
        }
    }

    pub fn hits(&self) -> &[ReportedHit] {
        &self.hits
    }

    pub fn into_hits(self) -> Vec<ReportedHit> {
        self.hits
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Forget everything; used between reads.
    pub fn clear(&mut self) {
        self.hits.clear();
        self.best = [(None, None); 3];
    }

    fn slot(mate: Mate) -> usize {
        match mate {
            Mate::Unpaired => 0,
            Mate::Mate1 => 1,
            Mate::Mate2 => 2,
        }
    }

    fn note_score(&mut self, mate: Mate, score: i64) {
        let (best, second) = &mut self.best[Self::slot(mate)];
        match *best {
            Some(b) if score > b => {
                *second = Some(b);
                *best = Some(score);
            }
            Some(_) => {
                if second.map_or(true, |s| score > s) {
                    *second = Some(score);
                }
            }
            None => *best = Some(score),
        }
    }
}

impl Default for TopKSink {
    fn default() -> Self {
        Self::new(crate::defaults::REPORT_K)
    }
}

impl AlignmentSink for TopKSink {
    fn report(&mut self, hit: ReportedHit) -> bool {
        if self.hits.len() < self.k {
            for a in hit.alignments() {
                self.note_score(a.mate, a.score_value());
            }
            self.hits.push(hit);
        }
        self.is_satisfied()
    }

    fn is_satisfied(&self) -> bool {
        self.hits.len() >= self.k
    }

    fn best_score(&self, mate: Mate) -> Option<i64> {
        self.best[Self::slot(mate)].0
    }

    fn second_best_score(&self, mate: Mate) -> Option<i64> {
        self.best[Self::slot(mate)].1
    }
}
