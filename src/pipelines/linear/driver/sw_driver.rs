//! Driver state, per-read reset and the steps shared by all search modes.

use rand::Rng;

use crate::core::alignment::{Mate, Read, RefCoord};
use crate::error::Result;
use crate::pipelines::linear::extension::{AlnRes, DpAligner, DpProblem, DpRect, IndexWalk};
use crate::pipelines::linear::finalization::{
    AlignmentSink, MetricsSinks, ReportedHit, SwAction, SwActionKind, SwMetrics, WalkMetrics,
};
use crate::pipelines::linear::redundancy::{RedundancyDbs, RedundancyRole, SeenDiagonals};
use crate::pipelines::linear::seeding::{prioritize, RangeAndPosition, SeedHitPosition, SeedHits};
use crate::pipelines::linear::sw_opt::{SwDriverOpt, TightenMode};

/// Why a search call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendStatus {
    /// Every scheduled candidate was tried
    ExhaustedCandidates,
    /// The reporting sink is satisfied
    PolicyFulfilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendOutcome {
    pub status: ExtendStatus,
    /// True when the whole search space was explored: nothing was cut by the
    /// element budget or by early termination
    pub exhaustive: bool,
}

impl ExtendOutcome {
    pub(super) fn exhausted(exhaustive: bool) -> Self {
        Self {
            status: ExtendStatus::ExhaustedCandidates,
            exhaustive,
        }
    }

    pub(super) fn fulfilled() -> Self {
        Self {
            status: ExtendStatus::PolicyFulfilled,
            exhaustive: false,
        }
    }

    pub fn is_fulfilled(&self) -> bool {
        self.status == ExtendStatus::PolicyFulfilled
    }
}

/// A seed hit resolved to a reference coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedHit {
    pub pos: SeedHitPosition,
    pub coord: RefCoord,
    /// Cardinality of the range it came from
    pub range_size: usize,
}

/// Both orientations of one read.
pub(super) struct OrientedRead {
    fw_seq: Vec<u8>,
    rc_seq: Vec<u8>,
    fw_qual: Vec<u8>,
    rc_qual: Vec<u8>,
}

impl OrientedRead {
    pub(super) fn new(read: &Read) -> Self {
        let mut rc_qual = read.qual.clone();
        rc_qual.reverse();
        Self {
            fw_seq: read.seq.clone(),
            rc_seq: read.reverse_complement(),
            fw_qual: read.qual.clone(),
            rc_qual,
        }
    }

    pub(super) fn seq(&self, fw: bool) -> &[u8] {
        if fw { &self.fw_seq } else { &self.rc_seq }
    }

    pub(super) fn qual(&self, fw: bool) -> &[u8] {
        if fw { &self.fw_qual } else { &self.rc_qual }
    }
}

/// Seed-extension driver. See the module docs.
#[derive(Debug, Clone)]
pub struct SwDriver {
    pub(super) opt: SwDriverOpt,
    pub(super) seen: SeenDiagonals,
    pub(super) red: RedundancyDbs,
    entries: Vec<RangeAndPosition>,
    pub(super) hits: Vec<ResolvedHit>,
    /// Accepted hits not handed to the sink
    pub(super) pending: Vec<ReportedHit>,
    /// Tightened minimum score per mate slot
    tight_min: [Option<i64>; 2],
    pub(super) metrics: SwMetrics,
    pub(super) walk_metrics: WalkMetrics,
    pub(super) actions: Vec<SwAction>,
    last_metrics: (SwMetrics, WalkMetrics),
    paired: bool,
}

impl SwDriver {
    pub fn new(opt: SwDriverOpt) -> Result<Self> {
        opt.validate()?;
        Ok(Self::from_validated(opt))
    }

    /// Construct from options that already passed `validate`.
    pub(crate) fn from_validated(opt: SwDriverOpt) -> Self {
        Self {
            opt,
            seen: SeenDiagonals::new(),
            red: RedundancyDbs::new(),
            entries: Vec::new(),
            hits: Vec::new(),
            pending: Vec::new(),
            tight_min: [None; 2],
            metrics: SwMetrics::default(),
            walk_metrics: WalkMetrics::default(),
            actions: Vec::new(),
            last_metrics: (SwMetrics::default(), WalkMetrics::default()),
            paired: false,
        }
    }

    pub fn opt(&self) -> &SwDriverOpt {
        &self.opt
    }

    /// Reset all per-read state.
    ///
    /// The anchor database is sized for the longer mate; each mate database
    /// for its own mate. Pass `mate2_len = 0` for unpaired reads.
    pub fn next_read(&mut self, paired: bool, mate1_len: usize, mate2_len: usize) {
        self.paired = paired;
        self.seen.clear();
        let mate2_len = if paired { mate2_len } else { 0 };
        self.red.init(mate1_len, mate2_len);
        self.entries.clear();
        self.hits.clear();
        self.pending.clear();
        self.tight_min = [None; 2];
        self.metrics.reset();
        self.walk_metrics.reset();
        self.actions.clear();
    }

    pub fn is_paired(&self) -> bool {
        self.paired
    }

    pub fn seen_diagonals(&self) -> &SeenDiagonals {
        &self.seen
    }

    pub fn redundancy(&self) -> &RedundancyDbs {
        &self.red
    }

    /// Hits accepted by calls made with `report_immediately == false`.
    pub fn pending(&self) -> &[ReportedHit] {
        &self.pending
    }

    pub fn take_pending(&mut self) -> Vec<ReportedHit> {
        std::mem::take(&mut self.pending)
    }

    /// Hits resolved by the most recent seed-extension call.
    pub fn resolved_hits(&self) -> &[ResolvedHit] {
        &self.hits
    }

    /// Metrics of the most recent driver call.
    pub fn last_metrics(&self) -> (SwMetrics, WalkMetrics) {
        self.last_metrics
    }

    /// Minimum score in force for `mate`, after any tightening.
    pub fn working_min_score(&self, mate: Mate, base: i64) -> i64 {
        self.tight_min[mate.slot()].map_or(base, |t| t.max(base))
    }

    /// Prioritize the seed hits and resolve the scheduled elements.
    ///
    /// Returns whether every element was scheduled.
    pub(super) fn resolve_hits<W, R>(
        &mut self,
        read: &Read,
        seeds: &SeedHits,
        index: &mut W,
        rng: &mut R,
    ) -> Result<bool>
    where
        W: IndexWalk,
        R: Rng + ?Sized,
    {
        self.hits.clear();
        self.entries = seeds.range_positions(self.opt.nofw, self.opt.norc);
        let total: usize = self.entries.iter().map(|e| e.range.size).sum();
        let max_elt = self.opt.max_elements(total);
        let plan = prioritize(&mut self.entries, self.opt.n_small, max_elt, rng)?;

        self.metrics.seed_ranges += self.entries.len();
        self.metrics.seed_elements += plan.total_elements;
        self.metrics.elements_scheduled += plan.picks.len();
        if plan.sampled {
            self.metrics.sampled_reads += 1;
        }

        let use_scan = self.opt.refscan && index.supports_ref_scan();
        let mut scanned = vec![false; self.entries.len()];
        for pick in &plan.picks {
            let entry = self.entries[pick.entry];
            if use_scan && entry.range.size >= self.opt.refscan_min_range {
                if scanned[pick.entry] {
                    continue;
                }
                scanned[pick.entry] = true;
                self.walk_metrics.ref_scans += 1;
                let seq = if entry.pos.fw {
                    read.seq.clone()
                } else {
                    read.reverse_complement()
                };
                if let Some(coords) =
                    index.scan_reference(&seq, &entry.pos, &entry.range, &mut self.walk_metrics)
                {
                    self.walk_metrics.ref_scan_hits += coords.len();
                    self.hits.extend(coords.into_iter().map(|c| ResolvedHit {
                        pos: entry.pos,
                        coord: RefCoord::new(c.ref_id, c.off, entry.pos.fw),
                        range_size: entry.range.size,
                    }));
                    continue;
                }
                // fall through to resolving this element
                scanned[pick.entry] = false;
            }
            self.walk_metrics.resolves += 1;
            match index.resolve(&entry.range, pick.elt, &mut self.walk_metrics) {
                Some(c) => self.hits.push(ResolvedHit {
                    pos: entry.pos,
                    coord: RefCoord::new(c.ref_id, c.off, entry.pos.fw),
                    range_size: entry.range.size,
                }),
                None => self.walk_metrics.resolve_failures += 1,
            }
        }
        Ok(plan.exhaustive)
    }

    /// Frame the DP window for a resolved hit, or `None` when the hit lies on
    /// a diagonal already covered or the window misses the reference.
    pub(super) fn frame_hit<W: IndexWalk>(
        &mut self,
        mate: Mate,
        read_len: usize,
        hit: &ResolvedHit,
        min_score: i64,
        index: &W,
    ) -> Option<DpRect> {
        let RefCoord { ref_id, off, fw } = hit.coord;
        let diag = off - hit.pos.oriented_rdoff(read_len) as i64;
        if self.seen.contains(mate, ref_id, fw, diag) {
            self.metrics.redundant_seed_hits += 1;
            log::trace!("Seed hit on covered diagonal {} (ref {}, fw={})", diag, ref_id, fw);
            return None;
        }
        let ref_len = index.ref_len(ref_id)?;
        let sc = &self.opt.scoring;
        let max_gaps = sc
            .max_read_gaps(min_score, read_len)
            .max(sc.max_ref_gaps(min_score, read_len));
        let rect =
            DpRect::frame_seed_extension(diag, read_len, ref_len, max_gaps, self.opt.max_half)?;
        let (lo, hi) = rect.core_diagonals();
        self.seen.add(mate, ref_id, fw, lo, hi);
        Some(rect)
    }

    /// Hand one problem to the aligner and record the action.
    ///
    /// Returns the action index, or `None` when the fill reached nothing.
    pub(super) fn fill<A: DpAligner>(
        &mut self,
        kind: SwActionKind,
        problem: &DpProblem<'_>,
        aligner: &mut A,
    ) -> Option<usize> {
        let mate_search = kind == SwActionKind::MateSearch;
        if mate_search {
            self.metrics.mate_searches += 1;
        } else {
            self.metrics.dp_problems += 1;
        }
        let best = aligner.fill(problem, &mut self.metrics);
        let filled = best.at_least(problem.min_score);
        match (filled, mate_search) {
            (true, true) => self.metrics.mate_dp_filled += 1,
            (true, false) => self.metrics.dp_filled += 1,
            _ => {}
        }
        self.actions.push(SwAction {
            kind,
            ref_id: problem.ref_id,
            fw: problem.fw,
            rect: problem.rect,
            filled,
            accepted: 0,
        });
        filled.then(|| self.actions.len() - 1)
    }

    /// Build a problem with the per-read thresholds filled in.
    pub(super) fn problem<'a>(
        &self,
        read: &'a OrientedRead,
        mate: Mate,
        fw: bool,
        ref_id: usize,
        rect: DpRect,
        min_score: i64,
    ) -> DpProblem<'a> {
        let seq = read.seq(fw);
        DpProblem {
            read: seq,
            qual: read.qual(fw),
            mate,
            fw,
            ref_id,
            rect,
            min_score,
            floor: self.opt.floor,
            n_ceil: self.opt.n_ceil(seq.len()),
            enable8: self.opt.enable8,
        }
    }

    /// Check `res` against the database for `role`; add it when new.
    pub(super) fn accept(&mut self, role: RedundancyRole, res: &AlnRes) -> bool {
        if self.red.get(role).overlap(res) {
            self.metrics.redundant_alignments += 1;
            log::trace!(
                "Redundant alignment at ref {}:{} (fw={}, score {})",
                res.ref_id(),
                res.ref_left(),
                res.fw(),
                res.score
            );
            return false;
        }
        self.red.get_mut(role).add(res);
        true
    }

    /// Report or stash a hit. Returns true when the sink is satisfied.
    pub(super) fn emit<S: AlignmentSink>(
        &mut self,
        hit: ReportedHit,
        sink: &mut S,
        report_immediately: bool,
    ) -> bool {
        if hit.is_pair() {
            self.metrics.reported_pairs += 1;
        } else {
            self.metrics.reported_unpaired += 1;
        }
        if !report_immediately {
            self.pending.push(hit);
            return false;
        }
        let mates: Vec<Mate> = hit.alignments().iter().map(|a| a.mate).collect();
        let satisfied = sink.report(hit);
        for mate in mates {
            self.tighten(sink, mate);
        }
        satisfied
    }

    /// Raise the working minimum score for `mate` from the sink's scores.
    fn tighten<S: AlignmentSink>(&mut self, sink: &S, mate: Mate) {
        let (Some(best), Some(second)) = (sink.best_score(mate), sink.second_best_score(mate))
        else {
            return;
        };
        let target = match self.opt.tighten {
            TightenMode::Off => return,
            TightenMode::Best => best,
            TightenMode::SecondBest => second,
            TightenMode::Blend => second + (best - second) * 3 / 4,
        };
        let slot = &mut self.tight_min[mate.slot()];
        if slot.map_or(true, |cur| target > cur) {
            *slot = Some(target);
            self.metrics.tightened += 1;
            log::debug!("Minimum score for {:?} tightened to {}", mate, target);
        }
    }

    /// Push this call's metrics to the receivers and start fresh counters.
    pub(super) fn flush(&mut self, read_name: &str, sinks: &mut MetricsSinks<'_>) {
        sinks.flush(read_name, &self.metrics, &self.walk_metrics, &self.actions);
        self.last_metrics = (self.metrics, self.walk_metrics);
        self.metrics.reset();
        self.walk_metrics.reset();
        self.actions.clear();
    }

    pub(super) fn note_early_stop(&mut self, read_name: &str) {
        self.metrics.early_terminations += 1;
        log::debug!("Reporting policy satisfied for {}; stopping search", read_name);
    }
}
