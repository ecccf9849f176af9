//! Paired-end seed extension.
//!
//! The anchor mate is extended from its seeds exactly as in the unpaired
//! case. Every anchor alignment that survives the anchor database triggers a
//! DP search for the opposite mate in the window the `MatePolicy` allows.
//!
//! Redundancy: anchors are checked against the anchor database, which also
//! receives the cells of every opposite alignment found. A later anchor that
//! overlaps an earlier pair's opposite is therefore rejected too, which keeps
//! two reported pairs from sharing an alignment without searching the full
//! closure of overlapping pairs. Some concordant pairs near an earlier pair
//! can go unexplored as a result. Opposites are checked against the database
//! of their own mate.

use rand::Rng;

use super::sw_driver::{ExtendOutcome, OrientedRead, SwDriver};
use crate::core::alignment::{Mate, Read};
use crate::error::Result;
use crate::pipelines::linear::extension::{AlnRes, DpAligner, DpRect, IndexWalk};
use crate::pipelines::linear::finalization::{
    AlignmentSink, MetricsSinks, ReportedHit, SwActionKind,
};
use crate::pipelines::linear::paired::{MatePolicy, PairClass};
use crate::pipelines::linear::redundancy::RedundancyRole;
use crate::pipelines::linear::seeding::SeedHits;

/// What became of one anchor alignment.
enum AnchorOutcome {
    Satisfied,
    Paired,
    Unpaired,
}

impl SwDriver {
    /// Extend `anchor`'s seed hits and search for `opposite` next to every
    /// accepted anchor alignment.
    ///
    /// `opp_filtered` means the opposite mate failed read filters: no mate
    /// search is run, and anchors can only be reported unpaired (in mixed
    /// mode). The same holds for every anchor when `mate_immediately` is off.
    #[allow(clippy::too_many_arguments)]
    pub fn extend_seeds_paired<W, A, O, P, S, R>(
        &mut self,
        anchor: &Read,
        opposite: &Read,
        seeds: &SeedHits,
        opp_filtered: bool,
        index: &mut W,
        aligner: &mut A,
        opp_aligner: &mut O,
        policy: &P,
        sink: &mut S,
        rng: &mut R,
        report_immediately: bool,
        sinks: &mut MetricsSinks<'_>,
    ) -> Result<ExtendOutcome>
    where
        W: IndexWalk,
        A: DpAligner,
        O: DpAligner,
        P: MatePolicy,
        S: AlignmentSink,
        R: Rng + ?Sized,
    {
        let outcome = self.extend_anchor_seeds(
            anchor,
            opposite,
            seeds,
            opp_filtered,
            index,
            aligner,
            opp_aligner,
            policy,
            sink,
            rng,
            report_immediately,
        );
        self.flush(&anchor.name, sinks);
        outcome
    }

    #[allow(clippy::too_many_arguments)]
    fn extend_anchor_seeds<W, A, O, P, S, R>(
        &mut self,
        anchor: &Read,
        opposite: &Read,
        seeds: &SeedHits,
        opp_filtered: bool,
        index: &mut W,
        aligner: &mut A,
        opp_aligner: &mut O,
        policy: &P,
        sink: &mut S,
        rng: &mut R,
        report_immediately: bool,
    ) -> Result<ExtendOutcome>
    where
        W: IndexWalk,
        A: DpAligner,
        O: DpAligner,
        P: MatePolicy,
        S: AlignmentSink,
        R: Rng + ?Sized,
    {
        debug_assert!(self.is_paired(), "next_read was not told the read is paired");
        if sink.is_satisfied() {
            return Ok(ExtendOutcome::fulfilled());
        }
        let exhaustive = self.resolve_hits(anchor, seeds, index, rng)?;
        let anchor_oriented = OrientedRead::new(anchor);
        let opp_oriented = OrientedRead::new(opposite);
        let base_min = self.opt.min_score(anchor.len());

        for h in 0..self.hits.len() {
            let hit = self.hits[h];
            let min_score = self.working_min_score(anchor.mate, base_min);
            let Some(rect) = self.frame_hit(anchor.mate, anchor.len(), &hit, min_score, index)
            else {
                continue;
            };
            let problem = self.problem(
                &anchor_oriented,
                anchor.mate,
                hit.coord.fw,
                hit.coord.ref_id,
                rect,
                min_score,
            );
            let Some(action) = self.fill(SwActionKind::SeedExtend, &problem, aligner) else {
                continue;
            };

            while !aligner.done() {
                let min_score = self.working_min_score(anchor.mate, base_min);
                let Some(res) = aligner.next_alignment(min_score, rng, &mut self.metrics)? else {
                    break;
                };
                res.score.require("anchor alignment from DP engine")?;
                self.metrics.alignments += 1;
                if !self.accept(RedundancyRole::Anchor, &res) {
                    continue;
                }
                self.actions[action].accepted += 1;

                let outcome = if opp_filtered || !self.opt.mate_immediately {
                    AnchorOutcome::Unpaired
                } else {
                    self.search_opposite(
                        &res,
                        opposite,
                        &opp_oriented,
                        index,
                        opp_aligner,
                        policy,
                        sink,
                        rng,
                        report_immediately,
                    )?
                };
                let satisfied = match outcome {
                    AnchorOutcome::Satisfied => true,
                    AnchorOutcome::Paired => false,
                    AnchorOutcome::Unpaired => {
                        self.report_unpaired_anchor(res, sink, report_immediately)
                    }
                };
                if satisfied {
                    self.note_early_stop(&anchor.name);
                    return Ok(ExtendOutcome::fulfilled());
                }
            }
        }
        Ok(ExtendOutcome::exhausted(exhaustive))
    }

    /// DP search for the opposite mate next to `anchor_res`.
    #[allow(clippy::too_many_arguments)]
    fn search_opposite<W, O, P, S, R>(
        &mut self,
        anchor_res: &AlnRes,
        opposite: &Read,
        opp_oriented: &OrientedRead,
        index: &W,
        opp_aligner: &mut O,
        policy: &P,
        sink: &mut S,
        rng: &mut R,
        report_immediately: bool,
    ) -> Result<AnchorOutcome>
    where
        W: IndexWalk,
        O: DpAligner,
        P: MatePolicy,
        S: AlignmentSink,
        R: Rng + ?Sized,
    {
        let ref_id = anchor_res.ref_id();
        let Some(ref_len) = index.ref_len(ref_id) else {
            return Ok(AnchorOutcome::Unpaired);
        };
        let Some(window) = policy.other_mate_window(anchor_res, opposite.len(), ref_len) else {
            return Ok(AnchorOutcome::Unpaired);
        };
        if !self.opt.strand_allowed(window.fw) {
            return Ok(AnchorOutcome::Unpaired);
        }
        let Some(rect) = DpRect::frame_mate_window(window.left, window.right, ref_len) else {
            return Ok(AnchorOutcome::Unpaired);
        };

        let opp_base = self.opt.min_score(opposite.len());
        let min_score = self.working_min_score(opposite.mate, opp_base);
        let problem = self.problem(opp_oriented, opposite.mate, window.fw, ref_id, rect, min_score);
        let Some(action) = self.fill(SwActionKind::MateSearch, &problem, opp_aligner) else {
            return Ok(AnchorOutcome::Unpaired);
        };

        let opp_role = RedundancyRole::for_mate(opposite.mate);
        let mut paired = false;
        while !opp_aligner.done() {
            let min_score = self.working_min_score(opposite.mate, opp_base);
            let Some(ores) = opp_aligner.next_alignment(min_score, rng, &mut self.metrics)? else {
                break;
            };
            ores.score.require("opposite alignment from DP engine")?;
            self.metrics.mate_alignments += 1;
            if !self.accept(opp_role, &ores) {
                continue;
            }
            self.red.get_mut(RedundancyRole::Anchor).add(&ores);
            self.actions[action].accepted += 1;
            self.metrics.mates_found += 1;

            let class = if anchor_res.mate == Mate::Mate2 {
                policy.classify(&ores, anchor_res)
            } else {
                policy.classify(anchor_res, &ores)
            };
            let concordant = class == PairClass::Concordant;
            if !concordant && !self.opt.discord {
                log::trace!("Dropping non-concordant pair for {}", opposite.name);
                continue;
            }
            if concordant {
                paired = true;
            }
            let hit = ReportedHit::pair(anchor_res.clone(), ores, concordant);
            if self.emit(hit, sink, report_immediately) {
                return Ok(AnchorOutcome::Satisfied);
            }
        }
        Ok(if paired {
            AnchorOutcome::Paired
        } else {
            AnchorOutcome::Unpaired
        })
    }

    /// Mixed mode: report an anchor with no concordant mate on its own.
    fn report_unpaired_anchor<S: AlignmentSink>(
        &mut self,
        res: AlnRes,
        sink: &mut S,
        report_immediately: bool,
    ) -> bool {
        if !self.opt.mixed {
            return false;
        }
        if !self.accept(RedundancyRole::for_mate(res.mate), &res) {
            return false;
        }
        self.emit(ReportedHit::Unpaired(res), sink, report_immediately)
    }
}
