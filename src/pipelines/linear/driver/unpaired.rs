//! Unpaired seed extension and whole-reference search.

use rand::Rng;

use super::sw_driver::{ExtendOutcome, OrientedRead, SwDriver};
use crate::core::alignment::{Mate, Read};
use crate::error::Result;
use crate::pipelines::linear::extension::{DpAligner, DpRect, IndexWalk, ReferenceSet};
use crate::pipelines::linear::finalization::{
    AlignmentSink, MetricsSinks, ReportedHit, SwActionKind,
};
use crate::pipelines::linear::redundancy::RedundancyRole;
use crate::pipelines::linear::seeding::SeedHits;

impl SwDriver {
    /// Extend every scheduled seed hit of `read` into alignments.
    ///
    /// Accepted alignments go to `sink` when `report_immediately`, otherwise
    /// they are kept in `pending()`. Metrics go to `sinks` on return, error
    /// or not.
    #[allow(clippy::too_many_arguments)]
    pub fn extend_seeds<W, A, S, R>(
        &mut self,
        read: &Read,
        seeds: &SeedHits,
        index: &mut W,
        aligner: &mut A,
        sink: &mut S,
        rng: &mut R,
        report_immediately: bool,
        sinks: &mut MetricsSinks<'_>,
    ) -> Result<ExtendOutcome>
    where
        W: IndexWalk,
        A: DpAligner,
        S: AlignmentSink,
        R: Rng + ?Sized,
    {
        let outcome =
            self.extend_seeds_unpaired(read, seeds, index, aligner, sink, rng, report_immediately);
        self.flush(&read.name, sinks);
        outcome
    }

    #[allow(clippy::too_many_arguments)]
    fn extend_seeds_unpaired<W, A, S, R>(
        &mut self,
        read: &Read,
        seeds: &SeedHits,
        index: &mut W,
        aligner: &mut A,
        sink: &mut S,
        rng: &mut R,
        report_immediately: bool,
    ) -> Result<ExtendOutcome>
    where
        W: IndexWalk,
        A: DpAligner,
        S: AlignmentSink,
        R: Rng + ?Sized,
    {
        if sink.is_satisfied() {
            return Ok(ExtendOutcome::fulfilled());
        }
        let exhaustive = self.resolve_hits(read, seeds, index, rng)?;
        let oriented = OrientedRead::new(read);
        let base_min = self.opt.min_score(read.len());

        for h in 0..self.hits.len() {
            let hit = self.hits[h];
            let min_score = self.working_min_score(read.mate, base_min);
            let Some(rect) = self.frame_hit(read.mate, read.len(), &hit, min_score, index) else {
                continue;
            };
            let problem = self.problem(
                &oriented,
                read.mate,
                hit.coord.fw,
                hit.coord.ref_id,
                rect,
                min_score,
            );
            let Some(action) = self.fill(SwActionKind::SeedExtend, &problem, aligner) else {
                continue;
            };
            if self.pull_unpaired(
                read.mate,
                base_min,
                action,
                aligner,
                sink,
                rng,
                report_immediately,
            )? {
                self.note_early_stop(&read.name);
                return Ok(ExtendOutcome::fulfilled());
            }
        }
        Ok(ExtendOutcome::exhausted(exhaustive))
    }

    /// Search every reference sequence on every allowed strand.
    ///
    /// Used when seed extension found nothing. The same redundancy and
    /// reporting rules apply as for `extend_seeds`.
    #[allow(clippy::too_many_arguments)]
    pub fn sw<F, A, S, R>(
        &mut self,
        read: &Read,
        refs: &F,
        aligner: &mut A,
        sink: &mut S,
        rng: &mut R,
        report_immediately: bool,
        sinks: &mut MetricsSinks<'_>,
    ) -> Result<ExtendOutcome>
    where
        F: ReferenceSet,
        A: DpAligner,
        S: AlignmentSink,
        R: Rng + ?Sized,
    {
        let outcome = self.sw_whole_reference(read, refs, aligner, sink, rng, report_immediately);
        self.flush(&read.name, sinks);
        outcome
    }

    fn sw_whole_reference<F, A, S, R>(
        &mut self,
        read: &Read,
        refs: &F,
        aligner: &mut A,
        sink: &mut S,
        rng: &mut R,
        report_immediately: bool,
    ) -> Result<ExtendOutcome>
    where
        F: ReferenceSet,
        A: DpAligner,
        S: AlignmentSink,
        R: Rng + ?Sized,
    {
        if sink.is_satisfied() {
            return Ok(ExtendOutcome::fulfilled());
        }
        log::debug!(
            "Whole-reference search for {} over {} sequences",
            read.name,
            refs.num_refs()
        );
        let oriented = OrientedRead::new(read);
        let base_min = self.opt.min_score(read.len());

        for ref_id in 0..refs.num_refs() {
            let Some(rect) = DpRect::whole_reference(refs.ref_len(ref_id), read.len()) else {
                continue;
            };
            for fw in [true, false] {
                if !self.opt.strand_allowed(fw) {
                    continue;
                }
                self.metrics.whole_ref_searches += 1;
                let min_score = self.working_min_score(read.mate, base_min);
                let problem = self.problem(&oriented, read.mate, fw, ref_id, rect, min_score);
                let Some(action) = self.fill(SwActionKind::WholeReference, &problem, aligner)
                else {
                    continue;
                };
                if self.pull_unpaired(
                    read.mate,
                    base_min,
                    action,
                    aligner,
                    sink,
                    rng,
                    report_immediately,
                )? {
                    self.note_early_stop(&read.name);
                    return Ok(ExtendOutcome::fulfilled());
                }
            }
        }
        Ok(ExtendOutcome::exhausted(true))
    }

    /// Drain alignments from the last fill into the anchor database.
    ///
    /// Returns true when the sink became satisfied.
    #[allow(clippy::too_many_arguments)]
    fn pull_unpaired<A, S, R>(
        &mut self,
        mate: Mate,
        base_min: i64,
        action: usize,
        aligner: &mut A,
        sink: &mut S,
        rng: &mut R,
        report_immediately: bool,
    ) -> Result<bool>
    where
        A: DpAligner,
        S: AlignmentSink,
        R: Rng + ?Sized,
    {
        while !aligner.done() {
            let min_score = self.working_min_score(mate, base_min);
            let Some(res) = aligner.next_alignment(min_score, rng, &mut self.metrics)? else {
                break;
            };
            res.score.require("alignment from DP engine")?;
            self.metrics.alignments += 1;
            if !self.accept(RedundancyRole::Anchor, &res) {
                continue;
            }
            self.actions[action].accepted += 1;
            if self.emit(ReportedHit::Unpaired(res), sink, report_immediately) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
