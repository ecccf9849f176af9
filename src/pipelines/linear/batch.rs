//! Parallel per-read alignment.
//!
//! Reads are independent: each rayon worker owns one `SwDriver` and one set
//! of collaborators, built once per worker by `map_init`. Each read gets its
//! own random source seeded from the batch seed and the read name, so the
//! results do not depend on how reads are scheduled across threads.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use super::driver::{ExtendOutcome, ExtendStatus, SwDriver};
use super::extension::{DpAligner, IndexWalk, ReferenceSet};
use super::finalization::{
    MetricsSinks, ReportedHit, SwActionSink, SwCounterSink, SwMetrics, TopKSink, WalkMetrics,
};
use super::paired::MatePolicy;
use super::seeding::SeedHits;
use super::sw_opt::SwDriverOpt;
use crate::core::alignment::{Mate, Read};
use crate::core::utils::read_seed;
use crate::defaults;
use crate::error::Result;

/// Per-batch settings.
#[derive(Debug, Clone, Copy)]
pub struct BatchConfig {
    /// Hits to report per read before stopping
    pub report_k: usize,
    pub base_seed: u64,
    /// Run whole-reference search for reads with no seed-extension hits
    pub whole_ref_fallback: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            report_k: defaults::REPORT_K,
            base_seed: 0,
            whole_ref_fallback: false,
        }
    }
}

/// An unpaired read and its seed hits.
#[derive(Debug, Clone)]
pub struct UnpairedJob {
    pub read: Read,
    pub seeds: SeedHits,
}

/// A read pair and the seed hits of each mate.
#[derive(Debug, Clone)]
pub struct PairedJob {
    pub mate1: Read,
    pub mate2: Read,
    pub seeds1: SeedHits,
    pub seeds2: SeedHits,
    /// Mates that failed read filters
    pub mate1_filtered: bool,
    pub mate2_filtered: bool,
}

impl PairedJob {
    pub fn new(mut mate1: Read, mut mate2: Read, seeds1: SeedHits, seeds2: SeedHits) -> Self {
        mate1.mate = Mate::Mate1;
        mate2.mate = Mate::Mate2;
        Self {
            mate1,
            mate2,
            seeds1,
            seeds2,
            mate1_filtered: false,
            mate2_filtered: false,
        }
    }
}

/// Everything reported for one read or pair.
#[derive(Debug, Clone)]
pub struct ReadResult {
    pub name: String,
    pub hits: Vec<ReportedHit>,
    pub outcome: ExtendOutcome,
    pub metrics: SwMetrics,
    pub walk_metrics: WalkMetrics,
}

/// Align unpaired reads in parallel. Output order matches `jobs`.
pub fn align_unpaired_batch<W, A, F, MW, MA>(
    opt: &SwDriverOpt,
    cfg: &BatchConfig,
    jobs: &[UnpairedJob],
    refs: &F,
    make_walk: MW,
    make_aligner: MA,
) -> Result<Vec<ReadResult>>
where
    W: IndexWalk,
    A: DpAligner,
    F: ReferenceSet + Sync,
    MW: Fn() -> W + Sync + Send,
    MA: Fn() -> A + Sync + Send,
{
    opt.validate()?;
    log::debug!(
        "Aligning {} unpaired reads on {} threads",
        jobs.len(),
        rayon::current_num_threads()
    );
    jobs.par_iter()
        .map_init(
            || (SwDriver::from_validated(opt.clone()), make_walk(), make_aligner()),
            |(driver, walk, aligner), job| align_unpaired(driver, walk, aligner, refs, cfg, job),
        )
        .collect()
}

/// Align read pairs in parallel, each mate taking a turn as the anchor.
pub fn align_paired_batch<W, A, P, MW, MA>(
    opt: &SwDriverOpt,
    cfg: &BatchConfig,
    jobs: &[PairedJob],
    policy: &P,
    make_walk: MW,
    make_aligner: MA,
) -> Result<Vec<ReadResult>>
where
    W: IndexWalk,
    A: DpAligner,
    P: MatePolicy + Sync,
    MW: Fn() -> W + Sync + Send,
    MA: Fn() -> A + Sync + Send,
{
    opt.validate()?;
    log::debug!(
        "Aligning {} read pairs on {} threads",
        jobs.len(),
        rayon::current_num_threads()
    );
    jobs.par_iter()
        .map_init(
            || {
                (
                    SwDriver::from_validated(opt.clone()),
                    make_walk(),
                    make_aligner(),
                    make_aligner(),
                )
            },
            |(driver, walk, aligner, opp_aligner), job| {
                align_pair(driver, walk, aligner, opp_aligner, policy, cfg, job)
            },
        )
        .collect()
}

fn align_unpaired<W, A, F>(
    driver: &mut SwDriver,
    walk: &mut W,
    aligner: &mut A,
    refs: &F,
    cfg: &BatchConfig,
    job: &UnpairedJob,
) -> Result<ReadResult>
where
    W: IndexWalk,
    A: DpAligner,
    F: ReferenceSet,
{
    let read = &job.read;
    driver.next_read(false, read.len(), 0);
    let mut sink = TopKSink::new(cfg.report_k);
    let mut rng = StdRng::seed_from_u64(read_seed(cfg.base_seed, &read.name));
    let mut sw_total = SwMetrics::default();
    let mut walk_total = WalkMetrics::default();

    let outcome = {
        let mut counters: [&mut dyn SwCounterSink; 2] = [&mut sw_total, &mut walk_total];
        let mut no_actions: [&mut dyn SwActionSink; 0] = [];
        let mut sinks = MetricsSinks::new(&mut counters, &mut no_actions);
        let mut outcome = driver.extend_seeds(
            read, &job.seeds, walk, aligner, &mut sink, &mut rng, true, &mut sinks,
        )?;
        if cfg.whole_ref_fallback && sink.is_empty() && !outcome.is_fulfilled() {
            outcome = driver.sw(read, refs, aligner, &mut sink, &mut rng, true, &mut sinks)?;
        }
        outcome
    };

    Ok(ReadResult {
        name: read.name.clone(),
        hits: sink.into_hits(),
        outcome,
        metrics: sw_total,
        walk_metrics: walk_total,
    })
}

fn align_pair<W, A, P>(
    driver: &mut SwDriver,
    walk: &mut W,
    aligner: &mut A,
    opp_aligner: &mut A,
    policy: &P,
    cfg: &BatchConfig,
    job: &PairedJob,
) -> Result<ReadResult>
where
    W: IndexWalk,
    A: DpAligner,
    P: MatePolicy,
{
    driver.next_read(true, job.mate1.len(), job.mate2.len());
    let mut sink = TopKSink::new(cfg.report_k);
    let mut rng = StdRng::seed_from_u64(read_seed(cfg.base_seed, &job.mate1.name));
    let mut sw_total = SwMetrics::default();
    let mut walk_total = WalkMetrics::default();

    let turns = [
        (&job.mate1, &job.mate2, &job.seeds1, job.mate1_filtered, job.mate2_filtered),
        (&job.mate2, &job.mate1, &job.seeds2, job.mate2_filtered, job.mate1_filtered),
    ];
    let mut outcome = ExtendOutcome {
        status: ExtendStatus::ExhaustedCandidates,
        exhaustive: true,
    };
    {
        let mut counters: [&mut dyn SwCounterSink; 2] = [&mut sw_total, &mut walk_total];
        let mut no_actions: [&mut dyn SwActionSink; 0] = [];
        let mut sinks = MetricsSinks::new(&mut counters, &mut no_actions);
        for (anchor, opposite, seeds, anchor_filtered, opp_filtered) in turns {
            if anchor_filtered {
                continue;
            }
            let turn = driver.extend_seeds_paired(
                anchor,
                opposite,
                seeds,
                opp_filtered,
                walk,
                aligner,
                opp_aligner,
                policy,
                &mut sink,
                &mut rng,
                true,
                &mut sinks,
            )?;
            outcome.exhaustive &= turn.exhaustive;
            if turn.is_fulfilled() {
                outcome = turn;
                break;
            }
        }
    }

    Ok(ReadResult {
        name: job.mate1.name.clone(),
        hits: sink.into_hits(),
        outcome,
        metrics: sw_total,
        walk_metrics: walk_total,
    })
}
