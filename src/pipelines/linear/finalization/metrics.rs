//! Search counters and per-problem action records.
//!
//! The driver accumulates counters for the read in progress and pushes them
//! to every receiver at the end of each call. Receivers never influence the
//! search; an empty receiver slice simply drops the numbers.

use crate::pipelines::linear::extension::DpRect;

/// Counters for seed extension and DP work.
///
/// DP work done while searching for an opposite mate is counted in the
/// `mate_*` fields, never in `dp_problems` / `dp_filled` / `alignments`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwMetrics {
    pub seed_ranges: usize,        // Non-empty ranges considered
    pub seed_elements: usize,      // Range rows available
    pub elements_scheduled: usize, // Rows picked for resolution
    pub sampled_reads: usize,      // Reads where the row sampler kicked in
    pub redundant_seed_hits: usize, // Hits skipped by the diagonal filter
    pub dp_problems: usize,        // Seed-extension and whole-reference windows
    pub dp_filled: usize,          // Fills that reached the minimum score
    pub alignments: usize,         // Alignments pulled from the aligner
    pub redundant_alignments: usize,
    pub mate_searches: usize,      // Opposite-mate windows handed to the aligner
    pub mate_dp_filled: usize,
    pub mate_alignments: usize,    // Opposite alignments pulled from the aligner
    pub mates_found: usize,
    pub reported_unpaired: usize,
    pub reported_pairs: usize,
    pub tightened: usize,         // Times the minimum score was raised
    pub early_terminations: usize,
    pub whole_ref_searches: usize,
}

impl SwMetrics {
    pub fn merge(&mut self, other: &SwMetrics) {
        self.seed_ranges += other.seed_ranges;
        self.seed_elements += other.seed_elements;
        self.elements_scheduled += other.elements_scheduled;
        self.sampled_reads += other.sampled_reads;
        self.redundant_seed_hits += other.redundant_seed_hits;
        self.dp_problems += other.dp_problems;
        self.dp_filled += other.dp_filled;
        self.alignments += other.alignments;
        self.redundant_alignments += other.redundant_alignments;
        self.mate_searches += other.mate_searches;
        self.mate_dp_filled += other.mate_dp_filled;
        self.mate_alignments += other.mate_alignments;
        self.mates_found += other.mates_found;
        self.reported_unpaired += other.reported_unpaired;
        self.reported_pairs += other.reported_pairs;
        self.tightened += other.tightened;
        self.early_terminations += other.early_terminations;
        self.whole_ref_searches += other.whole_ref_searches;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Counters for index-range resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkMetrics {
    pub resolves: usize,
    pub resolve_failures: usize,
    pub ref_scans: usize,
    pub ref_scan_hits: usize,
}

impl WalkMetrics {
    pub fn merge(&mut self, other: &WalkMetrics) {
        self.resolves += other.resolves;
        self.resolve_failures += other.resolve_failures;
        self.ref_scans += other.ref_scans;
        self.ref_scan_hits += other.ref_scan_hits;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwActionKind {
    SeedExtend,
    MateSearch,
    WholeReference,
}

/// One DP problem the driver attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwAction {
    pub kind: SwActionKind,
    pub ref_id: usize,
    pub fw: bool,
    pub rect: DpRect,
    /// Whether the fill reached the minimum score
    pub filled: bool,
    /// Alignments accepted (not redundant) from this problem
    pub accepted: usize,
}

/// Receives counters at the end of a driver call.
pub trait SwCounterSink {
    fn update(&mut self, sw: &SwMetrics, walk: &WalkMetrics);
}

/// Receives the action list at the end of a driver call.
pub trait SwActionSink {
    fn record(&mut self, read_name: &str, actions: &[SwAction]);
}

/// Running totals across driver calls.
impl SwCounterSink for SwMetrics {
    fn update(&mut self, sw: &SwMetrics, _walk: &WalkMetrics) {
        self.merge(sw);
    }
}

impl SwCounterSink for WalkMetrics {
    fn update(&mut self, _sw: &SwMetrics, walk: &WalkMetrics) {
        self.merge(walk);
    }
}

/// Action receiver that keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    pub entries: Vec<(String, SwAction)>,
}

impl SwActionSink for ActionLog {
    fn record(&mut self, read_name: &str, actions: &[SwAction]) {
        self.entries
            .extend(actions.iter().map(|a| (read_name.to_string(), *a)));
    }
}

/// The metrics receivers for one driver call. Either list may be empty.
pub struct MetricsSinks<'a> {
    pub counters: &'a mut [&'a mut dyn SwCounterSink],
    pub actions: &'a mut [&'a mut dyn SwActionSink],
}

impl<'a> MetricsSinks<'a> {
    pub fn new(
        counters: &'a mut [&'a mut dyn SwCounterSink],
        actions: &'a mut [&'a mut dyn SwActionSink],
    ) -> Self {
        Self { counters, actions }
    }

    pub fn none() -> MetricsSinks<'static> {
        MetricsSinks {
            counters: &mut [],
            actions: &mut [],
        }
    }

    pub(crate) fn flush(
        &mut self,
        read_name: &str,
        sw: &SwMetrics,
        walk: &WalkMetrics,
        actions: &[SwAction],
    ) {
        for c in self.counters.iter_mut() {
            c.update(sw, walk);
        }
        for a in self.actions.iter_mut() {
            a.record(read_name, actions);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_reaches_every_sink() {
        let mut total_a = SwMetrics::default();
        let mut total_b = SwMetrics::default();
        let mut walk = WalkMetrics::default();
        let mut log = ActionLog::default();

        let sw = SwMetrics {
            dp_problems: 3,
            alignments: 2,
            ..Default::default()
        };
        let wm = WalkMetrics {
            resolves: 5,
            ..Default::default()
        };
        let rect = DpRect::whole_reference(100, 10).unwrap();
        let action = SwAction {
            kind: SwActionKind::WholeReference,
            ref_id: 0,
            fw: true,
            rect,
            filled: true,
            accepted: 1,
        };
        {
            let mut counters: [&mut dyn SwCounterSink; 3] =
                [&mut total_a, &mut total_b, &mut walk];
            let mut actions: [&mut dyn SwActionSink; 1] = [&mut log];
            let mut sinks = MetricsSinks::new(&mut counters, &mut actions);
            sinks.flush("read1", &sw, &wm, &[action]);
            sinks.flush("read2", &sw, &wm, &[]);
        }
        assert_eq!(total_a.dp_problems, 6);
        assert_eq!(total_b.alignments, 4);
        assert_eq!(walk.resolves, 10);
        assert_eq!(log.entries.len(), 1);
        assert_eq!(log.entries[0].0, "read1");
    }

    #[test]
    fn test_merge_keeps_mate_search_work_apart() {
        let seed = SwMetrics {
            dp_problems: 2,
            dp_filled: 1,
            alignments: 1,
            ..Default::default()
        };
        let mate = SwMetrics {
            mate_searches: 1,
            mate_dp_filled: 1,
            mate_alignments: 2,
            ..Default::default()
        };
        let mut total = SwMetrics::default();
        total.merge(&seed);
        total.merge(&mate);
        assert_eq!((total.dp_problems, total.dp_filled, total.alignments), (2, 1, 1));
        assert_eq!(
            (total.mate_searches, total.mate_dp_filled, total.mate_alignments),
            (1, 1, 2)
        );
    }

    #[test]
    fn test_empty_sinks_are_fine() {
        let mut sinks = MetricsSinks::none();
        sinks.flush("r", &SwMetrics::default(), &WalkMetrics::default(), &[]);
    }
}
