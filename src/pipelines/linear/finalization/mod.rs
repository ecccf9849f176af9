//! Reporting and metrics.
//!
//! - `sink` - `AlignmentSink` and the `TopKSink` policy
//! - `metrics` - Search counters, per-problem actions and their receivers

mod metrics;
mod sink;

pub use metrics::{
    ActionLog, MetricsSinks, SwAction, SwActionKind, SwActionSink, SwCounterSink, SwMetrics,
    WalkMetrics,
};
pub use sink::{AlignmentSink, ReportedHit, TopKSink};
