//! Alignment building blocks that do not depend on the reference layout:
//! scores, candidates, and the resumable backtrace machinery.

pub mod backtrace;
pub mod backtracer;
pub mod candidate;
pub mod score;
pub mod scoring;
pub mod types;

pub use backtrace::{BacktraceStack, BtCursor, BtFrame, GapCounts, TraceArena, TraceMask, TraceMove};
pub use backtracer::{NucBacktracer, Trace, TraceMatrix};
pub use candidate::{BtCandidate, BtCandidateSet, BtFate};
pub use score::AlnScore;
pub use scoring::Scoring;
pub use types::{DpCell, DpTable, Edit, EditKind, Mate, Read, RefCoord};
