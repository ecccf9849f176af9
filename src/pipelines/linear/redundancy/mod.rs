//! Per-read redundancy bookkeeping.
//!
//! Two filters keep the driver from reporting the same alignment twice:
//!
//! - `SeenDiagonals` skips a seed hit before any DP work when its diagonal
//!   falls inside a window that was already searched.
//! - `RedundantAlignments` rejects an alignment after DP when it passes
//!   through a cell an earlier accepted alignment passed through.
//!
//! Both are cleared by `SwDriver::next_read`.

mod redundant_alignments;
mod seen_diagonals;

pub use redundant_alignments::{RedundancyDbs, RedundancyRole, RedundantAlignments};
pub use seen_diagonals::SeenDiagonals;
