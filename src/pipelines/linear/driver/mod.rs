//! Per-read seed-extension driver.
//!
//! `SwDriver` owns all the per-read state of the search: the seen-diagonal
//! sets, the three redundant-alignment databases, the working minimum score
//! and the metrics for the call in progress. One instance serves one read
//! (or read pair) at a time; `next_read` resets it.
//!
//! # Search modes
//!
//! - `extend_seeds` - unpaired seed extension
//! - `extend_seeds_paired` - anchor-mate seed extension plus a windowed DP
//!   search for the opposite mate
//! - `sw` - DP against every reference sequence, no seeds
//!
//! Every mode stops as soon as the sink reports it is satisfied and returns
//! `ExtendStatus::PolicyFulfilled`.

mod paired;
mod sw_driver;
mod unpaired;

pub use sw_driver::{ExtendOutcome, ExtendStatus, ResolvedHit, SwDriver};
