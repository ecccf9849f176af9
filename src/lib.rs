//! Seed extension, backtracking and redundancy control for short-read
//! alignment.
//!
//! The crate sits between a reference index and a DP engine: it decides
//! which seed hits are worth extending, frames a DP window around each,
//! pulls alternative backtraces out of the filled matrix and rejects
//! alignments that overlap ones already accepted for the read.

pub mod core; // Pipeline-agnostic building blocks
pub mod defaults;
pub mod error;
pub mod pipelines; // Seed-extension pipeline

pub use error::{Error, Result};
pub use pipelines::linear::driver::{ExtendOutcome, ExtendStatus, SwDriver};
pub use pipelines::linear::sw_opt::SwDriverOpt;
