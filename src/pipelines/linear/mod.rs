//! Linear-reference seed-extension pipeline.
//!
//! Turns seed hits against a reference index into reported alignments:
//! prioritize and sample the hits, frame a DP window around each one, pull
//! alternative backtraces out of the filled matrix, and drop anything that
//! overlaps an alignment already accepted for the read.
//!
//! # Module Organization
//!
//! - `seeding/` - Seed-hit records, prioritization and the row sampler
//! - `redundancy/` - Seen-diagonal sets and the redundant-cell databases
//! - `extension/` - DP windows, alignment results and collaborator traits
//! - `paired/` - Mate-window and concordance policy
//! - `finalization/` - Reporting sinks and metrics
//! - `driver/` - `SwDriver`, the per-read orchestrator
//! - `batch` - Parallel per-read helpers

pub mod batch; // Rayon batch helpers
pub mod driver; // Per-read orchestration
pub mod extension; // DP framing and collaborators
pub mod finalization; // Reporting and metrics
pub mod paired; // Paired-end policy
pub mod redundancy; // Redundancy bookkeeping
pub mod seeding; // Seed hits and sampling
pub mod sw_opt; // Driver options
