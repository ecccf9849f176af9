//! Alignment pipelines for different reference structures.
//!
//! - `linear`: seed-extend alignment against linear reference sequences

pub mod linear;
