//! Core reusable components for alignment operations.
//!
//! This module contains components that are agnostic to the reference structure
//! and can be reused across different alignment pipelines.

pub mod alignment;
pub mod utils;
