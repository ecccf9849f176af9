//! Crate-wide error type.
//!
//! Every variant is a precondition violation: the caller (usually the driver)
//! asked a component to do something its contract forbids. Search exhaustion
//! and redundancy rejection are not errors and never show up here.

/// Crate-wide error type.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("row sampler needs a non-empty range, got [{lo}, {hi})")]
    EmptySamplerRange { lo: usize, hi: usize },
    #[error("row sampler has no non-eliminated ranges left")]
    SamplerExhausted,
    #[error("row sampler index {index} out of range (have {len} ranges)")]
    SamplerIndex { index: usize, len: usize },
    #[error("backtrace frame at ({row}, {col}) has no remaining choices")]
    ExhaustedFrame { row: usize, col: usize },
    #[error("alignment score is not valid: {0}")]
    InvalidScore(&'static str),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
