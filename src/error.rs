//! Error types for time construction and decorator wiring

use thiserror::Error;

/// Errors raised when building a [`Time`](crate::context::Time) from explicit fields
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// Sample rate must be at least 1 Hz
    #[error("invalid sample rate: {0}Hz")]
    InvalidSampleRate(u32),

    /// Sample number falls outside `1..=sample_rate`
    #[error("invalid sample {sample} for sample rate {sample_rate}Hz")]
    InvalidSample { sample: u32, sample_rate: u32 },
}

/// Errors raised when decorators are registered in an order that cannot be satisfied
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WiringError {
    /// A decorator reads a context key that no earlier decorator writes
    #[error("decorator `{decorator}` requires `{key}`, which no earlier decorator provides")]
    MissingDependency {
        decorator: &'static str,
        key: &'static str,
    },
}
