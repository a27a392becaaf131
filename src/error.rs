//! Error types for the routing engine
//!
//! Most failure modes in this crate are absorbed locally and only influence
//! which bucket a record lands in. The variants here cover the few conditions
//! that are surfaced to callers or attached to records as annotations.

use thiserror::Error;

/// Main error type for routing operations
#[derive(Debug, Error)]
pub enum RouterError {
    /// No model capability was supplied to the router
    #[error("No model capability connected")]
    ModelUnavailable,

    /// Every known model calling convention failed or raised
    #[error("Model invocation failed: {message}")]
    ModelInvocation { message: String },

    /// A record's payload cannot carry the requested mutation
    #[error("Invalid record: {message}")]
    InvalidRecord { message: String },

    /// Processing of a single record failed; only surfaced under fail-fast policy
    #[error("Record {index} failed: {message}")]
    RecordFailed { index: usize, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),
}

impl RouterError {
    /// Create a model invocation error
    pub fn model_invocation<S: Into<String>>(message: S) -> Self {
        Self::ModelInvocation {
            message: message.into(),
        }
    }

    /// Create an invalid record error
    pub fn invalid_record<S: Into<String>>(message: S) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }

    /// Create a per-record failure tagged with the record's input position
    pub fn record_failed<S: Into<String>>(index: usize, message: S) -> Self {
        Self::RecordFailed {
            index,
            message: message.into(),
        }
    }
}

/// Result type for routing operations
pub type RouterResult<T> = Result<T, RouterError>;
