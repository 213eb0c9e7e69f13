//! Errors surfaced by an analysis run.

use super::error_code::{self, BasketErrorCode};
use super::ParseError;

/// Terminal failure of an analysis run. A run either returns a complete
/// result or exactly one of these; there are no partial results.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Invalid parameter {param} = {value}: must be {constraint}")]
    InvalidParameter {
        param: String,
        value: String,
        constraint: String,
    },

    #[error("Analysis cancelled during {stage}")]
    Cancelled { stage: String },

    #[error("Resource limit exceeded at level {level}: {count} > limit {limit}; raise min_support and retry")]
    ResourceExhausted {
        level: usize,
        count: usize,
        limit: usize,
    },
}

impl AnalysisError {
    pub fn invalid_parameter(
        param: &str,
        value: impl std::fmt::Display,
        constraint: &str,
    ) -> Self {
        Self::InvalidParameter {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }

    pub fn cancelled(stage: impl Into<String>) -> Self {
        Self::Cancelled {
            stage: stage.into(),
        }
    }

    /// Whether retrying can succeed. Cancellation is transient; resource
    /// exhaustion succeeds once the caller raises min support. Everything else
    /// needs different input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Cancelled { .. } | Self::ResourceExhausted { .. })
    }
}

impl BasketErrorCode for AnalysisError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(e) => e.error_code(),
            Self::InvalidParameter { .. } => error_code::INVALID_PARAMETER,
            Self::Cancelled { .. } => error_code::CANCELLED,
            Self::ResourceExhausted { .. } => error_code::RESOURCE_EXHAUSTED,
        }
    }
}
