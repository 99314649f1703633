//! Analysis error taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure categories surfaced to callers of the analysis and synthesis
/// entry points. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Bad, undersized, or undecodable payload. Caller's fault.
    InvalidInput,
    /// Upstream signalled resource exhaustion; retry later.
    UpstreamRateLimited,
    /// Required credential or setting is absent. Operator's fault.
    ConfigurationMissing,
    /// Any other external failure.
    UpstreamFailure,
}

/// A failed pipeline invocation: category plus a human-readable message.
#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("upstream rate limited: {0}")]
    UpstreamRateLimited(String),
    #[error("configuration missing: {0}")]
    ConfigurationMissing(String),
    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl AnalysisError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnalysisError::InvalidInput(_) => ErrorCategory::InvalidInput,
            AnalysisError::UpstreamRateLimited(_) => ErrorCategory::UpstreamRateLimited,
            AnalysisError::ConfigurationMissing(_) => ErrorCategory::ConfigurationMissing,
            AnalysisError::Upstream(_) => ErrorCategory::UpstreamFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_mapping() {
        assert_eq!(
            AnalysisError::InvalidInput("empty".into()).category(),
            ErrorCategory::InvalidInput
        );
        assert_eq!(
            AnalysisError::Upstream("boom".into()).category(),
            ErrorCategory::UpstreamFailure
        );
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&ErrorCategory::UpstreamRateLimited).unwrap();
        assert_eq!(json, "\"upstream_rate_limited\"");
    }
}
