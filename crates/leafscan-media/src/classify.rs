//! Upstream failure classification.
//!
//! There is no structured error contract with the vision or synthesis
//! services, so classification is best-effort matching on the failure's
//! textual content, isolated here so a structured upstream can replace
//! it without touching callers.

use crate::error::AnalysisError;

/// Marker used by providers when the required credential is absent.
pub const MISSING_KEY_MARKER: &str = "API key not configured";

/// Classify an upstream failure message into an [`AnalysisError`].
pub fn classify_upstream_failure(message: &str) -> AnalysisError {
    let lowered = message.to_lowercase();

    if lowered.contains(&MISSING_KEY_MARKER.to_lowercase()) {
        return AnalysisError::ConfigurationMissing(message.to_string());
    }
    if message.contains("429")
        || lowered.contains("resource exhausted")
        || lowered.contains("resource_exhausted")
        || lowered.contains("quota")
    {
        return AnalysisError::UpstreamRateLimited(message.to_string());
    }
    AnalysisError::Upstream(message.to_string())
}
