//! Analysis pipeline: validate → sniff → build request → upstream call
//! → interpret.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::classify::classify_upstream_failure;
use crate::error::AnalysisError;
use crate::types::{AnalysisOutcome, MediaPayload, Provenance, VisionProvider};
use crate::{format, interpret, prompt, validate};

/// Orchestrates one classification call end to end.
///
/// Stages run strictly in sequence. An upstream failure maps to a typed
/// [`AnalysisError`]; an unparseable upstream reply does NOT fail — it
/// succeeds with the fixed fallback result. No retries happen here;
/// retry policy belongs to the caller.
pub struct AnalysisPipeline {
    provider: Arc<dyn VisionProvider>,
}

impl AnalysisPipeline {
    pub fn new(provider: Arc<dyn VisionProvider>) -> Self {
        Self { provider }
    }

    /// Analyze raw image bytes.
    pub async fn analyze(&self, bytes: Vec<u8>) -> Result<AnalysisOutcome, AnalysisError> {
        validate::validate_payload(&bytes)?;

        let format = format::sniff_format(&bytes);
        let payload = MediaPayload {
            size_bytes: bytes.len(),
            format,
            bytes,
        };
        debug!(
            provider = self.provider.id(),
            image_format = ?payload.format,
            size_bytes = payload.size_bytes,
            "dispatching analysis request"
        );

        let request = prompt::build_request(&payload);
        let reply = self
            .provider
            .classify_image(request)
            .await
            .map_err(|e| classify_upstream_failure(&format!("{e:#}")))?;

        let outcome = interpret::interpret_reply(&reply);
        if outcome.provenance == Provenance::Fallback {
            warn!(
                provider = self.provider.id(),
                reply_len = reply.len(),
                "upstream reply was not parseable, returning fallback analysis"
            );
        }
        Ok(outcome)
    }

    /// Analyze a base64-encoded image, as submitted by the JSON endpoint.
    pub async fn analyze_base64(&self, encoded: &str) -> Result<AnalysisOutcome, AnalysisError> {
        let bytes = validate::decode_base64_image(encoded)?;
        self.analyze(bytes).await
    }
}
