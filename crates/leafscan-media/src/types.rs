//! Media payload types and the vision-provider trait.

use async_trait::async_trait;

use leafscan_types::{AnalysisResult, ImageFormat};

/// A validated image payload, alive for the duration of one analysis call.
#[derive(Debug, Clone)]
pub struct MediaPayload {
    /// Raw image bytes.
    pub bytes: Vec<u8>,
    /// Format detected from the leading byte signature. Best-effort
    /// label only; it never gates processing.
    pub format: ImageFormat,
    /// Payload size in bytes.
    pub size_bytes: usize,
}

/// Classification request sent to a vision provider.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    /// Instruction text demanding a single structured JSON reply.
    pub instruction: String,
    /// MIME type tag for the payload.
    pub mime_type: String,
    /// Image data (raw bytes).
    pub data: Vec<u8>,
}

/// Where a successful analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Built from a successfully parsed upstream reply.
    Parsed,
    /// The fixed fallback; the upstream reply was not parseable.
    Fallback,
}

/// A successful analysis plus its provenance.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub provenance: Provenance,
}

/// Trait for image classification providers.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider identifier.
    fn id(&self) -> &str;
    /// Send one instruction + image payload, return the raw text reply.
    async fn classify_image(&self, req: VisionRequest) -> anyhow::Result<String>;
}
