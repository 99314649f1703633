//! leafscan-media: plant-image analysis — format sniffing, payload
//! validation, prompt construction, vision-provider calls, structured
//! response interpretation with fallback, and error classification.

pub mod classify;
pub mod error;
pub mod format;
pub mod gemini;
pub mod interpret;
pub mod pipeline;
pub mod prompt;
pub mod types;
pub mod validate;

pub use classify::classify_upstream_failure;
pub use error::{AnalysisError, ErrorCategory};
pub use format::sniff_format;
pub use gemini::GeminiVisionProvider;
pub use pipeline::AnalysisPipeline;
pub use types::{AnalysisOutcome, MediaPayload, Provenance, VisionProvider, VisionRequest};
