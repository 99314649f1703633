use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ──────────────────── Analysis Types ────────────────────

/// Severity of a diagnosed plant condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    Healthy,
    Unknown,
}

impl Severity {
    /// Parse the severity label the vision model returns.
    /// Anything unrecognized maps to `Unknown`.
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "Mild" => Severity::Mild,
            "Moderate" => Severity::Moderate,
            "Severe" => Severity::Severe,
            "Healthy" => Severity::Healthy,
            _ => Severity::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "Mild",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
            Severity::Healthy => "Healthy",
            Severity::Unknown => "Unknown",
        }
    }
}

/// Result of one plant-disease analysis. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Record ID.
    #[serde(default = "new_id")]
    pub id: String,
    /// Disease name, or "Healthy".
    pub disease_name: String,
    /// Model confidence in [0, 1].
    pub confidence: f64,
    /// Severity label.
    pub severity: Severity,
    /// Observed symptoms.
    pub symptoms: Vec<String>,
    /// Recommended treatments.
    pub treatment: Vec<String>,
    /// Prevention measures.
    pub prevention: Vec<String>,
    /// When the analysis was produced.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl AnalysisResult {
    pub fn new(
        disease_name: String,
        confidence: f64,
        severity: Severity,
        symptoms: Vec<String>,
        treatment: Vec<String>,
        prevention: Vec<String>,
    ) -> Self {
        Self {
            id: new_id(),
            disease_name,
            confidence,
            severity,
            symptoms,
            treatment,
            prevention,
            timestamp: Utc::now(),
        }
    }
}

/// Image format detected from a payload's leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
        }
    }
}

// ──────────────────── API Types ────────────────────

/// Request body for POST /api/analyze.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Base64-encoded image bytes.
    pub image_base64: String,
}

/// Response envelope for the analysis endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
    #[serde(default)]
    pub message: String,
}

impl AnalyzeResponse {
    pub fn ok(analysis: AnalysisResult) -> Self {
        Self {
            success: true,
            analysis: Some(analysis),
            message: "Analysis completed successfully".into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            analysis: None,
            message: message.into(),
        }
    }
}

/// Request body for POST /api/synthesize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizeRequest {
    /// Text to convert to speech.
    pub text: String,
    /// BCP-47-ish language tag (e.g. "en", "hi").
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

/// Response body for POST /api/synthesize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizeResponse {
    /// Base64-encoded MP3 audio.
    pub audio_base64: String,
    /// Always "audio/mpeg".
    pub mime_type: String,
    /// Decoded audio size.
    pub size_bytes: usize,
    /// Whether the audio came from the synthesis cache.
    pub cached: bool,
}

// ──────────────────── Status Checks ────────────────────

/// A client heartbeat record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCheck {
    #[serde(default = "new_id")]
    pub id: String,
    pub client_name: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

/// Request body for POST /api/status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCheckCreate {
    pub client_name: String,
}

impl From<StatusCheckCreate> for StatusCheck {
    fn from(input: StatusCheckCreate) -> Self {
        Self {
            id: new_id(),
            client_name: input.client_name,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_result_serde() {
        let result = AnalysisResult::new(
            "Leaf rust".into(),
            0.92,
            Severity::Severe,
            vec!["Orange pustules on leaves".into()],
            vec!["Apply fungicide".into()],
            vec!["Avoid overhead watering".into()],
        );
        let json = serde_json::to_string(&result).unwrap();
        let parsed: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.disease_name, "Leaf rust");
        assert_eq!(parsed.confidence, 0.92);
        assert_eq!(parsed.severity, Severity::Severe);
        assert_eq!(parsed.symptoms.len(), 1);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("Moderate"), Severity::Moderate);
        assert_eq!(Severity::parse(" Healthy "), Severity::Healthy);
        assert_eq!(Severity::parse("catastrophic"), Severity::Unknown);
        assert_eq!(Severity::parse(""), Severity::Unknown);
    }

    #[test]
    fn test_image_format_mime() {
        assert_eq!(ImageFormat::Png.mime_type(), "image/png");
        assert_eq!(ImageFormat::Jpeg.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_synthesize_request_default_language() {
        let req: SynthesizeRequest = serde_json::from_str(r#"{"text":"hello"}"#).unwrap();
        assert_eq!(req.language, "en");
    }

    #[test]
    fn test_analyze_response_envelope() {
        let resp = AnalyzeResponse::failed("bad image");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("analysis"));
        let parsed: AnalyzeResponse = serde_json::from_str(&json).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.message, "bad image");
    }

    #[test]
    fn test_status_check_from_create() {
        let check: StatusCheck = StatusCheckCreate {
            client_name: "field-app".into(),
        }
        .into();
        assert_eq!(check.client_name, "field-app");
        assert!(!check.id.is_empty());
    }
}
