//! Analysis request construction.
//!
//! The instruction text is a fixed contract with the interpreter: it
//! demands exactly one JSON object with the six expected fields and no
//! surrounding commentary. Changes here must stay compatible with the
//! parsing in [`crate::interpret`].

use crate::types::{MediaPayload, VisionRequest};

/// Instruction sent with every classification request.
pub const ANALYSIS_INSTRUCTION: &str = r#"You are an expert plant pathologist. Analyze this plant image for diseases and provide a detailed analysis.
Format your response as JSON with:
{
    "disease_name": "Disease name or Healthy",
    "confidence": 0.0-1.0,
    "severity": "Mild/Moderate/Severe/Healthy",
    "symptoms": ["symptom1", "symptom2"],
    "treatment": ["treatment1", "treatment2"],
    "prevention": ["prevention1", "prevention2"]
}
Respond with ONLY the JSON, no other text."#;

/// Assemble the request sent to the vision provider from a validated payload.
pub fn build_request(payload: &MediaPayload) -> VisionRequest {
    VisionRequest {
        instruction: ANALYSIS_INSTRUCTION.to_string(),
        mime_type: payload.format.mime_type().to_string(),
        data: payload.bytes.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leafscan_types::ImageFormat;

    #[test]
    fn test_instruction_names_all_six_fields() {
        for field in [
            "disease_name",
            "confidence",
            "severity",
            "symptoms",
            "treatment",
            "prevention",
        ] {
            assert!(
                ANALYSIS_INSTRUCTION.contains(field),
                "instruction missing field {field}"
            );
        }
        assert!(ANALYSIS_INSTRUCTION.contains("ONLY the JSON"));
    }

    #[test]
    fn test_request_tagged_with_detected_format() {
        let payload = MediaPayload {
            bytes: vec![0x89, 0x50, 0x4E, 0x47],
            format: ImageFormat::Png,
            size_bytes: 4,
        };
        let req = build_request(&payload);
        assert_eq!(req.mime_type, "image/png");
        assert_eq!(req.data, payload.bytes);
    }
}
