//! Payload validation gates, run before any upstream call.

use base64::Engine;

use crate::error::AnalysisError;

/// Minimum viable image size. Anything smaller indicates a capture
/// failure upstream, not a legitimately tiny image.
pub const MIN_IMAGE_BYTES: usize = 100;

/// Validate raw image bytes: non-empty and at least [`MIN_IMAGE_BYTES`].
pub fn validate_payload(bytes: &[u8]) -> Result<(), AnalysisError> {
    if bytes.is_empty() {
        return Err(AnalysisError::InvalidInput("image payload is empty".into()));
    }
    if bytes.len() < MIN_IMAGE_BYTES {
        return Err(AnalysisError::InvalidInput(format!(
            "image payload too small: {} bytes (minimum {MIN_IMAGE_BYTES})",
            bytes.len()
        )));
    }
    Ok(())
}

/// Decode a base64-encoded image, rejecting malformed input.
pub fn decode_base64_image(encoded: &str) -> Result<Vec<u8>, AnalysisError> {
    let trimmed = encoded.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::InvalidInput("image payload is empty".into()));
    }
    base64::engine::general_purpose::STANDARD
        .decode(trimmed)
        .map_err(|e| AnalysisError::InvalidInput(format!("malformed base64 image: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn test_empty_payload_rejected() {
        let err = validate_payload(&[]).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::InvalidInput);
    }

    #[test]
    fn test_undersized_payload_rejected() {
        let err = validate_payload(&[0u8; 99]).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::InvalidInput);
    }

    #[test]
    fn test_minimum_size_accepted() {
        assert!(validate_payload(&[0u8; 100]).is_ok());
        assert!(validate_payload(&[0u8; 4096]).is_ok());
    }

    #[test]
    fn test_malformed_base64_rejected() {
        let err = decode_base64_image("not*valid*base64!").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::InvalidInput);
    }

    #[test]
    fn test_valid_base64_decodes() {
        let decoded = decode_base64_image("aGVsbG8=").unwrap();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn test_blank_base64_rejected() {
        assert!(decode_base64_image("   ").is_err());
    }
}
