//! Interpretation of the vision model's raw text reply.
//!
//! The reply is expected to be a single JSON object with six fields, but
//! the upstream contract is soft: replies arrive wrapped in code fences,
//! with fields missing, or as plain prose. Anything that cannot be
//! parsed degrades to a fixed fallback result instead of failing, so a
//! malformed upstream reply never surfaces as a hard error to the end
//! user. The outcome carries a provenance flag so fallback rates stay
//! observable.

use serde_json::Value;

use leafscan_types::{AnalysisResult, Severity};

use crate::types::{AnalysisOutcome, Provenance};

/// Interpret a raw reply into an analysis outcome. Never fails.
pub fn interpret_reply(reply: &str) -> AnalysisOutcome {
    let cleaned = strip_code_fences(reply);

    match parse_structured(cleaned) {
        Some(result) => AnalysisOutcome {
            result,
            provenance: Provenance::Parsed,
        },
        None => AnalysisOutcome {
            result: fallback_result(),
            provenance: Provenance::Fallback,
        },
    }
}

/// The fixed result returned when the upstream reply is not parseable.
pub fn fallback_result() -> AnalysisResult {
    AnalysisResult::new(
        "Analysis completed".into(),
        0.8,
        Severity::Moderate,
        vec!["AI analysis completed - check detailed response".into()],
        vec![
            "Consult with agricultural specialist".into(),
            "Monitor plant condition".into(),
        ],
        vec![
            "Regular plant inspection".into(),
            "Proper watering and care".into(),
        ],
    )
}

/// Strip a surrounding fenced code block, with or without a language tag.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Optional language tag sits between the fence and the body.
    let body = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim()
}

/// Parse the six-field structured reply. Missing fields default to safe
/// values; a present-but-non-numeric confidence is a parse failure.
fn parse_structured(text: &str) -> Option<AnalysisResult> {
    let parsed: Value = serde_json::from_str(text).ok()?;
    let obj = parsed.as_object()?;

    let confidence = match obj.get("confidence") {
        None | Some(Value::Null) => 0.0,
        Some(value) => coerce_confidence(value)?,
    };

    let disease_name = obj
        .get("disease_name")
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown")
        .to_string();

    let severity = obj
        .get("severity")
        .and_then(|v| v.as_str())
        .map(Severity::parse)
        .unwrap_or(Severity::Unknown);

    Some(AnalysisResult::new(
        disease_name,
        confidence,
        severity,
        string_list(obj.get("symptoms")),
        string_list(obj.get("treatment")),
        string_list(obj.get("prevention")),
    ))
}

/// Coerce a confidence value to f64. Accepts numbers and numeric
/// strings; anything else is a parse failure.
fn coerce_confidence(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_REPLY: &str = r#"{
        "disease_name": "Powdery mildew",
        "confidence": 0.73,
        "severity": "Mild",
        "symptoms": ["White powdery spots"],
        "treatment": ["Apply sulfur spray"],
        "prevention": ["Improve air circulation"]
    }"#;

    #[test]
    fn test_round_trip_all_fields() {
        let outcome = interpret_reply(FULL_REPLY);
        assert_eq!(outcome.provenance, Provenance::Parsed);
        let result = outcome.result;
        assert_eq!(result.disease_name, "Powdery mildew");
        assert_eq!(result.confidence, 0.73);
        assert_eq!(result.severity, Severity::Mild);
        assert_eq!(result.symptoms, vec!["White powdery spots"]);
        assert_eq!(result.treatment, vec!["Apply sulfur spray"]);
        assert_eq!(result.prevention, vec!["Improve air circulation"]);
    }

    #[test]
    fn test_fenced_with_language_tag_parses_identically() {
        let fenced = format!("```json\n{FULL_REPLY}\n```");
        let outcome = interpret_reply(&fenced);
        assert_eq!(outcome.provenance, Provenance::Parsed);
        assert_eq!(outcome.result.disease_name, "Powdery mildew");
        assert_eq!(outcome.result.confidence, 0.73);
    }

    #[test]
    fn test_fenced_without_language_tag() {
        let fenced = format!("```\n{FULL_REPLY}\n```");
        let outcome = interpret_reply(&fenced);
        assert_eq!(outcome.provenance, Provenance::Parsed);
        assert_eq!(outcome.result.severity, Severity::Mild);
    }

    #[test]
    fn test_missing_fields_default() {
        let outcome = interpret_reply(r#"{"disease_name": "Leaf spot"}"#);
        assert_eq!(outcome.provenance, Provenance::Parsed);
        let result = outcome.result;
        assert_eq!(result.disease_name, "Leaf spot");
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.severity, Severity::Unknown);
        assert!(result.symptoms.is_empty());
        assert!(result.treatment.is_empty());
        assert!(result.prevention.is_empty());
    }

    #[test]
    fn test_prose_reply_falls_back() {
        let outcome = interpret_reply("The plant looks sick, probably a fungus.");
        assert_eq!(outcome.provenance, Provenance::Fallback);
        let result = outcome.result;
        assert_eq!(result.disease_name, "Analysis completed");
        assert_eq!(result.confidence, 0.8);
        assert_eq!(result.severity, Severity::Moderate);
        assert!(!result.symptoms.is_empty());
    }

    #[test]
    fn test_truncated_json_falls_back() {
        let outcome = interpret_reply(r#"{"disease_name": "Rust", "confidence": 0."#);
        assert_eq!(outcome.provenance, Provenance::Fallback);
        assert_eq!(outcome.result.disease_name, "Analysis completed");
    }

    #[test]
    fn test_non_numeric_confidence_falls_back() {
        let outcome = interpret_reply(r#"{"disease_name": "Rust", "confidence": ["high"]}"#);
        assert_eq!(outcome.provenance, Provenance::Fallback);
        assert_eq!(outcome.result.confidence, 0.8);
    }

    #[test]
    fn test_numeric_string_confidence_accepted() {
        let outcome = interpret_reply(r#"{"confidence": "0.55"}"#);
        assert_eq!(outcome.provenance, Provenance::Parsed);
        assert_eq!(outcome.result.confidence, 0.55);
        assert_eq!(outcome.result.disease_name, "Unknown");
    }

    #[test]
    fn test_non_object_json_falls_back() {
        let outcome = interpret_reply(r#"["just", "a", "list"]"#);
        assert_eq!(outcome.provenance, Provenance::Fallback);
    }

    #[test]
    fn test_single_line_fence() {
        let outcome = interpret_reply(r#"```json{"confidence": 0.4}```"#);
        assert_eq!(outcome.provenance, Provenance::Parsed);
        assert_eq!(outcome.result.confidence, 0.4);
    }
}
