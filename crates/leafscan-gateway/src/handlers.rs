//! API endpoint handlers.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::warn;

use leafscan_media::{classify_upstream_failure, AnalysisError, ErrorCategory};
use leafscan_types::{
    AnalyzeRequest, AnalyzeResponse, StatusCheck, StatusCheckCreate, SynthesizeRequest,
    SynthesizeResponse,
};

use crate::AppState;

/// GET /api/ — service banner.
pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Plant Disease Detection API" }))
}

/// GET /health — simple HTTP health check.
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Map an error category to an HTTP status.
pub fn error_status(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorCategory::UpstreamRateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorCategory::ConfigurationMissing => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCategory::UpstreamFailure => StatusCode::BAD_GATEWAY,
    }
}

fn analysis_failure(err: AnalysisError) -> (StatusCode, Json<AnalyzeResponse>) {
    (
        error_status(err.category()),
        Json(AnalyzeResponse::failed(format!("Analysis failed: {err}"))),
    )
}

/// POST /api/analyze — analyze a base64-encoded image.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> (StatusCode, Json<AnalyzeResponse>) {
    match state.pipeline.analyze_base64(&req.image_base64).await {
        Ok(outcome) => {
            persist_analysis(&state, &outcome.result).await;
            (StatusCode::OK, Json(AnalyzeResponse::ok(outcome.result)))
        }
        Err(err) => analysis_failure(err),
    }
}

/// POST /api/analyze-upload — analyze a multipart file upload.
pub async fn analyze_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> (StatusCode, Json<AnalyzeResponse>) {
    let mut image: Option<Vec<u8>> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("file") {
                    continue;
                }
                let is_image = field
                    .content_type()
                    .map(|ct| ct.starts_with("image/"))
                    .unwrap_or(false);
                if !is_image {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(AnalyzeResponse::failed("File must be an image")),
                    );
                }
                match field.bytes().await {
                    Ok(bytes) => image = Some(bytes.to_vec()),
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(AnalyzeResponse::failed(format!("Upload read error: {e}"))),
                        )
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(AnalyzeResponse::failed(format!("Malformed upload: {e}"))),
                )
            }
        }
    }

    let Some(bytes) = image else {
        return (
            StatusCode::BAD_REQUEST,
            Json(AnalyzeResponse::failed("Missing 'file' field")),
        );
    };

    match state.pipeline.analyze(bytes).await {
        Ok(outcome) => {
            persist_analysis(&state, &outcome.result).await;
            (StatusCode::OK, Json(AnalyzeResponse::ok(outcome.result)))
        }
        Err(err) => analysis_failure(err),
    }
}

/// GET /api/analyses — the 100 most recent stored analyses.
pub async fn list_analyses(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let Some(storage) = &state.storage else {
        return database_unavailable();
    };
    match storage.recent_analyses(100).await {
        Ok(analyses) => (StatusCode::OK, Json(json!(analyses))).into_response(),
        Err(e) => {
            warn!("Failed to list analyses: {e}");
            database_error()
        }
    }
}

/// POST /api/synthesize — text-to-speech with caching.
pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SynthesizeRequest>,
) -> impl IntoResponse {
    if req.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "text must not be empty" })),
        )
            .into_response();
    }

    match state.speech.synthesize(&req.text, &req.language).await {
        Ok(output) => {
            let audio_base64 =
                base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &output.audio);
            Json(SynthesizeResponse {
                size_bytes: output.audio.len(),
                audio_base64,
                mime_type: "audio/mpeg".into(),
                cached: output.cached,
            })
            .into_response()
        }
        Err(e) => {
            let err = classify_upstream_failure(&format!("{e:#}"));
            (
                error_status(err.category()),
                Json(json!({ "error": err.to_string() })),
            )
                .into_response()
        }
    }
}

/// POST /api/status — record a client status check.
pub async fn create_status_check(
    State(state): State<Arc<AppState>>,
    Json(input): Json<StatusCheckCreate>,
) -> impl IntoResponse {
    let Some(storage) = &state.storage else {
        return database_unavailable();
    };
    let check: StatusCheck = input.into();
    match storage.save_status_check(&check).await {
        Ok(()) => (StatusCode::OK, Json(json!(check))).into_response(),
        Err(e) => {
            warn!("Failed to save status check: {e}");
            database_error()
        }
    }
}

/// GET /api/status — list recorded status checks.
pub async fn list_status_checks(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let Some(storage) = &state.storage else {
        return database_unavailable();
    };
    match storage.list_status_checks(1000).await {
        Ok(checks) => (StatusCode::OK, Json(json!(checks))).into_response(),
        Err(e) => {
            warn!("Failed to list status checks: {e}");
            database_error()
        }
    }
}

/// Persist a successful analysis, best-effort. A storage failure is
/// logged and never propagated to the caller.
async fn persist_analysis(state: &AppState, result: &leafscan_types::AnalysisResult) {
    if let Some(storage) = &state.storage {
        if let Err(e) = storage.save_analysis(result).await {
            warn!("Failed to store analysis: {e}");
        }
    }
}

fn database_unavailable() -> axum::response::Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "error": "Database unavailable" })),
    )
        .into_response()
}

fn database_error() -> axum::response::Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "error": "Database error" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            error_status(ErrorCategory::InvalidInput),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(ErrorCategory::UpstreamRateLimited),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            error_status(ErrorCategory::ConfigurationMissing),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            error_status(ErrorCategory::UpstreamFailure),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_analysis_failure_envelope() {
        let (status, Json(body)) =
            analysis_failure(AnalysisError::InvalidInput("image payload is empty".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
        assert!(body.message.contains("image payload is empty"));
    }
}
