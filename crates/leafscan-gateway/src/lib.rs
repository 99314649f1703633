//! leafscan-gateway: HTTP API server.
//!
//! Provides:
//! - POST /api/analyze — base64 JSON image analysis
//! - POST /api/analyze-upload — multipart image analysis
//! - GET  /api/analyses — recent stored analyses
//! - POST /api/synthesize — cached text-to-speech
//! - POST/GET /api/status — client status checks
//! - GET  /health — health check

pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

use leafscan_config::LeafscanConfig;
use leafscan_media::{AnalysisPipeline, GeminiVisionProvider};
use leafscan_speech::{GoogleTranslateTts, SpeechService};
use leafscan_storage::LeafscanStorage;

/// Shared gateway state, owned for the process lifetime and injected
/// into handlers. The synthesis cache lives inside [`SpeechService`];
/// nothing here is a hidden global.
pub struct AppState {
    pub pipeline: AnalysisPipeline,
    pub speech: SpeechService,
    pub storage: Option<Arc<LeafscanStorage>>,
}

/// Start the gateway server.
///
/// This is the main entry point: it wires providers, storage, and the
/// axum router, binds to the configured address, and serves requests.
pub async fn start_gateway(
    config: LeafscanConfig,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let port = port_override.unwrap_or(config.server.port);
    let host = config.server.host.clone();

    // Persistence is best-effort: run without it rather than refuse to start.
    let storage = open_storage(&config);

    let provider = Arc::new(GeminiVisionProvider::new(
        config.vision.resolve_api_key(),
        config.vision.model.clone(),
    ));
    let pipeline = AnalysisPipeline::new(provider);

    let speech = SpeechService::new(
        Arc::new(GoogleTranslateTts::new()),
        config.speech.cache_capacity,
    );

    let state = Arc::new(AppState {
        pipeline,
        speech,
        storage,
    });

    let app = build_router(state, cors_layer(&config.server.cors_origins));

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!("Gateway listening on {addr}");
    info!("  Analyze:    http://{addr}/api/analyze");
    info!("  Synthesize: http://{addr}/api/synthesize");
    info!("  Health:     http://{addr}/health");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the API router.
pub fn build_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/", get(handlers::root))
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/analyze-upload", post(handlers::analyze_upload))
        .route("/api/analyses", get(handlers::list_analyses))
        .route("/api/synthesize", post(handlers::synthesize))
        .route(
            "/api/status",
            post(handlers::create_status_check).get(handlers::list_status_checks),
        )
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

/// Build the CORS layer from the configured origins; "*" allows any.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse::<HeaderValue>().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(parsed))
    }
}

fn open_storage(config: &LeafscanConfig) -> Option<Arc<LeafscanStorage>> {
    let db_path = match &config.db_path {
        Some(path) => path.clone(),
        None => match leafscan_config::ensure_config_dir() {
            Ok(dir) => dir.join("leafscan.db"),
            Err(e) => {
                tracing::warn!("Failed to resolve config dir, running without persistence: {e}");
                return None;
            }
        },
    };
    match LeafscanStorage::open(&db_path) {
        Ok(s) => {
            info!("Storage initialized: {}", db_path.display());
            Some(Arc::new(s))
        }
        Err(e) => {
            tracing::warn!("Failed to open storage, running without persistence: {e}");
            None
        }
    }
}
