//! claimscope-api - HTTP API server for claimscope.

mod error;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use claimscope_analysis::ChatAnalysisBackend;
use claimscope_core::defaults;
use claimscope_patents::GooglePatentsClient;
use claimscope_pipeline::{
    AssessmentRunner, InMemoryAssessmentStore, InMemoryDocumentStore, RunnerConfig,
};

use crate::state::AppState;

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful for
/// log correlation when tracing a request through the pipeline.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Build the application router.
fn app(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            cors_origin
                .parse::<HeaderValue>()
                .map(AllowOrigin::exact)
                .unwrap_or_else(|_| AllowOrigin::any()),
        )
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/upload", post(handlers::upload_document))
        .route("/api/assess", post(handlers::create_assessment))
        .route(
            "/api/assess-with-prior-art",
            post(handlers::create_assessment_with_prior_art),
        )
        .route("/api/assess/:id", get(handlers::get_assessment))
        .route("/api/prior-art/search", post(handlers::search_prior_art))
        .layer(DefaultBodyLimit::max(defaults::MAX_BODY_SIZE_BYTES))
        .layer(RequestBodyLimitLayer::new(defaults::MAX_BODY_SIZE_BYTES))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   RUST_LOG    - standard env filter (default: "claimscope_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "claimscope_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // Get configuration from environment
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(defaults::SERVER_PORT);
    let cors_origin = std::env::var("CLAIMSCOPE_CORS_ORIGIN")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());

    // External service backends
    let analysis = Arc::new(ChatAnalysisBackend::from_env());
    let prior_art = Arc::new(GooglePatentsClient::from_env());

    // Session-scoped in-memory stores (persistence is out of scope)
    let documents = Arc::new(InMemoryDocumentStore::new());
    let assessments = Arc::new(InMemoryAssessmentStore::new());

    let runner = Arc::new(AssessmentRunner::new(
        analysis,
        prior_art.clone(),
        documents.clone(),
        assessments.clone(),
        RunnerConfig::from_env(),
    ));

    let state = AppState {
        documents,
        assessments,
        runner,
        prior_art,
    };

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!(%addr, "Starting claimscope API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state, &cors_origin)).await?;

    Ok(())
}
