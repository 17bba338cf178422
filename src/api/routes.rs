//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::llm::{LlmClient, OpenRouterClient};
use crate::solver::SolveEngine;

use super::types::{ErrorResponse, HealthResponse, QuizRequest};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Reasoning client shared across solve sessions
    pub llm: Arc<dyn LlmClient>,
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let llm: Arc<dyn LlmClient> = Arc::new(OpenRouterClient::new(config.api_key.clone()));
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState { config, llm });

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/quiz", post(handle_quiz))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "running",
        message: "LLM quiz solver API",
        email: state.config.email.clone(),
    })
}

/// Handle quiz requests: validate the shared secret and email, then run one
/// solve session for the given task URL. Solve sessions for concurrent
/// requests are fully independent.
async fn handle_quiz(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuizRequest>,
) -> Response {
    if req.secret.as_deref() != Some(state.config.secret.as_str()) {
        tracing::warn!(
            "Invalid secret attempt from {}",
            req.email.as_deref().unwrap_or("<no email>")
        );
        return (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::new("Invalid secret")),
        )
            .into_response();
    }

    if req.email.as_deref() != Some(state.config.email.as_str()) {
        tracing::warn!(
            "Email mismatch: got {}, expected {}",
            req.email.as_deref().unwrap_or("<no email>"),
            state.config.email
        );
        return (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::new("Email mismatch")),
        )
            .into_response();
    }

    let Some(url) = req.url else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Missing quiz URL")),
        )
            .into_response();
    };

    tracing::info!("Received quiz request for URL: {}", url);

    let mut engine = match SolveEngine::from_config(&state.config, Arc::clone(&state.llm)) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!("Failed to build solve engine: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to initialize solver")),
            )
                .into_response();
        }
    };

    match engine.solve(&url).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            tracing::error!("Solve session failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_kind(e.to_string(), e.kind())),
            )
                .into_response()
        }
    }
}
