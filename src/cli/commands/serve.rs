//! HTTP API server exposing the tutoring router.
//!
//! Validates request shape (empty and over-length queries are rejected
//! here, before the core is invoked) and logs one line per request.

use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::router::Router;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared application state.
///
/// One process-wide router serves all requests. The mutex serializes
/// transcript reset-and-use: two concurrent queries racing on the same
/// responder transcripts would corrupt each other's context.
struct AppState {
    router: Mutex<Router>,
    max_query_chars: usize,
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    if let Err(e) = preflight::check_api_key() {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let router = Router::from_settings(&settings)?;

    let state = Arc::new(AppState {
        router: Mutex::new(router),
        max_query_chars: settings.server.max_query_chars,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = AxumRouter::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ask", post(ask))
        .layer(middleware::from_fn(log_request))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Laere API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Info", "GET  /");
    Output::kv("Health", "GET  /health");
    Output::kv("Ask", "POST /ask");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AskRequest {
    query: String,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Handlers ===

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Welcome to the Laere tutoring API!",
        "ask_endpoint": "/ask (POST)",
    }))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> impl IntoResponse {
    if req.query.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Query cannot be empty.".to_string(),
            }),
        )
            .into_response();
    }

    if req.query.chars().count() > state.max_query_chars {
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(ErrorResponse {
                error: format!(
                    "Query is too long (max {} characters).",
                    state.max_query_chars
                ),
            }),
        )
            .into_response();
    }

    let answer = state.router.lock().await.route(&req.query).await;

    Json(AskResponse { answer }).into_response()
}

/// Log one line per request: method, path, duration, status.
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} - completed in {:.4?} - status: {}",
        method,
        path,
        start.elapsed(),
        response.status()
    );

    response
}
