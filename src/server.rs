//! HTTP surface: routes, handlers and the serve loop.

use crate::app::App;
use crate::models::{ChatRequest, ChatResponse, ErrorResponse, ImageRequest};
use crate::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const PROMPT_REQUIRED: &str = "Prompt is required";
const CHAT_UNAVAILABLE: &str = "Could not connect to local Ollama.";

/// Build the application router.
pub fn router(app: Arc<App>) -> Router {
    Router::new()
        .route("/api/generate-image", post(generate_image))
        .route("/api/chat", post(chat))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

/// Serve the router on `listener` until ctrl-c.
pub async fn serve(listener: TcpListener, app: Arc<App>) -> Result<()> {
    axum::serve(listener, router(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn health() -> &'static str {
    "ok"
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// An unreadable body is treated like an empty one: it has no prompt.
fn body_or_default<T: Default>(payload: std::result::Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!("Ignoring unreadable request body: {}", rejection);
            T::default()
        }
    }
}

async fn generate_image(
    State(app): State<Arc<App>>,
    payload: std::result::Result<Json<ImageRequest>, JsonRejection>,
) -> Response {
    let request = body_or_default(payload);
    let Some(prompt) = request.prompt() else {
        return error_response(StatusCode::BAD_REQUEST, PROMPT_REQUIRED);
    };

    Json(app.generate_image(prompt).await).into_response()
}

async fn chat(
    State(app): State<Arc<App>>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request = body_or_default(payload);
    let Some(prompt) = request.prompt() else {
        return error_response(StatusCode::BAD_REQUEST, PROMPT_REQUIRED);
    };

    match app.chat(prompt).await {
        Ok(html) => Json(ChatResponse { html }).into_response(),
        Err(e) => {
            tracing::error!("[chat] {}", e);
            error_response(StatusCode::BAD_GATEWAY, CHAT_UNAVAILABLE)
        }
    }
}
