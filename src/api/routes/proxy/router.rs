//! Router for the Gemini passthrough

use std::sync::Arc;

use anyhow::{Context, anyhow};
use axum::{
    Router,
    body::Bytes,
    extract::State,
    response::Json,
    routing::{MethodRouter, post},
};
use serde_json::Value;

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::google::gemini::extract_text;

type SharedState = Arc<AppState>;

async fn gemini_proxy(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<public::ProxyResponse>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::InvalidInput(String::from("Empty request body")));
    }
    let payload: Value = serde_json::from_slice(&body).map_err(|_| {
        ApiError::InvalidInput(format!("Invalid JSON: {}", String::from_utf8_lossy(&body)))
    })?;

    let client = state
        .gemini
        .as_ref()
        .ok_or_else(|| anyhow!("Generation provider is not configured"))?;
    let reply = client.generate_content(&payload).await?;

    if !reply.status.is_success() {
        return Err(ApiError::Upstream {
            status: reply.status,
            details: reply.body,
        });
    }

    let raw: Value =
        serde_json::from_str(&reply.body).context("Generation provider returned invalid JSON")?;
    let text = extract_text(&raw)?;

    Ok(Json(public::ProxyResponse {
        ok: true,
        text: text.clone(),
        summary: text,
        raw,
    }))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed(String::from("Only POST allowed"))
}

fn proxy_route() -> MethodRouter<SharedState> {
    post(gemini_proxy).fallback(method_not_allowed)
}

/// Create the proxy router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/gemini-proxy", proxy_route())
        .route("/gemini-proxy/", proxy_route())
}
