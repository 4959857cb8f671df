//! API routes module

pub mod digest;
pub mod proxy;

use std::sync::Arc;

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<AppState>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Gemini passthrough
        .merge(proxy::router())
        // Daily email digest
        .merge(digest::router())
}
