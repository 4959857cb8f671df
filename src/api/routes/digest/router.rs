//! Router for the daily summary API

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{MethodRouter, get},
};
use chrono::Local;
use http::HeaderMap;

use super::public;
use crate::ai::digest::{DigestGroup, summarize_group};
use crate::api::public::{ApiError, DigestError};
use crate::api::state::AppState;
use crate::mail::Credentials;
use crate::mail::message::{MESSAGE_CHAR_LIMIT, message_records};

type SharedState = Arc<AppState>;

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn credentials_from_headers(headers: &HeaderMap) -> Option<Credentials> {
    Some(Credentials {
        username: header_value(headers, public::USER_HEADER)?,
        password: header_value(headers, public::PASS_HEADER)?,
    })
}

async fn daily_summary(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<public::DailySummaryResponse>, DigestError> {
    let credentials = credentials_from_headers(&headers).ok_or_else(|| {
        ApiError::Unauthorized(String::from(
            "LDAP credentials missing from request headers",
        ))
    })?;

    let today = Local::now().date_naive();
    tracing::info!("Building daily summary for {} on {}", credentials.username, today);

    // The mail session is closed by the time this returns
    let mail = state.mail_store.fetch_daily(&credentials, today).await?;

    let unread = message_records(&mail.unread, MESSAGE_CHAR_LIMIT);
    let read = message_records(&mail.read, MESSAGE_CHAR_LIMIT);
    tracing::info!(
        "Extracted {} unread and {} read email bodies",
        unread.len(),
        read.len()
    );

    let generator = state.generator.as_ref();
    let unread_summary = summarize_group(generator, DigestGroup::Unread, &unread).await;
    let read_summary = summarize_group(generator, DigestGroup::Read, &read).await;

    Ok(Json(public::DailySummaryResponse {
        status: String::from("success"),
        unread_summary,
        read_summary,
    }))
}

async fn method_not_allowed() -> DigestError {
    DigestError(ApiError::MethodNotAllowed(String::from(
        "Only GET and POST allowed",
    )))
}

fn summary_route() -> MethodRouter<SharedState> {
    get(daily_summary)
        .post(daily_summary)
        .fallback(method_not_allowed)
}

/// Create the daily summary router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/daily-summary", summary_route())
        .route("/daily-summary/", summary_route())
}
