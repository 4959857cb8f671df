//! Public API types

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;

// Errors

pub enum ApiError {
    InvalidInput(String),
    MethodNotAllowed(String),
    Unauthorized(String),
    /// The generation provider answered with a non-success status
    Upstream {
        status: StatusCode,
        details: String,
    },
    Timeout(anyhow::Error),
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Upstream { status, .. } => *status,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::InvalidInput(msg)
            | ApiError::MethodNotAllowed(msg)
            | ApiError::Unauthorized(msg) => msg.clone(),
            ApiError::Upstream { .. } => String::from("Google API Error"),
            ApiError::Timeout(err) | ApiError::Internal(err) => format!("{:#}", err),
        }
    }

    fn log(&self) {
        if self.status().is_server_error() {
            tracing::error!("{}", self.message());
        } else {
            tracing::warn!("{}: {}", self.status(), self.message());
        }
    }
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status();
        let body = match &self {
            ApiError::Upstream { details, .. } => json!({
                "error": self.message(),
                "details": details,
            }),
            _ => json!({ "error": self.message() }),
        };
        (status, Json(body)).into_response()
    }
}

fn is_timeout(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.is::<tokio::time::error::Elapsed>()
            || cause
                .downcast_ref::<reqwest::Error>()
                .is_some_and(|e| e.is_timeout())
    })
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        if is_timeout(&err) {
            Self::Timeout(err)
        } else {
            Self::Internal(err)
        }
    }
}

/// Same error kinds as [`ApiError`] rendered in the daily summary's
/// `{status, message}` shape.
pub struct DigestError(pub ApiError);

impl DigestError {
    pub fn message(&self) -> String {
        match &self.0 {
            ApiError::InvalidInput(msg)
            | ApiError::MethodNotAllowed(msg)
            | ApiError::Unauthorized(msg) => msg.clone(),
            err => format!("Server error: {}", friendly_message(&err.message())),
        }
    }
}

/// Replace well known connection failures with a hint the caller can
/// act on.
fn friendly_message(msg: &str) -> String {
    let lower = msg.to_lowercase();
    if lower.contains("authentication failed") {
        String::from("IMAP authentication failed. Check username/password.")
    } else if lower.contains("ssl") {
        String::from("SSL connection error. Server may be unreachable.")
    } else {
        msg.to_string()
    }
}

impl IntoResponse for DigestError {
    fn into_response(self) -> Response {
        self.0.log();

        let body = json!({
            "status": "error",
            "message": self.message(),
        });
        (self.0.status(), Json(body)).into_response()
    }
}

impl From<ApiError> for DigestError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl From<anyhow::Error> for DigestError {
    fn from(err: anyhow::Error) -> Self {
        Self(err.into())
    }
}

// Re-export public types from each route

pub mod digest {
    pub use crate::api::routes::digest::public::*;
}

pub mod proxy {
    pub use crate::api::routes::proxy::public::*;
}
