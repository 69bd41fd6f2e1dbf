use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// An authentication error at login.
    ///
    /// Always carries the same generic message: unknown user and wrong
    /// secret are indistinguishable to the caller.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A token that failed validation.
    ///
    /// Malformed encoding, signature mismatch, and expiry all collapse
    /// into this one variant; the cause is not surfaced to the caller.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// A statement that failed the read-only gate.
    #[error("Rejected query: not a read query")]
    RejectedQuery,

    /// A failure reported by the data store while running a query.
    #[error("Query failed: {0}")]
    Execution(String),

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Authentication(ref msg) => {
                tracing::warn!("Authentication failed");
                (StatusCode::UNAUTHORIZED, msg.clone())
            }

            AppError::InvalidToken => {
                tracing::warn!("Token validation failed");
                (
                    StatusCode::UNAUTHORIZED,
                    "invalid or expired token".to_string(),
                )
            }

            AppError::RejectedQuery => {
                tracing::warn!("Query rejected by read-only gate");
                (
                    StatusCode::BAD_REQUEST,
                    "only SELECT queries are allowed".to_string(),
                )
            }

            // The store's diagnostic text is surfaced verbatim so the tool
            // stays usable for ad-hoc exploration. Trusted users only;
            // sanitizing this is a known hardening candidate.
            AppError::Execution(ref msg) => {
                tracing::debug!("Query execution failed: {}", msg);
                (StatusCode::BAD_REQUEST, format!("query failed: {}", msg))
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (status, body).into_response()
    }
}
