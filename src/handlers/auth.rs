use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::principal::Role,
    state::AppState,
};

/// The request payload for login.
#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// The response payload for a successful login.
#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    /// The opaque session token to present on subsequent calls.
    pub token: String,
    pub role: Role,
}

/// Handles login.
///
/// Credentials are matched against the credential directory; on success a
/// signed session token is issued. The failure response is the same
/// whether the username is unknown or the secret is wrong.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    tracing::info!("Login attempt for user: {}", payload.username);

    let role = state
        .directory
        .verify(&payload.username, &payload.password)
        .ok_or_else(|| {
            AppError::Authentication("invalid username or password".to_string())
        })?;

    let token = state.tokens.issue(&payload.username, role)?;

    tracing::info!("User logged in: {} ({})", payload.username, role);

    let response = LoginResponse {
        success: true,
        token,
        role,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}
