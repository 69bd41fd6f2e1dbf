use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, state::AppState};

/// Extracts the bearer token from the `Authorization` header.
fn extract_bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// A middleware that requires a valid session token to be present.
///
/// On success the validated claims are inserted as a request extension for
/// downstream handlers. Every failure (missing header, malformed token,
/// bad signature, expiry) produces the same uniform response, redirecting
/// the caller to re-authenticate.
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    tracing::debug!("Checking authentication...");

    let Some(token) = extract_bearer_token(&request) else {
        tracing::warn!("Missing bearer token");
        return AppError::InvalidToken.into_response();
    };

    let claims = match state.tokens.validate(token) {
        Ok(claims) => claims,
        Err(e) => return e.into_response(),
    };

    tracing::debug!("User authenticated: {} ({})", claims.sub, claims.role);

    let mut request = request;
    request.extensions_mut().insert(claims);

    next.run(request).await
}
