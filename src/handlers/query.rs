use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};

use crate::{
    error::Result,
    models::claims::Claims,
    models::query::{QueryRequest, QueryResult},
    services::export,
    state::AppState,
    validation::query::{validate_pagination, validate_statement},
};

/// Handles a query call.
///
/// The statement text is deliberately not logged: ad-hoc queries may carry
/// sensitive literals. Row count and pagination are enough for the audit
/// trail.
#[axum::debug_handler]
pub async fn run_query(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<QueryRequest>,
) -> Result<Response> {
    validate_statement(&payload.statement)?;
    validate_pagination(payload.limit, payload.offset)?;

    let limit = payload.limit;
    let offset = payload.offset;
    let result = state.sandbox.execute(payload, claims.role).await?;

    tracing::info!(
        subject = %claims.sub,
        rows = result.row_count,
        limit,
        offset,
        "Query completed"
    );

    Ok((StatusCode::OK, Json(result)).into_response())
}

/// Handles an export call.
///
/// Takes a previously produced query result and returns it as a
/// downloadable record-array JSON document.
#[axum::debug_handler]
pub async fn export_result(
    Extension(claims): Extension<Claims>,
    Json(result): Json<QueryResult>,
) -> Result<Response> {
    let bytes = export::serialize(&result)?;

    tracing::info!(subject = %claims.sub, rows = result.row_count, "Result exported");

    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::CONTENT_TYPE,
        "application/json".parse().expect("static header value"),
    );
    headers.insert(
        axum::http::header::CONTENT_DISPOSITION,
        r#"attachment; filename="results.json""#
            .parse()
            .expect("static header value"),
    );

    Ok((StatusCode::OK, headers, bytes).into_response())
}
