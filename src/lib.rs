use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::post,
};
use http::{Method, header};
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod clock;
pub mod config;
pub mod error;
pub mod state;

pub mod models {
    pub mod claims;
    pub mod principal;
    pub mod query;
}

pub mod repositories {
    pub mod principal;
}

pub mod services {
    pub mod export;
    pub mod sandbox;
    pub mod token;
}

pub mod handlers {
    pub mod auth;
    pub mod query;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod query;
}

use state::AppState;

/// Assembles the gateway router.
///
/// Login is rate limited; the query and export routes sit behind the
/// session-token middleware.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse().unwrap(),
            "http://127.0.0.1:3000".parse().unwrap(),
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ])
        .max_age(Duration::from_secs(86400));

    let login_governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(50)
            .use_headers()
            .finish()
            .unwrap(),
    );

    let login_routes = Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route_layer(tower_governor::GovernorLayer::new(login_governor_conf))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/query", post(handlers::query::run_query))
        .route("/api/query/export", post(handlers::query::export_result))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state);

    Router::new()
        .merge(login_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
}
