//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use pixedge_core::constants::PROCESS_PREFIX;
use pixedge_core::Config;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::error::panic_response;
use crate::handlers;
use crate::middleware::cors_middleware;
use crate::state::AppState;

/// Build the dispatcher router.
///
/// The CORS middleware is the outermost layer so that preflight requests for
/// any path, known or not, are answered before routing.
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router {
    let process_routes = Router::new()
        .route(
            "/format",
            get(handlers::process::format_image).post(handlers::process::format_image),
        )
        .route(
            "/resize",
            get(handlers::process::resize_image).post(handlers::process::resize_image),
        )
        .route(
            "/rotate",
            get(handlers::process::rotate_image).post(handlers::process::rotate_image),
        )
        .route(
            "/watermark",
            get(handlers::process::watermark_image).post(handlers::process::watermark_image),
        )
        .route("/composite", post(handlers::composite::composite_process));

    let http_concurrency_limit = config.http_concurrency_limit();
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        max_file_size_bytes = config.max_file_size_bytes(),
        "HTTP limits configured"
    );

    Router::new()
        .nest(PROCESS_PREFIX, process_routes)
        .fallback(handlers::banner)
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_file_size_bytes()))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(axum::middleware::from_fn(cors_middleware))
        .with_state(state)
}
