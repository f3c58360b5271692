//! HTTP surface: shared state and the router.
//!
//! | Route | Method | Handler |
//! |-------|--------|---------|
//! | `/` | GET | upload page |
//! | `/health` | GET | liveness |
//! | `/api/split-pdf` | POST | split |
//!
//! Unknown paths get 404, known paths with another method 405, bodies over
//! [`ServiceConfig::max_body_bytes`] 413. All of them answer with the same
//! `{"success": false, "error": ...}` envelope as the split endpoint.

pub mod handlers;
pub mod validate;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::pipeline::render::PageRasterizer;

/// Shared, read-only application state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServiceConfig,
    rasterizer: Arc<dyn PageRasterizer>,
}

impl AppState {
    pub fn new(config: ServiceConfig, rasterizer: Arc<dyn PageRasterizer>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, rasterizer }),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }

    pub fn rasterizer(&self) -> Arc<dyn PageRasterizer> {
        Arc::clone(&self.inner.rasterizer)
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config().max_body_bytes;

    Router::new()
        .route(
            "/",
            get(handlers::index).fallback(handlers::method_not_allowed),
        )
        .route(
            "/health",
            get(handlers::health).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/split-pdf",
            post(handlers::split_pdf).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
