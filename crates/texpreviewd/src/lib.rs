//! HTTP front end for the texpreview compile pipeline.
//!
//! Routes:
//!
//! - `POST /api/compile`: `{code, formats?, format?, engine?}` in, the
//!   serialized [`CompileResult`](texpreview_build::CompileResult) out.
//! - `GET /health`: liveness probe.

pub mod error;
pub mod handlers;

use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use texpreview_build::Compiler;

/// Largest accepted request body.
pub const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// State shared by all requests. Each compile still gets its own work directory.
#[derive(Debug, Clone)]
pub struct AppState {
    pub compiler: Compiler,
}

impl AppState {
    pub fn new(compiler: Compiler) -> Self {
        Self { compiler }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/compile", post(handlers::compile))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{} {} {} {}ms",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}
