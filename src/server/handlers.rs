//! Route handlers.

use std::any::Any;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::info;

use super::{validate, AppState};
use crate::error::SplitError;
use crate::output::SplitResponse;
use crate::pipeline::decode;
use crate::split;

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /`: upload page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /api/split-pdf`
///
/// The body is taken as a `Result` so size-limit and read failures reach
/// validation in order instead of producing axum's plain-text rejection.
pub async fn split_pdf(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SplitResponse>, SplitError> {
    let request = validate::split_request(&headers, body)?;
    let pdf = decode::decode_base64(&request.pdf_base64)?;
    info!("Splitting PDF ({} bytes)", pdf.len());

    let output = split::split_pdf(pdf, state.rasterizer(), state.config().dpi).await?;
    Ok(Json(output.into()))
}

pub async fn not_found() -> SplitError {
    SplitError::NotFound
}

pub async fn method_not_allowed() -> SplitError {
    SplitError::MethodNotAllowed
}

/// Last-resort conversion of a handler panic into the JSON error envelope.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    SplitError::Internal(detail).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn panic_payload_becomes_internal_error() {
        let response = panic_response(Box::new("index out of bounds"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = panic_response(Box::new(17_u8));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
