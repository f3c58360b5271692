//! Error type for the split service.
//!
//! Every pipeline stage returns `Result<_, SplitError>`. The variant decides
//! the HTTP status; the `Display` text is the `error` field of the JSON
//! envelope, so these messages are part of the API contract.
//!
//! | Class | Status |
//! |-------|--------|
//! | request validation, base64, unreadable or empty PDF | 400 |
//! | body over the configured limit | 413 |
//! | unknown route / wrong method | 404 / 405 |
//! | rasterization, per-page processing, anything unexpected | 500 |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::output::ErrorResponse;

#[derive(Debug, Error)]
pub enum SplitError {
    // ── Request validation ────────────────────────────────────────────────
    #[error("Content-Type must be application/json")]
    UnsupportedContentType,

    /// Body is not JSON, or is JSON but not an object.
    #[error("Request body must be a valid JSON object")]
    MalformedBody { detail: String },

    #[error("Missing 'pdf_base64' field in request body")]
    MissingField,

    #[error("'pdf_base64' field cannot be empty")]
    EmptyField,

    #[error("'pdf_base64' field must be a string")]
    InvalidFieldType,

    // ── Document errors ───────────────────────────────────────────────────
    #[error("Invalid base64 encoding")]
    InvalidBase64 { detail: String },

    /// The object-model parser rejected the decoded bytes.
    #[error("Invalid PDF file or corrupted data")]
    InvalidPdf { detail: String },

    #[error("PDF file contains no pages")]
    EmptyDocument,

    // ── Processing errors ─────────────────────────────────────────────────
    /// Whole-document rasterization failed; nothing was rendered.
    #[error("Error converting PDF to images: {detail}")]
    RasterizationFailed { detail: String },

    /// Building, serializing or encoding one page failed. Aborts the request.
    #[error("Error processing page {page}: {detail}")]
    PageProcessingFailed { page: usize, detail: String },

    // ── Routing ───────────────────────────────────────────────────────────
    #[error("File too large. Please upload a smaller PDF file.")]
    PayloadTooLarge,

    #[error("Endpoint not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    // ── Catch-all ─────────────────────────────────────────────────────────
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl SplitError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SplitError::UnsupportedContentType
            | SplitError::MalformedBody { .. }
            | SplitError::MissingField
            | SplitError::EmptyField
            | SplitError::InvalidFieldType
            | SplitError::InvalidBase64 { .. }
            | SplitError::InvalidPdf { .. }
            | SplitError::EmptyDocument => StatusCode::BAD_REQUEST,
            SplitError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            SplitError::NotFound => StatusCode::NOT_FOUND,
            SplitError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            SplitError::RasterizationFailed { .. }
            | SplitError::PageProcessingFailed { .. }
            | SplitError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SplitError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // The envelope hides parser detail for client errors; keep it in logs.
        match &self {
            SplitError::MalformedBody { detail }
            | SplitError::InvalidBase64 { detail }
            | SplitError::InvalidPdf { detail } => {
                tracing::warn!("{}: {}", self, detail);
            }
            _ if status.is_server_error() => tracing::error!("{}", self),
            _ => tracing::warn!("{}", self),
        }

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_400() {
        for e in [
            SplitError::UnsupportedContentType,
            SplitError::MissingField,
            SplitError::EmptyField,
            SplitError::InvalidFieldType,
            SplitError::EmptyDocument,
            SplitError::InvalidBase64 { detail: "x".into() },
            SplitError::InvalidPdf { detail: "x".into() },
        ] {
            assert_eq!(e.status_code(), StatusCode::BAD_REQUEST, "{e}");
        }
    }

    #[test]
    fn processing_errors_are_500() {
        let e = SplitError::PageProcessingFailed {
            page: 3,
            detail: "boom".into(),
        };
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.to_string(), "Error processing page 3: boom");

        let e = SplitError::RasterizationFailed {
            detail: "no pdfium".into(),
        };
        assert!(e.to_string().starts_with("Error converting PDF to images"));
    }

    #[test]
    fn parser_detail_stays_out_of_message() {
        let e = SplitError::InvalidPdf {
            detail: "xref table missing".into(),
        };
        assert_eq!(e.to_string(), "Invalid PDF file or corrupted data");
    }

    #[test]
    fn route_errors_map_to_their_status() {
        assert_eq!(SplitError::PayloadTooLarge.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(SplitError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            SplitError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn internal_carries_description() {
        let e = SplitError::Internal("worker panicked".into());
        assert_eq!(e.to_string(), "Internal server error: worker panicked");
    }
}
