//! Request validation for `POST /api/split-pdf`.
//!
//! Checks run in a fixed order and the first failure wins:
//! content type → body read (size limit) → JSON object → `pdf_base64`
//! present → non-empty → string. Nothing reaches base64 decoding unless all
//! of them pass.

use axum::{
    body::Bytes,
    extract::rejection::BytesRejection,
    http::{header, HeaderMap, StatusCode},
};
use serde_json::Value;

use crate::error::SplitError;

/// Field carrying the encoded document.
pub const PDF_FIELD: &str = "pdf_base64";

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitRequest {
    /// Non-empty base64 text, not yet decoded.
    pub pdf_base64: String,
}

pub fn split_request(
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<SplitRequest, SplitError> {
    if !is_json_content_type(headers) {
        return Err(SplitError::UnsupportedContentType);
    }

    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            SplitError::PayloadTooLarge
        } else {
            SplitError::MalformedBody {
                detail: rejection.body_text(),
            }
        }
    })?;

    let value: Value = serde_json::from_slice(&body).map_err(|e| SplitError::MalformedBody {
        detail: e.to_string(),
    })?;
    let Value::Object(mut fields) = value else {
        return Err(SplitError::MalformedBody {
            detail: "expected a JSON object".into(),
        });
    };

    match fields.remove(PDF_FIELD) {
        None => Err(SplitError::MissingField),
        Some(Value::Null) => Err(SplitError::EmptyField),
        Some(Value::String(text)) if text.is_empty() => Err(SplitError::EmptyField),
        Some(Value::String(text)) => Ok(SplitRequest { pdf_base64: text }),
        Some(_) => Err(SplitError::InvalidFieldType),
    }
}

/// `application/json` or `application/*+json`, ignoring parameters and case.
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.split_once('/') {
        Some(("application", subtype)) => subtype == "json" || subtype.ends_with("+json"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn json_headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(content_type).unwrap(),
        );
        headers
    }

    fn validate(body: &str) -> Result<SplitRequest, SplitError> {
        split_request(
            &json_headers("application/json"),
            Ok(Bytes::from(body.to_string())),
        )
    }

    #[test]
    fn content_type_variants() {
        assert!(is_json_content_type(&json_headers("application/json")));
        assert!(is_json_content_type(&json_headers(
            "Application/JSON; charset=utf-8"
        )));
        assert!(is_json_content_type(&json_headers("application/vnd.api+json")));
        assert!(!is_json_content_type(&json_headers("text/plain")));
        assert!(!is_json_content_type(&json_headers("application/xml")));
        assert!(!is_json_content_type(&HeaderMap::new()));
    }

    #[test]
    fn content_type_is_checked_before_body() {
        let err = split_request(
            &json_headers("text/plain"),
            Ok(Bytes::from_static(b"{not json")),
        )
        .unwrap_err();
        assert!(matches!(err, SplitError::UnsupportedContentType));
    }

    #[test]
    fn malformed_and_non_object_bodies() {
        assert!(matches!(
            validate("{not json").unwrap_err(),
            SplitError::MalformedBody { .. }
        ));
        assert!(matches!(
            validate(r#"["pdf_base64"]"#).unwrap_err(),
            SplitError::MalformedBody { .. }
        ));
    }

    #[test]
    fn field_checks() {
        assert!(matches!(validate("{}").unwrap_err(), SplitError::MissingField));
        assert!(matches!(
            validate(r#"{"pdf_base64": ""}"#).unwrap_err(),
            SplitError::EmptyField
        ));
        assert!(matches!(
            validate(r#"{"pdf_base64": null}"#).unwrap_err(),
            SplitError::EmptyField
        ));
        assert!(matches!(
            validate(r#"{"pdf_base64": 42}"#).unwrap_err(),
            SplitError::InvalidFieldType
        ));
    }

    #[test]
    fn accepts_valid_request_and_ignores_extra_fields() {
        let request = validate(r#"{"pdf_base64": "JVBERi0=", "name": "doc.pdf"}"#).unwrap();
        assert_eq!(request.pdf_base64, "JVBERi0=");
    }
}
