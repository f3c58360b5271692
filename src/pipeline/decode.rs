//! Base64 text → PDF bytes.
//!
//! Standard alphabet, padding required. ASCII whitespace is dropped first so
//! line-wrapped encodings (MIME, `base64` CLI output) are accepted; anything
//! else outside the alphabet is an error.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use crate::error::SplitError;

/// Decode the request's `pdf_base64` field.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, SplitError> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| SplitError::InvalidBase64 {
            detail: e.to_string(),
        })?;

    debug!("Decoded {} base64 chars → {} bytes", text.len(), bytes.len());
    Ok(bytes)
}
