//! Binary → base64 text for the JSON response.
//!
//! Page images are PNG-encoded first: lossless, so rendered text stays crisp
//! for whatever consumes the image downstream (OCR, previews).

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a rendered page as base64 PNG.
pub fn encode_png(img: &DynamicImage) -> Result<String, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded {}x{} image → {} bytes base64", img.width(), img.height(), b64.len());
    Ok(b64)
}

/// Encode a serialized single-page PDF.
pub fn encode_pdf(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
