//! Zip extracted page PDFs with rendered images into page records.

use image::DynamicImage;
use tracing::{debug, warn};

use crate::error::SplitError;
use crate::output::{PageRecord, SplitOutput};
use crate::pipeline::encode;

/// Pair page `i` of `pdf_pages` with image `i` of `images`, 1-indexed.
///
/// `pdf_pages` defines the page count. A shorter `images` leaves the tail
/// records without an image; surplus images are ignored.
pub fn merge_pages(
    pdf_pages: Vec<Vec<u8>>,
    images: &[DynamicImage],
) -> Result<SplitOutput, SplitError> {
    let total_pages = pdf_pages.len();
    if images.len() != total_pages {
        warn!(
            "Rasterizer produced {} images for {} pages",
            images.len(),
            total_pages
        );
    }

    let pages = pdf_pages
        .into_iter()
        .enumerate()
        .map(|(idx, pdf)| {
            let page_number = idx + 1;
            let image_base64 = images
                .get(idx)
                .map(encode::encode_png)
                .transpose()
                .map_err(|e| SplitError::PageProcessingFailed {
                    page: page_number,
                    detail: e.to_string(),
                })?;
            debug!("Processed page {}", page_number);
            Ok(PageRecord {
                page_number,
                pdf_base64: encode::encode_pdf(&pdf),
                image_base64,
            })
        })
        .collect::<Result<Vec<_>, SplitError>>()?;

    Ok(SplitOutput { pages, total_pages })
}
