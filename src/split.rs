//! End-to-end split of one decoded document.
//!
//! The stages run strictly in order and the first error ends the request:
//!
//! ```text
//! ParseDocument → CheckPageCount → RasterizeWhole → ExtractPage₁…ₙ → Merge
//! ```
//!
//! Rasterisation and extraction have deliberately different failure
//! policies: the rasterizer may return fewer images than pages (the merger
//! pads with `null`), while a single page that cannot be extracted fails the
//! whole request.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::SplitError;
use crate::output::SplitOutput;
use crate::pipeline::render::PageRasterizer;
use crate::pipeline::{extract, merge};

/// Split `pdf` on the blocking thread pool.
///
/// pdfium and lopdf are CPU-bound and synchronous; the whole pipeline runs
/// on one `spawn_blocking` thread so Tokio workers never stall.
pub async fn split_pdf(
    pdf: Vec<u8>,
    rasterizer: Arc<dyn PageRasterizer>,
    dpi: u32,
) -> Result<SplitOutput, SplitError> {
    tokio::task::spawn_blocking(move || split_pdf_blocking(&pdf, rasterizer.as_ref(), dpi))
        .await
        .map_err(|e| SplitError::Internal(format!("split task failed: {e}")))?
}

/// Blocking implementation of [`split_pdf`].
pub fn split_pdf_blocking(
    pdf: &[u8],
    rasterizer: &dyn PageRasterizer,
    dpi: u32,
) -> Result<SplitOutput, SplitError> {
    let total_start = Instant::now();

    // ── Step 1: Parse ────────────────────────────────────────────────────
    let document = extract::parse_document(pdf)?;

    // ── Step 2: Page count ───────────────────────────────────────────────
    let page_count = extract::page_count(&document)?;
    debug!("PDF has {} pages", page_count);

    // ── Step 3: Rasterise the whole document ─────────────────────────────
    let render_start = Instant::now();
    let images = rasterizer.rasterize(pdf, dpi)?;
    let render_ms = render_start.elapsed().as_millis();

    // ── Step 4: One PDF per page ─────────────────────────────────────────
    let extract_start = Instant::now();
    let pdf_pages = extract::extract_pages(&document)?;
    let extract_ms = extract_start.elapsed().as_millis();

    // ── Step 5: Merge ────────────────────────────────────────────────────
    let output = merge::merge_pages(pdf_pages, &images)?;

    info!(
        "Split PDF into {} pages ({} images) in {}ms (render {}ms, extract {}ms)",
        output.total_pages,
        images.len(),
        total_start.elapsed().as_millis(),
        render_ms,
        extract_ms
    );
    Ok(output)
}
