//! PDF rasterisation: whole document → one image per page.
//!
//! The pipeline only sees the [`PageRasterizer`] trait; production uses
//! [`PdfiumRasterizer`]. The returned sequence is expected to have one image
//! per page but callers must not rely on it (the merger pads with `None`).
//!
//! ## Global state
//!
//! pdfium initialises global library state on bind (`FPDF_InitLibrary`) and
//! destroys it on drop (`FPDF_DestroyLibrary`). Every bind → render → drop
//! cycle runs under [`PDFIUM_GUARD`].

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::{debug, info};

use crate::error::SplitError;

static PDFIUM_GUARD: Mutex<()> = Mutex::new(());

/// Converts a whole PDF into page images in page order.
pub trait PageRasterizer: Send + Sync {
    /// Render every page of `pdf` at `dpi`. A failure anywhere fails the
    /// whole call.
    fn rasterize(&self, pdf: &[u8], dpi: u32) -> Result<Vec<DynamicImage>, SplitError>;
}

/// pdfium-backed rasterizer bound to a specific shared library.
#[derive(Debug, Clone)]
pub struct PdfiumRasterizer {
    library: PathBuf,
}

impl PdfiumRasterizer {
    pub fn new(library: impl Into<PathBuf>) -> Self {
        Self {
            library: library.into(),
        }
    }

    pub fn library(&self) -> &Path {
        &self.library
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn rasterize(&self, pdf: &[u8], dpi: u32) -> Result<Vec<DynamicImage>, SplitError> {
        // A poisoned guard only means another render panicked; pdfium state
        // is rebuilt by the bind below.
        let _guard = PDFIUM_GUARD
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let start = Instant::now();
        let pdfium = pdfium_auto::bind(&self.library).map_err(|e| {
            SplitError::RasterizationFailed {
                detail: e.to_string(),
            }
        })?;
        let images = render_document(&pdfium, pdf, dpi)?;
        info!(
            "Rendered {} pages at {} DPI in {}ms",
            images.len(),
            dpi,
            start.elapsed().as_millis()
        );
        Ok(images)
    }
}

/// Render every page of an in-memory document.
fn render_document(
    pdfium: &Pdfium,
    pdf: &[u8],
    dpi: u32,
) -> Result<Vec<DynamicImage>, SplitError> {
    let document = pdfium
        .load_pdf_from_byte_slice(pdf, None)
        .map_err(|e| SplitError::RasterizationFailed {
            detail: format!("{:?}", e),
        })?;

    let render_config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / 72.0);

    let pages = document.pages();
    let mut images = Vec::with_capacity(pages.len() as usize);
    for (idx, page) in pages.iter().enumerate() {
        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            SplitError::RasterizationFailed {
                detail: format!("page {}: {:?}", idx + 1, e),
            }
        })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );
        images.push(image);
    }

    Ok(images)
}
