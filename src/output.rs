//! JSON records returned by the split endpoint.

use serde::Serialize;

/// One page of a split document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    /// 1-indexed position in the source document.
    pub page_number: usize,
    /// Standalone single-page PDF, base64.
    pub pdf_base64: String,
    /// PNG render of the page, base64. `null` when the rasterizer produced
    /// fewer images than the document has pages.
    pub image_base64: Option<String>,
}

/// Result of splitting one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitOutput {
    pub pages: Vec<PageRecord>,
    pub total_pages: usize,
}

/// Success envelope: `{"success": true, "pages": [...], "total_pages": N}`.
#[derive(Debug, Clone, Serialize)]
pub struct SplitResponse {
    pub success: bool,
    pub pages: Vec<PageRecord>,
    pub total_pages: usize,
}

impl From<SplitOutput> for SplitResponse {
    fn from(output: SplitOutput) -> Self {
        Self {
            success: true,
            pages: output.pages,
            total_pages: output.total_pages,
        }
    }
}

/// Failure envelope shared by every error path.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
