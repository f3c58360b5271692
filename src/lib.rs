//! # pdfsplit
//!
//! HTTP service that splits a PDF into one standalone PDF per page plus a
//! PNG rendering of every page.
//!
//! Clients post a base64-encoded PDF as JSON to `POST /api/split-pdf` and get
//! back, for each page in order, a single-page PDF and a 200-DPI PNG, both
//! base64-encoded. Nothing is stored; every request is handled in memory.
//!
//! ## Pipeline Overview
//!
//! ```text
//! JSON body
//!  │
//!  ├─ 1. Validate  content type, JSON object, `pdf_base64` field
//!  ├─ 2. Decode    base64 → PDF bytes
//!  ├─ 3. Parse     lopdf, reject zero-page documents
//!  ├─ 4. Render    rasterise every page via pdfium (spawn_blocking)
//!  ├─ 5. Extract   copy each page into its own PDF
//!  └─ 6. Merge     pair page PDFs with PNGs → {success, pages, total_pages}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pdfsplit::{router, AppState, PdfiumRasterizer, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServiceConfig::builder().port(5000).build()?;
//!     let rasterizer = Arc::new(PdfiumRasterizer::new("/opt/pdfium/libpdfium.so"));
//!     let listener = tokio::net::TcpListener::bind(config.bind_addr()?).await?;
//!     axum::serve(listener, router(AppState::new(config, rasterizer))).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfsplit` server binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod server;
pub mod split;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use error::SplitError;
pub use output::{ErrorResponse, PageRecord, SplitOutput, SplitResponse};
pub use pipeline::render::{PageRasterizer, PdfiumRasterizer};
pub use server::{router, AppState};
pub use split::{split_pdf, split_pdf_blocking};
