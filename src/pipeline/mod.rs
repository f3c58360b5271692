//! Pipeline stages for splitting a PDF.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on its own and the rendering backend can be swapped without
//! touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! decode ──▶ extract ──┐
//! (base64)   (lopdf)   ├──▶ merge ──▶ page records
//!            render ───┘    (zip by page number, PNG + base64)
//!            (pdfium)
//! ```
//!
//! 1. [`decode`]: base64 text to PDF bytes
//! 2. [`extract`]: parse, count pages, copy each page into its own PDF
//! 3. [`render`]: rasterise the whole document behind [`render::PageRasterizer`]
//! 4. [`encode`]: PNG and base64 encoding for the JSON body
//! 5. [`merge`]: pair page PDFs with images by 1-based page number

pub mod decode;
pub mod encode;
pub mod extract;
pub mod merge;
pub mod render;
