//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, Rgba, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use pdfsplit::{router, AppState, PageRasterizer, ServiceConfig, SplitError};
use serde_json::Value;
use tower::ServiceExt;

// ── PDF fixtures ─────────────────────────────────────────────────────────────

/// A valid PDF with `n` Letter-sized pages, page `i` showing "Page i".
pub fn pdf_with_pages(n: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut kids = Vec::with_capacity(n);
    for i in 1..=n {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        format!("Page {i}").into_bytes(),
                        StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => n as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// A one-page PDF whose link annotation starts a chain of `n` URI actions
/// joined by `/Next`.
pub fn pdf_with_action_chain(n: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let actions: Vec<_> = (0..n).map(|_| doc.new_object_id()).collect();
    for (i, id) in actions.iter().enumerate() {
        let mut action = dictionary! {
            "S" => "URI",
            "URI" => Object::String(format!("https://example.org/{i}").into_bytes(), StringFormat::Literal),
        };
        if let Some(next) = actions.get(i + 1) {
            action.set("Next", *next);
        }
        doc.objects.insert(*id, Object::Dictionary(action));
    }

    let link = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => vec![0.into(), 0.into(), 72.into(), 72.into()],
        "A" => actions[0],
    });
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Annots" => vec![Object::Reference(link)],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1_i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

pub fn pdf_base64(n: usize) -> String {
    STANDARD.encode(pdf_with_pages(n))
}

/// Text of the first page's content stream in a decoded single-page PDF.
pub fn page_text(pdf: &[u8]) -> String {
    let doc = Document::load_mem(pdf).expect("page PDF should parse");
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1, "page PDF must hold exactly one page");
    let content = doc.get_page_content(pages[&1]).unwrap();
    String::from_utf8_lossy(&content).into_owned()
}

// ── Rasterizer doubles ───────────────────────────────────────────────────────

/// Rasterizer stand-in so the HTTP tests do not need a pdfium library.
pub enum FakeRasterizer {
    /// Return this many blank images, whatever the document holds.
    Images(usize),
    /// Fail the whole conversion.
    Fail,
    /// Panic; proves the rasterizer was never reached.
    Panic,
}

impl PageRasterizer for FakeRasterizer {
    fn rasterize(&self, _pdf: &[u8], dpi: u32) -> Result<Vec<DynamicImage>, SplitError> {
        match self {
            FakeRasterizer::Images(n) => Ok((0..*n).map(|_| blank_page(dpi)).collect()),
            FakeRasterizer::Fail => Err(SplitError::RasterizationFailed {
                detail: "engine unavailable".into(),
            }),
            FakeRasterizer::Panic => panic!("rasterizer must not be called"),
        }
    }
}

/// Records the DPI of every call.
#[derive(Default)]
pub struct DpiProbe {
    pub seen: Mutex<Vec<u32>>,
}

impl PageRasterizer for DpiProbe {
    fn rasterize(&self, _pdf: &[u8], dpi: u32) -> Result<Vec<DynamicImage>, SplitError> {
        self.seen.lock().unwrap().push(dpi);
        Ok(vec![blank_page(dpi)])
    }
}

/// A tiny white image whose width encodes the DPI.
fn blank_page(dpi: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        dpi / 10,
        8,
        Rgba([255, 255, 255, 255]),
    ))
}

// ── App helpers ──────────────────────────────────────────────────────────────

pub fn app(rasterizer: impl PageRasterizer + 'static) -> Router {
    app_with(ServiceConfig::default(), Arc::new(rasterizer))
}

pub fn app_with(config: ServiceConfig, rasterizer: Arc<dyn PageRasterizer>) -> Router {
    router(AppState::new(config, rasterizer))
}

pub fn post_json(body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/split-pdf")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

pub fn split_request(pdf_base64: &str) -> Request<Body> {
    post_json(serde_json::json!({ "pdf_base64": pdf_base64 }).to_string())
}

/// Send one request and parse the JSON reply.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("response is not JSON ({e}): {:?}", bytes));
    (status, json)
}

/// Assert the failure envelope and its message.
pub fn assert_error(body: &Value, message: &str) {
    assert_eq!(body["success"], Value::Bool(false), "body: {body}");
    assert_eq!(body["error"], message, "body: {body}");
    assert_eq!(body.as_object().unwrap().len(), 2, "body: {body}");
}
