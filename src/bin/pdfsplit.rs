//! Server binary for pdfsplit.
//!
//! Maps CLI flags and environment variables to `ServiceConfig`, makes sure
//! a pdfium library is available, then serves the router until Ctrl-C or
//! SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfium_auto::PdfiumLocator;
use pdfsplit::{router, AppState, PdfiumRasterizer, ServiceConfig};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on 0.0.0.0:5000
  pdfsplit

  # Local only, lower resolution images
  pdfsplit --host 127.0.0.1 --port 8080 --dpi 150

  # Split a document
  curl -s localhost:5000/api/split-pdf \
    -H 'Content-Type: application/json' \
    -d "{\"pdf_base64\": \"$(base64 -w0 document.pdf)\"}"

ENVIRONMENT VARIABLES:
  PDFSPLIT_HOST           Bind address
  PDFSPLIT_PORT           Listen port
  PDFSPLIT_DPI            Page image resolution
  PDFSPLIT_MAX_BODY_MB    Request body limit in MiB
  PDFIUM_LIB_PATH         Path to an existing libpdfium; skips auto-download
  PDFIUM_AUTO_CACHE_DIR   Override the default pdfium cache directory
  SESSION_SECRET          Session signing secret
  RUST_LOG                Tracing filter (overrides --verbose/--quiet)

  PDFium (~30 MB) is downloaded on first start and cached in
  ~/.cache/pdfsplit/pdfium-7690/.
"#;

/// Split PDFs into single pages and page images over HTTP.
#[derive(Parser, Debug)]
#[command(
    name = "pdfsplit",
    version,
    about = "Split PDFs into single-page PDFs and PNG images over HTTP",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Bind address.
    #[arg(long, env = "PDFSPLIT_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Listen port.
    #[arg(short, long, env = "PDFSPLIT_PORT", default_value_t = 5000)]
    port: u16,

    /// Page image resolution (72–600).
    #[arg(long, env = "PDFSPLIT_DPI", default_value_t = 200,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Request body limit in MiB.
    #[arg(long, env = "PDFSPLIT_MAX_BODY_MB", default_value_t = 64,
          value_parser = clap::value_parser!(u64).range(1..=1024))]
    max_body_mb: u64,

    /// Existing pdfium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Session signing secret.
    #[arg(long, env = "SESSION_SECRET", default_value = "dev-secret-key", hide_env_values = true)]
    session_secret: String,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFSPLIT_VERBOSE")]
    verbose: bool,

    /// Only log errors; no download progress bar.
    #[arg(short, long, env = "PDFSPLIT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Ensure PDFium engine is available ────────────────────────────────
    let mut locator = PdfiumLocator::from_env();
    if let Some(ref path) = cli.pdfium_lib {
        locator = locator.with_library(path);
    }
    let library = ensure_pdfium(&locator, cli.quiet)?;

    // ── Build config ─────────────────────────────────────────────────────
    let config = ServiceConfig::builder()
        .host(&cli.host)
        .port(cli.port)
        .dpi(cli.dpi)
        .max_body_bytes((cli.max_body_mb * 1024 * 1024) as usize)
        .pdfium_lib_path(&library)
        .session_secret(&cli.session_secret)
        .build()
        .context("Invalid configuration")?;
    let addr = config.bind_addr().context("Invalid bind address")?;
    info!("Configuration: {:?}", config);

    // ── Serve ────────────────────────────────────────────────────────────
    let rasterizer = Arc::new(PdfiumRasterizer::new(library));
    info!("Rendering with pdfium at {}", rasterizer.library().display());
    let app = router(AppState::new(config, rasterizer));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("pdfsplit listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Locate pdfium, downloading it with a progress bar on first start.
fn ensure_pdfium(locator: &PdfiumLocator, quiet: bool) -> Result<PathBuf> {
    if let Some(path) = locator.installed() {
        return Ok(path);
    }

    if quiet {
        return tokio::task::block_in_place(|| locator.ensure(None))
            .context("Failed to download PDFium engine");
    }

    let dl_bar = ProgressBar::new(0);
    dl_bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    dl_bar.set_prefix("PDF engine");
    dl_bar.enable_steady_tick(Duration::from_millis(80));

    let bar = dl_bar.clone();
    let path = tokio::task::block_in_place(|| {
        locator.ensure(Some(&|downloaded, total| {
            if let Some(t) = total {
                if bar.length() != Some(t) {
                    bar.set_length(t);
                }
            }
            bar.set_position(downloaded);
        }))
    })
    .context("Failed to download PDFium engine")?;

    dl_bar.finish_with_message("ready");
    Ok(path)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
