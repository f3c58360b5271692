//! # pdfium-auto
//!
//! Find a usable [PDFium](https://pdfium.googlesource.com/pdfium/) shared
//! library for `pdfium-render`, fetching it from
//! [bblanchon/pdfium-binaries](https://github.com/bblanchon/pdfium-binaries)
//! into a local cache when nothing is installed.
//!
//! Resolution order used by [`PdfiumLocator::ensure`]:
//!
//! 1. an explicit path (`PDFIUM_LIB_PATH` or [`PdfiumLocator::with_library`]),
//! 2. the per-version cache directory,
//! 3. download + extract into the cache directory.
//!
//! ```rust,no_run
//! use pdfium_auto::PdfiumLocator;
//!
//! let locator = PdfiumLocator::from_env();
//! let path = locator.ensure(None).expect("pdfium unavailable");
//! let pdfium = pdfium_auto::bind(&path).expect("bind failed");
//! # drop(pdfium);
//! ```
//!
//! ## Environment variables
//!
//! - `PDFIUM_LIB_PATH`: existing pdfium library, never downloaded over.
//! - `PDFIUM_AUTO_CACHE_DIR`: root of the cache directory.

use std::io::Read;
use std::path::{Path, PathBuf};

use pdfium_render::prelude::Pdfium;
use thiserror::Error;
use tracing::{debug, info, warn};

/// The pdfium-binaries release tag used for downloads.
pub const PDFIUM_VERSION: &str = "7690";

const RELEASE_URL: &str = "https://github.com/bblanchon/pdfium-binaries/releases/download";

/// Cache directory name under the platform cache root.
const CACHE_APP_DIR: &str = "pdfsplit";

/// Callback receiving `(bytes_downloaded, total_bytes)` while fetching.
pub type ProgressFn<'a> = &'a dyn Fn(u64, Option<u64>);

#[derive(Error, Debug)]
pub enum PdfiumAutoError {
    #[error("Unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Cache directory error for '{path}': {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Archive extraction failed: {0}")]
    Extract(String),

    #[error("Failed to bind PDFium from '{path}': {reason}")]
    Bind { path: PathBuf, reason: String },
}

/// One row of the release asset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformAsset {
    pub os: &'static str,
    pub arch: &'static str,
    /// Release asset, e.g. `pdfium-linux-x64.tgz`.
    pub archive: &'static str,
    /// Library path inside the archive.
    pub member: &'static str,
}

impl PlatformAsset {
    /// File name the library is stored under in the cache.
    pub fn library_name(&self) -> &'static str {
        self.member.rsplit('/').next().unwrap_or(self.member)
    }

    fn download_url(&self) -> String {
        format!("{RELEASE_URL}/chromium%2F{PDFIUM_VERSION}/{}", self.archive)
    }
}

const ASSETS: &[PlatformAsset] = &[
    PlatformAsset { os: "linux", arch: "x86_64", archive: "pdfium-linux-x64.tgz", member: "lib/libpdfium.so" },
    PlatformAsset { os: "linux", arch: "aarch64", archive: "pdfium-linux-arm64.tgz", member: "lib/libpdfium.so" },
    PlatformAsset { os: "macos", arch: "aarch64", archive: "pdfium-mac-arm64.tgz", member: "lib/libpdfium.dylib" },
    PlatformAsset { os: "macos", arch: "x86_64", archive: "pdfium-mac-x64.tgz", member: "lib/libpdfium.dylib" },
    PlatformAsset { os: "windows", arch: "x86_64", archive: "pdfium-win-x64.tgz", member: "bin/pdfium.dll" },
    PlatformAsset { os: "windows", arch: "aarch64", archive: "pdfium-win-arm64.tgz", member: "bin/pdfium.dll" },
    PlatformAsset { os: "windows", arch: "x86", archive: "pdfium-win-x86.tgz", member: "bin/pdfium.dll" },
];

/// Look up the release asset for an OS/architecture pair.
pub fn asset_for(os: &str, arch: &str) -> Result<PlatformAsset, PdfiumAutoError> {
    ASSETS
        .iter()
        .find(|a| a.os == os && a.arch == arch)
        .copied()
        .ok_or_else(|| PdfiumAutoError::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        })
}

/// Release asset for the running process.
pub fn current_asset() -> Result<PlatformAsset, PdfiumAutoError> {
    asset_for(std::env::consts::OS, std::env::consts::ARCH)
}

/// Decides where the pdfium library lives and fetches it when missing.
#[derive(Debug, Clone)]
pub struct PdfiumLocator {
    library: Option<PathBuf>,
    cache_dir: PathBuf,
}

impl PdfiumLocator {
    /// Locator honouring `PDFIUM_LIB_PATH` and `PDFIUM_AUTO_CACHE_DIR`.
    pub fn from_env() -> Self {
        let library = std::env::var_os("PDFIUM_LIB_PATH")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let cache_root = std::env::var_os("PDFIUM_AUTO_CACHE_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_cache_root);
        Self {
            library,
            cache_dir: versioned(&cache_root),
        }
    }

    /// Use an explicit library file instead of the cache.
    pub fn with_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.library = Some(path.into());
        self
    }

    /// Use `root` as the cache root; the version sub-directory is appended.
    pub fn with_cache_root(mut self, root: impl AsRef<Path>) -> Self {
        self.cache_dir = versioned(root.as_ref());
        self
    }

    /// Directory the downloaded library is cached in.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of an already available library, without touching the network.
    pub fn installed(&self) -> Option<PathBuf> {
        if let Some(path) = self.library.as_ref().filter(|p| p.exists()) {
            return Some(path.clone());
        }
        let asset = current_asset().ok()?;
        Some(self.cache_dir.join(asset.library_name())).filter(|p| p.exists())
    }

    /// Return the library path, downloading into the cache if needed.
    pub fn ensure(&self, on_progress: Option<ProgressFn<'_>>) -> Result<PathBuf, PdfiumAutoError> {
        if let Some(path) = self.installed() {
            debug!("Using pdfium at {}", path.display());
            return Ok(path);
        }
        if let Some(path) = &self.library {
            warn!(
                "Configured pdfium library '{}' does not exist; falling back to download",
                path.display()
            );
        }

        let asset = current_asset()?;
        let target = self.cache_dir.join(asset.library_name());
        std::fs::create_dir_all(&self.cache_dir).map_err(|source| PdfiumAutoError::CacheDir {
            path: self.cache_dir.clone(),
            source,
        })?;

        let url = asset.download_url();
        info!("Downloading pdfium {} from {}", PDFIUM_VERSION, url);
        let archive = download(&url, on_progress)?;
        unpack_member(&archive, asset.member, &target)?;
        info!("pdfium cached at {}", target.display());

        Ok(target)
    }
}

/// Bind pdfium from an explicit library path.
pub fn bind(path: &Path) -> Result<Pdfium, PdfiumAutoError> {
    Pdfium::bind_to_library(path)
        .map(Pdfium::new)
        .map_err(|e| PdfiumAutoError::Bind {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(std::env::temp_dir)
        .join(CACHE_APP_DIR)
}

fn versioned(root: &Path) -> PathBuf {
    root.join(format!("pdfium-{PDFIUM_VERSION}"))
}

fn download(url: &str, on_progress: Option<ProgressFn<'_>>) -> Result<Vec<u8>, PdfiumAutoError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("pdfium-auto/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| PdfiumAutoError::Download(e.to_string()))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| PdfiumAutoError::Download(format!("GET {url}: {e}")))?;
    if !response.status().is_success() {
        return Err(PdfiumAutoError::Download(format!(
            "HTTP {} for {url}",
            response.status()
        )));
    }

    let total = response.content_length();
    let mut body = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut chunk = vec![0u8; 64 * 1024];
    loop {
        let n = match response.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(PdfiumAutoError::Download(format!("read error: {e}"))),
        };
        body.extend_from_slice(&chunk[..n]);
        if let Some(cb) = on_progress {
            cb(body.len() as u64, total);
        }
    }

    Ok(body)
}

/// Write one member of a `.tgz` archive to `dest`.
fn unpack_member(archive: &[u8], member: &str, dest: &Path) -> Result<(), PdfiumAutoError> {
    let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(archive));
    let entries = tar
        .entries()
        .map_err(|e| PdfiumAutoError::Extract(e.to_string()))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| PdfiumAutoError::Extract(e.to_string()))?;
        let is_member = entry
            .path()
            .map(|p| p.to_string_lossy() == member)
            .map_err(|e| PdfiumAutoError::Extract(e.to_string()))?;
        if is_member {
            entry
                .unpack(dest)
                .map_err(|e| PdfiumAutoError::Extract(format!("unpack {member}: {e}")))?;
            return Ok(());
        }
    }

    Err(PdfiumAutoError::Extract(format!(
        "'{member}' not found in archive"
    )))
}
