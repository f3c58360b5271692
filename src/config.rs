//! Service configuration.
//!
//! [`ServiceConfig`] is built once at startup (usually from CLI flags and
//! environment variables) and shared read-only by every request through
//! [`crate::server::AppState`]. Nothing in it changes per request.

use crate::error::SplitError;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Rendering resolution used for page images unless overridden.
pub const DEFAULT_DPI: u32 = 200;

/// Default request body limit: 64 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Configuration for the split service.
///
/// # Example
/// ```rust
/// use pdfsplit::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .port(8080)
///     .dpi(150)
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 150);
/// ```
#[derive(Clone)]
pub struct ServiceConfig {
    /// Bind address. Default: `0.0.0.0`.
    pub host: String,

    /// Listen port. Default: 5000.
    pub port: u16,

    /// Page image resolution. Range: 72–600. Default: 200.
    pub dpi: u32,

    /// Largest accepted request body in bytes. Default: 64 MiB.
    ///
    /// The body is base64, so the largest PDF accepted is roughly three
    /// quarters of this.
    pub max_body_bytes: usize,

    /// Explicit pdfium shared library. If None, the library is located (and
    /// downloaded if necessary) by `pdfium-auto` at startup.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Session signing secret. Kept for deployment parity; never read by the
    /// split pipeline.
    pub session_secret: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            dpi: DEFAULT_DPI,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            pdfium_lib_path: None,
            session_secret: "dev-secret-key".to_string(),
        }
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dpi", &self.dpi)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field("session_secret", &"<redacted>")
            .finish()
    }
}

impl ServiceConfig {
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder {
            config: Self::default(),
        }
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, SplitError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| SplitError::Internal(format!("invalid bind address: {e}")))
    }
}

#[derive(Debug)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn max_body_bytes(mut self, bytes: usize) -> Self {
        self.config.max_body_bytes = bytes;
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn session_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.session_secret = secret.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServiceConfig, SplitError> {
        let c = &self.config;
        if c.max_body_bytes == 0 {
            return Err(SplitError::Internal(
                "max_body_bytes must be greater than zero".into(),
            ));
        }
        if c.host.trim().is_empty() {
            return Err(SplitError::Internal("host must not be empty".into()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_render_at_200_dpi() {
        let config = ServiceConfig::default();
        assert_eq!(config.dpi, 200);
        assert_eq!(config.port, 5000);
        assert_eq!(config.max_body_bytes, 64 * 1024 * 1024);
        assert!(config.pdfium_lib_path.is_none());
    }

    #[test]
    fn builder_clamps_dpi() {
        let config = ServiceConfig::builder().dpi(10).build().unwrap();
        assert_eq!(config.dpi, 72);
        let config = ServiceConfig::builder().dpi(5000).build().unwrap();
        assert_eq!(config.dpi, 600);
    }

    #[test]
    fn builder_rejects_zero_body_limit() {
        assert!(ServiceConfig::builder().max_body_bytes(0).build().is_err());
    }

    #[test]
    fn debug_redacts_secret() {
        let config = ServiceConfig::builder()
            .session_secret("hunter2")
            .build()
            .unwrap();
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn bind_addr_parses() {
        let config = ServiceConfig::builder()
            .host("127.0.0.1")
            .port(8080)
            .build()
            .unwrap();
        assert_eq!(config.bind_addr().unwrap().port(), 8080);
    }
}
