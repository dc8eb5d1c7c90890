use std::env;

/// Application-level constants
pub const APP_NAME: &str = "MediSage";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default remote API base URL (local dev server).
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Environment variable overriding the API base URL.
pub const API_BASE_ENV: &str = "MEDISAGE_API_URL";

/// Media types accepted for report upload. The server also accepts the
/// unregistered `image/jpg` alias; `is_supported_media_type` treats it as
/// `image/jpeg` on input but it is never relied upon server-side.
pub const ACCEPTED_MEDIA_TYPES: &[&str] = &["application/pdf", "image/png", "image/jpeg"];

/// Maximum report size accepted client-side (10 MB). The server remains the
/// enforcement authority; this guard rejects before any bytes leave the
/// machine.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "info,medisage_core=debug".to_string()
}

/// Whether a declared media type is accepted for upload.
/// `image/jpg` is normalized to `image/jpeg` before the check.
pub fn is_supported_media_type(media_type: &str) -> bool {
    let normalized = if media_type.eq_ignore_ascii_case("image/jpg") {
        "image/jpeg"
    } else {
        media_type
    };
    ACCEPTED_MEDIA_TYPES
        .iter()
        .any(|t| normalized.eq_ignore_ascii_case(t))
}

/// Remote API connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Create a config pointing at an explicit base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve from `MEDISAGE_API_URL`, falling back to the local default.
    pub fn from_env() -> Self {
        match env::var(API_BASE_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(&url),
            _ => Self::new(DEFAULT_API_BASE),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}
