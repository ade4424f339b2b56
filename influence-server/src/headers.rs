use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use http::header::{CACHE_CONTROL, LOCATION, PRAGMA, REFERRER_POLICY};
use http::StatusCode;

/// Cache-Control directives
#[derive(Debug, Clone, Default)]
pub struct CacheControl {
    pub no_cache: bool,
    pub no_store: bool,
    pub private: bool,
}

impl CacheControl {
    /// Create a new CacheControl instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Set no-cache directive
    pub fn no_cache(mut self) -> Self {
        self.no_cache = true;
        self
    }

    /// Set no-store directive
    pub fn no_store(mut self) -> Self {
        self.no_store = true;
        self
    }

    /// Set private directive
    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    /// Convert to HeaderValue
    pub fn to_header_value(&self) -> HeaderValue {
        let mut parts = Vec::new();

        if self.no_cache {
            parts.push("no-cache".to_string());
        }
        if self.no_store {
            parts.push("no-store".to_string());
        }
        if self.private {
            parts.push("private".to_string());
        }

        HeaderValue::from_str(&parts.join(", "))
            .unwrap_or_else(|_| HeaderValue::from_static("no-store"))
    }
}

/// A 302 redirect that must not be cached or leak through the Referer header.
/// Used for every redirect that carries OAuth parameters.
pub fn sensitive_redirect(location: &str) -> Response {
    let location = match HeaderValue::from_str(location) {
        Ok(value) => value,
        Err(e) => {
            log::error!("Refusing to redirect to an invalid location: {}", e);
            return crate::errors::ApiError::internal("Failed to build redirect").into_response();
        }
    };

    let cache_control = CacheControl::new().no_store().no_cache().private();
    (
        StatusCode::FOUND,
        [
            (LOCATION, location),
            (CACHE_CONTROL, cache_control.to_header_value()),
            (PRAGMA, HeaderValue::from_static("no-cache")),
            (REFERRER_POLICY, HeaderValue::from_static("no-referrer")),
        ],
    )
        .into_response()
}
