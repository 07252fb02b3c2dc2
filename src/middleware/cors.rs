use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use crate::error::{Error, Result};

pub fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any)
}

/// Restricts cross-origin access to `origin` when one is configured.
pub fn cors_layer(origin: Option<&str>) -> Result<CorsLayer> {
    match origin {
        None => Ok(permissive_cors()),
        Some(origin) => {
            let value = HeaderValue::from_str(origin).map_err(|e| {
                Error::Config(format!("Invalid value for CORS_ALLOWED_ORIGIN: {}", e))
            })?;
            Ok(CorsLayer::new()
                .allow_methods(Any)
                .allow_headers(Any)
                .allow_origin(value))
        }
    }
}
