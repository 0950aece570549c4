use axum::body::Body;
use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::AppError;

/// Header carrying the API key on `/api` requests.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Authentication configuration.
#[derive(Clone, Default)]
pub struct AuthConfig {
    /// Required `X-API-Key` value. None = auth disabled.
    pub api_key: Option<String>,
}

impl AuthConfig {
    /// Whether `headers` satisfy this config.
    pub fn allows(&self, headers: &HeaderMap) -> bool {
        let Some(ref expected) = self.api_key else {
            return true;
        };
        headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|provided| provided == expected)
    }
}

/// Axum middleware that validates the `X-API-Key` header.
/// If no key is configured (`AuthConfig::api_key` is None), all requests are
/// allowed through.
pub async fn api_key_middleware(
    headers: HeaderMap,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_config = request
        .extensions()
        .get::<AuthConfig>()
        .cloned()
        .unwrap_or_default();

    if !auth_config.allows(&headers) {
        tracing::debug!(path = %request.uri().path(), "Rejected request with bad API key");
        return Err(AppError::Unauthorized("invalid API key".to_string()));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(key: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(API_KEY_HEADER, HeaderValue::from_str(key).unwrap());
        h
    }

    #[test]
    fn disabled_auth_allows_everything() {
        let cfg = AuthConfig::default();
        assert!(cfg.allows(&HeaderMap::new()));
        assert!(cfg.allows(&headers_with("anything")));
    }

    #[test]
    fn configured_key_must_match() {
        let cfg = AuthConfig {
            api_key: Some("k1".to_string()),
        };
        assert!(cfg.allows(&headers_with("k1")));
        assert!(!cfg.allows(&headers_with("k2")));
        assert!(!cfg.allows(&HeaderMap::new()));
    }
}
