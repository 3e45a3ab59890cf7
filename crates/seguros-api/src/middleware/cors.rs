//! # CORS
//!
//! Any method and any header are allowed. Origins come from
//! `ALLOWED_ORIGINS`; an empty list or a `*` entry allows any origin.

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Build the CORS layer for the configured origins.
pub fn layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn app(origins: &[&str]) -> Router {
        let origins: Vec<String> = origins.iter().map(|o| o.to_string()).collect();
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(layer(&origins))
    }

    async fn allow_origin(app: Router, origin: &str) -> Option<String> {
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn unset_allows_any_origin() {
        let got = allow_origin(app(&[]), "http://anywhere.test").await;
        assert_eq!(got.as_deref(), Some("*"));
    }

    #[tokio::test]
    async fn wildcard_entry_allows_any_origin() {
        let got = allow_origin(app(&["http://a.test", "*"]), "http://b.test").await;
        assert_eq!(got.as_deref(), Some("*"));
    }

    #[tokio::test]
    async fn listed_origin_is_echoed() {
        let got = allow_origin(app(&["http://localhost:4200"]), "http://localhost:4200").await;
        assert_eq!(got.as_deref(), Some("http://localhost:4200"));
    }

    #[tokio::test]
    async fn unlisted_origin_gets_no_header() {
        let got = allow_origin(app(&["http://localhost:4200"]), "http://evil.test").await;
        assert_eq!(got, None);
    }
}
