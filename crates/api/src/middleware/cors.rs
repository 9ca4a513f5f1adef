//! CORS layer built from [`CorsConfig`].
//!
//! Invalid entries are logged and skipped. When credentials are allowed,
//! wildcards are replaced by mirroring the request, since browsers reject
//! `*` together with `Access-Control-Allow-Credentials`.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::{AllowList, CorsConfig};

/// Build the CORS layer for the router.
#[must_use]
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let credentials = config.allow_credentials;

    let origin = match &config.allowed_origins {
        AllowList::Any if credentials => AllowOrigin::mirror_request(),
        AllowList::Any => AllowOrigin::any(),
        AllowList::List(items) => AllowOrigin::list(parse_entries::<HeaderValue>(
            items,
            "CORS_ALLOWED_ORIGINS",
        )),
    };

    let methods = match &config.allowed_methods {
        AllowList::Any if credentials => AllowMethods::mirror_request(),
        AllowList::Any => AllowMethods::any(),
        AllowList::List(items) => {
            AllowMethods::list(parse_entries::<Method>(items, "CORS_ALLOWED_METHODS"))
        }
    };

    let headers = match &config.allowed_headers {
        AllowList::Any if credentials => AllowHeaders::mirror_request(),
        AllowList::Any => AllowHeaders::any(),
        AllowList::List(items) => {
            AllowHeaders::list(parse_entries::<HeaderName>(items, "CORS_ALLOWED_HEADERS"))
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(credentials)
}

fn parse_entries<T>(items: &[String], var: &str) -> Vec<T>
where
    for<'a> T: TryFrom<&'a str>,
{
    items
        .iter()
        .filter_map(|item| match T::try_from(item.as_str()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid {} entry: {}", var, item);
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    use super::*;

    async fn preflight(config: &CorsConfig, origin: &str) -> axum::http::HeaderMap {
        let app = Router::new()
            .route("/voluntarios", get(|| async { "ok" }))
            .layer(cors_layer(config));

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/voluntarios")
                    .header("origin", origin)
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        response.headers().clone()
    }

    #[tokio::test]
    async fn test_permissive_allows_any_origin() {
        let headers = preflight(&CorsConfig::permissive(), "https://front.example").await;
        assert_eq!(headers["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_credentials_mirror_origin() {
        let config = CorsConfig {
            allow_credentials: true,
            ..CorsConfig::permissive()
        };
        let headers = preflight(&config, "https://front.example").await;
        assert_eq!(headers["access-control-allow-origin"], "https://front.example");
        assert_eq!(headers["access-control-allow-credentials"], "true");
    }

    #[tokio::test]
    async fn test_origin_list_rejects_unknown_origin() {
        let config = CorsConfig {
            allowed_origins: AllowList::List(vec!["https://front.example".to_string()]),
            ..CorsConfig::permissive()
        };

        let allowed = preflight(&config, "https://front.example").await;
        assert_eq!(allowed["access-control-allow-origin"], "https://front.example");

        let denied = preflight(&config, "https://evil.example").await;
        assert!(denied.get("access-control-allow-origin").is_none());
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        let methods: Vec<Method> = parse_entries(
            &["GET".to_string(), "NOT A METHOD".to_string()],
            "CORS_ALLOWED_METHODS",
        );
        assert_eq!(methods, vec![Method::GET]);
    }
}
