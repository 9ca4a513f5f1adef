//! HTTP route handlers for the volunteer and donation API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                - Liveness check
//! GET    /health/ready          - Readiness check (store ping)
//!
//! # Volunteers
//! POST   /voluntarios           - Register volunteer with agenda
//! GET    /voluntarios           - List volunteers
//! GET    /voluntarios/{id}      - Volunteer detail
//! PUT    /voluntarios/{id}      - Overwrite volunteer and agenda
//! DELETE /voluntarios/{id}      - Delete volunteer and agenda
//!
//! # Agenda
//! GET    /agenda/{id}           - Volunteer's agenda (404 when empty)
//! PUT    /agenda/{id}           - Replace volunteer's agenda
//!
//! # Donations (read-only)
//! GET    /doacoes               - Donations
//! GET    /itens_doacao          - Donation items
//! GET    /recebimentos          - Receipts
//! ```

pub mod agenda;
pub mod donations;
pub mod health;
pub mod volunteers;

use axum::{Router, extract::Request, middleware, routing::get};
use tower_http::trace::TraceLayer;

use crate::middleware::{cors_layer, request_id_middleware};
use crate::state::AppState;

/// Create the volunteer routes router.
pub fn volunteer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(volunteers::index).post(volunteers::create))
        .route(
            "/{id}",
            get(volunteers::show)
                .put(volunteers::update)
                .delete(volunteers::destroy),
        )
}

/// Create the agenda routes router.
pub fn agenda_routes() -> Router<AppState> {
    Router::new().route("/{id}", get(agenda::show).put(agenda::replace))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/voluntarios", volunteer_routes())
        .nest("/agenda", agenda_routes())
        .route("/doacoes", get(donations::donations))
        .route("/itens_doacao", get(donations::items))
        .route("/recebimentos", get(donations::receipts))
}

/// Build the complete application with its middleware stack.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config().cors);

    routes()
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .layer(cors)
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{Method, StatusCode};

    use super::test_support::TestApp;

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = TestApp::new();

        let (status, _) = app.get("/health").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app.get("/health/ready").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_rejected() {
        let app = TestApp::new();
        let (status, body) = app.get("/voluntarios/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().starts_with("Identificador inválido"));

        let (status, body) = app.get("/agenda/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_method_is_rejected() {
        let app = TestApp::new();
        let (status, _) = app.request(Method::PATCH, "/voluntarios/1", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
