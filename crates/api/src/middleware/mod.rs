//! HTTP middleware stack for the API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, transaction per route)
//! 2. `TraceLayer` (request span with method, path, and `request_id` field)
//! 3. Request ID (reuse or generate `x-request-id`)
//! 4. CORS (policy from `CorsConfig`)

pub mod cors;
pub mod request_id;

pub use cors::cors_layer;
pub use request_id::request_id_middleware;
