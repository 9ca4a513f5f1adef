//! Integration tests for the volunteer service.
//!
//! # Running Tests
//!
//! ```bash
//! # Database-backed store tests
//! export VOLUNTARIOS_TEST_DATABASE_URL=postgres://localhost/voluntarios_test
//! cargo test -p voluntarios-integration-tests -- --ignored
//!
//! # HTTP tests also need a running server
//! export VOLUNTARIOS_BASE_URL=http://127.0.0.1:8000
//! cargo run -p voluntarios-api
//! ```
//!
//! # Test Categories
//!
//! - `postgres_store` - `PgStore` against a real database (migrations applied on connect)
//! - `http_api` - End-to-end requests against a running server

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

use voluntarios_api::models::{AgendaItem, VolunteerInput};

/// Environment variable holding the test database URL.
pub const TEST_DATABASE_URL_VAR: &str = "VOLUNTARIOS_TEST_DATABASE_URL";

/// Base URL for the running API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("VOLUNTARIOS_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string())
}

/// Connect to the test database and apply all migrations.
///
/// # Panics
///
/// Panics if the URL is unset, the database is unreachable, or a migration fails.
pub async fn test_pool() -> PgPool {
    let url = std::env::var(TEST_DATABASE_URL_VAR)
        .map(SecretString::from)
        .unwrap_or_else(|_| panic!("{TEST_DATABASE_URL_VAR} must be set"));

    let pool = PgPool::connect(url.expose_secret())
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../api/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Short unique suffix so parallel tests never collide on email or cpf.
#[must_use]
pub fn unique_suffix() -> String {
    Uuid::new_v4().simple().to_string()
}

/// A volunteer input with a unique email and cpf.
#[must_use]
pub fn volunteer_input(name: &str, agenda: Vec<AgendaItem>) -> VolunteerInput {
    let suffix = unique_suffix();
    VolunteerInput {
        name: name.to_string(),
        email: format!("{}-{suffix}@example.com", name.to_lowercase()),
        phone: None,
        cpf: suffix,
        rg: None,
        postal_code: None,
        address: None,
        agenda,
    }
}

/// JSON body for `POST /voluntarios` with a unique email and cpf.
#[must_use]
pub fn volunteer_body(name: &str) -> Value {
    let suffix = unique_suffix();
    json!({
        "nome": name,
        "email": format!("{}-{suffix}@example.com", name.to_lowercase()),
        "cpf": suffix,
        "agenda": [{"turno": "tarde", "dia_semana": "terça"}]
    })
}
