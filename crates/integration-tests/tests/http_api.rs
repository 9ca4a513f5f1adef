//! End-to-end tests against a running API server.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database
//! - The API server running (cargo run -p voluntarios-api)
//!
//! Set `VOLUNTARIOS_BASE_URL` if the server is not on `http://127.0.0.1:8000`.

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use voluntarios_integration_tests::{base_url, volunteer_body};

async fn create(client: &Client, body: &Value) -> Value {
    let resp = client
        .post(format!("{}/voluntarios", base_url()))
        .json(body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.unwrap()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
#[ignore = "Requires running voluntarios-api server"]
async fn test_health_and_readiness() {
    let client = Client::new();

    let resp = client.get(format!("{}/health", base_url())).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = client
        .get(format!("{}/health/ready", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Volunteers
// ============================================================================

#[tokio::test]
#[ignore = "Requires running voluntarios-api server"]
async fn test_volunteer_lifecycle() {
    let client = Client::new();
    let body = volunteer_body("Ana");

    let created = create(&client, &body).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["nome"], "Ana");
    assert_eq!(created["agenda"], body["agenda"]);

    let resp = client
        .get(format!("{}/voluntarios/{id}", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched, created);

    let resp = client
        .delete(format!("{}/voluntarios/{id}", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let message: Value = resp.json().await.unwrap();
    assert_eq!(message["mensagem"], "Voluntário excluído com sucesso");

    let resp = client
        .get(format!("{}/voluntarios/{id}", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running voluntarios-api server"]
async fn test_duplicate_registration_is_bad_request() {
    let client = Client::new();
    let body = volunteer_body("Ana");
    let created = create(&client, &body).await;

    let resp = client
        .post(format!("{}/voluntarios", base_url()))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: Value = resp.json().await.unwrap();
    assert_eq!(error["detail"], "CPF ou e-mail já cadastrado.");

    let id = created["id"].as_i64().unwrap();
    client
        .delete(format!("{}/voluntarios/{id}", base_url()))
        .send()
        .await
        .unwrap();
}

// ============================================================================
// Agenda
// ============================================================================

#[tokio::test]
#[ignore = "Requires running voluntarios-api server"]
async fn test_agenda_replace() {
    let client = Client::new();
    let created = create(&client, &volunteer_body("Ana")).await;
    let id = created["id"].as_i64().unwrap();

    let agenda = json!([
        {"turno": "morning", "dia_semana": "monday"},
        {"turno": "evening", "dia_semana": "friday"}
    ]);
    let resp = client
        .put(format!("{}/agenda/{id}", base_url()))
        .json(&agenda)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/agenda/{id}", base_url()))
        .send()
        .await
        .unwrap();
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched, agenda);

    let resp = client
        .put(format!("{}/agenda/{id}", base_url()))
        .json(&json!([]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/agenda/{id}", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    client
        .delete(format!("{}/voluntarios/{id}", base_url()))
        .send()
        .await
        .unwrap();
}

// ============================================================================
// Donations
// ============================================================================

#[tokio::test]
#[ignore = "Requires running voluntarios-api server"]
async fn test_donation_listings_are_arrays() {
    let client = Client::new();
    for path in ["doacoes", "itens_doacao", "recebimentos"] {
        let resp = client
            .get(format!("{}/{path}", base_url()))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        assert!(body.is_array());
    }
}
