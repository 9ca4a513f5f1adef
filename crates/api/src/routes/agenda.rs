//! Weekly availability of a volunteer.
//!
//! The agenda is always read and written as a whole list; items have no
//! identity of their own.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, Result, VOLUNTEER_NOT_FOUND_DETAIL};
use crate::extract::{JsonBody, VolunteerPath};
use crate::models::{AgendaItem, Message};
use crate::state::AppState;

const EMPTY_AGENDA_DETAIL: &str = "Agenda não encontrada para este voluntário.";

/// Agenda items in insertion order.
///
/// An empty agenda answers 404, the same status as an unknown volunteer;
/// only the detail text tells them apart.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    VolunteerPath(id): VolunteerPath,
) -> Result<Json<Vec<AgendaItem>>> {
    let agenda = state.store().get_agenda(id).await?;
    if !agenda.is_empty() {
        return Ok(Json(agenda));
    }

    if state.store().volunteer_exists(id).await? {
        Err(AppError::NotFound(EMPTY_AGENDA_DETAIL.to_string()))
    } else {
        Err(AppError::NotFound(VOLUNTEER_NOT_FOUND_DETAIL.to_string()))
    }
}

/// Replace the whole agenda with the submitted list.
#[instrument(skip(state, agenda), fields(items = agenda.len()))]
pub async fn replace(
    State(state): State<AppState>,
    VolunteerPath(id): VolunteerPath,
    JsonBody(agenda): JsonBody<Vec<AgendaItem>>,
) -> Result<Json<Message>> {
    state.store().replace_agenda(id, &agenda).await?;
    tracing::info!(volunteer_id = %id, "Agenda replaced");
    Ok(Json(Message::new("Agenda atualizada com sucesso")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::super::test_support::{TestApp, ana};

    async fn create(app: &TestApp, agenda: serde_json::Value) -> i64 {
        let mut body = ana();
        body["agenda"] = agenda;
        let (_, created) = app.post("/voluntarios", body).await;
        created["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_agenda_round_trips_in_order() {
        let app = TestApp::new();
        let agenda = json!([
            {"turno": "morning", "dia_semana": "monday"},
            {"turno": "evening", "dia_semana": "friday"}
        ]);
        let id = create(&app, agenda.clone()).await;

        let (status, body) = app.get(&format!("/agenda/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, agenda);
    }

    #[tokio::test]
    async fn test_replace_fully_replaces() {
        let app = TestApp::new();
        let id = create(
            &app,
            json!([
                {"turno": "morning", "dia_semana": "monday"},
                {"turno": "evening", "dia_semana": "friday"}
            ]),
        )
        .await;

        let replacement = json!([{"turno": "noite", "dia_semana": "sábado"}]);
        let (status, body) = app.put(&format!("/agenda/{id}"), replacement.clone()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mensagem"], "Agenda atualizada com sucesso");

        let (_, body) = app.get(&format!("/agenda/{id}")).await;
        assert_eq!(body, replacement);
    }

    #[tokio::test]
    async fn test_empty_agenda_is_not_found() {
        let app = TestApp::new();
        let id = create(&app, json!([])).await;

        let (status, body) = app.get(&format!("/agenda/{id}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Agenda não encontrada para este voluntário.");

        let (status, body) = app.get("/agenda/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Voluntário não encontrado.");
    }

    #[tokio::test]
    async fn test_replace_for_missing_volunteer_is_not_found() {
        let app = TestApp::new();
        let (status, _) = app.put("/agenda/999", json!([])).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_replace_with_object_body_is_bad_request() {
        let app = TestApp::new();
        let id = create(&app, json!([{"turno": "tarde", "dia_semana": "terça"}])).await;

        let (status, body) = app
            .put(
                &format!("/agenda/{id}"),
                json!({"turno": "noite", "dia_semana": "sábado"}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().starts_with("Requisição inválida"));

        let (_, body) = app.get(&format!("/agenda/{id}")).await;
        assert_eq!(body, json!([{"turno": "tarde", "dia_semana": "terça"}]));
    }

    #[tokio::test]
    async fn test_id_outside_storage_range_is_not_found() {
        let app = TestApp::new();

        let (status, body) = app.get("/agenda/3000000000").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Voluntário não encontrado.");

        let (status, _) = app.put("/agenda/3000000000", json!([])).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_removes_agenda() {
        let app = TestApp::new();
        let id = create(&app, json!([{"turno": "tarde", "dia_semana": "terça"}])).await;

        app.delete(&format!("/voluntarios/{id}")).await;

        let (status, _) = app.get(&format!("/agenda/{id}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
