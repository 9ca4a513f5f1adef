//! Volunteer registration routes.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, Result, VOLUNTEER_NOT_FOUND_DETAIL};
use crate::extract::{JsonBody, VolunteerPath};
use crate::models::{Message, Volunteer, VolunteerInput};
use crate::state::AppState;

/// Register a volunteer with their agenda.
///
/// Responds 200 with the stored record, including its assigned id.
/// A duplicate email or cpf is rejected with 400.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<VolunteerInput>,
) -> Result<Json<Volunteer>> {
    let volunteer = state.store().create_volunteer(&input).await?;
    tracing::info!(volunteer_id = %volunteer.id, "Volunteer registered");
    Ok(Json(volunteer))
}

/// List every volunteer with their agenda.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Volunteer>>> {
    Ok(Json(state.store().list_volunteers().await?))
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    VolunteerPath(id): VolunteerPath,
) -> Result<Json<Volunteer>> {
    state
        .store()
        .get_volunteer(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(VOLUNTEER_NOT_FOUND_DETAIL.to_string()))
}

/// Overwrite every field of a volunteer and replace their agenda.
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    VolunteerPath(id): VolunteerPath,
    JsonBody(input): JsonBody<VolunteerInput>,
) -> Result<Json<Message>> {
    state.store().update_volunteer(id, &input).await?;
    tracing::info!(volunteer_id = %id, "Volunteer updated");
    Ok(Json(Message::new("Voluntário atualizado com sucesso")))
}

#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    VolunteerPath(id): VolunteerPath,
) -> Result<Json<Message>> {
    state.store().delete_volunteer(id).await?;
    tracing::info!(volunteer_id = %id, "Volunteer deleted");
    Ok(Json(Message::new("Voluntário excluído com sucesso")))
}
