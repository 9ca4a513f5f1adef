//! Read-only donation listings.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::Result;
use crate::models::{Donation, DonationItem, Receipt};
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn donations(State(state): State<AppState>) -> Result<Json<Vec<Donation>>> {
    Ok(Json(state.store().list_donations().await?))
}

#[instrument(skip(state))]
pub async fn items(State(state): State<AppState>) -> Result<Json<Vec<DonationItem>>> {
    Ok(Json(state.store().list_donation_items().await?))
}

#[instrument(skip(state))]
pub async fn receipts(State(state): State<AppState>) -> Result<Json<Vec<Receipt>>> {
    Ok(Json(state.store().list_receipts().await?))
}
