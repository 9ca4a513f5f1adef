//! Loading donation records from fixture files.
//!
//! The HTTP API never writes donations, items, or receipts. This module
//! fills those tables from a YAML fixture (see `vol-cli seed`).
//!
//! ```yaml
//! donations:
//!   - volunteer_id: 1
//!     donated_on: 2025-03-14
//!     status: recebida
//!     items:
//!       - category: alimento
//!         name: arroz
//!         quantity: 10
//!     receipts:
//!       - received_on: 2025-03-15
//!         confirmed_by: Carla
//! ```

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use voluntarios_core::{DonationId, VolunteerId};

use super::RepositoryError;

/// Top-level fixture document.
#[derive(Debug, Clone, Deserialize)]
pub struct DonationFixtures {
    #[serde(default)]
    pub donations: Vec<DonationFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DonationFixture {
    pub volunteer_id: VolunteerId,
    pub donated_on: NaiveDate,
    pub status: String,
    #[serde(default)]
    pub items: Vec<ItemFixture>,
    #[serde(default)]
    pub receipts: Vec<ReceiptFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemFixture {
    pub category: String,
    pub name: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptFixture {
    pub received_on: NaiveDate,
    #[serde(default)]
    pub confirmed_by: Option<String>,
    #[serde(default)]
    pub observation: Option<String>,
}

/// Row counts written by a seed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedResult {
    pub donations: usize,
    pub items: usize,
    pub receipts: usize,
}

/// Check a fixture document before touching the database.
///
/// Returns one message per problem; an empty list means the fixtures are valid.
#[must_use]
pub fn validate_fixtures(fixtures: &DonationFixtures) -> Vec<String> {
    let mut errors = Vec::new();

    for (i, donation) in fixtures.donations.iter().enumerate() {
        if donation.status.trim().is_empty() {
            errors.push(format!("Donation {i}: empty status"));
        }

        for (j, item) in donation.items.iter().enumerate() {
            if item.name.trim().is_empty() {
                errors.push(format!("Donation {i}, item {j}: empty name"));
            }
            if item.quantity <= 0 {
                errors.push(format!(
                    "Donation {i}, item {j}: quantity must be positive, got {}",
                    item.quantity
                ));
            }
        }

        for (j, receipt) in donation.receipts.iter().enumerate() {
            if receipt.received_on < donation.donated_on {
                errors.push(format!(
                    "Donation {i}, receipt {j}: received {} before donation date {}",
                    receipt.received_on, donation.donated_on
                ));
            }
        }
    }

    errors
}

/// Insert every fixture in one transaction.
///
/// With `clear_existing`, the three donation tables are truncated first and
/// their identity sequences restarted.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if any statement fails; nothing is
/// written in that case.
#[instrument(skip(pool, fixtures), fields(donations = fixtures.donations.len()))]
pub async fn seed_donations(
    pool: &PgPool,
    fixtures: &DonationFixtures,
    clear_existing: bool,
) -> Result<SeedResult, RepositoryError> {
    let mut tx = pool.begin().await?;
    let mut result = SeedResult::default();

    if clear_existing {
        sqlx::query("TRUNCATE recebimentos, itens_doacao, doacoes RESTART IDENTITY")
            .execute(&mut *tx)
            .await?;
        tracing::info!("Cleared existing donation records");
    }

    for donation in &fixtures.donations {
        let donation_id = insert_donation(&mut tx, donation).await?;
        result.donations += 1;

        for item in &donation.items {
            sqlx::query(
                r"
                INSERT INTO itens_doacao (id_doacao, categoria, item_nome, quantidade)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(donation_id)
            .bind(&item.category)
            .bind(&item.name)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
            result.items += 1;
        }

        for receipt in &donation.receipts {
            sqlx::query(
                r"
                INSERT INTO recebimentos (id_doacao, data_recebido, confirmado_por, observacao)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(donation_id)
            .bind(receipt.received_on)
            .bind(receipt.confirmed_by.as_deref())
            .bind(receipt.observation.as_deref())
            .execute(&mut *tx)
            .await?;
            result.receipts += 1;
        }
    }

    tx.commit().await?;
    Ok(result)
}

async fn insert_donation(
    conn: &mut PgConnection,
    donation: &DonationFixture,
) -> Result<DonationId, sqlx::Error> {
    sqlx::query_scalar(
        r"
        INSERT INTO doacoes (id_usuario, data_doacao, status)
        VALUES ($1, $2, $3)
        RETURNING id_doacao
        ",
    )
    .bind(donation.volunteer_id)
    .bind(donation.donated_on)
    .bind(&donation.status)
    .fetch_one(conn)
    .await
}
