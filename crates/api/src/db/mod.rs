//! Database operations for the volunteer and donation service.
//!
//! # Database: `voluntarios`
//!
//! ## Tables
//!
//! - `usuarios` - Registered volunteers (unique `email` and `cpf`)
//! - `agenda_voluntario` - Weekly availability, owned by a volunteer
//! - `doacoes` - Donations (read-only through the API)
//! - `itens_doacao` - Donation line items (read-only)
//! - `recebimentos` - Donation receipts (read-only)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p voluntarios-cli -- migrate
//! ```
//!
//! # Storage backends
//!
//! Handlers talk to a [`Store`]. [`PgStore`] is the production backend;
//! [`MemoryStore`] keeps everything in process and backs the router tests.

pub mod donations;
pub mod memory;
pub mod postgres;
pub mod seed;
pub mod volunteers;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use voluntarios_core::VolunteerId;

use crate::config::DatabaseConfig;
use crate::models::{AgendaItem, Donation, DonationItem, Receipt, Volunteer, VolunteerInput};

pub use donations::DonationRepository;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use seed::{DonationFixtures, SeedResult, seed_donations, validate_fixtures};
pub use volunteers::VolunteerRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Storage operations behind every HTTP handler.
///
/// Each write operation is atomic: it either applies every statement or
/// none of them.
#[async_trait]
pub trait Store: Send + Sync {
    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Insert a volunteer and their agenda.
    ///
    /// Fails with `Conflict` if another volunteer already uses the email or cpf.
    async fn create_volunteer(&self, input: &VolunteerInput) -> Result<Volunteer, RepositoryError>;

    /// All volunteers with their agendas, ordered by id.
    async fn list_volunteers(&self) -> Result<Vec<Volunteer>, RepositoryError>;

    async fn get_volunteer(&self, id: VolunteerId) -> Result<Option<Volunteer>, RepositoryError>;

    /// Overwrite every field and replace the agenda.
    ///
    /// Fails with `NotFound` for an unknown id and `Conflict` if the new
    /// email or cpf belongs to another volunteer.
    async fn update_volunteer(
        &self,
        id: VolunteerId,
        input: &VolunteerInput,
    ) -> Result<(), RepositoryError>;

    /// Remove a volunteer and their agenda. Fails with `NotFound` for an unknown id.
    async fn delete_volunteer(&self, id: VolunteerId) -> Result<(), RepositoryError>;

    async fn volunteer_exists(&self, id: VolunteerId) -> Result<bool, RepositoryError>;

    /// Agenda items in insertion order. Empty for unknown volunteers.
    async fn get_agenda(&self, id: VolunteerId) -> Result<Vec<AgendaItem>, RepositoryError>;

    /// Delete the whole agenda and insert `agenda`. Fails with `NotFound` for an unknown id.
    async fn replace_agenda(
        &self,
        id: VolunteerId,
        agenda: &[AgendaItem],
    ) -> Result<(), RepositoryError>;

    async fn list_donations(&self) -> Result<Vec<Donation>, RepositoryError>;

    async fn list_donation_items(&self) -> Result<Vec<DonationItem>, RepositoryError>;

    async fn list_receipts(&self) -> Result<Vec<Receipt>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool from configuration.
///
/// # Errors
///
/// Returns `sqlx::Error` if the target is invalid or the connection cannot be established.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(config.connect_options()?)
        .await
}

/// Map unique-constraint violations to `Conflict`, everything else to `Database`.
pub(crate) fn map_unique_violation(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(err)
}
