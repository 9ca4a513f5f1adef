//! `PostgreSQL`-backed [`Store`].

use async_trait::async_trait;
use sqlx::PgPool;

use voluntarios_core::VolunteerId;

use super::{DonationRepository, RepositoryError, Store, VolunteerRepository};
use crate::models::{AgendaItem, Donation, DonationItem, Receipt, Volunteer, VolunteerInput};

/// Production store. Each call checks a connection out of the pool for the
/// duration of the call and returns it on drop, on success or failure.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    const fn volunteers(&self) -> VolunteerRepository<'_> {
        VolunteerRepository::new(&self.pool)
    }

    const fn donations(&self) -> DonationRepository<'_> {
        DonationRepository::new(&self.pool)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_volunteer(&self, input: &VolunteerInput) -> Result<Volunteer, RepositoryError> {
        self.volunteers().create(input).await
    }

    async fn list_volunteers(&self) -> Result<Vec<Volunteer>, RepositoryError> {
        self.volunteers().list().await
    }

    async fn get_volunteer(&self, id: VolunteerId) -> Result<Option<Volunteer>, RepositoryError> {
        self.volunteers().get_by_id(id).await
    }

    async fn update_volunteer(
        &self,
        id: VolunteerId,
        input: &VolunteerInput,
    ) -> Result<(), RepositoryError> {
        self.volunteers().update(id, input).await
    }

    async fn delete_volunteer(&self, id: VolunteerId) -> Result<(), RepositoryError> {
        self.volunteers().delete(id).await
    }

    async fn volunteer_exists(&self, id: VolunteerId) -> Result<bool, RepositoryError> {
        self.volunteers().exists(id).await
    }

    async fn get_agenda(&self, id: VolunteerId) -> Result<Vec<AgendaItem>, RepositoryError> {
        self.volunteers().agenda(id).await
    }

    async fn replace_agenda(
        &self,
        id: VolunteerId,
        agenda: &[AgendaItem],
    ) -> Result<(), RepositoryError> {
        self.volunteers().replace_agenda(id, agenda).await
    }

    async fn list_donations(&self) -> Result<Vec<Donation>, RepositoryError> {
        self.donations().list_donations().await
    }

    async fn list_donation_items(&self) -> Result<Vec<DonationItem>, RepositoryError> {
        self.donations().list_items().await
    }

    async fn list_receipts(&self) -> Result<Vec<Receipt>, RepositoryError> {
        self.donations().list_receipts().await
    }
}
