//! Donation repository for database operations.
//!
//! Read-only scans over `doacoes`, `itens_doacao`, and `recebimentos`.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::{Donation, DonationItem, Receipt};

/// Repository for donation-related reads.
pub struct DonationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DonationRepository<'a> {
    /// Create a new donation repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every donation, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_donations(&self) -> Result<Vec<Donation>, RepositoryError> {
        let donations = sqlx::query_as::<_, Donation>(
            r"
            SELECT id_doacao, id_usuario, data_doacao, status
            FROM doacoes
            ORDER BY id_doacao
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(donations)
    }

    /// List every donation item, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_items(&self) -> Result<Vec<DonationItem>, RepositoryError> {
        let items = sqlx::query_as::<_, DonationItem>(
            r"
            SELECT id_item, id_doacao, categoria, item_nome, quantidade
            FROM itens_doacao
            ORDER BY id_item
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// List every receipt, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_receipts(&self) -> Result<Vec<Receipt>, RepositoryError> {
        let receipts = sqlx::query_as::<_, Receipt>(
            r"
            SELECT id_recebimento, id_doacao, data_recebido, confirmado_por, observacao
            FROM recebimentos
            ORDER BY id_recebimento
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(receipts)
    }
}
