//! Volunteer repository for database operations.
//!
//! Covers the `usuarios` table and its owned `agenda_voluntario` rows.
//! Every write runs in a single transaction; returning early drops the
//! transaction, which rolls back anything already issued.

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use voluntarios_core::VolunteerId;

use super::{RepositoryError, map_unique_violation};
use crate::models::{AgendaItem, Volunteer, VolunteerInput};

/// Database row for `usuarios`. Optional columns stay optional here and
/// are flattened to empty strings in [`Volunteer`].
#[derive(Debug, sqlx::FromRow)]
struct VolunteerRow {
    id_usuario: VolunteerId,
    nome: String,
    email: String,
    telefone: Option<String>,
    cpf: String,
    rg: Option<String>,
    cep: Option<String>,
    endereco: Option<String>,
}

impl VolunteerRow {
    fn into_volunteer(self, agenda: Vec<AgendaItem>) -> Volunteer {
        Volunteer {
            id: self.id_usuario,
            name: self.nome,
            email: self.email,
            phone: self.telefone.unwrap_or_default(),
            cpf: self.cpf,
            rg: self.rg.unwrap_or_default(),
            postal_code: self.cep.unwrap_or_default(),
            address: self.endereco.unwrap_or_default(),
            agenda,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AgendaRow {
    id_usuario: VolunteerId,
    turno: String,
    dia_semana: String,
}

/// Repository for volunteer database operations.
pub struct VolunteerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VolunteerRepository<'a> {
    /// Create a new volunteer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a volunteer and their agenda.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email or cpf is already registered.
    /// Returns `RepositoryError::Database` for other database errors.
    #[tracing::instrument(skip_all)]
    pub async fn create(&self, input: &VolunteerInput) -> Result<Volunteer, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if email_or_cpf_taken(&mut tx, input, None).await? {
            return Err(RepositoryError::Conflict(
                "email or cpf already registered".to_owned(),
            ));
        }

        let id: VolunteerId = sqlx::query_scalar(
            r"
            INSERT INTO usuarios (nome, email, telefone, cpf, rg, cep, endereco)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id_usuario
            ",
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(input.phone.as_deref())
        .bind(&input.cpf)
        .bind(input.rg.as_deref())
        .bind(input.postal_code.as_deref())
        .bind(input.address.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "email or cpf"))?;

        insert_agenda(&mut tx, id, &input.agenda).await?;

        tx.commit().await?;

        tracing::debug!(volunteer_id = %id, agenda_items = input.agenda.len(), "volunteer inserted");
        Ok(Volunteer::from_input(id, input.clone()))
    }

    /// List every volunteer with their agenda, ordered by id.
    ///
    /// Agendas are loaded with one query and grouped in memory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self) -> Result<Vec<Volunteer>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;

        let rows: Vec<VolunteerRow> = sqlx::query_as(
            r"
            SELECT id_usuario, nome, email, telefone, cpf, rg, cep, endereco
            FROM usuarios
            ORDER BY id_usuario
            ",
        )
        .fetch_all(&mut *conn)
        .await?;

        let agenda_rows: Vec<AgendaRow> = sqlx::query_as(
            r"
            SELECT id_usuario, turno, dia_semana
            FROM agenda_voluntario
            ORDER BY id_usuario, id_agenda
            ",
        )
        .fetch_all(&mut *conn)
        .await?;

        let mut agendas: HashMap<VolunteerId, Vec<AgendaItem>> = HashMap::new();
        for row in agenda_rows {
            agendas
                .entry(row.id_usuario)
                .or_default()
                .push(AgendaItem::new(row.turno, row.dia_semana));
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let agenda = agendas.remove(&row.id_usuario).unwrap_or_default();
                row.into_volunteer(agenda)
            })
            .collect())
    }

    /// Get a volunteer by ID, with their agenda.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_id(&self, id: VolunteerId) -> Result<Option<Volunteer>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;

        let row: Option<VolunteerRow> = sqlx::query_as(
            r"
            SELECT id_usuario, nome, email, telefone, cpf, rg, cep, endereco
            FROM usuarios
            WHERE id_usuario = $1
            ",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let agenda = fetch_agenda(&mut conn, id).await?;
        Ok(Some(row.into_volunteer(agenda)))
    }

    /// Overwrite all fields of a volunteer and replace their agenda.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no volunteer has this ID.
    /// Returns `RepositoryError::Conflict` if the email or cpf belongs to another volunteer.
    /// Returns `RepositoryError::Database` for other database errors.
    #[tracing::instrument(skip_all, fields(volunteer_id = %id))]
    pub async fn update(&self, id: VolunteerId, input: &VolunteerInput) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if !exists(&mut tx, id).await? {
            return Err(RepositoryError::NotFound);
        }

        if email_or_cpf_taken(&mut tx, input, Some(id)).await? {
            return Err(RepositoryError::Conflict(
                "email or cpf already registered".to_owned(),
            ));
        }

        sqlx::query(
            r"
            UPDATE usuarios SET
                nome = $1,
                email = $2,
                telefone = $3,
                cpf = $4,
                rg = $5,
                cep = $6,
                endereco = $7
            WHERE id_usuario = $8
            ",
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(input.phone.as_deref())
        .bind(&input.cpf)
        .bind(input.rg.as_deref())
        .bind(input.postal_code.as_deref())
        .bind(input.address.as_deref())
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "email or cpf"))?;

        delete_agenda(&mut tx, id).await?;
        insert_agenda(&mut tx, id, &input.agenda).await?;

        tx.commit().await?;
        tracing::debug!(agenda_items = input.agenda.len(), "volunteer updated");
        Ok(())
    }

    /// Delete a volunteer and all of their agenda rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no volunteer has this ID.
    /// Returns `RepositoryError::Database` for other database errors.
    #[tracing::instrument(skip_all, fields(volunteer_id = %id))]
    pub async fn delete(&self, id: VolunteerId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if !exists(&mut tx, id).await? {
            return Err(RepositoryError::NotFound);
        }

        delete_agenda(&mut tx, id).await?;
        sqlx::query("DELETE FROM usuarios WHERE id_usuario = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!("volunteer deleted");
        Ok(())
    }

    /// Check whether a volunteer with this ID exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: VolunteerId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        Ok(exists(&mut conn, id).await?)
    }

    /// Get a volunteer's agenda in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn agenda(&self, id: VolunteerId) -> Result<Vec<AgendaItem>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        Ok(fetch_agenda(&mut conn, id).await?)
    }

    /// Replace a volunteer's whole agenda.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no volunteer has this ID.
    /// Returns `RepositoryError::Database` for other database errors.
    #[tracing::instrument(skip_all, fields(volunteer_id = %id))]
    pub async fn replace_agenda(
        &self,
        id: VolunteerId,
        agenda: &[AgendaItem],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if !exists(&mut tx, id).await? {
            return Err(RepositoryError::NotFound);
        }

        delete_agenda(&mut tx, id).await?;
        insert_agenda(&mut tx, id, agenda).await?;

        tx.commit().await?;
        tracing::debug!(agenda_items = agenda.len(), "agenda replaced");
        Ok(())
    }
}

// =============================================================================
// Statement helpers (run on a caller-owned connection or transaction)
// =============================================================================

async fn exists(conn: &mut PgConnection, id: VolunteerId) -> Result<bool, sqlx::Error> {
    let row: Option<i32> = sqlx::query_scalar("SELECT 1 FROM usuarios WHERE id_usuario = $1")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row.is_some())
}

/// Whether `input`'s email or cpf is used by a volunteer other than `except`.
async fn email_or_cpf_taken(
    conn: &mut PgConnection,
    input: &VolunteerInput,
    except: Option<VolunteerId>,
) -> Result<bool, sqlx::Error> {
    let row: Option<i32> = sqlx::query_scalar(
        r"
        SELECT 1 FROM usuarios
        WHERE (email = $1 OR cpf = $2)
          AND ($3::INTEGER IS NULL OR id_usuario <> $3)
        LIMIT 1
        ",
    )
    .bind(&input.email)
    .bind(&input.cpf)
    .bind(except)
    .fetch_optional(conn)
    .await?;
    Ok(row.is_some())
}

async fn fetch_agenda(
    conn: &mut PgConnection,
    id: VolunteerId,
) -> Result<Vec<AgendaItem>, sqlx::Error> {
    sqlx::query_as(
        r"
        SELECT turno, dia_semana
        FROM agenda_voluntario
        WHERE id_usuario = $1
        ORDER BY id_agenda
        ",
    )
    .bind(id)
    .fetch_all(conn)
    .await
}

async fn delete_agenda(conn: &mut PgConnection, id: VolunteerId) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM agenda_voluntario WHERE id_usuario = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

async fn insert_agenda(
    conn: &mut PgConnection,
    id: VolunteerId,
    agenda: &[AgendaItem],
) -> Result<(), sqlx::Error> {
    if agenda.is_empty() {
        return Ok(());
    }

    let mut builder: QueryBuilder<'_, Postgres> =
        QueryBuilder::new("INSERT INTO agenda_voluntario (id_usuario, turno, dia_semana) ");
    builder.push_values(agenda, |mut row, item| {
        row.push_bind(id)
            .push_bind(item.shift.as_str())
            .push_bind(item.weekday.as_str());
    });
    builder.build().execute(conn).await?;
    Ok(())
}
