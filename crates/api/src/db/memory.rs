//! In-process [`Store`] with the same observable rules as [`super::PgStore`].
//!
//! Ids are assigned sequentially from 1, the email/cpf uniqueness check runs
//! before every insert and update, and each write applies fully or not at
//! all. Backs the router tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use voluntarios_core::VolunteerId;

use super::{RepositoryError, Store};
use crate::models::{AgendaItem, Donation, DonationItem, Receipt, Volunteer, VolunteerInput};

#[derive(Default)]
struct MemoryState {
    next_volunteer_id: i32,
    volunteers: BTreeMap<VolunteerId, Volunteer>,
    donations: Vec<Donation>,
    donation_items: Vec<DonationItem>,
    receipts: Vec<Receipt>,
}

impl MemoryState {
    fn email_or_cpf_taken(&self, input: &VolunteerInput, except: Option<VolunteerId>) -> bool {
        self.volunteers.values().any(|v| {
            Some(v.id) != except && (v.email == input.email || v.cpf == input.cpf)
        })
    }
}

/// Store that keeps every table in memory.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload donation records, which the HTTP API never writes.
    #[must_use]
    pub fn with_donations(
        donations: Vec<Donation>,
        donation_items: Vec<DonationItem>,
        receipts: Vec<Receipt>,
    ) -> Self {
        Self {
            state: RwLock::new(MemoryState {
                donations,
                donation_items,
                receipts,
                ..MemoryState::default()
            }),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn create_volunteer(&self, input: &VolunteerInput) -> Result<Volunteer, RepositoryError> {
        let mut state = self.state.write().await;

        if state.email_or_cpf_taken(input, None) {
            return Err(RepositoryError::Conflict(
                "email or cpf already registered".to_owned(),
            ));
        }

        state.next_volunteer_id += 1;
        let id = VolunteerId::new(state.next_volunteer_id);
        let volunteer = Volunteer::from_input(id, input.clone());
        state.volunteers.insert(id, volunteer.clone());

        Ok(volunteer)
    }

    async fn list_volunteers(&self) -> Result<Vec<Volunteer>, RepositoryError> {
        Ok(self.state.read().await.volunteers.values().cloned().collect())
    }

    async fn get_volunteer(&self, id: VolunteerId) -> Result<Option<Volunteer>, RepositoryError> {
        Ok(self.state.read().await.volunteers.get(&id).cloned())
    }

    async fn update_volunteer(
        &self,
        id: VolunteerId,
        input: &VolunteerInput,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;

        if !state.volunteers.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        if state.email_or_cpf_taken(input, Some(id)) {
            return Err(RepositoryError::Conflict(
                "email or cpf already registered".to_owned(),
            ));
        }

        state
            .volunteers
            .insert(id, Volunteer::from_input(id, input.clone()));
        Ok(())
    }

    async fn delete_volunteer(&self, id: VolunteerId) -> Result<(), RepositoryError> {
        self.state
            .write()
            .await
            .volunteers
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn volunteer_exists(&self, id: VolunteerId) -> Result<bool, RepositoryError> {
        Ok(self.state.read().await.volunteers.contains_key(&id))
    }

    async fn get_agenda(&self, id: VolunteerId) -> Result<Vec<AgendaItem>, RepositoryError> {
        Ok(self
            .state
            .read()
            .await
            .volunteers
            .get(&id)
            .map(|v| v.agenda.clone())
            .unwrap_or_default())
    }

    async fn replace_agenda(
        &self,
        id: VolunteerId,
        agenda: &[AgendaItem],
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        let volunteer = state
            .volunteers
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        volunteer.agenda = agenda.to_vec();
        Ok(())
    }

    async fn list_donations(&self) -> Result<Vec<Donation>, RepositoryError> {
        Ok(self.state.read().await.donations.clone())
    }

    async fn list_donation_items(&self) -> Result<Vec<DonationItem>, RepositoryError> {
        Ok(self.state.read().await.donation_items.clone())
    }

    async fn list_receipts(&self) -> Result<Vec<Receipt>, RepositoryError> {
        Ok(self.state.read().await.receipts.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input(email: &str, cpf: &str) -> VolunteerInput {
        VolunteerInput {
            name: "Ana".to_string(),
            email: email.to_string(),
            phone: None,
            cpf: cpf.to_string(),
            rg: None,
            postal_code: None,
            address: None,
            agenda: vec![AgendaItem::new("tarde", "terça")],
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let store = MemoryStore::new();
        let first = store.create_volunteer(&input("a@x.com", "1")).await.unwrap();
        let second = store.create_volunteer(&input("b@x.com", "2")).await.unwrap();

        assert_eq!(first.id, VolunteerId::new(1));
        assert_eq!(second.id, VolunteerId::new(2));
    }

    #[tokio::test]
    async fn test_duplicate_email_or_cpf_conflicts() {
        let store = MemoryStore::new();
        store.create_volunteer(&input("a@x.com", "1")).await.unwrap();

        let same_email = store.create_volunteer(&input("a@x.com", "2")).await;
        assert!(matches!(same_email, Err(RepositoryError::Conflict(_))));

        let same_cpf = store.create_volunteer(&input("b@x.com", "1")).await;
        assert!(matches!(same_cpf, Err(RepositoryError::Conflict(_))));

        assert_eq!(store.list_volunteers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_own_email_but_rejects_others() {
        let store = MemoryStore::new();
        let ana = store.create_volunteer(&input("a@x.com", "1")).await.unwrap();
        store.create_volunteer(&input("b@x.com", "2")).await.unwrap();

        let mut same = input("a@x.com", "1");
        same.name = "Ana Maria".to_string();
        store.update_volunteer(ana.id, &same).await.unwrap();

        let stolen = input("b@x.com", "1");
        let result = store.update_volunteer(ana.id, &stolen).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));

        let stored = store.get_volunteer(ana.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Ana Maria");
        assert_eq!(stored.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_missing_volunteer_writes_are_not_found() {
        let store = MemoryStore::new();
        let missing = VolunteerId::new(99);

        assert!(matches!(
            store.update_volunteer(missing, &input("a@x.com", "1")).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            store.delete_volunteer(missing).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            store.replace_agenda(missing, &[]).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(store.get_agenda(missing).await.unwrap().is_empty());
    }
}
