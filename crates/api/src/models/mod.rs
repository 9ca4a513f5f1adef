//! Domain models for the volunteer and donation service.
//!
//! Field names are English in Rust and keep the lower-case column names
//! (`nome`, `dia_semana`, `id_doacao`, ...) on the wire, since existing
//! front-ends depend on them.

pub mod donation;
pub mod volunteer;

use serde::{Deserialize, Serialize};

pub use donation::{Donation, DonationItem, Receipt};
pub use volunteer::{AgendaItem, Volunteer, VolunteerInput};

/// Acknowledgement body returned by update and delete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "mensagem")]
    pub message: String,
}

impl Message {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
