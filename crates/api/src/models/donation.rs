//! Donation, donation item, and receipt records.
//!
//! These are read-only through the HTTP API; rows are written by the
//! `vol-cli seed` command or by other systems sharing the database.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use voluntarios_core::{DonationId, DonationItemId, ReceiptId, VolunteerId};

/// A recorded contribution made by a volunteer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Donation {
    #[serde(rename = "id_doacao")]
    #[sqlx(rename = "id_doacao")]
    pub id: DonationId,
    #[serde(rename = "id_usuario")]
    #[sqlx(rename = "id_usuario")]
    pub volunteer_id: VolunteerId,
    /// Serialized as `YYYY-MM-DD`.
    #[serde(rename = "data_doacao")]
    #[sqlx(rename = "data_doacao")]
    pub donated_on: NaiveDate,
    /// Free-form (e.g. "pendente", "recebida").
    pub status: String,
}

/// One line of a donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DonationItem {
    #[serde(rename = "id_item")]
    #[sqlx(rename = "id_item")]
    pub id: DonationItemId,
    #[serde(rename = "id_doacao")]
    #[sqlx(rename = "id_doacao")]
    pub donation_id: DonationId,
    #[serde(rename = "categoria")]
    #[sqlx(rename = "categoria")]
    pub category: String,
    #[serde(rename = "item_nome")]
    #[sqlx(rename = "item_nome")]
    pub name: String,
    #[serde(rename = "quantidade")]
    #[sqlx(rename = "quantidade")]
    pub quantity: i32,
}

/// Confirmation that a donation was physically received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Receipt {
    #[serde(rename = "id_recebimento")]
    #[sqlx(rename = "id_recebimento")]
    pub id: ReceiptId,
    #[serde(rename = "id_doacao")]
    #[sqlx(rename = "id_doacao")]
    pub donation_id: DonationId,
    #[serde(rename = "data_recebido")]
    #[sqlx(rename = "data_recebido")]
    pub received_on: NaiveDate,
    #[serde(rename = "confirmado_por")]
    #[sqlx(rename = "confirmado_por")]
    pub confirmed_by: Option<String>,
    #[serde(rename = "observacao")]
    #[sqlx(rename = "observacao")]
    pub observation: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_donation_wire_format() {
        let donation = Donation {
            id: DonationId::new(1),
            volunteer_id: VolunteerId::new(9),
            donated_on: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            status: "pendente".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&donation).unwrap(),
            json!({
                "id_doacao": 1,
                "id_usuario": 9,
                "data_doacao": "2025-03-14",
                "status": "pendente"
            })
        );
    }

    #[test]
    fn test_receipt_nullable_fields() {
        let receipt = Receipt {
            id: ReceiptId::new(3),
            donation_id: DonationId::new(1),
            received_on: NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
            confirmed_by: None,
            observation: Some("caixa lacrada".to_string()),
        };

        let body = serde_json::to_value(&receipt).unwrap();
        assert_eq!(body["data_recebido"], "2025-03-20");
        assert!(body["confirmado_por"].is_null());
        assert_eq!(body["observacao"], "caixa lacrada");
    }
}
