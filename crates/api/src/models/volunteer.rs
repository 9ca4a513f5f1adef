//! Volunteer domain types.
//!
//! `VolunteerInput` is what clients send on create and update. `Volunteer`
//! is what the service returns: optional fields absent in storage are
//! rendered as empty strings rather than `null`.

use serde::{Deserialize, Serialize};

use voluntarios_core::VolunteerId;

/// One recurring availability slot.
///
/// Both fields are free-form; values like "manhã"/"tarde"/"noite" and
/// "segunda"/"terça" are conventions of the front-end, not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct AgendaItem {
    /// Shift of the day (`turno`).
    #[serde(rename = "turno")]
    #[sqlx(rename = "turno")]
    pub shift: String,
    /// Day of the week (`dia_semana`).
    #[serde(rename = "dia_semana")]
    #[sqlx(rename = "dia_semana")]
    pub weekday: String,
}

impl AgendaItem {
    #[must_use]
    pub fn new(shift: impl Into<String>, weekday: impl Into<String>) -> Self {
        Self {
            shift: shift.into(),
            weekday: weekday.into(),
        }
    }
}

/// Volunteer fields accepted on create and full update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerInput {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    /// National taxpayer ID; unique across volunteers.
    pub cpf: String,
    /// Identity document number.
    #[serde(default)]
    pub rg: Option<String>,
    #[serde(rename = "cep", default)]
    pub postal_code: Option<String>,
    #[serde(rename = "endereco", default)]
    pub address: Option<String>,
    pub agenda: Vec<AgendaItem>,
}

/// A registered volunteer with their agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volunteer {
    pub id: VolunteerId,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    pub cpf: String,
    pub rg: String,
    #[serde(rename = "cep")]
    pub postal_code: String,
    #[serde(rename = "endereco")]
    pub address: String,
    pub agenda: Vec<AgendaItem>,
}

impl Volunteer {
    /// Build the response shape for a freshly stored input.
    #[must_use]
    pub fn from_input(id: VolunteerId, input: VolunteerInput) -> Self {
        Self {
            id,
            name: input.name,
            email: input.email,
            phone: input.phone.unwrap_or_default(),
            cpf: input.cpf,
            rg: input.rg.unwrap_or_default(),
            postal_code: input.postal_code.unwrap_or_default(),
            address: input.address.unwrap_or_default(),
            agenda: input.agenda,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_input_optional_fields_may_be_omitted() {
        let input: VolunteerInput = serde_json::from_value(json!({
            "nome": "Ana",
            "email": "ana@x.com",
            "cpf": "111",
            "agenda": [{"turno": "tarde", "dia_semana": "terça"}]
        }))
        .unwrap();

        assert_eq!(input.name, "Ana");
        assert!(input.phone.is_none());
        assert!(input.rg.is_none());
        assert_eq!(input.agenda, vec![AgendaItem::new("tarde", "terça")]);
    }

    #[test]
    fn test_input_requires_agenda() {
        let result: Result<VolunteerInput, _> = serde_json::from_value(json!({
            "nome": "Ana",
            "email": "ana@x.com",
            "cpf": "111"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_volunteer_normalizes_missing_fields_to_empty_strings() {
        let input = VolunteerInput {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            phone: None,
            cpf: "111".to_string(),
            rg: Some("MG-1".to_string()),
            postal_code: None,
            address: None,
            agenda: vec![],
        };

        let volunteer = Volunteer::from_input(VolunteerId::new(5), input);
        let body = serde_json::to_value(&volunteer).unwrap();

        assert_eq!(
            body,
            json!({
                "id": 5,
                "nome": "Ana",
                "email": "ana@x.com",
                "telefone": "",
                "cpf": "111",
                "rg": "MG-1",
                "cep": "",
                "endereco": "",
                "agenda": []
            })
        );
    }
}
