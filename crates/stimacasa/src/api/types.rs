//! Wire contracts exchanged with the brokerage REST API.
//!
//! One type per concept; dashboards and list views consume these directly.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::intake::{Heating, PropertyCondition, PropertyType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginResponse {
    pub username: String,
    pub roles: Vec<String>,
    pub success: bool,
    pub message: Option<String>,
}

impl Default for LoginResponse {
    fn default() -> Self {
        Self {
            username: String::new(),
            roles: Vec::new(),
            success: false,
            message: None,
        }
    }
}

/// Headline counters shown above the dashboard listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStatistics {
    pub totale_immobili: Option<u64>,
    pub immobili_disponibili: Option<u64>,
    pub valutazioni_in_corso: Option<u64>,
    pub contratti_chiusi: Option<u64>,
    pub agenti_attivi: Option<u64>,
    pub incarichi_attivi: Option<u64>,
    /// Counters this client does not know by name yet.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImmobileSummary {
    pub id: i64,
    pub indirizzo: String,
    pub citta: Option<String>,
    pub tipologia: Option<String>,
    pub superficie: Option<u32>,
    pub prezzo: Option<f64>,
    pub stato: Option<String>,
    pub agente: Option<String>,
}

/// Page metadata shared by every paginated list endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMeta {
    pub next_offset: u32,
    pub has_more: bool,
    pub page_size: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardResponse {
    pub statistics: DashboardStatistics,
    pub immobili: Vec<ImmobileSummary>,
    #[serde(flatten)]
    pub page: PageMeta,
}

/// Paginated list whose items arrive under `items` or a resource-specific key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedList<T> {
    #[serde(alias = "contratti", alias = "content", default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(flatten)]
    pub page: PageMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[serde(alias = "agente")]
    Agent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

/// Finalized brokerage contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrattoChiuso {
    pub id: i64,
    #[serde(default)]
    pub indirizzo: String,
    #[serde(default)]
    pub cliente: Option<String>,
    #[serde(default)]
    pub agente: Option<String>,
    pub data_inizio: NaiveDate,
    #[serde(default)]
    pub data_fine: Option<NaiveDate>,
    #[serde(default)]
    pub valore: Option<f64>,
}

/// Valuation queue read by the admin review views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValutazioneQueue {
    /// Estimates produced automatically and not yet reviewed.
    SoloAi,
    InVerifica,
}

impl ValutazioneQueue {
    pub const fn path(self) -> &'static str {
        match self {
            ValutazioneQueue::SoloAi => "/admin/valutazioni/solo-ai",
            ValutazioneQueue::InVerifica => "/admin/valutazioni/in-verifica",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Valutazione {
    pub id: i64,
    pub indirizzo: String,
    pub tipologia: Option<String>,
    pub superficie: Option<u32>,
    pub prezzo_stimato: Option<f64>,
    pub stato: Option<String>,
    pub data_creazione: Option<String>,
}

/// Assignment linking a valuation to the agent responsible for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Incarico {
    pub id: i64,
    pub valutazione_id: Option<i64>,
    pub agente_id: Option<String>,
    pub agente_nome: Option<String>,
    pub indirizzo: String,
    pub stato: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeAssignmentRequest {
    pub agente_id: String,
    pub agente_nome: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressValidationRequest {
    pub via: String,
    pub citta: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AddressValidationResponse {
    pub valid: bool,
    pub suggestions: Vec<String>,
}

/// Body of `POST /immobili/save`, built from the intake answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySaveRequest {
    pub indirizzo: String,
    pub tipologia: Option<PropertyType>,
    pub condizioni: Option<PropertyCondition>,
    pub superficie: Option<u32>,
    pub piano: Option<i32>,
    pub locali: Option<u32>,
    pub bagni: Option<u32>,
    pub riscaldamento: Option<Heating>,
    pub caratteristiche: Vec<String>,
    pub nome: String,
    pub cognome: String,
    pub email: String,
    pub telefono: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertySaveResponse {
    pub success: bool,
    pub id: Option<i64>,
    pub message: Option<String>,
}
