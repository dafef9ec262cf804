use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Optional extras offered on the features step.
pub const KNOWN_FEATURES: [&str; 6] = [
    "balcone",
    "terrazzo",
    "giardino",
    "garage",
    "ascensore",
    "cantina",
];

/// Answers collected across the intake steps for one evaluation request.
///
/// Every field starts unset; validity is decided by the step validators, never here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormAnswers {
    pub address: String,
    pub property_type: Option<PropertyType>,
    pub condition: Option<PropertyCondition>,
    pub surface_sqm: Option<u32>,
    pub floor: Option<i32>,
    pub room_count: Option<u32>,
    pub bathroom_count: Option<u32>,
    pub heating: Option<Heating>,
    pub features: BTreeSet<String>,
    pub contact: Contact,
}

impl FormAnswers {
    /// Flip a feature in or out of the selection, returning whether it is now selected.
    pub fn toggle_feature(&mut self, feature: &str) -> bool {
        let key = feature.trim().to_lowercase();
        if self.features.remove(&key) {
            false
        } else {
            self.features.insert(key);
            true
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    Appartamento,
    Villa,
    #[serde(rename = "Monolocale/Loft")]
    MonolocaleLoft,
    Attico,
}

impl PropertyType {
    pub const ALL: [PropertyType; 4] = [
        PropertyType::Appartamento,
        PropertyType::Villa,
        PropertyType::MonolocaleLoft,
        PropertyType::Attico,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            PropertyType::Appartamento => "Appartamento",
            PropertyType::Villa => "Villa",
            PropertyType::MonolocaleLoft => "Monolocale/Loft",
            PropertyType::Attico => "Attico",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyCondition {
    Nuovo,
    #[serde(rename = "Ottimo stato")]
    OttimoStato,
    Buono,
    #[serde(rename = "Da ristrutturare")]
    DaRistrutturare,
}

impl PropertyCondition {
    pub const ALL: [PropertyCondition; 4] = [
        PropertyCondition::Nuovo,
        PropertyCondition::OttimoStato,
        PropertyCondition::Buono,
        PropertyCondition::DaRistrutturare,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            PropertyCondition::Nuovo => "Nuovo",
            PropertyCondition::OttimoStato => "Ottimo stato",
            PropertyCondition::Buono => "Buono",
            PropertyCondition::DaRistrutturare => "Da ristrutturare",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Heating {
    Autonomo,
    Centralizzato,
    PompaDiCalore,
    Teleriscaldamento,
    Nessuno,
}

impl Heating {
    pub const ALL: [Heating; 5] = [
        Heating::Autonomo,
        Heating::Centralizzato,
        Heating::PompaDiCalore,
        Heating::Teleriscaldamento,
        Heating::Nessuno,
    ];

    /// Wire value sent to the backend.
    pub const fn code(self) -> &'static str {
        match self {
            Heating::Autonomo => "autonomo",
            Heating::Centralizzato => "centralizzato",
            Heating::PompaDiCalore => "pompaDiCalore",
            Heating::Teleriscaldamento => "teleriscaldamento",
            Heating::Nessuno => "nessuno",
        }
    }
}

/// Raised when free text does not name one of the enumerated choices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '/' && *c != '_' && *c != '-')
        .collect::<String>()
        .to_lowercase()
}

impl FromStr for PropertyType {
    type Err = UnknownChoice;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(raw);
        Self::ALL
            .into_iter()
            .find(|kind| {
                normalize(kind.label()) == wanted
                    || (wanted == "monolocale" && *kind == Self::MonolocaleLoft)
            })
            .ok_or_else(|| UnknownChoice {
                kind: "property type",
                value: raw.to_string(),
            })
    }
}

impl FromStr for PropertyCondition {
    type Err = UnknownChoice;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(raw);
        Self::ALL
            .into_iter()
            .find(|condition| normalize(condition.label()) == wanted)
            .ok_or_else(|| UnknownChoice {
                kind: "property condition",
                value: raw.to_string(),
            })
    }
}

impl FromStr for Heating {
    type Err = UnknownChoice;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(raw);
        Self::ALL
            .into_iter()
            .find(|heating| normalize(heating.code()) == wanted)
            .ok_or_else(|| UnknownChoice {
                kind: "heating type",
                value: raw.to_string(),
            })
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for PropertyCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Heating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Shallow patch merged into [`FormAnswers`]; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswersPatch {
    pub address: Option<String>,
    pub property_type: Option<Option<PropertyType>>,
    pub condition: Option<Option<PropertyCondition>>,
    pub surface_sqm: Option<Option<u32>>,
    pub floor: Option<Option<i32>>,
    pub room_count: Option<Option<u32>>,
    pub bathroom_count: Option<Option<u32>>,
    pub heating: Option<Option<Heating>>,
    pub features: Option<BTreeSet<String>>,
    pub contact: Option<Contact>,
}

impl AnswersPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn property_type(mut self, value: Option<PropertyType>) -> Self {
        self.property_type = Some(value);
        self
    }

    pub fn condition(mut self, value: Option<PropertyCondition>) -> Self {
        self.condition = Some(value);
        self
    }

    pub fn surface_sqm(mut self, value: Option<u32>) -> Self {
        self.surface_sqm = Some(value);
        self
    }

    pub fn floor(mut self, value: Option<i32>) -> Self {
        self.floor = Some(value);
        self
    }

    pub fn room_count(mut self, value: Option<u32>) -> Self {
        self.room_count = Some(value);
        self
    }

    pub fn bathroom_count(mut self, value: Option<u32>) -> Self {
        self.bathroom_count = Some(value);
        self
    }

    pub fn heating(mut self, value: Option<Heating>) -> Self {
        self.heating = Some(value);
        self
    }

    pub fn features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.features = Some(
            features
                .into_iter()
                .map(|feature| feature.as_ref().trim().to_lowercase())
                .filter(|feature| !feature.is_empty())
                .collect(),
        );
        self
    }

    pub fn contact(mut self, contact: Contact) -> Self {
        self.contact = Some(contact);
        self
    }

    pub(crate) fn apply(self, answers: &mut FormAnswers) {
        if let Some(address) = self.address {
            answers.address = address;
        }
        if let Some(value) = self.property_type {
            answers.property_type = value;
        }
        if let Some(value) = self.condition {
            answers.condition = value;
        }
        if let Some(value) = self.surface_sqm {
            answers.surface_sqm = value;
        }
        if let Some(value) = self.floor {
            answers.floor = value;
        }
        if let Some(value) = self.room_count {
            answers.room_count = value;
        }
        if let Some(value) = self.bathroom_count {
            answers.bathroom_count = value;
        }
        if let Some(value) = self.heating {
            answers.heating = value;
        }
        if let Some(features) = self.features {
            answers.features = features;
        }
        if let Some(contact) = self.contact {
            answers.contact = contact;
        }
    }
}
