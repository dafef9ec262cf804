use std::fmt;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;

use super::answers::FormAnswers;

pub const ADDRESS_HINT: &str = "Inserisci un indirizzo valido (es: Via Roma 10)";

pub const SURFACE_RANGE: RangeInclusive<u32> = 10..=1000;
pub const FLOOR_RANGE: RangeInclusive<i32> = -2..=100;
pub const ROOMS_RANGE: RangeInclusive<u32> = 1..=50;
pub const BATHROOMS_RANGE: RangeInclusive<u32> = 1..=20;

static ADDRESS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:via|viale|corso|piazza|largo)\s+[\p{L}\s]+[,\s]*[0-9]+[a-z]?$")
        .unwrap_or_else(|err| panic!("address pattern must compile: {err}"))
});

/// Human-readable reason a step cannot be left yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepMessage(pub String);

impl StepMessage {
    fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Correctness rule for one page of the intake form.
///
/// Implementations read their slice of the answers and never mutate it, so repeated calls
/// without input changes return the same outcome.
pub trait StepValidator: Send + Sync {
    fn validate(&self, answers: &FormAnswers) -> Result<(), StepMessage>;
}

/// Street address with a road-type prefix and a house number.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationValidator;

impl StepValidator for LocationValidator {
    fn validate(&self, answers: &FormAnswers) -> Result<(), StepMessage> {
        if is_valid_address(&answers.address) {
            Ok(())
        } else {
            Err(StepMessage::new(ADDRESS_HINT))
        }
    }
}

pub fn is_valid_address(address: &str) -> bool {
    ADDRESS_PATTERN.is_match(address)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyTypeValidator;

impl StepValidator for PropertyTypeValidator {
    fn validate(&self, answers: &FormAnswers) -> Result<(), StepMessage> {
        match answers.property_type {
            Some(_) => Ok(()),
            None => Err(StepMessage::new("Seleziona la tipologia dell'immobile")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionValidator;

impl StepValidator for ConditionValidator {
    fn validate(&self, answers: &FormAnswers) -> Result<(), StepMessage> {
        match answers.condition {
            Some(_) => Ok(()),
            None => Err(StepMessage::new("Seleziona lo stato dell'immobile")),
        }
    }
}

/// Surface, floor, rooms, bathrooms and heating; the first violation wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralCharacteristicsValidator;

impl StepValidator for GeneralCharacteristicsValidator {
    fn validate(&self, answers: &FormAnswers) -> Result<(), StepMessage> {
        check_range(
            answers.surface_sqm,
            &SURFACE_RANGE,
            "Inserisci la superficie in mq",
            "La superficie deve essere compresa tra 10 e 1000 mq",
        )?;
        check_range(
            answers.floor,
            &FLOOR_RANGE,
            "Inserisci il piano",
            "Il piano deve essere compreso tra -2 e 100",
        )?;
        check_range(
            answers.room_count,
            &ROOMS_RANGE,
            "Inserisci il numero di locali",
            "Il numero di locali deve essere compreso tra 1 e 50",
        )?;
        check_range(
            answers.bathroom_count,
            &BATHROOMS_RANGE,
            "Inserisci il numero di bagni",
            "Il numero di bagni deve essere compreso tra 1 e 20",
        )?;
        if answers.heating.is_none() {
            return Err(StepMessage::new("Seleziona il tipo di riscaldamento"));
        }
        Ok(())
    }
}

fn check_range<T: PartialOrd>(
    value: Option<T>,
    range: &RangeInclusive<T>,
    missing: &str,
    out_of_range: &str,
) -> Result<(), StepMessage> {
    match value {
        None => Err(StepMessage::new(missing)),
        Some(value) if !range.contains(&value) => Err(StepMessage::new(out_of_range)),
        Some(_) => Ok(()),
    }
}

/// Optional extras never block the flow.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeaturesValidator;

impl StepValidator for FeaturesValidator {
    fn validate(&self, _answers: &FormAnswers) -> Result<(), StepMessage> {
        Ok(())
    }
}

/// All contact fields are required; formats are not checked in this flow.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactValidator;

impl StepValidator for ContactValidator {
    fn validate(&self, answers: &FormAnswers) -> Result<(), StepMessage> {
        let contact = &answers.contact;
        let required = [
            (&contact.first_name, "Inserisci il tuo nome"),
            (&contact.last_name, "Inserisci il tuo cognome"),
            (&contact.email, "Inserisci il tuo indirizzo email"),
            (&contact.phone, "Inserisci il tuo numero di telefono"),
        ];
        for (value, message) in required {
            if value.trim().is_empty() {
                return Err(StepMessage::new(message));
            }
        }
        Ok(())
    }
}
