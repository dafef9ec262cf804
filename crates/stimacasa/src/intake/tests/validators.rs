use super::common::*;
use crate::intake::answers::{Contact, FormAnswers, PropertyCondition, PropertyType};
use crate::intake::validators::{
    is_valid_address, ConditionValidator, ContactValidator, FeaturesValidator,
    GeneralCharacteristicsValidator, LocationValidator, PropertyTypeValidator, StepMessage,
    StepValidator, ADDRESS_HINT,
};

fn with_address(address: &str) -> FormAnswers {
    FormAnswers {
        address: address.to_string(),
        ..FormAnswers::default()
    }
}

#[test]
fn accepts_addresses_with_road_type_and_number() {
    let accepted = [
        "Via Roma 10",
        "via roma 10",
        "VIALE DEI MILLE 3",
        "Corso Vittorio Emanuele, 112",
        "Piazza del Duomo 1a",
        "Largo Augusto 7B",
        "Via Niccolò Tommaseo 24",
        "Viale Città d Italia,5",
    ];
    for address in accepted {
        assert!(is_valid_address(address), "expected '{address}' to be accepted");
        assert_eq!(LocationValidator.validate(&with_address(address)), Ok(()));
    }
}

#[test]
fn rejects_addresses_without_prefix_or_number() {
    let rejected = [
        "",
        "Roma 10",
        "Via Roma",
        "Strada Statale 36 12",
        "Via 10",
        "Via Roma 10bis",
        "Via Roma 10 ",
        "ViaRoma 10",
    ];
    for address in rejected {
        assert_eq!(
            LocationValidator.validate(&with_address(address)),
            Err(StepMessage(ADDRESS_HINT.to_string())),
            "expected '{address}' to be rejected"
        );
    }
}

#[test]
fn selection_steps_require_a_choice() {
    let mut answers = FormAnswers::default();
    assert!(PropertyTypeValidator.validate(&answers).is_err());
    assert!(ConditionValidator.validate(&answers).is_err());

    answers.property_type = Some(PropertyType::Attico);
    answers.condition = Some(PropertyCondition::DaRistrutturare);
    assert_eq!(PropertyTypeValidator.validate(&answers), Ok(()));
    assert_eq!(ConditionValidator.validate(&answers), Ok(()));
}

#[test]
fn general_characteristics_bounds_are_inclusive() {
    let mut answers = complete_answers();
    for surface in [10, 500, 1000] {
        answers.surface_sqm = Some(surface);
        assert_eq!(GeneralCharacteristicsValidator.validate(&answers), Ok(()));
    }
    for surface in [0, 5, 9, 1001, 5000] {
        answers.surface_sqm = Some(surface);
        let message = GeneralCharacteristicsValidator
            .validate(&answers)
            .expect_err("surface out of range");
        assert!(message.as_str().contains("superficie"), "got {message}");
    }

    answers.surface_sqm = Some(90);
    answers.floor = Some(-2);
    assert_eq!(GeneralCharacteristicsValidator.validate(&answers), Ok(()));
    answers.floor = Some(-3);
    assert!(GeneralCharacteristicsValidator
        .validate(&answers)
        .expect_err("floor too low")
        .as_str()
        .contains("piano"));
}

#[test]
fn general_characteristics_reports_first_violation_only() {
    let mut answers = complete_answers();
    answers.surface_sqm = Some(5);
    answers.room_count = Some(0);
    answers.heating = None;

    let message = GeneralCharacteristicsValidator
        .validate(&answers)
        .expect_err("invalid characteristics");
    assert_eq!(
        message.as_str(),
        "La superficie deve essere compresa tra 10 e 1000 mq"
    );

    answers.surface_sqm = Some(90);
    let message = GeneralCharacteristicsValidator
        .validate(&answers)
        .expect_err("rooms still invalid");
    assert_eq!(
        message.as_str(),
        "Il numero di locali deve essere compreso tra 1 e 50"
    );

    answers.room_count = Some(3);
    let message = GeneralCharacteristicsValidator
        .validate(&answers)
        .expect_err("heating missing");
    assert_eq!(message.as_str(), "Seleziona il tipo di riscaldamento");
}

#[test]
fn missing_and_out_of_range_messages_differ() {
    let mut answers = complete_answers();
    answers.bathroom_count = None;
    let missing = GeneralCharacteristicsValidator
        .validate(&answers)
        .expect_err("bathrooms missing");
    answers.bathroom_count = Some(21);
    let out_of_range = GeneralCharacteristicsValidator
        .validate(&answers)
        .expect_err("bathrooms out of range");
    assert_ne!(missing, out_of_range);
}

#[test]
fn features_step_never_blocks() {
    assert_eq!(FeaturesValidator.validate(&FormAnswers::default()), Ok(()));
    assert_eq!(FeaturesValidator.validate(&complete_answers()), Ok(()));
}

#[test]
fn contacts_require_every_field() {
    assert_eq!(ContactValidator.validate(&complete_answers()), Ok(()));

    let blanks: [fn(&mut Contact); 4] = [
        |c| c.first_name.clear(),
        |c| c.last_name.clear(),
        |c| c.email = "   ".to_string(),
        |c| c.phone.clear(),
    ];
    for blank in blanks {
        let mut answers = complete_answers();
        blank(&mut answers.contact);
        assert!(ContactValidator.validate(&answers).is_err());
    }

    let mut answers = complete_answers();
    answers.contact.email = "not-an-email".to_string();
    assert_eq!(
        ContactValidator.validate(&answers),
        Ok(()),
        "email format is not checked in this flow"
    );
}

#[test]
fn validation_is_idempotent_and_read_only() {
    let mut answers = complete_answers();
    answers.surface_sqm = Some(2000);
    let before = answers.clone();

    let first = GeneralCharacteristicsValidator.validate(&answers);
    let second = GeneralCharacteristicsValidator.validate(&answers);
    assert_eq!(first, second);
    assert_eq!(answers, before);
}
