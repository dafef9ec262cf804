use super::common::*;
use crate::intake::answers::{AnswersPatch, Contact, FormAnswers, Heating, PropertyType};
use crate::intake::flow::{Advance, FlowError, FlowState, IntakeFlow, IntakeStep, StepTable};
use crate::intake::submission::SubmitError;
use crate::intake::validators::{LocationValidator, StepMessage, ADDRESS_HINT};
use pretty_assertions::assert_eq;

#[test]
fn valid_address_moves_to_property_type() {
    let mut flow = IntakeFlow::new();
    assert_eq!(flow.cursor(), 0);
    assert_eq!(flow.current_step(), Some(IntakeStep::Location));

    flow.update(AnswersPatch::new().address("Via Roma 10"))
        .expect("editing");
    let advance = flow.next().expect("editing");

    assert_eq!(advance, Advance::Moved { from: 0, to: 1 });
    assert_eq!(flow.current_step(), Some(IntakeStep::PropertyType));
    assert_eq!(flow.error(), None);
}

#[test]
fn address_without_road_type_stays_on_first_step() {
    let mut flow = IntakeFlow::new();
    flow.update(AnswersPatch::new().address("Roma 10"))
        .expect("editing");

    let advance = flow.next().expect("editing");

    assert_eq!(
        advance,
        Advance::Blocked {
            step: 0,
            message: StepMessage(ADDRESS_HINT.to_string()),
        }
    );
    assert_eq!(flow.cursor(), 0);
    assert_eq!(
        flow.error().map(StepMessage::as_str),
        Some("Inserisci un indirizzo valido (es: Via Roma 10)")
    );
}

#[test]
fn surface_is_corrected_before_advancing() {
    let mut flow = flow_at_contacts();
    while flow.current_step() != Some(IntakeStep::GeneralCharacteristics) {
        assert!(flow.prev());
    }

    flow.update(AnswersPatch::new().surface_sqm(Some(5)))
        .expect("editing");
    match flow.next().expect("editing") {
        Advance::Blocked { step, message } => {
            assert_eq!(step, IntakeStep::GeneralCharacteristics.index());
            assert!(message.as_str().contains("superficie"));
        }
        other => panic!("expected surface to block, got {other:?}"),
    }

    flow.update(
        AnswersPatch::new()
            .surface_sqm(Some(90))
            .floor(Some(2))
            .room_count(Some(5))
            .bathroom_count(Some(2))
            .heating(Some("autonomo".parse::<Heating>().expect("known heating"))),
    )
    .expect("editing");
    assert_eq!(
        flow.next().expect("editing"),
        Advance::Moved { from: 3, to: 4 }
    );
}

#[test]
fn prev_is_a_no_op_on_first_step() {
    let mut flow = IntakeFlow::new();
    assert!(!flow.prev());
    assert_eq!(flow.cursor(), 0);
}

#[test]
fn prev_always_steps_back_and_drops_the_error() {
    let mut flow = IntakeFlow::new();
    flow.update(AnswersPatch::new().address("Via Roma 10"))
        .expect("editing");
    flow.next().expect("editing");

    let blocked = flow.next().expect("editing");
    assert!(matches!(blocked, Advance::Blocked { step: 1, .. }));
    assert!(flow.error().is_some());

    assert!(flow.prev());
    assert_eq!(flow.cursor(), 0);
    assert_eq!(flow.error(), None, "error must not follow the user to another step");
}

#[test]
fn steps_cannot_be_skipped() {
    let mut flow = IntakeFlow::new();
    flow.update(AnswersPatch::new().address("Via Roma 10"))
        .expect("editing");
    flow.next().expect("editing");

    for _ in 0..5 {
        let advance = flow.next().expect("editing");
        assert!(matches!(advance, Advance::Blocked { .. }));
    }
    assert_eq!(flow.cursor(), 1);
}

#[test]
fn last_step_asks_for_submission() {
    let mut flow = flow_at_contacts();
    assert!(flow.is_last_step());
    assert_eq!(flow.next().expect("editing"), Advance::ReadyToSubmit);
    assert_eq!(flow.cursor(), 5);
}

#[test]
fn submit_is_only_reachable_from_last_step() {
    let mut flow = IntakeFlow::new();
    assert_eq!(
        flow.begin_submit(),
        Err(FlowError::NotAtLastStep { current: 0 })
    );
}

#[test]
fn submit_revalidates_contacts() {
    let mut flow = flow_at_contacts();
    flow.update(AnswersPatch::new().contact(Contact {
        phone: String::new(),
        ..contact()
    }))
    .expect("editing");

    match flow.begin_submit() {
        Err(FlowError::Invalid { step: 5, message }) => {
            assert!(message.as_str().contains("telefono"))
        }
        other => panic!("expected contacts to block submission, got {other:?}"),
    }
    assert_eq!(flow.state(), &FlowState::Editing);
}

#[tokio::test]
async fn successful_submission_is_terminal() {
    let mut flow = flow_at_contacts();
    let sink = RecordingSink::accepting();

    let receipt = flow.submit(&sink).await.expect("submission accepted");

    assert_eq!(receipt.id, Some(314));
    assert!(matches!(flow.state(), FlowState::Submitted(_)));
    assert_eq!(flow.answers(), &FormAnswers::default());

    let sent = sink.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].indirizzo, "Via Roma 10");
    assert_eq!(sent[0].tipologia, Some(PropertyType::Appartamento));
    assert_eq!(sent[0].superficie, Some(90));
    assert_eq!(
        sent[0].caratteristiche,
        vec!["balcone".to_string(), "cantina".to_string()]
    );
    assert_eq!(sent[0].email, "giulia.esposito@example.it");

    assert_eq!(flow.next(), Err(FlowError::Closed));
    assert!(!flow.prev());
    assert_eq!(
        flow.update(AnswersPatch::new().address("Via Po 1")),
        Err(FlowError::Closed)
    );
    assert!(matches!(
        flow.submit(&sink).await,
        Err(SubmitError::Flow(FlowError::Closed))
    ));
    assert_eq!(sink.sent().len(), 1);
}

#[tokio::test]
async fn failed_submission_returns_to_last_step_with_answers() {
    let mut flow = flow_at_contacts();
    let sink = RecordingSink::failing();

    let result = flow.submit(&sink).await;

    assert!(matches!(result, Err(SubmitError::Api(_))));
    assert_eq!(flow.state(), &FlowState::Editing);
    assert_eq!(flow.cursor(), 5);
    assert_eq!(flow.answers().address, "Via Roma 10");
}

#[tokio::test]
async fn rejected_submission_carries_backend_message() {
    let mut flow = flow_at_contacts();
    let sink = RecordingSink::rejecting();

    match flow.submit(&sink).await {
        Err(SubmitError::Rejected(message)) => assert_eq!(message, "Indirizzo fuori zona"),
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(flow.state(), &FlowState::Editing);
}

#[test]
fn pending_submission_freezes_input() {
    let mut flow = flow_at_contacts();
    flow.begin_submit().expect("submission starts");

    assert_eq!(flow.state(), &FlowState::Submitting);
    assert_eq!(flow.next(), Err(FlowError::Pending));
    assert_eq!(flow.begin_submit(), Err(FlowError::Pending));
    assert!(!flow.prev());
    assert_eq!(
        flow.update(AnswersPatch::new().floor(Some(3))),
        Err(FlowError::Pending)
    );
}

#[test]
fn unbound_steps_are_always_valid() {
    let table = StepTable::new(3).bind(1, LocationValidator);
    let mut flow = IntakeFlow::with_table(table);

    assert_eq!(
        flow.next().expect("editing"),
        Advance::Moved { from: 0, to: 1 }
    );
    assert!(matches!(
        flow.next().expect("editing"),
        Advance::Blocked { step: 1, .. }
    ));

    flow.update(AnswersPatch::new().address("Piazza Garibaldi 2"))
        .expect("editing");
    assert_eq!(
        flow.next().expect("editing"),
        Advance::Moved { from: 1, to: 2 }
    );
    assert_eq!(flow.next().expect("editing"), Advance::ReadyToSubmit);
}
