use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{ApiError, PropertySaveRequest, PropertySaveResponse};
use crate::intake::answers::{
    AnswersPatch, Contact, FormAnswers, Heating, PropertyCondition, PropertyType,
};
use crate::intake::flow::{Advance, IntakeFlow};
use crate::intake::submission::EvaluationSink;

pub(super) fn contact() -> Contact {
    Contact {
        first_name: "Giulia".to_string(),
        last_name: "Esposito".to_string(),
        email: "giulia.esposito@example.it".to_string(),
        phone: "+39 333 123 4567".to_string(),
    }
}

pub(super) fn general_patch() -> AnswersPatch {
    AnswersPatch::new()
        .surface_sqm(Some(90))
        .floor(Some(2))
        .room_count(Some(5))
        .bathroom_count(Some(2))
        .heating(Some(Heating::Autonomo))
}

pub(super) fn complete_answers() -> FormAnswers {
    FormAnswers {
        address: "Via Roma 10".to_string(),
        property_type: Some(PropertyType::Appartamento),
        condition: Some(PropertyCondition::Buono),
        surface_sqm: Some(90),
        floor: Some(2),
        room_count: Some(5),
        bathroom_count: Some(2),
        heating: Some(Heating::Autonomo),
        features: ["balcone", "cantina"].iter().map(|f| f.to_string()).collect(),
        contact: contact(),
    }
}

/// Walk a fresh flow to the contacts step with valid answers everywhere.
pub(super) fn flow_at_contacts() -> IntakeFlow {
    let mut flow = IntakeFlow::new();
    let patches = [
        AnswersPatch::new().address("Via Roma 10"),
        AnswersPatch::new().property_type(Some(PropertyType::Appartamento)),
        AnswersPatch::new().condition(Some(PropertyCondition::Buono)),
        general_patch(),
        AnswersPatch::new().features(["balcone", "cantina"]),
    ];
    for patch in patches {
        flow.update(patch).expect("flow accepts input");
        match flow.next().expect("flow is editing") {
            Advance::Moved { .. } => {}
            other => panic!("expected to advance, got {other:?}"),
        }
    }
    flow.update(AnswersPatch::new().contact(contact()))
        .expect("flow accepts contacts");
    flow
}

pub(super) struct RecordingSink {
    pub(super) requests: Mutex<Vec<PropertySaveRequest>>,
    outcome: fn() -> Result<PropertySaveResponse, ApiError>,
}

impl RecordingSink {
    pub(super) fn accepting() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            outcome: || {
                Ok(PropertySaveResponse {
                    success: true,
                    id: Some(314),
                    message: Some("Richiesta registrata".to_string()),
                })
            },
        }
    }

    pub(super) fn rejecting() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            outcome: || {
                Ok(PropertySaveResponse {
                    success: false,
                    id: None,
                    message: Some("Indirizzo fuori zona".to_string()),
                })
            },
        }
    }

    pub(super) fn failing() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            outcome: || {
                Err(ApiError::Status {
                    status: 500,
                    message: "status 500".to_string(),
                })
            },
        }
    }

    pub(super) fn sent(&self) -> Vec<PropertySaveRequest> {
        self.requests.lock().expect("sink mutex poisoned").clone()
    }
}

#[async_trait]
impl EvaluationSink for RecordingSink {
    async fn save_evaluation(
        &self,
        request: &PropertySaveRequest,
    ) -> Result<PropertySaveResponse, ApiError> {
        self.requests
            .lock()
            .expect("sink mutex poisoned")
            .push(request.clone());
        (self.outcome)()
    }
}
