use async_trait::async_trait;

use super::answers::FormAnswers;
use crate::api::{ApiError, PropertySaveRequest, PropertySaveResponse};

/// Destination for a completed evaluation request (the REST client in production).
#[async_trait]
pub trait EvaluationSink: Send + Sync {
    async fn save_evaluation(
        &self,
        request: &PropertySaveRequest,
    ) -> Result<PropertySaveResponse, ApiError>;
}

impl From<FormAnswers> for PropertySaveRequest {
    fn from(answers: FormAnswers) -> Self {
        let FormAnswers {
            address,
            property_type,
            condition,
            surface_sqm,
            floor,
            room_count,
            bathroom_count,
            heating,
            features,
            contact,
        } = answers;

        Self {
            indirizzo: address.trim().to_string(),
            tipologia: property_type,
            condizioni: condition,
            superficie: surface_sqm,
            piano: floor,
            locali: room_count,
            bagni: bathroom_count,
            riscaldamento: heating,
            caratteristiche: features.into_iter().collect(),
            nome: contact.first_name,
            cognome: contact.last_name,
            email: contact.email,
            telefono: contact.phone,
        }
    }
}

/// Confirmation shown once the backend accepted the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub id: Option<i64>,
    pub message: Option<String>,
}

/// Failure while handing the answers to the sink.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Flow(#[from] super::flow::FlowError),
    #[error("evaluation request rejected: {0}")]
    Rejected(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}
