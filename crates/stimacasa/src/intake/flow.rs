use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::answers::{AnswersPatch, FormAnswers};
use super::context::FormContext;
use super::submission::{EvaluationSink, SubmissionReceipt, SubmitError};
use super::validators::{
    ConditionValidator, ContactValidator, FeaturesValidator, GeneralCharacteristicsValidator,
    LocationValidator, PropertyTypeValidator, StepMessage, StepValidator,
};
use crate::api::{ApiError, PropertySaveRequest, PropertySaveResponse};

/// Pages of the standard evaluation intake, in the order they are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStep {
    Location,
    PropertyType,
    Condition,
    GeneralCharacteristics,
    Features,
    Contacts,
}

impl IntakeStep {
    pub const ALL: [IntakeStep; 6] = [
        IntakeStep::Location,
        IntakeStep::PropertyType,
        IntakeStep::Condition,
        IntakeStep::GeneralCharacteristics,
        IntakeStep::Features,
        IntakeStep::Contacts,
    ];

    pub const fn index(self) -> usize {
        match self {
            IntakeStep::Location => 0,
            IntakeStep::PropertyType => 1,
            IntakeStep::Condition => 2,
            IntakeStep::GeneralCharacteristics => 3,
            IntakeStep::Features => 4,
            IntakeStep::Contacts => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn title(self) -> &'static str {
        match self {
            IntakeStep::Location => "Dove si trova l'immobile?",
            IntakeStep::PropertyType => "Che tipo di immobile è?",
            IntakeStep::Condition => "In che stato si trova?",
            IntakeStep::GeneralCharacteristics => "Caratteristiche generali",
            IntakeStep::Features => "Dotazioni aggiuntive",
            IntakeStep::Contacts => "I tuoi contatti",
        }
    }

    fn validator(self) -> Box<dyn StepValidator> {
        match self {
            IntakeStep::Location => Box::new(LocationValidator),
            IntakeStep::PropertyType => Box::new(PropertyTypeValidator),
            IntakeStep::Condition => Box::new(ConditionValidator),
            IntakeStep::GeneralCharacteristics => Box::new(GeneralCharacteristicsValidator),
            IntakeStep::Features => Box::new(FeaturesValidator),
            IntakeStep::Contacts => Box::new(ContactValidator),
        }
    }
}

impl fmt::Display for IntakeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Dispatch table from step index to the validator guarding it.
///
/// Indices without a bound validator are informational pages and always valid.
pub struct StepTable {
    total: usize,
    validators: BTreeMap<usize, Box<dyn StepValidator>>,
}

impl StepTable {
    /// Empty table with `total` steps (at least one).
    pub fn new(total: usize) -> Self {
        Self {
            total: total.max(1),
            validators: BTreeMap::new(),
        }
    }

    /// The six-step evaluation intake with every page guarded.
    pub fn standard() -> Self {
        IntakeStep::ALL
            .into_iter()
            .fold(Self::new(IntakeStep::ALL.len()), |table, step| {
                table.bind_boxed(step.index(), step.validator())
            })
    }

    pub fn bind(self, index: usize, validator: impl StepValidator + 'static) -> Self {
        self.bind_boxed(index, Box::new(validator))
    }

    fn bind_boxed(mut self, index: usize, validator: Box<dyn StepValidator>) -> Self {
        if index < self.total {
            self.validators.insert(index, validator);
        } else {
            warn!(index, total = self.total, "ignoring validator bound past the last step");
        }
        self
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    fn check(&self, index: usize, answers: &FormAnswers) -> Result<(), StepMessage> {
        match self.validators.get(&index) {
            Some(validator) => validator.validate(answers),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for StepTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepTable")
            .field("total", &self.total)
            .field("bound", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Lifecycle of one intake session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Editing,
    /// A request is in flight; input is frozen until it resolves.
    Submitting,
    /// Terminal: the request was accepted and the answers were discarded.
    Submitted(SubmissionReceipt),
}

/// Result of asking the flow to move forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Moved { from: usize, to: usize },
    Blocked { step: usize, message: StepMessage },
    /// The last step is valid; the only way forward is `submit`.
    ReadyToSubmit,
}

/// Action not allowed in the current state of the flow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("a submission is already in progress")]
    Pending,
    #[error("the evaluation request has already been submitted")]
    Closed,
    #[error("submission is only possible from the last step (current step {current})")]
    NotAtLastStep { current: usize },
    #[error("step {step} is not complete: {message}")]
    Invalid { step: usize, message: StepMessage },
}

/// Sequencer for the intake form: owns the answers, the step cursor and the visible error.
#[derive(Debug)]
pub struct IntakeFlow {
    context: FormContext,
    table: StepTable,
    cursor: usize,
    error: Option<StepMessage>,
    state: FlowState,
}

impl Default for IntakeFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeFlow {
    pub fn new() -> Self {
        Self::with_table(StepTable::standard())
    }

    pub fn with_table(table: StepTable) -> Self {
        Self {
            context: FormContext::new(),
            table,
            cursor: 0,
            error: None,
            state: FlowState::Editing,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total_steps(&self) -> usize {
        self.table.len()
    }

    pub fn current_step(&self) -> Option<IntakeStep> {
        IntakeStep::from_index(self.cursor)
    }

    pub fn is_last_step(&self) -> bool {
        self.cursor + 1 == self.table.len()
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Message for the step currently displayed, if its last validation failed.
    pub fn error(&self) -> Option<&StepMessage> {
        self.error.as_ref()
    }

    pub fn answers(&self) -> &FormAnswers {
        self.context.answers()
    }

    pub fn context(&self) -> &FormContext {
        &self.context
    }

    pub fn update(&mut self, patch: AnswersPatch) -> Result<(), FlowError> {
        self.ensure_editing()?;
        self.context.update(patch);
        Ok(())
    }

    /// Validate the current step and move forward by one when it passes.
    pub fn next(&mut self) -> Result<Advance, FlowError> {
        self.ensure_editing()?;

        if let Err(message) = self.table.check(self.cursor, self.context.answers()) {
            debug!(step = self.cursor, %message, "step validation failed");
            self.error = Some(message.clone());
            return Ok(Advance::Blocked {
                step: self.cursor,
                message,
            });
        }

        self.error = None;
        if self.is_last_step() {
            return Ok(Advance::ReadyToSubmit);
        }

        let from = self.cursor;
        self.cursor += 1;
        debug!(from, to = self.cursor, "intake step advanced");
        Ok(Advance::Moved {
            from,
            to: self.cursor,
        })
    }

    /// Step back without validation; returns `false` at the first step or outside editing.
    pub fn prev(&mut self) -> bool {
        if self.state != FlowState::Editing || self.cursor == 0 {
            return false;
        }
        self.error = None;
        self.cursor -= 1;
        debug!(to = self.cursor, "intake step moved back");
        true
    }

    /// Validate the last step and freeze the flow while the request is sent.
    pub fn begin_submit(&mut self) -> Result<PropertySaveRequest, FlowError> {
        self.ensure_editing()?;
        if !self.is_last_step() {
            return Err(FlowError::NotAtLastStep {
                current: self.cursor,
            });
        }

        if let Err(message) = self.table.check(self.cursor, self.context.answers()) {
            self.error = Some(message.clone());
            return Err(FlowError::Invalid {
                step: self.cursor,
                message,
            });
        }

        self.error = None;
        self.state = FlowState::Submitting;
        Ok(PropertySaveRequest::from(self.context.answers().clone()))
    }

    /// Resolve a pending submission with the backend outcome.
    ///
    /// Failures return the flow to the last step with the answers untouched.
    pub fn complete_submit(
        &mut self,
        outcome: Result<PropertySaveResponse, ApiError>,
    ) -> Result<SubmissionReceipt, SubmitError> {
        if self.state != FlowState::Submitting {
            return Err(match self.state {
                FlowState::Submitted(_) => FlowError::Closed.into(),
                _ => FlowError::NotAtLastStep {
                    current: self.cursor,
                }
                .into(),
            });
        }

        let response = match outcome {
            Ok(response) if response.success => response,
            Ok(response) => {
                self.state = FlowState::Editing;
                let reason = response
                    .message
                    .unwrap_or_else(|| "request not accepted".to_string());
                warn!(%reason, "evaluation request rejected by backend");
                return Err(SubmitError::Rejected(reason));
            }
            Err(err) => {
                self.state = FlowState::Editing;
                return Err(err.into());
            }
        };

        self.context.take();
        let receipt = SubmissionReceipt {
            id: response.id,
            message: response.message,
        };
        info!(id = ?receipt.id, "evaluation request submitted");
        self.state = FlowState::Submitted(receipt.clone());
        Ok(receipt)
    }

    /// Send the collected answers through `sink` and enter the terminal state on success.
    pub async fn submit<S>(&mut self, sink: &S) -> Result<SubmissionReceipt, SubmitError>
    where
        S: EvaluationSink + ?Sized,
    {
        let request = self.begin_submit()?;
        let outcome = sink.save_evaluation(&request).await;
        self.complete_submit(outcome)
    }

    fn ensure_editing(&self) -> Result<(), FlowError> {
        match self.state {
            FlowState::Editing => Ok(()),
            FlowState::Submitting => Err(FlowError::Pending),
            FlowState::Submitted(_) => Err(FlowError::Closed),
        }
    }
}
