//! Multi-step property evaluation intake.
//!
//! A [`FormContext`] keeps the answers of one session, six [`StepValidator`]s guard the
//! pages of the form, and [`IntakeFlow`] sequences them and hands the finished record to
//! an [`EvaluationSink`].

pub mod answers;
pub mod context;
pub mod flow;
pub mod submission;
pub mod validators;

#[cfg(test)]
mod tests;

pub use answers::{
    AnswersPatch, Contact, FormAnswers, Heating, PropertyCondition, PropertyType, UnknownChoice,
    KNOWN_FEATURES,
};
pub use context::FormContext;
pub use flow::{Advance, FlowError, FlowState, IntakeFlow, IntakeStep, StepTable};
pub use submission::{EvaluationSink, SubmissionReceipt, SubmitError};
pub use validators::{
    is_valid_address, ConditionValidator, ContactValidator, FeaturesValidator,
    GeneralCharacteristicsValidator, LocationValidator, PropertyTypeValidator, StepMessage,
    StepValidator, ADDRESS_HINT,
};
