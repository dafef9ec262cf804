use tracing::debug;

use super::answers::{AnswersPatch, FormAnswers};

/// Custodial store for the answers of one in-progress intake session.
///
/// Steps borrow the store from the owning flow, so a reader cannot outlive the session
/// that provisioned it. No validation happens here.
#[derive(Debug, Default)]
pub struct FormContext {
    answers: FormAnswers,
    revision: u64,
}

impl FormContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answers(&self) -> &FormAnswers {
        &self.answers
    }

    /// Shallow-merge `patch` into the current record.
    pub fn update(&mut self, patch: AnswersPatch) {
        patch.apply(&mut self.answers);
        self.revision += 1;
        debug!(revision = self.revision, "form answers updated");
    }

    /// Number of merges applied since the session started.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Hand the record over and leave the store empty.
    pub(crate) fn take(&mut self) -> FormAnswers {
        self.revision += 1;
        std::mem::take(&mut self.answers)
    }
}
