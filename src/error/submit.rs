//! Form submission failures.

use crate::state::FieldErrors;

use super::ApiError;

/// Why a form submission did not succeed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    /// Validation produced errors; the submit handler was not called.
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),

    /// The submit handler ran and failed.
    #[error("submission failed: {0}")]
    Failed(ApiError),
}

impl SubmitError {
    /// Field errors, when validation blocked the submission.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmitError::Invalid(errors) => Some(errors),
            SubmitError::Failed(_) => None,
        }
    }
}
