//! Workflow error taxonomy.
//!
//! Four categories with different handling: validation and precondition
//! failures are local and never reach the network; conflicts carry
//! change-your-input guidance; everything else surfaces the raw backend
//! error. None of them corrupt wizard state — a failed attempt leaves
//! `current_step` and `completed_steps` exactly as before.

use thiserror::Error;

use crate::api::error::ApiError;

#[derive(Debug, Clone, Error)]
pub enum WorkflowError {
    /// Required input missing; blocked before the executor runs
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// Attempt to run a step past step 1 without a captured record id
    #[error("step {step} requires a created record; complete step 1 first")]
    Precondition { step: u32 },

    /// Backend uniqueness violation (duplicate entity+date record or
    /// duplicate generated code)
    #[error("duplicate record: {message}")]
    Conflict { message: String },

    /// Any other backend failure, with the raw error for diagnosis
    #[error("backend request failed: {0}")]
    Remote(ApiError),

    /// A submission for this wizard is already in flight
    #[error("a submission is already in progress")]
    SubmissionInFlight,

    /// The workflow finished; the caller should have redirected away
    #[error("workflow is already complete")]
    AlreadyComplete,

    /// Step id not in this workflow's registry
    #[error("step {0} is not part of this workflow")]
    UnknownStep(u32),
}

impl WorkflowError {
    pub fn validation(message: impl Into<String>) -> Self {
        WorkflowError::Validation {
            message: message.into(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, WorkflowError::Conflict { .. })
    }

    /// User-facing guidance for this error category
    pub fn guidance(&self) -> &'static str {
        match self {
            WorkflowError::Validation { .. } => "Fill in the missing input and submit again.",
            WorkflowError::Precondition { .. } => "Complete the first step before continuing.",
            WorkflowError::Conflict { .. } => {
                "A matching record already exists. Change the conflicting input (e.g. the date) \
                 and resubmit - retrying identically will fail again."
            }
            WorkflowError::Remote(_) => "The request failed. Review the error and resubmit.",
            WorkflowError::SubmissionInFlight => "Wait for the current submission to finish.",
            WorkflowError::AlreadyComplete => "Open the read-only detail view instead.",
            WorkflowError::UnknownStep(_) => "Reload the workflow.",
        }
    }
}

/// Classify backend errors: uniqueness conflicts become the distinct,
/// user-actionable category; the rest stay generic.
impl From<ApiError> for WorkflowError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Conflict { message } => WorkflowError::Conflict { message },
            other => WorkflowError::Remote(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_classification() {
        let err: WorkflowError = ApiError::conflict("duplicate for P1 on 2024-01-01").into();
        assert!(err.is_conflict());

        let err: WorkflowError = ApiError::http(500, "boom").into();
        assert!(!err.is_conflict());
        assert!(matches!(err, WorkflowError::Remote(_)));
    }

    #[test]
    fn test_conflict_guidance_mentions_changing_input() {
        let err = WorkflowError::Conflict {
            message: "duplicate".to_string(),
        };
        assert!(err.guidance().contains("Change the conflicting input"));
    }

    #[test]
    fn test_display() {
        let err = WorkflowError::Precondition { step: 2 };
        assert_eq!(
            err.to_string(),
            "step 2 requires a created record; complete step 1 first"
        );
    }
}
