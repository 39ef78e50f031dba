//! Step execution against the backend.
//!
//! Exactly one remote mutation per successful submission, no automatic
//! retries. The creation step captures the returned record id before any
//! later step may run; later steps refuse to run without it and perform
//! zero network calls in that case.

use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::{ApiError, EmrBackend};
use crate::workflow::error::WorkflowError;
use crate::workflow::instance::WorkflowInstance;
use crate::workflow::registry::{StepKind, WorkflowKind};

/// Where the wizard goes after a successful step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Advance to this step
    Step(u32),
    /// Final step acknowledged; redirect away
    Terminal,
}

/// Result of a successful step execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub next: NextStep,
}

/// Applies one step's input against the backend
pub struct StepExecutor {
    backend: Arc<dyn EmrBackend>,
}

impl StepExecutor {
    pub fn new(backend: Arc<dyn EmrBackend>) -> Self {
        Self { backend }
    }

    /// Execute one step. On success the instance records the completion
    /// (and, for the creation step, the captured record id) before the
    /// outcome is returned. On failure the instance is left untouched.
    pub async fn execute(
        &self,
        step_id: u32,
        payload: Value,
        instance: &mut WorkflowInstance,
    ) -> Result<StepOutcome, WorkflowError> {
        let kind = instance.kind;
        let step = kind.step(step_id).ok_or(WorkflowError::UnknownStep(step_id))?;

        match step.kind {
            StepKind::Create => {
                let created = self
                    .backend
                    .create_initial(kind, &payload)
                    .await
                    .map_err(|e| self.report(kind, step_id, e))?;
                // Capture the id before anything else: later steps are
                // invalid without it.
                instance.record_created(created.id);
            }
            StepKind::Detail | StepKind::OptionalTerminal => {
                // Precondition check happens before any network call
                let record_id = instance
                    .record_id
                    .clone()
                    .ok_or(WorkflowError::Precondition { step: step_id })?;

                self.backend
                    .create_subrecord(kind, &record_id, step.slot, &payload)
                    .await
                    .map_err(|e| self.report(kind, step_id, e))?;
            }
        }

        instance.complete_step(step_id, payload);
        info!(
            instance_id = %instance.instance_id,
            workflow = kind.display_name(),
            step = step.name,
            step_id,
            "step acknowledged"
        );

        let next = match kind.step_after(step_id) {
            Some(next_step) => NextStep::Step(next_step.id),
            None => NextStep::Terminal,
        };
        Ok(StepOutcome { next })
    }

    fn report(
        &self,
        kind: WorkflowKind,
        step_id: u32,
        err: ApiError,
    ) -> WorkflowError {
        warn!(
            workflow = kind.display_name(),
            step_id,
            backend = self.backend.name(),
            error = %err,
            "step submission failed"
        );
        err.into()
    }
}
