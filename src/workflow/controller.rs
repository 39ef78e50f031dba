//! Wizard state machine over one workflow instance.
//!
//! Phases: idle-at-step-k, submitting-at-step-k, terminal-redirecting.
//! The controller owns the instance for the lifetime of the wizard page;
//! nothing is persisted client-side. Steps are submitted strictly
//! sequentially: a new submission is refused while one is in flight, and
//! step k+1 is never issued before step k's response is observed.

use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::api::types::PatientSummary;
use crate::api::{ApiError, EmrBackend};
use crate::workflow::error::WorkflowError;
use crate::workflow::executor::{NextStep, StepExecutor, StepOutcome};
use crate::workflow::instance::WorkflowInstance;
use crate::workflow::registry::{Step, StepKind, WorkflowKind};
use crate::workflow::resolver::{resolve, ResumePoint};

/// Wizard lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    /// Showing the current step's form
    Idle,
    /// One submission in flight; further submissions are refused
    Submitting,
    /// Final step acknowledged (or resumed session already complete);
    /// the host should navigate to the read-only detail view
    Redirecting,
}

/// Orchestrates registry, resolver and executor for one encounter
pub struct WizardController {
    backend: Arc<dyn EmrBackend>,
    executor: StepExecutor,
    instance: WorkflowInstance,
    phase: WizardPhase,
    last_error: Option<WorkflowError>,
}

impl WizardController {
    /// Start a fresh workflow at step 1
    pub fn start(
        kind: WorkflowKind,
        patient_id: impl Into<String>,
        backend: Arc<dyn EmrBackend>,
    ) -> Self {
        Self {
            executor: StepExecutor::new(backend.clone()),
            backend,
            instance: WorkflowInstance::new(kind, patient_id),
            phase: WizardPhase::Idle,
            last_error: None,
        }
    }

    /// Resume a partially completed workflow from its server-side record.
    ///
    /// Fetches the aggregate, computes the resume point from slot presence,
    /// and pre-fills payloads for the steps already completed. A fully
    /// completed record opens directly in the redirecting phase.
    pub async fn resume(
        kind: WorkflowKind,
        parent_id: &str,
        backend: Arc<dyn EmrBackend>,
    ) -> Result<Self, WorkflowError> {
        let aggregate = backend
            .get_complete(kind, parent_id)
            .await
            .map_err(WorkflowError::from)?;

        let mut instance = WorkflowInstance::new(kind, aggregate.patient_id.clone());
        instance.record_created(aggregate.id.clone());
        for step in kind.steps() {
            if let Some(payload) = aggregate.slot_payload(step.slot) {
                instance.complete_step(step.id, payload.clone());
            }
        }

        let phase = match resolve(kind, &aggregate) {
            ResumePoint::Step(id) => {
                instance.current_step = id;
                WizardPhase::Idle
            }
            ResumePoint::Complete => WizardPhase::Redirecting,
        };
        info!(
            workflow = kind.display_name(),
            record_id = parent_id,
            ?phase,
            resumed_at = instance.current_step,
            "workflow resumed"
        );

        Ok(Self {
            executor: StepExecutor::new(backend.clone()),
            backend,
            instance,
            phase,
            last_error: None,
        })
    }

    /// The step currently shown, or `None` once redirecting
    pub fn current_step(&self) -> Option<&'static Step> {
        match self.phase {
            WizardPhase::Redirecting => None,
            _ => self.instance.kind.step(self.instance.current_step),
        }
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    /// Whether the host should navigate to the read-only detail view
    pub fn is_redirecting(&self) -> bool {
        self.phase == WizardPhase::Redirecting
    }

    pub fn last_error(&self) -> Option<&WorkflowError> {
        self.last_error.as_ref()
    }

    pub fn record_id(&self) -> Option<&str> {
        self.instance.record_id.as_deref()
    }

    pub fn instance(&self) -> &WorkflowInstance {
        &self.instance
    }

    /// Previously submitted payload for the current step, for pre-filling
    /// the form when the user navigated back
    pub fn prefill(&self) -> Option<&Value> {
        self.instance.payload_for(self.instance.current_step)
    }

    /// Submit the current step's payload.
    ///
    /// On success the wizard advances (or enters the redirecting phase after
    /// the final step). On failure `current_step` and `completed_steps` are
    /// unchanged and the error is retained, so resubmission with corrected
    /// input is always safe.
    pub async fn submit(&mut self, payload: Value) -> Result<StepOutcome, WorkflowError> {
        match self.phase {
            WizardPhase::Submitting => return Err(WorkflowError::SubmissionInFlight),
            WizardPhase::Redirecting => return Err(WorkflowError::AlreadyComplete),
            WizardPhase::Idle => {}
        }

        let step = self
            .instance
            .kind
            .step(self.instance.current_step)
            .ok_or(WorkflowError::UnknownStep(self.instance.current_step))?;
        Self::validate(step, &payload)?;

        self.phase = WizardPhase::Submitting;
        let result = self
            .executor
            .execute(step.id, payload, &mut self.instance)
            .await;

        match result {
            Ok(outcome) => {
                self.last_error = None;
                match outcome.next {
                    NextStep::Step(id) => {
                        self.instance.current_step = id;
                        self.phase = WizardPhase::Idle;
                    }
                    NextStep::Terminal => {
                        self.phase = WizardPhase::Redirecting;
                    }
                }
                Ok(outcome)
            }
            Err(err) => {
                // Failed attempt: stay on the same step, keep completions
                self.phase = WizardPhase::Idle;
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Skip the optional terminal step by submitting an explicit empty
    /// payload. The skip is still a backend submission, so a later resume
    /// sees the slot present.
    pub async fn skip(&mut self) -> Result<StepOutcome, WorkflowError> {
        let step = self.current_step().ok_or(WorkflowError::AlreadyComplete)?;
        if step.kind != StepKind::OptionalTerminal {
            return Err(WorkflowError::validation(format!(
                "step `{}` cannot be skipped",
                step.name
            )));
        }
        self.submit(Value::Object(serde_json::Map::new())).await
    }

    /// Go back one step; the earlier step's payload stays pre-fillable.
    /// Returns false at step 1 or while submitting/redirecting.
    pub fn previous(&mut self) -> bool {
        if self.phase != WizardPhase::Idle || self.instance.current_step <= 1 {
            return false;
        }
        self.instance.current_step -= 1;
        true
    }

    /// Read-only patient lookup for header context; not part of the state
    /// machine
    pub async fn patient_header(&self) -> Result<PatientSummary, ApiError> {
        self.backend.get_patient(&self.instance.patient_id).await
    }

    /// Progress as (completed, total)
    pub fn progress(&self) -> (usize, usize) {
        self.instance.progress()
    }

    /// Format step progress for display
    /// Returns something like: "[Initial intake] > Pre-test counseling > ..."
    pub fn format_progress(&self) -> String {
        let current = self.instance.current_step;
        self.instance
            .kind
            .steps()
            .iter()
            .map(|s| {
                if s.id == current && self.phase != WizardPhase::Redirecting {
                    format!("[{}]", s.name)
                } else {
                    s.name.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" > ")
    }

    /// Client-side validation, run before the executor so invalid input
    /// never reaches the network.
    fn validate(step: &Step, payload: &Value) -> Result<(), WorkflowError> {
        let Some(fields) = payload.as_object() else {
            return Err(WorkflowError::validation("payload must be a JSON object"));
        };

        match step.kind {
            StepKind::Create => {
                for required in ["patient_id", "date"] {
                    if !fields.contains_key(required) {
                        return Err(WorkflowError::validation(format!(
                            "field `{}` is required for {}",
                            required, step.name
                        )));
                    }
                }
            }
            StepKind::Detail => {
                if fields.is_empty() {
                    return Err(WorkflowError::validation(format!(
                        "step `{}` requires form data",
                        step.name
                    )));
                }
            }
            // Empty payload is the explicit skip
            StepKind::OptionalTerminal => {}
        }
        Ok(())
    }
}
