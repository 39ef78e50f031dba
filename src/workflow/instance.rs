//! In-memory state for one workflow encounter.
//!
//! Owned exclusively by the wizard for its lifetime; all durable state
//! lives server-side. The instance is discarded once the final step
//! redirects away.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::workflow::registry::WorkflowKind;

/// Client-side state of one in-progress encounter
#[derive(Debug, Clone)]
pub struct WorkflowInstance {
    /// Correlation id for logging; never sent to the backend
    pub instance_id: String,
    /// Workflow this instance runs
    pub kind: WorkflowKind,
    /// Patient the encounter belongs to
    pub patient_id: String,
    /// Backend-assigned record id; `None` until step 1 completes
    pub record_id: Option<String>,
    /// Steps acknowledged by the backend
    pub completed_steps: BTreeSet<u32>,
    /// Data submitted (or pre-filled) per step, kept for back-navigation
    pub step_payloads: BTreeMap<u32, Value>,
    /// Step the wizard currently shows
    pub current_step: u32,
}

impl WorkflowInstance {
    /// Fresh instance starting at step 1
    pub fn new(kind: WorkflowKind, patient_id: impl Into<String>) -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
            kind,
            patient_id: patient_id.into(),
            record_id: None,
            completed_steps: BTreeSet::new(),
            step_payloads: BTreeMap::new(),
            current_step: 1,
        }
    }

    /// Capture the record id returned by the creation step. Later steps are
    /// invalid without it.
    pub fn record_created(&mut self, record_id: impl Into<String>) {
        self.record_id = Some(record_id.into());
    }

    /// Record a step as acknowledged and remember what was submitted
    pub fn complete_step(&mut self, step_id: u32, payload: Value) {
        self.completed_steps.insert(step_id);
        self.step_payloads.insert(step_id, payload);
    }

    /// Previously submitted payload for a step (for pre-filling on return)
    pub fn payload_for(&self, step_id: u32) -> Option<&Value> {
        self.step_payloads.get(&step_id)
    }

    pub fn is_step_completed(&self, step_id: u32) -> bool {
        self.completed_steps.contains(&step_id)
    }

    /// Progress as (completed, total)
    pub fn progress(&self) -> (usize, usize) {
        (self.completed_steps.len(), self.kind.len())
    }
}
