//! DTOs for the EMR backend JSON contract

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Response to the creation-step mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedRecord {
    /// Backend-assigned id of the new parent record
    pub id: String,
}

/// A step-scoped sub-record attached to a parent workflow record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subrecord {
    pub id: String,
    /// Slot name this sub-record fills (e.g. "testing", "post_test")
    pub slot: String,
    /// Data submitted for the step; an empty object for an explicit skip
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The `getComplete` aggregate: parent record id plus one entry per
/// sub-record slot already completed. Sub-records are only ever added,
/// never removed; absence of a slot is the sole resume-point signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAggregate {
    /// Parent record id
    pub id: String,
    /// Patient this record belongs to
    pub patient_id: String,
    /// Completed slots keyed by slot name. An explicitly skipped optional
    /// step appears here with an empty object payload.
    #[serde(flatten)]
    slots: BTreeMap<String, Value>,
}

impl SessionAggregate {
    pub fn new(id: impl Into<String>, patient_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            patient_id: patient_id.into(),
            slots: BTreeMap::new(),
        }
    }

    /// Record a slot as present (test/builder use mirrors backend shape)
    pub fn with_slot(mut self, slot: impl Into<String>, payload: Value) -> Self {
        self.slots.insert(slot.into(), payload);
        self
    }

    /// Whether a slot is present. A JSON `null` counts as absent — some
    /// backends serialize unreached slots as explicit nulls.
    pub fn has_slot(&self, slot: &str) -> bool {
        self.slots.get(slot).is_some_and(|v| !v.is_null())
    }

    /// Payload stored for a slot, if present
    pub fn slot_payload(&self, slot: &str) -> Option<&Value> {
        self.slots.get(slot).filter(|v| !v.is_null())
    }
}

/// Read-only patient lookup used to populate header context. Not part of
/// the wizard state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub sex: Option<String>,
}
