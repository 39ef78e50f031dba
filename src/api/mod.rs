//! Typed client boundary for the remote EMR backend
//!
//! This module provides:
//! - The `EmrBackend` trait the sequencer depends on
//! - A reqwest-based implementation against the JSON-over-HTTP backend
//! - Error classification with conflict recognition

pub mod client;
pub mod error;
pub mod types;

pub use client::EmrClient;
pub use error::ApiError;
pub use types::{CreatedRecord, PatientSummary, SessionAggregate, Subrecord};

use async_trait::async_trait;
use serde_json::Value;

use crate::workflow::registry::WorkflowKind;

/// Trait for the remote EMR backend.
///
/// The step executor and resume flow depend on this seam rather than on a
/// concrete HTTP client, so tests can drive the sequencer against an
/// in-memory backend.
#[async_trait]
pub trait EmrBackend: Send + Sync {
    /// Backend name for logging (e.g. "emr", "mock")
    fn name(&self) -> &str;

    /// Creation-step mutation. May fail with a conflict-class error when a
    /// record already exists for the same entity and date.
    async fn create_initial(
        &self,
        kind: WorkflowKind,
        payload: &Value,
    ) -> Result<CreatedRecord, ApiError>;

    /// Append a sub-record to a parent record. An empty payload is a valid,
    /// explicit submission (a skipped optional step).
    async fn create_subrecord(
        &self,
        kind: WorkflowKind,
        parent_id: &str,
        slot: &str,
        payload: &Value,
    ) -> Result<Subrecord, ApiError>;

    /// Fetch the full aggregate for a parent record; the resume flow uses
    /// slot presence/absence to compute the resume point.
    async fn get_complete(
        &self,
        kind: WorkflowKind,
        parent_id: &str,
    ) -> Result<SessionAggregate, ApiError>;

    /// Read-only patient lookup for header context
    async fn get_patient(&self, patient_id: &str) -> Result<PatientSummary, ApiError>;
}
