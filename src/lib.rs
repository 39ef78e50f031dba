//! Clinicflow - clinical workflow step-sequencer for EMR encounters
//!
//! Governs multi-step clinical encounters (HTS testing sessions, EAC
//! adherence-counseling episodes) that are created incrementally against a
//! remote EMR backend, one step at a time, and can be resumed mid-way after
//! interruption. The embedding UI layer owns rendering; this crate owns the
//! step topology, the resume policy, step execution against the backend, and
//! the wizard state machine.

pub mod api;
pub mod config;
pub mod logging;
pub mod session;
pub mod workflow;
