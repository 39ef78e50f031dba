//! The clinical workflow step-sequencer.
//!
//! Four collaborating pieces:
//! - `registry`: static ordered step definitions per workflow kind
//! - `resolver`: pure resume-point computation from a fetched aggregate
//! - `executor`: one remote mutation per step, with error classification
//! - `controller`: the wizard state machine the host UI drives

pub mod controller;
pub mod error;
pub mod executor;
pub mod instance;
pub mod registry;
pub mod resolver;

pub use controller::{WizardController, WizardPhase};
pub use error::WorkflowError;
pub use executor::{NextStep, StepExecutor, StepOutcome};
pub use instance::WorkflowInstance;
pub use registry::{Step, StepKind, WorkflowKind};
pub use resolver::{resolve, ResumePoint};
