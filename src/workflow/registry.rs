//! Static step definitions for each workflow kind.
//!
//! The registry is pure data: the ordered step list fixed at compile time.
//! Order is significant — it defines both progress display and the valid
//! transition order, and the resolver scans slots in this order.

use serde::{Deserialize, Serialize};

/// Kind of multi-step clinical encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    /// HIV Testing Services session (6 steps)
    Hts,
    /// Enhanced Adherence Counseling episode (single creation step)
    Eac,
}

/// How the executor treats a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Step 1: creates the parent record and captures its id
    Create,
    /// Appends a sub-record to the captured parent record
    Detail,
    /// Final step that may be submitted with an empty payload to mean
    /// "skip". The skip is still submitted, so a later resume sees the slot
    /// present rather than not-yet-reached.
    OptionalTerminal,
}

/// One step of a workflow definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// 1-based id; contiguous within a workflow
    pub id: u32,
    /// Sub-record slot name in the backend aggregate
    pub slot: &'static str,
    /// Display name
    pub name: &'static str,
    /// Short description for progress UI
    pub description: &'static str,
    /// Executor behavior for this step
    pub kind: StepKind,
}

const HTS_STEPS: &[Step] = &[
    Step {
        id: 1,
        slot: "initial",
        name: "Initial intake",
        description: "Client details, consent, and session creation",
        kind: StepKind::Create,
    },
    Step {
        id: 2,
        slot: "pre_test",
        name: "Pre-test counseling",
        description: "Risk assessment and pre-test information",
        kind: StepKind::Detail,
    },
    Step {
        id: 3,
        slot: "lab_order",
        name: "Lab ordering",
        description: "Order laboratory tests for this session",
        kind: StepKind::Detail,
    },
    Step {
        id: 4,
        slot: "testing",
        name: "Testing",
        description: "Record test kits used and results",
        kind: StepKind::Detail,
    },
    Step {
        id: 5,
        slot: "post_test",
        name: "Post-test counseling",
        description: "Result disclosure and counseling notes",
        kind: StepKind::Detail,
    },
    Step {
        id: 6,
        slot: "referral",
        name: "Referral",
        description: "Optional referral to care or prevention services",
        kind: StepKind::OptionalTerminal,
    },
];

const EAC_STEPS: &[Step] = &[Step {
    id: 1,
    slot: "episode",
    name: "Episode creation",
    description: "Open an adherence counseling episode",
    kind: StepKind::Create,
}];

impl WorkflowKind {
    /// Ordered step definition for this workflow kind
    pub fn steps(&self) -> &'static [Step] {
        match self {
            WorkflowKind::Hts => HTS_STEPS,
            WorkflowKind::Eac => EAC_STEPS,
        }
    }

    /// Backend resource path segment for this workflow kind
    pub fn resource(&self) -> &'static str {
        match self {
            WorkflowKind::Hts => "hts-sessions",
            WorkflowKind::Eac => "eac-episodes",
        }
    }

    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            WorkflowKind::Hts => "HTS session",
            WorkflowKind::Eac => "EAC episode",
        }
    }

    /// Look up a step by id
    pub fn step(&self, id: u32) -> Option<&'static Step> {
        self.steps().iter().find(|s| s.id == id)
    }

    /// The creation step
    pub fn first_step(&self) -> &'static Step {
        &self.steps()[0]
    }

    /// The final step
    pub fn last_step(&self) -> &'static Step {
        let steps = self.steps();
        &steps[steps.len() - 1]
    }

    /// The step after `id`, or `None` if `id` is the final step
    pub fn step_after(&self, id: u32) -> Option<&'static Step> {
        self.steps().iter().find(|s| s.id == id + 1)
    }

    /// Whether `id` is the final step of this workflow
    pub fn is_final_step(&self, id: u32) -> bool {
        self.last_step().id == id
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps().len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// All workflow kinds (for registry-wide checks)
    pub fn all() -> &'static [WorkflowKind] {
        &[WorkflowKind::Hts, WorkflowKind::Eac]
    }
}
