//! Resume-point resolution for partially completed workflows.
//!
//! Pure function of the fetched aggregate: scan the workflow's sub-record
//! slots in step order and resume at the first absent slot. A skipped
//! optional step was submitted as an empty sub-record, so it reads as
//! present here — the resolver never loops back to an already-skipped step.

use crate::api::types::SessionAggregate;
use crate::workflow::registry::WorkflowKind;

/// Where a resumed wizard should reopen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumePoint {
    /// Resume at this step id
    Step(u32),
    /// Every slot is present; redirect to the read-only detail view
    Complete,
}

/// Compute the resume point for a fetched session aggregate.
pub fn resolve(kind: WorkflowKind, session: &SessionAggregate) -> ResumePoint {
    for step in kind.steps() {
        if !session.has_slot(step.slot) {
            return ResumePoint::Step(step.id);
        }
    }
    ResumePoint::Complete
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hts_session(slots: &[&str]) -> SessionAggregate {
        let mut session = SessionAggregate::new("rec-1", "P1");
        for slot in slots {
            session = session.with_slot(*slot, json!({"recorded": true}));
        }
        session
    }

    #[test]
    fn test_fresh_session_resumes_at_first_step() {
        let session = hts_session(&[]);
        assert_eq!(resolve(WorkflowKind::Hts, &session), ResumePoint::Step(1));
    }

    #[test]
    fn test_resumes_at_first_absent_slot() {
        let session = hts_session(&["initial", "pre_test"]);
        assert_eq!(resolve(WorkflowKind::Hts, &session), ResumePoint::Step(3));
    }

    #[test]
    fn test_everything_through_post_test_resumes_at_referral() {
        // All five earlier slots present, referral absent: resume at the
        // referral step, not at lab ordering.
        let session = hts_session(&["initial", "pre_test", "lab_order", "testing", "post_test"]);
        assert_eq!(resolve(WorkflowKind::Hts, &session), ResumePoint::Step(6));
    }

    #[test]
    fn test_all_present_is_complete() {
        let session = hts_session(&[
            "initial",
            "pre_test",
            "lab_order",
            "testing",
            "post_test",
            "referral",
        ]);
        assert_eq!(resolve(WorkflowKind::Hts, &session), ResumePoint::Complete);
    }

    #[test]
    fn test_skipped_referral_reads_as_complete() {
        // Skip is an explicit empty-payload sub-record, not absence
        let session = hts_session(&["initial", "pre_test", "lab_order", "testing", "post_test"])
            .with_slot("referral", json!({}));
        assert_eq!(resolve(WorkflowKind::Hts, &session), ResumePoint::Complete);
    }

    #[test]
    fn test_deterministic_for_same_pattern() {
        let session = hts_session(&["initial", "pre_test", "lab_order"]);
        let first = resolve(WorkflowKind::Hts, &session);
        for _ in 0..10 {
            assert_eq!(resolve(WorkflowKind::Hts, &session), first);
        }
        assert_eq!(first, ResumePoint::Step(4));
    }

    #[test]
    fn test_eac_single_step() {
        let session = SessionAggregate::new("ep-1", "P1");
        assert_eq!(resolve(WorkflowKind::Eac, &session), ResumePoint::Step(1));

        let session = session.with_slot("episode", json!({"reason": "high viral load"}));
        assert_eq!(resolve(WorkflowKind::Eac, &session), ResumePoint::Complete);
    }
}
