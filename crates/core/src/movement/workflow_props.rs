//! Property-based tests for the movement status machine.
//!
//! Feature: movement-workflow
//! - Property: the transition relation is exactly the documented machine
//! - Property: cancelled movements accept no further transitions
//! - Property: reversal is required exactly when cancelling an approved movement

use proptest::prelude::*;
use kardex_shared::types::UserId;

use super::types::{MovementStatus, WorkflowAction};
use super::workflow::WorkflowService;

fn status_strategy() -> impl Strategy<Value = MovementStatus> {
    prop_oneof![
        Just(MovementStatus::Pending),
        Just(MovementStatus::Approved),
        Just(MovementStatus::Cancelled),
    ]
}

fn reason_strategy() -> impl Strategy<Value = String> {
    "[a-z ]{1,40}".prop_filter("reason must not be blank", |s| !s.trim().is_empty())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Property: approve succeeds exactly from Pending (with lines present).
    // =========================================================================
    #[test]
    fn prop_approve_only_from_pending(
        status in status_strategy(),
        line_count in 1usize..10,
    ) {
        let result = WorkflowService::approve(status, line_count, UserId::new());
        prop_assert_eq!(result.is_ok(), status == MovementStatus::Pending);
    }

    // =========================================================================
    // Property: cancel succeeds exactly from Pending or Approved.
    // =========================================================================
    #[test]
    fn prop_cancel_only_from_non_terminal(
        status in status_strategy(),
        reason in reason_strategy(),
    ) {
        let result = WorkflowService::cancel(status, UserId::new(), &reason);
        prop_assert_eq!(result.is_ok(), status != MovementStatus::Cancelled);
    }

    // =========================================================================
    // Property: reversal is flagged iff the cancelled movement was approved.
    // =========================================================================
    #[test]
    fn prop_reversal_flag_matches_prior_status(
        status in status_strategy(),
        reason in reason_strategy(),
    ) {
        if let Ok(WorkflowAction::Cancel { requires_reversal, .. }) =
            WorkflowService::cancel(status, UserId::new(), &reason)
        {
            prop_assert_eq!(requires_reversal, status == MovementStatus::Approved);
        }
    }

    // =========================================================================
    // Property: blank reasons are rejected regardless of status.
    // =========================================================================
    #[test]
    fn prop_blank_reason_always_rejected(
        status in status_strategy(),
        spaces in 0usize..6,
    ) {
        let reason = " ".repeat(spaces);
        prop_assert!(WorkflowService::cancel(status, UserId::new(), &reason).is_err());
    }

    // =========================================================================
    // Property: the transition table is consistent with the action services.
    // =========================================================================
    #[test]
    fn prop_transition_table_consistent(
        from in status_strategy(),
        to in status_strategy(),
    ) {
        let allowed = WorkflowService::is_valid_transition(from, to);
        match to {
            MovementStatus::Approved => {
                prop_assert_eq!(allowed, WorkflowService::approve(from, 1, UserId::new()).is_ok());
            }
            MovementStatus::Cancelled => {
                prop_assert_eq!(
                    allowed,
                    WorkflowService::cancel(from, UserId::new(), "reason").is_ok()
                );
            }
            MovementStatus::Pending => prop_assert!(!allowed),
        }
    }
}
