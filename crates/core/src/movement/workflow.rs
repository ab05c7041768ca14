//! Movement status transitions.
//!
//! The status machine is deliberately small:
//!
//! ```text
//! Pending ---> Approved ---> Cancelled (with reversal)
//!    |
//!    +-------> Cancelled
//! ```
//!
//! Cancelled is terminal. Approving applies stock effects; cancelling an
//! approved movement reverses them.

use chrono::Utc;
use kardex_shared::types::UserId;

use super::error::MovementError;
use super::types::{MovementStatus, WorkflowAction};

/// Stateless service validating movement status transitions.
///
/// Produces `WorkflowAction` values describing the transition and its audit
/// fields; persistence and stock effects are applied by the caller inside a
/// single database transaction.
pub struct WorkflowService;

impl WorkflowService {
    /// Returns true if the transition between the two statuses is allowed.
    #[must_use]
    pub const fn is_valid_transition(from: MovementStatus, to: MovementStatus) -> bool {
        matches!(
            (from, to),
            (MovementStatus::Pending, MovementStatus::Approved)
                | (
                    MovementStatus::Pending | MovementStatus::Approved,
                    MovementStatus::Cancelled
                )
        )
    }

    /// Validate approval of a movement.
    ///
    /// # Errors
    ///
    /// Returns `MovementError::InvalidTransition` unless the movement is
    /// pending, and `MovementError::NoLines` for a movement without lines.
    pub fn approve(
        current: MovementStatus,
        line_count: usize,
        approved_by: UserId,
    ) -> Result<WorkflowAction, MovementError> {
        if !Self::is_valid_transition(current, MovementStatus::Approved) {
            return Err(MovementError::InvalidTransition {
                from: current,
                to: MovementStatus::Approved,
            });
        }
        if line_count == 0 {
            return Err(MovementError::NoLines);
        }

        Ok(WorkflowAction::Approve {
            new_status: MovementStatus::Approved,
            approved_by,
            approved_at: Utc::now(),
        })
    }

    /// Validate cancellation of a movement.
    ///
    /// Cancelling an approved movement flags the action as requiring a
    /// reversal of its applied stock effects.
    ///
    /// # Errors
    ///
    /// Returns `MovementError::CancellationReasonRequired` for a blank
    /// reason and `MovementError::InvalidTransition` for a movement that is
    /// already cancelled.
    pub fn cancel(
        current: MovementStatus,
        cancelled_by: UserId,
        reason: &str,
    ) -> Result<WorkflowAction, MovementError> {
        if reason.trim().is_empty() {
            return Err(MovementError::CancellationReasonRequired);
        }
        if !Self::is_valid_transition(current, MovementStatus::Cancelled) {
            return Err(MovementError::InvalidTransition {
                from: current,
                to: MovementStatus::Cancelled,
            });
        }

        Ok(WorkflowAction::Cancel {
            new_status: MovementStatus::Cancelled,
            requires_reversal: current == MovementStatus::Approved,
            cancelled_by,
            cancelled_at: Utc::now(),
            reason: reason.trim().to_string(),
        })
    }
}
