//! Domain events emitted by movement lifecycle operations.
//!
//! Events are returned to the caller alongside operation results; delivery
//! (message bus, webhooks, audit trail) is the caller's concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use kardex_shared::types::{MovementId, UserId};

/// A movement lifecycle event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MovementEvent {
    /// A movement document was created in pending status.
    Created {
        /// The new movement.
        movement_id: MovementId,
        /// The document number assigned to it.
        document_number: String,
        /// The creating user.
        created_by: UserId,
        /// When the movement was created.
        occurred_at: DateTime<Utc>,
    },
    /// A movement was approved and its stock effects applied.
    Approved {
        /// The approved movement.
        movement_id: MovementId,
        /// The approving user.
        approved_by: UserId,
        /// When the approval happened.
        occurred_at: DateTime<Utc>,
    },
    /// A movement was cancelled.
    Cancelled {
        /// The cancelled movement.
        movement_id: MovementId,
        /// The cancelling user.
        cancelled_by: UserId,
        /// Whether stock effects were reversed (the movement was approved).
        was_reversed: bool,
        /// Why the movement was cancelled.
        reason: String,
        /// When the cancellation happened.
        occurred_at: DateTime<Utc>,
    },
}

impl MovementEvent {
    /// The movement the event concerns.
    #[must_use]
    pub const fn movement_id(&self) -> MovementId {
        match self {
            Self::Created { movement_id, .. }
            | Self::Approved { movement_id, .. }
            | Self::Cancelled { movement_id, .. } => *movement_id,
        }
    }

    /// The event name used in serialized payloads.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Approved { .. } => "approved",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}
