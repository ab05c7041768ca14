//! Workflow repository for movement status transitions.
//!
//! Approval applies the movement's balance operations and appends kardex
//! entries; cancellation of an approved movement appends compensating
//! entries. Each transition runs in a single database transaction, so a
//! failure on any line leaves no partial effects behind.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use sea_orm::{ColumnTrait, QueryFilter};
use thiserror::Error;
use tracing::{info, warn};

use kardex_core::catalog::{BalanceEndpoint, BalanceOp, CatalogError, OpKind, ledger_ops};
use kardex_core::events::MovementEvent;
use kardex_core::movement::{LocationRef, MovementError, WorkflowAction, WorkflowService};
use kardex_core::stock::{BalanceKey, ReversalEngine, StockError};
use kardex_shared::types::{MovementId, ProductId, UserId};

use super::convert::{location_ref, status_to_core, status_to_db};
use super::movement_type::model_to_core as type_to_core;
use super::stock::{EntryContext, apply_decrease, apply_increase, apply_restoring_increase};
use crate::entities::{movement_lines, movement_types, movements};

/// Errors from workflow transitions.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Domain validation or lifecycle error.
    #[error(transparent)]
    Movement(#[from] MovementError),
    /// Movement type catalog error.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// Balance application error.
    #[error(transparent)]
    Stock(#[from] StockError),
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl WorkflowError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Movement(e) => e.error_code(),
            Self::Catalog(e) => e.error_code(),
            Self::Stock(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code hint for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Movement(e) => e.status_code(),
            Self::Catalog(e) => e.status_code(),
            Self::Stock(e) => e.status_code(),
            Self::Database(_) => 500,
        }
    }

    /// Returns true if the caller may retry the transition unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Stock(e) if e.is_retryable())
    }
}

/// Result of approving a movement.
#[derive(Debug, Clone)]
pub struct ApproveResult {
    /// The movement header after the transition.
    pub movement: movements::Model,
    /// The lifecycle event to hand to subscribers.
    pub event: MovementEvent,
}

/// Result of cancelling a movement.
#[derive(Debug, Clone)]
pub struct CancelResult {
    /// The movement header after the transition.
    pub movement: movements::Model,
    /// Whether applied stock effects were reversed.
    pub was_reversed: bool,
    /// The lifecycle event to hand to subscribers.
    pub event: MovementEvent,
}

/// Repository for movement status transitions.
#[derive(Debug, Clone)]
pub struct WorkflowRepository {
    db: DatabaseConnection,
}

impl WorkflowRepository {
    /// Creates a new workflow repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Approves a pending movement and applies its stock effects.
    ///
    /// # Errors
    ///
    /// Returns an error if the movement is not pending, has no lines, lacks
    /// stock for a decrease, or a database operation fails. A
    /// `StockError::ConcurrentModification` is retryable.
    pub async fn approve(
        &self,
        movement_id: MovementId,
        approved_by: UserId,
    ) -> Result<ApproveResult, WorkflowError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        let (movement, lines, ops) = load_for_transition(&txn, movement_id).await?;

        let action =
            WorkflowService::approve(status_to_core(&movement.status), lines.len(), approved_by)?;
        let WorkflowAction::Approve {
            new_status,
            approved_by: approver,
            approved_at,
        } = action
        else {
            return Err(WorkflowError::Database(
                "approve produced a non-approve action".to_string(),
            ));
        };

        let source = location_ref(movement.source_kind.as_ref(), movement.source_id);
        let destination = location_ref(movement.destination_kind.as_ref(), movement.destination_id);

        for line in &lines {
            for op in &ops {
                apply_op(&txn, *op, line, source, destination, false).await?;
            }
        }

        let mut active: movements::ActiveModel = movement.into();
        active.status = Set(status_to_db(new_status));
        active.approved_by = Set(Some(approver.into_inner()));
        active.approved_at = Set(Some(approved_at.into()));
        active.updated_at = Set(Utc::now().into());
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        info!(
            movement_id = %movement_id,
            document_number = %updated.document_number,
            "movement approved"
        );

        Ok(ApproveResult {
            movement: updated,
            event: MovementEvent::Approved {
                movement_id,
                approved_by: approver,
                occurred_at: approved_at,
            },
        })
    }

    /// Cancels a movement, reversing applied stock effects if it was
    /// approved.
    ///
    /// # Errors
    ///
    /// Returns an error if the movement is already cancelled, the reason is
    /// blank, or the reversal conflicts with stock consumed since approval.
    pub async fn cancel(
        &self,
        movement_id: MovementId,
        cancelled_by: UserId,
        reason: &str,
    ) -> Result<CancelResult, WorkflowError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        let (movement, lines, ops) = load_for_transition(&txn, movement_id).await?;

        let action =
            WorkflowService::cancel(status_to_core(&movement.status), cancelled_by, reason)?;
        let WorkflowAction::Cancel {
            new_status,
            requires_reversal,
            cancelled_by: canceller,
            cancelled_at,
            reason,
        } = action
        else {
            return Err(WorkflowError::Database(
                "cancel produced a non-cancel action".to_string(),
            ));
        };

        if requires_reversal {
            let source = location_ref(movement.source_kind.as_ref(), movement.source_id);
            let destination =
                location_ref(movement.destination_kind.as_ref(), movement.destination_id);
            let reversing = ReversalEngine::reversing_ops(&ops);

            for line in &lines {
                for op in &reversing {
                    apply_op(&txn, *op, line, source, destination, true).await?;
                }
            }
            warn!(
                movement_id = %movement_id,
                document_number = %movement.document_number,
                "approved movement reversed on cancellation"
            );
        }

        let mut active: movements::ActiveModel = movement.into();
        active.status = Set(status_to_db(new_status));
        active.cancelled_by = Set(Some(canceller.into_inner()));
        active.cancelled_at = Set(Some(cancelled_at.into()));
        active.cancellation_reason = Set(Some(reason.clone()));
        active.updated_at = Set(Utc::now().into());
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        info!(
            movement_id = %movement_id,
            document_number = %updated.document_number,
            was_reversed = requires_reversal,
            "movement cancelled"
        );

        Ok(CancelResult {
            movement: updated,
            was_reversed: requires_reversal,
            event: MovementEvent::Cancelled {
                movement_id,
                cancelled_by: canceller,
                was_reversed: requires_reversal,
                reason,
                occurred_at: cancelled_at,
            },
        })
    }
}

/// Loads the movement, its lines in insertion order, and the balance
/// operations its type maps to.
///
/// The header row is locked for the rest of the transaction, so concurrent
/// transitions and line edits on the same movement serialize and each sees
/// the previous one's committed status.
async fn load_for_transition<C: ConnectionTrait>(
    conn: &C,
    movement_id: MovementId,
) -> Result<(movements::Model, Vec<movement_lines::Model>, Vec<BalanceOp>), WorkflowError> {
    let movement = movements::Entity::find_by_id(movement_id.into_inner())
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(|e| WorkflowError::Database(e.to_string()))?
        .ok_or(MovementError::MovementNotFound(movement_id))?;

    let lines = movement_lines::Entity::find()
        .filter(movement_lines::Column::MovementId.eq(movement.id))
        .order_by_asc(movement_lines::Column::CreatedAt)
        .all(conn)
        .await
        .map_err(|e| WorkflowError::Database(e.to_string()))?;

    let type_model = movement_types::Entity::find_by_id(movement.movement_type_id)
        .one(conn)
        .await
        .map_err(|e| WorkflowError::Database(e.to_string()))?
        .ok_or_else(|| {
            CatalogError::TypeNotFound(kardex_shared::types::MovementTypeId::from_uuid(
                movement.movement_type_id,
            ))
        })?;
    let movement_type = type_to_core(&type_model);
    let ops = ledger_ops(movement_type.direction, movement_type.effect)?;

    Ok((movement, lines, ops))
}

/// Applies one balance operation for one line. During reversal, a shortage
/// is reclassified as a reversal conflict.
async fn apply_op<C: ConnectionTrait>(
    conn: &C,
    op: BalanceOp,
    line: &movement_lines::Model,
    source: Option<LocationRef>,
    destination: Option<LocationRef>,
    reversing: bool,
) -> Result<(), WorkflowError> {
    let location = endpoint_location(op.endpoint, source, destination)?;
    let key = BalanceKey {
        product_id: ProductId::from_uuid(line.product_id),
        location,
        lot_number: line.lot_number.clone(),
    };
    let context = EntryContext {
        movement_id: line.movement_id,
        movement_line_id: line.id,
        serial_number: line.serial_number.clone(),
    };

    let result = match op.kind {
        // A reversing increase restores a prior decrease, valued at the
        // row's weighted-average cost rather than the line cost.
        OpKind::Increase if reversing => {
            apply_restoring_increase(conn, &key, line.base_quantity, line.unit_cost, &context)
                .await
        }
        OpKind::Increase => {
            apply_increase(conn, &key, line.base_quantity, line.unit_cost, &context).await
        }
        OpKind::Decrease => apply_decrease(conn, &key, line.base_quantity, &context).await,
    };

    match result {
        Ok(_) => Ok(()),
        Err(err) if reversing => Err(ReversalEngine::classify_failure(err).into()),
        Err(err) => Err(err.into()),
    }
}

/// Resolves the location an operation targets, requiring it to exist and to
/// be an internal stock location.
fn endpoint_location(
    endpoint: BalanceEndpoint,
    source: Option<LocationRef>,
    destination: Option<LocationRef>,
) -> Result<LocationRef, WorkflowError> {
    let location = match endpoint {
        BalanceEndpoint::Source => source.ok_or(MovementError::MissingSourceLocation)?,
        BalanceEndpoint::Destination => {
            destination.ok_or(MovementError::MissingDestinationLocation)?
        }
    };
    if !location.kind.is_internal() {
        return Err(MovementError::EndpointNotInternal(location).into());
    }
    Ok(location)
}
