//! Movement document repository.
//!
//! Handles creation with document numbering, pending-only line editing, and
//! list/detail queries. Status transitions live in the workflow repository.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use thiserror::Error;
use uuid::Uuid;

use kardex_core::catalog::CatalogError;
use kardex_core::events::MovementEvent;
use kardex_core::movement::{
    CreateMovementInput, MovementError, MovementLineInput, MovementService, ResolvedLine,
    format_document_number,
};
use kardex_shared::types::{
    MovementId, MovementLineId, MovementTypeId, PageRequest, PageResponse, ProductId,
};

use super::convert::{location_kind_to_db, status_to_core, status_to_db};
use super::movement_type::model_to_core as type_to_core;
use crate::entities::{document_sequences, movement_lines, movement_types, movements};
use crate::entities::sea_orm_active_enums::MovementStatus as DbMovementStatus;

/// Errors from movement document operations.
#[derive(Debug, Error)]
pub enum MovementRepoError {
    /// Domain validation or lifecycle error.
    #[error(transparent)]
    Movement(#[from] MovementError),
    /// Movement type catalog error.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl MovementRepoError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Movement(e) => e.error_code(),
            Self::Catalog(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code hint for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Movement(e) => e.status_code(),
            Self::Catalog(e) => e.status_code(),
            Self::Database(_) => 500,
        }
    }
}

/// A movement header together with its lines.
#[derive(Debug, Clone)]
pub struct MovementWithLines {
    /// The movement header.
    pub movement: movements::Model,
    /// The movement lines.
    pub lines: Vec<movement_lines::Model>,
}

/// Filter for movement list queries.
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    /// Restrict to one status.
    pub status: Option<kardex_core::movement::MovementStatus>,
    /// Restrict to one movement type.
    pub movement_type_id: Option<MovementTypeId>,
    /// Restrict to movements carrying a line for this product.
    pub product_id: Option<ProductId>,
    /// Movements dated on or after this date.
    pub date_from: Option<NaiveDate>,
    /// Movements dated on or before this date.
    pub date_to: Option<NaiveDate>,
}

/// Repository for movement documents.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    db: DatabaseConnection,
}

impl MovementRepository {
    /// Creates a new movement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a movement in pending status.
    ///
    /// The document number is claimed from the per-direction sequence inside
    /// the same transaction as the header and line inserts.
    ///
    /// # Errors
    ///
    /// Returns an error if the movement type cannot be resolved, validation
    /// fails, or a database operation fails.
    pub async fn create<U, P>(
        &self,
        input: CreateMovementInput,
        unit_to_base: U,
        product_exists: P,
    ) -> Result<(MovementWithLines, MovementEvent), MovementRepoError>
    where
        U: Fn(ProductId, &str, Decimal) -> Option<Decimal>,
        P: Fn(ProductId) -> bool,
    {
        let type_model = movement_types::Entity::find_by_id(input.movement_type_id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| MovementRepoError::Database(e.to_string()))?
            .ok_or(CatalogError::TypeNotFound(input.movement_type_id))?;
        let movement_type = type_to_core(&type_model);
        movement_type.validate_usable()?;

        let (resolved, totals) = MovementService::validate_and_resolve(
            &input,
            &movement_type,
            unit_to_base,
            product_exists,
        )?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| MovementRepoError::Database(e.to_string()))?;

        let sequence = next_sequence(&txn, movement_type.direction.document_prefix()).await?;
        let document_number = format_document_number(movement_type.direction, sequence);

        let movement_id = MovementId::new();
        let now = Utc::now().into();
        let header = movements::ActiveModel {
            id: Set(movement_id.into_inner()),
            document_number: Set(document_number.clone()),
            movement_type_id: Set(type_model.id),
            status: Set(DbMovementStatus::Pending),
            movement_date: Set(input.movement_date),
            source_kind: Set(input.source.map(|l| location_kind_to_db(l.kind))),
            source_id: Set(input.source.map(|l| l.id)),
            destination_kind: Set(input.destination.map(|l| location_kind_to_db(l.kind))),
            destination_id: Set(input.destination.map(|l| l.id)),
            total_quantity: Set(totals.total_quantity),
            total_amount: Set(totals.total_amount),
            reference: Set(input.reference.clone()),
            notes: Set(input.notes.clone()),
            created_by: Set(input.created_by.into_inner()),
            approved_by: Set(None),
            approved_at: Set(None),
            cancelled_by: Set(None),
            cancelled_at: Set(None),
            cancellation_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let movement = header
            .insert(&txn)
            .await
            .map_err(|e| MovementRepoError::Database(e.to_string()))?;

        let mut lines = Vec::with_capacity(resolved.len());
        for line in &resolved {
            lines.push(insert_line(&txn, movement_id.into_inner(), line).await?);
        }

        txn.commit()
            .await
            .map_err(|e| MovementRepoError::Database(e.to_string()))?;

        let event = MovementEvent::Created {
            movement_id,
            document_number,
            created_by: input.created_by,
            occurred_at: Utc::now(),
        };
        Ok((MovementWithLines { movement, lines }, event))
    }

    /// Fetches a movement with its lines.
    ///
    /// # Errors
    ///
    /// Returns `MovementError::MovementNotFound` if no record exists.
    pub async fn get(&self, id: MovementId) -> Result<MovementWithLines, MovementRepoError> {
        let movement = movements::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| MovementRepoError::Database(e.to_string()))?
            .ok_or(MovementError::MovementNotFound(id))?;
        let lines = movement
            .find_related(movement_lines::Entity)
            .order_by_asc(movement_lines::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| MovementRepoError::Database(e.to_string()))?;
        Ok(MovementWithLines { movement, lines })
    }

    /// Lists movements matching a filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        filter: &MovementFilter,
        page: PageRequest,
    ) -> Result<PageResponse<movements::Model>, MovementRepoError> {
        let mut query = movements::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(movements::Column::Status.eq(status_to_db(status)));
        }
        if let Some(type_id) = filter.movement_type_id {
            query = query.filter(movements::Column::MovementTypeId.eq(type_id.into_inner()));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(movements::Column::MovementDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(movements::Column::MovementDate.lte(to));
        }
        if let Some(product_id) = filter.product_id {
            query = query
                .inner_join(movement_lines::Entity)
                .filter(movement_lines::Column::ProductId.eq(product_id.into_inner()))
                .distinct();
        }
        let query = query
            .order_by_desc(movements::Column::MovementDate)
            .order_by_desc(movements::Column::DocumentNumber);

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| MovementRepoError::Database(e.to_string()))?;
        let data = query
            .paginate(&self.db, page.limit())
            .fetch_page(u64::from(page.page.saturating_sub(1)))
            .await
            .map_err(|e| MovementRepoError::Database(e.to_string()))?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Adds a line to a pending movement and refreshes the header totals.
    ///
    /// # Errors
    ///
    /// Returns `MovementError::NotEditable` unless the movement is pending.
    pub async fn add_line<U, P>(
        &self,
        movement_id: MovementId,
        line: MovementLineInput,
        unit_to_base: U,
        product_exists: P,
    ) -> Result<movement_lines::Model, MovementRepoError>
    where
        U: Fn(ProductId, &str, Decimal) -> Option<Decimal>,
        P: Fn(ProductId) -> bool,
    {
        let resolved = MovementService::resolve_line(&line, &unit_to_base, &product_exists)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| MovementRepoError::Database(e.to_string()))?;
        let movement = editable_movement(&txn, movement_id).await?;
        let inserted = insert_line(&txn, movement.id, &resolved).await?;
        refresh_totals(&txn, movement.id).await?;
        txn.commit()
            .await
            .map_err(|e| MovementRepoError::Database(e.to_string()))?;

        Ok(inserted)
    }

    /// Replaces a line on a pending movement and refreshes the header totals.
    ///
    /// # Errors
    ///
    /// Returns `MovementError::NotEditable` unless the movement is pending.
    pub async fn update_line<U, P>(
        &self,
        line_id: MovementLineId,
        line: MovementLineInput,
        unit_to_base: U,
        product_exists: P,
    ) -> Result<movement_lines::Model, MovementRepoError>
    where
        U: Fn(ProductId, &str, Decimal) -> Option<Decimal>,
        P: Fn(ProductId) -> bool,
    {
        let resolved = MovementService::resolve_line(&line, &unit_to_base, &product_exists)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| MovementRepoError::Database(e.to_string()))?;

        let existing = movement_lines::Entity::find_by_id(line_id.into_inner())
            .one(&txn)
            .await
            .map_err(|e| MovementRepoError::Database(e.to_string()))?
            .ok_or(MovementError::LineNotFound(line_id))?;
        editable_movement(&txn, MovementId::from_uuid(existing.movement_id)).await?;

        let movement_id = existing.movement_id;
        let mut active: movement_lines::ActiveModel = existing.into();
        active.product_id = Set(resolved.product_id.into_inner());
        active.quantity = Set(resolved.quantity);
        active.unit_code = Set(resolved.unit_code.clone());
        active.unit_cost = Set(resolved.unit_cost);
        active.base_quantity = Set(resolved.base_quantity);
        active.line_total = Set(resolved.line_total);
        active.lot_number = Set(resolved.lot_number.clone());
        active.serial_number = Set(resolved.serial_number.clone());
        active.expiry_date = Set(resolved.expiry_date);
        active.updated_at = Set(Utc::now().into());
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| MovementRepoError::Database(e.to_string()))?;

        refresh_totals(&txn, movement_id).await?;
        txn.commit()
            .await
            .map_err(|e| MovementRepoError::Database(e.to_string()))?;

        Ok(updated)
    }

    /// Removes a line from a pending movement and refreshes the header totals.
    ///
    /// # Errors
    ///
    /// Returns `MovementError::NotEditable` unless the movement is pending.
    pub async fn remove_line(&self, line_id: MovementLineId) -> Result<(), MovementRepoError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| MovementRepoError::Database(e.to_string()))?;

        let existing = movement_lines::Entity::find_by_id(line_id.into_inner())
            .one(&txn)
            .await
            .map_err(|e| MovementRepoError::Database(e.to_string()))?
            .ok_or(MovementError::LineNotFound(line_id))?;
        editable_movement(&txn, MovementId::from_uuid(existing.movement_id)).await?;

        let movement_id = existing.movement_id;
        existing
            .delete(&txn)
            .await
            .map_err(|e| MovementRepoError::Database(e.to_string()))?;
        refresh_totals(&txn, movement_id).await?;
        txn.commit()
            .await
            .map_err(|e| MovementRepoError::Database(e.to_string()))?;

        Ok(())
    }

}

/// Loads a movement with its header row locked for the rest of the
/// transaction and checks it is still editable. The lock serializes line
/// edits against concurrent approve/cancel calls, so a line can never land
/// on a movement that just left pending.
async fn editable_movement<C: ConnectionTrait>(
    conn: &C,
    id: MovementId,
) -> Result<movements::Model, MovementRepoError> {
    let movement = movements::Entity::find_by_id(id.into_inner())
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(|e| MovementRepoError::Database(e.to_string()))?
        .ok_or(MovementError::MovementNotFound(id))?;
    MovementService::validate_editable(status_to_core(&movement.status))?;
    Ok(movement)
}

/// Claims the next value from a document sequence, creating the row on first
/// use. The row is locked for the rest of the transaction so numbers are
/// never handed out twice.
async fn next_sequence<C: ConnectionTrait>(
    conn: &C,
    prefix: &str,
) -> Result<i64, MovementRepoError> {
    let existing = document_sequences::Entity::find_by_id(prefix.to_string())
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(|e| MovementRepoError::Database(e.to_string()))?;

    match existing {
        Some(row) => {
            let value = row.next_value;
            let mut active: document_sequences::ActiveModel = row.into();
            active.next_value = Set(value + 1);
            active.updated_at = Set(Utc::now().into());
            active
                .update(conn)
                .await
                .map_err(|e| MovementRepoError::Database(e.to_string()))?;
            Ok(value)
        }
        None => {
            let active = document_sequences::ActiveModel {
                prefix: Set(prefix.to_string()),
                next_value: Set(2),
                updated_at: Set(Utc::now().into()),
            };
            active
                .insert(conn)
                .await
                .map_err(|e| MovementRepoError::Database(e.to_string()))?;
            Ok(1)
        }
    }
}

async fn insert_line<C: ConnectionTrait>(
    conn: &C,
    movement_id: Uuid,
    line: &ResolvedLine,
) -> Result<movement_lines::Model, MovementRepoError> {
    let now = Utc::now().into();
    let active = movement_lines::ActiveModel {
        id: Set(MovementLineId::new().into_inner()),
        movement_id: Set(movement_id),
        product_id: Set(line.product_id.into_inner()),
        quantity: Set(line.quantity),
        unit_code: Set(line.unit_code.clone()),
        unit_cost: Set(line.unit_cost),
        base_quantity: Set(line.base_quantity),
        line_total: Set(line.line_total),
        lot_number: Set(line.lot_number.clone()),
        serial_number: Set(line.serial_number.clone()),
        expiry_date: Set(line.expiry_date),
        created_at: Set(now),
        updated_at: Set(now),
    };
    active
        .insert(conn)
        .await
        .map_err(|e| MovementRepoError::Database(e.to_string()))
}

/// Recomputes header totals from the stored lines.
async fn refresh_totals<C: ConnectionTrait>(
    conn: &C,
    movement_id: Uuid,
) -> Result<(), MovementRepoError> {
    let lines = movement_lines::Entity::find()
        .filter(movement_lines::Column::MovementId.eq(movement_id))
        .all(conn)
        .await
        .map_err(|e| MovementRepoError::Database(e.to_string()))?;

    let total_quantity: Decimal = lines.iter().map(|l| l.base_quantity).sum();
    let total_amount: Decimal = lines.iter().map(|l| l.line_total).sum();

    let movement = movements::Entity::find_by_id(movement_id)
        .one(conn)
        .await
        .map_err(|e| MovementRepoError::Database(e.to_string()))?
        .ok_or(MovementError::MovementNotFound(MovementId::from_uuid(
            movement_id,
        )))?;
    let mut active: movements::ActiveModel = movement.into();
    active.total_quantity = Set(total_quantity);
    active.total_amount = Set(total_amount);
    active.updated_at = Set(Utc::now().into());
    active
        .update(conn)
        .await
        .map_err(|e| MovementRepoError::Database(e.to_string()))?;
    Ok(())
}
