//! Stock balance and kardex repository.
//!
//! Balance rows are updated with an optimistic version check; a lost race
//! surfaces as `StockError::ConcurrentModification`, which aborts the
//! surrounding transaction and lets the caller retry.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use kardex_core::movement::LocationRef;
use kardex_core::stock::{BalanceKey, StockBalance, StockError, TransactionKind};
use kardex_shared::types::{PageRequest, PageResponse, ProductId};

use super::convert::{kind_to_db, location_kind_to_db};
use crate::entities::{kardex_entries, stock_balances};

/// Filter for kardex history queries.
#[derive(Debug, Clone, Default)]
pub struct KardexFilter {
    /// Restrict to one product.
    pub product_id: Option<ProductId>,
    /// Restrict to one location.
    pub location: Option<LocationRef>,
    /// Restrict to one movement.
    pub movement_id: Option<Uuid>,
    /// Entries recorded on or after this date.
    pub from: Option<NaiveDate>,
    /// Entries recorded on or before this date.
    pub to: Option<NaiveDate>,
}

/// Audit context written onto kardex entries.
#[derive(Debug, Clone)]
pub(crate) struct EntryContext {
    /// The movement causing the change.
    pub movement_id: Uuid,
    /// The movement line causing the change.
    pub movement_line_id: Uuid,
    /// Optional serial number from the line.
    pub serial_number: Option<String>,
}

/// Repository for stock balances and kardex history.
#[derive(Debug, Clone)]
pub struct StockRepository {
    db: DatabaseConnection,
}

impl StockRepository {
    /// Creates a new stock repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetches the balance row for one (product, location, lot) key.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_balance(
        &self,
        key: &BalanceKey,
    ) -> Result<Option<stock_balances::Model>, StockError> {
        find_balance(&self.db, key).await
    }

    /// Lists balance rows, optionally restricted to a product or location.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_balances(
        &self,
        product_id: Option<ProductId>,
        location: Option<LocationRef>,
        page: PageRequest,
    ) -> Result<PageResponse<stock_balances::Model>, StockError> {
        let mut query = stock_balances::Entity::find();
        if let Some(product_id) = product_id {
            query = query.filter(stock_balances::Column::ProductId.eq(product_id.into_inner()));
        }
        if let Some(location) = location {
            query = query
                .filter(stock_balances::Column::LocationKind.eq(location_kind_to_db(location.kind)))
                .filter(stock_balances::Column::LocationId.eq(location.id));
        }
        let query = query
            .order_by_asc(stock_balances::Column::ProductId)
            .order_by_asc(stock_balances::Column::LocationId);

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| StockError::Database(e.to_string()))?;
        let data = query
            .paginate(&self.db, page.limit())
            .fetch_page(u64::from(page.page.saturating_sub(1)))
            .await
            .map_err(|e| StockError::Database(e.to_string()))?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Lists kardex entries matching a filter, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn kardex(
        &self,
        filter: &KardexFilter,
        page: PageRequest,
    ) -> Result<PageResponse<kardex_entries::Model>, StockError> {
        let mut query = kardex_entries::Entity::find();
        if let Some(product_id) = filter.product_id {
            query = query.filter(kardex_entries::Column::ProductId.eq(product_id.into_inner()));
        }
        if let Some(location) = filter.location {
            query = query
                .filter(kardex_entries::Column::LocationKind.eq(location_kind_to_db(location.kind)))
                .filter(kardex_entries::Column::LocationId.eq(location.id));
        }
        if let Some(movement_id) = filter.movement_id {
            query = query.filter(kardex_entries::Column::MovementId.eq(movement_id));
        }
        if let Some(from) = filter.from {
            query = query.filter(
                kardex_entries::Column::CreatedAt.gte(from.and_hms_opt(0, 0, 0).map(|d| d.and_utc())),
            );
        }
        if let Some(to) = filter.to {
            query = query.filter(
                kardex_entries::Column::CreatedAt
                    .lt(to.succ_opt().and_then(|d| d.and_hms_opt(0, 0, 0)).map(|d| d.and_utc())),
            );
        }
        // Entries written in one transaction can share a timestamp; the
        // time-ordered id keeps append order deterministic.
        let query = query
            .order_by_asc(kardex_entries::Column::CreatedAt)
            .order_by_asc(kardex_entries::Column::Id);

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| StockError::Database(e.to_string()))?;
        let data = query
            .paginate(&self.db, page.limit())
            .fetch_page(u64::from(page.page.saturating_sub(1)))
            .await
            .map_err(|e| StockError::Database(e.to_string()))?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }
}

fn balance_filter(key: &BalanceKey) -> sea_orm::Select<stock_balances::Entity> {
    let mut query = stock_balances::Entity::find()
        .filter(stock_balances::Column::ProductId.eq(key.product_id.into_inner()))
        .filter(stock_balances::Column::LocationKind.eq(location_kind_to_db(key.location.kind)))
        .filter(stock_balances::Column::LocationId.eq(key.location.id));
    query = match &key.lot_number {
        Some(lot) => query.filter(stock_balances::Column::LotNumber.eq(lot.clone())),
        None => query.filter(stock_balances::Column::LotNumber.is_null()),
    };
    query
}

pub(crate) async fn find_balance<C: ConnectionTrait>(
    conn: &C,
    key: &BalanceKey,
) -> Result<Option<stock_balances::Model>, StockError> {
    balance_filter(key)
        .one(conn)
        .await
        .map_err(|e| StockError::Database(e.to_string()))
}

/// Adds stock at the key, creating the balance row on first receipt, and
/// appends the kardex entry in the same transaction.
pub(crate) async fn apply_increase<C: ConnectionTrait>(
    conn: &C,
    key: &BalanceKey,
    quantity: Decimal,
    unit_cost: Decimal,
    context: &EntryContext,
) -> Result<stock_balances::Model, StockError> {
    let updated = match find_balance(conn, key).await? {
        Some(model) => {
            let mut balance = model_to_core(&model);
            balance.apply_increase(quantity, unit_cost)?;
            persist_balance(conn, &model, &balance, context).await?
        }
        None => {
            let mut balance = StockBalance::empty();
            balance.apply_increase(quantity, unit_cost)?;
            insert_balance(conn, key, &balance, context).await?
        }
    };

    append_kardex(
        conn,
        key,
        &updated,
        TransactionKind::Increase,
        quantity,
        unit_cost,
        context,
    )
    .await?;
    Ok(updated)
}

/// Puts back stock removed by an earlier decrease. The increase is valued at
/// the row's current weighted-average cost, the cost the original decrease
/// was booked at, so both quantity and cost return to their prior values.
pub(crate) async fn apply_restoring_increase<C: ConnectionTrait>(
    conn: &C,
    key: &BalanceKey,
    quantity: Decimal,
    fallback_cost: Decimal,
    context: &EntryContext,
) -> Result<stock_balances::Model, StockError> {
    let unit_cost = find_balance(conn, key)
        .await?
        .map_or(fallback_cost, |m| m.weighted_average_unit_cost);
    apply_increase(conn, key, quantity, unit_cost, context).await
}

/// Removes stock at the key and appends the kardex entry in the same
/// transaction. Issues are valued at the row's current weighted-average cost.
pub(crate) async fn apply_decrease<C: ConnectionTrait>(
    conn: &C,
    key: &BalanceKey,
    quantity: Decimal,
    context: &EntryContext,
) -> Result<stock_balances::Model, StockError> {
    let Some(model) = find_balance(conn, key).await? else {
        return Err(StockError::InsufficientStock {
            available: Decimal::ZERO,
            requested: quantity,
        });
    };

    let mut balance = model_to_core(&model);
    balance.apply_decrease(quantity)?;
    let unit_cost = balance.weighted_average_unit_cost;
    let updated = persist_balance(conn, &model, &balance, context).await?;

    append_kardex(
        conn,
        key,
        &updated,
        TransactionKind::Decrease,
        quantity,
        unit_cost,
        context,
    )
    .await?;
    Ok(updated)
}

fn model_to_core(model: &stock_balances::Model) -> StockBalance {
    StockBalance {
        quantity_on_hand: model.quantity_on_hand,
        reserved_quantity: model.reserved_quantity,
        weighted_average_unit_cost: model.weighted_average_unit_cost,
    }
}

async fn insert_balance<C: ConnectionTrait>(
    conn: &C,
    key: &BalanceKey,
    balance: &StockBalance,
    context: &EntryContext,
) -> Result<stock_balances::Model, StockError> {
    let now = Utc::now().into();
    let active = stock_balances::ActiveModel {
        id: Set(Uuid::now_v7()),
        product_id: Set(key.product_id.into_inner()),
        location_kind: Set(location_kind_to_db(key.location.kind)),
        location_id: Set(key.location.id),
        lot_number: Set(key.lot_number.clone()),
        quantity_on_hand: Set(balance.quantity_on_hand),
        reserved_quantity: Set(balance.reserved_quantity),
        weighted_average_unit_cost: Set(balance.weighted_average_unit_cost),
        total_value: Set(balance.total_value()),
        last_movement_id: Set(Some(context.movement_id)),
        last_movement_at: Set(Some(now)),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };

    // A concurrent first receipt for the same key trips the unique
    // constraint; report it as retryable.
    active.insert(conn).await.map_err(|e| {
        let message = e.to_string();
        if message.contains("uq_stock_balances_key") {
            StockError::ConcurrentModification
        } else {
            StockError::Database(message)
        }
    })
}

async fn persist_balance<C: ConnectionTrait>(
    conn: &C,
    model: &stock_balances::Model,
    balance: &StockBalance,
    context: &EntryContext,
) -> Result<stock_balances::Model, StockError> {
    let result = stock_balances::Entity::update_many()
        .col_expr(
            stock_balances::Column::QuantityOnHand,
            Expr::value(balance.quantity_on_hand),
        )
        .col_expr(
            stock_balances::Column::WeightedAverageUnitCost,
            Expr::value(balance.weighted_average_unit_cost),
        )
        .col_expr(
            stock_balances::Column::TotalValue,
            Expr::value(balance.total_value()),
        )
        .col_expr(
            stock_balances::Column::LastMovementId,
            Expr::value(Some(context.movement_id)),
        )
        .col_expr(
            stock_balances::Column::LastMovementAt,
            Expr::value(Some(Utc::now())),
        )
        .col_expr(
            stock_balances::Column::Version,
            Expr::value(model.version + 1),
        )
        .filter(stock_balances::Column::Id.eq(model.id))
        .filter(stock_balances::Column::Version.eq(model.version))
        .exec(conn)
        .await
        .map_err(|e| StockError::Database(e.to_string()))?;

    if result.rows_affected == 0 {
        return Err(StockError::ConcurrentModification);
    }

    stock_balances::Entity::find_by_id(model.id)
        .one(conn)
        .await
        .map_err(|e| StockError::Database(e.to_string()))?
        .ok_or(StockError::ConcurrentModification)
}

async fn append_kardex<C: ConnectionTrait>(
    conn: &C,
    key: &BalanceKey,
    balance: &stock_balances::Model,
    kind: TransactionKind,
    quantity: Decimal,
    unit_cost: Decimal,
    context: &EntryContext,
) -> Result<(), StockError> {
    let active = kardex_entries::ActiveModel {
        id: Set(Uuid::now_v7()),
        product_id: Set(key.product_id.into_inner()),
        location_kind: Set(location_kind_to_db(key.location.kind)),
        location_id: Set(key.location.id),
        lot_number: Set(key.lot_number.clone()),
        movement_id: Set(context.movement_id),
        movement_line_id: Set(context.movement_line_id),
        transaction_kind: Set(kind_to_db(kind)),
        quantity: Set(quantity),
        unit_cost: Set(unit_cost),
        total_cost: Set(quantity * unit_cost),
        serial_number: Set(context.serial_number.clone()),
        balance_quantity_after: Set(balance.quantity_on_hand),
        balance_value_after: Set(balance.total_value),
        created_at: Set(Utc::now().into()),
    };

    active
        .insert(conn)
        .await
        .map_err(|e| StockError::Database(e.to_string()))?;
    Ok(())
}
