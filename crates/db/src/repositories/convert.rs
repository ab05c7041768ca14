//! Conversions between database enum types and core domain types.

use kardex_core::catalog::{MovementDirection, StockEffect};
use kardex_core::movement::{LocationKind, LocationRef, MovementStatus};
use kardex_core::stock::TransactionKind;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums as db_enums;

pub(crate) fn status_to_core(status: &db_enums::MovementStatus) -> MovementStatus {
    match status {
        db_enums::MovementStatus::Pending => MovementStatus::Pending,
        db_enums::MovementStatus::Approved => MovementStatus::Approved,
        db_enums::MovementStatus::Cancelled => MovementStatus::Cancelled,
    }
}

pub(crate) const fn status_to_db(status: MovementStatus) -> db_enums::MovementStatus {
    match status {
        MovementStatus::Pending => db_enums::MovementStatus::Pending,
        MovementStatus::Approved => db_enums::MovementStatus::Approved,
        MovementStatus::Cancelled => db_enums::MovementStatus::Cancelled,
    }
}

pub(crate) fn direction_to_core(direction: &db_enums::MovementDirection) -> MovementDirection {
    match direction {
        db_enums::MovementDirection::Inbound => MovementDirection::Inbound,
        db_enums::MovementDirection::Outbound => MovementDirection::Outbound,
        db_enums::MovementDirection::Transfer => MovementDirection::Transfer,
        db_enums::MovementDirection::Adjustment => MovementDirection::Adjustment,
    }
}

pub(crate) const fn direction_to_db(direction: MovementDirection) -> db_enums::MovementDirection {
    match direction {
        MovementDirection::Inbound => db_enums::MovementDirection::Inbound,
        MovementDirection::Outbound => db_enums::MovementDirection::Outbound,
        MovementDirection::Transfer => db_enums::MovementDirection::Transfer,
        MovementDirection::Adjustment => db_enums::MovementDirection::Adjustment,
    }
}

pub(crate) fn effect_to_core(effect: &db_enums::StockEffect) -> StockEffect {
    match effect {
        db_enums::StockEffect::Increase => StockEffect::Increase,
        db_enums::StockEffect::Decrease => StockEffect::Decrease,
        db_enums::StockEffect::Neutral => StockEffect::Neutral,
    }
}

pub(crate) const fn effect_to_db(effect: StockEffect) -> db_enums::StockEffect {
    match effect {
        StockEffect::Increase => db_enums::StockEffect::Increase,
        StockEffect::Decrease => db_enums::StockEffect::Decrease,
        StockEffect::Neutral => db_enums::StockEffect::Neutral,
    }
}

pub(crate) fn location_kind_to_core(kind: &db_enums::LocationKind) -> LocationKind {
    match kind {
        db_enums::LocationKind::Warehouse => LocationKind::Warehouse,
        db_enums::LocationKind::Store => LocationKind::Store,
        db_enums::LocationKind::Supplier => LocationKind::Supplier,
        db_enums::LocationKind::Customer => LocationKind::Customer,
    }
}

pub(crate) const fn location_kind_to_db(kind: LocationKind) -> db_enums::LocationKind {
    match kind {
        LocationKind::Warehouse => db_enums::LocationKind::Warehouse,
        LocationKind::Store => db_enums::LocationKind::Store,
        LocationKind::Supplier => db_enums::LocationKind::Supplier,
        LocationKind::Customer => db_enums::LocationKind::Customer,
    }
}

pub(crate) const fn kind_to_db(kind: TransactionKind) -> db_enums::TransactionKind {
    match kind {
        TransactionKind::Increase => db_enums::TransactionKind::Increase,
        TransactionKind::Decrease => db_enums::TransactionKind::Decrease,
    }
}

/// Rebuilds a `LocationRef` from the paired endpoint columns.
pub(crate) fn location_ref(
    kind: Option<&db_enums::LocationKind>,
    id: Option<Uuid>,
) -> Option<LocationRef> {
    match (kind, id) {
        (Some(kind), Some(id)) => Some(LocationRef {
            kind: location_kind_to_core(kind),
            id,
        }),
        _ => None,
    }
}
