//! Database enum types mapped to Postgres enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Movement status enum (`movement_status`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "movement_status")]
pub enum MovementStatus {
    /// Editable draft awaiting approval.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved; stock effects applied.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Cancelled; applied effects reversed.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Movement direction enum (`movement_direction`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "movement_direction")]
pub enum MovementDirection {
    /// Goods enter the organization.
    #[sea_orm(string_value = "inbound")]
    Inbound,
    /// Goods leave the organization.
    #[sea_orm(string_value = "outbound")]
    Outbound,
    /// Goods move between internal locations.
    #[sea_orm(string_value = "transfer")]
    Transfer,
    /// Stock correction.
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}

/// Stock effect enum (`stock_effect`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "stock_effect")]
pub enum StockEffect {
    /// Adds stock at the destination.
    #[sea_orm(string_value = "increase")]
    Increase,
    /// Removes stock from the source.
    #[sea_orm(string_value = "decrease")]
    Decrease,
    /// Relocates stock without changing the total.
    #[sea_orm(string_value = "neutral")]
    Neutral,
}

/// Location kind enum (`location_kind`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "location_kind")]
pub enum LocationKind {
    /// Internal warehouse.
    #[sea_orm(string_value = "warehouse")]
    Warehouse,
    /// Internal retail store.
    #[sea_orm(string_value = "store")]
    Store,
    /// External supplier.
    #[sea_orm(string_value = "supplier")]
    Supplier,
    /// External customer.
    #[sea_orm(string_value = "customer")]
    Customer,
}

/// Kardex transaction kind enum (`transaction_kind`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_kind")]
pub enum TransactionKind {
    /// Stock was added at the location.
    #[sea_orm(string_value = "increase")]
    Increase,
    /// Stock was removed from the location.
    #[sea_orm(string_value = "decrease")]
    Decrease,
}
