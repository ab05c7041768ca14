//! `SeaORM` Entity for the `stock_balances` table.
//!
//! One row per (product, location, lot). The `version` column backs
//! optimistic locking for concurrent balance updates.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::LocationKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_balances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub location_kind: LocationKind,
    pub location_id: Uuid,
    pub lot_number: Option<String>,
    pub quantity_on_hand: Decimal,
    pub reserved_quantity: Decimal,
    pub weighted_average_unit_cost: Decimal,
    pub total_value: Decimal,
    pub last_movement_id: Option<Uuid>,
    pub last_movement_at: Option<DateTimeWithTimeZone>,
    pub version: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
