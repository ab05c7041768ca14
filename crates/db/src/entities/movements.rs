//! `SeaORM` Entity for the `movements` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{LocationKind, MovementStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub document_number: String,
    pub movement_type_id: Uuid,
    pub status: MovementStatus,
    pub movement_date: Date,
    pub source_kind: Option<LocationKind>,
    pub source_id: Option<Uuid>,
    pub destination_kind: Option<LocationKind>,
    pub destination_id: Option<Uuid>,
    pub total_quantity: Decimal,
    pub total_amount: Decimal,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub cancelled_by: Option<Uuid>,
    pub cancelled_at: Option<DateTimeWithTimeZone>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movement_types::Entity",
        from = "Column::MovementTypeId",
        to = "super::movement_types::Column::Id"
    )]
    MovementTypes,
    #[sea_orm(has_many = "super::movement_lines::Entity")]
    MovementLines,
    #[sea_orm(has_many = "super::kardex_entries::Entity")]
    KardexEntries,
}

impl Related<super::movement_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovementTypes.def()
    }
}

impl Related<super::movement_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovementLines.def()
    }
}

impl Related<super::kardex_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::KardexEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
