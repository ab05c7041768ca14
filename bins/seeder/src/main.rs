//! Database seeder for Kardex development and testing.
//!
//! Seeds a custom movement type and a draft purchase receipt so a fresh
//! database has something to approve and browse. System movement types are
//! installed by the initial migration, not here.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;
use kardex_db::entities::{
    movement_lines, movement_types, movements,
    sea_orm_active_enums::{LocationKind, MovementDirection, MovementStatus, StockEffect},
};

/// Demo warehouse ID (consistent for all seeds)
const DEMO_WAREHOUSE_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo user ID (consistent for all seeds)
const DEMO_USER_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Demo product ID (consistent for all seeds)
const DEMO_PRODUCT_ID: &str = "00000000-0000-0000-0000-000000000003";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = kardex_shared::AppConfig::load().expect("Failed to load configuration");

    println!("Connecting to database...");
    let db = kardex_db::connect_with_config(&config.database)
        .await
        .expect("Failed to connect to database");

    println!("Seeding customer return movement type...");
    seed_return_type(&db).await;

    println!("Seeding draft purchase receipt...");
    seed_draft_receipt(&db).await;

    println!("Seeding complete!");
}

fn demo_warehouse_id() -> Uuid {
    Uuid::parse_str(DEMO_WAREHOUSE_ID).unwrap()
}

fn demo_user_id() -> Uuid {
    Uuid::parse_str(DEMO_USER_ID).unwrap()
}

fn demo_product_id() -> Uuid {
    Uuid::parse_str(DEMO_PRODUCT_ID).unwrap()
}

/// Seeds a user-defined inbound type for customer returns.
async fn seed_return_type(db: &DatabaseConnection) {
    let exists = movement_types::Entity::find()
        .filter(movement_types::Column::Code.eq("CUSTOMER_RETURN"))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some();
    if exists {
        println!("  Customer return type already exists, skipping");
        return;
    }

    let now = Utc::now().into();
    movement_types::ActiveModel {
        id: Set(Uuid::now_v7()),
        code: Set("CUSTOMER_RETURN".to_string()),
        name: Set("Customer return".to_string()),
        direction: Set(MovementDirection::Inbound),
        effect: Set(StockEffect::Increase),
        requires_source: Set(false),
        requires_destination: Set(true),
        is_system: Set(false),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to seed customer return type");
}

/// Seeds a pending purchase receipt with one line.
async fn seed_draft_receipt(db: &DatabaseConnection) {
    const DOCUMENT_NUMBER: &str = "IN-SEED0001";

    let exists = movements::Entity::find()
        .filter(movements::Column::DocumentNumber.eq(DOCUMENT_NUMBER))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some();
    if exists {
        println!("  Draft receipt already exists, skipping");
        return;
    }

    let purchase_in = movement_types::Entity::find()
        .filter(movement_types::Column::Code.eq("PURCHASE_IN"))
        .one(db)
        .await
        .expect("Failed to query movement types")
        .expect("PURCHASE_IN must be seeded by the initial migration");

    let now = Utc::now().into();
    let quantity = Decimal::new(100, 0);
    let unit_cost = Decimal::new(1050, 2);

    let movement = movements::ActiveModel {
        id: Set(Uuid::now_v7()),
        document_number: Set(DOCUMENT_NUMBER.to_string()),
        movement_type_id: Set(purchase_in.id),
        status: Set(MovementStatus::Pending),
        movement_date: Set(Utc::now().date_naive()),
        source_kind: Set(None),
        source_id: Set(None),
        destination_kind: Set(Some(LocationKind::Warehouse)),
        destination_id: Set(Some(demo_warehouse_id())),
        total_quantity: Set(quantity),
        total_amount: Set(quantity * unit_cost),
        reference: Set(Some("PO-2026-0001".to_string())),
        notes: Set(Some("Seeded draft receipt".to_string())),
        created_by: Set(demo_user_id()),
        approved_by: Set(None),
        approved_at: Set(None),
        cancelled_by: Set(None),
        cancelled_at: Set(None),
        cancellation_reason: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to seed draft receipt");

    movement_lines::ActiveModel {
        id: Set(Uuid::now_v7()),
        movement_id: Set(movement.id),
        product_id: Set(demo_product_id()),
        quantity: Set(quantity),
        unit_code: Set("EA".to_string()),
        unit_cost: Set(unit_cost),
        base_quantity: Set(quantity),
        line_total: Set(quantity * unit_cost),
        lot_number: Set(None),
        serial_number: Set(None),
        expiry_date: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to seed draft receipt line");
}
