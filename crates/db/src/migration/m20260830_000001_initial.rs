//! Initial database migration.
//!
//! Creates all enums, tables, indexes, and triggers for the stock ledger,
//! and seeds the system movement types.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: MOVEMENT TYPE CATALOG
        // ============================================================
        db.execute_unprepared(MOVEMENT_TYPES_SQL).await?;

        // ============================================================
        // PART 3: MOVEMENTS & LINES
        // ============================================================
        db.execute_unprepared(MOVEMENTS_SQL).await?;
        db.execute_unprepared(MOVEMENT_LINES_SQL).await?;

        // ============================================================
        // PART 4: STOCK BALANCES & KARDEX
        // ============================================================
        db.execute_unprepared(STOCK_BALANCES_SQL).await?;
        db.execute_unprepared(KARDEX_ENTRIES_SQL).await?;

        // ============================================================
        // PART 5: DOCUMENT NUMBERING
        // ============================================================
        db.execute_unprepared(DOCUMENT_SEQUENCES_SQL).await?;

        // ============================================================
        // PART 6: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        // ============================================================
        // PART 7: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_MOVEMENT_TYPES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Movement lifecycle status
CREATE TYPE movement_status AS ENUM (
    'pending',
    'approved',
    'cancelled'
);

-- Direction of goods flow
CREATE TYPE movement_direction AS ENUM (
    'inbound',
    'outbound',
    'transfer',
    'adjustment'
);

-- Balance effect of a movement type
CREATE TYPE stock_effect AS ENUM (
    'increase',
    'decrease',
    'neutral'
);

-- Kind of party or place an endpoint points at
CREATE TYPE location_kind AS ENUM (
    'warehouse',
    'store',
    'supplier',
    'customer'
);

-- Sign of a kardex entry
CREATE TYPE transaction_kind AS ENUM (
    'increase',
    'decrease'
);
";

const MOVEMENT_TYPES_SQL: &str = r"
CREATE TABLE movement_types (
    id UUID PRIMARY KEY,
    code VARCHAR(50) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    direction movement_direction NOT NULL,
    effect stock_effect NOT NULL,
    requires_source BOOLEAN NOT NULL DEFAULT FALSE,
    requires_destination BOOLEAN NOT NULL DEFAULT FALSE,
    is_system BOOLEAN NOT NULL DEFAULT FALSE,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const MOVEMENTS_SQL: &str = r"
CREATE TABLE movements (
    id UUID PRIMARY KEY,
    document_number VARCHAR(20) NOT NULL UNIQUE,
    movement_type_id UUID NOT NULL REFERENCES movement_types(id),
    status movement_status NOT NULL DEFAULT 'pending',
    movement_date DATE NOT NULL,
    source_kind location_kind,
    source_id UUID,
    destination_kind location_kind,
    destination_id UUID,
    total_quantity NUMERIC(18, 6) NOT NULL DEFAULT 0,
    total_amount NUMERIC(18, 6) NOT NULL DEFAULT 0,
    reference VARCHAR(255),
    notes TEXT,
    created_by UUID NOT NULL,
    approved_by UUID,
    approved_at TIMESTAMPTZ,
    cancelled_by UUID,
    cancelled_at TIMESTAMPTZ,
    cancellation_reason TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- Endpoint columns come and go together
    CONSTRAINT chk_source_endpoint CHECK (
        (source_kind IS NULL) = (source_id IS NULL)
    ),
    CONSTRAINT chk_destination_endpoint CHECK (
        (destination_kind IS NULL) = (destination_id IS NULL)
    )
);

CREATE INDEX idx_movements_type ON movements(movement_type_id);
CREATE INDEX idx_movements_status ON movements(status);
CREATE INDEX idx_movements_date ON movements(movement_date);
";

const MOVEMENT_LINES_SQL: &str = r"
CREATE TABLE movement_lines (
    id UUID PRIMARY KEY,
    movement_id UUID NOT NULL REFERENCES movements(id) ON DELETE CASCADE,
    product_id UUID NOT NULL,
    quantity NUMERIC(18, 6) NOT NULL CHECK (quantity > 0),
    unit_code VARCHAR(20) NOT NULL,
    unit_cost NUMERIC(18, 6) NOT NULL CHECK (unit_cost >= 0),
    base_quantity NUMERIC(18, 6) NOT NULL CHECK (base_quantity > 0),
    line_total NUMERIC(18, 6) NOT NULL,
    lot_number VARCHAR(100),
    serial_number VARCHAR(100),
    expiry_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_movement_lines_movement ON movement_lines(movement_id);
CREATE INDEX idx_movement_lines_product ON movement_lines(product_id);
";

const STOCK_BALANCES_SQL: &str = r"
CREATE TABLE stock_balances (
    id UUID PRIMARY KEY,
    product_id UUID NOT NULL,
    location_kind location_kind NOT NULL,
    location_id UUID NOT NULL,
    lot_number VARCHAR(100),
    quantity_on_hand NUMERIC(18, 6) NOT NULL DEFAULT 0 CHECK (quantity_on_hand >= 0),
    reserved_quantity NUMERIC(18, 6) NOT NULL DEFAULT 0 CHECK (reserved_quantity >= 0),
    weighted_average_unit_cost NUMERIC(18, 6) NOT NULL DEFAULT 0,
    total_value NUMERIC(18, 6) NOT NULL DEFAULT 0,
    last_movement_id UUID,
    last_movement_at TIMESTAMPTZ,
    version BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- Only internal locations hold balances
    CONSTRAINT chk_internal_location CHECK (
        location_kind IN ('warehouse', 'store')
    ),
    CONSTRAINT uq_stock_balances_key UNIQUE NULLS NOT DISTINCT
        (product_id, location_kind, location_id, lot_number)
);

CREATE INDEX idx_stock_balances_product ON stock_balances(product_id);
CREATE INDEX idx_stock_balances_location ON stock_balances(location_kind, location_id);
";

const KARDEX_ENTRIES_SQL: &str = r"
CREATE TABLE kardex_entries (
    id UUID PRIMARY KEY,
    product_id UUID NOT NULL,
    location_kind location_kind NOT NULL,
    location_id UUID NOT NULL,
    lot_number VARCHAR(100),
    movement_id UUID NOT NULL REFERENCES movements(id),
    movement_line_id UUID NOT NULL REFERENCES movement_lines(id),
    transaction_kind transaction_kind NOT NULL,
    quantity NUMERIC(18, 6) NOT NULL CHECK (quantity > 0),
    unit_cost NUMERIC(18, 6) NOT NULL,
    total_cost NUMERIC(18, 6) NOT NULL,
    serial_number VARCHAR(100),
    balance_quantity_after NUMERIC(18, 6) NOT NULL,
    balance_value_after NUMERIC(18, 6) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_kardex_product_location
    ON kardex_entries(product_id, location_kind, location_id, created_at);
CREATE INDEX idx_kardex_movement ON kardex_entries(movement_id);
";

const DOCUMENT_SEQUENCES_SQL: &str = r"
CREATE TABLE document_sequences (
    prefix VARCHAR(10) PRIMARY KEY,
    next_value BIGINT NOT NULL DEFAULT 1,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_movement_types_updated_at
    BEFORE UPDATE ON movement_types
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_movements_updated_at
    BEFORE UPDATE ON movements
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_movement_lines_updated_at
    BEFORE UPDATE ON movement_lines
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_stock_balances_updated_at
    BEFORE UPDATE ON stock_balances
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const SEED_MOVEMENT_TYPES_SQL: &str = r"
INSERT INTO movement_types
    (id, code, name, direction, effect, requires_source, requires_destination, is_system, is_active)
VALUES
    (gen_random_uuid(), 'PURCHASE_IN', 'Purchase receipt', 'inbound', 'increase', FALSE, TRUE, TRUE, TRUE),
    (gen_random_uuid(), 'SALE_OUT', 'Sales shipment', 'outbound', 'decrease', TRUE, FALSE, TRUE, TRUE),
    (gen_random_uuid(), 'TRANSFER', 'Stock transfer', 'transfer', 'neutral', TRUE, TRUE, TRUE, TRUE),
    (gen_random_uuid(), 'ADJUST_IN', 'Adjustment in', 'adjustment', 'increase', FALSE, TRUE, TRUE, TRUE),
    (gen_random_uuid(), 'ADJUST_OUT', 'Adjustment out', 'adjustment', 'decrease', TRUE, FALSE, TRUE, TRUE)
ON CONFLICT (code) DO NOTHING;
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS kardex_entries CASCADE;
DROP TABLE IF EXISTS stock_balances CASCADE;
DROP TABLE IF EXISTS movement_lines CASCADE;
DROP TABLE IF EXISTS movements CASCADE;
DROP TABLE IF EXISTS movement_types CASCADE;
DROP TABLE IF EXISTS document_sequences CASCADE;

DROP FUNCTION IF EXISTS set_updated_at CASCADE;

DROP TYPE IF EXISTS transaction_kind;
DROP TYPE IF EXISTS location_kind;
DROP TYPE IF EXISTS stock_effect;
DROP TYPE IF EXISTS movement_direction;
DROP TYPE IF EXISTS movement_status;
";
