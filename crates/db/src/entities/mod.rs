//! `SeaORM` entity definitions.

pub mod document_sequences;
pub mod kardex_entries;
pub mod movement_lines;
pub mod movement_types;
pub mod movements;
pub mod sea_orm_active_enums;
pub mod stock_balances;
