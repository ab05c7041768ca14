//! Kardex entries: the append-only movement history per product/location.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use kardex_shared::types::{MovementId, MovementLineId, ProductId};

use crate::movement::LocationRef;

/// Whether a kardex entry added or removed stock.
///
/// Quantities on entries are always positive; the kind carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Stock was added at the location.
    Increase,
    /// Stock was removed from the location.
    Decrease,
}

impl TransactionKind {
    /// Parse a kind from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "increase" => Some(Self::Increase),
            "decrease" => Some(Self::Decrease),
            _ => None,
        }
    }

    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
        }
    }

    /// Returns the opposite kind.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Increase => Self::Decrease,
            Self::Decrease => Self::Increase,
        }
    }

    /// Applies the kind's sign to a positive quantity.
    #[must_use]
    pub fn signed(self, quantity: Decimal) -> Decimal {
        match self {
            Self::Increase => quantity,
            Self::Decrease => -quantity,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the kardex.
///
/// Entries are written in the same transaction as the balance update they
/// describe, so `balance_quantity_after` always matches the balance row at
/// that point in history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KardexEntry {
    /// Unique identifier.
    pub id: Uuid,
    /// The product moved.
    pub product_id: ProductId,
    /// The location whose balance changed.
    pub location: LocationRef,
    /// Optional lot/batch number.
    pub lot_number: Option<String>,
    /// The movement that caused the change.
    pub movement_id: MovementId,
    /// The movement line that caused the change.
    pub movement_line_id: MovementLineId,
    /// Whether stock was added or removed.
    pub kind: TransactionKind,
    /// Quantity moved, always positive, in the product's base unit.
    pub quantity: Decimal,
    /// Cost per base unit applied to this entry.
    pub unit_cost: Decimal,
    /// Value of the entry (quantity times unit cost).
    pub total_cost: Decimal,
    /// Optional serial number.
    pub serial_number: Option<String>,
    /// Quantity on hand at the location after this entry.
    pub balance_quantity_after: Decimal,
    /// Balance value at the location after this entry.
    pub balance_value_after: Decimal,
    /// When the entry was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl KardexEntry {
    /// Quantity with the entry's sign applied.
    #[must_use]
    pub fn signed_quantity(&self) -> Decimal {
        self.kind.signed(self.quantity)
    }
}
