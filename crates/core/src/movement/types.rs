//! Movement domain types for document creation and lifecycle.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use kardex_shared::types::{MovementTypeId, ProductId, UserId};

/// Movement status in the approval workflow.
///
/// Movements progress from creation to a terminal state:
/// `Pending -> Approved` or `Pending/Approved -> Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementStatus {
    /// Movement is being drafted and can be modified.
    Pending,
    /// Movement has been approved and its stock effects applied.
    Approved,
    /// Movement has been cancelled; any applied effects were reversed.
    Cancelled,
}

impl MovementStatus {
    /// Parse a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if the movement header and lines can be modified.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if no further transitions are allowed.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl std::fmt::Display for MovementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kind of party or place a location reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    /// An internal warehouse.
    Warehouse,
    /// An internal retail store.
    Store,
    /// An external supplier (inbound counterparty).
    Supplier,
    /// An external customer (outbound counterparty).
    Customer,
}

impl LocationKind {
    /// Parse a location kind from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "warehouse" => Some(Self::Warehouse),
            "store" => Some(Self::Store),
            "supplier" => Some(Self::Supplier),
            "customer" => Some(Self::Customer),
            _ => None,
        }
    }

    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Warehouse => "warehouse",
            Self::Store => "store",
            Self::Supplier => "supplier",
            Self::Customer => "customer",
        }
    }

    /// Returns true for locations whose balances the engine tracks.
    ///
    /// Supplier and customer endpoints are counterparties; stock held by
    /// them is outside the organization and carries no balance rows.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Warehouse | Self::Store)
    }
}

impl std::fmt::Display for LocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reference to a movement endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationRef {
    /// The kind of location.
    pub kind: LocationKind,
    /// Identifier of the location within its kind.
    pub id: Uuid,
}

impl std::fmt::Display for LocationRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Input for a single line in a new movement.
#[derive(Debug, Clone)]
pub struct MovementLineInput {
    /// The product being moved.
    pub product_id: ProductId,
    /// Quantity in the unit given by `unit_code` (must be positive).
    pub quantity: Decimal,
    /// Unit of measure code the quantity is expressed in.
    pub unit_code: String,
    /// Cost per base unit (must be non-negative).
    pub unit_cost: Decimal,
    /// Optional lot/batch number.
    pub lot_number: Option<String>,
    /// Optional serial number.
    pub serial_number: Option<String>,
    /// Optional expiry date for the lot.
    pub expiry_date: Option<NaiveDate>,
}

/// Input for creating a new movement.
#[derive(Debug, Clone)]
pub struct CreateMovementInput {
    /// The movement type classifying this document.
    pub movement_type_id: MovementTypeId,
    /// Effective date of the movement.
    pub movement_date: NaiveDate,
    /// Source endpoint, when the type requires one.
    pub source: Option<LocationRef>,
    /// Destination endpoint, when the type requires one.
    pub destination: Option<LocationRef>,
    /// Optional external reference (PO number, delivery note).
    pub reference: Option<String>,
    /// Optional free-form notes.
    pub notes: Option<String>,
    /// The movement lines.
    pub lines: Vec<MovementLineInput>,
    /// The user creating the movement.
    pub created_by: UserId,
}

/// Header totals derived from a movement's lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementTotals {
    /// Sum of base quantities across lines.
    pub total_quantity: Decimal,
    /// Sum of line totals (base quantity times unit cost).
    pub total_amount: Decimal,
}

/// A validated workflow action ready to be persisted.
///
/// Produced by `WorkflowService` after transition checks pass; carries the
/// audit fields the caller must write alongside the status change.
#[derive(Debug, Clone)]
pub enum WorkflowAction {
    /// Approve the movement and apply its stock effects.
    Approve {
        /// The status to persist.
        new_status: MovementStatus,
        /// The approving user.
        approved_by: UserId,
        /// When the approval happened.
        approved_at: DateTime<Utc>,
    },
    /// Cancel the movement, reversing applied effects if it was approved.
    Cancel {
        /// The status to persist.
        new_status: MovementStatus,
        /// Whether stock effects must be reversed (the movement was approved).
        requires_reversal: bool,
        /// The cancelling user.
        cancelled_by: UserId,
        /// When the cancellation happened.
        cancelled_at: DateTime<Utc>,
        /// Why the movement was cancelled.
        reason: String,
    },
}
