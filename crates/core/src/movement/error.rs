//! Movement error types for document validation and lifecycle management.

use rust_decimal::Decimal;
use thiserror::Error;
use kardex_shared::types::{MovementId, MovementLineId, ProductId};

use crate::movement::types::{LocationRef, MovementStatus};

/// Errors that can occur during movement operations.
#[derive(Debug, Error)]
pub enum MovementError {
    /// Movement not found.
    #[error("Movement {0} not found")]
    MovementNotFound(MovementId),

    /// Movement line not found.
    #[error("Movement line {0} not found")]
    LineNotFound(MovementLineId),

    /// The movement type has been deactivated.
    #[error("Movement type {0} is inactive and cannot be used")]
    InactiveMovementType(String),

    /// The movement type requires a source location.
    #[error("A source location is required for this movement type")]
    MissingSourceLocation,

    /// The movement type requires a destination location.
    #[error("A destination location is required for this movement type")]
    MissingDestinationLocation,

    /// Balance-affecting endpoints must be internal locations.
    #[error("Endpoint {0} is not an internal stock location")]
    EndpointNotInternal(LocationRef),

    /// A movement must carry at least one line.
    #[error("Movement must have at least one line")]
    NoLines,

    /// Line quantity must be positive.
    #[error("Quantity for product {product_id} must be positive, got {quantity}")]
    NonPositiveQuantity {
        /// The product on the offending line.
        product_id: ProductId,
        /// The rejected quantity.
        quantity: Decimal,
    },

    /// Line unit cost must be non-negative.
    #[error("Unit cost for product {product_id} cannot be negative, got {unit_cost}")]
    NegativeUnitCost {
        /// The product on the offending line.
        product_id: ProductId,
        /// The rejected unit cost.
        unit_cost: Decimal,
    },

    /// The line references a product that does not exist.
    #[error("Product {0} not found")]
    UnknownProduct(ProductId),

    /// No conversion to the product's base unit exists for the unit code.
    #[error("Unknown unit {unit_code} for product {product_id}")]
    UnknownUnit {
        /// The unit code that could not be resolved.
        unit_code: String,
        /// The product on the offending line.
        product_id: ProductId,
    },

    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: MovementStatus,
        /// The attempted target status.
        to: MovementStatus,
    },

    /// Attempted to modify a movement that is no longer editable.
    #[error("Movement in status {0} cannot be modified")]
    NotEditable(MovementStatus),

    /// Cancellation reason is required but not provided.
    #[error("Cancellation reason is required")]
    CancellationReasonRequired,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl MovementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MovementNotFound(_) => "MOVEMENT_NOT_FOUND",
            Self::LineNotFound(_) => "MOVEMENT_LINE_NOT_FOUND",
            Self::InactiveMovementType(_) => "INACTIVE_TYPE",
            Self::MissingSourceLocation => "MISSING_SOURCE_LOCATION",
            Self::MissingDestinationLocation => "MISSING_DESTINATION_LOCATION",
            Self::EndpointNotInternal(_) => "ENDPOINT_NOT_INTERNAL",
            Self::NoLines => "NO_LINES",
            Self::NonPositiveQuantity { .. } => "NON_POSITIVE_QUANTITY",
            Self::NegativeUnitCost { .. } => "NEGATIVE_UNIT_COST",
            Self::UnknownProduct(_) => "UNKNOWN_PRODUCT",
            Self::UnknownUnit { .. } => "UNKNOWN_UNIT",
            Self::InvalidTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::NotEditable(_) => "MOVEMENT_NOT_EDITABLE",
            Self::CancellationReasonRequired => "CANCELLATION_REASON_REQUIRED",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code hint for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::MovementNotFound(_) | Self::LineNotFound(_) => 404,
            Self::MissingSourceLocation
            | Self::MissingDestinationLocation
            | Self::EndpointNotInternal(_)
            | Self::NoLines
            | Self::NonPositiveQuantity { .. }
            | Self::NegativeUnitCost { .. }
            | Self::UnknownProduct(_)
            | Self::UnknownUnit { .. }
            | Self::CancellationReasonRequired => 400,
            Self::InactiveMovementType(_)
            | Self::InvalidTransition { .. }
            | Self::NotEditable(_) => 422,
            Self::Database(_) => 500,
        }
    }
}
