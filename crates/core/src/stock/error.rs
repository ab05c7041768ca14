//! Stock error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur when applying balance operations.
#[derive(Debug, Error)]
pub enum StockError {
    /// Not enough stock on hand to satisfy a decrease.
    #[error("Insufficient stock: available {available}, requested {requested}")]
    InsufficientStock {
        /// Quantity currently on hand.
        available: Decimal,
        /// Quantity the operation tried to remove.
        requested: Decimal,
    },

    /// A reversal would drive a balance negative because stock moved on
    /// after the original movement was approved.
    #[error("Reversal conflict: available {available}, reversal requires {requested}")]
    ReversalConflict {
        /// Quantity currently available.
        available: Decimal,
        /// Quantity the reversal tried to remove.
        requested: Decimal,
    },

    /// Balance operations require a positive quantity.
    #[error("Balance operation quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),

    /// Another writer updated the balance row first.
    #[error("Balance row was modified concurrently, retry the operation")]
    ConcurrentModification,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl StockError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::ReversalConflict { .. } => "REVERSAL_CONFLICT",
            Self::NonPositiveQuantity(_) => "NON_POSITIVE_QUANTITY",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code hint for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InsufficientStock { .. } => 422,
            Self::ReversalConflict { .. } | Self::ConcurrentModification => 409,
            Self::NonPositiveQuantity(_) => 400,
            Self::Database(_) => 500,
        }
    }

    /// Returns true if the caller may retry the operation unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification)
    }
}
