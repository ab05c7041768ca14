//! Catalog error types.

use thiserror::Error;
use kardex_shared::types::MovementTypeId;

use crate::catalog::types::{MovementDirection, StockEffect};

/// Errors that can occur when managing or resolving movement types.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Movement type not found.
    #[error("Movement type {0} not found")]
    TypeNotFound(MovementTypeId),

    /// Movement type code not found.
    #[error("Movement type with code {0} not found")]
    CodeNotFound(String),

    /// A movement type with the same code already exists.
    #[error("Movement type code {0} already exists")]
    DuplicateCode(String),

    /// The direction, effect, and endpoint flags contradict each other.
    #[error("Invalid configuration for movement type {code}: {reason}")]
    InvalidConfiguration {
        /// The movement type code.
        code: String,
        /// What is wrong with the flag combination.
        reason: String,
    },

    /// No rules-table entry exists for the combination.
    #[error("No ledger rule for direction {direction} with effect {effect}")]
    UnsupportedRule {
        /// The movement direction.
        direction: MovementDirection,
        /// The stock effect.
        effect: StockEffect,
    },

    /// Attempted to modify or delete a system-defined type.
    #[error("Movement type {0} is system-defined and cannot be modified")]
    ImmutableType(String),

    /// Attempted to delete a type that movements still reference.
    #[error("Movement type {code} is referenced by {movement_count} movement(s)")]
    TypeInUse {
        /// The movement type code.
        code: String,
        /// Number of movements referencing the type.
        movement_count: u64,
    },

    /// Attempted to use a deactivated type for a new movement.
    #[error("Movement type {code} is inactive")]
    InactiveType {
        /// The movement type code.
        code: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl CatalogError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::TypeNotFound(_) | Self::CodeNotFound(_) => "MOVEMENT_TYPE_NOT_FOUND",
            Self::DuplicateCode(_) => "DUPLICATE_TYPE_CODE",
            Self::InvalidConfiguration { .. } => "INVALID_TYPE_CONFIGURATION",
            Self::UnsupportedRule { .. } => "UNSUPPORTED_LEDGER_RULE",
            Self::ImmutableType(_) => "IMMUTABLE_TYPE",
            Self::TypeInUse { .. } => "TYPE_IN_USE",
            Self::InactiveType { .. } => "INACTIVE_TYPE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code hint for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::TypeNotFound(_) | Self::CodeNotFound(_) => 404,
            Self::DuplicateCode(_) => 409,
            Self::InvalidConfiguration { .. } | Self::UnsupportedRule { .. } => 400,
            Self::ImmutableType(_) | Self::TypeInUse { .. } | Self::InactiveType { .. } => 422,
            Self::Database(_) => 500,
        }
    }
}
