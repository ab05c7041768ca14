//! The direction/effect rules table.
//!
//! Every approved movement line turns into one or two balance operations.
//! The mapping from (direction, effect) to operations is a fixed table; it
//! is the single place that decides which endpoint of a movement gains or
//! loses stock.

use serde::{Deserialize, Serialize};

use crate::catalog::error::CatalogError;
use crate::catalog::types::{MovementDirection, StockEffect};

/// Which endpoint of a movement a balance operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceEndpoint {
    /// The movement's source location.
    Source,
    /// The movement's destination location.
    Destination,
}

/// Whether a balance operation adds or removes stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    /// Add the line quantity at the endpoint.
    Increase,
    /// Remove the line quantity from the endpoint.
    Decrease,
}

impl OpKind {
    /// Returns the opposite operation kind.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Increase => Self::Decrease,
            Self::Decrease => Self::Increase,
        }
    }
}

/// A single balance operation derived from a movement line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BalanceOp {
    /// Which movement endpoint the operation applies to.
    pub endpoint: BalanceEndpoint,
    /// Whether stock is added or removed at that endpoint.
    pub kind: OpKind,
}

impl BalanceOp {
    /// Returns the operation that undoes this one at the same endpoint.
    #[must_use]
    pub const fn inverse(self) -> Self {
        Self {
            endpoint: self.endpoint,
            kind: self.kind.inverse(),
        }
    }
}

/// Resolves the ordered balance operations for a (direction, effect) pair.
///
/// Transfers decrease the source before increasing the destination so that
/// availability is checked before any stock lands at the destination.
///
/// # Errors
///
/// Returns `CatalogError::UnsupportedRule` for combinations no movement type
/// is allowed to carry (these are also rejected by `MovementType::validate`).
pub fn ledger_ops(
    direction: MovementDirection,
    effect: StockEffect,
) -> Result<Vec<BalanceOp>, CatalogError> {
    use BalanceEndpoint::{Destination, Source};
    use OpKind::{Decrease, Increase};

    match (direction, effect) {
        (MovementDirection::Inbound | MovementDirection::Adjustment, StockEffect::Increase) => {
            Ok(vec![BalanceOp {
                endpoint: Destination,
                kind: Increase,
            }])
        }
        (MovementDirection::Outbound | MovementDirection::Adjustment, StockEffect::Decrease) => {
            Ok(vec![BalanceOp {
                endpoint: Source,
                kind: Decrease,
            }])
        }
        (MovementDirection::Transfer, StockEffect::Neutral) => Ok(vec![
            BalanceOp {
                endpoint: Source,
                kind: Decrease,
            },
            BalanceOp {
                endpoint: Destination,
                kind: Increase,
            },
        ]),
        (direction, effect) => Err(CatalogError::UnsupportedRule { direction, effect }),
    }
}
