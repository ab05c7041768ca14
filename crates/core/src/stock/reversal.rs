//! Reversal of approved movements.
//!
//! Cancelling an approved movement does not rewrite history: the original
//! kardex entries stay in place and compensating entries are appended. Each
//! original operation is inverted at the same endpoint (an increase becomes
//! a decrease and vice versa) and the inverted operations are applied in the
//! original order.

use super::error::StockError;
use super::ledger::TransactionKind;
use crate::catalog::BalanceOp;

/// Stateless engine computing the compensating operations for a reversal.
pub struct ReversalEngine;

impl ReversalEngine {
    /// Inverts each original operation, preserving order.
    #[must_use]
    pub fn reversing_ops(original: &[BalanceOp]) -> Vec<BalanceOp> {
        original.iter().map(|op| op.inverse()).collect()
    }

    /// The kardex entry kind for the reversal of an entry of `kind`.
    #[must_use]
    pub const fn reversing_kind(kind: TransactionKind) -> TransactionKind {
        kind.inverse()
    }

    /// Reclassifies a failure during reversal.
    ///
    /// A decrease that fails for lack of stock means later movements consumed
    /// the goods the reversal needs to take back; the caller reports that as
    /// a reversal conflict rather than a plain shortage.
    #[must_use]
    pub fn classify_failure(err: StockError) -> StockError {
        match err {
            StockError::InsufficientStock {
                available,
                requested,
            } => StockError::ReversalConflict {
                available,
                requested,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::catalog::{BalanceEndpoint, MovementDirection, OpKind, StockEffect, ledger_ops};

    #[test]
    fn test_transfer_reversal_preserves_order() {
        let original = ledger_ops(MovementDirection::Transfer, StockEffect::Neutral).unwrap();
        let reversed = ReversalEngine::reversing_ops(&original);
        assert_eq!(reversed.len(), 2);
        // The source, decreased originally, is increased first.
        assert_eq!(reversed[0].endpoint, BalanceEndpoint::Source);
        assert_eq!(reversed[0].kind, OpKind::Increase);
        assert_eq!(reversed[1].endpoint, BalanceEndpoint::Destination);
        assert_eq!(reversed[1].kind, OpKind::Decrease);
    }

    #[test]
    fn test_insufficient_stock_becomes_conflict() {
        let err = StockError::InsufficientStock {
            available: dec!(10),
            requested: dec!(25),
        };
        assert!(matches!(
            ReversalEngine::classify_failure(err),
            StockError::ReversalConflict {
                available,
                requested,
            } if available == dec!(10) && requested == dec!(25)
        ));
    }

    #[test]
    fn test_other_failures_pass_through() {
        assert!(matches!(
            ReversalEngine::classify_failure(StockError::ConcurrentModification),
            StockError::ConcurrentModification
        ));
    }
}
