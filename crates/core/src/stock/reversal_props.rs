//! Property-based tests for movement reversal.
//!
//! Feature: stock-reversal
//! - Property: reversing an applied movement restores the prior quantities
//! - Property: transfers conserve total stock in both directions

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::StockBalance;
use super::error::StockError;
use super::reversal::ReversalEngine;
use crate::catalog::{BalanceEndpoint, BalanceOp, MovementDirection, OpKind, StockEffect, ledger_ops};

/// Strategy to generate positive quantities (0.001 to 100,000.000).
fn positive_quantity() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 3))
}

/// Strategy to generate non-negative unit costs (0.0000 to 10,000.0000).
fn unit_cost() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Two-endpoint world the operations run against.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Endpoints {
    source: StockBalance,
    destination: StockBalance,
}

impl Endpoints {
    fn balance_mut(&mut self, endpoint: BalanceEndpoint) -> &mut StockBalance {
        match endpoint {
            BalanceEndpoint::Source => &mut self.source,
            BalanceEndpoint::Destination => &mut self.destination,
        }
    }

    fn apply(
        &mut self,
        ops: &[BalanceOp],
        quantity: Decimal,
        cost: Decimal,
    ) -> Result<(), StockError> {
        for op in ops {
            let balance = self.balance_mut(op.endpoint);
            match op.kind {
                OpKind::Increase => balance.apply_increase(quantity, cost)?,
                OpKind::Decrease => balance.apply_decrease(quantity)?,
            }
        }
        Ok(())
    }

    /// Applies reversing operations the way the repositories do: an increase
    /// that restores a prior decrease is valued at the balance's current
    /// weighted-average cost, not the line cost.
    fn reverse(&mut self, ops: &[BalanceOp], quantity: Decimal) -> Result<(), StockError> {
        for op in ops {
            let balance = self.balance_mut(op.endpoint);
            match op.kind {
                OpKind::Increase => {
                    let cost = balance.weighted_average_unit_cost;
                    balance.apply_increase(quantity, cost)?;
                }
                OpKind::Decrease => balance.apply_decrease(quantity)?,
            }
        }
        Ok(())
    }

    fn total_on_hand(&self) -> Decimal {
        self.source.quantity_on_hand + self.destination.quantity_on_hand
    }
}

fn seeded(source_qty: Decimal, destination_qty: Decimal, cost: Decimal) -> Endpoints {
    let mut endpoints = Endpoints {
        source: StockBalance::empty(),
        destination: StockBalance::empty(),
    };
    if source_qty > Decimal::ZERO {
        endpoints.source.apply_increase(source_qty, cost).unwrap();
    }
    if destination_qty > Decimal::ZERO {
        endpoints
            .destination
            .apply_increase(destination_qty, cost)
            .unwrap();
    }
    endpoints
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // =========================================================================
    // Property: apply-then-reverse restores the original quantities for every
    // supported (direction, effect) rule.
    // =========================================================================
    #[test]
    fn prop_reversal_restores_quantities(
        seed_qty in positive_quantity(),
        move_qty in positive_quantity(),
        cost in unit_cost(),
    ) {
        let rules = [
            (MovementDirection::Inbound, StockEffect::Increase),
            (MovementDirection::Outbound, StockEffect::Decrease),
            (MovementDirection::Transfer, StockEffect::Neutral),
            (MovementDirection::Adjustment, StockEffect::Increase),
            (MovementDirection::Adjustment, StockEffect::Decrease),
        ];
        // Seed both endpoints with enough stock for any decrease.
        let stocked = seed_qty + move_qty;

        for (direction, effect) in rules {
            let ops = ledger_ops(direction, effect).unwrap();
            let mut endpoints = seeded(stocked, stocked, cost);
            let before = endpoints;

            endpoints.apply(&ops, move_qty, cost).unwrap();
            endpoints
                .reverse(&ReversalEngine::reversing_ops(&ops), move_qty)
                .unwrap();

            prop_assert_eq!(
                endpoints.source.quantity_on_hand,
                before.source.quantity_on_hand
            );
            prop_assert_eq!(
                endpoints.destination.quantity_on_hand,
                before.destination.quantity_on_hand
            );
        }
    }

    // =========================================================================
    // Property: reversing a decrease restores the weighted-average cost even
    // when the row blends receipts at different prices and the line cost
    // differs from the blend.
    // =========================================================================
    #[test]
    fn prop_reversal_restores_blended_cost(
        first_qty in positive_quantity(),
        second_qty in positive_quantity(),
        first_cost in unit_cost(),
        second_cost in unit_cost(),
        move_qty in positive_quantity(),
    ) {
        let rules = [
            (MovementDirection::Outbound, StockEffect::Decrease),
            (MovementDirection::Adjustment, StockEffect::Decrease),
            (MovementDirection::Transfer, StockEffect::Neutral),
        ];

        for (direction, effect) in rules {
            let ops = ledger_ops(direction, effect).unwrap();
            let mut endpoints = Endpoints {
                source: StockBalance::empty(),
                destination: StockBalance::empty(),
            };
            endpoints
                .source
                .apply_increase(first_qty + move_qty, first_cost)
                .unwrap();
            endpoints.source.apply_increase(second_qty, second_cost).unwrap();
            let before = endpoints.source;

            endpoints.apply(&ops, move_qty, second_cost).unwrap();
            endpoints
                .reverse(&ReversalEngine::reversing_ops(&ops), move_qty)
                .unwrap();

            prop_assert_eq!(
                endpoints.source.quantity_on_hand,
                before.quantity_on_hand
            );
            prop_assert_eq!(
                endpoints.source.weighted_average_unit_cost,
                before.weighted_average_unit_cost
            );
        }
    }

    // =========================================================================
    // Property: transfers conserve total stock, applied and reversed.
    // =========================================================================
    #[test]
    fn prop_transfer_conserves_total(
        seed_qty in positive_quantity(),
        move_qty in positive_quantity(),
        cost in unit_cost(),
    ) {
        let ops = ledger_ops(MovementDirection::Transfer, StockEffect::Neutral).unwrap();
        let mut endpoints = seeded(seed_qty + move_qty, Decimal::ZERO, cost);
        let total = endpoints.total_on_hand();

        endpoints.apply(&ops, move_qty, cost).unwrap();
        prop_assert_eq!(endpoints.total_on_hand(), total);

        endpoints
            .reverse(&ReversalEngine::reversing_ops(&ops), move_qty)
            .unwrap();
        prop_assert_eq!(endpoints.total_on_hand(), total);
    }

    // =========================================================================
    // Property: a reversal that cannot take back consumed stock fails as a
    // conflict, not a plain shortage.
    // =========================================================================
    #[test]
    fn prop_consumed_stock_blocks_reversal(
        move_qty in positive_quantity(),
        cost in unit_cost(),
    ) {
        // Receive move_qty at the destination, consume it all, then try to
        // reverse the receipt.
        let ops = ledger_ops(MovementDirection::Inbound, StockEffect::Increase).unwrap();
        let mut endpoints = seeded(Decimal::ZERO, Decimal::ZERO, cost);
        endpoints.apply(&ops, move_qty, cost).unwrap();
        endpoints.destination.apply_decrease(move_qty).unwrap();

        let err = endpoints
            .reverse(&ReversalEngine::reversing_ops(&ops), move_qty)
            .map_err(ReversalEngine::classify_failure)
            .unwrap_err();
        prop_assert!(
            matches!(err, StockError::ReversalConflict { .. }),
            "expected ReversalConflict, got {:?}",
            err
        );
    }
}
