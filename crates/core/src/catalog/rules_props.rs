//! Property-based tests for the direction/effect rules table.
//!
//! Feature: movement-type-catalog
//! - Property: every valid configuration resolves to at least one operation
//! - Property: operation inversion is an involution
//! - Property: transfers are the only rules touching both endpoints

use proptest::prelude::*;

use super::rules::{BalanceEndpoint, OpKind, ledger_ops};
use super::types::{MovementDirection, StockEffect};

fn direction_strategy() -> impl Strategy<Value = MovementDirection> {
    prop_oneof![
        Just(MovementDirection::Inbound),
        Just(MovementDirection::Outbound),
        Just(MovementDirection::Transfer),
        Just(MovementDirection::Adjustment),
    ]
}

fn effect_strategy() -> impl Strategy<Value = StockEffect> {
    prop_oneof![
        Just(StockEffect::Increase),
        Just(StockEffect::Decrease),
        Just(StockEffect::Neutral),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Property: the table is total over supported combinations and never
    // returns an empty operation list.
    // =========================================================================
    #[test]
    fn prop_resolved_rules_are_nonempty(
        direction in direction_strategy(),
        effect in effect_strategy(),
    ) {
        if let Ok(ops) = ledger_ops(direction, effect) {
            prop_assert!(!ops.is_empty());
            prop_assert!(ops.len() <= 2);
        }
    }

    // =========================================================================
    // Property: inverting twice returns the original operation.
    // =========================================================================
    #[test]
    fn prop_inversion_is_involution(
        direction in direction_strategy(),
        effect in effect_strategy(),
    ) {
        if let Ok(ops) = ledger_ops(direction, effect) {
            for op in ops {
                prop_assert_eq!(op.inverse().inverse(), op);
                prop_assert_eq!(op.inverse().endpoint, op.endpoint);
                prop_assert_ne!(op.inverse().kind, op.kind);
            }
        }
    }

    // =========================================================================
    // Property: increases always land on the destination endpoint and
    // decreases always come from the source endpoint.
    // =========================================================================
    #[test]
    fn prop_increase_at_destination_decrease_at_source(
        direction in direction_strategy(),
        effect in effect_strategy(),
    ) {
        if let Ok(ops) = ledger_ops(direction, effect) {
            for op in ops {
                match op.kind {
                    OpKind::Increase => prop_assert_eq!(op.endpoint, BalanceEndpoint::Destination),
                    OpKind::Decrease => prop_assert_eq!(op.endpoint, BalanceEndpoint::Source),
                }
            }
        }
    }

    // =========================================================================
    // Property: only transfers produce two operations, and their net effect
    // on total stock is zero (one increase, one decrease).
    // =========================================================================
    #[test]
    fn prop_only_transfers_touch_both_endpoints(
        direction in direction_strategy(),
        effect in effect_strategy(),
    ) {
        if let Ok(ops) = ledger_ops(direction, effect) {
            if ops.len() == 2 {
                prop_assert_eq!(direction, MovementDirection::Transfer);
                let increases = ops.iter().filter(|o| o.kind == OpKind::Increase).count();
                let decreases = ops.iter().filter(|o| o.kind == OpKind::Decrease).count();
                prop_assert_eq!(increases, 1);
                prop_assert_eq!(decreases, 1);
            }
        }
    }
}
