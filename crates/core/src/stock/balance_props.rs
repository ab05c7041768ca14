//! Property-based tests for balance arithmetic and weighted-average costing.
//!
//! Feature: stock-balance
//! - Property: balances never go negative
//! - Property: the blended cost stays between the two input costs
//! - Property: decreases never change the unit cost

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::{StockBalance, weighted_average};
use super::error::StockError;

/// Strategy to generate positive quantities (0.001 to 100,000.000).
fn positive_quantity() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 3))
}

/// Strategy to generate non-negative unit costs (0.0000 to 10,000.0000).
fn unit_cost() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // =========================================================================
    // Property: an increase adds exactly the quantity and a decrease removes
    // exactly the quantity.
    // =========================================================================
    #[test]
    fn prop_quantity_arithmetic_is_exact(
        initial in positive_quantity(),
        cost in unit_cost(),
        delta in positive_quantity(),
    ) {
        let mut balance = StockBalance::empty();
        balance.apply_increase(initial, cost).unwrap();
        balance.apply_increase(delta, cost).unwrap();
        prop_assert_eq!(balance.quantity_on_hand, initial + delta);

        balance.apply_decrease(delta).unwrap();
        prop_assert_eq!(balance.quantity_on_hand, initial);
    }

    // =========================================================================
    // Property: a decrease larger than the quantity on hand always fails
    // and leaves the row untouched.
    // =========================================================================
    #[test]
    fn prop_balance_never_negative(
        initial in positive_quantity(),
        cost in unit_cost(),
        excess in positive_quantity(),
    ) {
        let mut balance = StockBalance::empty();
        balance.apply_increase(initial, cost).unwrap();
        let before = balance;

        let result = balance.apply_decrease(initial + excess);
        prop_assert!(
            matches!(result, Err(StockError::InsufficientStock { .. })),
            "expected InsufficientStock, got {:?}",
            result
        );
        prop_assert_eq!(balance, before);
        prop_assert!(balance.quantity_on_hand >= Decimal::ZERO);
    }

    // =========================================================================
    // Property: the blended cost is bounded by the two input costs.
    // =========================================================================
    #[test]
    fn prop_weighted_average_bounded(
        on_hand in positive_quantity(),
        current_cost in unit_cost(),
        incoming in positive_quantity(),
        incoming_cost in unit_cost(),
    ) {
        let blended = weighted_average(on_hand, current_cost, incoming, incoming_cost);
        let lo = current_cost.min(incoming_cost);
        let hi = current_cost.max(incoming_cost);
        prop_assert!(blended >= lo);
        prop_assert!(blended <= hi);
    }

    // =========================================================================
    // Property: blending with an equal-cost receipt never moves the cost.
    // =========================================================================
    #[test]
    fn prop_equal_cost_blend_is_identity(
        on_hand in positive_quantity(),
        cost in unit_cost(),
        incoming in positive_quantity(),
    ) {
        let blended = weighted_average(on_hand, cost, incoming, cost);
        prop_assert_eq!(blended, cost);
    }

    // =========================================================================
    // Property: decreases leave the weighted-average cost untouched.
    // =========================================================================
    #[test]
    fn prop_decrease_preserves_cost(
        initial in positive_quantity(),
        cost in unit_cost(),
        fraction in 1u32..100,
    ) {
        let mut balance = StockBalance::empty();
        balance.apply_increase(initial, cost).unwrap();
        let cost_before = balance.weighted_average_unit_cost;

        let portion = initial * Decimal::from(fraction) / Decimal::from(100u32);
        if portion > Decimal::ZERO {
            balance.apply_decrease(portion).unwrap();
            prop_assert_eq!(balance.weighted_average_unit_cost, cost_before);
        }
    }

    // =========================================================================
    // Property: total value tracks quantity times cost.
    // =========================================================================
    #[test]
    fn prop_total_value_consistent(
        initial in positive_quantity(),
        cost in unit_cost(),
    ) {
        let mut balance = StockBalance::empty();
        balance.apply_increase(initial, cost).unwrap();
        prop_assert_eq!(
            balance.total_value(),
            balance.quantity_on_hand * balance.weighted_average_unit_cost
        );
    }
}
