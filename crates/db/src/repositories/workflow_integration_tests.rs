//! Integration tests for the movement workflow.
//!
//! Exercises the full path create -> approve -> consume -> cancel against an
//! in-memory balance map, using the same core services the repositories run.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use kardex_core::catalog::{
        BalanceEndpoint, BalanceOp, MovementDirection, MovementType, OpKind, StockEffect,
        ledger_ops,
    };
    use kardex_core::movement::{
        CreateMovementInput, LocationKind, LocationRef, MovementError, MovementLineInput,
        MovementService, MovementStatus, WorkflowAction, WorkflowService,
    };
    use kardex_core::stock::{BalanceKey, ReversalEngine, StockBalance, StockError};
    use kardex_shared::types::{MovementTypeId, ProductId, UserId};

    // ========================================================================
    // Helper Functions
    // ========================================================================

    /// In-memory stand-in for the stock_balances table.
    #[derive(Debug, Default, Clone)]
    struct Stock {
        rows: HashMap<BalanceKey, StockBalance>,
    }

    impl Stock {
        fn quantity(&self, key: &BalanceKey) -> Decimal {
            self.rows
                .get(key)
                .map_or(Decimal::ZERO, |b| b.quantity_on_hand)
        }

        fn cost(&self, key: &BalanceKey) -> Decimal {
            self.rows
                .get(key)
                .map_or(Decimal::ZERO, |b| b.weighted_average_unit_cost)
        }

        /// Applies one operation; on failure the map is left unchanged, the
        /// same guarantee the repository gets from its transaction rollback.
        fn apply_op(
            &mut self,
            op: BalanceOp,
            key: &BalanceKey,
            quantity: Decimal,
            unit_cost: Decimal,
        ) -> Result<(), StockError> {
            let mut balance = self.rows.get(key).copied().unwrap_or_default();
            match op.kind {
                OpKind::Increase => balance.apply_increase(quantity, unit_cost)?,
                OpKind::Decrease => balance.apply_decrease(quantity)?,
            }
            self.rows.insert(key.clone(), balance);
            Ok(())
        }

        /// Applies a movement's operations for one line, rolling back on any
        /// failure.
        fn apply_movement(
            &mut self,
            ops: &[BalanceOp],
            source: Option<&BalanceKey>,
            destination: Option<&BalanceKey>,
            quantity: Decimal,
            unit_cost: Decimal,
        ) -> Result<(), StockError> {
            let snapshot = self.clone();
            for op in ops {
                let key = match op.endpoint {
                    BalanceEndpoint::Source => source,
                    BalanceEndpoint::Destination => destination,
                }
                .expect("endpoint required by the rules table");
                if let Err(err) = self.apply_op(*op, key, quantity, unit_cost) {
                    *self = snapshot;
                    return Err(err);
                }
            }
            Ok(())
        }
    }

    fn movement_type(direction: MovementDirection, effect: StockEffect) -> MovementType {
        let (requires_source, requires_destination) = match (direction, effect) {
            (MovementDirection::Transfer, _) => (true, true),
            (_, StockEffect::Increase) => (false, true),
            _ => (true, false),
        };
        MovementType {
            id: MovementTypeId::new(),
            code: direction.as_str().to_uppercase(),
            name: direction.as_str().to_string(),
            direction,
            effect,
            requires_source,
            requires_destination,
            is_system: true,
            is_active: true,
        }
    }

    fn warehouse() -> LocationRef {
        LocationRef {
            kind: LocationKind::Warehouse,
            id: Uuid::new_v4(),
        }
    }

    fn key(product: ProductId, location: LocationRef) -> BalanceKey {
        BalanceKey {
            product_id: product,
            location,
            lot_number: None,
        }
    }

    fn line(product: ProductId, quantity: Decimal, unit_cost: Decimal) -> MovementLineInput {
        MovementLineInput {
            product_id: product,
            quantity,
            unit_code: "EA".to_string(),
            unit_cost,
            lot_number: None,
            serial_number: None,
            expiry_date: None,
        }
    }

    fn input(
        movement_type: &MovementType,
        source: Option<LocationRef>,
        destination: Option<LocationRef>,
        lines: Vec<MovementLineInput>,
    ) -> CreateMovementInput {
        CreateMovementInput {
            movement_type_id: movement_type.id,
            movement_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            source,
            destination,
            reference: None,
            notes: None,
            lines,
            created_by: UserId::new(),
        }
    }

    fn identity_units(_p: ProductId, unit: &str, qty: Decimal) -> Option<Decimal> {
        (unit == "EA").then_some(qty)
    }

    // ========================================================================
    // Scenario Tests
    // ========================================================================

    /// Receiving purchased goods into an empty warehouse sets both the
    /// quantity and the weighted-average cost from the receipt.
    #[test]
    fn test_purchase_receipt_into_empty_warehouse() {
        let mt = movement_type(MovementDirection::Inbound, StockEffect::Increase);
        let product = ProductId::new();
        let wh = warehouse();
        let input = input(&mt, None, Some(wh), vec![line(product, dec!(100), dec!(10.00))]);

        let (resolved, totals) =
            MovementService::validate_and_resolve(&input, &mt, identity_units, |_| true).unwrap();
        assert_eq!(totals.total_amount, dec!(1000.00));

        WorkflowService::approve(MovementStatus::Pending, resolved.len(), UserId::new()).unwrap();
        let ops = ledger_ops(mt.direction, mt.effect).unwrap();

        let mut stock = Stock::default();
        let dest_key = key(product, wh);
        stock
            .apply_movement(&ops, None, Some(&dest_key), dec!(100), dec!(10.00))
            .unwrap();

        assert_eq!(stock.quantity(&dest_key), dec!(100));
        assert_eq!(stock.cost(&dest_key), dec!(10.00));
    }

    /// A second receipt at a different price re-blends the average cost.
    #[test]
    fn test_second_receipt_blends_average_cost() {
        let mt = movement_type(MovementDirection::Inbound, StockEffect::Increase);
        let product = ProductId::new();
        let wh = warehouse();
        let dest_key = key(product, wh);
        let ops = ledger_ops(mt.direction, mt.effect).unwrap();

        let mut stock = Stock::default();
        stock
            .apply_movement(&ops, None, Some(&dest_key), dec!(100), dec!(10.00))
            .unwrap();
        stock
            .apply_movement(&ops, None, Some(&dest_key), dec!(50), dec!(13.00))
            .unwrap();

        assert_eq!(stock.quantity(&dest_key), dec!(150));
        assert_eq!(stock.cost(&dest_key), dec!(11.00));
    }

    /// A transfer larger than the source balance fails and leaves both
    /// endpoints untouched.
    #[test]
    fn test_transfer_with_insufficient_stock_changes_nothing() {
        let mt = movement_type(MovementDirection::Transfer, StockEffect::Neutral);
        let product = ProductId::new();
        let (wh_a, wh_b) = (warehouse(), warehouse());
        let src_key = key(product, wh_a);
        let dst_key = key(product, wh_b);

        let mut stock = Stock::default();
        let receive = ledger_ops(MovementDirection::Inbound, StockEffect::Increase).unwrap();
        stock
            .apply_movement(&receive, None, Some(&src_key), dec!(60), dec!(5.00))
            .unwrap();

        let ops = ledger_ops(mt.direction, mt.effect).unwrap();
        let err = stock
            .apply_movement(&ops, Some(&src_key), Some(&dst_key), dec!(80), dec!(5.00))
            .unwrap_err();

        assert!(matches!(
            err,
            StockError::InsufficientStock { available, requested }
                if available == dec!(60) && requested == dec!(80)
        ));
        assert_eq!(stock.quantity(&src_key), dec!(60));
        assert_eq!(stock.quantity(&dst_key), dec!(0));
    }

    /// Cancelling an approved receipt whose goods were partly consumed is a
    /// reversal conflict; nothing changes.
    #[test]
    fn test_cancel_after_consumption_conflicts() {
        let mt = movement_type(MovementDirection::Inbound, StockEffect::Increase);
        let product = ProductId::new();
        let wh = warehouse();
        let dest_key = key(product, wh);
        let ops = ledger_ops(mt.direction, mt.effect).unwrap();

        let mut stock = Stock::default();
        stock
            .apply_movement(&ops, None, Some(&dest_key), dec!(50), dec!(8.00))
            .unwrap();

        // An outbound shipment consumes part of the receipt.
        let ship = ledger_ops(MovementDirection::Outbound, StockEffect::Decrease).unwrap();
        stock
            .apply_movement(&ship, Some(&dest_key), None, dec!(20), dec!(8.00))
            .unwrap();

        // Reversing the 50-unit receipt now needs more than the 30 on hand.
        let action = WorkflowService::cancel(MovementStatus::Approved, UserId::new(), "bad PO")
            .unwrap();
        match action {
            WorkflowAction::Cancel {
                requires_reversal, ..
            } => assert!(requires_reversal),
            WorkflowAction::Approve { .. } => {
                panic!("expected cancel action");
            }
        }

        let reversing = ReversalEngine::reversing_ops(&ops);
        let err = stock
            .apply_movement(&reversing, None, Some(&dest_key), dec!(50), dec!(8.00))
            .map_err(ReversalEngine::classify_failure)
            .unwrap_err();

        assert!(matches!(err, StockError::ReversalConflict { .. }));
        assert_eq!(stock.quantity(&dest_key), dec!(30));
    }

    /// Cancelling an approved shipment puts the goods back at the cost they
    /// left at, so a blended average survives the round trip.
    #[test]
    fn test_cancel_of_shipment_restores_blended_cost() {
        let product = ProductId::new();
        let wh = warehouse();
        let k = key(product, wh);
        let receive = ledger_ops(MovementDirection::Inbound, StockEffect::Increase).unwrap();
        let ship = ledger_ops(MovementDirection::Outbound, StockEffect::Decrease).unwrap();

        let mut stock = Stock::default();
        stock
            .apply_movement(&receive, None, Some(&k), dec!(50), dec!(4.00))
            .unwrap();
        stock
            .apply_movement(&receive, None, Some(&k), dec!(50), dec!(6.00))
            .unwrap();
        assert_eq!(stock.cost(&k), dec!(5.00));

        stock
            .apply_movement(&ship, Some(&k), None, dec!(40), dec!(6.00))
            .unwrap();

        // The restoring increase is valued at the row's current cost, not
        // the shipment line's cost.
        let restored_cost = stock.cost(&k);
        stock
            .apply_movement(
                &ReversalEngine::reversing_ops(&ship),
                Some(&k),
                None,
                dec!(40),
                restored_cost,
            )
            .unwrap();

        assert_eq!(stock.quantity(&k), dec!(100));
        assert_eq!(stock.cost(&k), dec!(5.00));
    }

    /// With header transitions serialized on the movement row, the loser of
    /// an approve/cancel race sees the winner's committed status: a cancel
    /// that lands after an approval must reverse, and an approval that lands
    /// after a cancellation is rejected outright.
    #[test]
    fn test_serialized_transitions_resolve_races() {
        let user = UserId::new();

        // Approval committed first: the late cancel runs as
        // cancel-of-approved and carries the reversal flag.
        let action = WorkflowService::cancel(MovementStatus::Approved, user, "raced").unwrap();
        assert!(matches!(
            action,
            WorkflowAction::Cancel {
                requires_reversal: true,
                ..
            }
        ));

        // Cancellation committed first: the late approve fails instead of
        // applying stock effects to a cancelled document.
        let err = WorkflowService::approve(MovementStatus::Cancelled, 1, user).unwrap_err();
        assert!(matches!(err, MovementError::InvalidTransition { .. }));
    }

    /// Two shipments racing for the same balance are serialized; the second
    /// fails once the first has consumed the stock.
    #[test]
    fn test_serialized_decrements_cannot_oversell() {
        let product = ProductId::new();
        let wh = warehouse();
        let k = key(product, wh);
        let receive = ledger_ops(MovementDirection::Inbound, StockEffect::Increase).unwrap();
        let ship = ledger_ops(MovementDirection::Outbound, StockEffect::Decrease).unwrap();

        let mut stock = Stock::default();
        stock
            .apply_movement(&receive, None, Some(&k), dec!(60), dec!(2.00))
            .unwrap();

        stock
            .apply_movement(&ship, Some(&k), None, dec!(50), dec!(2.00))
            .unwrap();
        let err = stock
            .apply_movement(&ship, Some(&k), None, dec!(50), dec!(2.00))
            .unwrap_err();

        assert!(matches!(err, StockError::InsufficientStock { .. }));
        assert_eq!(stock.quantity(&k), dec!(10));
    }

    // ========================================================================
    // Strategy Generators
    // ========================================================================

    /// Strategy for positive quantities (0.001 to 10,000.000).
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 3))
    }

    /// Strategy for non-negative unit costs (0.00 to 1,000.00).
    fn cost_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    // ========================================================================
    // Workflow Property Tests
    // ========================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Approving then cancelling any single-line movement restores every
        /// balance it touched.
        #[test]
        fn prop_approve_then_cancel_restores_balances(
            seed in quantity_strategy(),
            qty in quantity_strategy(),
            cost in cost_strategy(),
        ) {
            let rules = [
                (MovementDirection::Inbound, StockEffect::Increase),
                (MovementDirection::Outbound, StockEffect::Decrease),
                (MovementDirection::Transfer, StockEffect::Neutral),
                (MovementDirection::Adjustment, StockEffect::Increase),
                (MovementDirection::Adjustment, StockEffect::Decrease),
            ];
            let product = ProductId::new();
            let src_key = key(product, warehouse());
            let dst_key = key(product, warehouse());
            let receive = ledger_ops(MovementDirection::Inbound, StockEffect::Increase).unwrap();

            for (direction, effect) in rules {
                let mut stock = Stock::default();
                stock
                    .apply_movement(&receive, None, Some(&src_key), seed + qty, cost)
                    .unwrap();
                stock
                    .apply_movement(&receive, None, Some(&dst_key), seed + qty, cost)
                    .unwrap();
                let before = stock.clone();

                let ops = ledger_ops(direction, effect).unwrap();
                stock
                    .apply_movement(&ops, Some(&src_key), Some(&dst_key), qty, cost)
                    .unwrap();
                stock
                    .apply_movement(
                        &ReversalEngine::reversing_ops(&ops),
                        Some(&src_key),
                        Some(&dst_key),
                        qty,
                        cost,
                    )
                    .unwrap();

                prop_assert_eq!(stock.quantity(&src_key), before.quantity(&src_key));
                prop_assert_eq!(stock.quantity(&dst_key), before.quantity(&dst_key));
            }
        }

        /// A transfer never changes the combined quantity across endpoints,
        /// and never drives either endpoint negative.
        #[test]
        fn prop_transfer_conserves_stock(
            seed in quantity_strategy(),
            qty in quantity_strategy(),
            cost in cost_strategy(),
        ) {
            let product = ProductId::new();
            let src_key = key(product, warehouse());
            let dst_key = key(product, warehouse());
            let receive = ledger_ops(MovementDirection::Inbound, StockEffect::Increase).unwrap();
            let transfer = ledger_ops(MovementDirection::Transfer, StockEffect::Neutral).unwrap();

            let mut stock = Stock::default();
            stock
                .apply_movement(&receive, None, Some(&src_key), seed, cost)
                .unwrap();
            let total = stock.quantity(&src_key) + stock.quantity(&dst_key);

            let result = stock.apply_movement(
                &transfer,
                Some(&src_key),
                Some(&dst_key),
                qty,
                cost,
            );
            prop_assert_eq!(result.is_ok(), qty <= seed);
            prop_assert_eq!(stock.quantity(&src_key) + stock.quantity(&dst_key), total);
            prop_assert!(stock.quantity(&src_key) >= Decimal::ZERO);
            prop_assert!(stock.quantity(&dst_key) >= Decimal::ZERO);
        }

        /// The document workflow only ever reaches Approved from Pending, no
        /// matter the order of attempted actions.
        #[test]
        fn prop_workflow_never_skips_pending(
            approve_first in any::<bool>(),
        ) {
            let user = UserId::new();
            let mut status = MovementStatus::Pending;

            if approve_first {
                WorkflowService::approve(status, 1, user).unwrap();
                status = MovementStatus::Approved;
                // A second approval must fail.
                prop_assert!(WorkflowService::approve(status, 1, user).is_err());
            }

            WorkflowService::cancel(status, user, "cleanup").unwrap();
            status = MovementStatus::Cancelled;
            prop_assert!(WorkflowService::approve(status, 1, user).is_err());
            prop_assert!(WorkflowService::cancel(status, user, "again").is_err());
        }
    }
}
