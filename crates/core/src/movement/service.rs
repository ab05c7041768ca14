//! Movement service for document validation and line resolution.
//!
//! This module provides the core business logic for validating and resolving
//! inventory movements before they are persisted to the database.

use rust_decimal::Decimal;
use kardex_shared::types::ProductId;

use super::error::MovementError;
use super::types::{CreateMovementInput, MovementLineInput, MovementStatus, MovementTotals};
use crate::catalog::{MovementDirection, MovementType};

/// A movement line with its quantity resolved to the product's base unit.
#[derive(Debug, Clone)]
pub struct ResolvedLine {
    /// The product being moved.
    pub product_id: ProductId,
    /// Quantity as entered, in `unit_code`.
    pub quantity: Decimal,
    /// Unit of measure code the quantity was entered in.
    pub unit_code: String,
    /// Cost per base unit.
    pub unit_cost: Decimal,
    /// Quantity converted to the product's base unit.
    pub base_quantity: Decimal,
    /// Line value (base quantity times unit cost).
    pub line_total: Decimal,
    /// Optional lot/batch number.
    pub lot_number: Option<String>,
    /// Optional serial number.
    pub serial_number: Option<String>,
    /// Optional expiry date for the lot.
    pub expiry_date: Option<chrono::NaiveDate>,
}

/// Movement service for document validation and resolution.
///
/// This service contains pure business logic with no database dependencies.
/// Product existence and unit conversion are injected as lookups because the
/// product master lives outside this engine.
pub struct MovementService;

impl MovementService {
    /// Validate a movement and resolve its lines before persisting.
    ///
    /// Performs all creation-time checks:
    /// 1. The movement type must be active
    /// 2. Endpoints required by the type must be present
    /// 3. Transfer endpoints must be internal locations
    /// 4. At least one line must be present
    /// 5. Each line is resolved (see `resolve_line`)
    ///
    /// # Arguments
    ///
    /// * `input` - The movement input to validate
    /// * `movement_type` - The resolved movement type configuration
    /// * `unit_to_base` - Converts (`product_id`, `unit_code`, quantity) to base quantity
    /// * `product_exists` - Reports whether a product is known
    ///
    /// # Errors
    ///
    /// Returns `MovementError` if validation fails.
    pub fn validate_and_resolve<U, P>(
        input: &CreateMovementInput,
        movement_type: &MovementType,
        unit_to_base: U,
        product_exists: P,
    ) -> Result<(Vec<ResolvedLine>, MovementTotals), MovementError>
    where
        U: Fn(ProductId, &str, Decimal) -> Option<Decimal>,
        P: Fn(ProductId) -> bool,
    {
        if !movement_type.is_active {
            return Err(MovementError::InactiveMovementType(
                movement_type.code.clone(),
            ));
        }

        if movement_type.requires_source && input.source.is_none() {
            return Err(MovementError::MissingSourceLocation);
        }
        if movement_type.requires_destination && input.destination.is_none() {
            return Err(MovementError::MissingDestinationLocation);
        }

        if movement_type.direction == MovementDirection::Transfer {
            for endpoint in [input.source, input.destination].into_iter().flatten() {
                if !endpoint.kind.is_internal() {
                    return Err(MovementError::EndpointNotInternal(endpoint));
                }
            }
        }

        if input.lines.is_empty() {
            return Err(MovementError::NoLines);
        }

        let mut resolved = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            resolved.push(Self::resolve_line(line, &unit_to_base, &product_exists)?);
        }

        let totals = Self::calculate_totals(&resolved);
        Ok((resolved, totals))
    }

    /// Validate a single line and resolve its quantity to the base unit.
    ///
    /// # Errors
    ///
    /// Returns `MovementError` when the quantity is not positive, the unit
    /// cost is negative, the product is unknown, or no unit conversion exists.
    pub fn resolve_line<U, P>(
        line: &MovementLineInput,
        unit_to_base: &U,
        product_exists: &P,
    ) -> Result<ResolvedLine, MovementError>
    where
        U: Fn(ProductId, &str, Decimal) -> Option<Decimal>,
        P: Fn(ProductId) -> bool,
    {
        if line.quantity <= Decimal::ZERO {
            return Err(MovementError::NonPositiveQuantity {
                product_id: line.product_id,
                quantity: line.quantity,
            });
        }
        if line.unit_cost < Decimal::ZERO {
            return Err(MovementError::NegativeUnitCost {
                product_id: line.product_id,
                unit_cost: line.unit_cost,
            });
        }
        if !product_exists(line.product_id) {
            return Err(MovementError::UnknownProduct(line.product_id));
        }

        let base_quantity = unit_to_base(line.product_id, &line.unit_code, line.quantity)
            .ok_or_else(|| MovementError::UnknownUnit {
                unit_code: line.unit_code.clone(),
                product_id: line.product_id,
            })?;

        Ok(ResolvedLine {
            product_id: line.product_id,
            quantity: line.quantity,
            unit_code: line.unit_code.clone(),
            unit_cost: line.unit_cost,
            base_quantity,
            line_total: base_quantity * line.unit_cost,
            lot_number: line.lot_number.clone(),
            serial_number: line.serial_number.clone(),
            expiry_date: line.expiry_date,
        })
    }

    /// Calculate header totals from resolved lines.
    #[must_use]
    pub fn calculate_totals(lines: &[ResolvedLine]) -> MovementTotals {
        let total_quantity = lines.iter().map(|l| l.base_quantity).sum();
        let total_amount = lines.iter().map(|l| l.line_total).sum();
        MovementTotals {
            total_quantity,
            total_amount,
        }
    }

    /// Validate that a movement can still be modified.
    ///
    /// # Errors
    ///
    /// Returns `MovementError::NotEditable` unless the movement is pending.
    pub const fn validate_editable(status: MovementStatus) -> Result<(), MovementError> {
        if status.is_editable() {
            Ok(())
        } else {
            Err(MovementError::NotEditable(status))
        }
    }
}
