//! Per-location stock balances with weighted-average costing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use kardex_shared::types::ProductId;

use super::error::StockError;
use crate::movement::LocationRef;

/// Identifies one balance row.
///
/// Lots are part of the key: a product received under two lot numbers at the
/// same location keeps two balance rows with independent costs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BalanceKey {
    /// The product.
    pub product_id: ProductId,
    /// The internal location holding the stock.
    pub location: LocationRef,
    /// Optional lot/batch number.
    pub lot_number: Option<String>,
}

/// Quantity and cost state for one balance row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockBalance {
    /// Physical quantity at the location, in the product's base unit.
    pub quantity_on_hand: Decimal,
    /// Quantity committed to outbound documents but not yet shipped.
    pub reserved_quantity: Decimal,
    /// Weighted-average cost per base unit.
    pub weighted_average_unit_cost: Decimal,
}

/// Blends an existing balance cost with an incoming receipt.
///
/// Returns the incoming cost when the combined quantity would be zero, so a
/// receipt into an empty row always adopts the receipt cost.
#[must_use]
pub fn weighted_average(
    on_hand: Decimal,
    current_cost: Decimal,
    incoming_quantity: Decimal,
    incoming_cost: Decimal,
) -> Decimal {
    let combined = on_hand + incoming_quantity;
    if combined.is_zero() {
        incoming_cost
    } else {
        (on_hand * current_cost + incoming_quantity * incoming_cost) / combined
    }
}

impl StockBalance {
    /// An empty balance row.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            quantity_on_hand: Decimal::ZERO,
            reserved_quantity: Decimal::ZERO,
            weighted_average_unit_cost: Decimal::ZERO,
        }
    }

    /// Quantity free for new outbound documents.
    #[must_use]
    pub fn available_quantity(&self) -> Decimal {
        (self.quantity_on_hand - self.reserved_quantity).max(Decimal::ZERO)
    }

    /// Total value of the row at the current weighted-average cost.
    #[must_use]
    pub fn total_value(&self) -> Decimal {
        self.quantity_on_hand * self.weighted_average_unit_cost
    }

    /// Adds stock to the row, re-blending the weighted-average cost.
    ///
    /// # Errors
    ///
    /// Returns `StockError::NonPositiveQuantity` for a zero or negative
    /// quantity.
    pub fn apply_increase(&mut self, quantity: Decimal, unit_cost: Decimal) -> Result<(), StockError> {
        if quantity <= Decimal::ZERO {
            return Err(StockError::NonPositiveQuantity(quantity));
        }
        self.weighted_average_unit_cost = weighted_average(
            self.quantity_on_hand,
            self.weighted_average_unit_cost,
            quantity,
            unit_cost,
        );
        self.quantity_on_hand += quantity;
        Ok(())
    }

    /// Removes stock from the row. The weighted-average cost is unchanged;
    /// issues are valued at the cost in effect when they happen.
    ///
    /// The gate is the physical quantity on hand. Reservations narrow
    /// [`Self::available_quantity`] for planning queries but do not block an
    /// approved decrease.
    ///
    /// # Errors
    ///
    /// Returns `StockError::InsufficientStock` when the decrease would drive
    /// the quantity on hand negative, and `StockError::NonPositiveQuantity`
    /// for a zero or negative quantity.
    pub fn apply_decrease(&mut self, quantity: Decimal) -> Result<(), StockError> {
        if quantity <= Decimal::ZERO {
            return Err(StockError::NonPositiveQuantity(quantity));
        }
        if quantity > self.quantity_on_hand {
            return Err(StockError::InsufficientStock {
                available: self.quantity_on_hand,
                requested: quantity,
            });
        }
        self.quantity_on_hand -= quantity;
        Ok(())
    }
}

impl Default for StockBalance {
    fn default() -> Self {
        Self::empty()
    }
}
