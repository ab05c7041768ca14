//! Movement type configuration records.

use serde::{Deserialize, Serialize};
use kardex_shared::types::MovementTypeId;

use crate::catalog::error::CatalogError;

/// Direction of goods flow for a movement type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    /// Goods enter the organization (e.g. purchase receipt).
    Inbound,
    /// Goods leave the organization (e.g. sales shipment).
    Outbound,
    /// Goods move between two internal locations.
    Transfer,
    /// Stock correction in either direction (count, damage, shrinkage).
    Adjustment,
}

impl MovementDirection {
    /// Parse a direction from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "inbound" => Some(Self::Inbound),
            "outbound" => Some(Self::Outbound),
            "transfer" => Some(Self::Transfer),
            "adjustment" => Some(Self::Adjustment),
            _ => None,
        }
    }

    /// Returns the string representation of the direction.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
            Self::Transfer => "transfer",
            Self::Adjustment => "adjustment",
        }
    }

    /// Returns the document number prefix for movements of this direction.
    #[must_use]
    pub const fn document_prefix(&self) -> &'static str {
        match self {
            Self::Inbound => "IN",
            Self::Outbound => "OUT",
            Self::Transfer => "TRF",
            Self::Adjustment => "ADJ",
        }
    }
}

impl std::fmt::Display for MovementDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a movement type affects stock balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockEffect {
    /// The movement adds stock at its destination.
    Increase,
    /// The movement removes stock from its source.
    Decrease,
    /// The movement relocates stock without changing the total (transfers).
    Neutral,
}

impl StockEffect {
    /// Parse an effect from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "increase" => Some(Self::Increase),
            "decrease" => Some(Self::Decrease),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }

    /// Returns the string representation of the effect.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for StockEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A movement type configuration record.
///
/// System types (seeded at install time) are immutable; user-defined types
/// can be edited until a movement references them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementType {
    /// Unique identifier.
    pub id: MovementTypeId,
    /// Unique short code (e.g. `PURCHASE_IN`).
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Direction of goods flow.
    pub direction: MovementDirection,
    /// Balance effect of movements of this type.
    pub effect: StockEffect,
    /// Whether movements of this type must carry a source location.
    pub requires_source: bool,
    /// Whether movements of this type must carry a destination location.
    pub requires_destination: bool,
    /// System types cannot be modified or deleted.
    pub is_system: bool,
    /// Inactive types cannot be used for new movements.
    pub is_active: bool,
}

impl MovementType {
    /// Validates that the direction, effect, and endpoint flags form a
    /// coherent configuration.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidConfiguration` when the flags contradict
    /// the direction/effect combination.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let check = |ok: bool, reason: &str| {
            if ok {
                Ok(())
            } else {
                Err(CatalogError::InvalidConfiguration {
                    code: self.code.clone(),
                    reason: reason.to_string(),
                })
            }
        };

        match self.direction {
            MovementDirection::Inbound => {
                check(
                    self.effect == StockEffect::Increase,
                    "inbound types must increase stock",
                )?;
                check(
                    self.requires_destination,
                    "inbound types must require a destination location",
                )?;
            }
            MovementDirection::Outbound => {
                check(
                    self.effect == StockEffect::Decrease,
                    "outbound types must decrease stock",
                )?;
                check(
                    self.requires_source,
                    "outbound types must require a source location",
                )?;
            }
            MovementDirection::Transfer => {
                check(
                    self.effect == StockEffect::Neutral,
                    "transfer types must be balance-neutral",
                )?;
                check(
                    self.requires_source && self.requires_destination,
                    "transfer types must require both source and destination locations",
                )?;
            }
            MovementDirection::Adjustment => match self.effect {
                StockEffect::Increase => {
                    check(
                        self.requires_destination && !self.requires_source,
                        "increasing adjustments must require only a destination location",
                    )?;
                }
                StockEffect::Decrease => {
                    check(
                        self.requires_source && !self.requires_destination,
                        "decreasing adjustments must require only a source location",
                    )?;
                }
                StockEffect::Neutral => {
                    check(false, "adjustments must either increase or decrease stock")?;
                }
            },
        }

        Ok(())
    }

    /// Validates that this type can be used for a new movement.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InactiveType` if the type has been deactivated.
    pub fn validate_usable(&self) -> Result<(), CatalogError> {
        if self.is_active {
            Ok(())
        } else {
            Err(CatalogError::InactiveType {
                code: self.code.clone(),
            })
        }
    }
}
