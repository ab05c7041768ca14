//! Stock balances, kardex history, and reversal.
//!
//! Balances are tracked per (product, location, lot). Every approved movement
//! line appends kardex entries recording the quantity moved and the balance
//! after the change; the kardex is append-only and is never edited.

pub mod balance;
pub mod error;
pub mod ledger;
pub mod reversal;

pub use balance::{BalanceKey, StockBalance, weighted_average};
pub use error::StockError;
pub use ledger::{KardexEntry, TransactionKind};
pub use reversal::ReversalEngine;

#[cfg(test)]
mod balance_props;
#[cfg(test)]
mod reversal_props;
