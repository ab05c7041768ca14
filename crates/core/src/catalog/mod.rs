//! Movement type catalog.
//!
//! Movement types are the configuration records that classify every stock
//! movement: which direction goods flow, how the flow affects balances, and
//! which endpoints (source/destination) a movement must carry.

pub mod error;
pub mod rules;
pub mod types;

pub use error::CatalogError;
pub use rules::{BalanceEndpoint, BalanceOp, OpKind, ledger_ops};
pub use types::{MovementDirection, MovementType, StockEffect};

#[cfg(test)]
mod rules_props;
