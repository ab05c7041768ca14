//! Core business logic for Kardex.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `catalog` - Movement type configuration and the direction/effect rules table
//! - `movement` - Movement documents, line validation, and the approval workflow
//! - `stock` - Per-location balances, weighted-average costing, kardex entries,
//!   and reversal of approved movements
//! - `events` - Domain events emitted by movement lifecycle operations

pub mod catalog;
pub mod events;
pub mod movement;
pub mod stock;
