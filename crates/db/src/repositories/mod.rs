//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Validation lives in `kardex-core`; repositories resolve records, run the
//! core services, and persist the outcome.

pub mod movement;
pub mod movement_type;
pub mod stock;
pub mod workflow;

mod convert;

#[cfg(test)]
mod workflow_integration_tests;

pub use movement::{
    MovementFilter, MovementRepoError, MovementRepository, MovementWithLines,
};
pub use movement_type::{
    CreateMovementTypeInput, MovementTypeRepository, UpdateMovementTypeInput,
};
pub use stock::{KardexFilter, StockRepository};
pub use workflow::{ApproveResult, CancelResult, WorkflowError, WorkflowRepository};
