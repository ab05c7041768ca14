//! Movement documents and their lifecycle.
//!
//! A movement is a header (type, date, endpoints, status, audit fields) plus
//! one or more lines. Movements are created in `Pending` status, may be edited
//! while pending, and are finalized by approval or cancellation.

pub mod document;
pub mod error;
pub mod service;
pub mod types;
pub mod workflow;

pub use document::format_document_number;
pub use error::MovementError;
pub use service::{MovementService, ResolvedLine};
pub use types::{
    CreateMovementInput, LocationKind, LocationRef, MovementLineInput, MovementStatus,
    MovementTotals, WorkflowAction,
};
pub use workflow::WorkflowService;

#[cfg(test)]
mod workflow_props;
