//! Requisition domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own input parsing rules shared by every adapter.
//!
//! # Invariants
//! - Every persisted event is identified by a store-assigned `EventId`.
//! - Events are created and deleted, never updated in place.

pub mod requisition;
