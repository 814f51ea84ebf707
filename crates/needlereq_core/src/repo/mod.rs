//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from the gateway and command handlers.
//!
//! # Invariants
//! - Repository writes must enforce `NewRequisition::validate()` before
//!   persistence.

pub mod requisition_repo;
