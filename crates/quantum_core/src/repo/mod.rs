//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define data access contracts for the four entity collections.
//! - Keep SQL details and ordering behavior inside the repository boundary.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`*NotFound`) in addition to DB
//!   transport errors; silent no-op policy is a store-facade concern.
//! - Multi-row mutations (cascades, splices) run inside one transaction.

pub mod block_repo;
pub mod page_repo;
pub mod planner_repo;
pub mod workspace_repo;
