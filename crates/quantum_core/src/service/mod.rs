//! Use-case services over the repository layer.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the store facade decoupled from SQL details.

pub mod block_service;
pub mod page_service;
pub mod planner_service;
