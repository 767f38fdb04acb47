//! Per-owner task management.
//!
//! Tasks are kept in a per-owner priority order: placing a task at an
//! occupied priority shifts the contiguous block of colliding active tasks
//! up by one. Every status change of a stored task is appended to an
//! immutable history. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
