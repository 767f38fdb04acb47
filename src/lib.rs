//! Taskdeck: personal task management core.
//!
//! The crate keeps each owner's active tasks in a dense priority order,
//! records every status transition, and mails owners a daily summary of
//! their task counts.
//!
//! # Architecture
//!
//! Taskdeck follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, priority reassignment, and status history
//! - [`report`]: Scheduled per-owner task summaries
//! - [`config`]: TOML configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod report;
pub mod task;
pub mod telemetry;
