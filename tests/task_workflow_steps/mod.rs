//! Step definitions for task workflow scenarios.

mod given;
mod then;
mod when;
pub mod world;
