//! In-memory adapters for tests and single-process use.

mod task;

pub use task::InMemoryTaskRepository;
