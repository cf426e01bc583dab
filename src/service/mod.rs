//! Stateful services over the store.
//!
//! Services hold the last fetched snapshots, validate requests, run the pure
//! engines and write through the repositories. After every successful write
//! the snapshots are refetched wholesale.

mod technique;
mod worker;

pub use technique::TechniqueService;
pub use worker::WorkerService;
