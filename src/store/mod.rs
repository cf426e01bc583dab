//! Persistence seam for the ledger.
//!
//! The services talk to storage only through these traits. Every call takes
//! the caller's [`Credential`] and only sees that user's data. Writes of an
//! existing entity carry the version the caller last read; a mismatch fails
//! with [`EngineError::VersionConflict`](crate::error::EngineError) instead of
//! overwriting a newer write.

mod memory;

pub use memory::InMemoryStore;

use crate::error::EngineResult;
use crate::models::{Payment, Technique, Worker};
use crate::session::Credential;

/// Storage operations for techniques.
pub trait TechniqueRepository: Send + Sync {
    /// Lists the caller's techniques, oldest first.
    fn list_techniques(&self, credential: &Credential) -> EngineResult<Vec<Technique>>;

    /// Fetches one technique.
    fn get_technique(&self, credential: &Credential, id: &str) -> EngineResult<Option<Technique>>;

    /// Stores a new technique and returns it as stored.
    fn insert_technique(&self, credential: &Credential, technique: Technique)
    -> EngineResult<Technique>;

    /// Replaces a technique if `technique.version` matches the stored one.
    fn update_technique(&self, credential: &Credential, technique: Technique)
    -> EngineResult<Technique>;

    /// Deletes a technique.
    fn delete_technique(&self, credential: &Credential, id: &str) -> EngineResult<()>;
}

/// Storage operations for workers and their notes.
pub trait WorkerRepository: Send + Sync {
    /// Lists the caller's workers, oldest first.
    fn list_workers(&self, credential: &Credential) -> EngineResult<Vec<Worker>>;

    /// Fetches one worker.
    fn get_worker(&self, credential: &Credential, id: &str) -> EngineResult<Option<Worker>>;

    /// Stores a new worker and returns it as stored.
    fn insert_worker(&self, credential: &Credential, worker: Worker) -> EngineResult<Worker>;

    /// Replaces a worker if `worker.version` matches the stored one.
    fn update_worker(&self, credential: &Credential, worker: Worker) -> EngineResult<Worker>;

    /// Deletes a worker. Their payments are left in place.
    fn delete_worker(&self, credential: &Credential, id: &str) -> EngineResult<()>;
}

/// Storage operations for payments.
pub trait PaymentRepository: Send + Sync {
    /// Lists the caller's payments in insertion order.
    fn list_payments(&self, credential: &Credential) -> EngineResult<Vec<Payment>>;

    /// Stores a new payment.
    fn insert_payment(&self, credential: &Credential, payment: Payment) -> EngineResult<Payment>;

    /// Deletes a payment.
    fn delete_payment(&self, credential: &Credential, id: &str) -> EngineResult<()>;
}
