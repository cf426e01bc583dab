//! In-memory store for tests and local runs.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{EngineError, EngineResult};
use crate::models::{Payment, Technique, Worker};
use crate::session::Credential;

use super::{PaymentRepository, TechniqueRepository, WorkerRepository};

/// Entities written with an optimistic-concurrency check.
trait Versioned: Clone {
    const ENTITY: &'static str;
    fn id(&self) -> &str;
    fn version(&self) -> u64;
    fn set_version(&mut self, version: u64);
}

impl Versioned for Technique {
    const ENTITY: &'static str = "technique";
    fn id(&self) -> &str {
        &self.id
    }
    fn version(&self) -> u64 {
        self.version
    }
    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

impl Versioned for Worker {
    const ENTITY: &'static str = "worker";
    fn id(&self) -> &str {
        &self.id
    }
    fn version(&self) -> u64 {
        self.version
    }
    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

fn insert_versioned<T: Versioned>(items: &mut Vec<T>, mut item: T) -> EngineResult<T> {
    if items.iter().any(|i| i.id() == item.id()) {
        return Err(EngineError::Storage {
            message: format!("{} already exists: {}", T::ENTITY, item.id()),
        });
    }
    item.set_version(1);
    items.push(item.clone());
    Ok(item)
}

fn replace_versioned<T: Versioned>(items: &mut [T], mut item: T) -> EngineResult<T> {
    let stored = items
        .iter_mut()
        .find(|i| i.id() == item.id())
        .ok_or_else(|| EngineError::not_found(T::ENTITY, item.id()))?;

    if stored.version() != item.version() {
        return Err(EngineError::VersionConflict {
            entity: T::ENTITY,
            id: item.id().to_string(),
            expected: item.version(),
            actual: stored.version(),
        });
    }
    item.set_version(stored.version() + 1);
    *stored = item.clone();
    Ok(item)
}

fn remove_by_id<T>(
    items: &mut Vec<T>,
    entity: &'static str,
    id: &str,
    id_of: impl Fn(&T) -> &str,
) -> EngineResult<()> {
    let before = items.len();
    items.retain(|i| id_of(i) != id);
    if items.len() == before {
        return Err(EngineError::not_found(entity, id));
    }
    Ok(())
}

fn poisoned<E>(_: E) -> EngineError {
    EngineError::Storage {
        message: "store lock poisoned".to_string(),
    }
}

/// One user's data.
#[derive(Debug, Default)]
struct Partition {
    techniques: Vec<Technique>,
    workers: Vec<Worker>,
    payments: Vec<Payment>,
}

/// A process-local store partitioned by user.
///
/// Credentials must be issued by [`InMemoryStore::sign_in`]; unknown or
/// revoked tokens are refused with `Unauthorized`.
///
/// # Example
///
/// ```
/// use rental_ledger::store::{InMemoryStore, TechniqueRepository};
///
/// let store = InMemoryStore::new();
/// let credential = store.sign_in("owner@example.com").unwrap();
/// assert!(store.list_techniques(&credential).unwrap().is_empty());
///
/// store.revoke(&credential).unwrap();
/// assert!(store.list_techniques(&credential).is_err());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tokens: RwLock<HashMap<String, String>>,
    partitions: RwLock<HashMap<String, Partition>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store behind an `Arc`.
    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Issues and registers a credential for a user.
    pub fn sign_in(&self, user_id: &str) -> EngineResult<Credential> {
        let credential = Credential::issue(user_id);
        self.tokens
            .write()
            .map_err(poisoned)?
            .insert(credential.token.clone(), credential.user_id.clone());
        Ok(credential)
    }

    /// Invalidates a credential.
    pub fn revoke(&self, credential: &Credential) -> EngineResult<()> {
        self.tokens.write().map_err(poisoned)?.remove(&credential.token);
        Ok(())
    }

    fn authorize(&self, credential: &Credential) -> EngineResult<()> {
        let tokens = self.tokens.read().map_err(poisoned)?;
        match tokens.get(&credential.token) {
            Some(user_id) if *user_id == credential.user_id => Ok(()),
            _ => Err(EngineError::Unauthorized {
                reason: "unknown or revoked token".to_string(),
            }),
        }
    }

    fn read<T>(&self, credential: &Credential, f: impl FnOnce(&Partition) -> T) -> EngineResult<T> {
        self.authorize(credential)?;
        let partitions = self.partitions.read().map_err(poisoned)?;
        Ok(match partitions.get(&credential.user_id) {
            Some(partition) => f(partition),
            None => f(&Partition::default()),
        })
    }

    fn write<T>(
        &self,
        credential: &Credential,
        f: impl FnOnce(&mut Partition) -> EngineResult<T>,
    ) -> EngineResult<T> {
        self.authorize(credential)?;
        let mut partitions = self.partitions.write().map_err(poisoned)?;
        f(partitions.entry(credential.user_id.clone()).or_default())
    }
}

impl TechniqueRepository for InMemoryStore {
    fn list_techniques(&self, credential: &Credential) -> EngineResult<Vec<Technique>> {
        self.read(credential, |p| p.techniques.clone())
    }

    fn get_technique(&self, credential: &Credential, id: &str) -> EngineResult<Option<Technique>> {
        self.read(credential, |p| p.techniques.iter().find(|t| t.id == id).cloned())
    }

    fn insert_technique(
        &self,
        credential: &Credential,
        technique: Technique,
    ) -> EngineResult<Technique> {
        self.write(credential, |p| insert_versioned(&mut p.techniques, technique))
    }

    fn update_technique(
        &self,
        credential: &Credential,
        technique: Technique,
    ) -> EngineResult<Technique> {
        self.write(credential, |p| replace_versioned(&mut p.techniques, technique))
    }

    fn delete_technique(&self, credential: &Credential, id: &str) -> EngineResult<()> {
        self.write(credential, |p| {
            remove_by_id(&mut p.techniques, "technique", id, |t| &t.id)
        })
    }
}

impl WorkerRepository for InMemoryStore {
    fn list_workers(&self, credential: &Credential) -> EngineResult<Vec<Worker>> {
        self.read(credential, |p| p.workers.clone())
    }

    fn get_worker(&self, credential: &Credential, id: &str) -> EngineResult<Option<Worker>> {
        self.read(credential, |p| p.workers.iter().find(|w| w.id == id).cloned())
    }

    fn insert_worker(&self, credential: &Credential, worker: Worker) -> EngineResult<Worker> {
        self.write(credential, |p| insert_versioned(&mut p.workers, worker))
    }

    fn update_worker(&self, credential: &Credential, worker: Worker) -> EngineResult<Worker> {
        self.write(credential, |p| replace_versioned(&mut p.workers, worker))
    }

    fn delete_worker(&self, credential: &Credential, id: &str) -> EngineResult<()> {
        self.write(credential, |p| remove_by_id(&mut p.workers, "worker", id, |w| &w.id))
    }
}

impl PaymentRepository for InMemoryStore {
    fn list_payments(&self, credential: &Credential) -> EngineResult<Vec<Payment>> {
        self.read(credential, |p| p.payments.clone())
    }

    fn insert_payment(&self, credential: &Credential, payment: Payment) -> EngineResult<Payment> {
        self.write(credential, |p| {
            if p.payments.iter().any(|existing| existing.id == payment.id) {
                return Err(EngineError::Storage {
                    message: format!("payment already exists: {}", payment.id),
                });
            }
            p.payments.push(payment.clone());
            Ok(payment)
        })
    }

    fn delete_payment(&self, credential: &Credential, id: &str) -> EngineResult<()> {
        self.write(credential, |p| remove_by_id(&mut p.payments, "payment", id, |payment| &payment.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RentalStatus;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    fn create_test_technique(id: &str) -> Technique {
        Technique {
            id: id.to_string(),
            name: "Excavator".to_string(),
            description: None,
            monthly_rent: Decimal::from(15000),
            planned_working_days: 26,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            status: RentalStatus::Active,
            day_offs: Default::default(),
            created_at: Utc::now(),
            version: 0,
        }
    }

    fn create_test_payment(id: &str) -> Payment {
        Payment {
            id: id.to_string(),
            worker_id: "wrk_001".to_string(),
            amount: Decimal::from(100),
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            note: None,
        }
    }

    #[test]
    fn test_insert_sets_first_version() {
        let store = InMemoryStore::new();
        let credential = store.sign_in("owner").unwrap();
        let stored = store
            .insert_technique(&credential, create_test_technique("tech_001"))
            .unwrap();
        assert_eq!(stored.version, 1);
        assert_eq!(store.list_techniques(&credential).unwrap().len(), 1);
    }

    #[test]
    fn test_update_bumps_version() {
        let store = InMemoryStore::new();
        let credential = store.sign_in("owner").unwrap();
        let mut stored = store
            .insert_technique(&credential, create_test_technique("tech_001"))
            .unwrap();
        stored.name = "Crane".to_string();

        let updated = store.update_technique(&credential, stored).unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(
            store.get_technique(&credential, "tech_001").unwrap().unwrap().name,
            "Crane"
        );
    }

    #[test]
    fn test_stale_update_is_rejected() {
        let store = InMemoryStore::new();
        let credential = store.sign_in("owner").unwrap();
        let first = store
            .insert_technique(&credential, create_test_technique("tech_001"))
            .unwrap();
        let stale = first.clone();

        store.update_technique(&credential, first).unwrap();
        match store.update_technique(&credential, stale) {
            Err(EngineError::VersionConflict {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 1);
                assert_eq!(actual, 2);
            }
            other => panic!("Expected VersionConflict, got {:?}", other),
        }
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let store = InMemoryStore::new();
        let credential = store.sign_in("owner").unwrap();
        let result = store.update_technique(&credential, create_test_technique("ghost"));
        assert!(matches!(result, Err(EngineError::NotFound { .. })));
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let store = InMemoryStore::new();
        let credential = store.sign_in("owner").unwrap();
        store
            .insert_technique(&credential, create_test_technique("tech_001"))
            .unwrap();
        assert!(store
            .insert_technique(&credential, create_test_technique("tech_001"))
            .is_err());
    }

    #[test]
    fn test_partitions_are_isolated() {
        let store = InMemoryStore::new();
        let alice = store.sign_in("alice").unwrap();
        let bob = store.sign_in("bob").unwrap();
        store
            .insert_technique(&alice, create_test_technique("tech_001"))
            .unwrap();

        assert!(store.list_techniques(&bob).unwrap().is_empty());
        assert!(store.get_technique(&bob, "tech_001").unwrap().is_none());
        assert!(store.delete_technique(&bob, "tech_001").is_err());
    }

    #[test]
    fn test_forged_credential_is_unauthorized() {
        let store = InMemoryStore::new();
        let mut credential = store.sign_in("alice").unwrap();
        credential.user_id = "bob".to_string();
        assert!(matches!(
            store.list_payments(&credential),
            Err(EngineError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_payments_insert_and_delete() {
        let store = InMemoryStore::new();
        let credential = store.sign_in("owner").unwrap();
        store.insert_payment(&credential, create_test_payment("p1")).unwrap();
        store.insert_payment(&credential, create_test_payment("p2")).unwrap();
        store.delete_payment(&credential, "p1").unwrap();

        let ids: Vec<String> = store
            .list_payments(&credential)
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["p2".to_string()]);
        assert!(store.delete_payment(&credential, "p1").is_err());
    }

    #[test]
    fn test_store_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InMemoryStore>();
        let _shared: Arc<dyn TechniqueRepository> = InMemoryStore::arc();
    }
}
