//! Host-auth registry with scoped acquire/release.
//!
//! The registry is an explicit object handed to the engine and harness, not
//! ambient global state, so probes can run in isolation against independent
//! instances. `acquire`/`release` form a scoped pair around each negotiation:
//!
//! - acquire: snapshot-and-reset an existing record, or create an empty one
//! - release: restore the snapshot verbatim, or deregister a record that
//!   only ever existed for the probe
//!
//! Release must run whether or not the negotiation succeeded, so a failed
//! probe never leaves the registry mutated.

use dashmap::DashMap;
use tracing::debug;

use crate::auth::context::SecurityContext;
use crate::auth::method::AuthMethod;
use crate::auth::record::HostAuthRecord;

/// Exact-match key for a host-auth record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub host: String,
    pub user: String,
}

impl RecordKey {
    pub fn new(host: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
        }
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.user, self.host)
    }
}

/// Lease over a record for the duration of one negotiation.
///
/// Carries the pre-acquire snapshot when the record pre-existed. Dropping a
/// lease without `release` leaves the acquired state in place; `release` is
/// the restore point.
#[derive(Debug)]
pub struct RecordLease {
    key: RecordKey,
    snapshot: Option<HostAuthRecord>,
}

impl RecordLease {
    pub fn key(&self) -> &RecordKey {
        &self.key
    }
}

/// Registry of host-auth records, keyed by exact (host, user) match.
#[derive(Debug, Default)]
pub struct HostAuthRegistry {
    records: DashMap<RecordKey, HostAuthRecord>,
}

impl HostAuthRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Look up or create the record for (host, user) and lease it.
    ///
    /// An existing record is snapshotted and reset in place; the caller
    /// receives the live (now empty) record plus the snapshot for later
    /// restoration. A missing record is created empty, with no snapshot.
    pub fn acquire(&self, host: &str, user: &str) -> RecordLease {
        let key = RecordKey::new(host, user);
        let snapshot = match self.records.get_mut(&key) {
            Some(mut record) => {
                debug!("existing record for {key}: snapshot and reset");
                let snapshot = record.clone();
                record.reset();
                Some(snapshot)
            }
            None => {
                debug!("no record for {key}: registering an empty one");
                self.records
                    .insert(key.clone(), HostAuthRecord::new(host, user));
                None
            }
        };
        RecordLease { key, snapshot }
    }

    /// Put the registry back exactly as `acquire` found it.
    ///
    /// With a snapshot the live record's state is replaced verbatim; without
    /// one the record is fully deregistered rather than reset: a record that
    /// only existed for the probe must not leak into the configuration.
    pub fn release(&self, lease: RecordLease) {
        match lease.snapshot {
            Some(snapshot) => {
                self.records.insert(lease.key, snapshot);
            }
            None => {
                self.records.remove(&lease.key);
            }
        }
    }

    /// Append a method to the record at `key`. No-op for a missing record.
    pub fn add_method(&self, key: &RecordKey, method: AuthMethod, details: impl Into<String>) {
        if let Some(mut record) = self.records.get_mut(key) {
            record.add_method(method, details);
        }
    }

    /// Remove a method from the record at `key`. Silent no-op when the
    /// method or the record is missing.
    pub fn remove_method(&self, key: &RecordKey, method: AuthMethod) {
        if let Some(mut record) = self.records.get_mut(key) {
            record.remove_method(method);
        }
    }

    /// Attach an established context to the record at `key`.
    pub fn push_context(&self, key: &RecordKey, context: SecurityContext) {
        if let Some(mut record) = self.records.get_mut(key) {
            record.push_context(context);
        }
    }

    /// Established contexts for the record at `key`, in creation order.
    ///
    /// Returns a restartable snapshot of the live list; entries can be
    /// invalidated by an intervening reset.
    pub fn established(&self, key: &RecordKey) -> Vec<SecurityContext> {
        self.records
            .get(key)
            .map(|record| record.established().to_vec())
            .unwrap_or_default()
    }

    /// Current state of the record at `key`, cloned.
    pub fn record(&self, key: &RecordKey) -> Option<HostAuthRecord> {
        self.records.get(key).map(|record| record.value().clone())
    }

    pub fn contains(&self, host: &str, user: &str) -> bool {
        self.records.contains_key(&RecordKey::new(host, user))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_registry() -> (HostAuthRegistry, RecordKey) {
        let registry = HostAuthRegistry::new();
        let key = RecordKey::new("localhost", "alice");
        let lease = registry.acquire("localhost", "alice");
        registry.add_method(&key, AuthMethod::Password, "p");
        registry.push_context(&key, SecurityContext::new(AuthMethod::Password, 4));
        // Deliberately not released: the record stays behind as pre-existing
        // configuration
        drop(lease);
        (registry, key)
    }

    #[test]
    fn test_acquire_creates_missing_record() {
        let registry = HostAuthRegistry::new();
        let lease = registry.acquire("localhost", "alice");

        assert!(registry.contains("localhost", "alice"));
        assert_eq!(lease.key(), &RecordKey::new("localhost", "alice"));
    }

    #[test]
    fn test_acquire_resets_existing_record() {
        let (registry, key) = seeded_registry();

        let lease = registry.acquire("localhost", "alice");

        let live = registry.record(&key).unwrap();
        assert!(live.methods().is_empty());
        assert!(live.established().is_empty());
        registry.release(lease);
    }

    #[test]
    fn test_release_restores_pre_existing_record_verbatim() {
        let (registry, key) = seeded_registry();
        let before = registry.record(&key).unwrap();

        let lease = registry.acquire("localhost", "alice");
        registry.add_method(&key, AuthMethod::Kerberos, "scratch");
        registry.push_context(&key, SecurityContext::fresh(AuthMethod::Kerberos));
        registry.release(lease);

        assert_eq!(registry.record(&key).unwrap(), before);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_release_deregisters_probe_created_record() {
        let registry = HostAuthRegistry::new();

        let lease = registry.acquire("localhost", "alice");
        registry.add_method(lease.key(), AuthMethod::Password, "p");
        registry.release(lease);

        assert!(!registry.contains("localhost", "alice"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_round_trip_without_mutation() {
        let (registry, key) = seeded_registry();
        let before = registry.record(&key).unwrap();

        let lease = registry.acquire("localhost", "alice");
        registry.release(lease);

        assert_eq!(registry.record(&key).unwrap(), before);
    }

    #[test]
    fn test_records_are_keyed_by_exact_match() {
        let registry = HostAuthRegistry::new();
        let lease_a = registry.acquire("localhost", "alice");
        let lease_b = registry.acquire("localhost", "bob");

        assert_eq!(registry.len(), 2);
        registry.release(lease_a);
        registry.release(lease_b);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_mutators_tolerate_missing_record() {
        let registry = HostAuthRegistry::new();
        let key = RecordKey::new("nowhere", "nobody");

        registry.add_method(&key, AuthMethod::Password, "p");
        registry.remove_method(&key, AuthMethod::Password);
        registry.push_context(&key, SecurityContext::fresh(AuthMethod::Password));

        assert!(registry.established(&key).is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_established_is_a_restartable_view() {
        let (registry, key) = seeded_registry();

        let first = registry.established(&key);
        let second = registry.established(&key);

        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_record_key_display() {
        let key = RecordKey::new("localhost", "alice");
        assert_eq!(key.to_string(), "alice@localhost");
    }
}
