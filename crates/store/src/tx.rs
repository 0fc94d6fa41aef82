//! Versioned collections and optimistic transactions.
//!
//! A transaction snapshots the version of every document it reads.
//! Commit happens under a store-wide commit lock: if every read
//! version is still current, the staged writes apply atomically and
//! each written document's version bumps by one; otherwise the whole
//! closure re-runs. Reads of absent documents are validated too, so
//! phantom creation conflicts are caught.

use std::hash::Hash;

use dashmap::DashMap;
use thiserror::Error;
use kitabu_shared::AppError;
use kitabu_shared::types::InstitutionId;

/// Errors raised by the transaction layer itself.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Conflicts persisted past the retry budget.
    #[error("Transaction conflict persisted after {attempts} attempts")]
    Conflict {
        /// How many attempts were made.
        attempts: u32,
    },
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Conflict(err.to_string())
    }
}

/// A document plus its commit version.
#[derive(Debug, Clone)]
struct Versioned<T> {
    value: T,
    version: u64,
}

/// A tenant-partitioned collection of versioned documents.
///
/// Every key embeds the institution id, so cross-tenant reads are
/// unrepresentable.
#[derive(Debug)]
pub struct Collection<K: Eq + Hash, T> {
    name: &'static str,
    map: DashMap<(InstitutionId, K), Versioned<T>>,
}

impl<K, T> Collection<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone,
{
    /// Creates an empty collection.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            map: DashMap::new(),
        }
    }

    /// The collection name (used in tracing output).
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Committed point read outside any transaction.
    #[must_use]
    pub fn get(&self, tenant: InstitutionId, key: &K) -> Option<T> {
        self.map
            .get(&(tenant, key.clone()))
            .map(|entry| entry.value.clone())
    }

    /// Committed scan over one tenant's documents.
    ///
    /// Supports the simple equality/range queries the core depends on;
    /// the predicate sees each document and keeps or skips it.
    #[must_use]
    pub fn scan<F>(&self, tenant: InstitutionId, mut predicate: F) -> Vec<(K, T)>
    where
        F: FnMut(&K, &T) -> bool,
    {
        self.map
            .iter()
            .filter(|entry| entry.key().0 == tenant)
            .filter(|entry| predicate(&entry.key().1, &entry.value().value))
            .map(|entry| (entry.key().1.clone(), entry.value().value.clone()))
            .collect()
    }

    fn get_versioned(&self, tenant: InstitutionId, key: &K) -> (Option<T>, u64) {
        match self.map.get(&(tenant, key.clone())) {
            Some(entry) => (Some(entry.value.clone()), entry.version),
            None => (None, 0),
        }
    }

    fn version_of(&self, tenant: InstitutionId, key: &K) -> u64 {
        self.map
            .get(&(tenant, key.clone()))
            .map_or(0, |entry| entry.version)
    }

    fn apply_put(&self, tenant: InstitutionId, key: K, value: T) {
        let version = self.version_of(tenant, &key) + 1;
        self.map.insert((tenant, key), Versioned { value, version });
    }
}

/// One optimistic transaction: a read set of version checks plus a
/// staged write set, applied atomically at commit.
#[derive(Default)]
pub struct Tx<'s> {
    checks: Vec<Box<dyn Fn() -> bool + 's>>,
    writes: Vec<Box<dyn FnOnce() + 's>>,
}

impl<'s> Tx<'s> {
    /// Creates an empty transaction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Reads a document, recording its version (or absence) for
    /// commit-time validation.
    pub fn read<K, T>(
        &mut self,
        collection: &'s Collection<K, T>,
        tenant: InstitutionId,
        key: &K,
    ) -> Option<T>
    where
        K: Eq + Hash + Clone,
        T: Clone,
    {
        let (value, version) = collection.get_versioned(tenant, key);
        let key = key.clone();
        self.checks
            .push(Box::new(move || collection.version_of(tenant, &key) == version));
        value
    }

    /// Stages a write. Applied only if the whole transaction commits.
    pub fn put<K, T>(
        &mut self,
        collection: &'s Collection<K, T>,
        tenant: InstitutionId,
        key: K,
        value: T,
    ) where
        K: Eq + Hash + Clone,
        T: Clone,
    {
        self.writes
            .push(Box::new(move || collection.apply_put(tenant, key, value)));
    }

    /// Validates every recorded read version. Must run under the
    /// store's commit lock.
    pub(crate) fn validate(&self) -> bool {
        self.checks.iter().all(|check| check())
    }

    /// Applies the staged writes. Must run under the store's commit
    /// lock, after a successful [`Tx::validate`].
    pub(crate) fn commit(self) {
        for write in self.writes {
            write();
        }
    }
}
