//! In-memory registry of live miner instances.
//!
//! A single exclusive lock covers insert, lookup, removal, and listing:
//! create and delete race with every other operation, so all map access is
//! serialized here. Lookups hand out a strong `Arc` so per-instance work
//! proceeds safely outside the lock even if the instance is deleted
//! concurrently - the operation then runs against a no-longer-registered but
//! still-alive object.
//!
//! The registry is exclusively owned by the lifecycle controller; nothing
//! else mutates it.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::engine::instance::{InstanceId, MinerInstance};

#[derive(Debug, Default)]
pub struct InstanceRegistry {
    inner: RwLock<HashMap<InstanceId, Arc<MinerInstance>>>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly created instance.
    ///
    /// Identifiers are generated, never caller-supplied, so a collision is
    /// impossible by construction; observing one is a fatal invariant
    /// violation, not a recoverable error.
    pub(crate) fn insert(&self, instance: Arc<MinerInstance>) {
        let id = instance.id().clone();
        let prev = self.inner.write().insert(id.clone(), instance);
        assert!(prev.is_none(), "instance id collision: {id}");
    }

    /// Strong reference to the instance, if registered.
    pub fn get(&self, id: &InstanceId) -> Option<Arc<MinerInstance>> {
        self.inner.read().get(id).cloned()
    }

    /// Remove and return the instance, if registered.
    pub(crate) fn remove(&self, id: &InstanceId) -> Option<Arc<MinerInstance>> {
        self.inner.write().remove(id)
    }

    /// Point-in-time snapshot of all instances, ordered by creation time.
    ///
    /// Later registry mutations do not affect an already-returned snapshot.
    pub fn snapshot(&self) -> Vec<Arc<MinerInstance>> {
        let mut all: Vec<_> = self.inner.read().values().cloned().collect();
        all.sort_by_key(|i| i.created_at());
        all
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
