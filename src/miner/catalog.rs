//! The miner type catalog: an explicit map from type identifier to a
//! descriptor carrying the declared parameters and a fresh-instance factory.
//!
//! Descriptors are registered once at startup and shared read-only across
//! every instance of the type, so the catalog itself needs no locking.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{Miner, ParamSpec};

/// Factory producing a fresh, unconfigured, not-started miner.
pub type MinerFactory = Box<dyn Fn() -> Box<dyn Miner> + Send + Sync>;

/// Describes one registered miner type.
pub struct MinerDescriptor {
    /// Stable type identifier used in creation requests.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// One-line description for the catalog listing.
    pub description: String,
    /// Parameters instances of this type accept.
    pub parameters: Vec<ParamSpec>,
    factory: MinerFactory,
}

impl MinerDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<ParamSpec>,
        factory: MinerFactory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            parameters,
            factory,
        }
    }

    /// Produce a fresh, unconfigured miner.
    pub fn instantiate(&self) -> Box<dyn Miner> {
        (self.factory)()
    }
}

impl fmt::Debug for MinerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MinerDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Immutable catalog of registered miner types.
#[derive(Debug, Default)]
pub struct MinerCatalog {
    inner: HashMap<String, Arc<MinerDescriptor>>,
}

impl MinerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a miner type.
    ///
    /// Panics on a duplicate type id: registration happens at startup from
    /// code, so a duplicate is a programming error, not a runtime condition.
    #[must_use]
    pub fn register(mut self, descriptor: MinerDescriptor) -> Self {
        let id = descriptor.id.clone();
        let prev = self.inner.insert(id.clone(), Arc::new(descriptor));
        assert!(prev.is_none(), "duplicate miner type registered: {id}");
        self
    }

    /// Resolve a type identifier to its descriptor.
    pub fn resolve(&self, type_id: &str) -> Option<Arc<MinerDescriptor>> {
        self.inner.get(type_id).cloned()
    }

    /// All registered descriptors, ordered by type id for stable listings.
    pub fn list(&self) -> Vec<Arc<MinerDescriptor>> {
        let mut all: Vec<_> = self.inner.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
