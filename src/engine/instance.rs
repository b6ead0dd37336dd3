//! Miner instance identity and ownership.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::config::InstanceConfig;
use crate::miner::{Miner, MinerDescriptor};

/// Unique instance identifier, generated at creation and stable for the
/// instance's lifetime. Never caller-supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    /// Generate a fresh identifier.
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstanceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for InstanceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A live miner instance: identity, the descriptor it was built from, the
/// configuration snapshot it was built with, and exclusive ownership of the
/// running miner object.
pub struct MinerInstance {
    id: InstanceId,
    descriptor: Arc<MinerDescriptor>,
    config: InstanceConfig,
    created_at: DateTime<Utc>,
    miner: Box<dyn Miner>,
}

impl MinerInstance {
    pub(crate) fn new(
        descriptor: Arc<MinerDescriptor>,
        config: InstanceConfig,
        miner: Box<dyn Miner>,
    ) -> Self {
        Self {
            id: InstanceId::generate(),
            descriptor,
            config,
            created_at: Utc::now(),
            miner,
        }
    }

    pub fn id(&self) -> &InstanceId {
        &self.id
    }

    pub fn descriptor(&self) -> &MinerDescriptor {
        &self.descriptor
    }

    /// The configuration snapshot taken at creation. Never mutated.
    pub fn config(&self) -> &InstanceConfig {
        &self.config
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn miner(&self) -> &dyn Miner {
        self.miner.as_ref()
    }
}

impl fmt::Debug for MinerInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MinerInstance")
            .field("id", &self.id)
            .field("miner_type", &self.descriptor.id)
            .field("stream", &self.config.stream)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
