//! Request and response types for the HTTP API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::{InstanceConfig, MinerInstance};
use crate::miner::{MinerDescriptor, MinerView, ParamSpec};

// =============================================================================
// Instance Types
// =============================================================================

/// Request to create a miner instance.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateInstanceRequest {
    /// Input stream identifier the miner attaches to.
    pub stream: String,
    /// Parameter values keyed by name.
    #[serde(default)]
    pub params: BTreeMap<String, serde_json::Value>,
}

impl From<CreateInstanceRequest> for InstanceConfig {
    fn from(req: CreateInstanceRequest) -> Self {
        Self {
            stream: req.stream,
            params: req.params,
        }
    }
}

/// Response carrying a freshly created instance's identifier.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateInstanceResponse {
    pub id: String,
}

/// Summary of one registered instance.
#[derive(Debug, Serialize, Deserialize)]
pub struct InstanceSummary {
    pub id: String,
    /// Miner type identifier.
    pub miner: String,
    /// Miner type display name.
    pub miner_name: String,
    pub stream: String,
    pub running: bool,
    pub created_at: String,
}

impl From<&MinerInstance> for InstanceSummary {
    fn from(instance: &MinerInstance) -> Self {
        Self {
            id: instance.id().to_string(),
            miner: instance.descriptor().id.clone(),
            miner_name: instance.descriptor().name.clone(),
            stream: instance.config().stream.clone(),
            running: instance.miner().is_running(),
            created_at: instance
                .created_at()
                .format("%Y-%m-%dT%H:%M:%SZ")
                .to_string(),
        }
    }
}

/// Response containing the instance listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListInstancesResponse {
    pub instances: Vec<InstanceSummary>,
}

/// Acknowledgement for start/stop/delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct AckResponse {
    pub id: String,
}

/// Running-state response.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
}

/// Computed views response, in the miner's order.
#[derive(Debug, Serialize, Deserialize)]
pub struct ViewsResponse {
    pub views: Vec<MinerView>,
}

// =============================================================================
// Catalog Types
// =============================================================================

/// One registered miner type.
#[derive(Debug, Serialize, Deserialize)]
pub struct MinerTypeSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParamSpec>,
}

impl From<&MinerDescriptor> for MinerTypeSummary {
    fn from(descriptor: &MinerDescriptor) -> Self {
        Self {
            id: descriptor.id.clone(),
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            parameters: descriptor.parameters.clone(),
        }
    }
}

/// Response containing the catalog listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListMinersResponse {
    pub miners: Vec<MinerTypeSummary>,
}

// =============================================================================
// Common Types
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Version response.
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}

/// Error response: human-readable message plus stable outcome code.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
