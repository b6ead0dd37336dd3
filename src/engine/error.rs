//! Engine error taxonomy.
//!
//! Every caller-visible failure maps to a distinct, stable outcome code so
//! clients can branch on cause, with an HTTP status mapping for the API
//! layer. Underlying miner failures are carried as sources, never swallowed.

use crate::engine::config::ParamFault;
use crate::engine::instance::InstanceId;
use crate::miner::MinerError;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Caller-visible lifecycle failures.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested miner type is not in the catalog.
    #[error("unknown miner type: {0}")]
    UnknownMinerType(String),

    /// The supplied configuration is missing required parameters or failed
    /// type coercion. Lists every offending parameter.
    #[error("invalid configuration: {}", format_faults(.0))]
    InvalidConfiguration(Vec<ParamFault>),

    /// The miner factory or `configure` failed; nothing was registered.
    #[error("miner construction failed: {0}")]
    ConstructionFailed(#[source] MinerError),

    /// No instance with the given identifier.
    #[error("instance not found: {0}")]
    InstanceNotFound(InstanceId),

    /// The miner refused to start; the instance stays registered, not running.
    #[error("failed to start instance {id}: {source}")]
    StartFailed {
        id: InstanceId,
        #[source]
        source: MinerError,
    },

    /// The miner refused to stop; the instance stays registered.
    #[error("failed to stop instance {id}: {source}")]
    StopFailed {
        id: InstanceId,
        #[source]
        source: MinerError,
    },
}

fn format_faults(faults: &[ParamFault]) -> String {
    faults
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Stable machine-readable outcome code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownMinerType(_) => "unknown_miner_type",
            Self::InvalidConfiguration(_) => "invalid_configuration",
            Self::ConstructionFailed(_) => "miner_construction_failed",
            Self::InstanceNotFound(_) => "instance_not_found",
            Self::StartFailed { .. } => "miner_start_failed",
            Self::StopFailed { .. } => "miner_stop_failed",
        }
    }

    /// HTTP status code for the API layer.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::UnknownMinerType(_) | Self::InstanceNotFound(_) => 404,
            Self::InvalidConfiguration(_) => 422,
            Self::ConstructionFailed(_) | Self::StartFailed { .. } | Self::StopFailed { .. } => 500,
        }
    }
}
