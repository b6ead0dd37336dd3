//! The instance lifecycle core: registry plus controller.
//!
//! This is where the state machine and the concurrency discipline live.
//! Everything else - how a miner computes, how views are rendered, how the
//! HTTP layer shapes responses - is a collaborator of this module.

mod config;
mod controller;
mod error;
mod instance;
mod registry;

pub use config::{FaultReason, InstanceConfig, ParamFault};
pub use controller::Engine;
pub use error::{Error, Result};
pub use instance::{InstanceId, MinerInstance};
pub use registry::InstanceRegistry;
