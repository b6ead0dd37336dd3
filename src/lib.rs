// =============================================================================
// Lint Configuration
// =============================================================================

// Safety: no unsafe anywhere in this crate
#![deny(unsafe_code)]
// Correctness: must handle all fallible operations
#![deny(unused_must_use)]
// Quality: pedantic but pragmatic
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
// Allowed with documented reasons
#![allow(clippy::missing_errors_doc)] // Error returns self-documenting via type
#![allow(clippy::module_name_repetitions)] // e.g., miner::MinerView is clearer
#![allow(clippy::must_use_candidate)] // Not all returned values need annotation

//! Library crate for lode - a runtime manager for pluggable stream-mining
//! algorithms ("miners").
//!
//! A miner consumes an event stream and continuously maintains some analysis
//! result that callers can pull as one or more views. lode turns a registered
//! miner type plus a caller-supplied configuration into a live, independently
//! controllable instance, tracks its running state, and mediates concurrent
//! access to it over an HTTP control plane.
//!
//! # Modules
//!
//! - [`miner`] - the [`miner::Miner`] capability trait, parameter and view
//!   types, the type catalog, and the built-in miners
//! - [`engine`] - the instance registry and lifecycle controller (create /
//!   start / stop / status / views / delete)
//! - [`server`] - axum HTTP surface mapping the engine onto `/api/v1` routes
//! - [`config`] - server configuration loaded from `lode.toml`
//! - [`logging`] - tracing subscriber setup
//!
//! # Example
//!
//! ```
//! use lode::engine::{Engine, InstanceConfig};
//! use lode::miner::builtin;
//!
//! let engine = Engine::new(builtin::catalog());
//! let config = InstanceConfig::new("sensor-events")
//!     .with_param("interval_ms", serde_json::json!(50));
//!
//! let id = engine.create(builtin::tick::TYPE_ID, config).unwrap();
//! assert!(!engine.status(&id).unwrap());
//! engine.delete(&id).unwrap();
//! ```

pub mod config;
pub mod engine;
pub mod logging;
pub mod miner;
pub mod server;
