//! The miner capability: the polymorphic contract every mining algorithm
//! implements, plus the parameter and view vocabulary shared between miners,
//! the engine, and the HTTP surface.
//!
//! A miner is attached to exactly one input stream, configured once before
//! registration, and then driven through `start`/`stop`. While the engine
//! serializes registry access, it deliberately adds no per-instance lock:
//! `start`, `stop`, `is_running`, and `views` take `&self` and each miner
//! carries its own interior synchronization for whatever threads or timers
//! it owns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

mod catalog;

pub mod builtin;

pub use catalog::{MinerCatalog, MinerDescriptor, MinerFactory};

/// Miner-level failure, produced by a concrete miner implementation.
///
/// The engine wraps these into its own taxonomy; the variants here describe
/// what went wrong inside the algorithm, not which lifecycle operation the
/// caller attempted.
#[derive(Debug, thiserror::Error)]
pub enum MinerError {
    /// A parameter value passed type coercion but was rejected by the miner
    /// (out of range, semantically invalid).
    #[error("configuration rejected: {0}")]
    Configuration(String),

    /// `start` was called while the miner is already running.
    #[error("miner is already running")]
    AlreadyRunning,

    /// The input stream could not be attached or read.
    #[error("stream error: {0}")]
    Stream(String),

    /// Anything else the miner wants to surface.
    #[error("{0}")]
    Internal(String),
}

/// Declared type of a miner parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Integer,
    Float,
    Boolean,
}

impl ParamKind {
    /// Name used in error messages and the catalog listing.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
        }
    }
}

/// A parameter a miner type declares it accepts.
///
/// Required parameters must be present and type-valid before the miner is
/// constructed; optional ones are coerced only when supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name as it appears in instance configurations.
    pub name: String,
    /// Declared value type.
    pub kind: ParamKind,
    /// Whether creation fails when the parameter is absent.
    pub required: bool,
}

impl ParamSpec {
    /// A parameter that must be present in every instance configuration.
    pub fn required(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
        }
    }

    /// A parameter that may be omitted.
    pub fn optional(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
        }
    }
}

/// A coerced, type-checked parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl ParamValue {
    /// Integer value, if this is an integer parameter.
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// String value, if this is a string parameter.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Boolean value, if this is a boolean parameter.
    pub const fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Float value; integer parameters widen.
    #[allow(clippy::cast_precision_loss)] // Widening for display/ratio use only
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }
}

/// Validated parameter values keyed by name, as handed to `Miner::configure`.
pub type ParamValues = BTreeMap<String, ParamValue>;

/// Per-query view parameter overrides, passed through to the miner verbatim.
pub type ViewOverrides = BTreeMap<String, serde_json::Value>;

/// Rendering hint for a computed view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    /// Unstructured payload, rendered as-is.
    Raw,
    /// Tabular data: rows of named fields.
    Table,
    /// Node/edge structure.
    Graph,
}

/// A single computed result pulled from a miner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinerView {
    /// View name, unique within one miner's output.
    pub name: String,
    /// Rendering hint.
    pub kind: ViewKind,
    /// The computed content.
    pub payload: serde_json::Value,
}

impl MinerView {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, kind: ViewKind, payload: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            kind,
            payload,
        }
    }
}

/// The capability every miner type implements.
///
/// Construction protocol: the engine obtains a fresh, unconfigured miner from
/// the descriptor's factory, calls [`set_stream`](Miner::set_stream) and then
/// [`configure`](Miner::configure) exactly once while it still holds the
/// miner exclusively, and only registers the instance when both succeed.
/// After registration only the `&self` methods are called, possibly from
/// several request handlers at once.
///
/// `stop` on a miner that is not running must be a no-op success. `start` on
/// a running miner is miner-defined; the engine does not special-case it.
pub trait Miner: Send + Sync {
    /// Attach the input stream identifier. Called before `configure`.
    fn set_stream(&mut self, stream: &str);

    /// Apply validated parameter values. A rejection here aborts creation;
    /// the miner is dropped without ever being registered.
    fn configure(&mut self, params: &ParamValues) -> Result<(), MinerError>;

    /// Begin consuming the stream and maintaining results.
    fn start(&self) -> Result<(), MinerError>;

    /// Stop consuming and release threads/timers. No-op when not running.
    fn stop(&self) -> Result<(), MinerError>;

    /// Whether the miner is currently running.
    fn is_running(&self) -> bool;

    /// Compute the current views, honoring any per-query overrides.
    ///
    /// Must be callable in any state; a miner that has never been started
    /// returns its deterministic empty/initial output.
    fn views(&self, overrides: &ViewOverrides) -> Vec<MinerView>;
}
