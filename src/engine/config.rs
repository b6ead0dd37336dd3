//! Instance configuration and its validation against a descriptor's
//! declared parameters.
//!
//! Validation happens before any miner is constructed: every required
//! parameter must be present and every supplied value must coerce to its
//! declared type. There are no silent defaults; all offending parameters are
//! reported together.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::miner::{ParamKind, ParamSpec, ParamValue, ParamValues};

/// Caller-supplied configuration for one instance: the input stream
/// identifier plus raw parameter values. Copied into the instance at
/// creation and never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceConfig {
    /// Identifier of the input event stream the miner attaches to.
    pub stream: String,
    /// Raw parameter values keyed by name.
    #[serde(default)]
    pub params: BTreeMap<String, serde_json::Value>,
}

impl InstanceConfig {
    pub fn new(stream: impl Into<String>) -> Self {
        Self {
            stream: stream.into(),
            params: BTreeMap::new(),
        }
    }

    /// Builder-style parameter setter, mostly for tests and examples.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// Validate against the declared parameters, producing typed values.
    ///
    /// Parameters not declared by the descriptor are ignored. Returns every
    /// fault at once rather than stopping at the first.
    pub(crate) fn validate(&self, specs: &[ParamSpec]) -> Result<ParamValues, Vec<ParamFault>> {
        let mut values = ParamValues::new();
        let mut faults = Vec::new();

        for spec in specs {
            match self.params.get(&spec.name) {
                None if spec.required => faults.push(ParamFault::missing(&spec.name)),
                None => {},
                Some(raw) => match coerce(raw, spec.kind) {
                    Some(value) => {
                        values.insert(spec.name.clone(), value);
                    },
                    None => faults.push(ParamFault::mismatch(&spec.name, spec.kind)),
                },
            }
        }

        if faults.is_empty() { Ok(values) } else { Err(faults) }
    }
}

/// Coerce a raw JSON value to a declared parameter type.
///
/// Accepts the native JSON type, or a string that parses to the target for
/// integer/float/boolean; anything else is a mismatch.
fn coerce(raw: &serde_json::Value, kind: ParamKind) -> Option<ParamValue> {
    use serde_json::Value;

    match kind {
        ParamKind::String => match raw {
            Value::String(s) => Some(ParamValue::String(s.clone())),
            _ => None,
        },
        ParamKind::Integer => match raw {
            Value::Number(n) => n.as_i64().map(ParamValue::Integer),
            Value::String(s) => s.trim().parse::<i64>().ok().map(ParamValue::Integer),
            _ => None,
        },
        ParamKind::Float => match raw {
            Value::Number(n) => n.as_f64().map(ParamValue::Float),
            Value::String(s) => s.trim().parse::<f64>().ok().map(ParamValue::Float),
            _ => None,
        },
        ParamKind::Boolean => match raw {
            Value::Bool(b) => Some(ParamValue::Boolean(*b)),
            Value::String(s) => match s.trim() {
                "true" => Some(ParamValue::Boolean(true)),
                "false" => Some(ParamValue::Boolean(false)),
                _ => None,
            },
            _ => None,
        },
    }
}

/// One offending parameter in a rejected configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamFault {
    /// Parameter name as declared by the descriptor.
    pub name: String,
    /// Why the parameter was rejected.
    pub reason: FaultReason,
}

/// Why a parameter was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultReason {
    /// Required but absent from the configuration.
    Missing,
    /// Present but not coercible to the declared type.
    TypeMismatch { expected: ParamKind },
}

impl ParamFault {
    pub(crate) fn missing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: FaultReason::Missing,
        }
    }

    pub(crate) fn mismatch(name: impl Into<String>, expected: ParamKind) -> Self {
        Self {
            name: name.into(),
            reason: FaultReason::TypeMismatch { expected },
        }
    }
}

impl fmt::Display for ParamFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            FaultReason::Missing => write!(f, "{}: required parameter missing", self.name),
            FaultReason::TypeMismatch { expected } => {
                write!(f, "{}: expected {}", self.name, expected.as_str())
            },
        }
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    proptest! {
        /// Any i64 coerces as a native JSON number and as its decimal string.
        #[test]
        fn integer_coercion_accepts_i64(n in any::<i64>()) {
            prop_assert_eq!(
                coerce(&json!(n), ParamKind::Integer),
                Some(ParamValue::Integer(n))
            );
            prop_assert_eq!(
                coerce(&json!(n.to_string()), ParamKind::Integer),
                Some(ParamValue::Integer(n))
            );
        }

        /// Alphabetic strings never coerce to integers.
        #[test]
        fn integer_coercion_rejects_text(s in "[a-zA-Z]{1,12}") {
            prop_assert_eq!(coerce(&json!(s), ParamKind::Integer), None);
        }

        /// Finite floats coerce as native JSON numbers.
        #[test]
        fn float_coercion_accepts_finite(x in prop::num::f64::NORMAL) {
            let coerced = coerce(&json!(x), ParamKind::Float);
            prop_assert!(matches!(coerced, Some(ParamValue::Float(v)) if (v - x).abs() < f64::EPSILON));
        }

        /// Booleans only coerce from true/false, never from arbitrary text.
        #[test]
        fn boolean_coercion_is_strict(s in "[a-z]{1,8}") {
            let coerced = coerce(&json!(s), ParamKind::Boolean);
            match s.as_str() {
                "true" => prop_assert_eq!(coerced, Some(ParamValue::Boolean(true))),
                "false" => prop_assert_eq!(coerced, Some(ParamValue::Boolean(false))),
                _ => prop_assert_eq!(coerced, None),
            }
        }

        /// Validation never panics on arbitrary stream names and values.
        #[test]
        fn validate_total_on_arbitrary_strings(stream in ".*", value in ".*") {
            let specs = vec![ParamSpec::required("p", ParamKind::Integer)];
            let config = InstanceConfig::new(stream).with_param("p", json!(value));
            let _ = config.validate(&specs);
        }
    }
}
