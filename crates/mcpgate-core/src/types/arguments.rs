//! Typed access to tool call arguments.
//!
//! Arguments arrive as a JSON object. [`Arguments`] keeps the raw map and
//! offers typed accessors that keep "missing" and "wrong type" apart:
//!
//! ```rust
//! use mcpgate_core::error::McpError;
//! use mcpgate_core::types::Arguments;
//! use serde_json::json;
//!
//! let args = Arguments::try_from(json!({"name": "World", "count": "3"})).unwrap();
//!
//! let name: String = args.require("name").unwrap();
//! assert_eq!(name, "World");
//!
//! let err = args.require::<i64>("count").unwrap_err();
//! assert!(matches!(err, McpError::ArgumentType { .. }));
//!
//! let err = args.require::<bool>("loud").unwrap_err();
//! assert!(matches!(err, McpError::MissingArgument { .. }));
//!
//! assert_eq!(args.optional::<i64>("count"), None);
//! assert_eq!(args.require_or("loud", false).unwrap(), false);
//! ```

use crate::error::McpError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of a JSON value's runtime type, as used in error messages.
#[must_use]
pub const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A type that can be extracted from a single argument value.
///
/// Implemented for the closed set of types an argument can hold.
pub trait ArgumentType: Sized {
    /// Name used in type mismatch errors.
    const TYPE_NAME: &'static str;

    /// Extract the value, or `None` if the runtime type does not match.
    fn from_argument(value: &Value) -> Option<Self>;
}

impl ArgumentType for String {
    const TYPE_NAME: &'static str = "string";

    fn from_argument(value: &Value) -> Option<Self> {
        value.as_str().map(ToString::to_string)
    }
}

impl ArgumentType for i64 {
    const TYPE_NAME: &'static str = "integer";

    fn from_argument(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl ArgumentType for u64 {
    const TYPE_NAME: &'static str = "unsigned integer";

    fn from_argument(value: &Value) -> Option<Self> {
        value.as_u64()
    }
}

impl ArgumentType for f64 {
    const TYPE_NAME: &'static str = "number";

    fn from_argument(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl ArgumentType for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn from_argument(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl ArgumentType for Vec<Value> {
    const TYPE_NAME: &'static str = "array";

    fn from_argument(value: &Value) -> Option<Self> {
        value.as_array().cloned()
    }
}

impl ArgumentType for Map<String, Value> {
    const TYPE_NAME: &'static str = "object";

    fn from_argument(value: &Value) -> Option<Self> {
        value.as_object().cloned()
    }
}

impl ArgumentType for Value {
    const TYPE_NAME: &'static str = "any";

    fn from_argument(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

/// Read-only view of a call's arguments.
///
/// A key holding JSON `null` is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    /// Wrap an argument map.
    #[must_use]
    pub const fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Get a raw argument value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    /// Check whether an argument is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Get the number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Take the underlying map.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Get a required argument.
    ///
    /// Fails with [`McpError::MissingArgument`] when absent and
    /// [`McpError::ArgumentType`] when the stored type does not match.
    pub fn require<T: ArgumentType>(&self, name: &str) -> Result<T, McpError> {
        let value = self
            .get(name)
            .ok_or_else(|| McpError::missing_argument(name))?;
        Self::extract(name, value)
    }

    /// Get an argument, falling back to `default` when absent.
    ///
    /// A present value of the wrong type is still an error.
    pub fn require_or<T: ArgumentType>(&self, name: &str, default: T) -> Result<T, McpError> {
        match self.get(name) {
            Some(value) => Self::extract(name, value),
            None => Ok(default),
        }
    }

    /// Get an optional argument.
    ///
    /// Returns `None` when absent or when the stored type does not match.
    #[must_use]
    pub fn optional<T: ArgumentType>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(T::from_argument)
    }

    /// Deserialize all arguments into a typed struct.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T, McpError> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|e| McpError::handler_with_source(format!("Invalid arguments: {e}"), e))
    }

    fn extract<T: ArgumentType>(name: &str, value: &Value) -> Result<T, McpError> {
        T::from_argument(value)
            .ok_or_else(|| McpError::argument_type(name, T::TYPE_NAME, json_type_name(value)))
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Arguments {
    type Error = McpError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(McpError::argument_type(
                "arguments",
                "object",
                json_type_name(&other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Arguments {
        Arguments::try_from(value).unwrap()
    }

    #[test]
    fn test_require_each_type() {
        let a = args(json!({
            "s": "x", "i": -3, "u": 7, "f": 1.5, "b": true,
            "arr": [1, 2], "obj": {"k": "v"}
        }));
        assert_eq!(a.require::<String>("s").unwrap(), "x");
        assert_eq!(a.require::<i64>("i").unwrap(), -3);
        assert_eq!(a.require::<u64>("u").unwrap(), 7);
        assert!((a.require::<f64>("f").unwrap() - 1.5).abs() < f64::EPSILON);
        assert!(a.require::<bool>("b").unwrap());
        assert_eq!(a.require::<Vec<Value>>("arr").unwrap().len(), 2);
        assert_eq!(a.require::<Map<String, Value>>("obj").unwrap()["k"], "v");
        assert_eq!(a.require::<Value>("obj").unwrap(), json!({"k": "v"}));
    }

    #[test]
    fn test_missing_vs_mismatch() {
        let a = args(json!({"count": "three"}));

        match a.require::<i64>("count").unwrap_err() {
            McpError::ArgumentType {
                name,
                expected,
                actual,
            } => {
                assert_eq!(name, "count");
                assert_eq!(expected, "integer");
                assert_eq!(actual, "string");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(
            a.require::<i64>("limit").unwrap_err(),
            McpError::MissingArgument { .. }
        ));
    }

    #[test]
    fn test_null_is_absent() {
        let a = args(json!({"name": null}));
        assert!(!a.contains("name"));
        assert!(matches!(
            a.require::<String>("name").unwrap_err(),
            McpError::MissingArgument { .. }
        ));
        assert_eq!(a.require_or("name", "anon".to_string()).unwrap(), "anon");
    }

    #[test]
    fn test_require_or() {
        let a = args(json!({"loud": "yes"}));
        assert_eq!(a.require_or("count", 5i64).unwrap(), 5);
        assert!(a.require_or("loud", false).is_err());
    }

    #[test]
    fn test_optional_swallows_mismatch() {
        let a = args(json!({"n": "x", "m": 2}));
        assert_eq!(a.optional::<i64>("n"), None);
        assert_eq!(a.optional::<i64>("m"), Some(2));
        assert_eq!(a.optional::<i64>("missing"), None);
    }

    #[test]
    fn test_non_object_arguments_are_rejected() {
        assert!(Arguments::try_from(json!([1])).is_err());
        assert!(Arguments::try_from(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_parse_struct() {
        #[derive(serde::Deserialize)]
        struct Greet {
            name: String,
        }

        let greet: Greet = args(json!({"name": "Ada"})).parse().unwrap();
        assert_eq!(greet.name, "Ada");
        assert!(args(json!({})).parse::<Greet>().is_err());
    }
}
