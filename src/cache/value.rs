//! Tagged Value Module
//!
//! A value type for caches that must hold mixed payloads. Typed getters on
//! `Cache<Value>` return `None` on a variant mismatch instead of failing.

use serde::{Deserialize, Serialize};

use crate::cache::Cache;

// == Value ==
/// A heterogeneous cache payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Floating point number
    Float(f64),
    /// Signed integer
    Int(i64),
    /// UTF-8 string
    Str(String),
}

impl Value {
    // == Projections ==
    /// Returns the bytes if this is a `Bytes` value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the number if this is a `Float` value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the number if this is an `Int` value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the string if this is a `Str` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

// == Typed Accessors ==
/// Each getter counts as a read of the entry even when the variant does not
/// match, since the lookup itself succeeded.
impl Cache<Value> {
    // == Get Bytes ==
    /// Reads `key` as bytes; `None` when absent or not `Bytes`.
    pub fn get_bytes(&self, key: &str) -> Option<Vec<u8>> {
        match self.get(key)? {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    // == Get Float ==
    /// Reads `key` as a float; `None` when absent or not `Float`.
    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.get(key)?.as_float()
    }

    // == Get Int ==
    /// Reads `key` as an integer; `None` when absent or not `Int`.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key)?.as_int()
    }

    // == Get String ==
    /// Reads `key` as a string; `None` when absent or not `Str`.
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}
