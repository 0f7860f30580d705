//! Borrowed key/value attributes attached to a record
//!
//! Attribute storage belongs to the caller. A record only holds a reference to an
//! [`AttributePack`], a sequence of attribute lists searched in order.

use serde::Serialize;
use std::fmt;

/// Value type for structured attributes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(&'a str),
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::UInt(u) => write!(f, "{}", u),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value<'_> {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value<'_> {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u64> for Value<'_> {
    fn from(u: u64) -> Self {
        Value::UInt(u)
    }
}

impl From<f64> for Value<'_> {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// A single named attribute.
pub type Attribute<'a> = (&'a str, Value<'a>);

/// Contiguous list of attributes, usually one per scope (call site, thread, logger).
pub type AttributeList<'a> = [Attribute<'a>];

/// Ordered lists of attributes visible to one record. Earlier lists shadow later ones.
pub type AttributePack<'a> = [&'a AttributeList<'a>];

/// Pack with no attributes at all.
pub const EMPTY_PACK: &AttributePack<'static> = &[];

/// Finds the first attribute named `name` in `pack`.
pub fn lookup<'a>(pack: &'a AttributePack<'a>, name: &str) -> Option<&'a Value<'a>> {
    pack.iter()
        .flat_map(|list| list.iter())
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}
