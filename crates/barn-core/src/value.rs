// ABOUTME: Defines the tagged Value held under each key and its type tag.
// ABOUTME: A key holds exactly one of string, list, or set; the tag is fixed until deletion.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

/// The type tag of a stored value. Used to report mismatched access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    List,
    Set,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::String => write!(f, "string"),
            ValueKind::List => write!(f, "list"),
            ValueKind::Set => write!(f, "set"),
        }
    }
}

/// A tagged value. Serialized as `{"type": "...", "val": ...}` inside snapshot entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "val", rename_all = "lowercase")]
pub enum Value {
    String(String),
    List(VecDeque<String>),
    Set(BTreeSet<String>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::String(_) => ValueKind::String,
            Value::List(_) => ValueKind::List,
            Value::Set(_) => ValueKind::Set,
        }
    }
}
