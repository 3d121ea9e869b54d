// ABOUTME: Defines the closed Command set that callers may issue, its replies, and command errors.
// ABOUTME: Each command knows its wire name and whether it mutates state (and so must be logged).

use std::fmt;

use thiserror::Error;

use crate::value::ValueKind;

/// Errors raised while applying a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("expected key {key} to be of type {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },
}

impl CommandError {
    pub fn type_mismatch(key: &str, expected: ValueKind, found: ValueKind) -> Self {
        CommandError::TypeMismatch {
            key: key.to_string(),
            expected,
            found,
        }
    }
}

/// A request against the keyspace. The internal snapshot load is deliberately
/// not a `Command`: it only exists as a decoded log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Get { key: String },
    Set { key: String, value: String },
    Del { key: String },
    LPush { key: String, value: String },
    LPop { key: String },
    RPush { key: String, value: String },
    RPop { key: String },
    LLen { key: String },
    LRange { key: String, start: i64, end: i64 },
    SAdd { key: String, member: String },
    SRem { key: String, member: String },
    SMembers { key: String },
    SIsMember { key: String, member: String },
}

impl Command {
    /// The wire name of this command, as written into log entries.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Get { .. } => "GET",
            Command::Set { .. } => "SET",
            Command::Del { .. } => "DEL",
            Command::LPush { .. } => "LPUSH",
            Command::LPop { .. } => "LPOP",
            Command::RPush { .. } => "RPUSH",
            Command::RPop { .. } => "RPOP",
            Command::LLen { .. } => "LLEN",
            Command::LRange { .. } => "LRANGE",
            Command::SAdd { .. } => "SADD",
            Command::SRem { .. } => "SREM",
            Command::SMembers { .. } => "SMEMBERS",
            Command::SIsMember { .. } => "SISMEMBER",
        }
    }

    /// Whether a successful application changes state and must be appended to the log.
    pub fn is_mutating(&self) -> bool {
        match self {
            Command::Set { .. }
            | Command::Del { .. }
            | Command::LPush { .. }
            | Command::LPop { .. }
            | Command::RPush { .. }
            | Command::RPop { .. }
            | Command::SAdd { .. }
            | Command::SRem { .. } => true,
            Command::Get { .. }
            | Command::LLen { .. }
            | Command::LRange { .. }
            | Command::SMembers { .. }
            | Command::SIsMember { .. } => false,
        }
    }

    /// The key this command addresses.
    pub fn key(&self) -> &str {
        match self {
            Command::Get { key }
            | Command::Set { key, .. }
            | Command::Del { key }
            | Command::LPush { key, .. }
            | Command::LPop { key }
            | Command::RPush { key, .. }
            | Command::RPop { key }
            | Command::LLen { key }
            | Command::LRange { key, .. }
            | Command::SAdd { key, .. }
            | Command::SRem { key, .. }
            | Command::SMembers { key }
            | Command::SIsMember { key, .. } => key,
        }
    }
}

/// The result of applying a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The command has no return value (SET).
    Unit,
    /// The addressed key does not exist, or a pop found nothing.
    Nil,
    Integer(u64),
    Text(String),
    Members(Vec<String>),
    Bool(bool),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Unit => write!(f, "OK"),
            Reply::Nil => write!(f, "(nil)"),
            Reply::Integer(n) => write!(f, "(integer) {}", n),
            Reply::Text(s) => write!(f, "{:?}", s),
            Reply::Bool(b) => write!(f, "{}", b),
            Reply::Members(items) if items.is_empty() => write!(f, "(empty)"),
            Reply::Members(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {:?}", i + 1, item)?;
                }
                Ok(())
            }
        }
    }
}
