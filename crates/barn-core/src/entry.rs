// ABOUTME: Log entry type and its self-describing JSON text codec.
// ABOUTME: Entries are written as {"cmd": NAME, "args": [...]} and decoded by an explicit match on NAME.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::command::Command;
use crate::value::Value;

/// Wire name of the synthetic snapshot entry written by compaction.
pub const LOAD: &str = "_LOAD";

/// The full keyspace as carried by a snapshot entry.
pub type Snapshot = BTreeMap<String, Value>;

/// Errors that can occur while encoding or decoding a log entry.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown command in log entry: {0}")]
    UnknownCommand(String),
}

/// One logged mutation. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Command(Command),
    /// Replaces the whole keyspace. Only produced by compaction.
    Load(Snapshot),
}

#[derive(Serialize, Deserialize)]
struct WireEntry {
    cmd: String,
    args: serde_json::Value,
}

impl Entry {
    pub fn name(&self) -> &'static str {
        match self {
            Entry::Command(cmd) => cmd.name(),
            Entry::Load(_) => LOAD,
        }
    }

    /// Serialize to a single line of JSON text.
    pub fn encode(&self) -> Result<String, EntryError> {
        let args = match self {
            Entry::Load(snapshot) => {
                serde_json::Value::Array(vec![serde_json::to_value(snapshot)?])
            }
            Entry::Command(cmd) => match cmd {
                Command::Get { key }
                | Command::Del { key }
                | Command::LPop { key }
                | Command::RPop { key }
                | Command::LLen { key }
                | Command::SMembers { key } => json!([key]),
                Command::Set { key, value }
                | Command::LPush { key, value }
                | Command::RPush { key, value } => json!([key, value]),
                Command::SAdd { key, member }
                | Command::SRem { key, member }
                | Command::SIsMember { key, member } => json!([key, member]),
                Command::LRange { key, start, end } => json!([key, start, end]),
            },
        };
        let wire = WireEntry {
            cmd: self.name().to_string(),
            args,
        };
        Ok(serde_json::to_string(&wire)?)
    }

    /// Parse an entry previously produced by [`Entry::encode`].
    pub fn decode(text: &str) -> Result<Entry, EntryError> {
        let WireEntry { cmd, args } = serde_json::from_str(text)?;

        let entry = match cmd.as_str() {
            LOAD => {
                let (snapshot,): (Snapshot,) = serde_json::from_value(args)?;
                Entry::Load(snapshot)
            }
            "GET" => {
                let (key,) = serde_json::from_value(args)?;
                Entry::Command(Command::Get { key })
            }
            "SET" => {
                let (key, value) = serde_json::from_value(args)?;
                Entry::Command(Command::Set { key, value })
            }
            "DEL" => {
                let (key,) = serde_json::from_value(args)?;
                Entry::Command(Command::Del { key })
            }
            "LPUSH" => {
                let (key, value) = serde_json::from_value(args)?;
                Entry::Command(Command::LPush { key, value })
            }
            "LPOP" => {
                let (key,) = serde_json::from_value(args)?;
                Entry::Command(Command::LPop { key })
            }
            "RPUSH" => {
                let (key, value) = serde_json::from_value(args)?;
                Entry::Command(Command::RPush { key, value })
            }
            "RPOP" => {
                let (key,) = serde_json::from_value(args)?;
                Entry::Command(Command::RPop { key })
            }
            "LLEN" => {
                let (key,) = serde_json::from_value(args)?;
                Entry::Command(Command::LLen { key })
            }
            "LRANGE" => {
                let (key, start, end) = serde_json::from_value(args)?;
                Entry::Command(Command::LRange { key, start, end })
            }
            "SADD" => {
                let (key, member) = serde_json::from_value(args)?;
                Entry::Command(Command::SAdd { key, member })
            }
            "SREM" => {
                let (key, member) = serde_json::from_value(args)?;
                Entry::Command(Command::SRem { key, member })
            }
            "SMEMBERS" => {
                let (key,) = serde_json::from_value(args)?;
                Entry::Command(Command::SMembers { key })
            }
            "SISMEMBER" => {
                let (key, member) = serde_json::from_value(args)?;
                Entry::Command(Command::SIsMember { key, member })
            }
            _ => return Err(EntryError::UnknownCommand(cmd)),
        };

        Ok(entry)
    }
}

impl From<Command> for Entry {
    fn from(cmd: Command) -> Self {
        Entry::Command(cmd)
    }
}
