// ABOUTME: Clap command tree for the barn binary: one subcommand per store command plus condense.
// ABOUTME: Subcommands convert into the library's Command type; condense is handled separately.

use barn::Command;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "barn", version, about = "Typed data-structure store over a JSON file")]
pub struct Cli {
    #[command(subcommand)]
    pub action: Action,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
#[command(rename_all = "lower")]
pub enum Action {
    /// Get the value of a string key
    Get { key: String },
    /// Set a string key
    Set { key: String, value: String },
    /// Delete a key of any type
    Del { key: String },
    /// Push a value onto the head of a list
    Lpush { key: String, value: String },
    /// Pop a value from the head of a list
    Lpop { key: String },
    /// Push a value onto the tail of a list
    Rpush { key: String, value: String },
    /// Pop a value from the tail of a list
    Rpop { key: String },
    /// Length of a list
    Llen { key: String },
    /// Elements of a list between two inclusive indices (-1 is the last)
    Lrange {
        key: String,
        #[arg(allow_negative_numbers = true)]
        start: i64,
        #[arg(allow_negative_numbers = true)]
        end: i64,
    },
    /// Add a member to a set
    Sadd { key: String, member: String },
    /// Remove a member from a set
    Srem { key: String, member: String },
    /// All members of a set
    Smembers { key: String },
    /// Whether a member is in a set
    Sismember { key: String, member: String },
    /// Collapse the log into a single snapshot
    Condense,
}

impl Action {
    /// The store command to execute, or `None` for `condense`.
    pub fn into_command(self) -> Option<Command> {
        let cmd = match self {
            Action::Get { key } => Command::Get { key },
            Action::Set { key, value } => Command::Set { key, value },
            Action::Del { key } => Command::Del { key },
            Action::Lpush { key, value } => Command::LPush { key, value },
            Action::Lpop { key } => Command::LPop { key },
            Action::Rpush { key, value } => Command::RPush { key, value },
            Action::Rpop { key } => Command::RPop { key },
            Action::Llen { key } => Command::LLen { key },
            Action::Lrange { key, start, end } => Command::LRange { key, start, end },
            Action::Sadd { key, member } => Command::SAdd { key, member },
            Action::Srem { key, member } => Command::SRem { key, member },
            Action::Smembers { key } => Command::SMembers { key },
            Action::Sismember { key, member } => Command::SIsMember { key, member },
            Action::Condense => return None,
        };
        Some(cmd)
    }
}
