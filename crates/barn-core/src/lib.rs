// ABOUTME: Core library for barn, containing typed values, commands, and the log entry codec.
// ABOUTME: Pure data structures with no I/O; the store crate layers persistence on top.

pub mod command;
pub mod entry;
pub mod keyspace;
pub mod value;

pub use command::{Command, CommandError, Reply};
pub use entry::{Entry, EntryError, Snapshot};
pub use keyspace::Keyspace;
pub use value::{Value, ValueKind};
