// ABOUTME: Error type for the log engine, replay, and compaction.
// ABOUTME: Wraps command failures and backend failures without masking or retrying either.

use barn_core::{CommandError, EntryError};
use thiserror::Error;

use crate::backend::BackendError;

/// Errors that can occur while opening, executing against, or compacting a store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("log entry {key} names unknown command {name}")]
    UnknownCommand { key: String, name: String },

    #[error("failed to decode log entry {key}: {source}")]
    Decode {
        key: String,
        source: EntryError,
    },

    #[error("failed to encode log entry: {0}")]
    Encode(EntryError),

    #[error("KEYSET holds an invalid generation: {0:?}")]
    CorruptGeneration(String),
}

impl StoreError {
    /// Classify a decode failure of the entry stored at `key`.
    pub(crate) fn decode(key: String, source: EntryError) -> Self {
        match source {
            EntryError::UnknownCommand(name) => StoreError::UnknownCommand { key, name },
            source => StoreError::Decode { key, source },
        }
    }

    /// Whether this is a type mismatch raised by the command itself.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, StoreError::Command(CommandError::TypeMismatch { .. }))
    }
}
