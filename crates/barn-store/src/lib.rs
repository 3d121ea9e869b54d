// ABOUTME: Persistence layer for barn, layering an append-only log over flat key-value storage.
// ABOUTME: Provides storage backends, namespacing, log replay, the log engine, and compaction.

pub mod backend;
pub mod compaction;
pub mod config;
pub mod engine;
pub mod error;
pub mod file;
pub mod logkey;
pub mod namespace;
pub mod recovery;

pub use backend::{BackendError, MemoryBackend, StorageBackend};
pub use config::{ConfigError, DEFAULT_MAX_ENTRIES_PER_GENERATION, StoreConfig};
pub use engine::LogEngine;
pub use error::StoreError;
pub use file::FileBackend;
pub use logkey::{KEYSET, LogKey};
pub use namespace::Namespaced;
pub use recovery::{Replayed, replay};
