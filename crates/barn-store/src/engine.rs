// ABOUTME: The log engine: replays on open, applies commands, appends mutating ones to the log.
// ABOUTME: Triggers compaction once the write cursor passes the configured entries-per-generation limit.

use barn_core::{Command, Entry, Keyspace, Reply};

use crate::backend::StorageBackend;
use crate::compaction::{collect_garbage, publish_generation, write_snapshot};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::logkey::LogKey;
use crate::recovery::{Replayed, replay};

/// Owns the keyspace and the write cursor for one store over one backend.
///
/// Only one engine should issue mutating commands against a given backend
/// (and namespace) at a time; nothing guards against interleaved writers.
#[derive(Debug)]
pub struct LogEngine<B: StorageBackend> {
    backend: B,
    config: StoreConfig,
    keyspace: Keyspace,
    generation: u64,
    index: u64,
}

impl<B: StorageBackend> LogEngine<B> {
    /// Open a store, rebuilding its keyspace by replaying the active generation.
    pub fn open(backend: B, config: StoreConfig) -> Result<Self, StoreError> {
        let Replayed {
            keyspace,
            generation,
            index,
        } = replay(&backend)?;

        Ok(Self {
            backend,
            config,
            keyspace,
            generation,
            index,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Read-only view of the current keyspace.
    pub fn keyspace(&self) -> &Keyspace {
        &self.keyspace
    }

    /// The active generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Entries written in the active generation; the next entry's index.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Execute a command. The command is applied first, so one that fails
    /// (a type mismatch) is never logged. A mutating command is then appended
    /// to the log, and compaction runs before returning if the cursor has
    /// passed `max_entries_per_generation`.
    pub fn execute(&mut self, cmd: Command) -> Result<Reply, StoreError> {
        if !cmd.is_mutating() {
            return Ok(self.keyspace.apply(&cmd)?);
        }

        let prior = self.keyspace.value(cmd.key()).cloned();
        let reply = self.keyspace.apply(&cmd)?;

        let key = cmd.key().to_string();
        if let Err(e) = self.append(Entry::Command(cmd)) {
            // Memory must not run ahead of the log.
            self.keyspace.restore(&key, prior);
            return Err(e);
        }

        if self.index > self.config.max_entries_per_generation as u64 {
            tracing::info!(
                "generation {} reached {} entries, compacting",
                self.generation,
                self.index
            );
            self.condense()?;
        }

        Ok(reply)
    }

    fn append(&mut self, entry: Entry) -> Result<(), StoreError> {
        let text = entry.encode().map_err(StoreError::Encode)?;
        let key = LogKey::new(self.generation, self.index);
        self.backend.set(&key.to_string(), &text)?;
        self.index += 1;
        tracing::trace!("appended {} at {}", entry.name(), key);
        Ok(())
    }

    /// Collapse the log into a single snapshot entry of a new generation.
    ///
    /// Compaction sequence:
    /// 1. Serialize the keyspace as one `_LOAD` entry
    /// 2. Persist it at `(generation + 1, 0)`
    /// 3. Point `KEYSET` at `generation + 1`
    /// 4. Reset the write cursor to 1
    /// 5. Remove every key outside the new generation
    ///
    /// A failure before step 3 leaves the old generation authoritative with
    /// an inert orphan snapshot; a failure after it leaves stale keys that
    /// the next compaction sweeps.
    pub fn condense(&mut self) -> Result<(), StoreError> {
        let next = self.generation + 1;

        write_snapshot(&self.backend, &self.keyspace, next)?;
        publish_generation(&self.backend, next)?;

        self.generation = next;
        self.index = 1;

        let removed = collect_garbage(&self.backend, next)?;
        tracing::info!(
            "compacted {} keys into generation {}, reclaimed {} storage keys",
            self.keyspace.len(),
            next,
            removed
        );
        Ok(())
    }
}
