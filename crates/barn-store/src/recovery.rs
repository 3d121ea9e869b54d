// ABOUTME: Crash-consistent reconstruction of the keyspace by replaying the active generation's log.
// ABOUTME: Reads the generation pointer, then applies entries 0, 1, 2, ... until the first gap.

use barn_core::{Entry, Keyspace};

use crate::backend::StorageBackend;
use crate::error::StoreError;
use crate::logkey::{KEYSET, LogKey};

/// The outcome of replaying a store's log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replayed {
    pub keyspace: Keyspace,
    pub generation: u64,
    /// Number of entries applied; the next entry is written here.
    pub index: u64,
}

/// Read the active generation, initializing `KEYSET` to 0 on first open.
pub fn load_generation<B: StorageBackend + ?Sized>(backend: &B) -> Result<u64, StoreError> {
    match backend.get(KEYSET)? {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| StoreError::CorruptGeneration(raw)),
        None => {
            backend.set(KEYSET, "0")?;
            tracing::info!("no generation found, initialized KEYSET to 0");
            Ok(0)
        }
    }
}

/// Rebuild the keyspace from the backend.
///
/// Replay sequence:
/// 1. Load (or initialize) the active generation from `KEYSET`
/// 2. Fetch entry `(generation, 0)`, `(generation, 1)`, ... in order
/// 3. Decode and apply each entry; nothing is re-logged
/// 4. Stop at the first missing index, which becomes the write cursor
///
/// An entry naming an unknown command aborts replay rather than being
/// skipped, since skipping would silently diverge from the logged history.
pub fn replay<B: StorageBackend + ?Sized>(backend: &B) -> Result<Replayed, StoreError> {
    let generation = load_generation(backend)?;
    let mut keyspace = Keyspace::new();
    let mut index = 0u64;

    loop {
        let key = LogKey::new(generation, index).to_string();
        let Some(text) = backend.get(&key)? else {
            break;
        };
        let entry = Entry::decode(&text).map_err(|source| StoreError::decode(key, source))?;
        keyspace.apply_entry(entry)?;
        index += 1;
    }

    tracing::info!(
        "replayed {} entries of generation {} ({} keys)",
        index,
        generation,
        keyspace.len()
    );

    Ok(Replayed {
        keyspace,
        generation,
        index,
    })
}
