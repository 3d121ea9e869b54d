// ABOUTME: Snapshot writing and garbage collection used to collapse a generation's log.
// ABOUTME: The engine sequences these around the KEYSET flip so any crash leaves a recoverable store.

use barn_core::{Entry, Keyspace};

use crate::backend::StorageBackend;
use crate::error::StoreError;
use crate::logkey::{KEYSET, LogKey, is_garbage};

/// Persist the full keyspace as a single `_LOAD` entry at index 0 of
/// `generation`. Until `KEYSET` points at `generation`, the entry is inert.
pub fn write_snapshot<B: StorageBackend + ?Sized>(
    backend: &B,
    keyspace: &Keyspace,
    generation: u64,
) -> Result<(), StoreError> {
    let entry = Entry::Load(keyspace.snapshot());
    let text = entry.encode().map_err(StoreError::Encode)?;
    backend.set(&LogKey::new(generation, 0).to_string(), &text)?;
    tracing::debug!(
        "wrote snapshot of {} keys ({} bytes) to generation {}",
        keyspace.len(),
        text.len(),
        generation
    );
    Ok(())
}

/// Make `generation` authoritative for future opens.
pub fn publish_generation<B: StorageBackend + ?Sized>(
    backend: &B,
    generation: u64,
) -> Result<(), StoreError> {
    backend.set(KEYSET, &generation.to_string())?;
    Ok(())
}

/// Remove every key that is neither `KEYSET` nor an entry of `generation`.
/// Keys are enumerated in full before any is removed, since removal shifts
/// the backend's enumeration order. Returns the number of keys removed.
pub fn collect_garbage<B: StorageBackend + ?Sized>(
    backend: &B,
    generation: u64,
) -> Result<usize, StoreError> {
    let garbage: Vec<String> = backend
        .keys()?
        .into_iter()
        .filter(|key| is_garbage(key, generation))
        .collect();

    for key in &garbage {
        backend.remove(key)?;
    }

    tracing::debug!(
        "garbage collection removed {} keys outside generation {}",
        garbage.len(),
        generation
    );
    Ok(garbage.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::recovery::replay;
    use barn_core::{Command, Reply};

    fn s(v: &str) -> String {
        v.to_string()
    }

    #[test]
    fn snapshot_is_invisible_until_published() {
        let backend = MemoryBackend::new();
        backend.set(KEYSET, "0").unwrap();

        let mut keyspace = Keyspace::new();
        keyspace
            .apply(&Command::SAdd {
                key: s("tags"),
                member: s("x"),
            })
            .unwrap();
        write_snapshot(&backend, &keyspace, 1).unwrap();

        let before = replay(&backend).unwrap();
        assert_eq!(before.generation, 0);
        assert!(before.keyspace.is_empty());

        publish_generation(&backend, 1).unwrap();
        let mut after = replay(&backend).unwrap();
        assert_eq!(after.generation, 1);
        assert_eq!(after.index, 1);
        assert_eq!(
            after
                .keyspace
                .apply(&Command::SIsMember {
                    key: s("tags"),
                    member: s("x"),
                })
                .unwrap(),
            Reply::Bool(true)
        );
    }

    #[test]
    fn garbage_collection_keeps_keyset_and_live_generation() {
        let backend = MemoryBackend::new();
        for key in [KEYSET, "1_0", "1_1", "2_0", "10_0", "stray"] {
            backend.set(key, "x").unwrap();
        }

        let removed = collect_garbage(&backend, 1).unwrap();
        assert_eq!(removed, 3);
        assert_eq!(
            backend.keys().unwrap(),
            vec![s("1_0"), s("1_1"), s(KEYSET)]
        );
    }

    #[test]
    fn garbage_collection_on_clean_store_is_a_no_op() {
        let backend = MemoryBackend::new();
        backend.set(KEYSET, "3").unwrap();
        backend.set("3_0", "x").unwrap();

        assert_eq!(collect_garbage(&backend, 3).unwrap(), 0);
        assert_eq!(backend.len().unwrap(), 2);
    }
}
