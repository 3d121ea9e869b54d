// ABOUTME: End-to-end tests for the barn public API over shared in-memory and file storage.
// ABOUTME: Covers every command, persistence across reopen, and manual and automatic compaction.

use barn::{Barn, FileBackend, MemoryBackend, StorageBackend, StoreConfig};

fn open(storage: &MemoryBackend) -> Barn<&MemoryBackend> {
    Barn::new(storage).unwrap()
}

#[test]
fn set_get_del() {
    let storage = MemoryBackend::new();
    let mut barn = open(&storage);

    barn.set("key", "val").unwrap();
    barn.set("key2", "val2").unwrap();
    assert_eq!(barn.get("key").unwrap().as_deref(), Some("val"));
    assert_eq!(barn.get("key2").unwrap().as_deref(), Some("val2"));

    assert_eq!(barn.del("key").unwrap(), 1);
    assert_eq!(barn.get("key").unwrap(), None);
    assert_eq!(barn.del("key").unwrap(), 0);
}

#[test]
fn list_operations() {
    let storage = MemoryBackend::new();
    let mut barn = open(&storage);

    assert_eq!(barn.lpush("key", "val1").unwrap(), 1);
    assert_eq!(barn.lpush("key", "val2").unwrap(), 2);
    assert_eq!(barn.rpush("key", "val3").unwrap(), 3);
    assert_eq!(barn.llen("key").unwrap(), 3);
    assert_eq!(
        barn.lrange("key", 0, -1).unwrap(),
        Some(vec!["val2".to_string(), "val1".to_string(), "val3".to_string()])
    );

    assert_eq!(barn.lpop("key").unwrap().as_deref(), Some("val2"));
    assert_eq!(barn.rpop("key").unwrap().as_deref(), Some("val3"));
    assert_eq!(barn.rpop("key").unwrap().as_deref(), Some("val1"));
    assert_eq!(barn.rpop("key").unwrap(), None);
    assert_eq!(barn.lpop("missing").unwrap(), None);
    assert_eq!(barn.llen("missing").unwrap(), 0);
    assert_eq!(barn.lrange("missing", 0, -1).unwrap(), None);
}

fn range(barn: &mut Barn<&MemoryBackend>, start: i64, end: i64) -> Vec<String> {
    barn.lrange("key", start, end).unwrap().expect("list should exist")
}

#[test]
fn lrange_boundary_laws() {
    let storage = MemoryBackend::new();
    let mut barn = open(&storage);
    for v in ["a", "b", "c"] {
        barn.rpush("key", v).unwrap();
    }

    assert_eq!(range(&mut barn, 0, 0), vec!["a"]);
    assert_eq!(range(&mut barn, -3, 2), vec!["a", "b", "c"]);
    assert_eq!(range(&mut barn, 0, 10), vec!["a", "b", "c"]);
    assert!(range(&mut barn, 3, 10).is_empty());
    assert_eq!(range(&mut barn, 0, -1), vec!["a", "b", "c"]);
    assert_eq!(range(&mut barn, 0, -2), vec!["a", "b"]);
}

#[test]
fn set_operations() {
    let storage = MemoryBackend::new();
    let mut barn = open(&storage);

    assert!(!barn.sismember("key", "x").unwrap());
    assert_eq!(barn.smembers("key").unwrap(), None);

    assert_eq!(barn.sadd("key", "x").unwrap(), 1);
    assert_eq!(barn.sadd("key", "x").unwrap(), 0);
    assert_eq!(barn.sadd("key", "y").unwrap(), 1);
    assert!(barn.sismember("key", "x").unwrap());
    assert_eq!(barn.smembers("key").unwrap().map(|m| m.len()), Some(2));

    assert_eq!(barn.srem("key", "x").unwrap(), 1);
    assert_eq!(barn.srem("key", "x").unwrap(), 0);
    assert!(!barn.sismember("key", "x").unwrap());
}

#[test]
fn srem_on_missing_key_creates_an_empty_set() {
    let storage = MemoryBackend::new();
    let mut barn = open(&storage);

    assert_eq!(barn.srem("k", "x").unwrap(), 0);
    assert_eq!(barn.smembers("k").unwrap(), Some(vec![]));
    assert!(barn.lpush("k", "v").unwrap_err().is_type_mismatch());

    let mut reopened = open(&storage);
    assert_eq!(reopened.smembers("k").unwrap(), Some(vec![]));
}

#[test]
fn type_isolation() {
    let storage = MemoryBackend::new();
    let mut barn = open(&storage);
    barn.set("k", "v").unwrap();

    assert!(barn.lpush("k", "x").unwrap_err().is_type_mismatch());
    assert!(barn.lpop("k").unwrap_err().is_type_mismatch());
    assert!(barn.rpush("k", "x").unwrap_err().is_type_mismatch());
    assert!(barn.rpop("k").unwrap_err().is_type_mismatch());
    assert!(barn.llen("k").unwrap_err().is_type_mismatch());
    assert!(barn.lrange("k", 0, 0).unwrap_err().is_type_mismatch());
    assert!(barn.sadd("k", "x").unwrap_err().is_type_mismatch());
    assert!(barn.srem("k", "x").unwrap_err().is_type_mismatch());
    assert!(barn.smembers("k").unwrap_err().is_type_mismatch());
    assert!(barn.sismember("k", "x").unwrap_err().is_type_mismatch());
    assert_eq!(barn.get("k").unwrap().as_deref(), Some("v"));

    // Nothing but the SET was logged.
    assert_eq!(barn.engine().index(), 1);
    let mut reopened = open(&storage);
    assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
}

#[test]
fn persistence_across_instances() {
    let storage = MemoryBackend::new();
    {
        let mut barn = open(&storage);
        barn.set("key", "val").unwrap();
        barn.set("key2", "val2").unwrap();
        barn.lpush("list", "val").unwrap();
        barn.lpush("list", "val2").unwrap();
        barn.rpop("list").unwrap();
        barn.sadd("set", "m").unwrap();
    }

    let mut barn = open(&storage);
    assert_eq!(barn.get("key").unwrap().as_deref(), Some("val"));
    assert_eq!(barn.get("key2").unwrap().as_deref(), Some("val2"));
    assert_eq!(barn.llen("list").unwrap(), 1);
    assert_eq!(barn.lrange("list", 0, -1).unwrap(), Some(vec!["val2".to_string()]));
    assert!(barn.sismember("set", "m").unwrap());
}

#[test]
fn condense_across_three_instances() {
    let storage = MemoryBackend::new();

    let mut barn = open(&storage);
    barn.set("key", "val").unwrap();
    barn.condense().unwrap();

    let mut barn2 = open(&storage);
    barn2.set("key2", "val2").unwrap();
    barn2.condense().unwrap();

    let mut barn3 = open(&storage);
    barn3.set("key3", "val3").unwrap();
    assert_eq!(barn3.get("key").unwrap().as_deref(), Some("val"));
    assert_eq!(barn3.get("key2").unwrap().as_deref(), Some("val2"));
    assert_eq!(barn3.get("key3").unwrap().as_deref(), Some("val3"));
}

#[test]
fn condense_leaves_one_entry_and_keyset() {
    let storage = MemoryBackend::new();
    let mut barn = open(&storage);
    barn.set("key", "val").unwrap();
    barn.set("key1", "val1").unwrap();
    barn.set("key2", "val2").unwrap();
    assert_eq!(storage.len().unwrap(), 3 + 1);

    barn.condense().unwrap();
    assert_eq!(storage.len().unwrap(), 1 + 1);
}

#[test]
fn auto_condense_at_default_threshold() {
    let storage = MemoryBackend::new();
    let mut barn = open(&storage);
    assert_eq!(storage.len().unwrap(), 1);

    for i in 0..1000 {
        barn.set(&format!("key{}", i), &format!("val{}", i)).unwrap();
    }
    assert_eq!(storage.len().unwrap(), 1000 + 1);

    barn.set("keyX", "valX").unwrap();
    assert_eq!(storage.len().unwrap(), 1 + 1);

    let mut reopened = open(&storage);
    assert_eq!(reopened.get("key999").unwrap().as_deref(), Some("val999"));
    assert_eq!(reopened.get("keyX").unwrap().as_deref(), Some("valX"));
}

#[test]
fn auto_condense_at_configured_threshold() {
    let max = 5;
    let storage = MemoryBackend::new();
    let config = StoreConfig::default().with_max_entries(max);
    let mut barn = Barn::with_namespace("test", &storage, config).unwrap();
    assert_eq!(storage.len().unwrap(), 1);

    for i in 0..max {
        barn.set(&format!("key{}", i), &format!("val{}", i)).unwrap();
    }
    assert_eq!(storage.len().unwrap(), max + 1);

    barn.set("keyX", "valX").unwrap();
    assert_eq!(storage.len().unwrap(), 1 + 1);

    // Another full generation's worth of writes compacts again.
    for i in 0..max {
        barn.sadd("tags", &format!("t{}", i)).unwrap();
    }
    assert_eq!(barn.engine().generation(), 2);
    assert_eq!(storage.len().unwrap(), 1 + 1);
}

#[test]
fn file_backed_store_survives_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("barn.json");

    {
        let mut barn = Barn::new(FileBackend::open(&path).unwrap()).unwrap();
        barn.rpush("queue", "job-1").unwrap();
        barn.rpush("queue", "job-2").unwrap();
        barn.condense().unwrap();
        barn.lpop("queue").unwrap();
    }

    let mut barn = Barn::new(FileBackend::open(&path).unwrap()).unwrap();
    assert_eq!(barn.engine().generation(), 1);
    assert_eq!(barn.lrange("queue", 0, -1).unwrap(), Some(vec!["job-2".to_string()]));
}
