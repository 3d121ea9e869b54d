// ABOUTME: Storage key layout for the log: the reserved generation pointer and per-entry keys.
// ABOUTME: Entry i of generation g lives at "g_i"; membership is decided by the "g_" prefix.

use std::fmt;

/// Reserved storage key holding the active generation number.
///
/// Application keys never become storage keys (they live inside entries), so
/// this name cannot collide with user data.
pub const KEYSET: &str = "KEYSET";

/// Address of one log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogKey {
    pub generation: u64,
    pub index: u64,
}

impl LogKey {
    pub fn new(generation: u64, index: u64) -> Self {
        Self { generation, index }
    }

    /// Parse a storage key of the form `"<generation>_<index>"`.
    pub fn parse(key: &str) -> Option<LogKey> {
        let (generation, index) = key.split_once('_')?;
        Some(LogKey {
            generation: generation.parse().ok()?,
            index: index.parse().ok()?,
        })
    }
}

impl fmt::Display for LogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.generation, self.index)
    }
}

/// Prefix shared by every entry key of `generation`.
pub fn generation_prefix(generation: u64) -> String {
    format!("{}_", generation)
}

/// Whether `key` is an entry key of `generation`.
pub fn belongs_to(key: &str, generation: u64) -> bool {
    key.starts_with(&generation_prefix(generation))
}

/// Whether `key` is reclaimable once `generation` is authoritative: anything
/// other than the generation pointer and that generation's entries.
pub fn is_garbage(key: &str, generation: u64) -> bool {
    key != KEYSET && !belongs_to(key, generation)
}
