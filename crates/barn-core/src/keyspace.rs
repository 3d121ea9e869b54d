// ABOUTME: The in-memory typed value store that every command is applied to.
// ABOUTME: Checks a key's type tag before any mutation so a failed command leaves state untouched.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::command::{Command, CommandError, Reply};
use crate::entry::{Entry, Snapshot};
use crate::value::{Value, ValueKind};

/// Mapping from application key to tagged value. Rebuilt entirely by replay;
/// only ever persisted as the payload of a snapshot entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyspace {
    entries: BTreeMap<String, Value>,
}

impl Keyspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrow the raw tagged value under a key, if any.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Copy the full state out as a snapshot payload.
    pub fn snapshot(&self) -> Snapshot {
        self.entries.clone()
    }

    /// Replace the full state with a snapshot payload.
    pub fn load(&mut self, snapshot: Snapshot) {
        self.entries = snapshot;
    }

    /// Put a key back to a previously observed value (or absence). Used to
    /// undo an applied command whose log append failed.
    pub fn restore(&mut self, key: &str, prior: Option<Value>) {
        match prior {
            Some(value) => {
                self.entries.insert(key.to_string(), value);
            }
            None => {
                self.entries.remove(key);
            }
        }
    }

    /// Apply a decoded log entry. Used by replay, which never re-logs.
    pub fn apply_entry(&mut self, entry: Entry) -> Result<Reply, CommandError> {
        match entry {
            Entry::Command(cmd) => self.apply(&cmd),
            Entry::Load(snapshot) => {
                self.load(snapshot);
                Ok(Reply::Unit)
            }
        }
    }

    /// Apply a single command and return its reply.
    pub fn apply(&mut self, cmd: &Command) -> Result<Reply, CommandError> {
        match cmd {
            Command::Get { key } => Ok(match self.string(key)? {
                Some(s) => Reply::Text(s.clone()),
                None => Reply::Nil,
            }),

            Command::Set { key, value } => {
                self.entries
                    .insert(key.clone(), Value::String(value.clone()));
                Ok(Reply::Unit)
            }

            Command::Del { key } => Ok(Reply::Integer(
                self.entries.remove(key).map_or(0, |_| 1),
            )),

            Command::LPush { key, value } => {
                let list = self.list_or_create(key)?;
                list.push_front(value.clone());
                Ok(Reply::Integer(list.len() as u64))
            }

            Command::RPush { key, value } => {
                let list = self.list_or_create(key)?;
                list.push_back(value.clone());
                Ok(Reply::Integer(list.len() as u64))
            }

            Command::LPop { key } => Ok(self
                .list_mut(key)?
                .and_then(|list| list.pop_front())
                .map_or(Reply::Nil, Reply::Text)),

            Command::RPop { key } => Ok(self
                .list_mut(key)?
                .and_then(|list| list.pop_back())
                .map_or(Reply::Nil, Reply::Text)),

            Command::LLen { key } => Ok(Reply::Integer(
                self.list(key)?.map_or(0, |list| list.len() as u64),
            )),

            Command::LRange { key, start, end } => Ok(match self.list(key)? {
                Some(list) => {
                    let (from, to) = range_bounds(list.len(), *start, *end);
                    Reply::Members(list.range(from..to).cloned().collect())
                }
                None => Reply::Nil,
            }),

            Command::SAdd { key, member } => {
                let set = self.set_or_create(key)?;
                Ok(Reply::Integer(u64::from(set.insert(member.clone()))))
            }

            Command::SRem { key, member } => {
                let set = self.set_or_create(key)?;
                Ok(Reply::Integer(u64::from(set.remove(member))))
            }

            Command::SMembers { key } => Ok(match self.set(key)? {
                Some(set) => Reply::Members(set.iter().cloned().collect()),
                None => Reply::Nil,
            }),

            Command::SIsMember { key, member } => Ok(Reply::Bool(
                self.set(key)?.is_some_and(|set| set.contains(member)),
            )),
        }
    }

    fn string(&self, key: &str) -> Result<Option<&String>, CommandError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(CommandError::type_mismatch(
                key,
                ValueKind::String,
                other.kind(),
            )),
        }
    }

    fn list(&self, key: &str) -> Result<Option<&VecDeque<String>>, CommandError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(Value::List(list)) => Ok(Some(list)),
            Some(other) => Err(CommandError::type_mismatch(
                key,
                ValueKind::List,
                other.kind(),
            )),
        }
    }

    fn list_mut(&mut self, key: &str) -> Result<Option<&mut VecDeque<String>>, CommandError> {
        match self.entries.get_mut(key) {
            None => Ok(None),
            Some(Value::List(list)) => Ok(Some(list)),
            Some(other) => Err(CommandError::type_mismatch(
                key,
                ValueKind::List,
                other.kind(),
            )),
        }
    }

    fn list_or_create(&mut self, key: &str) -> Result<&mut VecDeque<String>, CommandError> {
        // An existing key is never replaced here, so a mismatch leaves it untouched.
        let value = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Value::List(VecDeque::new()));
        match value {
            Value::List(list) => Ok(list),
            other => Err(CommandError::type_mismatch(
                key,
                ValueKind::List,
                other.kind(),
            )),
        }
    }

    fn set(&self, key: &str) -> Result<Option<&BTreeSet<String>>, CommandError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(Value::Set(set)) => Ok(Some(set)),
            Some(other) => Err(CommandError::type_mismatch(
                key,
                ValueKind::Set,
                other.kind(),
            )),
        }
    }

    fn set_or_create(&mut self, key: &str) -> Result<&mut BTreeSet<String>, CommandError> {
        let value = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Value::Set(BTreeSet::new()));
        match value {
            Value::Set(set) => Ok(set),
            other => Err(CommandError::type_mismatch(
                key,
                ValueKind::Set,
                other.kind(),
            )),
        }
    }
}

/// Translate LRANGE's inclusive `start..=end` into a half-open range over a
/// list of `len` elements. `start` is clamped at 0, `end == -1` means the last
/// element, other negative ends count back from the tail.
fn range_bounds(len: usize, start: i64, end: i64) -> (usize, usize) {
    let len = len as i64;
    let from = start.clamp(0, len);
    let to = if end == -1 {
        len
    } else {
        let exclusive = end.saturating_add(1);
        if exclusive < 0 {
            (len + exclusive).max(0)
        } else {
            exclusive.min(len)
        }
    };
    (from as usize, to.max(from) as usize)
}
