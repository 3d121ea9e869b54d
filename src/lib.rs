// ABOUTME: Public API for barn: one method per command over a namespaced log engine.
// ABOUTME: Each method builds a Command, executes it, and unwraps the reply into a plain Rust type.

pub mod config;

use barn_store::{LogEngine, Namespaced};
use thiserror::Error;

pub use barn_core::{Command, CommandError, Keyspace, Reply, Value, ValueKind};
pub use barn_store::{FileBackend, MemoryBackend, StorageBackend, StoreConfig, StoreError};

/// Namespace used when none is given.
pub const DEFAULT_NAMESPACE: &str = "BARN";

/// Errors returned by the public API.
#[derive(Debug, Error)]
pub enum BarnError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{command} returned an unexpected reply: {reply:?}")]
    UnexpectedReply { command: &'static str, reply: Reply },
}

impl BarnError {
    /// Whether the command addressed a key holding a different type.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, BarnError::Store(e) if e.is_type_mismatch())
    }
}

pub type Result<T> = std::result::Result<T, BarnError>;

/// A typed data-structure store over flat key-value storage.
pub struct Barn<B: StorageBackend> {
    engine: LogEngine<Namespaced<B>>,
}

impl<B: StorageBackend> Barn<B> {
    /// Open the default namespace with default configuration.
    pub fn new(backend: B) -> Result<Self> {
        Self::with_namespace(DEFAULT_NAMESPACE, backend, StoreConfig::default())
    }

    /// Open `namespace` within `backend`, replaying its log.
    pub fn with_namespace(namespace: &str, backend: B, config: StoreConfig) -> Result<Self> {
        let engine = LogEngine::open(
            Namespaced::new(namespace, backend).map_err(StoreError::from)?,
            config,
        )?;
        Ok(Self { engine })
    }

    pub fn engine(&self) -> &LogEngine<Namespaced<B>> {
        &self.engine
    }

    /// Execute an arbitrary command and return its raw reply.
    pub fn execute(&mut self, cmd: Command) -> Result<Reply> {
        Ok(self.engine.execute(cmd)?)
    }

    /// Collapse the log into a single snapshot entry.
    pub fn condense(&mut self) -> Result<()> {
        Ok(self.engine.condense()?)
    }

    pub fn get(&mut self, key: &str) -> Result<Option<String>> {
        let cmd = Command::Get { key: key.into() };
        self.text(cmd)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let cmd = Command::Set {
            key: key.into(),
            value: value.into(),
        };
        match self.execute(cmd)? {
            Reply::Unit => Ok(()),
            reply => Err(unexpected("SET", reply)),
        }
    }

    /// Returns 1 if the key existed, 0 otherwise.
    pub fn del(&mut self, key: &str) -> Result<u64> {
        self.integer(Command::Del { key: key.into() })
    }

    /// Returns the new length of the list.
    pub fn lpush(&mut self, key: &str, value: &str) -> Result<u64> {
        self.integer(Command::LPush {
            key: key.into(),
            value: value.into(),
        })
    }

    pub fn lpop(&mut self, key: &str) -> Result<Option<String>> {
        self.text(Command::LPop { key: key.into() })
    }

    /// Returns the new length of the list.
    pub fn rpush(&mut self, key: &str, value: &str) -> Result<u64> {
        self.integer(Command::RPush {
            key: key.into(),
            value: value.into(),
        })
    }

    pub fn rpop(&mut self, key: &str) -> Result<Option<String>> {
        self.text(Command::RPop { key: key.into() })
    }

    pub fn llen(&mut self, key: &str) -> Result<u64> {
        self.integer(Command::LLen { key: key.into() })
    }

    /// Inclusive range; `end == -1` means through the last element.
    /// `None` if the key does not exist.
    pub fn lrange(&mut self, key: &str, start: i64, end: i64) -> Result<Option<Vec<String>>> {
        self.members(Command::LRange {
            key: key.into(),
            start,
            end,
        })
    }

    /// Returns 1 if the member was added, 0 if it was already present.
    pub fn sadd(&mut self, key: &str, member: &str) -> Result<u64> {
        self.integer(Command::SAdd {
            key: key.into(),
            member: member.into(),
        })
    }

    /// Returns 1 if the member was removed, 0 otherwise.
    pub fn srem(&mut self, key: &str, member: &str) -> Result<u64> {
        self.integer(Command::SRem {
            key: key.into(),
            member: member.into(),
        })
    }

    pub fn smembers(&mut self, key: &str) -> Result<Option<Vec<String>>> {
        self.members(Command::SMembers { key: key.into() })
    }

    pub fn sismember(&mut self, key: &str, member: &str) -> Result<bool> {
        let cmd = Command::SIsMember {
            key: key.into(),
            member: member.into(),
        };
        match self.execute(cmd)? {
            Reply::Bool(b) => Ok(b),
            reply => Err(unexpected("SISMEMBER", reply)),
        }
    }

    fn text(&mut self, cmd: Command) -> Result<Option<String>> {
        let name = cmd.name();
        match self.execute(cmd)? {
            Reply::Text(s) => Ok(Some(s)),
            Reply::Nil => Ok(None),
            reply => Err(unexpected(name, reply)),
        }
    }

    fn integer(&mut self, cmd: Command) -> Result<u64> {
        let name = cmd.name();
        match self.execute(cmd)? {
            Reply::Integer(n) => Ok(n),
            reply => Err(unexpected(name, reply)),
        }
    }

    fn members(&mut self, cmd: Command) -> Result<Option<Vec<String>>> {
        let name = cmd.name();
        match self.execute(cmd)? {
            Reply::Members(items) => Ok(Some(items)),
            Reply::Nil => Ok(None),
            reply => Err(unexpected(name, reply)),
        }
    }
}

fn unexpected(command: &'static str, reply: Reply) -> BarnError {
    BarnError::UnexpectedReply { command, reply }
}
