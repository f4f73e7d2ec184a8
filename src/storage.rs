use async_trait::async_trait;
use parking_lot::Mutex;
use std::{collections::BTreeMap, io::ErrorKind, path::PathBuf, sync::Arc};
use tokio::io::AsyncWriteExt;

use crate::error::StorageError;

/// The fixed key the bearer token is stored under.
pub const TOKEN_KEY: &str = "token";

// 1. TokenStore Contract
/// TokenStore
///
/// Durable key-value storage holding exactly one entry: the bearer token.
/// The entry survives process restarts and can be deleted explicitly. The Session
/// Store is the only writer.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns the persisted token, or `None` when nothing is stored.
    async fn load(&self) -> Result<Option<String>, StorageError>;

    /// Persists `token`, replacing any previous value.
    async fn save(&self, token: &str) -> Result<(), StorageError>;

    /// Deletes the persisted token. Deleting an absent token is not an error.
    async fn remove(&self) -> Result<(), StorageError>;
}

// 2. The Real Implementation (JSON file on disk)
/// FileTokenStore
///
/// Keeps the entry in a small JSON document (`{"token": "..."}`) at a configured
/// path. Writes go through a sibling temp file and a rename so a crash mid-write
/// never leaves a truncated token behind. On unix the file is owner-only (0600).
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>, StorageError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entries: BTreeMap<String, String> = serde_json::from_slice(&raw)?;
        Ok(entries.get(TOKEN_KEY).cloned())
    }

    async fn save(&self, token: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let entries = BTreeMap::from([(TOKEN_KEY.to_string(), token.to_string())]);
        let body = serde_json::to_vec(&entries)?;

        let temp = self.temp_path();
        // A leftover temp file would keep its old permissions through `open`.
        match tokio::fs::remove_file(&temp).await {
            Err(e) if e.kind() != ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&temp).await?;
        file.write_all(&body).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&temp, &self.path).await?;
        Ok(())
    }

    async fn remove(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// 3. The Mock Implementation (For Tests)
/// MemoryTokenStore
///
/// In-memory stand-in for `FileTokenStore`. Clones share the same slot, so a test
/// can keep a handle and inspect what the Session Store persisted.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
    /// When true, every operation returns a simulated I/O failure.
    pub should_fail: bool,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token.to_string()))),
            should_fail: false,
        }
    }

    pub fn new_failing() -> Self {
        Self {
            slot: Arc::default(),
            should_fail: true,
        }
    }

    /// Current contents, bypassing the trait (and the failure switch).
    pub fn peek(&self) -> Option<String> {
        self.slot.lock().clone()
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.should_fail {
            return Err(StorageError::Io(std::io::Error::other(
                "Mock Token Store Error: Simulation requested",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.slot.lock().clone())
    }

    async fn save(&self, token: &str) -> Result<(), StorageError> {
        self.check()?;
        *self.slot.lock() = Some(token.to_string());
        Ok(())
    }

    async fn remove(&self) -> Result<(), StorageError> {
        self.check()?;
        *self.slot.lock() = None;
        Ok(())
    }
}

/// TokenStoreState
///
/// The concrete type used to share the token store across the client state.
pub type TokenStoreState = Arc<dyn TokenStore>;
