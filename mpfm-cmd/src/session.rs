//! Session file storage and the shared command context.

use anyhow::{bail, Context as _};
use mpfm_api::token::{Persistence, StorageError, TokenStorage};
use mpfm_api::{ApiClient, ApiConfig, ApiError, MemoryStorage, TokenStore};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const SESSION_FILE_ENV: &str = "MPFM_SESSION_FILE";

/// `$MPFM_SESSION_FILE`, or `~/.mpfm/session.json`.
pub fn default_session_path() -> PathBuf {
    if let Some(path) = env::var_os(SESSION_FILE_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    let home = env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".mpfm").join("session.json")
}

/// Remembered sessions go to a JSON file; the others live only as long as
/// the process.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    memory: MemoryStorage,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            memory: MemoryStorage::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> BTreeMap<String, String> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
            BTreeMap::new()
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_error = |e: std::io::Error| StorageError(format!("{}: {}", self.path.display(), e));
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(io_error(e)),
                _ => Ok(()),
            };
        }
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(io_error)?;
        }
        let json = serde_json::to_string_pretty(entries).map_err(|e| StorageError(e.to_string()))?;
        fs::write(&self.path, json).map_err(io_error)
    }
}

impl TokenStorage for FileStorage {
    fn load(&self, area: Persistence, key: &str) -> Option<String> {
        match area {
            Persistence::Session => self.memory.load(area, key),
            Persistence::Persistent => self.read_entries().remove(key),
        }
    }

    fn store(&mut self, area: Persistence, key: &str, value: &str) -> Result<(), StorageError> {
        match area {
            Persistence::Session => self.memory.store(area, key, value),
            Persistence::Persistent => {
                let mut entries = self.read_entries();
                entries.insert(key.to_string(), value.to_string());
                self.write_entries(&entries)
            }
        }
    }

    fn remove(&mut self, area: Persistence, key: &str) -> Result<(), StorageError> {
        match area {
            Persistence::Session => self.memory.remove(area, key),
            Persistence::Persistent => {
                let mut entries = self.read_entries();
                if entries.remove(key).is_none() {
                    return Ok(());
                }
                self.write_entries(&entries)
            }
        }
    }
}

/// Configuration and stored session shared by every command.
pub struct Context {
    pub config: ApiConfig,
    store: TokenStore<FileStorage>,
}

impl Context {
    pub fn new(config: ApiConfig, session_path: impl Into<PathBuf>) -> Self {
        Self {
            config,
            store: TokenStore::new(FileStorage::new(session_path)),
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let config = ApiConfig::from_env().context("Invalid configuration")?;
        log::debug!("API base URL {}", config.base_url);
        Ok(Self::new(config, default_session_path()))
    }

    pub fn store(&mut self) -> &mut TokenStore<FileStorage> {
        &mut self.store
    }

    /// Client without a token.
    pub fn anonymous(&self) -> anyhow::Result<ApiClient> {
        Ok(ApiClient::new(&self.config)?)
    }

    /// Client carrying the stored token.
    pub fn authenticated(&mut self) -> anyhow::Result<ApiClient> {
        match self.store.token() {
            Some(token) => Ok(self.anonymous()?.with_token(token)),
            None => bail!("Not signed in. Run `mpfm-cli login --remember` first."),
        }
    }

    /// Turn an API result into a command result, dropping the stored
    /// session when the server no longer accepts it.
    pub fn check<T>(&mut self, result: mpfm_api::Result<T>) -> anyhow::Result<T> {
        match result {
            Err(ApiError::Unauthorized) => {
                self.store.clear()?;
                bail!("{} Run `mpfm-cli login` again.", ApiError::Unauthorized)
            }
            other => Ok(other?),
        }
    }
}
