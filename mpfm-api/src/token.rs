//! Token persistence with client-side expiry.
//!
//! A session is stored as JSON under [`SESSION_KEY`] in one of two areas:
//! session-only or persistent, chosen by the "remember me" flag. Reading a
//! session that expires within [`EXPIRY_BUFFER_MINUTES`] treats it as already
//! expired and wipes both areas.

use chrono::{DateTime, Duration, Utc};
use mpfm_model::auth::{AuthPayload, User};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const SESSION_KEY: &str = "mpfm.session";

/// Tokens are dropped this long before their real expiry.
pub const EXPIRY_BUFFER_MINUTES: i64 = 5;

/// Where a session is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persistence {
    /// Gone when the browser tab or CLI process ends.
    Session,
    /// Survives restarts ("remember me").
    Persistent,
}

impl Persistence {
    pub fn from_remember(remember: bool) -> Self {
        if remember {
            Persistence::Persistent
        } else {
            Persistence::Session
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("token storage failed: {0}")]
pub struct StorageError(pub String);

/// Key/value backend with a session area and a persistent area.
pub trait TokenStorage {
    fn load(&self, area: Persistence, key: &str) -> Option<String>;
    fn store(&mut self, area: Persistence, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, area: Persistence, key: &str) -> Result<(), StorageError>;
}

/// In-process backend, used for tests and as the CLI's session area.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<(Persistence, String), String>,
}

impl TokenStorage for MemoryStorage {
    fn load(&self, area: Persistence, key: &str) -> Option<String> {
        self.entries.get(&(area, key.to_string())).cloned()
    }

    fn store(&mut self, area: Persistence, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert((area, key.to_string()), value.to_string());
        Ok(())
    }

    fn remove(&mut self, area: Persistence, key: &str) -> Result<(), StorageError> {
        self.entries.remove(&(area, key.to_string()));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub user: Option<User>,
}

impl StoredSession {
    /// Valid at `now` once the early-expiry buffer is taken off. An expiry
    /// too close to the earliest representable time counts as expired.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .checked_sub_signed(Duration::minutes(EXPIRY_BUFFER_MINUTES))
            .is_some_and(|cutoff| now < cutoff)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokenStore<S> {
    storage: S,
}

impl<S: TokenStorage> TokenStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Store `session` in the area picked by `remember`, clearing the other.
    pub fn save(&mut self, session: &StoredSession, remember: bool) -> Result<(), StorageError> {
        let area = Persistence::from_remember(remember);
        let other = Persistence::from_remember(!remember);
        let json = serde_json::to_string(session).map_err(|e| StorageError(e.to_string()))?;
        self.storage.remove(other, SESSION_KEY)?;
        self.storage.store(area, SESSION_KEY, &json)
    }

    /// Store the result of a successful login.
    pub fn save_login(
        &mut self,
        payload: &AuthPayload,
        remember: bool,
        now: DateTime<Utc>,
    ) -> Result<StoredSession, StorageError> {
        let session = StoredSession {
            token: payload.token.clone(),
            expires_at: payload.expiry_from(now),
            user: payload.user.clone(),
        };
        self.save(&session, remember)?;
        Ok(session)
    }

    /// Current session, or `None` when missing, unreadable or expired.
    /// Expired and unreadable sessions are removed from storage.
    pub fn session_at(&mut self, now: DateTime<Utc>) -> Option<StoredSession> {
        let raw = self
            .storage
            .load(Persistence::Persistent, SESSION_KEY)
            .or_else(|| self.storage.load(Persistence::Session, SESSION_KEY))?;

        match serde_json::from_str::<StoredSession>(&raw) {
            Ok(session) if session.is_valid_at(now) => Some(session),
            Ok(session) => {
                log::info!("Stored token expired at {}, clearing", session.expires_at);
                self.clear_quietly();
                None
            }
            Err(e) => {
                log::warn!("Discarding unreadable stored session: {}", e);
                self.clear_quietly();
                None
            }
        }
    }

    pub fn session(&mut self) -> Option<StoredSession> {
        self.session_at(Utc::now())
    }

    pub fn token_at(&mut self, now: DateTime<Utc>) -> Option<String> {
        self.session_at(now).map(|session| session.token)
    }

    pub fn token(&mut self) -> Option<String> {
        self.token_at(Utc::now())
    }

    /// Remove the session from both areas.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove(Persistence::Persistent, SESSION_KEY)?;
        self.storage.remove(Persistence::Session, SESSION_KEY)
    }

    fn clear_quietly(&mut self) {
        if let Err(e) = self.clear() {
            log::warn!("Failed to clear stored session: {}", e);
        }
    }
}
