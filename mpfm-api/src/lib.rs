//! Client for the flow monitoring REST API.
//!
//! - `client`: [`ApiClient`], envelope decoding and bearer authentication
//! - `auth` / `monitoring`: one method per endpoint
//! - `error`: the error taxonomy and user-facing message translation
//! - `token`: token persistence with client-side expiry
//! - `config`: base URL, poll interval and timeout from the environment

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod monitoring;
pub mod token;

pub use client::ApiClient;
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, Result};
pub use monitoring::{AlarmQuery, DeviceQuery};
pub use token::{MemoryStorage, Persistence, StoredSession, TokenStorage, TokenStore};
