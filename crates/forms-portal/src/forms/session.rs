use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for form sessions handed out by the services.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage abstraction for live form sessions so the services can be
/// exercised in isolation. One session owns one controller instance;
/// nothing is shared between sessions.
pub trait SessionStore<T>: Send + Sync {
    fn insert(&self, id: SessionId, state: T) -> Result<(), SessionStoreError>;
    fn update(&self, id: &SessionId, state: T) -> Result<(), SessionStoreError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<T>, SessionStoreError>;
    fn remove(&self, id: &SessionId) -> Result<bool, SessionStoreError>;
}

/// Error enumeration for session-store failures.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
