//! Session holding the bearer token for the console.
//!
//! The token lives in memory behind an async lock and is mirrored into a
//! `TokenStore` under `TOKEN_STORAGE_KEY`. The API client is handed an
//! `Arc<Session>` at construction and reads the token at send time.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use zeroize::Zeroizing;

use crate::api::auth::{StorageError, TokenStore};

/// Durable storage key for the session token.
pub const TOKEN_STORAGE_KEY: &str = "stomaton_token";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage failed: {0}")]
    Storage(#[from] StorageError),
}

/// Authentication state of the console session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No token in memory -- initial state without a stored token, and the
    /// state after logout or an unauthorized response.
    Unauthenticated,
    /// A bearer token is held and attached to outgoing requests.
    Authenticated,
}

impl SessionState {
    /// Human-readable label for `stomaton status`.
    pub fn label(&self) -> &str {
        match self {
            SessionState::Unauthenticated => "Signed out",
            SessionState::Authenticated => "Signed in",
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated)
    }
}

pub struct Session {
    token: RwLock<Option<Zeroizing<String>>>,
    store: Arc<dyn TokenStore>,
}

impl Session {
    /// Create an empty session over the given durable store.
    ///
    /// Call `restore()` to pick up a token persisted by an earlier run.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            token: RwLock::new(None),
            store,
        }
    }

    /// Re-derive the session from durable storage.
    ///
    /// A stored token becomes the in-memory token; no stored token clears
    /// whatever was in memory.
    pub async fn restore(&self) -> Result<SessionState, SessionError> {
        match self.store.load(TOKEN_STORAGE_KEY)? {
            Some(token) if !token.is_empty() => {
                self.set_token(token).await;
                log::debug!("Session restored from storage");
                Ok(SessionState::Authenticated)
            }
            _ => {
                self.clear_token().await;
                Ok(SessionState::Unauthenticated)
            }
        }
    }

    /// Hold `token` in memory. Does not touch durable storage.
    ///
    /// The previous token is wiped when it is replaced.
    pub async fn set_token(&self, token: String) {
        *self.token.write().await = Some(Zeroizing::new(token));
    }

    /// Drop the in-memory token. Does not touch durable storage.
    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    /// Current in-memory token, if any. The copy is wiped when dropped.
    pub async fn token(&self) -> Option<Zeroizing<String>> {
        self.token.read().await.clone()
    }

    pub async fn state(&self) -> SessionState {
        if self.token.read().await.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state().await.is_authenticated()
    }

    /// Login transition: hold the token and persist it.
    pub async fn establish(&self, token: String) -> Result<(), SessionError> {
        self.store.save(TOKEN_STORAGE_KEY, &token)?;
        self.set_token(token).await;
        Ok(())
    }

    /// Logout transition: drop the token from memory and storage.
    ///
    /// Memory is cleared even when the storage removal fails, so the session
    /// is unauthenticated on return either way.
    pub async fn end(&self) -> Result<(), SessionError> {
        self.clear_token().await;
        self.store.remove(TOKEN_STORAGE_KEY)?;
        Ok(())
    }

    /// Server rejected the token. Same effect as `end()`, but storage errors
    /// are only logged since the caller is already handling a failure.
    pub async fn expire(&self) {
        self.clear_token().await;
        if let Err(e) = self.store.remove(TOKEN_STORAGE_KEY) {
            log::warn!("Failed to remove rejected token from storage: {}", e);
        }
    }
}
