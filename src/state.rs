//! Application state for the STOMATON console.
//!
//! Owns the session, the navigator and the API client. The client holds
//! `Arc`s to the same session and navigator, so a 401 seen by the client is
//! visible to every command through `AppState`.

use std::sync::Arc;

use crate::api::auth::{FileTokenStore, KeychainTokenStore, MemoryTokenStore, TokenStore};
use crate::api::client::ApiClient;
use crate::config::{Config, StoreKind};
use crate::navigation::{ConsoleNavigator, Route};
use crate::session::Session;

pub struct AppState {
    pub config: Config,

    /// Bearer token, in memory and mirrored to durable storage.
    pub session: Arc<Session>,

    /// Current console route; the client redirects it to sign-in on 401.
    pub navigator: Arc<ConsoleNavigator>,

    /// HTTP client for the live STOMATON API.
    pub api: Arc<ApiClient>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = token_store(&config);
        Self::with_store(config, store)
    }

    /// Build state over an explicit token store.
    pub fn with_store(config: Config, store: Arc<dyn TokenStore>) -> Self {
        let session = Arc::new(Session::new(store));
        let navigator = Arc::new(ConsoleNavigator::new(Route::Dashboard));
        let api = Arc::new(ApiClient::new(
            &config.api_base_url,
            session.clone(),
            navigator.clone(),
        ));
        Self {
            config,
            session,
            navigator,
            api,
        }
    }
}

/// Durable store selected by `config.store`.
pub fn token_store(config: &Config) -> Arc<dyn TokenStore> {
    match config.store {
        StoreKind::File => Arc::new(FileTokenStore::new(config.storage_path.clone())),
        StoreKind::Keychain => Arc::new(KeychainTokenStore::new()),
        StoreKind::Memory => Arc::new(MemoryTokenStore::new()),
    }
}
