//! Console configuration from environment variables and CLI flags.
//!
//! Precedence, highest first: CLI flag, `STOMATON_*` variable, legacy
//! `NEXT_PUBLIC_API_BASE_URL` (base URL only), built-in default.

use std::path::PathBuf;

use clap::ValueEnum;
use thiserror::Error;

use crate::api::auth::FileTokenStore;

/// Largest accepted `STOMATON_MOCK_LATENCY` multiplier.
pub const MAX_MOCK_LATENCY: f64 = 100.0;

pub const DEFAULT_API_BASE_URL: &str = "https://stomaton-gateway-production.up.railway.app/api/v1";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

/// Where view data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendMode {
    /// Bundled fixtures with artificial delay.
    Mock,
    /// Live STOMATON API.
    Http,
}

/// Durable storage for the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// JSON file under the user config directory.
    File,
    /// OS keychain.
    Keychain,
    /// Process memory only; sessions do not survive restarts.
    Memory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub backend: BackendMode,
    pub store: StoreKind,
    pub storage_path: PathBuf,
    /// Multiplier applied to the mock backend's artificial delays.
    pub mock_latency: f64,
}

impl Config {
    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolve from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let api_base_url = get("STOMATON_API_BASE_URL")
            .or_else(|| get("NEXT_PUBLIC_API_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let backend = match get("STOMATON_BACKEND") {
            Some(value) => parse_enum("STOMATON_BACKEND", &value)?,
            None => BackendMode::Mock,
        };

        let store = match get("STOMATON_TOKEN_STORE") {
            Some(value) => parse_enum("STOMATON_TOKEN_STORE", &value)?,
            None => StoreKind::File,
        };

        let storage_path = get("STOMATON_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(FileTokenStore::default_path);

        let mock_latency = match get("STOMATON_MOCK_LATENCY") {
            Some(value) => value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| (0.0..=MAX_MOCK_LATENCY).contains(f))
                .ok_or(ConfigError::InvalidValue {
                    var: "STOMATON_MOCK_LATENCY",
                    value,
                })?,
            None => 1.0,
        };

        Ok(Self {
            api_base_url,
            backend,
            store,
            storage_path,
            mock_latency,
        })
    }

    /// Apply CLI flags on top of the environment.
    pub fn with_overrides(
        mut self,
        api_url: Option<String>,
        backend: Option<BackendMode>,
        store: Option<StoreKind>,
    ) -> Self {
        if let Some(url) = api_url {
            self.api_base_url = url;
        }
        if let Some(backend) = backend {
            self.backend = backend;
        }
        if let Some(store) = store {
            self.store = store;
        }
        self
    }
}

fn parse_enum<T: ValueEnum>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    T::from_str(value.trim(), true).map_err(|_| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
    })
}
