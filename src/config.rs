//! Runtime configuration, read from the environment.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::api::Api;
use crate::client::{AuthContext, AuthScheme, FileTokenStore, MemoryTokenStore, RecipeClient, TokenStore};
use crate::toast::Toaster;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_ASSET_URL: &str = "http://localhost:5000";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the REST API, e.g. `http://localhost:5000/api`
    pub api_url: String,
    /// Host that serves recipe images
    pub asset_url: String,
    /// Where the token is persisted; in memory only when unset
    pub token_file: Option<PathBuf>,
    pub auth_scheme: AuthScheme,
    pub timeout: Duration,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            asset_url: DEFAULT_ASSET_URL.to_string(),
            token_file: None,
            auth_scheme: AuthScheme::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl Config {
    /// Read `COMPASS_API_URL`, `COMPASS_ASSET_URL`, `COMPASS_TOKEN_FILE`,
    /// `COMPASS_AUTH_HEADER`, `COMPASS_TIMEOUT_SECS` and `BIND_ADDR`, falling
    /// back to the defaults for anything unset.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let api_url = env::var("COMPASS_API_URL").unwrap_or(defaults.api_url);
        let asset_url = env::var("COMPASS_ASSET_URL").unwrap_or(defaults.asset_url);
        let token_file = env::var("COMPASS_TOKEN_FILE")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let auth_scheme = match env::var("COMPASS_AUTH_HEADER") {
            Ok(raw) => raw
                .parse::<AuthScheme>()
                .map_err(anyhow::Error::msg)
                .context("COMPASS_AUTH_HEADER must be 'bearer' or 'x-auth-token'")?,
            Err(_) => defaults.auth_scheme,
        };

        let timeout = match env::var("COMPASS_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("COMPASS_TIMEOUT_SECS is not a number: {}", raw))?,
            ),
            Err(_) => defaults.timeout,
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or(defaults.bind_addr);

        Ok(Self {
            api_url,
            asset_url,
            token_file,
            auth_scheme,
            timeout,
            bind_addr,
        })
    }

    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        match &self.token_file {
            Some(path) => Arc::new(FileTokenStore::new(path)),
            None => Arc::new(MemoryTokenStore::new()),
        }
    }

    /// Wire up the auth context, client and toaster this configuration
    /// describes.
    pub fn build_api(&self) -> Api {
        let auth = AuthContext::load(self.token_store());
        let client = RecipeClient::new(self.api_url.clone(), auth)
            .with_auth_scheme(self.auth_scheme)
            .with_timeout(self.timeout);
        Api::new(client, Toaster::new())
    }
}
