//! Authentication state shared by the client and every page.
//!
//! This module holds the bearer token, mirrors it into a persistent
//! [`TokenStore`], and tracks whether the auth modal should be visible.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::client::store::{TokenStore, TOKEN_KEY};

/// # Auth Context
///
/// The single piece of shared mutable state in the application. Clones are
/// cheap and all observe the same token and modal flag.
///
/// ## Persistence
///
/// The token is read from the store once, in [`AuthContext::load`]. After that
/// the in-memory copy is authoritative and every change is written through.
/// Store failures are logged and otherwise ignored: losing the persisted
/// token only means the user has to log in again next time.
///
/// ## Locking
///
/// The inner mutex is only ever held for field access, never across an
/// `.await`.
#[derive(Clone)]
pub struct AuthContext {
    state: Arc<Mutex<AuthState>>,
    store: Arc<dyn TokenStore>,
}

#[derive(Debug, Default)]
struct AuthState {
    token: Option<String>,
    username: Option<String>,
    show_auth_modal: bool,
}

impl AuthContext {
    pub fn load(store: Arc<dyn TokenStore>) -> Self {
        let token = match store.load(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read stored token, starting signed out: {}", e);
                None
            }
        };

        if let Some(t) = &token {
            tracing::debug!("Restored stored token: {}", preview(t));
        }

        Self {
            state: Arc::new(Mutex::new(AuthState {
                token,
                ..AuthState::default()
            })),
            store,
        }
    }

    fn state(&self) -> MutexGuard<'_, AuthState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().token.is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.state().token.clone()
    }

    pub fn token_preview(&self) -> Option<String> {
        self.state().token.as_deref().map(preview)
    }

    pub fn username(&self) -> Option<String> {
        self.state().username.clone()
    }

    pub fn show_auth_modal(&self) -> bool {
        self.state().show_auth_modal
    }

    pub fn set_show_auth_modal(&self, show: bool) {
        self.state().show_auth_modal = show;
    }

    /// Store a freshly issued token and close the auth modal.
    pub fn login(&self, token: String, username: String) {
        if let Err(e) = self.store.save(TOKEN_KEY, &token) {
            tracing::warn!("Failed to persist token: {}", e);
        }

        tracing::info!("Signed in as {}", username);
        let mut state = self.state();
        state.token = Some(token);
        state.username = Some(username);
        state.show_auth_modal = false;
    }

    pub fn logout(&self) {
        if let Err(e) = self.store.remove(TOKEN_KEY) {
            tracing::warn!("Failed to remove persisted token: {}", e);
        }

        let mut state = self.state();
        state.token = None;
        state.username = None;
        tracing::info!("Signed out");
    }

    /// Gate for protected pages and write actions.
    ///
    /// Returns `true` when a token is present. Otherwise the auth modal is
    /// opened and `false` is returned, and the caller must not proceed.
    pub fn require_auth(&self) -> bool {
        let mut state = self.state();
        if state.token.is_some() {
            return true;
        }
        state.show_auth_modal = true;
        false
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("AuthContext")
            .field("token", &state.token.as_deref().map(preview))
            .field("username", &state.username)
            .field("show_auth_modal", &state.show_auth_modal)
            .finish()
    }
}

fn preview(token: &str) -> String {
    let end = token
        .char_indices()
        .nth(10)
        .map(|(i, _)| i)
        .unwrap_or(token.len());
    format!("{}...", &token[..end])
}
