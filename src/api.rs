//! Request wrapper used by every page.
//!
//! Pages never deal with [`ApiError`] themselves. They hand a client call to
//! [`Api::request`], which returns `Some(value)` on success and, on failure,
//! raises an error toast (and opens the auth modal for 401s) before returning
//! `None`.
//!
//! An [`Api`] also remembers whether anything done through it asked the
//! user to log in, so callers that handle one action at a time can report
//! that per action.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::client::{ApiError, AuthContext, RecipeClient};
use crate::toast::{Toast, Toaster};

#[derive(Debug, Clone)]
pub struct Api {
    client: RecipeClient,
    toaster: Toaster,
    auth_prompted: Arc<AtomicBool>,
}

impl Api {
    pub fn new(client: RecipeClient, toaster: Toaster) -> Self {
        Self {
            client,
            toaster,
            auth_prompted: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn client(&self) -> &RecipeClient {
        &self.client
    }

    pub fn auth(&self) -> &AuthContext {
        self.client.auth()
    }

    pub fn toaster(&self) -> &Toaster {
        &self.toaster
    }

    /// [`AuthContext::require_auth`], remembering a refusal.
    pub fn require_auth(&self) -> bool {
        if self.auth().require_auth() {
            return true;
        }
        self.auth_prompted.store(true, Ordering::Relaxed);
        false
    }

    /// Whether something done through this `Api` (or a clone of it) opened
    /// the auth modal: a signed-out protected action or a 401.
    pub fn auth_prompted(&self) -> bool {
        self.auth_prompted.load(Ordering::Relaxed)
    }

    pub async fn request<T, F>(&self, call: F) -> Option<T>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        match call.await {
            Ok(value) => Some(value),
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    /// Surface a failure to the user.
    pub fn report(&self, error: &ApiError) {
        tracing::warn!("Request failed: {}", error);
        if error.is_unauthorized() {
            self.auth().set_show_auth_modal(true);
            self.auth_prompted.store(true, Ordering::Relaxed);
        }
        self.toaster.push(Toast::error(error.toast_message()));
    }
}
