//! Login and registration.
//!
//! One form serves both modes; a successful submit stores the token in the
//! shared [`crate::client::AuthContext`].

use crate::api::Api;
use crate::pages::Route;
use crate::toast::Toast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

/// Login / registration form, used both as a page and as the auth modal.
#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub username: String,
    pub email: String,
    pub password: String,
    pub(crate) loading: bool,
}

impl AuthForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register() -> Self {
        Self {
            mode: AuthMode::Register,
            ..Self::default()
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            AuthMode::Login => "Welcome Back!",
            AuthMode::Register => "Join Culinary Compass",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match (self.mode, self.loading) {
            (AuthMode::Login, false) => "Login",
            (AuthMode::Login, true) => "Logging in...",
            (AuthMode::Register, false) => "Register",
            (AuthMode::Register, true) => "Registering...",
        }
    }

    /// Required-field checks. Returns the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.mode == AuthMode::Register && self.username.trim().is_empty() {
            return Err("Username is required".to_string());
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err("Email is required".to_string());
        }
        if !email.contains('@') {
            return Err("Please enter a valid email address".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        Ok(())
    }

    /// Send the credentials. On success the token is stored in the auth
    /// context, a welcome toast is raised and the home route is returned.
    pub async fn submit(&mut self, api: &Api) -> Option<Route> {
        if let Err(message) = self.validate() {
            api.toaster().push(Toast::error(message));
            return None;
        }

        self.loading = true;
        let email = self.email.trim();
        let response = match self.mode {
            AuthMode::Login => {
                api.request(api.client().login(email, &self.password))
                    .await
            }
            AuthMode::Register => {
                api.request(api.client().register(self.username.trim(), email, &self.password))
                    .await
            }
        };
        self.loading = false;

        let response = response.filter(|r| !r.token.is_empty())?;
        let username = response
            .username
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| self.username.trim().to_string());

        api.auth().login(response.token, username.clone());
        api.toaster().toast("Success!", format!("Welcome, {}!", username));
        Some(Route::Home)
    }
}
