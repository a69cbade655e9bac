//! # Culinary Compass HTTP Client
//!
//! This module provides a typed HTTP client for the recipe-sharing REST API:
//! recipes, ratings, favorites, profiles and authentication.
//!
//! ## Modules
//!
//! - [`auth`] - Shared auth context: token, username and auth-modal visibility
//! - [`client`] - Main HTTP client implementation with all API methods
//! - [`error`] - The [`ApiError`] taxonomy
//! - [`store`] - Persistent token storage
//! - [`types`] - Type definitions for API requests and responses
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use culinary_compass::client::{AuthContext, MemoryTokenStore, RecipeClient};
//!
//! # async fn example() -> Result<(), culinary_compass::client::ApiError> {
//! let auth = AuthContext::load(Arc::new(MemoryTokenStore::new()));
//! let client = RecipeClient::new("http://localhost:5000/api".to_string(), auth.clone());
//!
//! let session = client.login("ana@example.com", "hunter2").await?;
//! auth.login(session.token, session.username.unwrap_or_default());
//!
//! let recipes = client.list_recipes().await?;
//! println!("Found {} recipes", recipes.len());
//! # Ok(())
//! # }
//! ```

pub mod auth;
#[allow(clippy::module_inception)]
pub mod client;
pub mod error;
pub mod store;
pub mod types;

pub use auth::AuthContext;
pub use client::{AuthScheme, RecipeClient};
pub use error::ApiError;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use types::*;
