//! # Culinary Compass
//!
//! Client side of the Culinary Compass recipe-sharing site: browse, filter,
//! create, rate and favorite recipes, with token authentication gating the
//! write actions.
//!
//! ## Layers
//!
//! - [`client`] - Typed HTTP client for the REST API, plus the shared
//!   [`client::AuthContext`] and persistent token storage
//! - [`api`] - Request wrapper that turns failures into toasts and opens the
//!   auth modal on 401
//! - [`search`] - The in-memory filter / sort / paginate pipeline
//! - [`pages`] - One model per page: home, recipe browser, recipe detail,
//!   add-recipe form, auth form, profile
//! - [`toast`] - Notification queue
//! - [`server`] - MCP server exposing the pages as tools
//! - [`config`] - Environment configuration
//!
//! ## Quick Start
//!
//! ```no_run
//! use culinary_compass::config::Config;
//! use culinary_compass::pages::recipes::RecipeBrowser;
//! use culinary_compass::client::Difficulty;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let api = Config::from_env()?.build_api();
//!
//! let mut browser = RecipeBrowser::new(api.clone());
//! browser.load().await;
//! browser.set_difficulty(Some(Difficulty::Easy));
//! println!("Found {} easy recipes", browser.found_count());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod pages;
pub mod search;
pub mod server;
pub mod toast;

pub use api::Api;
pub use client::RecipeClient;
pub use server::CompassMcpServer;
