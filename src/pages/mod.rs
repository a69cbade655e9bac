//! # Page Models
//!
//! One model per page of the application. A page model owns the data it
//! fetched and its local UI state, and exposes the actions a user can take.
//! None of them render anything; the MCP server turns their state into tool
//! results.
//!
//! ## Pages
//!
//! - [`home::HomePage`] - Landing grid of recipes
//! - [`recipes::RecipeBrowser`] - Search, filter, sort and paginate every recipe
//! - [`detail::RecipeDetailPage`] - One recipe, with favorite and rating actions
//! - [`add_recipe::RecipeForm`] - Create a recipe (protected)
//! - [`auth_form::AuthForm`] - Log in or register
//! - [`profile::ProfilePage`] - Own recipes and favorites (protected)

pub mod add_recipe;
pub mod auth_form;
pub mod detail;
pub mod home;
pub mod profile;
pub mod recipes;

use serde::Serialize;

use crate::client::types::Recipe;

/// Data-fetching lifecycle shared by every page that loads on open.
#[derive(Debug, Clone, PartialEq)]
pub enum PageState<T> {
    Loading,
    Failed,
    Ready(T),
}

impl<T> PageState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, PageState::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PageState::Failed)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            PageState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            PageState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Navigation targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Recipes,
    Recipe(String),
    Auth,
    AddRecipe,
    Profile,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Recipes => "/recipes".to_string(),
            Route::Recipe(id) => format!("/recipe/{}", id),
            Route::Auth => "/auth".to_string(),
            Route::AddRecipe => "/add-recipe".to_string(),
            Route::Profile => "/profile".to_string(),
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        match path {
            "" => Some(Route::Home),
            "/recipes" => Some(Route::Recipes),
            "/auth" => Some(Route::Auth),
            "/add-recipe" => Some(Route::AddRecipe),
            "/profile" => Some(Route::Profile),
            _ => path
                .strip_prefix("/recipe/")
                .filter(|id| !id.is_empty() && !id.contains('/'))
                .map(|id| Route::Recipe(id.to_string())),
        }
    }

    /// Pages that need a token; opening one signed out brings up the auth
    /// modal instead.
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::AddRecipe | Route::Profile)
    }
}

/// What a recipe looks like in a grid: title, image and a one-decimal
/// rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeCard {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
    pub rating: f64,
    pub rating_label: String,
    pub filled_stars: u8,
    pub cooking_time: Option<u32>,
    pub calories: Option<u32>,
    pub difficulty: Option<String>,
    pub author: Option<String>,
}

impl RecipeCard {
    pub fn from_recipe(recipe: &Recipe, asset_base: &str) -> Self {
        let rating = (recipe.average_rating * 10.0).round() / 10.0;
        let rating_label = if rating > 0.0 {
            format!("{}/5", rating)
        } else {
            "No ratings yet".to_string()
        };

        Self {
            id: recipe.id.clone(),
            title: recipe.title.clone(),
            image: recipe.image_url(asset_base),
            rating,
            rating_label,
            filled_stars: rating.floor().clamp(0.0, 5.0) as u8,
            cooking_time: recipe.cooking_time,
            calories: recipe.calories,
            difficulty: recipe.difficulty.map(|d| d.to_string()),
            author: recipe.author_name().map(str::to_string),
        }
    }
}

/// Five-star rendering of an average rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StarDisplay {
    pub full: u8,
    pub half: bool,
    pub empty: u8,
}

impl StarDisplay {
    pub fn from_rating(rating: f64) -> Self {
        let rating = rating.clamp(0.0, 5.0);
        let full = rating.floor() as u8;
        let half = rating.fract() > 0.0;
        let empty = 5 - full - u8::from(half);
        Self { full, half, empty }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn routes_round_trip_and_protect_write_pages() {
        for route in [
            Route::Home,
            Route::Recipes,
            Route::Recipe("abc".to_string()),
            Route::Auth,
            Route::AddRecipe,
            Route::Profile,
        ] {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
        assert_eq!(Route::parse("/recipe/"), None);
        assert_eq!(Route::parse("/nowhere"), None);
        assert!(Route::AddRecipe.is_protected());
        assert!(Route::Profile.is_protected());
        assert!(!Route::Recipe("x".to_string()).is_protected());
    }

    #[test]
    fn stars_always_total_five() {
        assert_eq!(StarDisplay::from_rating(3.5), StarDisplay { full: 3, half: true, empty: 1 });
        assert_eq!(StarDisplay::from_rating(4.0), StarDisplay { full: 4, half: false, empty: 1 });
        assert_eq!(StarDisplay::from_rating(0.0), StarDisplay { full: 0, half: false, empty: 5 });
        assert_eq!(StarDisplay::from_rating(7.0), StarDisplay { full: 5, half: false, empty: 0 });
    }

    #[test]
    fn card_rounds_rating_and_labels_unrated() {
        let mut recipe: Recipe = serde_json::from_value(serde_json::json!({
            "_id": "1", "title": "Tea", "image": "/uploads/tea.png", "averageRating": 4.26
        }))
        .unwrap();
        let card = RecipeCard::from_recipe(&recipe, "http://localhost:5000");
        assert_eq!(card.rating, 4.3);
        assert_eq!(card.rating_label, "4.3/5");
        assert_eq!(card.filled_stars, 4);
        assert_eq!(card.image.as_deref(), Some("http://localhost:5000/uploads/tea.png"));

        recipe.average_rating = 0.0;
        let card = RecipeCard::from_recipe(&recipe, "http://localhost:5000");
        assert_eq!(card.rating_label, "No ratings yet");
    }
}
