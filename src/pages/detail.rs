//! A single recipe page. Reading is open to everyone; favoriting and
//! rating need a token.

use crate::api::Api;
use crate::client::types::Recipe;
use crate::pages::{PageState, StarDisplay};
use crate::toast::Toast;

/// A single recipe, with the two write actions a reader can take on it.
#[derive(Debug)]
pub struct RecipeDetailPage {
    api: Api,
    state: PageState<Recipe>,
    is_favorite: bool,
}

impl RecipeDetailPage {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            state: PageState::Loading,
            is_favorite: false,
        }
    }

    pub fn state(&self) -> &PageState<Recipe> {
        &self.state
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        self.state.ready()
    }

    pub fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    pub async fn load(&mut self, id: &str) {
        self.state = PageState::Loading;
        self.is_favorite = false;

        if id.trim().is_empty() {
            tracing::debug!("Recipe detail opened without an id");
            self.state = PageState::Failed;
            return;
        }

        self.state = match self.api.request(self.api.client().get_recipe(id)).await {
            Some(recipe) => PageState::Ready(recipe),
            None => PageState::Failed,
        };

        if self.state.ready().is_some() && self.api.auth().is_authenticated() {
            // Favorite status is a nicety; failing to fetch it is not worth
            // a toast.
            match self.api.client().get_profile().await {
                Ok(profile) => self.is_favorite = profile.has_favorite(id),
                Err(e) => tracing::debug!("Could not load favorites for recipe {}: {}", id, e),
            }
        }
    }

    /// Add or remove the recipe from the user's favorites.
    ///
    /// Returns the new favorite state, or `None` when nothing changed.
    pub async fn toggle_favorite(&mut self) -> Option<bool> {
        let id = self.recipe()?.id.clone();
        if !self.api.require_auth() {
            return None;
        }

        let client = self.api.client();
        let done = if self.is_favorite {
            self.api.request(client.remove_favorite(&id)).await
        } else {
            self.api.request(client.add_favorite(&id)).await
        };
        done?;

        self.is_favorite = !self.is_favorite;
        let message = if self.is_favorite {
            "Added to favorites"
        } else {
            "Removed from favorites"
        };
        self.api.toaster().toast(message, self.recipe().map(|r| r.title.clone()).unwrap_or_default());
        Some(self.is_favorite)
    }

    /// Submit a 1-5 star rating. Returns the average shown afterwards.
    pub async fn rate(&mut self, stars: u8) -> Option<f64> {
        let id = self.recipe()?.id.clone();
        if !self.api.require_auth() {
            return None;
        }
        if !(1..=5).contains(&stars) {
            self.api
                .toaster()
                .push(Toast::error("Please choose between 1 and 5 stars."));
            return None;
        }

        let response = self.api.request(self.api.client().rate_recipe(&id, stars)).await?;

        let recipe = self.state.ready_mut()?;
        if let Some(average) = response.average_rating {
            recipe.average_rating = average;
        }
        let average = recipe.average_rating;
        self.api
            .toaster()
            .toast("Thanks for rating!", format!("You gave this recipe {} stars.", stars));
        Some(average)
    }

    pub fn stars(&self) -> StarDisplay {
        StarDisplay::from_rating(self.recipe().map_or(0.0, |r| r.average_rating))
    }

    pub fn rating_label(&self) -> String {
        format!("{:.1} / 5", self.recipe().map_or(0.0, |r| r.average_rating))
    }

    pub fn image_url(&self, asset_base: &str) -> Option<String> {
        self.recipe()?.image_url(asset_base)
    }
}
