//! The signed-in user's profile, a protected page.

use crate::api::Api;
use crate::client::types::UserProfile;
use crate::pages::{PageState, RecipeCard};

pub const SIGNED_OUT_MESSAGE: &str = "Please log in to view your profile.";

/// The signed-in user's own recipes and favorites.
#[derive(Debug)]
pub struct ProfilePage {
    api: Api,
    state: PageState<UserProfile>,
}

impl ProfilePage {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            state: PageState::Loading,
        }
    }

    pub fn state(&self) -> &PageState<UserProfile> {
        &self.state
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.state.ready()
    }

    /// Protected: signed out, this opens the auth modal and fails without a
    /// request.
    pub async fn load(&mut self) {
        if !self.api.require_auth() {
            self.state = PageState::Failed;
            return;
        }

        self.state = PageState::Loading;
        self.state = match self.api.request(self.api.client().get_profile()).await {
            Some(profile) => PageState::Ready(profile),
            None => PageState::Failed,
        };
    }

    pub fn message(&self) -> Option<&'static str> {
        self.state.is_failed().then_some(SIGNED_OUT_MESSAGE)
    }

    pub fn recipe_cards(&self, asset_base: &str) -> Vec<RecipeCard> {
        self.profile()
            .map(|p| p.recipes.iter().map(|r| RecipeCard::from_recipe(r, asset_base)).collect())
            .unwrap_or_default()
    }

    pub fn favorite_cards(&self, asset_base: &str) -> Vec<RecipeCard> {
        self.profile()
            .map(|p| p.favorites.iter().map(|r| RecipeCard::from_recipe(r, asset_base)).collect())
            .unwrap_or_default()
    }
}
