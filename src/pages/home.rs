//! Landing page.

use crate::api::Api;
use crate::client::types::Recipe;
use crate::pages::{PageState, RecipeCard};

/// Landing page: the full recipe grid with a retry on failure.
#[derive(Debug)]
pub struct HomePage {
    api: Api,
    state: PageState<Vec<Recipe>>,
}

impl HomePage {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            state: PageState::Loading,
        }
    }

    pub fn state(&self) -> &PageState<Vec<Recipe>> {
        &self.state
    }

    pub async fn load(&mut self) {
        self.state = PageState::Loading;
        self.state = match self.api.request(self.api.client().list_recipes()).await {
            Some(recipes) => PageState::Ready(recipes),
            None => PageState::Failed,
        };
    }

    pub async fn retry(&mut self) {
        self.load().await;
    }

    pub fn cards(&self, asset_base: &str) -> Vec<RecipeCard> {
        self.state
            .ready()
            .map(|recipes| {
                recipes
                    .iter()
                    .map(|r| RecipeCard::from_recipe(r, asset_base))
                    .collect()
            })
            .unwrap_or_default()
    }
}
