//! The "explore all recipes" page: one fetch, then everything happens in
//! memory through [`crate::search`].

use crate::api::Api;
use crate::client::types::{Difficulty, Recipe};
use crate::pages::{PageState, RecipeCard};
use crate::search::{self, RangeFilter, RecipeQuery, SortOption};

/// A single removable criterion, as shown in the active-filter chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Search,
    Time,
    Calories,
    Difficulty,
    Stars,
}

/// # Recipe Browser
///
/// Holds the full collection and the current [`RecipeQuery`]. Every change
/// to the query sends the user back to page 1, so a narrowed result never
/// leaves them stranded on a page that no longer exists.
#[derive(Debug)]
pub struct RecipeBrowser {
    api: Api,
    state: PageState<Vec<Recipe>>,
    query: RecipeQuery,
    current_page: usize,
}

impl RecipeBrowser {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            state: PageState::Loading,
            query: RecipeQuery::default(),
            current_page: 1,
        }
    }

    /// Build a browser over an already fetched collection.
    pub fn with_recipes(api: Api, recipes: Vec<Recipe>) -> Self {
        Self {
            state: PageState::Ready(recipes),
            ..Self::new(api)
        }
    }

    pub async fn load(&mut self) {
        self.state = PageState::Loading;
        self.state = match self.api.request(self.api.client().list_recipes()).await {
            Some(recipes) => {
                tracing::debug!("Recipe browser loaded {} recipes", recipes.len());
                PageState::Ready(recipes)
            }
            None => PageState::Failed,
        };
        self.current_page = 1;
    }

    pub fn state(&self) -> &PageState<Vec<Recipe>> {
        &self.state
    }

    pub fn query(&self) -> &RecipeQuery {
        &self.query
    }

    fn all(&self) -> &[Recipe] {
        self.state.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every recipe matching the query, sorted, before pagination.
    pub fn filtered(&self) -> Vec<&Recipe> {
        self.query.apply(self.all())
    }

    pub fn found_count(&self) -> usize {
        self.filtered().len()
    }

    pub fn total_pages(&self) -> usize {
        search::total_pages(self.found_count())
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// The recipes on the current page.
    pub fn visible(&self) -> Vec<&Recipe> {
        let filtered = self.filtered();
        search::paginate(&filtered, self.current_page).to_vec()
    }

    pub fn visible_cards(&self, asset_base: &str) -> Vec<RecipeCard> {
        self.visible()
            .into_iter()
            .map(|r| RecipeCard::from_recipe(r, asset_base))
            .collect()
    }

    /// Move to `page` if it exists. Returns whether the page changed.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.total_pages() {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.current_page + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        self.current_page > 1 && self.go_to_page(self.current_page - 1)
    }

    fn update(&mut self, change: impl FnOnce(&mut RecipeQuery)) {
        change(&mut self.query);
        self.current_page = 1;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        self.update(|q| q.search = search);
    }

    pub fn set_time_filter(&mut self, range: Option<RangeFilter>) {
        self.update(|q| q.time = range);
    }

    pub fn set_calories_filter(&mut self, range: Option<RangeFilter>) {
        self.update(|q| q.calories = range);
    }

    pub fn set_difficulty(&mut self, difficulty: Option<Difficulty>) {
        self.update(|q| q.difficulty = difficulty);
    }

    /// Pick a minimum star rating. Picking the current value again clears
    /// it. Values above 5 are capped.
    pub fn set_min_rating(&mut self, stars: u8) {
        let stars = stars.min(5);
        self.update(|q| q.min_rating = if q.min_rating == stars { 0 } else { stars });
    }

    pub fn set_sort(&mut self, sort: Option<SortOption>) {
        self.update(|q| q.sort = sort);
    }

    /// Replace the whole query at once.
    pub fn set_query(&mut self, query: RecipeQuery) {
        self.update(|q| *q = query);
    }

    pub fn clear_filter(&mut self, kind: FilterKind) {
        self.update(|q| match kind {
            FilterKind::Search => q.search.clear(),
            FilterKind::Time => q.time = None,
            FilterKind::Calories => q.calories = None,
            FilterKind::Difficulty => q.difficulty = None,
            FilterKind::Stars => q.min_rating = 0,
        });
    }

    pub fn clear_filters(&mut self) {
        self.update(|q| *q = RecipeQuery::default());
        self.api.toaster().toast(
            "Filters Cleared",
            "All search and filter criteria have been removed.",
        );
    }

    pub fn has_active_filters(&self) -> bool {
        !self.query.is_empty()
    }

    /// Labels for the active-filter chips, in display order.
    pub fn active_filters(&self) -> Vec<(FilterKind, String)> {
        let q = &self.query;
        let mut chips = Vec::new();
        if !q.search.trim().is_empty() {
            chips.push((FilterKind::Search, format!("Search: {}", q.search)));
        }
        if let Some(time) = &q.time {
            chips.push((FilterKind::Time, format!("Time: {} min", time)));
        }
        if let Some(calories) = &q.calories {
            chips.push((FilterKind::Calories, format!("Calories: {} kcal", calories)));
        }
        if let Some(difficulty) = q.difficulty {
            chips.push((
                FilterKind::Difficulty,
                format!("Difficulty: {}", difficulty.as_str().to_lowercase()),
            ));
        }
        if q.min_rating > 0 {
            chips.push((FilterKind::Stars, format!("Rating: {} Stars", q.min_rating)));
        }
        chips
    }
}
