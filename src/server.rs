use std::future::Future;
use std::path::PathBuf;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::*,
    schemars,
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use serde_json::{json, Value};

use crate::api::Api;
use crate::client::{Difficulty, RecipeClient};
use crate::config::DEFAULT_ASSET_URL;
use crate::pages::{
    add_recipe::RecipeForm,
    auth_form::{AuthForm, AuthMode},
    detail::RecipeDetailPage,
    profile::ProfilePage,
    recipes::RecipeBrowser,
    PageState, RecipeCard,
};
use crate::search::{RangeFilter, RecipeQuery, SortOption, CALORIE_PRESETS, TIME_PRESETS};
use crate::toast::Toaster;

// Parameter structs for tools
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct ListRecipesParams {
    /// Matched against titles and ingredients
    #[serde(default)]
    pub search: Option<String>,
    /// Cooking time in minutes: "1-15", "15-30", "30-60" or "60" (60 and up)
    #[serde(default)]
    pub time: Option<String>,
    /// Calories: "1-300", "300-600", "600-1000" or "1000" (1000 and up)
    #[serde(default)]
    pub calories: Option<String>,
    /// easy, medium or hard
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Minimum average rating, 1-5
    #[serde(default)]
    pub min_rating: Option<u8>,
    /// rating, time-asc or calories-asc
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default = "default_page")]
    pub page: usize,
}

fn default_page() -> usize {
    1
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct RecipeIdParams {
    pub id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct RateRecipeParams {
    pub id: String,
    /// 1 to 5 stars
    pub stars: u8,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateRecipeParams {
    pub title: String,
    pub description: String,
    pub cuisine: String,
    pub diet: String,
    /// Minutes
    pub cooking_time: u32,
    /// Kilocalories
    pub calories: u32,
    #[serde(default)]
    pub difficulty: Option<String>,
    pub ingredients: Vec<String>,
    pub preparation_steps: Vec<String>,
    /// Local path of a PNG, JPG, GIF or WEBP image, up to 10MB
    #[serde(default)]
    pub image_path: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct LoginParams {
    pub email: String,
    pub password: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct RegisterParams {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl ListRecipesParams {
    fn into_query(self) -> Result<(RecipeQuery, usize), String> {
        let parse_range = |raw: Option<String>| -> Result<Option<RangeFilter>, String> {
            raw.filter(|r| !r.trim().is_empty())
                .map(|r| r.parse::<RangeFilter>())
                .transpose()
        };

        let difficulty = self
            .difficulty
            .filter(|d| !d.trim().is_empty())
            .map(|d| d.parse::<Difficulty>())
            .transpose()?;
        let sort = self
            .sort
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<SortOption>())
            .transpose()?;

        let query = RecipeQuery {
            search: self.search.unwrap_or_default(),
            time: parse_range(self.time)?,
            calories: parse_range(self.calories)?,
            difficulty,
            min_rating: self.min_rating.unwrap_or(0).min(5),
            sort,
        };
        Ok((query, self.page))
    }
}

#[derive(Clone)]
pub struct CompassMcpServer {
    client: RecipeClient,
    asset_url: String,
    tool_router: ToolRouter<CompassMcpServer>,
}

#[tool_router]
impl CompassMcpServer {
    pub fn new(client: RecipeClient) -> Self {
        Self {
            client,
            asset_url: DEFAULT_ASSET_URL.to_string(),
            tool_router: Self::tool_router(),
        }
    }

    pub fn with_asset_url(mut self, asset_url: String) -> Self {
        self.asset_url = asset_url;
        self
    }

    /// A fresh [`Api`] per tool call, so each result only carries the
    /// toasts that call raised. The auth context is shared.
    fn api(&self) -> Api {
        Api::new(self.client.clone(), Toaster::new())
    }

    fn respond(&self, api: &Api, success: bool, mut body: Value) -> Result<CallToolResult, McpError> {
        if let Value::Object(map) = &mut body {
            map.insert("toasts".to_string(), json!(api.toaster().drain()));
            map.insert("show_auth_modal".to_string(), json!(api.auth_prompted()));
        }
        let text = serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string());

        if success {
            Ok(CallToolResult::success(vec![Content::text(text)]))
        } else {
            Ok(CallToolResult::error(vec![Content::text(text)]))
        }
    }

    /// Check that the recipe API answers. Used at startup.
    pub async fn test_api_access(&self) -> Result<usize, crate::client::ApiError> {
        let recipes = self.client.list_recipes().await?;
        Ok(recipes.len())
    }

    fn detail_json(&self, page: &RecipeDetailPage) -> Value {
        match page.recipe() {
            Some(recipe) => json!({
                "id": recipe.id,
                "title": recipe.title,
                "description": recipe.description,
                "image": recipe.image_url(&self.asset_url),
                "ingredients": recipe.ingredients,
                "preparation_steps": recipe.preparation_steps,
                "cooking_time": recipe.cooking_time,
                "calories": recipe.calories,
                "difficulty": recipe.difficulty.map(|d| d.to_string()),
                "cuisine": recipe.cuisine,
                "diet": recipe.diet,
                "author": recipe.author_name().map(str::to_string),
                "average_rating": recipe.average_rating,
                "rating_label": page.rating_label(),
                "stars": page.stars(),
                "is_favorite": page.is_favorite(),
                "created": recipe.created_at,
                "updated": recipe.updated_at,
            }),
            None => json!({
                "error": "Recipe Not Found",
                "message": "The recipe you are looking for might not exist or has been moved."
            }),
        }
    }

    // Recipe tools
    #[tool(description = "Browse all recipes with text search, cooking time, calorie, difficulty and rating filters, sorting and pagination (12 per page)")]
    async fn list_recipes(
        &self,
        Parameters(params): Parameters<ListRecipesParams>,
    ) -> Result<CallToolResult, McpError> {
        let api = self.api();

        let (query, page) = match params.into_query() {
            Ok(parsed) => parsed,
            Err(e) => {
                let error = json!({
                    "error": "Invalid filter",
                    "details": e
                });
                return self.respond(&api, false, error);
            }
        };

        let mut browser = RecipeBrowser::new(api.clone());
        browser.load().await;
        if browser.state().is_failed() {
            let error = json!({
                "error": "Oops!",
                "message": "We couldn't retrieve the recipes. Please try again."
            });
            return self.respond(&api, false, error);
        }

        browser.set_query(query);
        if page != 1 && !browser.go_to_page(page) {
            tracing::debug!("Requested page {} is out of range", page);
            let error = json!({
                "error": "Page out of range",
                "details": format!("page {} requested, {} recipes found on {} page(s)", page, browser.found_count(), browser.total_pages()),
                "total_pages": browser.total_pages()
            });
            return self.respond(&api, false, error);
        }

        let cards: Vec<RecipeCard> = browser.visible_cards(&self.asset_url);
        let active: Vec<String> = browser.active_filters().into_iter().map(|(_, label)| label).collect();
        let message = (browser.found_count() == 0).then_some("No recipes match your filter criteria.");
        let difficulties = Difficulty::ALL.map(|d| d.as_str());
        let sorts = SortOption::ALL.map(|s| s.as_str());
        let result = json!({
            "recipes": cards,
            "found": browser.found_count(),
            "page": browser.current_page(),
            "total_pages": browser.total_pages(),
            "active_filters": active,
            "message": message,
            "filter_options": {
                "time": TIME_PRESETS,
                "calories": CALORIE_PRESETS,
                "difficulty": difficulties,
                "sort": sorts
            }
        });
        self.respond(&api, true, result)
    }

    #[tool(description = "Get a recipe with its ingredients, preparation steps, rating and favorite status")]
    async fn get_recipe(
        &self,
        Parameters(params): Parameters<RecipeIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let api = self.api();
        let mut page = RecipeDetailPage::new(api.clone());
        page.load(&params.id).await;

        let found = page.recipe().is_some();
        let body = self.detail_json(&page);
        self.respond(&api, found, body)
    }

    #[tool(description = "Share a new recipe (requires login)")]
    async fn create_recipe(
        &self,
        Parameters(params): Parameters<CreateRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        let api = self.api();

        let difficulty = match params.difficulty.as_deref().map(str::parse::<Difficulty>) {
            Some(Ok(d)) => d,
            Some(Err(e)) => {
                return self.respond(&api, false, json!({ "error": "Invalid difficulty", "details": e }));
            }
            None => Difficulty::default(),
        };

        let form = RecipeForm {
            title: params.title,
            description: params.description,
            cuisine: params.cuisine,
            diet: params.diet,
            cooking_time: params.cooking_time.to_string(),
            calories: params.calories.to_string(),
            difficulty,
            ingredients: params.ingredients.join("\n"),
            preparation_steps: params.preparation_steps.join("\n"),
            image: params.image_path.map(PathBuf::from),
        };

        match form.submit(&api).await {
            Some(route) => {
                let result = json!({
                    "success": true,
                    "path": route.path(),
                    "message": "Recipe created successfully"
                });
                self.respond(&api, true, result)
            }
            None => self.respond(&api, false, json!({ "error": "Failed to create recipe", "success": false })),
        }
    }

    #[tool(description = "Rate a recipe from 1 to 5 stars (requires login)")]
    async fn rate_recipe(
        &self,
        Parameters(params): Parameters<RateRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        let api = self.api();
        let mut page = RecipeDetailPage::new(api.clone());
        page.load(&params.id).await;

        match page.rate(params.stars).await {
            Some(average) => {
                let result = json!({
                    "id": params.id,
                    "average_rating": average,
                    "rating_label": page.rating_label(),
                    "success": true
                });
                self.respond(&api, true, result)
            }
            None => self.respond(&api, false, json!({ "error": "Failed to rate recipe", "id": params.id })),
        }
    }

    #[tool(description = "Add a recipe to favorites, or remove it if it is already a favorite (requires login)")]
    async fn toggle_favorite(
        &self,
        Parameters(params): Parameters<RecipeIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let api = self.api();
        let mut page = RecipeDetailPage::new(api.clone());
        page.load(&params.id).await;

        match page.toggle_favorite().await {
            Some(is_favorite) => self.respond(
                &api,
                true,
                json!({ "id": params.id, "is_favorite": is_favorite, "success": true }),
            ),
            None => self.respond(&api, false, json!({ "error": "Failed to update favorites", "id": params.id })),
        }
    }

    // Account tools
    #[tool(description = "Log in with email and password")]
    async fn login(
        &self,
        Parameters(params): Parameters<LoginParams>,
    ) -> Result<CallToolResult, McpError> {
        let api = self.api();
        let mut form = AuthForm {
            mode: AuthMode::Login,
            email: params.email,
            password: params.password,
            ..AuthForm::default()
        };

        match form.submit(&api).await {
            Some(route) => {
                let result = json!({
                    "success": true,
                    "username": api.auth().username(),
                    "path": route.path()
                });
                self.respond(&api, true, result)
            }
            None => self.respond(&api, false, json!({ "error": "Login failed", "success": false })),
        }
    }

    #[tool(description = "Create an account and log in")]
    async fn register(
        &self,
        Parameters(params): Parameters<RegisterParams>,
    ) -> Result<CallToolResult, McpError> {
        let api = self.api();
        let mut form = AuthForm {
            mode: AuthMode::Register,
            username: params.username,
            email: params.email,
            password: params.password,
            ..AuthForm::default()
        };

        match form.submit(&api).await {
            Some(route) => {
                let result = json!({
                    "success": true,
                    "username": api.auth().username(),
                    "path": route.path()
                });
                self.respond(&api, true, result)
            }
            None => self.respond(&api, false, json!({ "error": "Registration failed", "success": false })),
        }
    }

    #[tool(description = "Log out and forget the stored token")]
    async fn logout(&self) -> Result<CallToolResult, McpError> {
        let api = self.api();
        api.auth().logout();
        self.respond(&api, true, json!({ "success": true, "authenticated": false }))
    }

    #[tool(description = "Show whether a user is logged in")]
    async fn auth_status(&self) -> Result<CallToolResult, McpError> {
        let api = self.api();
        let auth = api.auth();
        let result = json!({
            "authenticated": auth.is_authenticated(),
            "username": auth.username(),
            "token_preview": auth.token_preview()
        });
        self.respond(&api, true, result)
    }

    #[tool(description = "Get the logged-in user's profile with their own recipes and favorites (requires login)")]
    async fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let api = self.api();
        let mut page = ProfilePage::new(api.clone());
        page.load().await;

        match page.state() {
            PageState::Ready(profile) => {
                let result = json!({
                    "username": profile.username,
                    "email": profile.email,
                    "recipes": page.recipe_cards(&self.asset_url),
                    "favorites": page.favorite_cards(&self.asset_url)
                });
                self.respond(&api, true, result)
            }
            _ => {
                let error = json!({
                    "error": "Profile unavailable",
                    "message": page.message()
                });
                self.respond(&api, false, error)
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for CompassMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some("This server lets you use the Culinary Compass recipe-sharing site: browse and filter recipes, read a recipe, and, once logged in, share new recipes, rate them and keep favorites. Every result lists the notifications the action raised under \"toasts\"; \"show_auth_modal\": true means the action needs you to log in first.".to_string()),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        Ok(self.get_info())
    }
}
