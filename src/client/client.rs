use std::time::Duration;

use reqwest::{multipart, Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::client::{
    auth::AuthContext,
    error::ApiError,
    types::*,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How the token is attached to outgoing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>`
    #[default]
    Bearer,
    /// `x-auth-token: <token>`, for backends that predate bearer auth
    XAuthToken,
}

impl std::str::FromStr for AuthScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bearer" => Ok(AuthScheme::Bearer),
            "x-auth-token" => Ok(AuthScheme::XAuthToken),
            other => Err(format!("unknown auth header scheme '{}'", other)),
        }
    }
}

#[derive(Clone)]
pub struct RecipeClient {
    base_url: String,
    client: Client,
    auth: AuthContext,
    scheme: AuthScheme,
    timeout: Duration,
}

impl RecipeClient {
    pub fn new(base_url: String, auth: AuthContext) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            auth,
            scheme: AuthScheme::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the token if there is one. Reads are allowed anonymously.
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.auth.token() {
            Some(token) => match self.scheme {
                AuthScheme::Bearer => builder.bearer_auth(token),
                AuthScheme::XAuthToken => builder.header("x-auth-token", token),
            },
            None => builder,
        }
    }

    /// Like [`Self::authorize`] but fails up front when signed out, so write
    /// actions never reach the network without a token.
    fn authorize_required(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        if !self.auth.is_authenticated() {
            tracing::error!("Attempted to make authenticated request without a token");
            return Err(ApiError::NotAuthenticated);
        }
        Ok(self.authorize(builder))
    }

    async fn execute(&self, builder: RequestBuilder, action: &str) -> Result<reqwest::Response, ApiError> {
        let response = builder
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Network error while trying to {}: {}", action, e);
                ApiError::from_transport(e)
            })?;

        let status = response.status();
        tracing::debug!("{} response status: {}", action, status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.msg)
                .filter(|m| !m.trim().is_empty());
            tracing::error!("Failed to {} with status {}: {}", action, status, body);
            return Err(ApiError::from_status(status, message));
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder, action: &str) -> Result<T, ApiError> {
        let response = self.execute(builder, action).await?;
        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse response to {}: {}", action, e);
            ApiError::Decode(e.to_string())
        })
    }

    // Recipe operations
    pub async fn list_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        let url = self.url("/recipes");
        tracing::debug!("Fetching recipes from: {}", url);

        let listing: RecipeListing = self
            .send_json(self.authorize(self.client.get(&url)), "list recipes")
            .await?;
        let recipes = listing.into_recipes();

        tracing::debug!("Fetched {} recipes", recipes.len());
        Ok(recipes)
    }

    pub async fn get_recipe(&self, id: &str) -> Result<Recipe, ApiError> {
        let url = self.url(&format!("/recipes/{}", urlencoding::encode(id)));
        tracing::debug!("Fetching recipe from: {}", url);

        self.send_json(self.authorize(self.client.get(&url)), "get recipe")
            .await
    }

    pub async fn create_recipe(&self, recipe: NewRecipe) -> Result<Recipe, ApiError> {
        let url = self.url("/recipes");
        let form = recipe_form(recipe)?;

        let builder = self.authorize_required(self.client.post(&url).multipart(form))?;
        let created: Recipe = self.send_json(builder, "create recipe").await?;

        tracing::info!("Created recipe {} ({})", created.title, created.id);
        Ok(created)
    }

    pub async fn rate_recipe(&self, id: &str, rating: u8) -> Result<RateResponse, ApiError> {
        if !(1..=5).contains(&rating) {
            return Err(ApiError::InvalidInput(format!(
                "Rating must be between 1 and 5 stars, got {}",
                rating
            )));
        }

        let url = self.url(&format!("/recipes/{}/rate", urlencoding::encode(id)));
        let builder = self.authorize_required(self.client.post(&url).json(&RateRequest { rating }))?;
        let response = self.execute(builder, "rate recipe").await?;

        // The answer is informational; an empty or unexpected body still
        // means the rating was recorded.
        let body = response.text().await.unwrap_or_default();
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    // Auth operations
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let url = self.url("/auth/login");
        tracing::info!("Attempting login for: {}", email);

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send_json(self.client.post(&url).json(&request), "log in")
            .await
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let url = self.url("/auth/register");
        tracing::info!("Attempting registration for: {}", username);

        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send_json(self.client.post(&url).json(&request), "register")
            .await
    }

    // User operations
    pub async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        let url = self.url("/users/profile");
        let builder = self.authorize_required(self.client.get(&url))?;
        self.send_json(builder, "get profile").await
    }

    pub async fn add_favorite(&self, recipe_id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/users/favorites/{}", urlencoding::encode(recipe_id)));
        let builder = self.authorize_required(self.client.post(&url))?;
        self.execute(builder, "add favorite").await?;
        Ok(())
    }

    pub async fn remove_favorite(&self, recipe_id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/users/favorites/{}", urlencoding::encode(recipe_id)));
        let builder = self.authorize_required(self.client.delete(&url))?;
        self.execute(builder, "remove favorite").await?;
        Ok(())
    }
}

impl std::fmt::Debug for RecipeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeClient")
            .field("base_url", &self.base_url)
            .field("scheme", &self.scheme)
            .field("auth", &self.auth)
            .finish()
    }
}

/// Lay a recipe out as the multipart form the backend expects. List fields
/// travel as JSON-encoded arrays.
fn recipe_form(recipe: NewRecipe) -> Result<multipart::Form, ApiError> {
    let ingredients = serde_json::to_string(&recipe.ingredients)
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
    let steps = serde_json::to_string(&recipe.preparation_steps)
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?;

    let mut form = multipart::Form::new()
        .text("title", recipe.title)
        .text("description", recipe.description)
        .text("ingredients", ingredients)
        .text("preparationSteps", steps)
        .text("cookingTime", recipe.cooking_time.to_string())
        .text("calories", recipe.calories.to_string())
        .text("difficulty", recipe.difficulty.as_str())
        .text("cuisine", recipe.cuisine)
        .text("diet", recipe.diet);

    if let Some(image) = recipe.image {
        let part = multipart::Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(image.mime_type)
            .map_err(|e| ApiError::InvalidInput(format!("Invalid image type: {}", e)))?;
        form = form.part("recipeImage", part);
    }

    Ok(form)
}
