//! Type definitions for the Culinary Compass REST API.
//!
//! This module contains the resource shapes exchanged with the backend:
//! recipes, user profiles, authentication payloads and the small request
//! bodies used by the write endpoints.
//!
//! ## Key Types
//!
//! - [`Recipe`] - A recipe with ingredients, steps and rating metadata
//! - [`RecipeListing`] - `GET /recipes` answers either a bare array or `{ "recipes": [...] }`
//! - [`UserProfile`] - The signed-in user with their own recipes and favorites
//! - [`AuthResponse`] - Token returned by login and registration
//!
//! ## API Compatibility
//!
//! The backend is not fully consistent between endpoints:
//! - the recipe image is sent as `image` on reads and `recipeImage` on writes
//! - the recipe owner is sent as `user` or `author`, populated or as a bare id
//! - ratings and amounts may be `null` on documents nobody has touched yet
//! - difficulty casing varies (`Easy` vs `easy`), so it is parsed case-insensitively

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Token payload returned by `/auth/login` and `/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    /// Display name of the user, when the server echoes it back
    #[serde(default)]
    pub username: Option<String>,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /recipes/:id/rate`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RateRequest {
    pub rating: u8,
}

/// Answer of `POST /recipes/:id/rate`.
///
/// Servers differ in what they send back; anything beyond the new average
/// is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateResponse {
    #[serde(default)]
    pub average_rating: Option<f64>,
}

/// Error payload the backend attaches to non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub msg: Option<String>,
}

/// Recipe difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Unknown or malformed difficulties are treated as absent rather than
/// failing the whole recipe.
fn lenient_difficulty<'de, D>(deserializer: D) -> Result<Option<Difficulty>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s.parse().ok(),
        _ => None,
    })
}

/// Owner of a recipe as embedded by the backend.
///
/// An unpopulated reference arrives as a bare id string; it decodes with the
/// id set and an empty username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeAuthor {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub username: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Null or non-numeric ratings read as unrated.
fn lenient_rating<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(raw.as_f64().filter(|r| r.is_finite() && *r >= 0.0).unwrap_or(0.0))
}

/// Minutes and kilocalories: whole or fractional numbers, or numeric
/// strings. Anything else is absent.
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let amount = match &raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(amount
        .filter(|a| a.is_finite() && *a >= 0.0 && *a <= f64::from(u32::MAX))
        .map(|a| a.round() as u32))
}

fn lenient_author<'de, D>(deserializer: D) -> Result<Option<RecipeAuthor>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::String(id) if !id.is_empty() => Some(RecipeAuthor {
            id: Some(id),
            username: String::new(),
        }),
        Value::Object(_) => serde_json::from_value(raw).ok(),
        _ => None,
    })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        _ => None,
    })
}

/// A recipe as returned by `/recipes` and `/recipes/:id`.
///
/// Decoding is per field: a null, mistyped or malformed value falls back to
/// its default instead of failing the recipe, and with it the whole list.
/// The search pipeline treats a missing number as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Backend document id
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Image path relative to the asset host
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: Option<String>,
    /// Same as `image`; some documents carry this name, some carry both
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Option::is_none")]
    pub recipe_image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preparation_steps: Vec<String>,
    /// Minutes
    #[serde(default, deserialize_with = "lenient_amount")]
    pub cooking_time: Option<u32>,
    /// Kilocalories
    #[serde(default, deserialize_with = "lenient_amount")]
    pub calories: Option<u32>,
    #[serde(default, deserialize_with = "lenient_difficulty")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cuisine: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub diet: String,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub average_rating: f64,
    #[serde(default, alias = "user", deserialize_with = "lenient_author")]
    pub author: Option<RecipeAuthor>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Recipe {
    /// Image path, whichever field carried it.
    pub fn image_path(&self) -> Option<&str> {
        [self.image.as_deref(), self.recipe_image.as_deref()]
            .into_iter()
            .flatten()
            .find(|path| !path.trim().is_empty())
    }

    /// Full image URL on the asset host, if the recipe has an image.
    pub fn image_url(&self, asset_base: &str) -> Option<String> {
        self.image_path()
            .map(|path| format!("{}{}", asset_base.trim_end_matches('/'), path))
    }

    /// Owner's display name; `None` when the owner is unknown or only an id.
    pub fn author_name(&self) -> Option<&str> {
        self.author
            .as_ref()
            .map(|a| a.username.as_str())
            .filter(|name| !name.is_empty())
    }
}

/// `GET /recipes` payload. Older backends send the array directly.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecipeListing {
    Bare(Vec<Recipe>),
    Wrapped { recipes: Vec<Recipe> },
}

impl RecipeListing {
    pub fn into_recipes(self) -> Vec<Recipe> {
        match self {
            RecipeListing::Bare(recipes) => recipes,
            RecipeListing::Wrapped { recipes } => recipes,
        }
    }
}

/// `GET /users/profile` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub favorites: Vec<Recipe>,
}

impl UserProfile {
    pub fn has_favorite(&self, recipe_id: &str) -> bool {
        self.favorites.iter().any(|r| r.id == recipe_id)
    }
}

/// An image attached to a new recipe.
#[derive(Debug, Clone)]
pub struct RecipeImage {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// A validated recipe ready to be sent as `multipart/form-data`.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub preparation_steps: Vec<String>,
    pub cooking_time: u32,
    pub calories: u32,
    pub difficulty: Difficulty,
    pub cuisine: String,
    pub diet: String,
    pub image: Option<RecipeImage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn recipe_accepts_either_image_field_and_owner_field() {
        let a: Recipe = serde_json::from_value(json!({
            "_id": "1",
            "title": "Soup",
            "recipeImage": "/uploads/soup.png",
            "user": { "_id": "u1", "username": "ana" }
        }))
        .unwrap();
        assert_eq!(a.image_path(), Some("/uploads/soup.png"));
        assert_eq!(a.author.unwrap().username, "ana");

        let b: Recipe = serde_json::from_value(json!({
            "_id": "2",
            "title": "Stew",
            "image": "/uploads/stew.png",
            "author": { "username": "bo" }
        }))
        .unwrap();
        assert_eq!(b.image_path(), Some("/uploads/stew.png"));
        assert_eq!(b.author.unwrap().id, None);
    }

    #[test]
    fn difficulty_is_case_insensitive_and_unknown_is_dropped() {
        let r: Recipe = serde_json::from_value(json!({
            "_id": "1", "title": "x", "difficulty": "medium"
        }))
        .unwrap();
        assert_eq!(r.difficulty, Some(Difficulty::Medium));

        let r: Recipe = serde_json::from_value(json!({
            "_id": "1", "title": "x", "difficulty": "Extreme"
        }))
        .unwrap();
        assert_eq!(r.difficulty, None);
    }

    #[test]
    fn listing_accepts_wrapped_and_bare_arrays() {
        let wrapped: RecipeListing =
            serde_json::from_value(json!({ "recipes": [{ "_id": "1", "title": "a" }] })).unwrap();
        let bare: RecipeListing =
            serde_json::from_value(json!([{ "_id": "1", "title": "a" }, { "_id": "2", "title": "b" }]))
                .unwrap();
        assert_eq!(wrapped.into_recipes().len(), 1);
        assert_eq!(bare.into_recipes().len(), 2);
    }

    #[test]
    fn image_url_joins_asset_host() {
        let r: Recipe = serde_json::from_value(json!({
            "_id": "1", "title": "x", "image": "/uploads/x.jpg"
        }))
        .unwrap();
        assert_eq!(
            r.image_url("http://localhost:5000/").as_deref(),
            Some("http://localhost:5000/uploads/x.jpg")
        );
    }

    #[test]
    fn null_rating_and_amounts_fall_back_instead_of_failing() {
        let r: Recipe = serde_json::from_value(json!({
            "_id": "1",
            "title": "Toast",
            "description": null,
            "averageRating": null,
            "cookingTime": null,
            "calories": "250",
            "ingredients": null,
            "createdAt": "yesterday"
        }))
        .unwrap();
        assert_eq!(r.average_rating, 0.0);
        assert_eq!(r.cooking_time, None);
        assert_eq!(r.calories, Some(250));
        assert!(r.description.is_empty());
        assert!(r.ingredients.is_empty());
        assert_eq!(r.created_at, None);

        let r: Recipe = serde_json::from_value(json!({
            "_id": "2", "title": "Pie", "averageRating": 4.25, "cookingTime": 42.6
        }))
        .unwrap();
        assert_eq!(r.average_rating, 4.25);
        assert_eq!(r.cooking_time, Some(43));
    }

    #[test]
    fn unpopulated_owner_reference_keeps_the_id() {
        let r: Recipe = serde_json::from_value(json!({
            "_id": "1", "title": "Soup", "user": "64ab12cd"
        }))
        .unwrap();
        let author = r.author.clone().unwrap();
        assert_eq!(author.id.as_deref(), Some("64ab12cd"));
        assert_eq!(r.author_name(), None);

        let r: Recipe = serde_json::from_value(json!({
            "_id": "2", "title": "Stew", "author": 17
        }))
        .unwrap();
        assert_eq!(r.author, None);
    }

    #[test]
    fn both_image_fields_decode_and_image_wins() {
        let r: Recipe = serde_json::from_value(json!({
            "_id": "1",
            "title": "Soup",
            "image": "/uploads/a.png",
            "recipeImage": "/uploads/b.png"
        }))
        .unwrap();
        assert_eq!(r.image_path(), Some("/uploads/a.png"));

        let r: Recipe = serde_json::from_value(json!({
            "_id": "2", "title": "Stew", "image": "", "recipeImage": "/uploads/b.png"
        }))
        .unwrap();
        assert_eq!(r.image_path(), Some("/uploads/b.png"));
    }

    #[test]
    fn one_odd_document_does_not_sink_the_listing() {
        let listing: RecipeListing = serde_json::from_value(json!([
            { "_id": "1", "title": "a", "averageRating": 4.0, "user": { "username": "ana" } },
            { "_id": "2", "title": "b", "averageRating": null, "user": "64ab", "difficulty": 3 }
        ]))
        .unwrap();
        let recipes = listing.into_recipes();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].author_name(), Some("ana"));
        assert_eq!(recipes[1].difficulty, None);
    }
}
