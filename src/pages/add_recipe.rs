//! The "share your recipe" form.
//!
//! Fields are kept as the raw text the user typed; [`RecipeForm::validate`]
//! turns them into a [`NewRecipe`] or a list of per-field problems.

use std::path::{Path, PathBuf};

use crate::api::Api;
use crate::client::types::{Difficulty, NewRecipe, RecipeImage};
use crate::pages::Route;
use crate::toast::Toast;

/// Largest accepted image upload.
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecipeForm {
    pub title: String,
    pub description: String,
    pub cuisine: String,
    pub diet: String,
    pub cooking_time: String,
    pub calories: String,
    pub difficulty: Difficulty,
    /// One ingredient per line
    pub ingredients: String,
    /// One step per line
    pub preparation_steps: String,
    pub image: Option<PathBuf>,
}

/// Non-blank lines, trimmed.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn image_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

impl RecipeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remove_image(&mut self) {
        self.image = None;
    }

    /// Check every field without touching the network or the filesystem.
    pub fn validate(&self) -> Result<NewRecipe, Vec<FieldError>> {
        let mut errors = Vec::new();

        let mut required = |field: &'static str, label: &str, value: &str| {
            if value.trim().is_empty() {
                errors.push(FieldError::new(field, format!("{} is required", label)));
            }
        };
        required("title", "Recipe title", &self.title);
        required("description", "Description", &self.description);
        required("cuisine", "Cuisine type", &self.cuisine);
        required("diet", "Diet type", &self.diet);

        let mut positive = |field: &'static str, label: &str, value: &str| -> u32 {
            match value.trim().parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    errors.push(FieldError::new(field, format!("{} must be a whole number of at least 1", label)));
                    0
                }
            }
        };
        let cooking_time = positive("cooking_time", "Cooking time", &self.cooking_time);
        let calories = positive("calories", "Calories", &self.calories);

        let ingredients = split_lines(&self.ingredients);
        if ingredients.is_empty() {
            errors.push(FieldError::new("ingredients", "Enter at least one ingredient"));
        }
        let preparation_steps = split_lines(&self.preparation_steps);
        if preparation_steps.is_empty() {
            errors.push(FieldError::new("preparation_steps", "Enter at least one preparation step"));
        }

        if let Some(path) = &self.image {
            if image_mime_type(path).is_none() {
                errors.push(FieldError::new("image", "Image must be a PNG, JPG, GIF or WEBP file"));
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewRecipe {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            ingredients,
            preparation_steps,
            cooking_time,
            calories,
            difficulty: self.difficulty,
            cuisine: self.cuisine.trim().to_string(),
            diet: self.diet.trim().to_string(),
            image: None,
        })
    }

    async fn read_image(path: &Path) -> Result<RecipeImage, FieldError> {
        let mime_type = image_mime_type(path)
            .ok_or_else(|| FieldError::new("image", "Image must be a PNG, JPG, GIF or WEBP file"))?;

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| FieldError::new("image", format!("Cannot read image: {}", e)))?;
        if metadata.len() > MAX_IMAGE_BYTES {
            return Err(FieldError::new("image", "Image must be 10MB or smaller"));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| FieldError::new("image", format!("Cannot read image: {}", e)))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();

        Ok(RecipeImage {
            file_name,
            mime_type,
            bytes,
        })
    }

    /// Validate and send the recipe. On success returns the route to the
    /// new recipe; every failure has already been toasted.
    pub async fn submit(&self, api: &Api) -> Option<Route> {
        if !api.require_auth() {
            return None;
        }

        let mut recipe = match self.validate() {
            Ok(recipe) => recipe,
            Err(errors) => {
                let summary = errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                api.toaster().push(Toast::error(summary));
                return None;
            }
        };

        if let Some(path) = &self.image {
            match Self::read_image(path).await {
                Ok(image) => recipe.image = Some(image),
                Err(e) => {
                    api.toaster().push(Toast::error(e.message));
                    return None;
                }
            }
        }

        let created = api.request(api.client().create_recipe(recipe)).await?;
        api.toaster().toast("Success!", "Your recipe has been added.");
        Some(Route::Recipe(created.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled() -> RecipeForm {
        RecipeForm {
            title: " Pancakes ".to_string(),
            description: "Fluffy".to_string(),
            cuisine: "American".to_string(),
            diet: "Vegetarian".to_string(),
            cooking_time: "20".to_string(),
            calories: "350".to_string(),
            difficulty: Difficulty::Easy,
            ingredients: "2 cups flour\n\n  1 egg \n".to_string(),
            preparation_steps: "Mix\nFry".to_string(),
            image: None,
        }
    }

    #[test]
    fn valid_form_splits_and_trims_lines() {
        let recipe = filled().validate().unwrap();
        assert_eq!(recipe.title, "Pancakes");
        assert_eq!(recipe.ingredients, vec!["2 cups flour", "1 egg"]);
        assert_eq!(recipe.preparation_steps, vec!["Mix", "Fry"]);
        assert_eq!(recipe.cooking_time, 20);
    }

    #[test]
    fn every_missing_field_is_reported() {
        let errors = RecipeForm::new().validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "title",
                "description",
                "cuisine",
                "diet",
                "cooking_time",
                "calories",
                "ingredients",
                "preparation_steps",
            ]
        );
    }

    #[test]
    fn numbers_must_be_at_least_one() {
        let mut form = filled();
        form.cooking_time = "0".to_string();
        form.calories = "-5".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn image_extension_is_checked() {
        let mut form = filled();
        form.image = Some(PathBuf::from("menu.pdf"));
        let errors = form.validate().unwrap_err();
        assert_eq!(errors[0].field, "image");

        form.image = Some(PathBuf::from("photo.JPG"));
        assert!(form.validate().is_ok());
    }

    #[tokio::test]
    async fn image_is_read_with_its_mime_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dish.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let image = RecipeForm::read_image(&path).await.unwrap();
        assert_eq!(image.file_name, "dish.png");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.bytes.len(), 4);
    }
}
