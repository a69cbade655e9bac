use std::sync::Arc;

use culinary_compass::client::{AuthContext, MemoryTokenStore, RecipeClient, TokenStore};
use culinary_compass::{Api, toast::Toaster};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "test-token-0123456789";

/// A mocked recipe backend plus an [`Api`] pointed at it.
pub struct TestEnvironment {
    pub server: MockServer,
    pub store: Arc<MemoryTokenStore>,
    pub api: Api,
}

impl TestEnvironment {
    /// Signed out, empty token store.
    pub async fn new() -> Self {
        Self::with_store(MemoryTokenStore::new()).await
    }

    /// Signed in with [`TEST_TOKEN`].
    pub async fn signed_in() -> Self {
        let env = Self::with_store(MemoryTokenStore::with_token(TEST_TOKEN)).await;
        assert!(env.api.auth().is_authenticated());
        env
    }

    async fn with_store(store: MemoryTokenStore) -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(store);
        let auth = AuthContext::load(store.clone() as Arc<dyn TokenStore>);
        let client = RecipeClient::new(format!("{}/api", server.uri()), auth);
        let api = Api::new(client, Toaster::new());

        Self { server, store, api }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", TEST_TOKEN)
    }
}

/// A recipe document the way the backend sends it.
pub fn recipe_json(id: &str, title: &str, difficulty: &str, cooking_time: u32, calories: u32, rating: f64) -> Value {
    json!({
        "_id": id,
        "title": title,
        "description": format!("{} for the test kitchen", title),
        "image": format!("/uploads/{}.jpg", id),
        "ingredients": ["flour", "water"],
        "preparationSteps": ["mix", "bake"],
        "cookingTime": cooking_time,
        "calories": calories,
        "difficulty": difficulty,
        "cuisine": "Italian",
        "diet": "Vegetarian",
        "averageRating": rating,
        "author": { "_id": "u1", "username": "ana" },
        "createdAt": "2024-03-01T12:00:00Z"
    })
}

pub fn sample_recipes() -> Value {
    json!([
        recipe_json("r1", "Tomato Pasta", "Easy", 20, 450, 4.5),
        recipe_json("r2", "Beef Wellington", "Hard", 120, 1100, 4.8),
        recipe_json("r3", "Green Salad", "easy", 10, 150, 3.2),
        recipe_json("r4", "Risotto", "Medium", 45, 620, 0.0),
    ])
}

pub fn init_test_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}
