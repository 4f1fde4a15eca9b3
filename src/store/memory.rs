use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};

use crate::domain::{NewRecipe, NewReview, Recipe, Review, ReviewUpdate};
use crate::errors::{StoreError, StoreResult};

use super::{RecipeStore, ReviewStore};

/// Store kept entirely in process memory.
///
/// Used by tests and local experiments. `fail_with` makes every subsequent
/// call fail, standing in for transport or permission errors, and
/// `set_latency` slows every call down.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    recipes: Vec<Recipe>,
    reviews: Vec<Review>,
    failure: Option<String>,
    latency: Option<std::time::Duration>,
    last_timestamp: Option<NaiveDateTime>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recipes(recipes: Vec<Recipe>) -> Self {
        let store = Self::new();
        store.lock().recipes = recipes;
        store
    }

    pub fn with_reviews(reviews: Vec<Review>) -> Self {
        let store = Self::new();
        store.lock().reviews = reviews;
        store
    }

    pub fn fail_with(&self, message: &str) {
        self.lock().failure = Some(message.to_string());
    }

    pub fn recover(&self) {
        self.lock().failure = None;
    }

    /// Delays every subsequent call, standing in for a slow backend
    pub fn set_latency(&self, latency: std::time::Duration) {
        self.lock().latency = Some(latency);
    }

    async fn respond(&self) {
        let latency = self.lock().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A poisoned lock only means another test thread panicked mid-write
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn checked(&self) -> StoreResult<MutexGuard<'_, State>> {
        let state = self.lock();
        match &state.failure {
            Some(message) => Err(StoreError::Backend(anyhow::anyhow!(message.clone()))),
            None => Ok(state),
        }
    }
}

impl State {
    /// Strictly increasing, so "newest first" ordering is well defined
    fn next_timestamp(&mut self) -> NaiveDateTime {
        let now = Utc::now().naive_utc();
        let next = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(next);
        next
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[async_trait]
impl RecipeStore for InMemoryStore {
    async fn list_all_recipes(&self) -> StoreResult<Vec<Recipe>> {
        self.respond().await;
        Ok(self.checked()?.recipes.clone())
    }

    async fn get_recipe(&self, id: &str) -> StoreResult<Recipe> {
        self.respond().await;
        self.checked()?
            .recipes
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StoreError::RecipeNotFound(id.to_string()))
    }

    async fn list_recipes_by_owner(&self, owner_id: &str) -> StoreResult<Vec<Recipe>> {
        self.respond().await;
        Ok(self
            .checked()?
            .recipes
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn create_recipe(&self, recipe: NewRecipe) -> StoreResult<Recipe> {
        self.respond().await;
        let mut state = self.checked()?;
        let now = state.next_timestamp();
        let created = Recipe {
            id: new_id(),
            title: recipe.title,
            description: recipe.description,
            image: recipe.image,
            ingredients: recipe.ingredients,
            steps: recipe.steps,
            difficulty: recipe.difficulty,
            cost: recipe.cost,
            owner_id: recipe.owner_id,
            owner_email: recipe.owner_email,
            created_at: now,
            updated_at: now,
        };
        state.recipes.push(created.clone());
        Ok(created)
    }

    async fn update_recipe(&self, id: &str, recipe: NewRecipe) -> StoreResult<Recipe> {
        self.respond().await;
        let mut state = self.checked()?;
        let now = state.next_timestamp();
        let existing = state
            .recipes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::RecipeNotFound(id.to_string()))?;

        existing.title = recipe.title;
        existing.description = recipe.description;
        existing.image = recipe.image;
        existing.ingredients = recipe.ingredients;
        existing.steps = recipe.steps;
        existing.difficulty = recipe.difficulty;
        existing.cost = recipe.cost;
        existing.owner_id = recipe.owner_id;
        existing.owner_email = recipe.owner_email;
        existing.updated_at = now;
        Ok(existing.clone())
    }

    async fn delete_recipe(&self, id: &str) -> StoreResult<bool> {
        self.respond().await;
        let mut state = self.checked()?;
        let before = state.recipes.len();
        state.recipes.retain(|r| r.id != id);
        Ok(state.recipes.len() < before)
    }
}

#[async_trait]
impl ReviewStore for InMemoryStore {
    async fn list_reviews_for_recipe(&self, recipe_id: &str) -> StoreResult<Vec<Review>> {
        self.respond().await;
        Ok(self
            .checked()?
            .reviews
            .iter()
            .filter(|r| r.recipe_id == recipe_id)
            .cloned()
            .collect())
    }

    async fn list_all_reviews(&self) -> StoreResult<Vec<Review>> {
        self.respond().await;
        Ok(self.checked()?.reviews.clone())
    }

    async fn get_review(&self, id: &str) -> StoreResult<Review> {
        self.respond().await;
        self.checked()?
            .reviews
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StoreError::ReviewNotFound(id.to_string()))
    }

    async fn get_user_review(
        &self,
        recipe_id: &str,
        user_id: &str,
    ) -> StoreResult<Option<Review>> {
        self.respond().await;
        Ok(self
            .checked()?
            .reviews
            .iter()
            .find(|r| r.recipe_id == recipe_id && r.user_id == user_id)
            .cloned())
    }

    async fn create_review(&self, review: NewReview) -> StoreResult<Review> {
        self.respond().await;
        let mut state = self.checked()?;
        let now = state.next_timestamp();
        let created = Review {
            id: new_id(),
            recipe_id: review.recipe_id,
            user_id: review.user_id,
            user_name: review.user_name,
            rating: Some(review.rating),
            comment: review.comment,
            created_at: now,
            updated_at: now,
        };
        state.reviews.push(created.clone());
        Ok(created)
    }

    async fn update_review(&self, id: &str, update: ReviewUpdate) -> StoreResult<Review> {
        self.respond().await;
        let mut state = self.checked()?;
        let now = state.next_timestamp();
        let existing = state
            .reviews
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::ReviewNotFound(id.to_string()))?;

        existing.rating = Some(update.rating);
        existing.comment = update.comment;
        existing.updated_at = now;
        Ok(existing.clone())
    }

    async fn delete_review(&self, id: &str) -> StoreResult<bool> {
        self.respond().await;
        let mut state = self.checked()?;
        let before = state.reviews.len();
        state.reviews.retain(|r| r.id != id);
        Ok(state.reviews.len() < before)
    }
}
