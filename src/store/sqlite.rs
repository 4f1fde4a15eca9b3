use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;

use crate::database::{self, DbConn, DbPool};
use crate::domain::{NewRecipe, NewReview, Recipe, Review, ReviewUpdate};
use crate::errors::{record_context, store_context, StoreError, StoreResult};

use super::{RecipeStore, ReviewStore};

/// Store backed by a SQLite database.
///
/// Blocking `rusqlite` calls run on the tokio blocking pool so the async
/// callers never stall a worker thread.
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn run<T, F>(&self, task: F) -> StoreResult<T>
    where
        F: FnOnce(&mut DbConn) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = database::get_connection(&pool)?;
            task(&mut conn)
        })
        .await
        .context("Database task did not complete")?
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[async_trait]
impl RecipeStore for SqliteStore {
    async fn list_all_recipes(&self) -> StoreResult<Vec<Recipe>> {
        self.run(|conn| {
            database::recipes::list_all(conn)
                .context(store_context("list", "recipes"))
                .map_err(StoreError::from)
        })
        .await
    }

    async fn get_recipe(&self, id: &str) -> StoreResult<Recipe> {
        let id = id.to_string();
        self.run(move |conn| {
            database::recipes::find_by_id(conn, &id)
                .context(record_context("get", "recipe", &id))?
                .ok_or(StoreError::RecipeNotFound(id))
        })
        .await
    }

    async fn list_recipes_by_owner(&self, owner_id: &str) -> StoreResult<Vec<Recipe>> {
        let owner_id = owner_id.to_string();
        self.run(move |conn| {
            database::recipes::list_by_owner(conn, &owner_id)
                .context(store_context("list owned", "recipes"))
                .map_err(StoreError::from)
        })
        .await
    }

    async fn create_recipe(&self, recipe: NewRecipe) -> StoreResult<Recipe> {
        self.run(move |conn| {
            let now = Utc::now().naive_utc();
            database::recipes::insert_recipe(conn, &new_id(), &recipe, now)
                .map_err(StoreError::from)
        })
        .await
    }

    async fn update_recipe(&self, id: &str, recipe: NewRecipe) -> StoreResult<Recipe> {
        let id = id.to_string();
        self.run(move |conn| {
            let now = Utc::now().naive_utc();
            database::recipes::update_recipe(conn, &id, &recipe, now)
                .context(record_context("update", "recipe", &id))?
                .ok_or(StoreError::RecipeNotFound(id))
        })
        .await
    }

    async fn delete_recipe(&self, id: &str) -> StoreResult<bool> {
        let id = id.to_string();
        self.run(move |conn| {
            database::recipes::delete_recipe(conn, &id)
                .context(record_context("delete", "recipe", &id))
                .map_err(StoreError::from)
        })
        .await
    }
}

#[async_trait]
impl ReviewStore for SqliteStore {
    async fn list_reviews_for_recipe(&self, recipe_id: &str) -> StoreResult<Vec<Review>> {
        let recipe_id = recipe_id.to_string();
        self.run(move |conn| {
            database::reviews::list_by_recipe(conn, &recipe_id)
                .context(record_context("list reviews of", "recipe", &recipe_id))
                .map_err(StoreError::from)
        })
        .await
    }

    async fn list_all_reviews(&self) -> StoreResult<Vec<Review>> {
        self.run(|conn| {
            database::reviews::list_all(conn)
                .context(store_context("list", "reviews"))
                .map_err(StoreError::from)
        })
        .await
    }

    async fn get_review(&self, id: &str) -> StoreResult<Review> {
        let id = id.to_string();
        self.run(move |conn| {
            database::reviews::find_by_id(conn, &id)
                .context(record_context("get", "review", &id))?
                .ok_or(StoreError::ReviewNotFound(id))
        })
        .await
    }

    async fn get_user_review(
        &self,
        recipe_id: &str,
        user_id: &str,
    ) -> StoreResult<Option<Review>> {
        let recipe_id = recipe_id.to_string();
        let user_id = user_id.to_string();
        self.run(move |conn| {
            database::reviews::find_for_user(conn, &recipe_id, &user_id)
                .context(record_context("get user review of", "recipe", &recipe_id))
                .map_err(StoreError::from)
        })
        .await
    }

    async fn create_review(&self, review: NewReview) -> StoreResult<Review> {
        self.run(move |conn| {
            let now = Utc::now().naive_utc();
            database::reviews::insert_review(conn, &new_id(), &review, now)
                .map_err(StoreError::from)
        })
        .await
    }

    async fn update_review(&self, id: &str, update: ReviewUpdate) -> StoreResult<Review> {
        let id = id.to_string();
        self.run(move |conn| {
            let now = Utc::now().naive_utc();
            database::reviews::update_review(conn, &id, &update, now)
                .context(record_context("update", "review", &id))?
                .ok_or(StoreError::ReviewNotFound(id))
        })
        .await
    }

    async fn delete_review(&self, id: &str) -> StoreResult<bool> {
        let id = id.to_string();
        self.run(move |conn| {
            database::reviews::delete_review(conn, &id)
                .context(record_context("delete", "review", &id))
                .map_err(StoreError::from)
        })
        .await
    }
}
