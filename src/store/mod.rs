use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{NewRecipe, NewReview, Recipe, Review, ReviewUpdate};
use crate::errors::{StoreError, StoreResult};

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

/// Document collection holding published recipes
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn list_all_recipes(&self) -> StoreResult<Vec<Recipe>>;

    /// Fails with [`StoreError::RecipeNotFound`] when the id is unknown
    async fn get_recipe(&self, id: &str) -> StoreResult<Recipe>;

    async fn list_recipes_by_owner(&self, owner_id: &str) -> StoreResult<Vec<Recipe>>;

    async fn create_recipe(&self, recipe: NewRecipe) -> StoreResult<Recipe>;

    async fn update_recipe(&self, id: &str, recipe: NewRecipe) -> StoreResult<Recipe>;

    /// Returns whether a recipe was removed
    async fn delete_recipe(&self, id: &str) -> StoreResult<bool>;
}

/// Document collection holding ratings and comments
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn list_reviews_for_recipe(&self, recipe_id: &str) -> StoreResult<Vec<Review>>;

    /// Unfiltered bulk read used by the ranking path
    async fn list_all_reviews(&self) -> StoreResult<Vec<Review>>;

    /// Fails with [`StoreError::ReviewNotFound`] when the id is unknown
    async fn get_review(&self, id: &str) -> StoreResult<Review>;

    async fn get_user_review(&self, recipe_id: &str, user_id: &str)
        -> StoreResult<Option<Review>>;

    async fn create_review(&self, review: NewReview) -> StoreResult<Review>;

    async fn update_review(&self, id: &str, update: ReviewUpdate) -> StoreResult<Review>;

    /// Returns whether a review was removed
    async fn delete_review(&self, id: &str) -> StoreResult<bool>;
}

/// Bounds a store call by `limit`.
///
/// On expiry the caller stops waiting and gets [`StoreError::Timeout`]. A
/// blocking read the adapter already handed to a worker thread still runs to
/// completion; its result is discarded.
pub async fn with_timeout<T, F>(operation: &'static str, limit: Duration, call: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| StoreError::Timeout {
            operation,
            secs: limit.as_secs(),
        })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_passes_result_through() {
        let result = with_timeout("noop", Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        };

        let result = with_timeout("slow read", Duration::from_millis(10), slow).await;
        assert!(matches!(
            result,
            Err(StoreError::Timeout { operation: "slow read", .. })
        ));
    }
}
