use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::config::AppConfig;
use crate::domain::{NewReview, Review, ReviewSubmission, ReviewUpdate, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::rating::{self, AggregateRating, RatingFilter};
use crate::store::{with_timeout, RecipeStore, ReviewStore};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Ratings and comments left on recipes.
///
/// Each user holds at most one review per recipe: submitting again edits the
/// existing review. Two near-simultaneous first submissions from the same
/// user are not reconciled here; the store keeps whichever lands last.
pub struct ReviewService {
    reviews: Arc<dyn ReviewStore>,
    recipes: Arc<dyn RecipeStore>,
    rating_filter: RatingFilter,
    read_timeout: Duration,
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn ReviewStore>,
        recipes: Arc<dyn RecipeStore>,
        config: &AppConfig,
    ) -> Self {
        Self {
            reviews,
            recipes,
            rating_filter: config.ranking.rating_filter,
            read_timeout: config.store.read_timeout(),
        }
    }

    /// Reviews of one recipe, newest first
    pub async fn reviews_for_recipe(&self, recipe_id: &str) -> ServiceResult<Vec<Review>> {
        let mut reviews = with_timeout(
            "list reviews of recipe",
            self.read_timeout,
            self.reviews.list_reviews_for_recipe(recipe_id),
        )
        .await?;
        sort_newest_first(&mut reviews);
        Ok(reviews)
    }

    pub async fn user_review(&self, recipe_id: &str, user_id: &str) -> ServiceResult<Option<Review>> {
        let review = with_timeout(
            "get user review",
            self.read_timeout,
            self.reviews.get_user_review(recipe_id, user_id),
        )
        .await?;
        Ok(review)
    }

    /// Creates the author's review of a recipe, or edits it if one exists
    pub async fn submit_review(
        &self,
        author: &User,
        recipe_id: &str,
        submission: ReviewSubmission,
    ) -> ServiceResult<Review> {
        validate_rating(submission.rating)?;
        with_timeout("get recipe", self.read_timeout, self.recipes.get_recipe(recipe_id)).await?;

        let update = ReviewUpdate {
            rating: submission.rating,
            comment: submission.comment.trim().to_string(),
        };

        match self.user_review(recipe_id, &author.id).await? {
            Some(existing) => {
                info!("Updating review {} on recipe {}", existing.id, recipe_id);
                Ok(self.reviews.update_review(&existing.id, update).await?)
            }
            None => {
                info!("Adding review by {} on recipe {}", author.id, recipe_id);
                let review = NewReview {
                    recipe_id: recipe_id.to_string(),
                    user_id: author.id.clone(),
                    user_name: author.display_name_or_default(),
                    rating: update.rating,
                    comment: update.comment,
                };
                Ok(self.reviews.create_review(review).await?)
            }
        }
    }

    /// Removes a review; only its author may do so
    pub async fn delete_review(&self, author: &User, review_id: &str) -> ServiceResult<()> {
        let review =
            with_timeout("get review", self.read_timeout, self.reviews.get_review(review_id)).await?;
        if review.user_id != author.id {
            return Err(ServiceError::forbidden(format!(
                "review {} belongs to another user",
                review_id
            )));
        }

        self.reviews.delete_review(review_id).await?;
        info!("Deleted review {} on recipe {}", review_id, review.recipe_id);
        Ok(())
    }

    pub async fn average_rating_for_recipe(&self, recipe_id: &str) -> ServiceResult<AggregateRating> {
        let reviews = with_timeout(
            "list reviews of recipe",
            self.read_timeout,
            self.reviews.list_reviews_for_recipe(recipe_id),
        )
        .await?;
        Ok(rating::aggregate(&reviews, self.rating_filter))
    }
}

fn validate_rating(rating: i32) -> ServiceResult<()> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(ServiceError::validation(format!(
            "rating must be between {} and {}, got {}",
            MIN_RATING, MAX_RATING, rating
        )))
    }
}

fn sort_newest_first(reviews: &mut [Review]) {
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;
    use crate::store::InMemoryStore;
    use crate::test_support::{recipe, review, timestamp, user};

    struct Fixture {
        store: Arc<InMemoryStore>,
        service: ReviewService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::with_recipes(vec![recipe("r1"), recipe("r2")]));
        let service = ReviewService::new(store.clone(), store.clone(), &AppConfig::new());
        Fixture { store, service }
    }

    fn submission(rating: i32, comment: &str) -> ReviewSubmission {
        ReviewSubmission {
            rating,
            comment: comment.to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_submission_creates_review() {
        let f = fixture();
        let alice = user("alice");

        let created = f.service.submit_review(&alice, "r1", submission(4, " Très bon ")).await.unwrap();

        assert_eq!(created.recipe_id, "r1");
        assert_eq!(created.user_id, "alice");
        assert_eq!(created.user_name, "alice");
        assert_eq!(created.rating, Some(4));
        assert_eq!(created.comment, "Très bon");
    }

    #[tokio::test]
    async fn test_second_submission_updates_existing_review() {
        let f = fixture();
        let alice = user("alice");

        let first = f.service.submit_review(&alice, "r1", submission(2, "Bof")).await.unwrap();
        let second = f.service.submit_review(&alice, "r1", submission(5, "Finalement super")).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.rating, Some(5));
        assert_eq!(second.created_at, first.created_at);

        let all = f.store.list_all_reviews().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_rating_out_of_range_is_rejected() {
        let f = fixture();
        let alice = user("alice");

        for rating in [0, 6, -1] {
            let err = f.service.submit_review(&alice, "r1", submission(rating, "")).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)));
        }
        assert!(f.store.list_all_reviews().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_review_of_unknown_recipe_is_not_found() {
        let f = fixture();

        let err = f.service.submit_review(&user("alice"), "ghost", submission(3, "")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_only_author_may_delete() {
        let f = fixture();
        let created = f.service.submit_review(&user("alice"), "r1", submission(3, "")).await.unwrap();

        let err = f.service.delete_review(&user("bob"), &created.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        f.service.delete_review(&user("alice"), &created.id).await.unwrap();
        let err = f.service.delete_review(&user("alice"), &created.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::ReviewNotFound(_))));
    }

    #[tokio::test]
    async fn test_reviews_listed_newest_first() {
        let mut older = review("r1", "alice", Some(5));
        older.created_at = timestamp(0);
        let mut newer = review("r1", "bob", Some(2));
        newer.created_at = timestamp(30);
        let other = review("r2", "carol", Some(4));

        let store = Arc::new(InMemoryStore::with_reviews(vec![older, other, newer]));
        let service = ReviewService::new(store.clone(), store, &AppConfig::new());

        let listed: Vec<String> = service
            .reviews_for_recipe("r1")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.user_id)
            .collect();
        assert_eq!(listed, vec!["bob", "alice"]);
    }

    #[tokio::test]
    async fn test_average_rating_for_recipe() {
        let store = Arc::new(InMemoryStore::with_reviews(vec![
            review("r1", "alice", Some(5)),
            review("r1", "bob", Some(4)),
            review("r1", "carol", None),
            review("r2", "dave", Some(1)),
        ]));
        let service = ReviewService::new(store.clone(), store, &AppConfig::new());

        let aggregate = service.average_rating_for_recipe("r1").await.unwrap();
        assert_eq!(aggregate, AggregateRating { average_rating: 4.5, review_count: 2 });

        let none = service.average_rating_for_recipe("r3").await.unwrap();
        assert_eq!(none, AggregateRating::default());
    }

    #[tokio::test]
    async fn test_store_failure_is_not_swallowed() {
        let f = fixture();
        f.store.fail_with("backend offline");

        let err = f.service.average_rating_for_recipe("r1").await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::Backend(_))));
    }

    #[tokio::test]
    async fn test_slow_lookups_time_out() {
        let f = fixture();
        let created = f.service.submit_review(&user("alice"), "r1", submission(3, "")).await.unwrap();

        let mut config = AppConfig::new();
        config.store.read_timeout_secs = 1;
        let service = ReviewService::new(f.store.clone(), f.store.clone(), &config);
        f.store.set_latency(std::time::Duration::from_secs(30));

        let err = service.submit_review(&user("bob"), "r1", submission(4, "")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::Timeout { operation: "get recipe", .. })));

        let err = service.delete_review(&user("alice"), &created.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::Timeout { operation: "get review", .. })));
    }
}
